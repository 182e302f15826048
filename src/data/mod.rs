/// Data layer: core types, loading, filtering and aggregation.
///
/// Architecture:
/// ```text
///  .xlsx / .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  decode file → RawSheet
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ normalize  │  header aliases, type coercion → Table
///   └───────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  FilterCriteria → filtered Table
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ aggregate  │  group + count → AggregateResult / MedalTable
///   └───────────┘
/// ```

pub mod aggregate;
pub mod filter;
pub mod loader;
pub mod model;
pub mod normalize;
