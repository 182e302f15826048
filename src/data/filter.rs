use std::collections::{BTreeMap, BTreeSet};

use crate::error::InvalidColumnError;

use super::model::{Column, FieldValue, MedalRecord, Table};

// ---------------------------------------------------------------------------
// Predicate – the constraint on one column
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// Value must be one of the set.  An empty set places no constraint.
    AnyOf(BTreeSet<FieldValue>),
    /// Inclusive integer range; `min > max` matches nothing.
    Range { min: i64, max: i64 },
    /// Case-insensitive substring match on the display form.  An empty
    /// needle places no constraint.
    Contains(String),
}

impl Predicate {
    pub fn matches(&self, value: &FieldValue) -> bool {
        match self {
            Predicate::AnyOf(allowed) => allowed.is_empty() || allowed.contains(value),
            Predicate::Range { min, max } => match value {
                FieldValue::Integer(v) => min <= v && v <= max,
                _ => false,
            },
            Predicate::Contains(needle) => {
                needle.is_empty() || value.to_string().to_lowercase().contains(&needle.to_lowercase())
            }
        }
    }

    /// Whether this predicate lets every value through.
    pub fn is_unconstrained(&self) -> bool {
        match self {
            Predicate::AnyOf(allowed) => allowed.is_empty(),
            Predicate::Range { .. } => false,
            Predicate::Contains(needle) => needle.is_empty(),
        }
    }
}

// ---------------------------------------------------------------------------
// FilterCriteria – per-column predicates, ANDed together
// ---------------------------------------------------------------------------

/// Active constraints keyed by column.  A column without an entry is
/// unconstrained.  Built fresh from widget state on every interaction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    predicates: BTreeMap<Column, Predicate>,
}

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    pub fn len(&self) -> usize {
        self.predicates.len()
    }

    pub fn get(&self, column: Column) -> Option<&Predicate> {
        self.predicates.get(&column)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Column, &Predicate)> {
        self.predicates.iter().map(|(c, p)| (*c, p))
    }

    /// Set the predicate for `column`, replacing any previous one.
    /// Unconstrained predicates remove the entry instead.
    /// Text values in a membership set are coerced to the column's type, so
    /// `"gold"` selects [`MedalType::Gold`](super::model::MedalType) and `"2021"` the year.
    pub fn set(&mut self, column: Column, predicate: Predicate) -> Result<(), InvalidColumnError> {
        if matches!(predicate, Predicate::Range { .. }) && !column.supports_range() {
            return Err(InvalidColumnError::NotRangeable(column.name().to_string()));
        }
        let predicate = match predicate {
            Predicate::AnyOf(allowed) => {
                Predicate::AnyOf(allowed.into_iter().map(|v| column.coerce(v)).collect())
            }
            other => other,
        };
        if predicate.is_unconstrained() {
            self.predicates.remove(&column);
        } else {
            self.predicates.insert(column, predicate);
        }
        Ok(())
    }

    /// [`set`](Self::set) with the column given by name.
    pub fn set_by_name(&mut self, name: &str, predicate: Predicate) -> Result<(), InvalidColumnError> {
        let column: Column = name.parse()?;
        self.set(column, predicate)
    }

    /// Restrict `column` to any of `values`.
    pub fn with_values<I, V>(mut self, column: Column, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<FieldValue>,
    {
        let allowed: BTreeSet<FieldValue> = values
            .into_iter()
            .map(|v| column.coerce(v.into()))
            .collect();
        if allowed.is_empty() {
            self.predicates.remove(&column);
        } else {
            self.predicates.insert(column, Predicate::AnyOf(allowed));
        }
        self
    }

    /// Restrict years to `min..=max`.
    pub fn with_year_range(mut self, min: i32, max: i32) -> Self {
        self.predicates.insert(
            Column::Year,
            Predicate::Range {
                min: i64::from(min),
                max: i64::from(max),
            },
        );
        self
    }

    /// Restrict `column` to values containing `needle`, ignoring case.
    pub fn with_text_match(mut self, column: Column, needle: &str) -> Self {
        let needle = needle.trim();
        if needle.is_empty() {
            self.predicates.remove(&column);
        } else {
            self.predicates
                .insert(column, Predicate::Contains(needle.to_string()));
        }
        self
    }

    /// Copy of these criteria with `column` unconstrained.
    pub fn without(&self, column: Column) -> Self {
        let mut out = self.clone();
        out.predicates.remove(&column);
        out
    }

    /// Whether `record` satisfies every predicate.
    pub fn matches(&self, record: &MedalRecord) -> bool {
        self.predicates
            .iter()
            .all(|(column, predicate)| predicate.matches(&column.value_of(record)))
    }
}

// ---------------------------------------------------------------------------
// Operations
// ---------------------------------------------------------------------------

/// Rows of `table` that pass all criteria, in their original order.
pub fn filter(table: &Table, criteria: &FilterCriteria) -> Table {
    if criteria.is_empty() {
        return table.clone();
    }
    table
        .iter()
        .filter(|record| criteria.matches(record))
        .cloned()
        .collect()
}

/// Distinct values of `column` among rows passing every criterion except
/// the one on `column` itself.  Used to narrow a picker's options to what
/// the other active filters still allow.
pub fn facet_values(table: &Table, criteria: &FilterCriteria, column: Column) -> BTreeSet<FieldValue> {
    let others = criteria.without(column);
    table
        .iter()
        .filter(|record| others.matches(record))
        .map(|record| column.value_of(record))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::MedalType;

    fn sample() -> Table {
        vec![
            MedalRecord::new(2021, MedalType::Gold, "A", "FRA", "Judo"),
            MedalRecord::new(2021, MedalType::Silver, "B", "USA", "Swimming"),
            MedalRecord::new(2022, MedalType::Gold, "C", "FRA", "Biathlon"),
        ]
        .into_iter()
        .collect()
    }

    fn is_subsequence(sub: &Table, of: &Table) -> bool {
        let mut rest = of.iter();
        sub.iter().all(|row| rest.any(|candidate| candidate == row))
    }

    #[test]
    fn test_empty_criteria_returns_table_unchanged() {
        let table = sample();
        assert_eq!(filter(&table, &FilterCriteria::new()), table);
    }

    #[test]
    fn test_year_range_is_inclusive() {
        let table = sample();
        let criteria = FilterCriteria::new().with_year_range(2021, 2021);
        let out = filter(&table, &criteria);
        assert_eq!(out.rows(), &table.rows()[..2]);
    }

    #[test]
    fn test_reversed_year_range_is_empty() {
        let criteria = FilterCriteria::new().with_year_range(2022, 2021);
        assert!(filter(&sample(), &criteria).is_empty());
    }

    #[test]
    fn test_absent_value_yields_empty_table() {
        let criteria = FilterCriteria::new().with_values(Column::Country, ["ZZZ"]);
        assert!(filter(&sample(), &criteria).is_empty());
    }

    #[test]
    fn test_or_within_column_and_across_columns() {
        let table = sample();
        let criteria = FilterCriteria::new()
            .with_values(Column::Country, ["FRA", "USA"])
            .with_values(Column::Medal, [MedalType::Gold]);
        let out = filter(&table, &criteria);
        let athletes: Vec<&str> = out
            .iter()
            .map(|r| r.athlete.as_str())
            .collect();
        assert_eq!(athletes, vec!["A", "C"]);
    }

    #[test]
    fn test_filter_is_subset_and_idempotent() {
        let table = sample();
        let all_criteria = [
            FilterCriteria::new(),
            FilterCriteria::new().with_year_range(2020, 2021),
            FilterCriteria::new().with_values(Column::Discipline, ["Judo", "Biathlon"]),
            FilterCriteria::new().with_text_match(Column::Athlete, "b"),
            FilterCriteria::new()
                .with_values(Column::Country, ["FRA"])
                .with_year_range(2022, 2030),
        ];
        for criteria in &all_criteria {
            let once = filter(&table, criteria);
            assert!(is_subsequence(&once, &table), "not a subsequence for {criteria:?}");
            assert_eq!(filter(&once, criteria), once, "not idempotent for {criteria:?}");
        }
    }

    #[test]
    fn test_text_match_ignores_case() {
        let table: Table = vec![
            MedalRecord::new(2016, MedalType::Gold, "BOLT Usain", "JAM", "Athletics"),
            MedalRecord::new(2016, MedalType::Gold, "PHELPS Michael", "USA", "Swimming"),
        ]
        .into_iter()
        .collect();
        let criteria = FilterCriteria::new().with_text_match(Column::Athlete, "bolt");
        assert_eq!(filter(&table, &criteria).len(), 1);
        assert!(FilterCriteria::new()
            .with_text_match(Column::Athlete, "   ")
            .is_empty());
    }

    #[test]
    fn test_empty_selection_is_no_constraint() {
        let criteria = FilterCriteria::new().with_values(Column::Country, Vec::<&str>::new());
        assert!(criteria.is_empty());

        let mut criteria = FilterCriteria::new();
        criteria
            .set(Column::Country, Predicate::AnyOf(BTreeSet::new()))
            .unwrap();
        assert_eq!(filter(&sample(), &criteria).len(), 3);
    }

    #[test]
    fn test_set_by_name_validates_column() {
        let mut criteria = FilterCriteria::new();
        let err = criteria
            .set_by_name("colour", Predicate::Contains("x".into()))
            .unwrap_err();
        assert_eq!(err, InvalidColumnError::Unknown("colour".to_string()));

        let err = criteria
            .set_by_name("country", Predicate::Range { min: 0, max: 1 })
            .unwrap_err();
        assert_eq!(err.column(), "country");

        criteria
            .set_by_name("year", Predicate::Range { min: 2022, max: 2022 })
            .unwrap();
        assert_eq!(filter(&sample(), &criteria).len(), 1);
    }

    #[test]
    fn test_text_values_coerced_to_column_type() {
        let table = sample();
        let mut criteria = FilterCriteria::new();
        criteria
            .set_by_name(
                "medal",
                Predicate::AnyOf([FieldValue::from("gold")].into_iter().collect()),
            )
            .unwrap();
        assert_eq!(filter(&table, &criteria).len(), 2);

        let mut criteria = FilterCriteria::new();
        criteria
            .set_by_name(
                "year",
                Predicate::AnyOf([FieldValue::from("2021")].into_iter().collect()),
            )
            .unwrap();
        assert_eq!(filter(&table, &criteria).len(), 2);

        let criteria = FilterCriteria::new().with_values(Column::Medal, ["Silver"]);
        assert_eq!(filter(&table, &criteria).len(), 1);

        // unparseable text stays text and matches nothing
        let criteria = FilterCriteria::new().with_values(Column::Year, ["twenty"]);
        assert!(filter(&table, &criteria).is_empty());
    }

    #[test]
    fn test_facet_values_ignore_own_column() {
        let table = sample();
        let criteria = FilterCriteria::new()
            .with_values(Column::Country, ["USA"])
            .with_year_range(2021, 2021);

        let countries = facet_values(&table, &criteria, Column::Country);
        assert_eq!(countries.len(), 2);

        let disciplines = facet_values(&table, &criteria, Column::Discipline);
        assert_eq!(
            disciplines.into_iter().collect::<Vec<_>>(),
            vec![FieldValue::from("Swimming")]
        );
    }
}
