use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use crate::config::AppConfig;
use crate::data::aggregate::{medal_table, MedalTable};
use crate::data::filter::{facet_values, filter, FilterCriteria};
use crate::data::model::{Column, FieldValue, Table};

// ---------------------------------------------------------------------------
// Widget inputs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Filtered,
    Aggregated,
}

/// Raw widget values.  Turned into a [`FilterCriteria`] on every frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterInputs {
    pub year_range_enabled: bool,
    pub year_range: (i32, i32),
    /// Multi-select state per column.
    pub selections: BTreeMap<Column, BTreeSet<FieldValue>>,
    /// Free-text athlete search, used when no athlete is picked explicitly.
    pub athlete_search: String,
}

impl FilterInputs {
    pub fn to_criteria(&self) -> FilterCriteria {
        let mut criteria = FilterCriteria::new();
        if self.year_range_enabled {
            criteria = criteria.with_year_range(self.year_range.0, self.year_range.1);
        }
        for (column, selected) in &self.selections {
            criteria = criteria.with_values(*column, selected.iter().cloned());
        }
        let athletes_picked = self
            .selections
            .get(&Column::Athlete)
            .is_some_and(|s| !s.is_empty());
        if !athletes_picked {
            criteria = criteria.with_text_match(Column::Athlete, &self.athlete_search);
        }
        criteria
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// Derived views of the current criteria, recomputed only when they change.
#[derive(Debug, Clone)]
pub struct Derived {
    pub criteria: FilterCriteria,
    pub filtered: Table,
    pub by_country: MedalTable,
    pub by_athlete: MedalTable,
}

impl Derived {
    fn compute(table: &Table, criteria: FilterCriteria) -> Self {
        let filtered = filter(table, &criteria);
        let by_country = medal_table(&filtered, Column::Country);
        let by_athlete = medal_table(&filtered, Column::Athlete).without_team_entries();
        Derived {
            criteria,
            filtered,
            by_country,
            by_athlete,
        }
    }
}

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded dataset; only ever replaced as a whole.
    pub table: Table,

    /// Where `table` came from.
    pub source: PathBuf,

    pub view: View,

    pub inputs: FilterInputs,

    pub derived: Derived,

    /// Stack bars by medal type instead of one total bar per group.
    pub stack_by_medal: bool,

    pub chart_max_bars: usize,

    /// Initial slider values when the year range filter is switched on.
    default_year_range: (i32, i32),

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(table: Table, source: PathBuf, config: &AppConfig) -> Self {
        let derived = Derived::compute(&table, FilterCriteria::new());
        let mut state = Self {
            table,
            source,
            view: View::Filtered,
            inputs: FilterInputs::default(),
            derived,
            stack_by_medal: true,
            chart_max_bars: config.chart_max_bars,
            default_year_range: config.default_year_range,
            status_message: None,
        };
        state.reset_inputs();
        state
    }

    /// Ingest a newly loaded table and start over with no filters.
    pub fn set_table(&mut self, table: Table, source: &Path) {
        self.table = table;
        self.source = source.to_path_buf();
        self.reset_inputs();
        self.derived = Derived::compute(&self.table, FilterCriteria::new());
        self.status_message = None;
    }

    /// Year extent of the loaded table, `(0, 0)` when empty.
    pub fn year_bounds(&self) -> (i32, i32) {
        self.table.year_bounds().unwrap_or((0, 0))
    }

    fn reset_inputs(&mut self) {
        let (lo, hi) = self.year_bounds();
        let (from, to) = self.default_year_range;
        self.inputs = FilterInputs {
            year_range: (from.clamp(lo, hi), to.clamp(lo, hi)),
            ..FilterInputs::default()
        };
    }

    /// Rebuild criteria from the widgets and recompute if they changed.
    pub fn refilter(&mut self) {
        let criteria = self.inputs.to_criteria();
        if criteria != self.derived.criteria {
            self.derived = Derived::compute(&self.table, criteria);
            log::debug!(
                "Refiltered: {} of {} rows, {} active criteria",
                self.derived.filtered.len(),
                self.table.len(),
                self.derived.criteria.len()
            );
        }
    }

    /// Options for a picker, narrowed by every other active filter.  Values
    /// already selected are always kept so they can be deselected.
    pub fn options_for(&self, column: Column) -> BTreeSet<FieldValue> {
        let mut options = facet_values(&self.table, &self.derived.criteria, column);
        if let Some(selected) = self.inputs.selections.get(&column) {
            options.extend(selected.iter().cloned());
        }
        options
    }

    pub fn is_selected(&self, column: Column, value: &FieldValue) -> bool {
        self.inputs
            .selections
            .get(&column)
            .is_some_and(|s| s.contains(value))
    }

    /// Toggle a single value in a column's selection.
    pub fn toggle_value(&mut self, column: Column, value: &FieldValue) {
        let selected = self.inputs.selections.entry(column).or_default();
        if !selected.remove(value) {
            selected.insert(value.clone());
        }
        self.refilter();
    }

    /// Deselect all values in a column.
    pub fn clear_column(&mut self, column: Column) {
        self.inputs.selections.remove(&column);
        if column == Column::Athlete {
            self.inputs.athlete_search.clear();
        }
        self.refilter();
    }

    /// Drop every filter.
    pub fn clear_filters(&mut self) {
        self.reset_inputs();
        self.refilter();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{MedalRecord, MedalType};

    fn state() -> AppState {
        let table: Table = vec![
            MedalRecord::new(1996, MedalType::Gold, "A", "FRA", "Judo"),
            MedalRecord::new(2008, MedalType::Silver, "B", "USA", "Swimming"),
            MedalRecord::new(2016, MedalType::Gold, "TEAM", "USA", "Basketball"),
            MedalRecord::new(2020, MedalType::Bronze, "C", "FRA", "Swimming"),
        ]
        .into_iter()
        .collect();
        AppState::new(table, PathBuf::from("test.csv"), &AppConfig::default())
    }

    #[test]
    fn test_new_state_shows_everything() {
        let state = state();
        assert_eq!(state.derived.filtered, state.table);
        assert_eq!(state.derived.by_country.len(), 2);
        // team awards are not athletes
        assert_eq!(state.derived.by_athlete.len(), 3);
    }

    #[test]
    fn test_default_year_range_is_clamped() {
        let state = state();
        assert_eq!(state.inputs.year_range, (2000, 2020));
        assert!(!state.inputs.year_range_enabled);
    }

    #[test]
    fn test_toggle_value_refilters() {
        let mut state = state();
        let usa = FieldValue::from("USA");
        state.toggle_value(Column::Country, &usa);
        assert!(state.is_selected(Column::Country, &usa));
        assert_eq!(state.derived.filtered.len(), 2);

        state.toggle_value(Column::Country, &usa);
        assert!(!state.is_selected(Column::Country, &usa));
        assert_eq!(state.derived.filtered.len(), 4);
    }

    #[test]
    fn test_year_range_input() {
        let mut state = state();
        state.inputs.year_range_enabled = true;
        state.refilter();
        assert_eq!(state.derived.filtered.len(), 3);

        state.inputs.year_range = (2020, 2008);
        state.refilter();
        assert!(state.derived.filtered.is_empty());
    }

    #[test]
    fn test_athlete_search_yields_to_explicit_pick() {
        let mut inputs = FilterInputs {
            athlete_search: "zzz".to_string(),
            ..FilterInputs::default()
        };
        assert!(inputs.to_criteria().get(Column::Athlete).is_some());

        inputs
            .selections
            .entry(Column::Athlete)
            .or_default()
            .insert(FieldValue::from("A"));
        let criteria = inputs.to_criteria();
        assert!(matches!(
            criteria.get(Column::Athlete),
            Some(crate::data::filter::Predicate::AnyOf(_))
        ));
    }

    #[test]
    fn test_options_narrow_but_keep_selection() {
        let mut state = state();
        state.toggle_value(Column::Discipline, &FieldValue::from("Judo"));

        let countries = state.options_for(Column::Country);
        assert_eq!(countries.into_iter().collect::<Vec<_>>(), vec![FieldValue::from("FRA")]);

        let disciplines = state.options_for(Column::Discipline);
        assert_eq!(disciplines.len(), 3);
    }

    #[test]
    fn test_clear_filters() {
        let mut state = state();
        state.toggle_value(Column::Country, &FieldValue::from("FRA"));
        state.inputs.athlete_search = "a".to_string();
        state.clear_filters();
        assert!(state.derived.criteria.is_empty());
        assert_eq!(state.derived.filtered.len(), 4);
    }

    #[test]
    fn test_set_table_resets() {
        let mut state = state();
        state.toggle_value(Column::Country, &FieldValue::from("FRA"));
        let table: Table = vec![MedalRecord::new(2024, MedalType::Gold, "X", "ESP", "Sailing")]
            .into_iter()
            .collect();
        state.set_table(table, Path::new("other.csv"));
        assert!(state.inputs.selections.is_empty());
        assert_eq!(state.derived.filtered.len(), 1);
        assert_eq!(state.inputs.year_range, (2024, 2024));
    }
}
