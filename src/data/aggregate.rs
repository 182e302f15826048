use std::collections::BTreeMap;

use crate::error::InvalidColumnError;

use super::model::{Column, FieldValue, MedalType, Table};
use super::normalize::TEAM_PLACEHOLDER;

// ---------------------------------------------------------------------------
// AggregateResult – group key → row count
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateResult {
    group_by: Column,
    counts: BTreeMap<FieldValue, usize>,
}

impl AggregateResult {
    pub fn group_by(&self) -> Column {
        self.group_by
    }

    /// Count for `key`; `None` when the group has no rows.
    pub fn get(&self, key: &FieldValue) -> Option<usize> {
        self.counts.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Sum of all group counts.
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    /// Groups in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&FieldValue, usize)> {
        self.counts.iter().map(|(k, v)| (k, *v))
    }

    /// Groups by descending count, ties broken by key.
    pub fn ranked(&self) -> Vec<(&FieldValue, usize)> {
        let mut groups: Vec<_> = self.iter().collect();
        groups.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        groups
    }

    /// Drop groups whose key names a team rather than a person.
    pub fn without_team_entries(mut self) -> Self {
        self.counts.retain(|key, _| !is_team_key(key));
        self
    }

    pub fn into_map(self) -> BTreeMap<FieldValue, usize> {
        self.counts
    }
}

fn is_team_key(key: &FieldValue) -> bool {
    key.as_text().is_some_and(|s| s.contains(TEAM_PLACEHOLDER))
}

/// Count rows of `table` per distinct `group_by` value.
///
/// With `count_by` set, only rows with a non-empty value in that column are
/// counted.  Groups that end up with no counted rows are left out.
pub fn aggregate(table: &Table, group_by: Column, count_by: Option<Column>) -> AggregateResult {
    let mut counts: BTreeMap<FieldValue, usize> = BTreeMap::new();
    for record in table {
        if let Some(column) = count_by {
            if column.value_of(record).is_empty() {
                continue;
            }
        }
        *counts.entry(group_by.value_of(record)).or_default() += 1;
    }
    AggregateResult { group_by, counts }
}

/// [`aggregate`] with columns given by name.
pub fn aggregate_by_name(
    table: &Table,
    group_by: &str,
    count_by: Option<&str>,
) -> Result<AggregateResult, InvalidColumnError> {
    let group_by: Column = group_by.parse()?;
    let count_by = count_by.map(str::parse::<Column>).transpose()?;
    Ok(aggregate(table, group_by, count_by))
}

// ---------------------------------------------------------------------------
// MedalTable – group key → gold / silver / bronze tally
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MedalTally {
    pub gold: usize,
    pub silver: usize,
    pub bronze: usize,
}

impl MedalTally {
    pub fn add(&mut self, medal: MedalType) {
        match medal {
            MedalType::Gold => self.gold += 1,
            MedalType::Silver => self.silver += 1,
            MedalType::Bronze => self.bronze += 1,
        }
    }

    pub fn get(&self, medal: MedalType) -> usize {
        match medal {
            MedalType::Gold => self.gold,
            MedalType::Silver => self.silver,
            MedalType::Bronze => self.bronze,
        }
    }

    pub fn total(&self) -> usize {
        self.gold + self.silver + self.bronze
    }
}

/// Per-group medal breakdown, the shape of an Olympic medal table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MedalTable {
    group_by: Column,
    tallies: BTreeMap<FieldValue, MedalTally>,
}

impl MedalTable {
    pub fn group_by(&self) -> Column {
        self.group_by
    }

    pub fn get(&self, key: &FieldValue) -> Option<&MedalTally> {
        self.tallies.get(key)
    }

    pub fn len(&self) -> usize {
        self.tallies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tallies.is_empty()
    }

    /// Tally over all groups.
    pub fn overall(&self) -> MedalTally {
        self.tallies.values().fold(MedalTally::default(), |acc, t| MedalTally {
            gold: acc.gold + t.gold,
            silver: acc.silver + t.silver,
            bronze: acc.bronze + t.bronze,
        })
    }

    /// Medal-table order: most golds first, then silvers, then bronzes.
    pub fn ranked(&self) -> Vec<(&FieldValue, MedalTally)> {
        let mut rows: Vec<_> = self.tallies.iter().map(|(k, t)| (k, *t)).collect();
        rows.sort_by(|(ka, a), (kb, b)| {
            (b.gold, b.silver, b.bronze)
                .cmp(&(a.gold, a.silver, a.bronze))
                .then_with(|| ka.cmp(kb))
        });
        rows
    }

    /// Drop groups whose key names a team rather than a person.
    pub fn without_team_entries(mut self) -> Self {
        self.tallies.retain(|key, _| !is_team_key(key));
        self
    }
}

/// Tally medals of `table` per distinct `group_by` value.
pub fn medal_table(table: &Table, group_by: Column) -> MedalTable {
    let mut tallies: BTreeMap<FieldValue, MedalTally> = BTreeMap::new();
    for record in table {
        tallies
            .entry(group_by.value_of(record))
            .or_default()
            .add(record.medal);
    }
    MedalTable { group_by, tallies }
}
