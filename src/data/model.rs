use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::error::InvalidColumnError;

// ---------------------------------------------------------------------------
// MedalType
// ---------------------------------------------------------------------------

/// Podium placement. Ordered gold < silver < bronze, i.e. by medal code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MedalType {
    Gold,
    Silver,
    Bronze,
}

impl MedalType {
    pub const ALL: [MedalType; 3] = [MedalType::Gold, MedalType::Silver, MedalType::Bronze];

    /// Placement code used by the source spreadsheets (1 = gold).
    pub fn code(self) -> u8 {
        match self {
            MedalType::Gold => 1,
            MedalType::Silver => 2,
            MedalType::Bronze => 3,
        }
    }

    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(MedalType::Gold),
            2 => Some(MedalType::Silver),
            3 => Some(MedalType::Bronze),
            _ => None,
        }
    }

    /// Lenient parse: accepts placement codes and any text mentioning the
    /// metal (`GOLD`, `Gold Medal`, `silver`).
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        if let Ok(code) = text.parse::<i64>() {
            return Self::from_code(code);
        }
        let lower = text.to_ascii_lowercase();
        if lower.contains("gold") {
            Some(MedalType::Gold)
        } else if lower.contains("silver") {
            Some(MedalType::Silver)
        } else if lower.contains("bronze") {
            Some(MedalType::Bronze)
        } else {
            None
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MedalType::Gold => "Gold",
            MedalType::Silver => "Silver",
            MedalType::Bronze => "Bronze",
        }
    }

    pub fn emoji(self) -> &'static str {
        match self {
            MedalType::Gold => "🥇",
            MedalType::Silver => "🥈",
            MedalType::Bronze => "🥉",
        }
    }
}

impl fmt::Display for MedalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Column – the fixed schema
// ---------------------------------------------------------------------------

/// Every column a [`MedalRecord`] carries, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Column {
    Game,
    Medal,
    Athlete,
    Country,
    Discipline,
    Event,
    EventGender,
    ParticipantType,
    Year,
}

impl Column {
    pub const ALL: [Column; 9] = [
        Column::Game,
        Column::Medal,
        Column::Athlete,
        Column::Country,
        Column::Discipline,
        Column::Event,
        Column::EventGender,
        Column::ParticipantType,
        Column::Year,
    ];

    /// Canonical snake_case name.
    pub fn name(self) -> &'static str {
        match self {
            Column::Game => "game",
            Column::Medal => "medal",
            Column::Athlete => "athlete",
            Column::Country => "country",
            Column::Discipline => "discipline",
            Column::Event => "event",
            Column::EventGender => "event_gender",
            Column::ParticipantType => "participant_type",
            Column::Year => "year",
        }
    }

    /// Human-readable header.
    pub fn title(self) -> &'static str {
        match self {
            Column::Game => "Game",
            Column::Medal => "Medal",
            Column::Athlete => "Athlete",
            Column::Country => "Country",
            Column::Discipline => "Discipline",
            Column::Event => "Event",
            Column::EventGender => "Event Gender",
            Column::ParticipantType => "Participant Type",
            Column::Year => "Year",
        }
    }

    /// Columns every loaded row must have a value for.
    pub fn is_required(self) -> bool {
        matches!(
            self,
            Column::Year | Column::Discipline | Column::Country | Column::Athlete | Column::Medal
        )
    }

    /// Whether a numeric range predicate makes sense on this column.
    pub fn supports_range(self) -> bool {
        matches!(self, Column::Year)
    }

    /// Read this column out of a record.
    pub fn value_of(self, record: &MedalRecord) -> FieldValue {
        fn optional(text: &Option<String>) -> FieldValue {
            text.as_ref()
                .map(|s| FieldValue::Text(s.clone()))
                .unwrap_or(FieldValue::Missing)
        }
        match self {
            Column::Game => optional(&record.game),
            Column::Medal => FieldValue::Medal(record.medal),
            Column::Athlete => FieldValue::Text(record.athlete.clone()),
            Column::Country => FieldValue::Text(record.country.clone()),
            Column::Discipline => FieldValue::Text(record.discipline.clone()),
            Column::Event => optional(&record.event),
            Column::EventGender => optional(&record.event_gender),
            Column::ParticipantType => optional(&record.participant_type),
            Column::Year => FieldValue::Integer(i64::from(record.year)),
        }
    }

    /// Convert a text value into this column's cell type where it parses
    /// (`"2021"` for year, `"gold"` for medal).  Anything else is returned
    /// unchanged.
    pub fn coerce(self, value: FieldValue) -> FieldValue {
        let FieldValue::Text(text) = &value else {
            return value;
        };
        let coerced = match self {
            Column::Year => text.trim().parse::<i64>().ok().map(FieldValue::Integer),
            Column::Medal => MedalType::parse(text).map(FieldValue::Medal),
            _ => None,
        };
        coerced.unwrap_or(value)
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Column {
    type Err = InvalidColumnError;

    /// Accepts the canonical name or the title, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace([' ', '-'], "_");
        Column::ALL
            .into_iter()
            .find(|c| c.name() == wanted)
            .ok_or_else(|| InvalidColumnError::Unknown(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// FieldValue – a single cell, used for predicates and group keys
// ---------------------------------------------------------------------------

/// The value of one column of one record.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FieldValue {
    /// Optional column without a value.
    Missing,
    Integer(i64),
    Medal(MedalType),
    Text(String),
}

impl FieldValue {
    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Missing => true,
            FieldValue::Text(s) => s.is_empty(),
            _ => false,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Missing => Ok(()),
            FieldValue::Integer(i) => write!(f, "{i}"),
            FieldValue::Medal(m) => write!(f, "{m}"),
            FieldValue::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<i32> for FieldValue {
    fn from(i: i32) -> Self {
        FieldValue::Integer(i64::from(i))
    }
}

impl From<i64> for FieldValue {
    fn from(i: i64) -> Self {
        FieldValue::Integer(i)
    }
}

impl From<MedalType> for FieldValue {
    fn from(m: MedalType) -> Self {
        FieldValue::Medal(m)
    }
}

// ---------------------------------------------------------------------------
// MedalRecord – one row of the table
// ---------------------------------------------------------------------------

/// A single medal award.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MedalRecord {
    /// Display form of the edition, e.g. `2020 Tokyo`.
    pub game: Option<String>,
    pub year: i32,
    pub medal: MedalType,
    /// `TEAM` for team awards without a named athlete.
    pub athlete: String,
    pub country: String,
    pub discipline: String,
    pub event: Option<String>,
    pub event_gender: Option<String>,
    pub participant_type: Option<String>,
}

impl MedalRecord {
    /// Record with only the required columns set.
    pub fn new(
        year: i32,
        medal: MedalType,
        athlete: impl Into<String>,
        country: impl Into<String>,
        discipline: impl Into<String>,
    ) -> Self {
        MedalRecord {
            game: None,
            year,
            medal,
            athlete: athlete.into(),
            country: country.into(),
            discipline: discipline.into(),
            event: None,
            event_gender: None,
            participant_type: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Table – the loaded dataset
// ---------------------------------------------------------------------------

/// Immutable, ordered collection of medal records.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    rows: Vec<MedalRecord>,
}

impl Table {
    pub fn new(rows: Vec<MedalRecord>) -> Self {
        Table { rows }
    }

    pub fn rows(&self) -> &[MedalRecord] {
        &self.rows
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MedalRecord> {
        self.rows.iter()
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Sorted distinct values of `column`.
    pub fn unique_values(&self, column: Column) -> BTreeSet<FieldValue> {
        self.rows.iter().map(|r| column.value_of(r)).collect()
    }

    /// Smallest and largest year, `None` for an empty table.
    pub fn year_bounds(&self) -> Option<(i32, i32)> {
        let min = self.rows.iter().map(|r| r.year).min()?;
        let max = self.rows.iter().map(|r| r.year).max()?;
        Some((min, max))
    }
}

impl FromIterator<MedalRecord> for Table {
    fn from_iter<I: IntoIterator<Item = MedalRecord>>(iter: I) -> Self {
        Table::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Table {
    type Item = &'a MedalRecord;
    type IntoIter = std::slice::Iter<'a, MedalRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}
