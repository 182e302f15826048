use std::collections::BTreeMap;

use crate::error::LoadError;

use super::model::{Column, MedalRecord, MedalType, Table};

/// Athlete value given to team awards that name no individual.
pub const TEAM_PLACEHOLDER: &str = "TEAM";

// ---------------------------------------------------------------------------
// Raw input – what every file format decodes into
// ---------------------------------------------------------------------------

/// An untyped cell as it came out of the source file.
#[derive(Debug, Clone, PartialEq)]
pub enum RawCell {
    Empty,
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
}

impl RawCell {
    /// Guess a cell type from text, for formats without their own typing.
    pub fn guess(s: &str) -> RawCell {
        let s = s.trim();
        if s.is_empty() {
            return RawCell::Empty;
        }
        if let Ok(i) = s.parse::<i64>() {
            return RawCell::Integer(i);
        }
        if let Ok(f) = s.parse::<f64>() {
            return RawCell::Float(f);
        }
        if s == "true" || s == "false" {
            return RawCell::Bool(s == "true");
        }
        RawCell::Text(s.to_string())
    }

    /// Trimmed text form; `None` for empty cells.
    fn text(&self) -> Option<String> {
        let text = match self {
            RawCell::Empty => return None,
            RawCell::Text(s) => s.trim().to_string(),
            RawCell::Integer(i) => i.to_string(),
            RawCell::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", *f as i64),
            RawCell::Float(f) => f.to_string(),
            RawCell::Bool(b) => b.to_string(),
        };
        (!text.is_empty()).then_some(text)
    }
}

/// A header row plus data rows, before any schema is applied.
#[derive(Debug, Clone, Default)]
pub struct RawSheet {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<RawCell>>,
}

// ---------------------------------------------------------------------------
// Header aliases
// ---------------------------------------------------------------------------

const ALIASES: &[(&str, Column)] = &[
    ("year", Column::Year),
    ("edition", Column::Year),
    ("season_year", Column::Year),
    ("discipline", Column::Discipline),
    ("discipline_title", Column::Discipline),
    ("sport", Column::Discipline),
    ("country", Column::Country),
    ("country_name", Column::Country),
    ("team/noc", Column::Country),
    ("team", Column::Country),
    ("noc", Column::Country),
    ("nation", Column::Country),
    ("athlete", Column::Athlete),
    ("athlete_full_name", Column::Athlete),
    ("athlete_name", Column::Athlete),
    ("name", Column::Athlete),
    ("medal", Column::Medal),
    ("medal_type", Column::Medal),
    ("medal_code", Column::Medal),
    ("placement", Column::Medal),
    ("game", Column::Game),
    ("games", Column::Game),
    ("slug_game", Column::Game),
    ("event", Column::Event),
    ("event_title", Column::Event),
    ("event_gender", Column::EventGender),
    ("gender", Column::EventGender),
    ("participant_type", Column::ParticipantType),
];

/// Trim, lower-case and join words with `_`.
fn normalize_header(header: &str) -> String {
    header
        .trim()
        .to_lowercase()
        .split(|c: char| c.is_whitespace() || c == '-')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("_")
}

/// Map a raw header to its canonical column, if it is one we know.
pub fn canonical_column(header: &str) -> Option<Column> {
    let key = normalize_header(header);
    ALIASES
        .iter()
        .find(|(alias, _)| *alias == key)
        .map(|(_, column)| *column)
}

// ---------------------------------------------------------------------------
// Value coercion
// ---------------------------------------------------------------------------

fn coerce_year(cell: &RawCell) -> Option<i32> {
    match cell {
        RawCell::Integer(i) => i32::try_from(*i).ok(),
        RawCell::Float(f) if f.fract() == 0.0 => i32::try_from(*f as i64).ok(),
        RawCell::Text(s) => {
            let s = s.trim();
            s.parse::<i32>().ok().or_else(|| {
                s.parse::<f64>()
                    .ok()
                    .filter(|f| f.fract() == 0.0)
                    .and_then(|f| i32::try_from(f as i64).ok())
            })
        }
        _ => None,
    }
}

fn coerce_medal(cell: &RawCell) -> Option<MedalType> {
    match cell {
        RawCell::Integer(i) => MedalType::from_code(*i),
        RawCell::Float(f) if f.fract() == 0.0 => MedalType::from_code(*f as i64),
        RawCell::Text(s) => MedalType::parse(s),
        _ => None,
    }
}

/// Split `rio-de-janeiro-2016` into (`rio-de-janeiro`, 2016).
fn split_slug(slug: &str) -> Option<(&str, i32)> {
    let (location, year) = slug.rsplit_once('-')?;
    if location.is_empty() || year.is_empty() || !year.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some((location, year.parse().ok()?))
}

/// First letter upper, the rest lower.
fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// `tokyo-2020` becomes `2020 Tokyo`; anything else is returned unchanged.
pub fn format_game(game: &str) -> String {
    match split_slug(game) {
        Some((location, year)) => format!("{year} {}", capitalize(location)),
        None => game.to_string(),
    }
}

/// Year carried by a game value, slug or display form.
pub fn year_from_game(game: &str) -> Option<i32> {
    if let Some((_, year)) = split_slug(game) {
        return Some(year);
    }
    let first = game.split_whitespace().next()?;
    if first.len() == 4 && first.bytes().all(|b| b.is_ascii_digit()) {
        first.parse().ok()
    } else {
        None
    }
}

// ---------------------------------------------------------------------------
// Sheet → Table
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
struct DropCounts {
    year: usize,
    medal: usize,
    country: usize,
    discipline: usize,
}

impl DropCounts {
    fn total(&self) -> usize {
        self.year + self.medal + self.country + self.discipline
    }
}

/// Resolve headers against the alias table.  The first header mapping to a
/// column wins; empty, `Unnamed: N` and unknown headers are ignored.
fn resolve_headers(headers: &[String]) -> Result<BTreeMap<Column, usize>, LoadError> {
    let mut index = BTreeMap::new();
    for (i, header) in headers.iter().enumerate() {
        let key = normalize_header(header);
        if key.is_empty() || key.starts_with("unnamed") {
            continue;
        }
        match canonical_column(header) {
            Some(column) => {
                if index.contains_key(&column) {
                    log::debug!("Ignoring duplicate header '{header}' for column {column}");
                } else {
                    index.insert(column, i);
                }
            }
            None => log::debug!("Ignoring unknown header '{header}'"),
        }
    }

    let missing: Vec<String> = Column::ALL
        .into_iter()
        .filter(|c| c.is_required() && !index.contains_key(c))
        .map(|c| c.name().to_string())
        .collect();
    if !missing.is_empty() {
        return Err(LoadError::MissingColumns(missing));
    }
    Ok(index)
}

/// Apply the fixed schema to a raw sheet, dropping rows that cannot satisfy it.
pub fn normalize(sheet: RawSheet) -> Result<Table, LoadError> {
    let index = resolve_headers(&sheet.headers)?;
    let mut dropped = DropCounts::default();
    let mut records = Vec::with_capacity(sheet.rows.len());

    for row in &sheet.rows {
        let cell = |column: Column| {
            index
                .get(&column)
                .and_then(|&i| row.get(i))
                .unwrap_or(&RawCell::Empty)
        };
        let text = |column: Column| cell(column).text();

        let raw_game = text(Column::Game);
        let Some(year) = coerce_year(cell(Column::Year))
            .or_else(|| raw_game.as_deref().and_then(year_from_game))
        else {
            dropped.year += 1;
            continue;
        };
        let Some(medal) = coerce_medal(cell(Column::Medal)) else {
            dropped.medal += 1;
            continue;
        };
        let Some(country) = text(Column::Country) else {
            dropped.country += 1;
            continue;
        };
        let Some(discipline) = text(Column::Discipline) else {
            dropped.discipline += 1;
            continue;
        };

        records.push(MedalRecord {
            game: raw_game.as_deref().map(format_game),
            year,
            medal,
            athlete: text(Column::Athlete).unwrap_or_else(|| TEAM_PLACEHOLDER.to_string()),
            country,
            discipline,
            event: text(Column::Event),
            event_gender: text(Column::EventGender),
            participant_type: text(Column::ParticipantType),
        });
    }

    if dropped.total() > 0 {
        log::warn!(
            "Dropped {} rows (bad year: {}, bad medal: {}, no country: {}, no discipline: {})",
            dropped.total(),
            dropped.year,
            dropped.medal,
            dropped.country,
            dropped.discipline
        );
    }
    Ok(Table::new(records))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> RawCell {
        RawCell::Text(s.to_string())
    }

    fn sheet(headers: &[&str], rows: Vec<Vec<RawCell>>) -> RawSheet {
        RawSheet {
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows,
        }
    }

    #[test]
    fn test_canonical_column_aliases() {
        assert_eq!(canonical_column(" Team/NOC "), Some(Column::Country));
        assert_eq!(canonical_column("athlete_full_name"), Some(Column::Athlete));
        assert_eq!(canonical_column("Event Gender"), Some(Column::EventGender));
        assert_eq!(canonical_column("Medal Type"), Some(Column::Medal));
        assert_eq!(canonical_column("athlete_url"), None);
    }

    #[test]
    fn test_normalize_maps_aliases_and_ignores_extras() {
        let raw = sheet(
            &["", "Year", "Team/NOC", "Athlete", "Discipline", "Medal", "athlete_url"],
            vec![vec![
                RawCell::Integer(0),
                RawCell::Integer(2021),
                text("FRA"),
                text("RINER Teddy"),
                text("Judo"),
                text("GOLD"),
                text("https://olympics.com/x"),
            ]],
        );
        let table = normalize(raw).unwrap();
        assert_eq!(table.len(), 1);
        let row = &table.rows()[0];
        assert_eq!(row.year, 2021);
        assert_eq!(row.country, "FRA");
        assert_eq!(row.medal, MedalType::Gold);
        assert_eq!(row.game, None);
    }

    #[test]
    fn test_normalize_reports_missing_columns() {
        let raw = sheet(&["year", "country", "athlete"], Vec::new());
        match normalize(raw) {
            Err(LoadError::MissingColumns(cols)) => {
                assert_eq!(cols, vec!["medal".to_string(), "discipline".to_string()]);
            }
            other => panic!("expected MissingColumns, got {other:?}"),
        }
    }

    #[test]
    fn test_normalize_year_coercion_and_slug_fallback() {
        let headers = ["slug_game", "year", "country_name", "athlete_full_name", "discipline_title", "medal_type"];
        let raw = sheet(
            &headers,
            vec![
                vec![text("tokyo-2020"), RawCell::Float(2020.0), text("JPN"), text("A"), text("Judo"), text("GOLD")],
                vec![text("rio-2016"), RawCell::Empty, text("BRA"), text("B"), text("Judo"), text("SILVER")],
                vec![text("paris"), text("n/a"), text("FRA"), text("C"), text("Judo"), text("BRONZE")],
                vec![text("athens-2004"), text(" 2004 "), text("GRE"), text("D"), text("Judo"), RawCell::Integer(3)],
            ],
        );
        let table = normalize(raw).unwrap();
        let years: Vec<i32> = table.iter().map(|r| r.year).collect();
        assert_eq!(years, vec![2020, 2016, 2004]);
        assert_eq!(table.rows()[0].game.as_deref(), Some("2020 Tokyo"));
        assert_eq!(table.rows()[2].medal, MedalType::Bronze);
    }

    #[test]
    fn test_normalize_fills_team_and_drops_incomplete_rows() {
        let raw = sheet(
            &["year", "country", "athlete", "discipline", "medal", "event"],
            vec![
                vec![RawCell::Integer(2021), text("USA"), RawCell::Empty, text("Basketball"), text("Gold"), text("  ")],
                vec![RawCell::Integer(2021), RawCell::Empty, text("X"), text("Judo"), text("Gold"), RawCell::Empty],
                vec![RawCell::Integer(2021), text("GBR"), text("Y"), RawCell::Empty, text("Gold"), RawCell::Empty],
                vec![RawCell::Integer(2021), text("GBR"), text("Y"), text("Judo"), text("Tin"), RawCell::Empty],
            ],
        );
        let table = normalize(raw).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.rows()[0].athlete, TEAM_PLACEHOLDER);
        assert_eq!(table.rows()[0].event, None);
    }

    #[test]
    fn test_short_rows_read_as_empty() {
        let raw = sheet(
            &["year", "country", "athlete", "discipline", "medal", "event"],
            vec![vec![RawCell::Integer(2008), text("CHN"), text("Z"), text("Diving"), text("1")]],
        );
        let table = normalize(raw).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.rows()[0].event, None);
    }

    #[test]
    fn test_format_game_and_year_from_game() {
        assert_eq!(format_game("rio-de-janeiro-2016"), "2016 Rio-de-janeiro");
        assert_eq!(format_game("2020 Tokyo"), "2020 Tokyo");
        assert_eq!(year_from_game("beijing-2022"), Some(2022));
        assert_eq!(year_from_game("2022 Beijing"), Some(2022));
        assert_eq!(year_from_game("Beijing"), None);
    }

    #[test]
    fn test_raw_cell_guess() {
        assert_eq!(RawCell::guess(""), RawCell::Empty);
        assert_eq!(RawCell::guess("2021"), RawCell::Integer(2021));
        assert_eq!(RawCell::guess("2021.0"), RawCell::Float(2021.0));
        assert_eq!(RawCell::guess("FRA"), text("FRA"));
    }
}
