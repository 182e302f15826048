use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use arrow::util::pretty::pretty_format_batches;
use medal_browser::data::model::MedalType;
use parquet::arrow::ArrowWriter;

const GAMES: [&str; 6] = [
    "sydney-2000",
    "athens-2004",
    "beijing-2008",
    "london-2012",
    "rio-2016",
    "tokyo-2020",
];

const COUNTRIES: [&str; 8] = [
    "France",
    "United States of America",
    "Japan",
    "Kenya",
    "Germany",
    "Brazil",
    "Australia",
    "Norway",
];

/// (discipline, event, participant type)
const EVENTS: [(&str, &str, &str); 6] = [
    ("Judo", "-73 kg", "Athlete"),
    ("Swimming", "100m freestyle", "Athlete"),
    ("Athletics", "Marathon", "Athlete"),
    ("Rowing", "Eight", "GameTeam"),
    ("Fencing", "Sabre Team", "GameTeam"),
    ("Cycling Track", "Keirin", "Athlete"),
];

const GIVEN: [&str; 6] = ["Anna", "Ben", "Chloe", "Daniel", "Eva", "Felix"];
const FAMILY: [&str; 6] = ["MARTIN", "SMITH", "TANAKA", "KIPTUM", "MULLER", "SILVA"];

/// Deterministic 64-bit generator (splitmix64); reproducible across runs.
struct SplitMix(u64);

impl SplitMix {
    fn next(&mut self) -> u64 {
        self.0 = self.0.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.0;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[(self.next() % items.len() as u64) as usize]
    }
}

#[derive(Default)]
struct Columns {
    slug_game: Vec<String>,
    year: Vec<i64>,
    medal_type: Vec<String>,
    athlete_full_name: Vec<Option<String>>,
    country_name: Vec<String>,
    discipline_title: Vec<String>,
    event_title: Vec<String>,
    event_gender: Vec<String>,
    participant_type: Vec<String>,
}

fn main() -> Result<()> {
    let output_path = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("sample_medals.parquet"));

    let mut rng = SplitMix(42);
    let mut cols = Columns::default();

    for game in GAMES {
        let year: i64 = game
            .rsplit_once('-')
            .and_then(|(_, y)| y.parse().ok())
            .context("sample game slug without a year")?;

        for (discipline, event, participant_type) in EVENTS {
            let gender = *rng.pick(&["Men", "Women", "Mixed"]);
            for medal in MedalType::ALL {
                let athlete = (participant_type == "Athlete")
                    .then(|| format!("{} {}", rng.pick(&FAMILY), rng.pick(&GIVEN)));

                cols.slug_game.push(game.to_string());
                cols.year.push(year);
                cols.medal_type.push(medal.label().to_ascii_uppercase());
                cols.athlete_full_name.push(athlete);
                cols.country_name.push(rng.pick(&COUNTRIES).to_string());
                cols.discipline_title.push(discipline.to_string());
                cols.event_title.push(event.to_string());
                cols.event_gender.push(gender.to_string());
                cols.participant_type.push(participant_type.to_string());
            }
        }
    }

    let n_rows = cols.year.len();
    let utf8 = |values: Vec<String>| -> ArrayRef { Arc::new(StringArray::from(values)) };

    let schema = Arc::new(Schema::new(vec![
        Field::new("slug_game", DataType::Utf8, false),
        Field::new("year", DataType::Int64, false),
        Field::new("medal_type", DataType::Utf8, false),
        Field::new("athlete_full_name", DataType::Utf8, true),
        Field::new("country_name", DataType::Utf8, false),
        Field::new("discipline_title", DataType::Utf8, false),
        Field::new("event_title", DataType::Utf8, false),
        Field::new("event_gender", DataType::Utf8, false),
        Field::new("participant_type", DataType::Utf8, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            utf8(cols.slug_game),
            Arc::new(Int64Array::from(cols.year)),
            utf8(cols.medal_type),
            Arc::new(StringArray::from(cols.athlete_full_name)),
            utf8(cols.country_name),
            utf8(cols.discipline_title),
            utf8(cols.event_title),
            utf8(cols.event_gender),
            utf8(cols.participant_type),
        ],
    )
    .context("building record batch")?;

    let file = std::fs::File::create(&output_path)
        .with_context(|| format!("creating {}", output_path.display()))?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing batch")?;
    writer.close().context("closing parquet writer")?;

    println!("{}", pretty_format_batches(&[batch.slice(0, n_rows.min(5))])?);
    println!("Wrote {n_rows} medals to {}", output_path.display());
    Ok(())
}
