use std::path::Path;
use std::sync::Arc;

use arrow::array::{Array, AsArray};
use arrow::datatypes::{
    DataType, Float32Type, Float64Type, Int16Type, Int32Type, Int64Type, Int8Type, UInt16Type,
    UInt32Type, UInt64Type, UInt8Type,
};
use arrow::util::display::array_value_to_string;
use calamine::{open_workbook_auto, Data, Reader};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use crate::error::LoadError;

use super::model::Table;
use super::normalize::{normalize, RawCell, RawSheet};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a medal table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.xlsx` / `.xlsm` / `.xlsb` / `.xls` / `.ods` – first worksheet, header row first
/// * `.csv`     – header row, one medal per line
/// * `.json`    – `[{ "year": 2021, "country": "FRA", ... }, ...]`
/// * `.parquet` – flat columns, one medal per row
pub fn load_file(path: &Path) -> Result<Table, LoadError> {
    std::fs::metadata(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let sheet = read_sheet(path)?;
    let n_raw = sheet.rows.len();
    let table = normalize(sheet)?;
    log::info!(
        "Loaded {} medals from {} ({} raw rows)",
        table.len(),
        path.display(),
        n_raw
    );
    Ok(table)
}

/// Decode the file into untyped rows without applying the schema.
pub fn read_sheet(path: &Path) -> Result<RawSheet, LoadError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => read_workbook(path),
        "csv" => read_csv(path),
        "json" => read_json(path),
        "parquet" | "pq" => read_parquet(path),
        other => Err(LoadError::UnsupportedFormat(other.to_string())),
    }
}

// ---------------------------------------------------------------------------
// Workbook loader
// ---------------------------------------------------------------------------

/// Reads the first worksheet.  The first row is the header row, which is what
/// `DataFrame.to_excel` writes (including an unnamed index column).
fn read_workbook(path: &Path) -> Result<RawSheet, LoadError> {
    let mut workbook = open_workbook_auto(path)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(LoadError::EmptyWorkbook)??;

    let mut rows = range.rows();
    let headers = match rows.next() {
        Some(header_row) => header_row.iter().map(|c| c.to_string()).collect(),
        None => return Ok(RawSheet::default()),
    };
    let rows = rows
        .map(|row| row.iter().map(workbook_cell).collect())
        .collect();

    Ok(RawSheet { headers, rows })
}

fn workbook_cell(cell: &Data) -> RawCell {
    match cell {
        Data::Int(i) => RawCell::Integer(*i),
        Data::Float(f) => RawCell::Float(*f),
        Data::String(s) => RawCell::Text(s.clone()),
        Data::Bool(b) => RawCell::Bool(*b),
        Data::DateTime(dt) => RawCell::Float(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => RawCell::Text(s.clone()),
        Data::Error(_) | Data::Empty => RawCell::Empty,
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Header row with column names; short rows are padded with empty cells.
fn read_csv(path: &Path) -> Result<RawSheet, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)?;
    let headers: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        rows.push(record.iter().map(RawCell::guess).collect());
    }

    Ok(RawSheet { headers, rows })
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Records-oriented JSON, the default `df.to_json(orient='records')`:
///
/// ```json
/// [
///   { "year": 2021, "country_name": "France", "medal_type": "GOLD", ... },
///   ...
/// ]
/// ```
///
/// The header set is the union of keys, in first-seen order.
fn read_json(path: &Path) -> Result<RawSheet, LoadError> {
    let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let root: JsonValue = serde_json::from_str(&text)?;

    let records = root
        .as_array()
        .ok_or_else(|| LoadError::Malformed("expected top-level JSON array".to_string()))?;

    let mut headers: Vec<String> = Vec::new();
    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .ok_or_else(|| LoadError::Malformed(format!("row {i} is not a JSON object")))?;
        for key in obj.keys() {
            if !headers.contains(key) {
                headers.push(key.clone());
            }
        }
    }

    let rows = records
        .iter()
        .filter_map(|rec| rec.as_object())
        .map(|obj| {
            headers
                .iter()
                .map(|h| obj.get(h).map(json_cell).unwrap_or(RawCell::Empty))
                .collect()
        })
        .collect();

    Ok(RawSheet { headers, rows })
}

fn json_cell(val: &JsonValue) -> RawCell {
    match val {
        JsonValue::String(s) => RawCell::Text(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                RawCell::Integer(i)
            } else if let Some(f) = n.as_f64() {
                RawCell::Float(f)
            } else {
                RawCell::Text(n.to_string())
            }
        }
        JsonValue::Bool(b) => RawCell::Bool(*b),
        JsonValue::Null => RawCell::Empty,
        other => RawCell::Text(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Flat parquet table, as written by `df.to_parquet()` or the
/// `generate_sample` binary.  Nested columns are rendered as text.
fn read_parquet(path: &Path) -> Result<RawSheet, LoadError> {
    let file = std::fs::File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let reader = ParquetRecordBatchReaderBuilder::try_new(file)?.build()?;

    let mut sheet = RawSheet::default();
    for batch_result in reader {
        let batch = batch_result?;
        if sheet.headers.is_empty() {
            sheet.headers = batch
                .schema()
                .fields()
                .iter()
                .map(|f| f.name().clone())
                .collect();
        }
        for row in 0..batch.num_rows() {
            sheet
                .rows
                .push(batch.columns().iter().map(|col| arrow_cell(col, row)).collect());
        }
    }
    Ok(sheet)
}

/// Extract a single cell from an Arrow column at a given row.
fn arrow_cell(col: &Arc<dyn Array>, row: usize) -> RawCell {
    if col.is_null(row) {
        return RawCell::Empty;
    }
    match col.data_type() {
        DataType::Utf8 => RawCell::Text(col.as_string::<i32>().value(row).to_string()),
        DataType::LargeUtf8 => RawCell::Text(col.as_string::<i64>().value(row).to_string()),
        DataType::Int8 => RawCell::Integer(i64::from(col.as_primitive::<Int8Type>().value(row))),
        DataType::Int16 => RawCell::Integer(i64::from(col.as_primitive::<Int16Type>().value(row))),
        DataType::Int32 => RawCell::Integer(i64::from(col.as_primitive::<Int32Type>().value(row))),
        DataType::Int64 => RawCell::Integer(col.as_primitive::<Int64Type>().value(row)),
        DataType::UInt8 => RawCell::Integer(i64::from(col.as_primitive::<UInt8Type>().value(row))),
        DataType::UInt16 => RawCell::Integer(i64::from(col.as_primitive::<UInt16Type>().value(row))),
        DataType::UInt32 => RawCell::Integer(i64::from(col.as_primitive::<UInt32Type>().value(row))),
        DataType::UInt64 => {
            let v = col.as_primitive::<UInt64Type>().value(row);
            i64::try_from(v).map_or_else(|_| RawCell::Text(v.to_string()), RawCell::Integer)
        }
        DataType::Float32 => RawCell::Float(f64::from(col.as_primitive::<Float32Type>().value(row))),
        DataType::Float64 => RawCell::Float(col.as_primitive::<Float64Type>().value(row)),
        DataType::Boolean => RawCell::Bool(col.as_boolean().value(row)),
        // Dictionary (pandas categoricals), dates, decimals: use the display form.
        other => match array_value_to_string(col, row) {
            Ok(text) => RawCell::guess(&text),
            Err(e) => {
                log::warn!("Cannot read {other:?} cell at row {row}: {e}");
                RawCell::Empty
            }
        },
    }
}
