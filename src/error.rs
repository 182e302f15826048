use std::path::PathBuf;

use thiserror::Error;

/// Failures while turning a source file into a [`Table`](crate::data::model::Table).
///
/// All of these are fatal at startup: without a table there is nothing to browse.
#[derive(Error, Debug)]
pub enum LoadError {
    /// The source could not be opened or read.
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unsupported file extension: .{0}")]
    UnsupportedFormat(String),

    #[error("Failed to parse CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to read parquet: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("Failed to decode arrow batch: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("Failed to read workbook: {0}")]
    Workbook(#[from] calamine::Error),

    #[error("Workbook contains no worksheets")]
    EmptyWorkbook,

    /// The file parsed but its shape is not a table of records.
    #[error("Malformed source: {0}")]
    Malformed(String),

    /// One or more required columns have no matching header.
    #[error("Missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),
}

/// A column reference that does not name a known column, or names one that
/// cannot take the requested operation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidColumnError {
    #[error("Unknown column '{0}'")]
    Unknown(String),

    #[error("Column '{0}' does not support range filters")]
    NotRangeable(String),
}

impl InvalidColumnError {
    /// The offending column name.
    pub fn column(&self) -> &str {
        match self {
            InvalidColumnError::Unknown(name) | InvalidColumnError::NotRangeable(name) => name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_error_display_io() {
        let err = LoadError::Io {
            path: PathBuf::from("data/olympic_medals.xlsx"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        };
        let msg = err.to_string();
        assert!(msg.contains("data/olympic_medals.xlsx"));
        assert!(msg.contains("no such file"));
    }

    #[test]
    fn test_load_error_display_missing_columns() {
        let err = LoadError::MissingColumns(vec!["year".to_string(), "medal".to_string()]);
        assert_eq!(err.to_string(), "Missing required columns: year, medal");
    }

    #[test]
    fn test_load_error_from_serde_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("{oops}").unwrap_err();
        let err: LoadError = json_err.into();
        assert!(err.to_string().starts_with("Failed to parse JSON"));
    }

    #[test]
    fn test_invalid_column_names_offender() {
        let err = InvalidColumnError::Unknown("colour".to_string());
        assert_eq!(err.column(), "colour");
        assert_eq!(err.to_string(), "Unknown column 'colour'");

        let err = InvalidColumnError::NotRangeable("country".to_string());
        assert_eq!(err.column(), "country");
    }
}
