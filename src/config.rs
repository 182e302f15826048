use std::ffi::OsString;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Env var naming an alternative config file.
pub const CONFIG_ENV: &str = "MEDAL_BROWSER_CONFIG";
/// Env var overriding the data file path.
pub const DATA_ENV: &str = "MEDAL_BROWSER_DATA";
/// Config file picked up from the working directory when present.
pub const DEFAULT_CONFIG_FILE: &str = "medal-browser.json";

/// Startup settings.  Every field has a default, so a config file only needs
/// the keys it changes.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Spreadsheet loaded at startup.
    pub data_path: PathBuf,
    /// Range the year sliders start at when the range filter is switched on.
    pub default_year_range: (i32, i32),
    /// Bars shown per chart; the rest of the ranking is cut off.
    pub chart_max_bars: usize,
    /// Initial window size in points.
    pub window_size: [f32; 2],
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("data/olympic_medals.xlsx"),
            default_year_range: (2000, 2024),
            chart_max_bars: 30,
            window_size: [1200.0, 800.0],
        }
    }
}

impl AppConfig {
    /// Resolve the configuration from the environment and command line.
    ///
    /// Precedence (highest first): first CLI argument, `MEDAL_BROWSER_DATA`,
    /// config file, defaults.
    pub fn load() -> Result<Self> {
        let file = std::env::var_os(CONFIG_ENV)
            .map(PathBuf::from)
            .or_else(|| {
                let local = PathBuf::from(DEFAULT_CONFIG_FILE);
                local.exists().then_some(local)
            });

        let config = match file {
            Some(path) => Self::load_from(&path)?,
            None => Self::default(),
        };
        Ok(config.with_overrides(std::env::var_os(DATA_ENV), std::env::args_os().nth(1)))
    }

    /// Parse a JSON config file.
    pub fn load_from(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config = serde_json::from_str(&text)
            .with_context(|| format!("parsing config {}", path.display()))?;
        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Apply the env var and command-line data path overrides.
    pub fn with_overrides(mut self, data_env: Option<OsString>, cli_path: Option<OsString>) -> Self {
        if let Some(path) = cli_path.or(data_env) {
            self.data_path = PathBuf::from(path);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.data_path, PathBuf::from("data/olympic_medals.xlsx"));
        assert_eq!(config.default_year_range, (2000, 2024));
        assert_eq!(config.chart_max_bars, 30);
    }

    #[test]
    fn test_load_from_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("medal-browser.json");
        std::fs::write(&path, r#"{ "data_path": "other.csv", "chart_max_bars": 10 }"#).unwrap();

        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config.data_path, PathBuf::from("other.csv"));
        assert_eq!(config.chart_max_bars, 10);
        assert_eq!(config.default_year_range, (2000, 2024));
    }

    #[test]
    fn test_load_from_bad_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("medal-browser.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = AppConfig::load_from(&path).unwrap_err();
        assert!(format!("{err:#}").contains("parsing config"));
    }

    #[test]
    fn test_cli_beats_env_beats_file() {
        let base = AppConfig::default();

        let config = base
            .clone()
            .with_overrides(Some("env.xlsx".into()), Some("cli.csv".into()));
        assert_eq!(config.data_path, PathBuf::from("cli.csv"));

        let config = base.clone().with_overrides(Some("env.xlsx".into()), None);
        assert_eq!(config.data_path, PathBuf::from("env.xlsx"));

        let config = base.clone().with_overrides(None, None);
        assert_eq!(config.data_path, base.data_path);
    }
}
