//! Runtime configuration
//!
//! Values come from the process environment, optionally seeded from a `.env`
//! file. Everything downstream receives a [`Config`] instead of reading the
//! environment itself.
//!
//! | Variable        | Default              |
//! |-----------------|----------------------|
//! | `DB_URL`        | `sqlite:///sales.db` |
//! | `RAW_DATA_PATH` | `data/raw/sales.csv` |
//! | `LOG_FILE`      | `logs/etl.log`       |
//! | `LOG_MAX_BYTES` | `1048576`            |
//! | `LOG_MAX_FILES` | `5`                  |
//! | `LOG_LEVEL`     | `info`               |

use eyre::{Context, Result};
use std::path::PathBuf;
use std::str::FromStr;

/// Name of the destination table
pub const SALES_TABLE: &str = "sales";

pub const DEFAULT_DB_URL: &str = "sqlite:///sales.db";
pub const DEFAULT_RAW_DATA_PATH: &str = "data/raw/sales.csv";
pub const DEFAULT_LOG_FILE: &str = "logs/etl.log";
pub const DEFAULT_LOG_MAX_BYTES: usize = 1024 * 1024;
pub const DEFAULT_LOG_MAX_FILES: usize = 5;
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Log output settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// Log file, rotated once a write has pushed it past `max_bytes`
    pub file: PathBuf,
    pub max_bytes: usize,
    /// Rotated files kept as `file.1` .. `file.N`, at least one
    pub max_files: usize,
    /// Fallback `env_logger` filter, e.g. `info` or `sales_etl=debug`
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            file: PathBuf::from(DEFAULT_LOG_FILE),
            max_bytes: DEFAULT_LOG_MAX_BYTES,
            max_files: DEFAULT_LOG_MAX_FILES,
            level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Destination connection string
    pub db_url: String,
    /// CSV file to load
    pub raw_data_path: PathBuf,
    pub table: String,
    pub log: LogConfig,
}

impl Config {
    pub fn new(db_url: impl Into<String>, raw_data_path: impl Into<PathBuf>) -> Self {
        Self {
            db_url: db_url.into(),
            raw_data_path: raw_data_path.into(),
            table: SALES_TABLE.to_string(),
            log: LogConfig::default(),
        }
    }

    /// Read configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup`, falling back to defaults
    ///
    /// # Errors
    /// Returns an error if a numeric variable does not parse
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let db_url = lookup("DB_URL").unwrap_or_else(|| DEFAULT_DB_URL.to_string());
        let raw_data_path = lookup("RAW_DATA_PATH").unwrap_or_else(|| DEFAULT_RAW_DATA_PATH.into());

        let log = LogConfig {
            file: lookup("LOG_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE)),
            max_bytes: parse_var(&lookup, "LOG_MAX_BYTES", DEFAULT_LOG_MAX_BYTES)?,
            max_files: parse_var(&lookup, "LOG_MAX_FILES", DEFAULT_LOG_MAX_FILES)?,
            level: lookup("LOG_LEVEL").unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
        };

        Ok(Self {
            db_url,
            raw_data_path: PathBuf::from(raw_data_path),
            table: SALES_TABLE.to_string(),
            log,
        })
    }
}

fn parse_var<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("Invalid {}: {}", key, raw)),
        None => Ok(default),
    }
}

/// Load `.env` from the working directory or its parents if one exists
///
/// Returns the path that was loaded. Variables already set in the process
/// environment win over the file.
pub fn load_dotenv() -> Result<Option<PathBuf>> {
    match dotenvy::dotenv() {
        Ok(path) => Ok(Some(path)),
        Err(e) if e.not_found() => Ok(None),
        Err(e) => Err(e).context("Failed to load .env file"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(|_| None).unwrap();
        assert_eq!(config.db_url, DEFAULT_DB_URL);
        assert_eq!(config.raw_data_path, PathBuf::from(DEFAULT_RAW_DATA_PATH));
        assert_eq!(config.table, "sales");
        assert_eq!(config.log, LogConfig::default());
        assert_eq!(config.log.max_bytes, 1_048_576);
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("DB_URL", "sqlite:////var/lib/etl/warehouse.db"),
            ("RAW_DATA_PATH", "/srv/data/sales.csv"),
            ("LOG_FILE", "/var/log/etl.log"),
            ("LOG_MAX_BYTES", " 2048 "),
            ("LOG_MAX_FILES", "2"),
            ("LOG_LEVEL", "debug"),
        ]))
        .unwrap();

        assert_eq!(config.db_url, "sqlite:////var/lib/etl/warehouse.db");
        assert_eq!(config.raw_data_path, PathBuf::from("/srv/data/sales.csv"));
        assert_eq!(config.log.file, PathBuf::from("/var/log/etl.log"));
        assert_eq!(config.log.max_bytes, 2048);
        assert_eq!(config.log.max_files, 2);
        assert_eq!(config.log.level, "debug");
    }

    #[test]
    fn test_invalid_number() {
        let err = Config::from_lookup(lookup_from(&[("LOG_MAX_BYTES", "1MB")])).unwrap_err();
        assert!(err.to_string().contains("LOG_MAX_BYTES"));
    }

    #[test]
    #[serial]
    fn test_from_env() {
        // SAFETY: serialized with every other test that touches the environment
        unsafe {
            std::env::set_var("DB_URL", "sqlite:///from_env.db");
            std::env::remove_var("RAW_DATA_PATH");
        }

        let config = Config::from_env().unwrap();
        assert_eq!(config.db_url, "sqlite:///from_env.db");
        assert_eq!(config.raw_data_path, PathBuf::from(DEFAULT_RAW_DATA_PATH));

        unsafe {
            std::env::remove_var("DB_URL");
        }
    }
}
