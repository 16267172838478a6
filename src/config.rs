//! Runtime configuration read from the environment (and `.env`, via `dotenvy`).

use std::path::PathBuf;

pub const DEFAULT_LOG_FILE_PATH: &str = "logs/divvy_trips.log";
pub const DEFAULT_TRIPS_DATA_PATH: &str = "202004-divvy-tripdata_clean.csv";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Where the JSON log file rolls daily.
    pub log_file_path: PathBuf,
    /// Trip file used when a command is not given one explicitly.
    pub trips_data_path: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_file_path: PathBuf::from(DEFAULT_LOG_FILE_PATH),
            trips_data_path: PathBuf::from(DEFAULT_TRIPS_DATA_PATH),
        }
    }
}

impl AppConfig {
    /// Reads `LOG_FILE_PATH` and `TRIPS_DATA_PATH`, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Self {
            log_file_path: non_empty("LOG_FILE_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.log_file_path),
            trips_data_path: non_empty("TRIPS_DATA_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.trips_data_path),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults_when_unset() {
        let config = AppConfig::from_lookup(|_| None);
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_values_from_lookup() {
        let vars: HashMap<&str, &str> = [
            ("LOG_FILE_PATH", "/var/log/trips.log"),
            ("TRIPS_DATA_PATH", "data/202005.csv"),
        ]
        .into_iter()
        .collect();

        let config = AppConfig::from_lookup(|k| vars.get(k).map(|v| v.to_string()));

        assert_eq!(config.log_file_path, PathBuf::from("/var/log/trips.log"));
        assert_eq!(config.trips_data_path, PathBuf::from("data/202005.csv"));
    }

    #[test]
    fn test_blank_values_fall_back() {
        let config = AppConfig::from_lookup(|_| Some("  ".to_string()));
        assert_eq!(config, AppConfig::default());
    }
}
