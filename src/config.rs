//! Application configuration
//!
//! Holds the API constants, limits and resolved filesystem locations used by
//! the rest of the application. Paths are resolved from an explicit directory
//! (CLI flag or `VACANCIES_DATA_DIR`), falling back to the XDG data directory
//! and finally to `./data`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;

/// Base URL of the hh.ru vacancy search endpoint
pub const HH_API_BASE_URL: &str = "https://api.hh.ru/vacancies";

/// hh.ru rejects requests without a descriptive User-Agent
pub const HH_API_USER_AGENT: &str = concat!("vacancies-cli/", env!("CARGO_PKG_VERSION"));

/// Area code for the whole of Russia in the hh.ru API
pub const HH_API_AREA_RUSSIA: u32 = 113;

/// Upper bound for vacancies requested in one search
pub const MAX_VACANCIES_PER_REQUEST: usize = 100;

/// Vacancies requested when the user doesn't give a count
pub const DEFAULT_SEARCH_COUNT: usize = 20;

pub const DEFAULT_EXCEL_FILENAME: &str = "vacancies.xlsx";
pub const DEFAULT_CSV_FILENAME: &str = "vacancies.csv";
pub const DEFAULT_JSON_FILENAME: &str = "vacancies_export.json";

/// Runtime configuration shared by the manager, the fetcher and the CLI
#[derive(Debug, Clone)]
pub struct Config {
    /// Root directory for all local files
    pub data_dir: PathBuf,
    /// JSON document holding the stored vacancies
    pub data_file: PathBuf,
    /// Directory receiving exported files
    pub exports_dir: PathBuf,
    /// Log file written by the fern dispatcher
    pub log_file: PathBuf,
    pub api_base_url: String,
    pub api_timeout: Duration,
    pub api_user_agent: String,
    pub default_area: u32,
    pub max_per_request: usize,
    pub default_count: usize,
    /// Maximum number of memoized filter results
    pub cache_capacity: usize,
    /// Age after which a memoized filter result is discarded
    pub cache_ttl: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self::with_data_dir(default_data_dir())
    }
}

impl Config {
    /// Builds a configuration from an optional explicit data directory
    ///
    /// `None` means "use the platform default" (see [`default_data_dir`]).
    pub fn resolve(data_dir: Option<PathBuf>) -> Self {
        match data_dir {
            Some(dir) => Self::with_data_dir(dir),
            None => Self::default(),
        }
    }

    /// Creates a configuration rooted at the given directory
    pub fn with_data_dir(data_dir: impl AsRef<Path>) -> Self {
        let data_dir = data_dir.as_ref().to_path_buf();
        Self {
            data_file: data_dir.join("vacancies.json"),
            exports_dir: data_dir.join("exports"),
            log_file: data_dir.join("logs").join("vacancies.log"),
            data_dir,
            api_base_url: HH_API_BASE_URL.to_string(),
            api_timeout: Duration::from_secs(30),
            api_user_agent: HH_API_USER_AGENT.to_string(),
            default_area: HH_API_AREA_RUSSIA,
            max_per_request: MAX_VACANCIES_PER_REQUEST,
            default_count: DEFAULT_SEARCH_COUNT,
            cache_capacity: 1000,
            cache_ttl: Duration::from_secs(300),
        }
    }

    /// Clamps a requested search size to `1..=max_per_request`
    pub fn clamp_count(&self, count: usize) -> usize {
        count.clamp(1, self.max_per_request)
    }
}

/// Returns the XDG data directory (`~/.local/share/vacancies` on Linux),
/// or `./data` when no home directory can be determined.
pub fn default_data_dir() -> PathBuf {
    ProjectDirs::from("", "", "vacancies")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("data"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_data_dir_places_files_under_root() {
        let config = Config::with_data_dir("/tmp/vac");
        assert_eq!(config.data_file, PathBuf::from("/tmp/vac/vacancies.json"));
        assert_eq!(config.exports_dir, PathBuf::from("/tmp/vac/exports"));
        assert!(config.log_file.ends_with("logs/vacancies.log"));
    }

    #[test]
    fn test_clamp_count() {
        let config = Config::with_data_dir("/tmp/vac");
        assert_eq!(config.clamp_count(0), 1);
        assert_eq!(config.clamp_count(20), 20);
        assert_eq!(config.clamp_count(100), 100);
        assert_eq!(config.clamp_count(250), 100);
    }

    #[test]
    fn test_defaults_match_api_limits() {
        let config = Config::resolve(Some(PathBuf::from("/tmp/vac")));
        assert_eq!(config.default_area, 113);
        assert_eq!(config.cache_capacity, 1000);
        assert_eq!(config.cache_ttl, Duration::from_secs(300));
        assert_eq!(config.api_timeout, Duration::from_secs(30));
        assert!(config.api_user_agent.starts_with("vacancies-cli/"));
    }

    #[test]
    fn test_default_data_dir_mentions_project() {
        let dir = default_data_dir();
        let path_str = dir.to_string_lossy();
        // Either the XDG dir or the ./data fallback
        assert!(path_str.contains("vacancies") || path_str == "data");
    }
}
