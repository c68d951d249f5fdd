//! Error types for the vacancies CLI
//!
//! One error enum covers every failure category the application can hit:
//! talking to hh.ru, decoding payloads, reading or writing local files and
//! producing exports. Callers match on the variant to tell "no results"
//! apart from "the disk write failed".

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while fetching, storing or exporting vacancies
#[derive(Debug, Error)]
pub enum VacancyError {
    /// HTTP request could not be sent or its body could not be read
    #[error("HTTP request failed: {0}")]
    Network(#[from] reqwest::Error),

    /// The API answered with a non-success status code
    #[error("API returned HTTP {status} for {url}")]
    Http { status: u16, url: String },

    /// Failed to parse JSON
    #[error("Failed to parse JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// A required field is absent from a record mapping or API item
    #[error("Missing required field: {0}")]
    MissingField(String),

    /// Reading or writing a local file failed
    #[error("Storage error at {}: {source}", path.display())]
    Storage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Export writer failed
    #[error("Export failed: {0}")]
    Export(String),

    /// There are no stored vacancies to export
    #[error("No data to export")]
    NothingToExport,

    /// User input could not be turned into a valid request
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl VacancyError {
    /// Wraps an I/O error together with the path it happened on
    pub fn storage(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        VacancyError::Storage {
            path: path.into(),
            source,
        }
    }
}

impl From<csv::Error> for VacancyError {
    fn from(err: csv::Error) -> Self {
        VacancyError::Export(err.to_string())
    }
}

impl From<rust_xlsxwriter::XlsxError> for VacancyError {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        VacancyError::Export(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, VacancyError>;
