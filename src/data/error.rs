use std::io;
use std::path::PathBuf;

use thiserror::Error;

use super::model::{Category, Period};

/// The dataset source could not be read or is malformed. Fatal for the load
/// attempt; there is no retry since the source is static.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("unsupported file extension '.{0}' (expected .csv or .json)")]
    UnsupportedExtension(String),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("missing required column '{0}'")]
    MissingColumn(&'static str),

    #[error("row {row}: {message}")]
    BadRow { row: usize, message: String },

    #[error("duplicate entry for '{indicator}' ({category}, {period})")]
    Duplicate {
        period: Period,
        category: Category,
        indicator: String,
    },

    #[error("dataset contains no rows")]
    Empty,
}

/// An invalid filter selection. The UI clamps ranges and only offers known
/// indicators, so these surface only on programmatic misuse.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectionError {
    #[error("year range {start} to {end} is inverted")]
    InvalidYearRange { start: u16, end: u16 },

    #[error("unknown {category} indicator '{indicator}'")]
    UnknownIndicator {
        category: Category,
        indicator: String,
    },
}

/// Export failed. Surfaced to the user as a status message; the session
/// continues.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// Reported instead of silently producing an empty file, so the user is
    /// told there is nothing to export.
    #[error("nothing to export: the filtered table is empty")]
    EmptyTable,

    #[error("csv encoding failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("csv buffer error: {0}")]
    Io(#[from] io::Error),

    #[error("xlsx encoding failed: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),
}
