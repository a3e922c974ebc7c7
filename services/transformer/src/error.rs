//! Error types for the transformer.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// FDA and FSIS are the baseline of the schema; a run cannot proceed
    /// without them.
    #[error("mandatory source {name} not found at {path}")]
    MissingSource { name: &'static str, path: PathBuf },

    #[error("io error reading {path}: {err}")]
    Io {
        path: PathBuf,
        #[source]
        err: std::io::Error,
    },

    #[error("json error in {path}: {err}")]
    Json {
        path: PathBuf,
        #[source]
        err: serde_json::Error,
    },

    #[error("workbook error in {path}: {message}")]
    Workbook { path: PathBuf, message: String },

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("invalid rules file: {0}")]
    Rules(String),

    #[error("invalid date dimension range: {start}..={end}")]
    DateRange { start: i32, end: i32 },
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            err,
        }
    }

    pub fn json(path: impl Into<PathBuf>, err: serde_json::Error) -> Self {
        Self::Json {
            path: path.into(),
            err,
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
