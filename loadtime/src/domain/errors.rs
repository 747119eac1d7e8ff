//! Structured error types for loadtime
//!
//! Using thiserror for automatic Display implementation and error chaining.
//! Load failures themselves are [`loadtime_host::LoadError`].

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Nothing to export: no loads were recorded")]
    NoRecords,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Failed to write report: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
