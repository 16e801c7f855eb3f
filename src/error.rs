use std::io;
use thiserror::Error;

use crate::manifest::RejectReason;

#[derive(Error, Debug)]
pub enum MigrateError {
    #[error("I/O error: {0}")]
    IoError(#[from] io::Error), // Converts io::Error into MigrateError automatically

    #[error("Manifest parsing error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    ConfigError(#[from] Box<figment::Error>),

    #[error("Logger error: {0}")]
    LoggerError(#[from] flexi_logger::FlexiLoggerError),

    #[error("No items exist in the manifest")]
    EmptyManifest,

    #[error("Record {id} rejected: {reason}")]
    Rejected { id: i64, reason: RejectReason },

    #[error("Error: {0}")]
    Error(String), // Allows custom application errors
}
