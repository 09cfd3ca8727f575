use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AppError {
    MissingInput(String),
    UnreadableFile(String),
    UnsupportedExtension(String),
    ColumnOutOfRange { index: usize, column_count: usize },
    /// Raw values that failed code sanitization, in input order.
    InvalidCode(Vec<String>),
    EmptyMapping,
    Internal(String),
    ValidationError(String),
    ConfigError(String),
    IoError(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::MissingInput(msg) => write!(f, "Missing input: {}", msg),
            AppError::UnreadableFile(msg) => write!(f, "Unreadable file: {}", msg),
            AppError::UnsupportedExtension(name) => {
                write!(f, "Unsupported file extension: {}", name)
            }
            AppError::ColumnOutOfRange {
                index,
                column_count,
            } => write!(
                f,
                "Column index {} out of range (table has {} columns)",
                index, column_count
            ),
            AppError::InvalidCode(raw) => write!(
                f,
                "{} invalid code(s): {}",
                raw.len(),
                raw.join(", ")
            ),
            AppError::EmptyMapping => write!(f, "Mapping table has no valid old/new code pair"),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
            AppError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            AppError::ConfigError(msg) => write!(f, "Config error: {}", msg),
            AppError::IoError(msg) => write!(f, "IO error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::IoError(err.to_string())
    }
}

impl From<figment::Error> for AppError {
    fn from(err: figment::Error) -> Self {
        AppError::ConfigError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
