//! Error types for the taxabund library.

use crate::data::Rank;
use thiserror::Error;

/// Main error type for the library.
#[derive(Error, Debug)]
pub enum AbundError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("YAML serialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Malformed input: {0}")]
    MalformedInput(String),

    #[error("Unknown taxonomic rank '{0}'")]
    InvalidRank(String),

    #[error("Empty result: {0}")]
    EmptyResult(String),

    #[error("Rank mismatch: cannot compare {left} against {right}")]
    RankMismatch { left: Rank, right: Rank },

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

/// Result type alias for library operations.
pub type Result<T> = std::result::Result<T, AbundError>;
