use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, GenError>;

/// Everything that can stop script generation.
///
/// All variants are raised before the writer runs, except `Io`.
#[derive(Error, Debug)]
pub enum GenError {
    /// Non-numeric or zero where a positive number was expected.
    #[error("please input a positive number: {0}")]
    InvalidInput(String),

    /// Malformed or out-of-bounds core range.
    #[error("please input a valid range: {0}")]
    InvalidRange(String),

    #[error("please input a command to run the workload")]
    MissingCommand,

    /// Unrecognized answer to a select-style question.
    #[error("invalid choice {got:?}, expected one of: {expected}")]
    InvalidChoice { got: String, expected: String },

    /// Missing or malformed entries in a YAML config.
    #[error("config error: {0}")]
    Config(String),

    #[error("{path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl GenError {
    pub fn range(message: impl Into<String>) -> Self {
        Self::InvalidRange(message.into())
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
