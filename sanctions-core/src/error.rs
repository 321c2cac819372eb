use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SanctionError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Config error: {0}")]
    Config(#[from] serde_yaml::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Sanction '{id}' not found")]
    SanctionNotFound { id: String },

    #[error("Unknown export format '{format}' (expected csv or json)")]
    UnknownFormat { format: String },
}

impl SanctionError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type SanctionResult<T> = Result<T, SanctionError>;
