use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ReferenceError>;

#[derive(Error, Debug)]
pub enum ReferenceError {
    /// Dataset could not be loaded; every lookup through the handle fails
    #[error("Reference dataset unavailable at {}: {reason}", path.display())]
    DatasetUnavailable { path: PathBuf, reason: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Dataset contains no food record array")]
    MissingRecords,

    #[error(transparent)]
    Search(#[from] bitebot_search::SearchError),
}
