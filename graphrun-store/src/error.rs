//! Storage-layer failures.

use graphrun_utils::Error;
use thiserror::Error as ThisError;
use uuid::Uuid;

/// Errors raised below the engine, at the persistence boundary.
#[derive(Debug, ThisError)]
pub enum StoreError {
    /// A freshly generated run identifier collided with a recorded run.
    #[error("run `{0}` already recorded")]
    DuplicateRun(Uuid),

    /// Failed to encode a record for storage.
    #[error("serialization failed: {0}")]
    Serde(#[from] serde_json::Error),
}

impl From<StoreError> for Error {
    fn from(e: StoreError) -> Self {
        Error::storage(e.to_string())
    }
}
