use common::storage::StorageError;
use thiserror::Error;

/// Failures of a capture photo upload. Every variant aborts the upload with
/// no partial result.
#[derive(Debug, Error)]
pub enum PhotoStoreError {
    /// Missing or malformed bytes or metadata. The caller can fix and retry.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The bytes are not an image in a supported format.
    #[error("unsupported image format: {0}")]
    UnsupportedFormat(String),

    /// The blob store could not be opened. A server-side configuration problem.
    #[error("photo store unavailable: {0}")]
    StorageUnavailable(#[source] StorageError),

    /// A blob store or database write failed at runtime.
    #[error("storage failure: {0}")]
    StorageFailure(String),
}

impl From<super::photo::PhotoError> for PhotoStoreError {
    fn from(err: super::photo::PhotoError) -> Self {
        use super::photo::PhotoError;
        match err {
            PhotoError::UnsupportedFormat(msg) => Self::UnsupportedFormat(msg),
            PhotoError::Invalid(msg) => Self::InvalidInput(msg),
        }
    }
}
