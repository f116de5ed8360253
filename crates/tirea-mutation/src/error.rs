//! Error types for tirea-mutation operations.

use std::collections::TryReserveError;
use thiserror::Error;

/// Result type alias for tirea-mutation operations.
pub type MutationResult<T> = Result<T, MutationError>;

/// Errors that can occur during tirea-mutation operations.
///
/// Structurally missing paths are never an error: reads resolve them to
/// `None` and writes create the missing containers.
#[derive(Debug, Error)]
pub enum MutationError {
    /// Path string could not be tokenized.
    #[error("malformed path {path:?}: {reason}")]
    MalformedPath {
        /// The offending path string.
        path: String,
        /// What the tokenizer rejected.
        reason: String,
    },

    /// A write would extend a sequence too far past its end.
    #[error("index {index} in path {path:?} is too far past the end of a sequence of length {len}")]
    IndexOutOfRange {
        /// The path being written.
        path: String,
        /// The requested index.
        index: usize,
        /// Length of the sequence at the time of the write.
        len: usize,
    },

    /// Growing a sequence failed to allocate.
    #[error("sequence allocation failed: {0}")]
    Allocation(#[from] TryReserveError),

    /// JSON serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl MutationError {
    /// Create a malformed path error.
    #[inline]
    pub fn malformed_path(path: impl Into<String>, reason: impl Into<String>) -> Self {
        MutationError::MalformedPath {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create an index out of range error.
    #[inline]
    pub fn index_out_of_range(path: impl Into<String>, index: usize, len: usize) -> Self {
        MutationError::IndexOutOfRange {
            path: path.into(),
            index,
            len,
        }
    }
}
