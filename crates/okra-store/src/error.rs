//! Error types for okra-store.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for okra-store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur in okra-store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    // ========================================================================
    // Collection read errors
    // ========================================================================
    /// A collection read failed.
    #[error("Failed to read collection '{collection}': {message}")]
    CollectionRead {
        collection: String,
        message: String,
    },

    /// The requested collection kind is not served by this backend.
    #[error("Collection '{collection}' is not available in this store")]
    CollectionUnavailable { collection: String },

    // ========================================================================
    // Data file errors
    // ========================================================================
    /// Knowledge data file I/O error.
    #[error("Knowledge data I/O error at {path}: {message}")]
    DataIo { path: PathBuf, message: String },

    /// Knowledge data file parse error.
    #[error("Knowledge data parse error at {path}: {message}")]
    DataParse { path: PathBuf, message: String },

    // ========================================================================
    // General errors
    // ========================================================================
    /// IO error wrapper.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error wrapper.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic internal error.
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl StoreError {
    /// Create a collection read error.
    pub fn collection_read(collection: impl Into<String>, message: impl Into<String>) -> Self {
        Self::CollectionRead {
            collection: collection.into(),
            message: message.into(),
        }
    }

    /// Create a data I/O error.
    pub fn data_io(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::DataIo {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a data parse error.
    pub fn data_parse(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::DataParse {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}
