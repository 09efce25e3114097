//! Error types for okra-core.
//!
//! Note that the query pipeline itself never surfaces these to callers:
//! `answer_query` converts every internal failure into a degraded-but-valid
//! response. `OkraError` covers the operations around the pipeline -
//! configuration loading, engine construction, store access from the CLI.

use thiserror::Error;

/// Domain-specific errors for OKRA operations.
#[derive(Debug, Error)]
pub enum OkraError {
    /// Global configuration file is invalid.
    #[error("Global config invalid: {0}")]
    InvalidGlobalConfig(String),

    /// A configuration value is invalid.
    ///
    /// Used for validation errors detected at runtime (e.g., a zero
    /// collection limit).
    #[error("Invalid configuration: {message}. {hint}")]
    InvalidConfiguration {
        /// Description of the invalid configuration.
        message: String,
        /// Actionable hint on how to fix it.
        hint: String,
    },

    /// Invalid argument provided to an operation.
    #[error("{0}")]
    InvalidArgument(String),

    /// A collection read failed.
    ///
    /// Logged and swallowed inside retrieval; surfaced only by direct store
    /// operations (e.g., CLI collection listings).
    #[error("Failed to read collection '{collection}': {reason}")]
    CollectionRead {
        /// The collection that failed.
        collection: String,
        /// Description of the failure.
        reason: String,
    },

    /// A notification could not be delivered.
    #[error("Failed to deliver alert '{title}': {reason}")]
    AlertDelivery {
        /// The alert title.
        title: String,
        /// Description of the failure.
        reason: String,
    },

    /// Knowledge store error.
    #[error("Store error: {0}")]
    Store(#[from] okra_store::StoreError),

    /// Model capability error.
    #[error("Model error: {0}")]
    Model(#[from] okra_model::ModelError),

    /// An I/O error occurred.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML serialization/deserialization error.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A wrapped generic error.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
