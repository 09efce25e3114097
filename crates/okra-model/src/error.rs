//! Error types for okra-model.
//!
//! Backend errors are deliberately descriptive: the answer engine treats any
//! of them as "capability unavailable" and falls back, but the message still
//! ends up in the logs and should say what actually went wrong.

use thiserror::Error;

/// Result type alias for okra-model operations.
pub type ModelResult<T> = Result<T, ModelError>;

/// Errors that can occur in okra-model operations.
#[derive(Debug, Error)]
pub enum ModelError {
    // ========================================================================
    // Provider errors
    // ========================================================================
    /// Provider not available (feature disabled or unsupported).
    #[error("Provider '{provider}' not available: {reason}")]
    ProviderNotAvailable { provider: String, reason: String },

    /// The API key environment variable is not set.
    #[error("API key not found: environment variable '{env}' is not set")]
    MissingApiKey { env: String },

    // ========================================================================
    // Request errors
    // ========================================================================
    /// The HTTP request itself failed (network, DNS, timeout).
    #[error("Request to {endpoint} failed: {message}")]
    RequestFailed { endpoint: String, message: String },

    /// The backend answered with a non-success status.
    #[error("API error from {endpoint} (status {status}): {message}")]
    ApiError {
        endpoint: String,
        status: u16,
        message: String,
    },

    /// The backend answered 2xx but the body was not the expected shape.
    #[error("Invalid response from {endpoint}: {message}")]
    InvalidResponse { endpoint: String, message: String },

    // ========================================================================
    // Capability errors
    // ========================================================================
    /// Embedding generation failed.
    #[error("Embedding failed for model '{model_id}': {message}")]
    EmbeddingFailed { model_id: String, message: String },

    /// Text generation failed.
    #[error("Generation failed for model '{model_id}': {message}")]
    GenerationFailed { model_id: String, message: String },

    // ========================================================================
    // I/O errors
    // ========================================================================
    /// JSON parsing error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ModelError {
    /// Create a request failed error.
    pub fn request_failed(endpoint: impl Into<String>, message: impl Into<String>) -> Self {
        Self::RequestFailed {
            endpoint: endpoint.into(),
            message: message.into(),
        }
    }

    /// Create an invalid response error.
    pub fn invalid_response(endpoint: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidResponse {
            endpoint: endpoint.into(),
            message: message.into(),
        }
    }

    /// Create an embedding failed error.
    pub fn embedding_failed(model_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::EmbeddingFailed {
            model_id: model_id.into(),
            message: message.into(),
        }
    }

    /// Create a generation failed error.
    pub fn generation_failed(model_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::GenerationFailed {
            model_id: model_id.into(),
            message: message.into(),
        }
    }
}
