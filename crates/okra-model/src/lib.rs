//! # okra-model
//!
//! Model capability layer for OKRA - embedding and text generation.
//!
//! This crate is the single source of truth for external model access in
//! OKRA. It provides:
//!
//! - **Embedding backends**: turn free text into dense vectors
//! - **Generation backends**: produce answer text from a prompt
//! - **Unified config**: provider, endpoint, model id, timeout
//!
//! ## Design Principles
//!
//! 1. **Production-only**: No mock implementations. Test doubles live in
//!    consuming crates.
//! 2. **Provider-agnostic**: Traits don't leak HTTP or wire details.
//! 3. **Failure is normal**: Every call can fail (network, auth, quota,
//!    timeout); callers are expected to catch and degrade.
//!
//! ## Features
//!
//! - `http` (default): OpenAI-compatible HTTP backends via reqwest
//!
//! ## Usage
//!
//! ```ignore
//! use okra_model::{create_embedding_backend, EmbeddingConfig};
//!
//! let config = EmbeddingConfig::default();
//! let backend = create_embedding_backend(&config)?;
//! let vector = backend.embed("quarterly churn drivers")?;
//! ```

pub mod config;
pub mod error;

#[cfg(feature = "http")]
mod http;

// Re-export error types
pub use error::{ModelError, ModelResult};

// Re-export config types (canonical source of truth)
pub use config::{
    EmbeddingConfig, GenerationConfig, ProviderKind, DEFAULT_EMBEDDING_TIMEOUT_SECS,
    DEFAULT_GENERATION_TIMEOUT_SECS,
};

/// Default embedding model identifier.
pub const DEFAULT_EMBEDDING_MODEL_ID: &str = "text-embedding-3-small";

/// Default generation model identifier.
pub const DEFAULT_GENERATION_MODEL_ID: &str = "gpt-4o-mini";

// ============================================================================
// Embedding Backend Trait
// ============================================================================

/// Trait for embedding backends.
///
/// Generates dense vector embeddings from text inputs, to be compared with
/// cosine similarity.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` to allow use across threads.
pub trait EmbeddingBackend: Send + Sync + std::fmt::Debug {
    /// Generate an embedding for one text.
    ///
    /// # Errors
    ///
    /// Any transport, auth, or decoding failure. Callers are expected to
    /// treat an error as "capability unavailable" and fall back.
    fn embed(&self, text: &str) -> ModelResult<Vec<f32>>;

    /// Generate embeddings for a batch of texts.
    ///
    /// The default implementation embeds one text at a time.
    fn embed_batch(&self, texts: &[String]) -> ModelResult<Vec<Vec<f32>>> {
        texts.iter().map(|t| self.embed(t)).collect()
    }

    /// The embedding dimension, if the backend knows it up front.
    fn dimension(&self) -> Option<usize>;

    /// The model identifier.
    fn model_id(&self) -> &str;
}

// ============================================================================
// Generation Backend Trait
// ============================================================================

/// Trait for text generation backends.
pub trait GenerationBackend: Send + Sync + std::fmt::Debug {
    /// Generate text from a prompt, one-shot.
    ///
    /// # Arguments
    ///
    /// * `prompt` - The full prompt (instructions + context + question).
    /// * `max_tokens` - Upper bound on generated tokens.
    /// * `temperature` - Sampling temperature; callers pass low values for
    ///   factual output.
    fn generate(&self, prompt: &str, max_tokens: u32, temperature: f32) -> ModelResult<String>;

    /// Cheap availability probe.
    ///
    /// Returns `true` if the backend is reachable and credentialed right now.
    /// This exists so orchestrators can decide on a degraded path up front
    /// instead of discovering the outage mid-pipeline.
    fn is_available(&self) -> bool;

    /// The model identifier.
    fn model_id(&self) -> &str;
}

// ============================================================================
// Factory Functions
// ============================================================================

/// Create an embedding backend from configuration.
///
/// # Errors
///
/// Returns [`ModelError::ProviderNotAvailable`] when the `http` feature is
/// disabled.
#[cfg(feature = "http")]
pub fn create_embedding_backend(config: &EmbeddingConfig) -> ModelResult<Box<dyn EmbeddingBackend>> {
    let backend = http::HttpEmbeddingBackend::new(config.clone())?;
    Ok(Box::new(backend))
}

#[cfg(not(feature = "http"))]
pub fn create_embedding_backend(config: &EmbeddingConfig) -> ModelResult<Box<dyn EmbeddingBackend>> {
    Err(ModelError::ProviderNotAvailable {
        provider: config.provider.to_string(),
        reason: "No embedding providers available. Enable the 'http' feature.".to_string(),
    })
}

/// Create a generation backend from configuration.
///
/// # Errors
///
/// Returns [`ModelError::ProviderNotAvailable`] when the `http` feature is
/// disabled.
#[cfg(feature = "http")]
pub fn create_generation_backend(
    config: &GenerationConfig,
) -> ModelResult<Box<dyn GenerationBackend>> {
    let backend = http::HttpGenerationBackend::new(config.clone())?;
    Ok(Box::new(backend))
}

#[cfg(not(feature = "http"))]
pub fn create_generation_backend(
    config: &GenerationConfig,
) -> ModelResult<Box<dyn GenerationBackend>> {
    Err(ModelError::ProviderNotAvailable {
        provider: config.provider.to_string(),
        reason: "No generation providers available. Enable the 'http' feature.".to_string(),
    })
}

// ============================================================================
// Re-export implementations (feature-gated)
// ============================================================================

#[cfg(feature = "http")]
pub use http::{HttpEmbeddingBackend, HttpGenerationBackend};
