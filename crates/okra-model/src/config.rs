//! Configuration types for okra-model.
//!
//! This module provides the canonical configuration types for the embedding
//! and generation capabilities. Other crates should use or re-export these
//! types rather than defining duplicates.

use serde::{Deserialize, Serialize};

use crate::{DEFAULT_EMBEDDING_MODEL_ID, DEFAULT_GENERATION_MODEL_ID};

// ============================================================================
// ProviderKind
// ============================================================================

/// Remote capability provider type.
///
/// Both providers speak the OpenAI-compatible HTTP API; they differ only in
/// default endpoint and whether an API key is expected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// OpenAI API (hosted, requires an API key).
    #[default]
    OpenAi,
    /// Local Ollama server (no key required).
    Ollama,
}

impl ProviderKind {
    /// The default base URL for this provider.
    pub fn default_base_url(&self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "https://api.openai.com/v1",
            ProviderKind::Ollama => "http://localhost:11434/v1",
        }
    }

    /// The API key environment variable this provider expects, if any.
    pub fn default_api_key_env(&self) -> Option<&'static str> {
        match self {
            ProviderKind::OpenAi => Some("OPENAI_API_KEY"),
            ProviderKind::Ollama => None,
        }
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OpenAi => write!(f, "openai"),
            Self::Ollama => write!(f, "ollama"),
        }
    }
}

impl std::str::FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "openai" | "open-ai" => Ok(Self::OpenAi),
            "ollama" => Ok(Self::Ollama),
            _ => Err(format!(
                "Unknown provider: '{}'. Use 'openai' or 'ollama'.",
                s
            )),
        }
    }
}

// ============================================================================
// EmbeddingConfig
// ============================================================================

/// Default request timeout for embedding calls, in seconds.
pub const DEFAULT_EMBEDDING_TIMEOUT_SECS: u64 = 10;

/// Default request timeout for generation calls, in seconds.
pub const DEFAULT_GENERATION_TIMEOUT_SECS: u64 = 30;

/// Configuration for the remote embedding capability.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmbeddingConfig {
    /// Provider type.
    #[serde(default)]
    pub provider: ProviderKind,

    /// Base URL override; defaults to the provider's well-known endpoint.
    #[serde(default)]
    pub base_url: Option<String>,

    /// Embedding model identifier.
    pub model_id: String,

    /// Environment variable holding the API key; defaults per provider.
    #[serde(default)]
    pub api_key_env: Option<String>,

    /// Request timeout in seconds. A timeout is treated like any other
    /// capability failure by the caller.
    #[serde(default = "default_embedding_timeout")]
    pub timeout_secs: u64,

    /// Expected embedding dimension, if known.
    #[serde(default)]
    pub dimension: Option<usize>,
}

fn default_embedding_timeout() -> u64 {
    DEFAULT_EMBEDDING_TIMEOUT_SECS
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::default(),
            base_url: None,
            model_id: DEFAULT_EMBEDDING_MODEL_ID.to_string(),
            api_key_env: None,
            timeout_secs: DEFAULT_EMBEDDING_TIMEOUT_SECS,
            dimension: None,
        }
    }
}

impl EmbeddingConfig {
    /// Resolve the base URL (explicit override or provider default).
    pub fn resolved_base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .unwrap_or_else(|| self.provider.default_base_url())
    }

    /// Resolve the API key environment variable, if one applies.
    pub fn resolved_api_key_env(&self) -> Option<&str> {
        self.api_key_env
            .as_deref()
            .or_else(|| self.provider.default_api_key_env())
    }
}

// ============================================================================
// GenerationConfig
// ============================================================================

/// Configuration for the remote text generation capability.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    /// Provider type.
    #[serde(default)]
    pub provider: ProviderKind,

    /// Base URL override; defaults to the provider's well-known endpoint.
    #[serde(default)]
    pub base_url: Option<String>,

    /// Generation model identifier.
    pub model_id: String,

    /// Environment variable holding the API key; defaults per provider.
    #[serde(default)]
    pub api_key_env: Option<String>,

    /// Request timeout in seconds.
    #[serde(default = "default_generation_timeout")]
    pub timeout_secs: u64,
}

fn default_generation_timeout() -> u64 {
    DEFAULT_GENERATION_TIMEOUT_SECS
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::default(),
            base_url: None,
            model_id: DEFAULT_GENERATION_MODEL_ID.to_string(),
            api_key_env: None,
            timeout_secs: DEFAULT_GENERATION_TIMEOUT_SECS,
        }
    }
}

impl GenerationConfig {
    /// Resolve the base URL (explicit override or provider default).
    pub fn resolved_base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .unwrap_or_else(|| self.provider.default_base_url())
    }

    /// Resolve the API key environment variable, if one applies.
    pub fn resolved_api_key_env(&self) -> Option<&str> {
        self.api_key_env
            .as_deref()
            .or_else(|| self.provider.default_api_key_env())
    }
}

// ============================================================================
// Tests
// ============================================================================
