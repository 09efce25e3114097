//! OpenAI-compatible HTTP backends for embedding and generation.
//!
//! Both backends share the same wire conventions: `POST {base}/embeddings`,
//! `POST {base}/chat/completions`, `GET {base}/models` for the availability
//! probe. Every request carries an explicit timeout so a stalled backend is
//! indistinguishable from a failed one.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{EmbeddingConfig, GenerationConfig};
use crate::error::{ModelError, ModelResult};
use crate::{EmbeddingBackend, GenerationBackend};

/// Timeout for the availability probe, in seconds.
///
/// Deliberately shorter than the request timeouts: the probe runs on every
/// query and must not stall the pipeline.
const AVAILABILITY_TIMEOUT_SECS: u64 = 3;

// ============================================================================
// Wire types
// ============================================================================

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a str,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

// ============================================================================
// Shared helpers
// ============================================================================

/// Build a blocking client with the configured request timeout.
fn build_client(timeout_secs: u64) -> ModelResult<reqwest::blocking::Client> {
    reqwest::blocking::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| ModelError::request_failed("client", e.to_string()))
}

/// Resolve the API key for a provider, if one is required.
///
/// Returns `Ok(None)` for keyless providers and [`ModelError::MissingApiKey`]
/// when a required environment variable is unset.
fn resolve_api_key(api_key_env: Option<&str>) -> ModelResult<Option<String>> {
    match api_key_env {
        Some(env) => match std::env::var(env) {
            Ok(key) if !key.trim().is_empty() => Ok(Some(key)),
            _ => Err(ModelError::MissingApiKey {
                env: env.to_string(),
            }),
        },
        None => Ok(None),
    }
}

/// Probe `{base}/models` with a short timeout.
fn probe_models_endpoint(
    client: &reqwest::blocking::Client,
    base_url: &str,
    api_key: Option<&str>,
) -> bool {
    let endpoint = format!("{}/models", base_url.trim_end_matches('/'));
    let mut request = client
        .get(&endpoint)
        .timeout(Duration::from_secs(AVAILABILITY_TIMEOUT_SECS));
    if let Some(key) = api_key {
        request = request.bearer_auth(key);
    }

    match request.send() {
        Ok(response) => response.status().is_success(),
        Err(e) => {
            debug!("Availability probe for {} failed: {}", endpoint, e);
            false
        }
    }
}

// ============================================================================
// HttpEmbeddingBackend
// ============================================================================

/// Embedding backend speaking the OpenAI-compatible `/embeddings` endpoint.
pub struct HttpEmbeddingBackend {
    config: EmbeddingConfig,
    client: reqwest::blocking::Client,
    api_key: Option<String>,
}

impl HttpEmbeddingBackend {
    /// Create an embedding backend from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::MissingApiKey`] if the provider requires a key
    /// and its environment variable is unset.
    pub fn new(config: EmbeddingConfig) -> ModelResult<Self> {
        let api_key = resolve_api_key(config.resolved_api_key_env())?;
        let client = build_client(config.timeout_secs)?;
        Ok(Self {
            config,
            client,
            api_key,
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/embeddings",
            self.config.resolved_base_url().trim_end_matches('/')
        )
    }
}

impl fmt::Debug for HttpEmbeddingBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpEmbeddingBackend")
            .field("provider", &self.config.provider)
            .field("model_id", &self.config.model_id)
            .field("base_url", &self.config.resolved_base_url())
            .finish()
    }
}

impl EmbeddingBackend for HttpEmbeddingBackend {
    fn embed(&self, text: &str) -> ModelResult<Vec<f32>> {
        let endpoint = self.endpoint();
        let body = EmbeddingRequest {
            model: &self.config.model_id,
            input: text,
        };

        let mut request = self.client.post(&endpoint).json(&body);
        if let Some(ref key) = self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .map_err(|e| ModelError::request_failed(&endpoint, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().unwrap_or_default();
            return Err(ModelError::ApiError {
                endpoint,
                status: status.as_u16(),
                message,
            });
        }

        let parsed: EmbeddingResponse = response
            .json()
            .map_err(|e| ModelError::invalid_response(&endpoint, e.to_string()))?;

        parsed
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .ok_or_else(|| ModelError::invalid_response(&endpoint, "empty data array"))
    }

    fn dimension(&self) -> Option<usize> {
        self.config.dimension
    }

    fn model_id(&self) -> &str {
        &self.config.model_id
    }
}

// ============================================================================
// HttpGenerationBackend
// ============================================================================

/// Generation backend speaking the OpenAI-compatible `/chat/completions`
/// endpoint.
pub struct HttpGenerationBackend {
    config: GenerationConfig,
    client: reqwest::blocking::Client,
    api_key: Option<String>,
}

impl HttpGenerationBackend {
    /// Create a generation backend from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::MissingApiKey`] if the provider requires a key
    /// and its environment variable is unset.
    pub fn new(config: GenerationConfig) -> ModelResult<Self> {
        let api_key = resolve_api_key(config.resolved_api_key_env())?;
        let client = build_client(config.timeout_secs)?;
        Ok(Self {
            config,
            client,
            api_key,
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/chat/completions",
            self.config.resolved_base_url().trim_end_matches('/')
        )
    }
}

impl fmt::Debug for HttpGenerationBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpGenerationBackend")
            .field("provider", &self.config.provider)
            .field("model_id", &self.config.model_id)
            .field("base_url", &self.config.resolved_base_url())
            .finish()
    }
}

impl GenerationBackend for HttpGenerationBackend {
    fn generate(&self, prompt: &str, max_tokens: u32, temperature: f32) -> ModelResult<String> {
        let endpoint = self.endpoint();
        let body = ChatRequest {
            model: &self.config.model_id,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            max_tokens,
            temperature,
        };

        let mut request = self.client.post(&endpoint).json(&body);
        if let Some(ref key) = self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .map_err(|e| ModelError::request_failed(&endpoint, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().unwrap_or_default();
            return Err(ModelError::ApiError {
                endpoint,
                status: status.as_u16(),
                message,
            });
        }

        let parsed: ChatResponse = response
            .json()
            .map_err(|e| ModelError::invalid_response(&endpoint, e.to_string()))?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| ModelError::invalid_response(&endpoint, "empty choices array"))
    }

    fn is_available(&self) -> bool {
        probe_models_endpoint(
            &self.client,
            self.config.resolved_base_url(),
            self.api_key.as_deref(),
        )
    }

    fn model_id(&self) -> &str {
        &self.config.model_id
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProviderKind;

    #[test]
    fn test_missing_api_key_fails_construction() {
        let config = EmbeddingConfig {
            api_key_env: Some("OKRA_TEST_KEY_THAT_DOES_NOT_EXIST".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            HttpEmbeddingBackend::new(config),
            Err(ModelError::MissingApiKey { .. })
        ));
    }

    #[test]
    fn test_ollama_backend_constructs_without_key() {
        let config = GenerationConfig {
            provider: ProviderKind::Ollama,
            ..Default::default()
        };
        let backend = HttpGenerationBackend::new(config).expect("keyless construction");
        assert_eq!(
            backend.endpoint(),
            "http://localhost:11434/v1/chat/completions"
        );
    }

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let config = EmbeddingConfig {
            provider: ProviderKind::Ollama,
            base_url: Some("http://inference.internal:8080/v1/".to_string()),
            ..Default::default()
        };
        let backend = HttpEmbeddingBackend::new(config).unwrap();
        assert_eq!(
            backend.endpoint(),
            "http://inference.internal:8080/v1/embeddings"
        );
    }
}
