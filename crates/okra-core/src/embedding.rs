//! Query and content embedding with a deterministic local fallback.
//!
//! The [`Embedder`] wraps an optional remote [`EmbeddingBackend`]. Any remote
//! failure (network, auth, quota, timeout) falls through silently to a local
//! hash-bucketed bag-of-words embedding, so `embed` never fails and the
//! pipeline never stalls on the embedding capability.
//!
//! The fallback is a pure function of its input: identical text produces an
//! identical vector across calls, restarts, and host languages. Test suites
//! rely on this.

use std::sync::Arc;

use tracing::debug;

use okra_model::EmbeddingBackend;

/// Dimension of the local fallback embedding.
pub const EMBEDDING_DIMENSION: usize = 100;

/// Model id reported when the local fallback produced the vector.
pub const LOCAL_EMBEDDING_MODEL_ID: &str = "local-hash";

// ============================================================================
// Local fallback embedding
// ============================================================================

/// Order-preserving 32-bit token hash.
///
/// `h = ((h << 5) - h) + code_unit`, accumulated left to right over UTF-16
/// code units with wrapping signed arithmetic, seeded at 0. UTF-16 code units
/// keep the bucket assignment identical to implementations in languages where
/// strings index by code unit.
fn token_hash(token: &str) -> i32 {
    let mut h: i32 = 0;
    for unit in token.encode_utf16() {
        h = h.wrapping_shl(5).wrapping_sub(h).wrapping_add(unit as i32);
    }
    h
}

/// Deterministic local embedding: lowercase, split on whitespace, hash each
/// token into one of [`EMBEDDING_DIMENSION`] buckets, then L2-normalize.
///
/// A zero-norm vector (empty or whitespace-only text) is returned unchanged;
/// there is no division by zero.
pub fn fallback_embedding(text: &str) -> Vec<f32> {
    let mut vector = vec![0.0f32; EMBEDDING_DIMENSION];

    for token in text.to_lowercase().split_whitespace() {
        let bucket = token_hash(token).unsigned_abs() as usize % EMBEDDING_DIMENSION;
        vector[bucket] += 1.0;
    }

    let norm: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for value in &mut vector {
            *value /= norm;
        }
    }

    vector
}

/// Cosine similarity over the first `min(len(a), len(b))` dimensions.
///
/// Returns 0 if either input has zero norm over that prefix, so mismatched
/// backend dimensions degrade to "no signal" instead of an error.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let len = a.len().min(b.len());
    if len == 0 {
        return 0.0;
    }

    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;
    for i in 0..len {
        dot += a[i] * b[i];
        norm_a += a[i] * a[i];
        norm_b += b[i] * b[i];
    }

    if norm_a <= 0.0 || norm_b <= 0.0 {
        return 0.0;
    }

    dot / (norm_a.sqrt() * norm_b.sqrt())
}

// ============================================================================
// Embedder
// ============================================================================

/// Embedding frontend: remote backend when one is wired in, local fallback
/// otherwise. Never fails.
#[derive(Debug, Clone)]
pub struct Embedder {
    backend: Option<Arc<dyn EmbeddingBackend>>,
}

impl Embedder {
    /// Create an embedder with an optional remote backend.
    pub fn new(backend: Option<Arc<dyn EmbeddingBackend>>) -> Self {
        Self { backend }
    }

    /// Create an embedder that only uses the local fallback.
    pub fn local() -> Self {
        Self { backend: None }
    }

    /// Embed one text. Always returns a vector.
    pub fn embed(&self, text: &str) -> Vec<f32> {
        if let Some(ref backend) = self.backend {
            match backend.embed(text) {
                Ok(vector) if !vector.is_empty() => return vector,
                Ok(_) => {
                    debug!(
                        "Embedding backend '{}' returned an empty vector, using local fallback",
                        backend.model_id()
                    );
                }
                Err(e) => {
                    debug!("Embedding backend failed ({}), using local fallback", e);
                }
            }
        }

        fallback_embedding(text)
    }

    /// The model id of the active embedding path.
    pub fn model_id(&self) -> &str {
        self.backend
            .as_deref()
            .map(|b| b.model_id())
            .unwrap_or(LOCAL_EMBEDDING_MODEL_ID)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use okra_model::{ModelError, ModelResult};

    /// Backend that fails every call.
    #[derive(Debug)]
    struct FailingEmbeddingBackend;

    impl EmbeddingBackend for FailingEmbeddingBackend {
        fn embed(&self, _text: &str) -> ModelResult<Vec<f32>> {
            Err(ModelError::embedding_failed("failing", "simulated outage"))
        }

        fn dimension(&self) -> Option<usize> {
            None
        }

        fn model_id(&self) -> &str {
            "failing"
        }
    }

    /// Backend that returns a fixed vector.
    #[derive(Debug)]
    struct FixedEmbeddingBackend(Vec<f32>);

    impl EmbeddingBackend for FixedEmbeddingBackend {
        fn embed(&self, _text: &str) -> ModelResult<Vec<f32>> {
            Ok(self.0.clone())
        }

        fn dimension(&self) -> Option<usize> {
            Some(self.0.len())
        }

        fn model_id(&self) -> &str {
            "fixed"
        }
    }

    #[test]
    fn test_fallback_is_deterministic() {
        let text = "Why is churn rising in the EU region?";
        assert_eq!(fallback_embedding(text), fallback_embedding(text));
    }

    #[test]
    fn test_fallback_known_bucket() {
        // hash("hello") = 99162322, abs mod 100 = 22
        let vector = fallback_embedding("hello");
        assert_eq!(vector.len(), EMBEDDING_DIMENSION);
        assert!((vector[22] - 1.0).abs() < 1e-6);
        assert_eq!(vector.iter().filter(|v| **v != 0.0).count(), 1);
    }

    #[test]
    fn test_fallback_is_case_insensitive() {
        assert_eq!(fallback_embedding("Hello WORLD"), fallback_embedding("hello world"));
    }

    #[test]
    fn test_fallback_normalized() {
        let vector = fallback_embedding("alpha beta gamma delta");
        let norm: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_fallback_empty_text_is_zero_vector() {
        let vector = fallback_embedding("   ");
        assert_eq!(vector.len(), EMBEDDING_DIMENSION);
        assert!(vector.iter().all(|v| *v == 0.0));
    }

    #[test]
    fn test_cosine_identical_is_one() {
        let v = fallback_embedding("quarterly revenue targets");
        assert!((cosine_similarity(&v, &v) - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_cosine_zero_norm_is_zero() {
        let zero = vec![0.0f32; EMBEDDING_DIMENSION];
        let v = fallback_embedding("hello");
        assert_eq!(cosine_similarity(&zero, &v), 0.0);
        assert_eq!(cosine_similarity(&v, &zero), 0.0);
    }

    #[test]
    fn test_cosine_truncates_to_shorter_vector() {
        let a = vec![1.0, 0.0, 5.0];
        let b = vec![1.0, 0.0];
        assert!((cosine_similarity(&a, &b) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_embedder_falls_back_on_backend_error() {
        let embedder = Embedder::new(Some(Arc::new(FailingEmbeddingBackend)));
        let text = "strategic expansion risks";
        assert_eq!(embedder.embed(text), fallback_embedding(text));
        assert_eq!(embedder.model_id(), "failing");
    }

    #[test]
    fn test_embedder_uses_backend_when_healthy() {
        let embedder = Embedder::new(Some(Arc::new(FixedEmbeddingBackend(vec![0.6, 0.8]))));
        assert_eq!(embedder.embed("anything"), vec![0.6, 0.8]);
    }

    #[test]
    fn test_local_embedder_model_id() {
        assert_eq!(Embedder::local().model_id(), LOCAL_EMBEDDING_MODEL_ID);
    }
}
