//! # okra-core
//!
//! **Organizational Knowledge Retrieval & Answering** - core engine library.
//!
//! Given a natural-language question scoped to an organization, the engine
//! gathers candidate knowledge items from the organization's collections,
//! scores each by relevance, synthesizes a grounded answer, and derives a
//! confidence value, related follow-up questions, and actionable items.
//!
//! The engine is built for partial failure: the embedding capability falls
//! back to a deterministic local embedding, the generation capability falls
//! back to a template answer, and a failed collection read just contributes
//! nothing. Callers always receive a structurally valid response.
//!
//! ## Main Types
//!
//! - [`OkraEngine`] - the engine; [`OkraEngine::answer_query`] is the sole
//!   public operation
//! - [`QueryContext`] - one question scoped to an organization
//! - [`AnswerBundle`] - the response: answer, confidence, sources, related
//!   questions, action items
//! - [`OkraError`] - domain-specific error type (never crosses the
//!   `answer_query` boundary)
//!
//! ## Pipeline
//!
//! ```text
//! QueryContext -> retrieve -> embed(query) -> rank -> synthesize -> post-process -> AnswerBundle
//! ```
//!
//! ## Example
//!
//! ```ignore
//! use okra_core::{GlobalConfig, OkraEngine, QueryContext, QueryDomain};
//! use okra_store::MemoryStore;
//! use std::sync::Arc;
//!
//! let engine = OkraEngine::from_global_config(
//!     GlobalConfig::load_default()?,
//!     Arc::new(MemoryStore::new()),
//! );
//!
//! let bundle = engine.answer_query(
//!     QueryContext::new("Which KPIs are off target?", "org-42")
//!         .with_domain(QueryDomain::Operational),
//! );
//! ```

// Modules
pub mod config;
pub mod embedding;
pub mod engine;
pub mod errors;
pub mod notify;
pub mod postprocess;
pub mod rank;
pub mod retrieve;
pub mod synthesize;
pub mod types;

// Re-exports for convenience
pub use config::{
    BaseRelevanceConfig, GlobalConfig, ModelsConfig, RetrievalConfig, ScoringConfig,
    SynthesisConfig, DEFAULT_ANSWER_TEMPERATURE, DEFAULT_CONTEXT_RECORDS,
    DEFAULT_DEGRADED_CONFIDENCE_CAP, DEFAULT_MAX_ANSWER_TOKENS, DEFAULT_PRIOR_WEIGHT,
    DEFAULT_RECENCY_DECAY_DAYS, DEFAULT_SIMILARITY_WEIGHT, DEFAULT_SOURCE_CONFIDENCE_FLOOR,
};
pub use embedding::{
    cosine_similarity, fallback_embedding, Embedder, EMBEDDING_DIMENSION,
    LOCAL_EMBEDDING_MODEL_ID,
};
pub use engine::{OkraEngine, INSUFFICIENT_CONTEXT_CONFIDENCE, MAX_SOURCES};
pub use errors::OkraError;
pub use notify::{
    maybe_emit_alert, Alert, AlertSeverity, AlertSink, ALERT_CONFIDENCE_THRESHOLD,
};
pub use postprocess::{
    extract_action_items, generic_related_questions, related_questions, MAX_ACTION_ITEMS,
    MAX_RELATED_QUESTIONS,
};
pub use rank::rank;
pub use retrieve::{retrieve, RetrievalOutcome, RETRIEVED_COLLECTIONS};
pub use synthesize::{synthesize, AnswerDraft, MAX_CONFIDENCE, MIN_CONFIDENCE};
pub use types::{
    ActionItem, ActionKind, ActionPriority, AnswerBundle, AnswerDebugInfo, CollectionCount,
    QueryContext, QueryDomain, RankedSource, SourceKind, SourceRecord, Timeframe,
    METADATA_CONFIDENCE, METADATA_CREATED_AT,
};
