//! OKRA Engine - the orchestrator for answering organizational queries.
//!
//! [`OkraEngine`] is the main entry point. It wires the knowledge store and
//! the capability backends together and exposes a single operation,
//! [`OkraEngine::answer_query`], which runs the linear pipeline
//! `retrieve -> embed -> rank -> synthesize -> post-process` and degrades
//! gracefully at every stage. No error ever crosses the `answer_query`
//! boundary: the worst case is a fixed low-confidence response.

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, warn};

use okra_model::{
    create_embedding_backend, create_generation_backend, EmbeddingBackend, GenerationBackend,
};
use okra_store::KnowledgeStore;

use crate::config::GlobalConfig;
use crate::embedding::Embedder;
use crate::notify::{maybe_emit_alert, AlertSink};
use crate::postprocess::{extract_action_items, generic_related_questions, related_questions};
use crate::rank::rank;
use crate::retrieve::retrieve;
use crate::synthesize::synthesize;
use crate::types::{
    ActionItem, ActionKind, ActionPriority, AnswerBundle, AnswerDebugInfo, QueryContext,
    RankedSource, SourceKind,
};

/// Maximum sources returned in a bundle.
pub const MAX_SOURCES: usize = 5;

/// Confidence of the fixed insufficient-context response.
pub const INSUFFICIENT_CONTEXT_CONFIDENCE: f32 = 0.2;

// ============================================================================
// OkraEngine
// ============================================================================

/// The answer engine.
///
/// Each [`OkraEngine::answer_query`] invocation is an independent, stateless
/// unit of work; the engine holds no mutable state and can be shared across
/// threads.
///
/// # Construction
///
/// Use [`OkraEngine::from_global_config`] for typical usage (wires the
/// configured HTTP capability backends, degrading to local-only when one
/// cannot be constructed), or [`OkraEngine::new`] plus the `with_*` builders
/// for tests and embedding into other programs.
///
/// # Example
///
/// ```ignore
/// use okra_core::{GlobalConfig, OkraEngine, QueryContext};
/// use okra_store::JsonlStore;
/// use std::sync::Arc;
///
/// let store = Arc::new(JsonlStore::open("knowledge.jsonl")?);
/// let engine = OkraEngine::from_global_config(GlobalConfig::load_default()?, store);
/// let bundle = engine.answer_query(QueryContext::new("Why is churn rising?", "org-42"));
/// println!("{} (confidence {:.0}%)", bundle.answer, bundle.confidence * 100.0);
/// ```
pub struct OkraEngine {
    /// Global configuration.
    config: GlobalConfig,

    /// Knowledge store read boundary.
    store: Arc<dyn KnowledgeStore>,

    /// Query/content embedder (remote backend plus deterministic fallback).
    embedder: Embedder,

    /// Generation capability, when one is wired in.
    generation: Option<Arc<dyn GenerationBackend>>,

    /// Destination for urgent-finding alerts, when one is wired in.
    alert_sink: Option<Arc<dyn AlertSink>>,
}

impl OkraEngine {
    // -------------------------------------------------------------------------
    // Construction
    // -------------------------------------------------------------------------

    /// Create an engine with no remote capabilities: local fallback
    /// embeddings, template answers, no alerting.
    pub fn new(config: GlobalConfig, store: Arc<dyn KnowledgeStore>) -> Self {
        Self {
            config,
            store,
            embedder: Embedder::local(),
            generation: None,
            alert_sink: None,
        }
    }

    /// Create an engine with the capability backends named in the
    /// configuration.
    ///
    /// A backend that cannot be constructed (missing API key, disabled
    /// feature) is logged and skipped; the engine then runs with the
    /// corresponding fallback. Construction itself never fails.
    pub fn from_global_config(config: GlobalConfig, store: Arc<dyn KnowledgeStore>) -> Self {
        let embedding = match create_embedding_backend(&config.models.embedding) {
            Ok(backend) => Some(Arc::from(backend)),
            Err(e) => {
                warn!("Embedding backend unavailable ({}), using local fallback", e);
                None
            }
        };

        let generation = match create_generation_backend(&config.models.generation) {
            Ok(backend) => Some(Arc::from(backend)),
            Err(e) => {
                warn!("Generation backend unavailable ({}), answers will be degraded", e);
                None
            }
        };

        Self {
            embedder: Embedder::new(embedding),
            generation,
            alert_sink: None,
            config,
            store,
        }
    }

    /// Replace the embedding backend.
    pub fn with_embedding_backend(mut self, backend: Arc<dyn EmbeddingBackend>) -> Self {
        self.embedder = Embedder::new(Some(backend));
        self
    }

    /// Replace the generation backend.
    pub fn with_generation_backend(mut self, backend: Arc<dyn GenerationBackend>) -> Self {
        self.generation = Some(backend);
        self
    }

    /// Attach an alert sink for urgent findings.
    pub fn with_alert_sink(mut self, sink: Arc<dyn AlertSink>) -> Self {
        self.alert_sink = Some(sink);
        self
    }

    /// Get a reference to the configuration.
    pub fn config(&self) -> &GlobalConfig {
        &self.config
    }

    // -------------------------------------------------------------------------
    // answer_query
    // -------------------------------------------------------------------------

    /// Answer one query. The sole public operation of the engine.
    ///
    /// Always returns a structurally valid [`AnswerBundle`]; degradation is
    /// communicated only through lower confidence and explanatory answer
    /// text.
    pub fn answer_query(&self, context: QueryContext) -> AnswerBundle {
        let start = Instant::now();

        // Availability is checked once up front so the degraded path is an
        // explicit decision, not an exception surfacing mid-pipeline.
        let generation_available = self
            .generation
            .as_deref()
            .map(|g| g.is_available())
            .unwrap_or(false);
        if !generation_available {
            debug!("Generation backend unavailable, running degraded path");
        }

        if context.query.trim().is_empty() {
            warn!("Empty query for organization '{}'", context.organization_id);
            return self.insufficient_context_bundle(context, AnswerDebugInfo::default());
        }

        // 1. Retrieve candidates (never fails; failed collections contribute
        //    nothing).
        let retrieve_start = Instant::now();
        let outcome = retrieve(
            self.store.as_ref(),
            &context,
            &self.config.retrieval,
            &self.config.scoring.base_relevance,
        );
        let retrieve_time_ms = retrieve_start.elapsed().as_millis() as u64;

        // 2. Embed the query and rank the candidates.
        let rank_start = Instant::now();
        let query_vector = self.embedder.embed(&context.query);
        let ranked = rank(
            outcome.records,
            &query_vector,
            &self.embedder,
            &self.config.scoring,
        );
        let rank_time_ms = rank_start.elapsed().as_millis() as u64;

        let mut debug_info = AnswerDebugInfo {
            embedding_model_id: self.embedder.model_id().to_string(),
            degraded: !generation_available,
            per_collection_counts: outcome.counts,
            retrieve_time_ms: Some(retrieve_time_ms),
            rank_time_ms: Some(rank_time_ms),
            synthesize_time_ms: None,
        };

        // 3. Total insufficiency: nothing retrieved and no generator to
        //    improvise with.
        if ranked.is_empty() && !generation_available {
            return self.insufficient_context_bundle(context, debug_info);
        }

        // 4. Synthesize (template fallback inside when the generator is
        //    unavailable or fails).
        let synthesize_start = Instant::now();
        let generation = if generation_available {
            self.generation.as_deref()
        } else {
            None
        };
        let draft = synthesize(&context, &ranked, generation, &self.config.synthesis);
        debug_info.synthesize_time_ms = Some(synthesize_start.elapsed().as_millis() as u64);
        debug_info.degraded = draft.degraded;

        // 5. Post-process.
        let action_items = extract_action_items(&draft.text);
        let kinds: BTreeSet<SourceKind> = ranked.iter().map(|s| s.record.kind).collect();
        let related = related_questions(&context, &kinds);

        let sources: Vec<RankedSource> = ranked.into_iter().take(MAX_SOURCES).collect();

        // 6. Alert on urgent findings, fire-and-forget.
        maybe_emit_alert(
            self.alert_sink.as_deref(),
            &context,
            draft.confidence,
            &action_items,
        );

        info!(
            "Answered query for '{}' in {}ms: {} sources, confidence {:.2}{}",
            context.organization_id,
            start.elapsed().as_millis(),
            sources.len(),
            draft.confidence,
            if draft.degraded { " (degraded)" } else { "" }
        );

        AnswerBundle {
            question: context.query,
            answer: draft.text,
            confidence: draft.confidence,
            sources,
            related_questions: related,
            action_items,
            debug: debug_info,
        }
    }

    /// The fixed worst-case response: no usable context and no generator.
    fn insufficient_context_bundle(
        &self,
        context: QueryContext,
        mut debug_info: AnswerDebugInfo,
    ) -> AnswerBundle {
        if debug_info.embedding_model_id.is_empty() {
            debug_info.embedding_model_id = self.embedder.model_id().to_string();
        }
        debug_info.degraded = true;

        AnswerBundle {
            question: context.query,
            answer: "No directly relevant data found for this question, and AI synthesis \
                     is not available. Record the relevant insights, evidence, and KPIs, \
                     or retry once the answer service is reachable."
                .to_string(),
            confidence: INSUFFICIENT_CONTEXT_CONFIDENCE,
            sources: Vec::new(),
            related_questions: generic_related_questions(),
            action_items: vec![ActionItem {
                kind: ActionKind::Investigation,
                priority: ActionPriority::Medium,
                description: "Gather and record the insights, evidence, and KPIs needed to \
                              answer this question"
                    .to_string(),
                owner: None,
            }],
            debug: debug_info,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::Alert;
    use crate::synthesize::{MAX_CONFIDENCE, MIN_CONFIDENCE};
    use okra_model::{ModelError, ModelResult};
    use okra_store::{Evidence, Insight, Kpi, MemoryStore};
    use std::sync::Mutex;

    /// Embedding backend that fails every call.
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
            "failing-embed"
        }
    }

    /// Generation backend that fails every call and reports unavailable.
    #[derive(Debug)]
    struct DownGenerationBackend;

    impl GenerationBackend for DownGenerationBackend {
        fn generate(&self, _prompt: &str, _max_tokens: u32, _temperature: f32) -> ModelResult<String> {
            Err(ModelError::generation_failed("down", "simulated outage"))
        }

        fn is_available(&self) -> bool {
            false
        }

        fn model_id(&self) -> &str {
            "down"
        }
    }

    /// Generation backend that answers with a fixed text.
    #[derive(Debug)]
    struct FixedGenerationBackend(String);

    impl GenerationBackend for FixedGenerationBackend {
        fn generate(&self, _prompt: &str, _max_tokens: u32, _temperature: f32) -> ModelResult<String> {
            Ok(self.0.clone())
        }

        fn is_available(&self) -> bool {
            true
        }

        fn model_id(&self) -> &str {
            "fixed"
        }
    }

    /// Alert sink that records deliveries.
    #[derive(Default)]
    struct RecordingSink {
        delivered: Mutex<Vec<Alert>>,
    }

    impl AlertSink for RecordingSink {
        fn notify(&self, alert: &Alert) -> Result<(), crate::OkraError> {
            self.delivered.lock().unwrap().push(alert.clone());
            Ok(())
        }
    }

    fn seeded_store() -> Arc<MemoryStore> {
        let store = MemoryStore::new();
        store
            .insert(
                Insight::new(
                    "ins-1",
                    "org-1",
                    "Churn driver",
                    "Churn is rising because of enterprise pricing.",
                )
                .with_confidence(0.9),
            )
            .unwrap();
        store
            .insert(Evidence::new(
                "ev-1",
                "org-1",
                "Exit survey",
                "Churned customers cite pricing in exit surveys.",
            ))
            .unwrap();
        store
            .insert(Kpi::new("kpi-1", "org-1", "Monthly churn", 4.2).with_unit("%"))
            .unwrap();
        Arc::new(store)
    }

    #[test]
    fn test_graceful_total_failure() {
        // Both capabilities down, store empty: still a valid bundle.
        let engine = OkraEngine::new(GlobalConfig::default(), Arc::new(MemoryStore::new()))
            .with_embedding_backend(Arc::new(FailingEmbeddingBackend))
            .with_generation_backend(Arc::new(DownGenerationBackend));

        let bundle = engine.answer_query(QueryContext::new("Why is churn rising?", "org-404"));

        assert!(bundle.sources.is_empty());
        assert!(bundle.confidence >= 0.1 && bundle.confidence <= 0.3);
        assert!(bundle.answer.to_lowercase().contains("no directly relevant data found"));
        assert!(!bundle.related_questions.is_empty());
        assert_eq!(bundle.action_items.len(), 1);
        assert_eq!(bundle.action_items[0].kind, ActionKind::Investigation);
    }

    #[test]
    fn test_degraded_path_with_data() {
        let engine = OkraEngine::new(GlobalConfig::default(), seeded_store());

        let bundle = engine.answer_query(QueryContext::new(
            "Churn is rising because of enterprise pricing.",
            "org-1",
        ));

        assert!(bundle.answer.contains("AI synthesis is currently unavailable"));
        assert!(bundle.debug.degraded);
        assert!(!bundle.sources.is_empty());
        assert!(bundle.confidence >= MIN_CONFIDENCE && bundle.confidence <= MAX_CONFIDENCE);
        // The perfect-match insight ranks first.
        assert_eq!(bundle.sources[0].record.id, "ins-1");
    }

    #[test]
    fn test_sources_capped_and_sorted() {
        let store = MemoryStore::new();
        for i in 0..12 {
            store
                .insert(Insight::new(
                    format!("ins-{}", i),
                    "org-1",
                    format!("Insight {}", i),
                    format!("Observation number {} about churn pricing", i),
                ))
                .unwrap();
        }
        let engine = OkraEngine::new(GlobalConfig::default(), Arc::new(store));

        let bundle = engine.answer_query(QueryContext::new("churn pricing", "org-1"));

        assert_eq!(bundle.sources.len(), MAX_SOURCES);
        for pair in bundle.sources.windows(2) {
            assert!(pair[0].relevance >= pair[1].relevance);
        }
    }

    #[test]
    fn test_generated_answer_drives_actions_and_alert() {
        let answer = "Churn is rising because of enterprise pricing, and the exit survey \
                      evidence points the same way: price-sensitive accounts leave at renewal.\n\
                      It is urgent that leadership decide on a revised enterprise tier before \
                      the next renewal cycle, since the current list price sits well above the \
                      median of competing offers.\n\
                      We should also review the exit survey pipeline for coverage gaps, as only \
                      a minority of churned accounts currently complete it.";
        let sink = Arc::new(RecordingSink::default());
        let engine = OkraEngine::new(GlobalConfig::default(), seeded_store())
            .with_generation_backend(Arc::new(FixedGenerationBackend(answer.to_string())))
            .with_alert_sink(sink.clone());

        let bundle = engine.answer_query(QueryContext::new(
            "Churn is rising because of enterprise pricing.",
            "org-1",
        ));

        assert!(!bundle.debug.degraded);
        assert!(bundle
            .action_items
            .iter()
            .any(|item| item.priority == ActionPriority::High));
        assert!(bundle.confidence > 0.7);
        assert_eq!(sink.delivered.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_related_questions_reflect_source_kinds() {
        let engine = OkraEngine::new(GlobalConfig::default(), seeded_store());

        let bundle = engine.answer_query(QueryContext::new("churn pricing", "org-1"));

        assert!(bundle
            .related_questions
            .contains(&"Which KPIs are underperforming and need attention?".to_string()));
        assert!(bundle.related_questions.len() <= 5);
        let mut deduped = bundle.related_questions.clone();
        deduped.sort();
        deduped.dedup();
        assert_eq!(deduped.len(), bundle.related_questions.len());
    }

    #[test]
    fn test_empty_query_is_insufficient_context() {
        let engine = OkraEngine::new(GlobalConfig::default(), seeded_store());
        let bundle = engine.answer_query(QueryContext::new("   ", "org-1"));

        assert_eq!(bundle.confidence, INSUFFICIENT_CONTEXT_CONFIDENCE);
        assert!(bundle.sources.is_empty());
    }

    #[test]
    fn test_empty_org_with_generator_still_synthesizes() {
        let engine = OkraEngine::new(GlobalConfig::default(), Arc::new(MemoryStore::new()))
            .with_generation_backend(Arc::new(FixedGenerationBackend(
                "There is no recorded data for this organization yet; start by tracking churn."
                    .to_string(),
            )));

        let bundle = engine.answer_query(QueryContext::new("Why is churn rising?", "org-404"));

        assert!(!bundle.debug.degraded);
        assert!(bundle.sources.is_empty());
        // Vacuous relevance term keeps confidence low.
        assert!(bundle.confidence < 0.5, "got {}", bundle.confidence);
    }
}
