//! Answer synthesis from ranked records.
//!
//! Builds a context block from the top-ranked records, asks the generation
//! backend for a grounded answer, and computes the engine's self-assessed
//! confidence. When the backend is missing or fails, a template answer lists
//! the top records verbatim with an explicit disclaimer - the caller still
//! gets a usable response, just a visibly degraded one.

use tracing::{debug, warn};

use okra_model::GenerationBackend;

use crate::config::SynthesisConfig;
use crate::types::{QueryContext, RankedSource};

/// Lower bound on reported confidence. A response always carries some
/// epistemic credit.
pub const MIN_CONFIDENCE: f32 = 0.1;

/// Upper bound on reported confidence. This system never claims certainty.
pub const MAX_CONFIDENCE: f32 = 0.95;

/// Confidence before any relevance or quality contribution.
const BASE_CONFIDENCE: f32 = 0.3;

/// Weight of the mean top-source relevance in the confidence score.
const RELEVANCE_CONFIDENCE_WEIGHT: f32 = 0.4;

/// Number of top sources averaged for the relevance contribution.
const CONFIDENCE_SOURCES: usize = 5;

/// Cap on the length-proportional quality contribution.
const LENGTH_QUALITY_CAP: f32 = 0.2;

/// Characters of answer text per unit of length quality.
const LENGTH_QUALITY_DIVISOR: f32 = 2000.0;

/// Bonus when the answer spans multiple lines. Multi-line answers correlate
/// with the generator having enumerated points rather than refusing.
const MULTILINE_BONUS: f32 = 0.1;

/// Fixed instruction preamble for the generation prompt.
const INSTRUCTION_PREAMBLE: &str = "You are an organizational intelligence assistant. \
Answer the question using only the context provided. Be specific, cite concrete figures \
where the context contains them, and say plainly when the context does not cover the question.";

// ============================================================================
// AnswerDraft
// ============================================================================

/// A synthesized answer with its confidence. Transient: consumed by the
/// post-processor on the way to the final bundle.
#[derive(Debug, Clone)]
pub struct AnswerDraft {
    /// Answer text (generated or template).
    pub text: String,

    /// Self-assessed confidence in [`MIN_CONFIDENCE`, `MAX_CONFIDENCE`].
    pub confidence: f32,

    /// Whether the template fallback produced the text.
    pub degraded: bool,
}

// ============================================================================
// Synthesis
// ============================================================================

/// Synthesize an answer from the ranked records.
///
/// Never fails: a missing or failing generation backend yields the template
/// answer with a capped confidence.
pub fn synthesize(
    context: &QueryContext,
    ranked: &[RankedSource],
    generation: Option<&dyn GenerationBackend>,
    config: &SynthesisConfig,
) -> AnswerDraft {
    if let Some(backend) = generation {
        let prompt = build_prompt(context, ranked, config);
        match backend.generate(&prompt, config.max_tokens, config.temperature) {
            Ok(text) if !text.trim().is_empty() => {
                debug!("Generated answer with '{}'", backend.model_id());
                let confidence = compute_confidence(ranked, &text, false, config);
                return AnswerDraft {
                    text,
                    confidence,
                    degraded: false,
                };
            }
            Ok(_) => {
                warn!(
                    "Generation backend '{}' returned empty text, using template answer",
                    backend.model_id()
                );
            }
            Err(e) => {
                warn!("Generation failed ({}), using template answer", e);
            }
        }
    }

    let text = template_answer(ranked, config);
    let confidence = compute_confidence(ranked, &text, true, config);
    AnswerDraft {
        text,
        confidence,
        degraded: true,
    }
}

/// Build the one-shot generation prompt: preamble, context block, question.
fn build_prompt(context: &QueryContext, ranked: &[RankedSource], config: &SynthesisConfig) -> String {
    let block = if ranked.is_empty() {
        "(no matching records)".to_string()
    } else {
        ranked
            .iter()
            .take(config.context_records)
            .map(|source| {
                format!(
                    "[{}] {}",
                    source.record.kind.context_label(),
                    source.record.content
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    };

    format!(
        "{}\n\nContext:\n{}\n\nQuestion: {}\n\nAnswer:",
        INSTRUCTION_PREAMBLE, block, context.query
    )
}

/// Template answer used when no generation backend is reachable.
///
/// Lists the top records verbatim so the caller still sees the evidence, and
/// says explicitly that AI synthesis was unavailable.
fn template_answer(ranked: &[RankedSource], config: &SynthesisConfig) -> String {
    if ranked.is_empty() {
        return "No directly relevant data found for this question. \
                Consider broadening the question, checking another business unit, \
                or recording the relevant insights first."
            .to_string();
    }

    let mut lines = vec![format!(
        "Found {} relevant knowledge item(s), but AI synthesis is currently unavailable. \
         Top findings:",
        ranked.len()
    )];
    for source in ranked.iter().take(config.template_records) {
        lines.push(format!(
            "- [{}] {}: {}",
            source.record.kind.context_label(),
            source.record.title,
            source.record.content
        ));
    }
    lines.join("\n")
}

/// Compute the confidence for an answer.
///
/// Base 0.3, plus 0.4 x mean relevance of the top sources (0 when there are
/// none), plus a structural-quality contribution of up to 0.3. Template
/// answers are additionally capped since no synthesis occurred. The result is
/// always clamped to [[`MIN_CONFIDENCE`], [`MAX_CONFIDENCE`]].
fn compute_confidence(
    ranked: &[RankedSource],
    text: &str,
    degraded: bool,
    config: &SynthesisConfig,
) -> f32 {
    let mut confidence = BASE_CONFIDENCE;

    if !ranked.is_empty() {
        let top = &ranked[..ranked.len().min(CONFIDENCE_SOURCES)];
        let mean_relevance: f32 =
            top.iter().map(|s| s.relevance).sum::<f32>() / top.len() as f32;
        confidence += RELEVANCE_CONFIDENCE_WEIGHT * mean_relevance;
    }

    let mut quality = (text.len() as f32 / LENGTH_QUALITY_DIVISOR).min(LENGTH_QUALITY_CAP);
    if text.lines().count() > 1 {
        quality += MULTILINE_BONUS;
    }
    confidence += quality;

    if degraded {
        confidence = confidence.min(config.degraded_confidence_cap);
    }

    confidence.clamp(MIN_CONFIDENCE, MAX_CONFIDENCE)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{SourceKind, SourceRecord};
    use okra_model::{ModelError, ModelResult};

    /// Backend that returns a fixed answer.
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

    /// Backend that fails every call.
    #[derive(Debug)]
    struct FailingGenerationBackend;

    impl GenerationBackend for FailingGenerationBackend {
        fn generate(&self, _prompt: &str, _max_tokens: u32, _temperature: f32) -> ModelResult<String> {
            Err(ModelError::generation_failed("failing", "simulated outage"))
        }

        fn is_available(&self) -> bool {
            false
        }

        fn model_id(&self) -> &str {
            "failing"
        }
    }

    fn ranked_source(id: &str, relevance: f32) -> RankedSource {
        RankedSource {
            record: SourceRecord {
                kind: SourceKind::Insight,
                id: id.to_string(),
                title: format!("Title {}", id),
                content: format!("Content of {}", id),
                base_relevance: 0.8,
                metadata: serde_json::Map::new(),
            },
            relevance,
        }
    }

    fn context() -> QueryContext {
        QueryContext::new("Why is churn rising?", "org-1")
    }

    #[test]
    fn test_generated_answer_keeps_backend_text() {
        let backend = FixedGenerationBackend("Churn rose because of pricing.\n- fix A\n- fix B".to_string());
        let draft = synthesize(
            &context(),
            &[ranked_source("a", 0.9)],
            Some(&backend),
            &SynthesisConfig::default(),
        );

        assert!(!draft.degraded);
        assert!(draft.text.contains("pricing"));
        assert!(draft.confidence > 0.3);
        assert!(draft.confidence <= MAX_CONFIDENCE);
    }

    #[test]
    fn test_generation_failure_falls_back_to_template() {
        let draft = synthesize(
            &context(),
            &[ranked_source("a", 0.9)],
            Some(&FailingGenerationBackend),
            &SynthesisConfig::default(),
        );

        assert!(draft.degraded);
        assert!(draft.text.contains("AI synthesis is currently unavailable"));
        assert!(draft.text.contains("[INSIGHT] Title a"));
        assert!(draft.confidence <= SynthesisConfig::default().degraded_confidence_cap);
    }

    #[test]
    fn test_template_lists_at_most_three_records() {
        let ranked: Vec<RankedSource> = (0..6)
            .map(|i| ranked_source(&format!("s{}", i), 0.5))
            .collect();
        let draft = synthesize(&context(), &ranked, None, &SynthesisConfig::default());

        let listed = draft.text.lines().filter(|l| l.starts_with("- [")).count();
        assert_eq!(listed, 3);
    }

    #[test]
    fn test_no_records_template_mentions_no_data() {
        let draft = synthesize(&context(), &[], None, &SynthesisConfig::default());

        assert!(draft.text.contains("No directly relevant data found"));
        assert!(draft.confidence >= MIN_CONFIDENCE);
        assert!(draft.confidence <= 0.45, "got {}", draft.confidence);
    }

    #[test]
    fn test_confidence_clamped_to_ceiling() {
        // Absurd relevance values must not push confidence past the ceiling.
        let backend = FixedGenerationBackend("line one\nline two\nline three".repeat(100));
        let ranked: Vec<RankedSource> = (0..5)
            .map(|i| ranked_source(&format!("s{}", i), 10.0))
            .collect();
        let draft = synthesize(&context(), &ranked, Some(&backend), &SynthesisConfig::default());

        assert!(draft.confidence <= MAX_CONFIDENCE);
    }

    #[test]
    fn test_empty_generation_output_degrades() {
        let backend = FixedGenerationBackend("   ".to_string());
        let draft = synthesize(
            &context(),
            &[ranked_source("a", 0.9)],
            Some(&backend),
            &SynthesisConfig::default(),
        );

        assert!(draft.degraded);
        assert!(draft.text.contains("unavailable"));
    }

    #[test]
    fn test_prompt_contains_context_and_question() {
        let prompt = build_prompt(
            &context(),
            &[ranked_source("a", 0.9)],
            &SynthesisConfig::default(),
        );

        assert!(prompt.contains("[INSIGHT] Content of a"));
        assert!(prompt.contains("Question: Why is churn rising?"));
        assert!(prompt.ends_with("Answer:"));
    }
}
