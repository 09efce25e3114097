//! Relevance ranking of retrieved records.
//!
//! Each record's relevance blends four signals:
//!
//! 1. The static per-kind prior assigned at retrieval
//! 2. Cosine similarity between the query vector and the record's content
//! 3. Exponential recency decay, when a creation timestamp is present
//! 4. A source-confidence multiplier, when confidence metadata is present
//!
//! The resulting score orders records; it is not a calibrated probability.

use chrono::{DateTime, Utc};
use tracing::trace;

use crate::config::ScoringConfig;
use crate::embedding::{cosine_similarity, Embedder};
use crate::types::{RankedSource, SourceRecord};

/// Seconds per day, for age computation.
const SECONDS_PER_DAY: f32 = 86_400.0;

/// Rank records by relevance to the query, best first.
///
/// Sorting is stable: records with equal scores keep their retrieval order.
/// An empty input produces an empty output. A record with empty content
/// embeds to the zero vector (similarity 0) but is not excluded - filtering
/// by emptiness is a retrieval concern.
pub fn rank(
    records: Vec<SourceRecord>,
    query_vector: &[f32],
    embedder: &Embedder,
    scoring: &ScoringConfig,
) -> Vec<RankedSource> {
    let now = Utc::now();

    let mut ranked: Vec<RankedSource> = records
        .into_iter()
        .map(|record| {
            let relevance = score_record(&record, query_vector, embedder, scoring, now);
            trace!("Scored {} '{}': {}", record.kind, record.id, relevance);
            RankedSource { record, relevance }
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.relevance
            .partial_cmp(&a.relevance)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    ranked
}

/// Score one record against the query vector.
fn score_record(
    record: &SourceRecord,
    query_vector: &[f32],
    embedder: &Embedder,
    scoring: &ScoringConfig,
    now: DateTime<Utc>,
) -> f32 {
    let content_vector = embedder.embed(&record.content);
    let similarity = cosine_similarity(query_vector, &content_vector);

    let mut relevance =
        record.base_relevance * scoring.prior_weight + similarity * scoring.similarity_weight;

    if let Some(created_at) = record.created_at() {
        // Age clamps at zero so a clock-skewed future timestamp cannot boost.
        let age_days = (now - created_at).num_seconds().max(0) as f32 / SECONDS_PER_DAY;
        relevance *= (-age_days / scoring.recency_decay_days).exp();
    }

    if let Some(confidence) = record.source_confidence() {
        relevance *= scoring.source_confidence_floor
            + (1.0 - scoring.source_confidence_floor) * confidence;
    }

    relevance
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{SourceKind, METADATA_CONFIDENCE, METADATA_CREATED_AT};
    use chrono::Duration;
    use serde_json::json;

    fn record(id: &str, content: &str, base_relevance: f32) -> SourceRecord {
        SourceRecord {
            kind: SourceKind::Insight,
            id: id.to_string(),
            title: id.to_string(),
            content: content.to_string(),
            base_relevance,
            metadata: serde_json::Map::new(),
        }
    }

    fn with_created_at(mut record: SourceRecord, created_at: DateTime<Utc>) -> SourceRecord {
        record.metadata.insert(
            METADATA_CREATED_AT.to_string(),
            json!(created_at.to_rfc3339()),
        );
        record
    }

    fn with_confidence(mut record: SourceRecord, confidence: f32) -> SourceRecord {
        record
            .metadata
            .insert(METADATA_CONFIDENCE.to_string(), json!(confidence));
        record
    }

    fn rank_for_query(query: &str, records: Vec<SourceRecord>) -> Vec<RankedSource> {
        let embedder = Embedder::local();
        let query_vector = embedder.embed(query);
        rank(records, &query_vector, &embedder, &ScoringConfig::default())
    }

    #[test]
    fn test_empty_records_rank_empty() {
        assert!(rank_for_query("anything", Vec::new()).is_empty());
    }

    #[test]
    fn test_perfect_match_fresh_insight_scores_point_nine() {
        let query = "churn is rising in the eu";
        let ranked = rank_for_query(
            query,
            vec![with_created_at(record("ins-1", query, 0.8), Utc::now())],
        );

        // 0.8 * 0.5 + 1.0 * 0.5, decay factor ~1, no confidence multiplier
        assert!((ranked[0].relevance - 0.9).abs() < 1e-3);
    }

    #[test]
    fn test_sorted_descending() {
        let query = "pricing pressure in enterprise accounts";
        let ranked = rank_for_query(
            query,
            vec![
                record("weak", "unrelated facility maintenance schedule", 0.5),
                record("strong", query, 0.8),
            ],
        );

        assert_eq!(ranked[0].record.id, "strong");
        assert!(ranked[0].relevance >= ranked[1].relevance);
    }

    #[test]
    fn test_ties_preserve_retrieval_order() {
        let query = "quarterly targets";
        let ranked = rank_for_query(
            query,
            vec![
                record("first", "identical content", 0.6),
                record("second", "identical content", 0.6),
            ],
        );

        assert_eq!(ranked[0].relevance, ranked[1].relevance);
        assert_eq!(ranked[0].record.id, "first");
        assert_eq!(ranked[1].record.id, "second");
    }

    #[test]
    fn test_recency_monotonicity() {
        let query = "supply chain risk";
        let now = Utc::now();
        let ranked = rank_for_query(
            query,
            vec![
                with_created_at(record("old", query, 0.8), now - Duration::days(45)),
                with_created_at(record("new", query, 0.8), now),
            ],
        );

        assert_eq!(ranked[0].record.id, "new");
        assert!(ranked[0].relevance >= ranked[1].relevance);
    }

    #[test]
    fn test_stale_record_discount() {
        let query = "margin erosion in retail";
        let now = Utc::now();
        let stale = with_created_at(record("stale", query, 0.8), now - Duration::days(60));
        let fresh_low_prior = with_created_at(record("fresh", query, 0.3), now);

        let ranked = rank_for_query(query, vec![stale, fresh_low_prior]);

        // 0.9 * exp(-60/30) ~= 0.122, well below the fresh record's 0.65
        assert_eq!(ranked[0].record.id, "fresh");
        let stale_score = ranked[1].relevance;
        assert!((stale_score - 0.122).abs() < 5e-3, "got {}", stale_score);
    }

    #[test]
    fn test_confidence_multiplier_compresses_to_half() {
        let query = "data center capacity";
        let ranked = rank_for_query(
            query,
            vec![
                with_confidence(record("zero", query, 0.8), 0.0),
                with_confidence(record("full", query, 0.8), 1.0),
            ],
        );

        let full = ranked.iter().find(|r| r.record.id == "full").unwrap();
        let zero = ranked.iter().find(|r| r.record.id == "zero").unwrap();
        assert!((full.relevance - 0.9).abs() < 1e-3);
        assert!((zero.relevance - 0.45).abs() < 1e-3);
    }

    #[test]
    fn test_empty_content_scores_prior_only_but_stays() {
        let ranked = rank_for_query("anything at all", vec![record("empty", "", 0.8)]);

        assert_eq!(ranked.len(), 1);
        // similarity 0: only the prior half remains
        assert!((ranked[0].relevance - 0.4).abs() < 1e-3);
    }
}
