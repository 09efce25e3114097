//! Candidate retrieval across knowledge collections.
//!
//! Issues one bounded read per retrieved collection (insights, evidence,
//! KPIs, scenarios - recommendations are link targets only) and normalizes
//! every native item into a [`SourceRecord`]. A failure in one collection
//! never aborts retrieval of the others: that collection contributes zero
//! records and the pipeline continues.

use serde_json::json;
use tracing::{debug, warn};

use okra_store::{
    CollectionFilter, CollectionKind, Evidence, Insight, KnowledgeItem, KnowledgeStore, Kpi,
    Recommendation, Scenario,
};

use crate::config::{BaseRelevanceConfig, RetrievalConfig};
use crate::types::{
    CollectionCount, QueryContext, SourceRecord, METADATA_CONFIDENCE, METADATA_CREATED_AT,
};

/// Collections read per query, in order. Recommendations are deliberately
/// absent: they enter responses only as link targets of other items.
pub const RETRIEVED_COLLECTIONS: [CollectionKind; 4] = [
    CollectionKind::Insight,
    CollectionKind::Evidence,
    CollectionKind::Kpi,
    CollectionKind::Scenario,
];

/// The result of one retrieval pass.
#[derive(Debug, Default)]
pub struct RetrievalOutcome {
    /// Normalized candidate records, in collection-read order.
    pub records: Vec<SourceRecord>,

    /// Per-collection record counts (collections that failed count 0).
    pub counts: Vec<CollectionCount>,
}

/// Retrieve candidate records for a query.
///
/// Never fails: per-collection errors are logged and that collection
/// contributes nothing. An organization with no knowledge yields an empty
/// outcome, which the orchestrator must handle gracefully.
pub fn retrieve(
    store: &dyn KnowledgeStore,
    context: &QueryContext,
    retrieval: &RetrievalConfig,
    base_relevance: &BaseRelevanceConfig,
) -> RetrievalOutcome {
    let mut filter = CollectionFilter::new();
    if let Some(domain) = context.domain {
        filter = filter.with_category(domain.as_str());
    }
    if let Some(ref business_unit_id) = context.business_unit_id {
        filter = filter.with_business_unit(business_unit_id.clone());
    }

    let mut outcome = RetrievalOutcome::default();

    for kind in RETRIEVED_COLLECTIONS {
        let limit = retrieval.limit_for(kind);
        match store.read_collection(kind, &context.organization_id, &filter, limit) {
            Ok(items) => {
                outcome.counts.push(CollectionCount {
                    collection: kind.as_str().to_string(),
                    count: items.len(),
                });
                outcome
                    .records
                    .extend(items.into_iter().map(|item| map_item(item, base_relevance)));
            }
            Err(e) => {
                warn!("Failed to read collection '{}': {}", kind, e);
                outcome.counts.push(CollectionCount {
                    collection: kind.as_str().to_string(),
                    count: 0,
                });
                // Continue with the other collections
            }
        }
    }

    debug!(
        "Retrieved {} candidate records for '{}'",
        outcome.records.len(),
        context.organization_id
    );

    outcome
}

// ============================================================================
// Item mapping
// ============================================================================

/// Normalize one native item into a [`SourceRecord`].
fn map_item(item: KnowledgeItem, base_relevance: &BaseRelevanceConfig) -> SourceRecord {
    match item {
        KnowledgeItem::Insight(insight) => map_insight(insight, base_relevance),
        KnowledgeItem::Evidence(evidence) => map_evidence(evidence, base_relevance),
        KnowledgeItem::Kpi(kpi) => map_kpi(kpi, base_relevance),
        KnowledgeItem::Scenario(scenario) => map_scenario(scenario, base_relevance),
        KnowledgeItem::Recommendation(recommendation) => {
            map_recommendation(recommendation, base_relevance)
        }
    }
}

fn map_insight(insight: Insight, base_relevance: &BaseRelevanceConfig) -> SourceRecord {
    let mut metadata = serde_json::Map::new();
    if let Some(confidence) = insight.confidence {
        metadata.insert(METADATA_CONFIDENCE.to_string(), json!(confidence));
    }
    metadata.insert(
        METADATA_CREATED_AT.to_string(),
        json!(insight.created_at.to_rfc3339()),
    );

    SourceRecord {
        kind: crate::types::SourceKind::Insight,
        id: insight.id,
        title: insight.title,
        content: insight.description,
        base_relevance: base_relevance.for_kind(crate::types::SourceKind::Insight),
        metadata,
    }
}

fn map_evidence(evidence: Evidence, base_relevance: &BaseRelevanceConfig) -> SourceRecord {
    let mut metadata = serde_json::Map::new();
    if let Some(confidence) = evidence.confidence {
        metadata.insert(METADATA_CONFIDENCE.to_string(), json!(confidence));
    }
    metadata.insert(
        METADATA_CREATED_AT.to_string(),
        json!(evidence.created_at.to_rfc3339()),
    );

    let content = match evidence.source {
        Some(ref source) => format!("{} (source: {})", evidence.content, source),
        None => evidence.content,
    };

    SourceRecord {
        kind: crate::types::SourceKind::Evidence,
        id: evidence.id,
        title: evidence.title,
        content,
        base_relevance: base_relevance.for_kind(crate::types::SourceKind::Evidence),
        metadata,
    }
}

fn map_kpi(kpi: Kpi, base_relevance: &BaseRelevanceConfig) -> SourceRecord {
    let mut metadata = serde_json::Map::new();
    metadata.insert(
        METADATA_CREATED_AT.to_string(),
        json!(kpi.created_at.to_rfc3339()),
    );

    SourceRecord {
        kind: crate::types::SourceKind::Kpi,
        id: kpi.id.clone(),
        title: kpi.name.clone(),
        content: kpi_content(&kpi),
        base_relevance: base_relevance.for_kind(crate::types::SourceKind::Kpi),
        metadata,
    }
}

/// Render a KPI reading as text so it can be embedded and quoted.
fn kpi_content(kpi: &Kpi) -> String {
    let mut content = format!("{}: {}", kpi.name, kpi.value);
    if let Some(ref unit) = kpi.unit {
        content.push_str(unit);
    }
    if let Some(target) = kpi.target {
        content.push_str(&format!(" (target {})", target));
    }
    if let Some(ref trend) = kpi.trend {
        content.push_str(&format!(", trending {}", trend));
    }
    content
}

fn map_scenario(scenario: Scenario, base_relevance: &BaseRelevanceConfig) -> SourceRecord {
    let mut metadata = serde_json::Map::new();
    metadata.insert(
        METADATA_CREATED_AT.to_string(),
        json!(scenario.created_at.to_rfc3339()),
    );

    let mut content = scenario.description;
    if let Some(probability) = scenario.probability {
        content.push_str(&format!(" (probability {:.0}%)", probability * 100.0));
    }

    SourceRecord {
        kind: crate::types::SourceKind::Scenario,
        id: scenario.id,
        title: scenario.name,
        content,
        base_relevance: base_relevance.for_kind(crate::types::SourceKind::Scenario),
        metadata,
    }
}

fn map_recommendation(
    recommendation: Recommendation,
    base_relevance: &BaseRelevanceConfig,
) -> SourceRecord {
    let mut metadata = serde_json::Map::new();
    metadata.insert(
        METADATA_CREATED_AT.to_string(),
        json!(recommendation.created_at.to_rfc3339()),
    );

    SourceRecord {
        kind: crate::types::SourceKind::Recommendation,
        id: recommendation.id,
        title: recommendation.title,
        content: recommendation.description,
        base_relevance: base_relevance.for_kind(crate::types::SourceKind::Recommendation),
        metadata,
    }
}

// ============================================================================
// Tests
// ============================================================================
