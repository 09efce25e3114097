//! Common types for the OKRA answer engine.
//!
//! Everything here is request-scoped: created when a query arrives, returned
//! to the caller, never persisted by the engine.

use serde::{Deserialize, Serialize};

use okra_store::CollectionKind;

// ============================================================================
// Metadata keys
// ============================================================================

/// Metadata key carrying an item's source confidence in [0, 1].
pub const METADATA_CONFIDENCE: &str = "confidence";

/// Metadata key carrying an item's creation timestamp (RFC 3339).
pub const METADATA_CREATED_AT: &str = "created_at";

// ============================================================================
// QueryDomain
// ============================================================================

/// Topical domain a query can be scoped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryDomain {
    Strategic,
    Operational,
    Financial,
    Risk,
    Innovation,
}

impl QueryDomain {
    /// Get the domain name as a string.
    ///
    /// Doubles as the store-side category filter value.
    pub fn as_str(&self) -> &'static str {
        match self {
            QueryDomain::Strategic => "strategic",
            QueryDomain::Operational => "operational",
            QueryDomain::Financial => "financial",
            QueryDomain::Risk => "risk",
            QueryDomain::Innovation => "innovation",
        }
    }
}

impl std::fmt::Display for QueryDomain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for QueryDomain {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "strategic" => Ok(Self::Strategic),
            "operational" => Ok(Self::Operational),
            "financial" => Ok(Self::Financial),
            "risk" => Ok(Self::Risk),
            "innovation" => Ok(Self::Innovation),
            _ => Err(format!(
                "Unknown domain: '{}'. Use 'strategic', 'operational', 'financial', 'risk', or 'innovation'.",
                s
            )),
        }
    }
}

// ============================================================================
// Timeframe
// ============================================================================

/// Temporal scope of a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Timeframe {
    Current,
    Historical,
    Future,
}

impl Timeframe {
    /// Get the timeframe as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Timeframe::Current => "current",
            Timeframe::Historical => "historical",
            Timeframe::Future => "future",
        }
    }
}

impl std::fmt::Display for Timeframe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Timeframe {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "current" => Ok(Self::Current),
            "historical" => Ok(Self::Historical),
            "future" => Ok(Self::Future),
            _ => Err(format!(
                "Unknown timeframe: '{}'. Use 'current', 'historical', or 'future'.",
                s
            )),
        }
    }
}

// ============================================================================
// QueryContext
// ============================================================================

/// One question scoped to an organization.
///
/// Immutable once constructed; one `QueryContext` is consumed per
/// [`crate::OkraEngine::answer_query`] call.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryContext {
    /// The natural-language question.
    pub query: String,

    /// The organization whose knowledge is queried.
    pub organization_id: String,

    /// Optional topical domain scope.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<QueryDomain>,

    /// Optional temporal scope.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeframe: Option<Timeframe>,

    /// Optional business unit scope.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business_unit_id: Option<String>,

    /// Optional initiative scope.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initiative_id: Option<String>,

    /// Optional caller-supplied confidence threshold.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence_threshold: Option<f32>,
}

impl QueryContext {
    /// Create a context with the required fields.
    pub fn new(query: impl Into<String>, organization_id: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            organization_id: organization_id.into(),
            domain: None,
            timeframe: None,
            business_unit_id: None,
            initiative_id: None,
            confidence_threshold: None,
        }
    }

    /// Set the topical domain.
    pub fn with_domain(mut self, domain: QueryDomain) -> Self {
        self.domain = Some(domain);
        self
    }

    /// Set the temporal scope.
    pub fn with_timeframe(mut self, timeframe: Timeframe) -> Self {
        self.timeframe = Some(timeframe);
        self
    }

    /// Set the business unit scope.
    pub fn with_business_unit(mut self, business_unit_id: impl Into<String>) -> Self {
        self.business_unit_id = Some(business_unit_id.into());
        self
    }

    /// Set the initiative scope.
    pub fn with_initiative(mut self, initiative_id: impl Into<String>) -> Self {
        self.initiative_id = Some(initiative_id.into());
        self
    }

    /// Set the confidence threshold.
    pub fn with_confidence_threshold(mut self, threshold: f32) -> Self {
        self.confidence_threshold = Some(threshold);
        self
    }
}

// ============================================================================
// SourceKind
// ============================================================================

/// The kind of knowledge a source record was drawn from.
///
/// A closed enum so every consumer (ranker, related-question lookup, display)
/// handles all five cases at compile time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Insight,
    Evidence,
    Kpi,
    Scenario,
    Recommendation,
}

impl SourceKind {
    /// Get the kind as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::Insight => "insight",
            SourceKind::Evidence => "evidence",
            SourceKind::Kpi => "kpi",
            SourceKind::Scenario => "scenario",
            SourceKind::Recommendation => "recommendation",
        }
    }

    /// Uppercase label used in synthesis context blocks (`[INSIGHT] ...`).
    pub fn context_label(&self) -> &'static str {
        match self {
            SourceKind::Insight => "INSIGHT",
            SourceKind::Evidence => "EVIDENCE",
            SourceKind::Kpi => "KPI",
            SourceKind::Scenario => "SCENARIO",
            SourceKind::Recommendation => "RECOMMENDATION",
        }
    }
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<CollectionKind> for SourceKind {
    fn from(kind: CollectionKind) -> Self {
        match kind {
            CollectionKind::Insight => SourceKind::Insight,
            CollectionKind::Evidence => SourceKind::Evidence,
            CollectionKind::Kpi => SourceKind::Kpi,
            CollectionKind::Scenario => SourceKind::Scenario,
            CollectionKind::Recommendation => SourceKind::Recommendation,
        }
    }
}

// ============================================================================
// SourceRecord
// ============================================================================

/// One normalized unit of retrieved knowledge.
///
/// Produced by retrieval, read-only downstream. `metadata` may carry
/// [`METADATA_CONFIDENCE`] and [`METADATA_CREATED_AT`], which the ranker
/// consumes when present.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceRecord {
    /// The collection this record came from.
    pub kind: SourceKind,

    /// Item identifier, unique within its kind.
    pub id: String,

    /// Short headline.
    pub title: String,

    /// Text used for embedding and synthesis context.
    pub content: String,

    /// Static per-kind usefulness prior in [0, 1].
    pub base_relevance: f32,

    /// Extra attributes (confidence, creation timestamp).
    #[serde(default)]
    pub metadata: serde_json::Map<String, serde_json::Value>,
}

impl SourceRecord {
    /// Source confidence from metadata, if present and valid.
    pub fn source_confidence(&self) -> Option<f32> {
        self.metadata
            .get(METADATA_CONFIDENCE)
            .and_then(|v| v.as_f64())
            .map(|v| v as f32)
    }

    /// Creation timestamp from metadata, if present and parseable.
    pub fn created_at(&self) -> Option<chrono::DateTime<chrono::Utc>> {
        self.metadata
            .get(METADATA_CREATED_AT)
            .and_then(|v| v.as_str())
            .and_then(|s| chrono::DateTime::parse_from_rfc3339(s).ok())
            .map(|dt| dt.with_timezone(&chrono::Utc))
    }
}

// ============================================================================
// RankedSource
// ============================================================================

/// A source record with its computed relevance score.
///
/// `relevance` is monotonic for ordering only; it is not bounded to [0, 1]
/// and must never be displayed as a probability.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedSource {
    /// The underlying record.
    #[serde(flatten)]
    pub record: SourceRecord,

    /// Combined relevance score (higher is better).
    pub relevance: f32,
}

// ============================================================================
// ActionItem
// ============================================================================

/// The kind of follow-up an extracted sentence suggests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    Recommendation,
    Investigation,
    Decision,
}

impl ActionKind {
    /// Get the kind as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::Recommendation => "recommendation",
            ActionKind::Investigation => "investigation",
            ActionKind::Decision => "decision",
        }
    }
}

impl std::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Priority of an extracted action item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionPriority {
    Low,
    Medium,
    High,
}

impl ActionPriority {
    /// Get the priority as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionPriority::Low => "low",
            ActionPriority::Medium => "medium",
            ActionPriority::High => "high",
        }
    }
}

impl std::fmt::Display for ActionPriority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An actionable sentence extracted from the answer, intended to seed a
/// follow-up task.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionItem {
    /// What kind of follow-up this is.
    pub kind: ActionKind,

    /// How urgent the follow-up is.
    pub priority: ActionPriority,

    /// The extracted sentence (truncated to 200 characters).
    pub description: String,

    /// Suggested owner, when one can be inferred.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
}

// ============================================================================
// AnswerBundle
// ============================================================================

/// Per-collection record count from retrieval, for debugging.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionCount {
    /// Collection name.
    pub collection: String,
    /// Number of records contributed.
    pub count: usize,
}

/// Technical metadata for debugging the answer pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerDebugInfo {
    /// The embedding model used for the query ("local-hash" for the
    /// deterministic fallback).
    pub embedding_model_id: String,

    /// Whether the degraded path (no generation backend) was taken.
    #[serde(default)]
    pub degraded: bool,

    /// Per-collection record counts.
    #[serde(default)]
    pub per_collection_counts: Vec<CollectionCount>,

    /// Retrieval time in milliseconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retrieve_time_ms: Option<u64>,

    /// Ranking (including per-record embedding) time in milliseconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rank_time_ms: Option<u64>,

    /// Synthesis time in milliseconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub synthesize_time_ms: Option<u64>,
}

/// Canonical output of one answered query.
///
/// Always structurally valid: degradation is communicated only through lower
/// `confidence` and explanatory `answer` text, never through a missing field
/// or an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerBundle {
    /// The original question.
    pub question: String,

    /// The synthesized (or template) answer text.
    pub answer: String,

    /// Self-assessed reliability in [0.1, 0.95].
    pub confidence: f32,

    /// Top-ranked sources grounding the answer (at most 5, non-increasing
    /// relevance, always a prefix of the full ranked list).
    pub sources: Vec<RankedSource>,

    /// Related follow-up questions (at most 5, deduplicated).
    pub related_questions: Vec<String>,

    /// Extracted action items (at most 5, in sentence order).
    pub action_items: Vec<ActionItem>,

    /// Technical metadata for debugging.
    pub debug: AnswerDebugInfo,
}

// ============================================================================
// Tests
// ============================================================================
