//! Native knowledge item shapes stored per collection.
//!
//! An organization's knowledge lives in five collections: insights, evidence,
//! KPIs, scenarios, and recommendations. Each collection has its own native
//! shape; [`KnowledgeItem`] is the closed sum over all of them so consumers
//! handle every case at compile time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// CollectionKind
// ============================================================================

/// The five knowledge collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollectionKind {
    /// Written analyst insights.
    Insight,
    /// Evidence items backing insights.
    Evidence,
    /// Key performance indicators.
    Kpi,
    /// Forward-looking scenarios.
    Scenario,
    /// Recommendations (link targets, not retrieved directly by the engine).
    Recommendation,
}

impl CollectionKind {
    /// All collection kinds, in retrieval order.
    pub const ALL: [CollectionKind; 5] = [
        CollectionKind::Insight,
        CollectionKind::Evidence,
        CollectionKind::Kpi,
        CollectionKind::Scenario,
        CollectionKind::Recommendation,
    ];

    /// Get the collection name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            CollectionKind::Insight => "insight",
            CollectionKind::Evidence => "evidence",
            CollectionKind::Kpi => "kpi",
            CollectionKind::Scenario => "scenario",
            CollectionKind::Recommendation => "recommendation",
        }
    }
}

impl std::fmt::Display for CollectionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for CollectionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "insight" | "insights" => Ok(Self::Insight),
            "evidence" => Ok(Self::Evidence),
            "kpi" | "kpis" => Ok(Self::Kpi),
            "scenario" | "scenarios" => Ok(Self::Scenario),
            "recommendation" | "recommendations" => Ok(Self::Recommendation),
            _ => Err(format!(
                "Unknown collection: '{}'. Use 'insight', 'evidence', 'kpi', 'scenario', or 'recommendation'.",
                s
            )),
        }
    }
}

// ============================================================================
// Insight
// ============================================================================

/// A written analyst insight.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Insight {
    /// Unique identifier within the insights collection.
    pub id: String,

    /// Owning organization.
    pub organization_id: String,

    /// Short headline.
    pub title: String,

    /// Full insight text.
    pub description: String,

    /// Topical category (e.g., "strategic", "financial").
    #[serde(default)]
    pub category: Option<String>,

    /// Business unit scope, if the insight is unit-specific.
    #[serde(default)]
    pub business_unit_id: Option<String>,

    /// Author-assessed confidence in [0, 1].
    #[serde(default)]
    pub confidence: Option<f32>,

    /// When the insight was created.
    pub created_at: DateTime<Utc>,

    /// When the insight was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Insight {
    /// Create an insight with required fields; timestamps default to now.
    pub fn new(
        id: impl Into<String>,
        organization_id: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            organization_id: organization_id.into(),
            title: title.into(),
            description: description.into(),
            category: None,
            business_unit_id: None,
            confidence: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Set the category.
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Set the business unit.
    pub fn with_business_unit(mut self, business_unit_id: impl Into<String>) -> Self {
        self.business_unit_id = Some(business_unit_id.into());
        self
    }

    /// Set the confidence.
    pub fn with_confidence(mut self, confidence: f32) -> Self {
        self.confidence = Some(confidence);
        self
    }

    /// Set both timestamps.
    pub fn with_timestamps(mut self, created_at: DateTime<Utc>, updated_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self.updated_at = updated_at;
        self
    }
}

// ============================================================================
// Evidence
// ============================================================================

/// An evidence item backing one or more insights.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Evidence {
    /// Unique identifier within the evidence collection.
    pub id: String,

    /// Owning organization.
    pub organization_id: String,

    /// Short headline.
    pub title: String,

    /// Evidence body text.
    pub content: String,

    /// Where the evidence came from (report, interview, system).
    #[serde(default)]
    pub source: Option<String>,

    /// Topical category.
    #[serde(default)]
    pub category: Option<String>,

    /// Business unit scope.
    #[serde(default)]
    pub business_unit_id: Option<String>,

    /// Assessed reliability in [0, 1].
    #[serde(default)]
    pub confidence: Option<f32>,

    /// When the evidence was recorded.
    pub created_at: DateTime<Utc>,

    /// When the evidence was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Evidence {
    /// Create an evidence item with required fields; timestamps default to now.
    pub fn new(
        id: impl Into<String>,
        organization_id: impl Into<String>,
        title: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            organization_id: organization_id.into(),
            title: title.into(),
            content: content.into(),
            source: None,
            category: None,
            business_unit_id: None,
            confidence: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Set the source.
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Set the category.
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Set the business unit.
    pub fn with_business_unit(mut self, business_unit_id: impl Into<String>) -> Self {
        self.business_unit_id = Some(business_unit_id.into());
        self
    }

    /// Set the confidence.
    pub fn with_confidence(mut self, confidence: f32) -> Self {
        self.confidence = Some(confidence);
        self
    }

    /// Set both timestamps.
    pub fn with_timestamps(mut self, created_at: DateTime<Utc>, updated_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self.updated_at = updated_at;
        self
    }
}

// ============================================================================
// Kpi
// ============================================================================

/// A key performance indicator reading.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Kpi {
    /// Unique identifier within the KPI collection.
    pub id: String,

    /// Owning organization.
    pub organization_id: String,

    /// Indicator name (e.g., "Monthly churn rate").
    pub name: String,

    /// Current value.
    pub value: f64,

    /// Unit of measure (e.g., "%", "USD").
    #[serde(default)]
    pub unit: Option<String>,

    /// Target value, if one is set.
    #[serde(default)]
    pub target: Option<f64>,

    /// Trend direction ("up", "down", "flat").
    #[serde(default)]
    pub trend: Option<String>,

    /// Topical category.
    #[serde(default)]
    pub category: Option<String>,

    /// Business unit scope.
    #[serde(default)]
    pub business_unit_id: Option<String>,

    /// When the indicator was created.
    pub created_at: DateTime<Utc>,

    /// When the reading was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Kpi {
    /// Create a KPI with required fields; timestamps default to now.
    pub fn new(
        id: impl Into<String>,
        organization_id: impl Into<String>,
        name: impl Into<String>,
        value: f64,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            organization_id: organization_id.into(),
            name: name.into(),
            value,
            unit: None,
            target: None,
            trend: None,
            category: None,
            business_unit_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Set the unit of measure.
    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    /// Set the target value.
    pub fn with_target(mut self, target: f64) -> Self {
        self.target = Some(target);
        self
    }

    /// Set the trend direction.
    pub fn with_trend(mut self, trend: impl Into<String>) -> Self {
        self.trend = Some(trend.into());
        self
    }

    /// Set the category.
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Set the business unit.
    pub fn with_business_unit(mut self, business_unit_id: impl Into<String>) -> Self {
        self.business_unit_id = Some(business_unit_id.into());
        self
    }

    /// Set both timestamps.
    pub fn with_timestamps(mut self, created_at: DateTime<Utc>, updated_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self.updated_at = updated_at;
        self
    }
}

// ============================================================================
// Scenario
// ============================================================================

/// A forward-looking scenario.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scenario {
    /// Unique identifier within the scenarios collection.
    pub id: String,

    /// Owning organization.
    pub organization_id: String,

    /// Scenario name.
    pub name: String,

    /// Scenario narrative.
    pub description: String,

    /// Estimated probability in [0, 1].
    #[serde(default)]
    pub probability: Option<f32>,

    /// Qualitative impact ("low", "medium", "high").
    #[serde(default)]
    pub impact: Option<String>,

    /// Topical category.
    #[serde(default)]
    pub category: Option<String>,

    /// Business unit scope.
    #[serde(default)]
    pub business_unit_id: Option<String>,

    /// When the scenario was created.
    pub created_at: DateTime<Utc>,

    /// When the scenario was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Scenario {
    /// Create a scenario with required fields; timestamps default to now.
    pub fn new(
        id: impl Into<String>,
        organization_id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            organization_id: organization_id.into(),
            name: name.into(),
            description: description.into(),
            probability: None,
            impact: None,
            category: None,
            business_unit_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Set the probability.
    pub fn with_probability(mut self, probability: f32) -> Self {
        self.probability = Some(probability);
        self
    }

    /// Set the impact.
    pub fn with_impact(mut self, impact: impl Into<String>) -> Self {
        self.impact = Some(impact.into());
        self
    }

    /// Set the category.
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Set the business unit.
    pub fn with_business_unit(mut self, business_unit_id: impl Into<String>) -> Self {
        self.business_unit_id = Some(business_unit_id.into());
        self
    }

    /// Set both timestamps.
    pub fn with_timestamps(mut self, created_at: DateTime<Utc>, updated_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self.updated_at = updated_at;
        self
    }
}

// ============================================================================
// Recommendation
// ============================================================================

/// A recommendation derived from prior analysis.
///
/// Recommendations are kept as link targets for insights and alerts; the
/// answer engine never reads this collection directly.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    /// Unique identifier within the recommendations collection.
    pub id: String,

    /// Owning organization.
    pub organization_id: String,

    /// Short headline.
    pub title: String,

    /// Recommended course of action.
    pub description: String,

    /// Priority label ("low", "medium", "high").
    #[serde(default)]
    pub priority: Option<String>,

    /// Lifecycle status ("open", "accepted", "done").
    #[serde(default)]
    pub status: Option<String>,

    /// Topical category.
    #[serde(default)]
    pub category: Option<String>,

    /// Business unit scope.
    #[serde(default)]
    pub business_unit_id: Option<String>,

    /// When the recommendation was created.
    pub created_at: DateTime<Utc>,

    /// When the recommendation was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Recommendation {
    /// Create a recommendation with required fields; timestamps default to now.
    pub fn new(
        id: impl Into<String>,
        organization_id: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            organization_id: organization_id.into(),
            title: title.into(),
            description: description.into(),
            priority: None,
            status: None,
            category: None,
            business_unit_id: None,
            created_at: now,
            updated_at: now,
        }
    }
}

// ============================================================================
// KnowledgeItem
// ============================================================================

/// One knowledge item, discriminated by its collection.
///
/// Serialized with a `collection` tag so a JSONL data file can mix all five
/// collections in one stream:
///
/// ```json
/// {"collection":"insight","id":"ins-1","organizationId":"org-1", ...}
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "collection", rename_all = "lowercase")]
pub enum KnowledgeItem {
    Insight(Insight),
    Evidence(Evidence),
    Kpi(Kpi),
    Scenario(Scenario),
    Recommendation(Recommendation),
}

impl KnowledgeItem {
    /// The collection this item belongs to.
    pub fn kind(&self) -> CollectionKind {
        match self {
            KnowledgeItem::Insight(_) => CollectionKind::Insight,
            KnowledgeItem::Evidence(_) => CollectionKind::Evidence,
            KnowledgeItem::Kpi(_) => CollectionKind::Kpi,
            KnowledgeItem::Scenario(_) => CollectionKind::Scenario,
            KnowledgeItem::Recommendation(_) => CollectionKind::Recommendation,
        }
    }

    /// The item identifier (unique within its collection).
    pub fn id(&self) -> &str {
        match self {
            KnowledgeItem::Insight(i) => &i.id,
            KnowledgeItem::Evidence(e) => &e.id,
            KnowledgeItem::Kpi(k) => &k.id,
            KnowledgeItem::Scenario(s) => &s.id,
            KnowledgeItem::Recommendation(r) => &r.id,
        }
    }

    /// The owning organization.
    pub fn organization_id(&self) -> &str {
        match self {
            KnowledgeItem::Insight(i) => &i.organization_id,
            KnowledgeItem::Evidence(e) => &e.organization_id,
            KnowledgeItem::Kpi(k) => &k.organization_id,
            KnowledgeItem::Scenario(s) => &s.organization_id,
            KnowledgeItem::Recommendation(r) => &r.organization_id,
        }
    }

    /// The topical category, if any.
    pub fn category(&self) -> Option<&str> {
        match self {
            KnowledgeItem::Insight(i) => i.category.as_deref(),
            KnowledgeItem::Evidence(e) => e.category.as_deref(),
            KnowledgeItem::Kpi(k) => k.category.as_deref(),
            KnowledgeItem::Scenario(s) => s.category.as_deref(),
            KnowledgeItem::Recommendation(r) => r.category.as_deref(),
        }
    }

    /// The business unit scope, if any.
    pub fn business_unit_id(&self) -> Option<&str> {
        match self {
            KnowledgeItem::Insight(i) => i.business_unit_id.as_deref(),
            KnowledgeItem::Evidence(e) => e.business_unit_id.as_deref(),
            KnowledgeItem::Kpi(k) => k.business_unit_id.as_deref(),
            KnowledgeItem::Scenario(s) => s.business_unit_id.as_deref(),
            KnowledgeItem::Recommendation(r) => r.business_unit_id.as_deref(),
        }
    }

    /// When the item was last updated.
    pub fn updated_at(&self) -> DateTime<Utc> {
        match self {
            KnowledgeItem::Insight(i) => i.updated_at,
            KnowledgeItem::Evidence(e) => e.updated_at,
            KnowledgeItem::Kpi(k) => k.updated_at,
            KnowledgeItem::Scenario(s) => s.updated_at,
            KnowledgeItem::Recommendation(r) => r.updated_at,
        }
    }
}

impl From<Insight> for KnowledgeItem {
    fn from(item: Insight) -> Self {
        KnowledgeItem::Insight(item)
    }
}

impl From<Evidence> for KnowledgeItem {
    fn from(item: Evidence) -> Self {
        KnowledgeItem::Evidence(item)
    }
}

impl From<Kpi> for KnowledgeItem {
    fn from(item: Kpi) -> Self {
        KnowledgeItem::Kpi(item)
    }
}

impl From<Scenario> for KnowledgeItem {
    fn from(item: Scenario) -> Self {
        KnowledgeItem::Scenario(item)
    }
}

impl From<Recommendation> for KnowledgeItem {
    fn from(item: Recommendation) -> Self {
        KnowledgeItem::Recommendation(item)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_collection_kind_roundtrip() {
        for kind in CollectionKind::ALL {
            assert_eq!(CollectionKind::from_str(kind.as_str()).unwrap(), kind);
        }
        assert_eq!(
            CollectionKind::from_str("KPIs").unwrap(),
            CollectionKind::Kpi
        );
        assert!(CollectionKind::from_str("widgets").is_err());
    }

    #[test]
    fn test_knowledge_item_tagged_serialization() {
        let item: KnowledgeItem = Insight::new("ins-1", "org-1", "Churn rising", "Churn is up.")
            .with_category("operational")
            .into();

        let json = serde_json::to_string(&item).expect("serialize");
        assert!(json.contains(r#""collection":"insight""#));
        assert!(json.contains(r#""organizationId":"org-1""#));

        let parsed: KnowledgeItem = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(parsed.kind(), CollectionKind::Insight);
        assert_eq!(parsed.id(), "ins-1");
        assert_eq!(parsed.category(), Some("operational"));
    }

    #[test]
    fn test_kpi_accessors() {
        let item: KnowledgeItem = Kpi::new("kpi-1", "org-1", "Churn", 4.2)
            .with_unit("%")
            .with_target(3.0)
            .with_business_unit("bu-9")
            .into();

        assert_eq!(item.kind(), CollectionKind::Kpi);
        assert_eq!(item.business_unit_id(), Some("bu-9"));
        assert_eq!(item.category(), None);
    }
}
