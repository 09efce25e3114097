//! Configuration types for OKRA.
//!
//! This module provides the configuration structures used by the answer
//! engine:
//! - [`GlobalConfig`]: user-level configuration stored in `~/.okra/config.yaml`
//! - [`ScoringConfig`]: relevance scoring weights
//! - [`RetrievalConfig`]: per-collection retrieval caps
//! - [`SynthesisConfig`]: answer synthesis bounds
//! - [`ModelsConfig`]: embedding/generation capability endpoints
//!
//! The scoring weights are hand-tuned product constants carried over from the
//! original rollout of this feature. Changing them is a product decision, not
//! a correctness one; they are exposed as configuration so that decision can
//! be made without a release.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use okra_model::{EmbeddingConfig, GenerationConfig};
use okra_store::CollectionKind;

use crate::errors::OkraError;
use crate::types::SourceKind;

// ======================================================================
// Scoring Constants
// ======================================================================

/// Weight of the static per-kind prior in the relevance blend.
pub const DEFAULT_PRIOR_WEIGHT: f32 = 0.5;

/// Weight of query-to-content similarity in the relevance blend.
/// Equal to the prior weight so neither a new record kind nor a lucky
/// keyword overlap alone can dominate.
pub const DEFAULT_SIMILARITY_WEIGHT: f32 = 0.5;

/// E-folding time of the recency decay, in days.
/// `relevance *= exp(-age_days / 30)` halves a score roughly every 21 days
/// without ever zeroing it out.
pub const DEFAULT_RECENCY_DECAY_DAYS: f32 = 30.0;

/// Floor of the source-confidence multiplier.
/// Maps confidence in [0, 1] onto [0.5, 1.0] so low-confidence material is
/// discounted but never fully suppressed.
pub const DEFAULT_SOURCE_CONFIDENCE_FLOOR: f32 = 0.5;

/// Base relevance priors per source kind. Insights are the densest form of
/// recorded knowledge; raw KPI readings the sparsest.
pub const DEFAULT_BASE_RELEVANCE_INSIGHT: f32 = 0.8;
pub const DEFAULT_BASE_RELEVANCE_EVIDENCE: f32 = 0.7;
pub const DEFAULT_BASE_RELEVANCE_KPI: f32 = 0.6;
pub const DEFAULT_BASE_RELEVANCE_SCENARIO: f32 = 0.5;
pub const DEFAULT_BASE_RELEVANCE_RECOMMENDATION: f32 = 0.75;

// ======================================================================
// Retrieval Constants
// ======================================================================

/// Per-collection retrieval caps. The candidate set stays bounded and
/// recency-biased before ranking even runs.
pub const DEFAULT_INSIGHT_LIMIT: usize = 20;
pub const DEFAULT_EVIDENCE_LIMIT: usize = 15;
pub const DEFAULT_KPI_LIMIT: usize = 10;
pub const DEFAULT_SCENARIO_LIMIT: usize = 10;

// ======================================================================
// Synthesis Constants
// ======================================================================

/// Number of top-ranked records included in the generation context block.
pub const DEFAULT_CONTEXT_RECORDS: usize = 10;

/// Number of records listed verbatim by the template fallback.
pub const DEFAULT_TEMPLATE_RECORDS: usize = 3;

/// Upper bound on generated answer tokens.
pub const DEFAULT_MAX_ANSWER_TOKENS: u32 = 500;

/// Sampling temperature for answer generation. Low: this is an
/// operational-intelligence tool, not a creative writer.
pub const DEFAULT_ANSWER_TEMPERATURE: f32 = 0.3;

/// Confidence ceiling when the template fallback produced the answer.
pub const DEFAULT_DEGRADED_CONFIDENCE_CAP: f32 = 0.6;

// ============================================================================
// ScoringConfig
// ============================================================================

/// Base relevance priors, one per source kind.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BaseRelevanceConfig {
    pub insight: f32,
    pub evidence: f32,
    pub kpi: f32,
    pub scenario: f32,
    pub recommendation: f32,
}

impl Default for BaseRelevanceConfig {
    fn default() -> Self {
        Self {
            insight: DEFAULT_BASE_RELEVANCE_INSIGHT,
            evidence: DEFAULT_BASE_RELEVANCE_EVIDENCE,
            kpi: DEFAULT_BASE_RELEVANCE_KPI,
            scenario: DEFAULT_BASE_RELEVANCE_SCENARIO,
            recommendation: DEFAULT_BASE_RELEVANCE_RECOMMENDATION,
        }
    }
}

impl BaseRelevanceConfig {
    /// The prior for one source kind.
    pub fn for_kind(&self, kind: SourceKind) -> f32 {
        match kind {
            SourceKind::Insight => self.insight,
            SourceKind::Evidence => self.evidence,
            SourceKind::Kpi => self.kpi,
            SourceKind::Scenario => self.scenario,
            SourceKind::Recommendation => self.recommendation,
        }
    }
}

/// Relevance scoring weights.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ScoringConfig {
    /// Weight of the static per-kind prior.
    pub prior_weight: f32,

    /// Weight of query-to-content similarity.
    pub similarity_weight: f32,

    /// E-folding time of the recency decay, in days.
    pub recency_decay_days: f32,

    /// Floor of the source-confidence multiplier.
    pub source_confidence_floor: f32,

    /// Base relevance priors per source kind.
    #[serde(default)]
    pub base_relevance: BaseRelevanceConfig,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            prior_weight: DEFAULT_PRIOR_WEIGHT,
            similarity_weight: DEFAULT_SIMILARITY_WEIGHT,
            recency_decay_days: DEFAULT_RECENCY_DECAY_DAYS,
            source_confidence_floor: DEFAULT_SOURCE_CONFIDENCE_FLOOR,
            base_relevance: BaseRelevanceConfig::default(),
        }
    }
}

// ============================================================================
// RetrievalConfig
// ============================================================================

/// Per-collection retrieval caps.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RetrievalConfig {
    /// Maximum insights per query.
    pub insight_limit: usize,

    /// Maximum evidence items per query.
    pub evidence_limit: usize,

    /// Maximum KPIs per query.
    pub kpi_limit: usize,

    /// Maximum scenarios per query.
    pub scenario_limit: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            insight_limit: DEFAULT_INSIGHT_LIMIT,
            evidence_limit: DEFAULT_EVIDENCE_LIMIT,
            kpi_limit: DEFAULT_KPI_LIMIT,
            scenario_limit: DEFAULT_SCENARIO_LIMIT,
        }
    }
}

impl RetrievalConfig {
    /// The cap for one collection. Recommendations are never retrieved
    /// directly, so their cap is 0.
    pub fn limit_for(&self, kind: CollectionKind) -> usize {
        match kind {
            CollectionKind::Insight => self.insight_limit,
            CollectionKind::Evidence => self.evidence_limit,
            CollectionKind::Kpi => self.kpi_limit,
            CollectionKind::Scenario => self.scenario_limit,
            CollectionKind::Recommendation => 0,
        }
    }
}

// ============================================================================
// SynthesisConfig
// ============================================================================

/// Answer synthesis bounds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SynthesisConfig {
    /// Number of top-ranked records in the generation context block.
    pub context_records: usize,

    /// Number of records listed verbatim by the template fallback.
    pub template_records: usize,

    /// Upper bound on generated answer tokens.
    pub max_tokens: u32,

    /// Sampling temperature.
    pub temperature: f32,

    /// Confidence ceiling for template-fallback answers.
    pub degraded_confidence_cap: f32,
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            context_records: DEFAULT_CONTEXT_RECORDS,
            template_records: DEFAULT_TEMPLATE_RECORDS,
            max_tokens: DEFAULT_MAX_ANSWER_TOKENS,
            temperature: DEFAULT_ANSWER_TEMPERATURE,
            degraded_confidence_cap: DEFAULT_DEGRADED_CONFIDENCE_CAP,
        }
    }
}

// ============================================================================
// ModelsConfig
// ============================================================================

/// Capability endpoints for embedding and generation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelsConfig {
    /// Embedding capability configuration.
    #[serde(default)]
    pub embedding: EmbeddingConfig,

    /// Generation capability configuration.
    #[serde(default)]
    pub generation: GenerationConfig,
}

// ============================================================================
// GlobalConfig
// ============================================================================

/// Global (user-level) configuration for OKRA.
///
/// Typically loaded from `~/.okra/config.yaml`; a missing file yields the
/// defaults so OKRA works out of the box.
///
/// # Example YAML
///
/// ```yaml
/// models:
///   generation:
///     provider: ollama
///     modelId: llama3.1
/// scoring:
///   recencyDecayDays: 30
/// retrieval:
///   insightLimit: 20
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalConfig {
    /// Relevance scoring weights.
    #[serde(default)]
    pub scoring: ScoringConfig,

    /// Per-collection retrieval caps.
    #[serde(default)]
    pub retrieval: RetrievalConfig,

    /// Answer synthesis bounds.
    #[serde(default)]
    pub synthesis: SynthesisConfig,

    /// Capability endpoints.
    #[serde(default)]
    pub models: ModelsConfig,
}

impl GlobalConfig {
    /// Load the global configuration from the default location
    /// (`~/.okra/config.yaml`).
    ///
    /// If the file does not exist, returns the default configuration.
    ///
    /// # Errors
    ///
    /// Returns [`OkraError::InvalidGlobalConfig`] if the file exists but
    /// cannot be parsed.
    pub fn load_default() -> Result<Self, OkraError> {
        match Self::default_path() {
            Some(path) => Self::from_path(&path),
            None => {
                tracing::debug!("Could not determine home directory, using default config");
                Ok(Self::default())
            }
        }
    }

    /// Load the global configuration from a specific path.
    ///
    /// If the file does not exist, returns the default configuration.
    ///
    /// # Errors
    ///
    /// Returns [`OkraError::InvalidGlobalConfig`] if the file exists but
    /// cannot be parsed, or [`OkraError::InvalidConfiguration`] if validation
    /// fails.
    pub fn from_path(path: &Path) -> Result<Self, OkraError> {
        if !path.exists() {
            tracing::debug!(
                "Global config not found at {}, using defaults",
                path.display()
            );
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| {
            OkraError::InvalidGlobalConfig(format!("Failed to read {}: {}", path.display(), e))
        })?;

        let config: Self = serde_yaml::from_str(&content).map_err(|e| {
            OkraError::InvalidGlobalConfig(format!("Failed to parse {}: {}", path.display(), e))
        })?;

        let warnings = config.validate()?;
        for warning in warnings {
            tracing::warn!("Config warning: {}", warning);
        }

        Ok(config)
    }

    /// Get the default global config directory (`~/.okra`).
    pub fn default_dir() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".okra"))
    }

    /// Get the default global config file path (`~/.okra/config.yaml`).
    pub fn default_path() -> Option<PathBuf> {
        Self::default_dir().map(|d| d.join("config.yaml"))
    }

    /// Validate the configuration.
    ///
    /// Hard errors are values the engine cannot run with; softer issues are
    /// returned as warnings for the caller to log.
    ///
    /// # Errors
    ///
    /// Returns [`OkraError::InvalidConfiguration`] for values that would
    /// break scoring.
    pub fn validate(&self) -> Result<Vec<String>, OkraError> {
        let mut warnings = Vec::new();

        if self.scoring.recency_decay_days <= 0.0 {
            return Err(OkraError::InvalidConfiguration {
                message: format!(
                    "scoring.recencyDecayDays must be positive (got {})",
                    self.scoring.recency_decay_days
                ),
                hint: "Use a positive number of days, e.g. 30".to_string(),
            });
        }

        if !(0.0..=1.0).contains(&self.scoring.source_confidence_floor) {
            return Err(OkraError::InvalidConfiguration {
                message: format!(
                    "scoring.sourceConfidenceFloor must be in [0, 1] (got {})",
                    self.scoring.source_confidence_floor
                ),
                hint: "Use a value between 0 and 1, e.g. 0.5".to_string(),
            });
        }

        let weight_sum = self.scoring.prior_weight + self.scoring.similarity_weight;
        if (weight_sum - 1.0).abs() > 1e-3 {
            warnings.push(format!(
                "scoring weights sum to {} (expected 1.0); relevance scores will be skewed",
                weight_sum
            ));
        }

        if self.retrieval.insight_limit == 0
            && self.retrieval.evidence_limit == 0
            && self.retrieval.kpi_limit == 0
            && self.retrieval.scenario_limit == 0
        {
            warnings.push("all retrieval limits are 0; every query will run without context".to_string());
        }

        if self.synthesis.temperature > 1.0 {
            warnings.push(format!(
                "synthesis.temperature {} is high for a factual tool",
                self.synthesis.temperature
            ));
        }

        Ok(warnings)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config_is_valid() {
        let config = GlobalConfig::default();
        let warnings = config.validate().expect("defaults validate");
        assert!(warnings.is_empty(), "unexpected warnings: {:?}", warnings);
    }

    #[test]
    fn test_default_scoring_values() {
        let scoring = ScoringConfig::default();
        assert_eq!(scoring.prior_weight, 0.5);
        assert_eq!(scoring.similarity_weight, 0.5);
        assert_eq!(scoring.recency_decay_days, 30.0);
        assert_eq!(scoring.source_confidence_floor, 0.5);
        assert_eq!(scoring.base_relevance.for_kind(SourceKind::Insight), 0.8);
        assert_eq!(scoring.base_relevance.for_kind(SourceKind::Evidence), 0.7);
        assert_eq!(scoring.base_relevance.for_kind(SourceKind::Kpi), 0.6);
        assert_eq!(scoring.base_relevance.for_kind(SourceKind::Scenario), 0.5);
    }

    #[test]
    fn test_default_retrieval_limits() {
        let retrieval = RetrievalConfig::default();
        assert_eq!(retrieval.limit_for(CollectionKind::Insight), 20);
        assert_eq!(retrieval.limit_for(CollectionKind::Evidence), 15);
        assert_eq!(retrieval.limit_for(CollectionKind::Kpi), 10);
        assert_eq!(retrieval.limit_for(CollectionKind::Scenario), 10);
        assert_eq!(retrieval.limit_for(CollectionKind::Recommendation), 0);
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = GlobalConfig::from_path(&dir.path().join("nope.yaml")).unwrap();
        assert_eq!(config.retrieval.insight_limit, DEFAULT_INSIGHT_LIMIT);
    }

    #[test]
    fn test_partial_yaml_overrides() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        let mut file = fs::File::create(&path).unwrap();
        writeln!(file, "retrieval:\n  insightLimit: 5").unwrap();

        let config = GlobalConfig::from_path(&path).unwrap();
        assert_eq!(config.retrieval.insight_limit, 5);
        // Untouched sections keep their defaults
        assert_eq!(config.retrieval.evidence_limit, DEFAULT_EVIDENCE_LIMIT);
        assert_eq!(config.scoring.prior_weight, DEFAULT_PRIOR_WEIGHT);
    }

    #[test]
    fn test_invalid_decay_rejected() {
        let mut config = GlobalConfig::default();
        config.scoring.recency_decay_days = 0.0;
        assert!(matches!(
            config.validate(),
            Err(OkraError::InvalidConfiguration { .. })
        ));
    }
}
