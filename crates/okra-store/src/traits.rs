//! Knowledge store traits and read-filter types.
//!
//! This module defines the read boundary consumed by the answer engine.

use serde::{Deserialize, Serialize};

use crate::entities::{CollectionKind, KnowledgeItem};
use crate::error::StoreResult;

// ============================================================================
// CollectionFilter
// ============================================================================

/// Optional narrowing filters for a collection read.
///
/// All filters are conjunctive: an item must match every filter that is set.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionFilter {
    /// Restrict to items with this topical category.
    #[serde(default)]
    pub category: Option<String>,

    /// Restrict to items scoped to this business unit.
    #[serde(default)]
    pub business_unit_id: Option<String>,
}

impl CollectionFilter {
    /// Create an empty filter (matches everything in the organization).
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the category filter.
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Set the business unit filter.
    pub fn with_business_unit(mut self, business_unit_id: impl Into<String>) -> Self {
        self.business_unit_id = Some(business_unit_id.into());
        self
    }

    /// Check whether an item passes this filter.
    ///
    /// A set category filter matches items with the same category; items with
    /// no category are excluded. The same rule applies to business units.
    pub fn matches(&self, item: &KnowledgeItem) -> bool {
        if let Some(ref category) = self.category {
            match item.category() {
                Some(c) if c.eq_ignore_ascii_case(category) => {}
                _ => return false,
            }
        }

        if let Some(ref business_unit_id) = self.business_unit_id {
            match item.business_unit_id() {
                Some(b) if b == business_unit_id => {}
                _ => return false,
            }
        }

        true
    }
}

// ============================================================================
// KnowledgeStore Trait
// ============================================================================

/// Read interface over an organization's knowledge collections.
///
/// This is the only surface the answer engine consumes. Implementations must
/// be `Send + Sync`; the engine issues bounded, independent reads and treats
/// any error as "this collection contributed nothing".
///
/// ## Implementation Notes
///
/// - Results must be ordered most-recently-updated first.
/// - Results must be capped at `limit` entries.
/// - Items from other organizations must never be returned.
pub trait KnowledgeStore: Send + Sync {
    /// Read up to `limit` items from one collection of one organization.
    ///
    /// # Arguments
    /// * `kind` - The collection to read.
    /// * `organization_id` - The owning organization.
    /// * `filter` - Optional category / business-unit narrowing.
    /// * `limit` - Maximum number of items to return.
    fn read_collection(
        &self,
        kind: CollectionKind,
        organization_id: &str,
        filter: &CollectionFilter,
        limit: usize,
    ) -> StoreResult<Vec<KnowledgeItem>>;
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::Insight;

    #[test]
    fn test_empty_filter_matches_everything() {
        let filter = CollectionFilter::new();
        let item: KnowledgeItem = Insight::new("i1", "org-1", "t", "d").into();
        assert!(filter.matches(&item));
    }

    #[test]
    fn test_category_filter_excludes_uncategorized() {
        let filter = CollectionFilter::new().with_category("strategic");

        let tagged: KnowledgeItem = Insight::new("i1", "org-1", "t", "d")
            .with_category("Strategic")
            .into();
        let untagged: KnowledgeItem = Insight::new("i2", "org-1", "t", "d").into();

        assert!(filter.matches(&tagged));
        assert!(!filter.matches(&untagged));
    }

    #[test]
    fn test_business_unit_filter() {
        let filter = CollectionFilter::new().with_business_unit("bu-1");

        let in_unit: KnowledgeItem = Insight::new("i1", "org-1", "t", "d")
            .with_business_unit("bu-1")
            .into();
        let other_unit: KnowledgeItem = Insight::new("i2", "org-1", "t", "d")
            .with_business_unit("bu-2")
            .into();

        assert!(filter.matches(&in_unit));
        assert!(!filter.matches(&other_unit));
    }
}
