//! In-memory knowledge store backend.
//!
//! Holds all collections in a single vector behind an `RwLock`. Intended for
//! tests and for callers that assemble an organization's knowledge in code.

use std::sync::RwLock;

use tracing::trace;

use crate::entities::{CollectionKind, KnowledgeItem};
use crate::error::{StoreError, StoreResult};
use crate::traits::{CollectionFilter, KnowledgeStore};

use super::select_items;

/// In-memory knowledge store.
#[derive(Default)]
pub struct MemoryStore {
    items: RwLock<Vec<KnowledgeItem>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with items.
    pub fn with_items(items: Vec<KnowledgeItem>) -> Self {
        Self {
            items: RwLock::new(items),
        }
    }

    /// Insert one item.
    pub fn insert(&self, item: impl Into<KnowledgeItem>) -> StoreResult<()> {
        let mut items = self
            .items
            .write()
            .map_err(|e| StoreError::internal(format!("Failed to acquire write lock: {}", e)))?;
        items.push(item.into());
        Ok(())
    }

    /// Insert many items.
    pub fn insert_all(
        &self,
        new_items: impl IntoIterator<Item = KnowledgeItem>,
    ) -> StoreResult<()> {
        let mut items = self
            .items
            .write()
            .map_err(|e| StoreError::internal(format!("Failed to acquire write lock: {}", e)))?;
        items.extend(new_items);
        Ok(())
    }

    /// Total number of items across all collections.
    pub fn len(&self) -> usize {
        self.items.read().map(|items| items.len()).unwrap_or(0)
    }

    /// Check whether the store holds no items.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KnowledgeStore for MemoryStore {
    fn read_collection(
        &self,
        kind: CollectionKind,
        organization_id: &str,
        filter: &CollectionFilter,
        limit: usize,
    ) -> StoreResult<Vec<KnowledgeItem>> {
        trace!("Reading collection '{}' for '{}'", kind, organization_id);

        let items = self
            .items
            .read()
            .map_err(|e| StoreError::internal(format!("Failed to acquire read lock: {}", e)))?;

        Ok(select_items(&items, kind, organization_id, filter, limit))
    }
}

// ============================================================================
// Tests
// ============================================================================
