//! Knowledge store backends.
//!
//! - [`MemoryStore`]: in-memory collections for tests and embedding in other
//!   Rust programs.
//! - [`JsonlStore`]: collections loaded once from a JSONL file; the backing
//!   file is read-only as far as this crate is concerned.

mod jsonl;
mod memory;

pub use jsonl::JsonlStore;
pub use memory::MemoryStore;

use crate::entities::{CollectionKind, KnowledgeItem};
use crate::traits::CollectionFilter;

/// Select items for one collection read: filter, order, cap.
///
/// Shared by the in-memory and JSONL backends. Ordering is
/// most-recently-updated first, per the [`crate::KnowledgeStore`] contract.
fn select_items(
    items: &[KnowledgeItem],
    kind: CollectionKind,
    organization_id: &str,
    filter: &CollectionFilter,
    limit: usize,
) -> Vec<KnowledgeItem> {
    let mut selected: Vec<KnowledgeItem> = items
        .iter()
        .filter(|item| item.kind() == kind)
        .filter(|item| item.organization_id() == organization_id)
        .filter(|item| filter.matches(item))
        .cloned()
        .collect();

    selected.sort_by(|a, b| b.updated_at().cmp(&a.updated_at()));
    selected.truncate(limit);
    selected
}
