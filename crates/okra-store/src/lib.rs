//! # okra-store
//!
//! Infrastructure layer for OKRA - knowledge collection storage.
//!
//! This crate provides the read boundary between the answer engine in
//! `okra-core` and whatever system actually persists an organization's
//! knowledge items. The engine only ever consumes the [`KnowledgeStore`]
//! trait; concrete backends live here so that:
//!
//! - Changes to `okra-core` compile fast (no storage deps)
//! - Storage backends can be swapped without changing domain logic
//! - Testing is easy with the in-memory backend
//!
//! ## Architecture
//!
//! ```text
//! okra-cli → okra-core → (traits)
//!                ↑
//!            okra-store (implements KnowledgeStore)
//!            okra-model (implements embedding/generation backends)
//! ```
//!
//! ## Backends
//!
//! - [`MemoryStore`]: in-memory collections, used by tests and embedders
//! - [`JsonlStore`]: collections loaded from a JSONL file, used by the CLI
//!
//! ## Usage
//!
//! ```ignore
//! use okra_store::{JsonlStore, KnowledgeStore, CollectionKind, CollectionFilter};
//!
//! let store = JsonlStore::open("knowledge.jsonl")?;
//! let items = store.read_collection(
//!     CollectionKind::Insight,
//!     "org-42",
//!     &CollectionFilter::default(),
//!     20,
//! )?;
//! ```

pub mod backend;
pub mod entities;
pub mod error;
pub mod traits;

pub use backend::{JsonlStore, MemoryStore};
pub use entities::{
    CollectionKind, Evidence, Insight, KnowledgeItem, Kpi, Recommendation, Scenario,
};
pub use error::{StoreError, StoreResult};
pub use traits::{CollectionFilter, KnowledgeStore};
