//! JSONL-file knowledge store backend.
//!
//! Loads an organization's knowledge from a JSONL file (one [`KnowledgeItem`]
//! per line, discriminated by its `collection` tag) and serves reads from
//! memory. Used by the CLI so a knowledge export can be queried directly.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::entities::{CollectionKind, KnowledgeItem};
use crate::error::{StoreError, StoreResult};
use crate::traits::{CollectionFilter, KnowledgeStore};

use super::select_items;

/// Knowledge store backed by a JSONL file, loaded once at open.
pub struct JsonlStore {
    /// Path the store was loaded from.
    path: PathBuf,

    /// All items from the file.
    items: Vec<KnowledgeItem>,
}

impl JsonlStore {
    /// Open a JSONL knowledge file and load all items.
    ///
    /// Lines that fail to parse are skipped with a warning rather than
    /// aborting the load; a partially usable knowledge file still answers
    /// questions.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::DataIo`] if the file cannot be read.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref().to_path_buf();
        debug!("Loading knowledge items from {:?}", path);

        let file = File::open(&path)
            .map_err(|e| StoreError::data_io(&path, format!("Failed to open: {}", e)))?;
        let reader = BufReader::new(file);

        let mut items = Vec::new();
        let mut skipped = 0usize;

        for (line_num, line) in reader.lines().enumerate() {
            let line =
                line.map_err(|e| StoreError::data_io(&path, format!("Failed to read: {}", e)))?;
            if line.trim().is_empty() {
                continue;
            }

            match serde_json::from_str::<KnowledgeItem>(&line) {
                Ok(item) => items.push(item),
                Err(e) => {
                    warn!("Skipping invalid knowledge line {}: {}", line_num + 1, e);
                    skipped += 1;
                }
            }
        }

        debug!(
            "Loaded {} knowledge items from {:?} ({} skipped)",
            items.len(),
            path,
            skipped
        );

        Ok(Self { path, items })
    }

    /// Path the store was loaded from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Total number of items across all collections.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check whether the store holds no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Count items in one collection (any organization).
    pub fn count(&self, kind: CollectionKind) -> usize {
        self.items.iter().filter(|i| i.kind() == kind).count()
    }
}

impl KnowledgeStore for JsonlStore {
    fn read_collection(
        &self,
        kind: CollectionKind,
        organization_id: &str,
        filter: &CollectionFilter,
        limit: usize,
    ) -> StoreResult<Vec<KnowledgeItem>> {
        Ok(select_items(
            &self.items,
            kind,
            organization_id,
            filter,
            limit,
        ))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{Insight, Kpi};
    use std::io::Write;
    use tempfile::TempDir;

    fn write_fixture(dir: &TempDir) -> PathBuf {
        let path = dir.path().join("knowledge.jsonl");
        let mut file = File::create(&path).expect("create fixture");

        let insight: KnowledgeItem =
            Insight::new("ins-1", "org-1", "Churn rising", "Churn is rising in EU.").into();
        let kpi: KnowledgeItem = Kpi::new("kpi-1", "org-1", "Churn", 4.2).with_unit("%").into();

        writeln!(file, "{}", serde_json::to_string(&insight).unwrap()).unwrap();
        writeln!(file).unwrap();
        writeln!(file, "not valid json").unwrap();
        writeln!(file, "{}", serde_json::to_string(&kpi).unwrap()).unwrap();

        path
    }

    #[test]
    fn test_open_skips_invalid_lines() {
        let dir = TempDir::new().unwrap();
        let path = write_fixture(&dir);

        let store = JsonlStore::open(&path).expect("open store");
        assert_eq!(store.len(), 2);
        assert_eq!(store.count(CollectionKind::Insight), 1);
        assert_eq!(store.count(CollectionKind::Kpi), 1);
    }

    #[test]
    fn test_read_collection_from_file() {
        let dir = TempDir::new().unwrap();
        let path = write_fixture(&dir);
        let store = JsonlStore::open(&path).unwrap();

        let items = store
            .read_collection(CollectionKind::Kpi, "org-1", &CollectionFilter::new(), 10)
            .unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id(), "kpi-1");
    }

    #[test]
    fn test_open_missing_file_errors() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope.jsonl");
        assert!(matches!(
            JsonlStore::open(&missing),
            Err(StoreError::DataIo { .. })
        ));
    }
}
