use crate::error::{CorpusError, Result};
use crate::types::{CorpusStats, Document, DocumentRecord};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::Path;

pub const CORPUS_SCHEMA_VERSION: u32 = 1;

const SAMPLE_TITLE_COUNT: usize = 5;

/// Read-only access to a documentation corpus snapshot.
///
/// The snapshot is produced by an out-of-scope ingestion tool and loaded
/// once at startup; this engine never writes to it. Records live in a
/// `BTreeMap` so corpus iteration order (and therefore ranking tie order)
/// is deterministic.
#[derive(Debug, Clone)]
pub struct CorpusStore {
    records: BTreeMap<String, DocumentRecord>,
}

#[derive(Debug, Serialize, Deserialize)]
struct PersistedCorpus {
    schema_version: u32,
    records: BTreeMap<String, DocumentRecord>,
}

impl CorpusStore {
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        log::info!("Loading corpus snapshot from {}", path.display());
        let bytes = tokio::fs::read(path).await?;
        let persisted: PersistedCorpus = serde_json::from_slice(&bytes)?;
        if persisted.schema_version != CORPUS_SCHEMA_VERSION {
            return Err(CorpusError::SchemaVersion {
                found: persisted.schema_version,
                expected: CORPUS_SCHEMA_VERSION,
            });
        }
        log::info!("Loaded {} documents", persisted.records.len());
        Ok(Self {
            records: persisted.records,
        })
    }

    /// Build a store directly from records (snapshot builders, tests).
    #[must_use]
    pub fn from_records(records: Vec<DocumentRecord>) -> Self {
        Self {
            records: records
                .into_iter()
                .map(|r| (r.document.id.clone(), r))
                .collect(),
        }
    }

    /// Write a snapshot in the persisted format (used by corpus builders).
    pub async fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let persisted = PersistedCorpus {
            schema_version: CORPUS_SCHEMA_VERSION,
            records: self.records.clone(),
        };
        let bytes = serde_json::to_vec(&persisted)?;
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, bytes).await?;
        tokio::fs::rename(&tmp, &path).await?;
        Ok(())
    }

    /// Full-corpus scan, in id order.
    pub fn records(&self) -> impl Iterator<Item = &DocumentRecord> {
        self.records.values()
    }

    /// Corpus scan skipping the given ids (exclusion-list contract).
    pub fn records_excluding<'a>(
        &'a self,
        exclude: &'a HashSet<String>,
    ) -> impl Iterator<Item = &'a DocumentRecord> {
        self.records
            .values()
            .filter(move |r| !exclude.contains(&r.document.id))
    }

    /// Look up one document. An absent id is a `None`, not an error.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Document> {
        self.records.get(id).map(|r| &r.document)
    }

    /// Look up one record including its stored embedding bytes.
    #[must_use]
    pub fn get_record(&self, id: &str) -> Option<&DocumentRecord> {
        self.records.get(id)
    }

    /// Batch lookup; absent ids are skipped.
    #[must_use]
    pub fn get_many(&self, ids: &[String]) -> Vec<&Document> {
        ids.iter().filter_map(|id| self.get(id)).collect()
    }

    #[must_use]
    pub fn stats(&self) -> CorpusStats {
        CorpusStats {
            total_documents: self.records.len(),
            sample_titles: self
                .records
                .values()
                .take(SAMPLE_TITLE_COUNT)
                .map(|r| r.document.title.clone())
                .collect(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector::encode_vector;
    use tempfile::TempDir;

    fn record(id: &str, title: &str, vector: &[f32]) -> DocumentRecord {
        DocumentRecord {
            document: Document {
                id: id.to_string(),
                title: title.to_string(),
                url: format!("https://developer.apple.com/documentation/{id}"),
                content: String::new(),
                doc_type: None,
                description: None,
                platforms: vec![],
                frameworks: vec![],
            },
            embedding: encode_vector(vector),
        }
    }

    #[tokio::test]
    async fn snapshot_roundtrip_and_lookup() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("corpus.json");

        let store = CorpusStore::from_records(vec![
            record("swiftui/state", "State", &[1.0, 0.0]),
            record("uikit/uibutton", "UIButton", &[0.0, 1.0]),
        ]);
        store.save(&path).await.unwrap();

        let loaded = CorpusStore::load(&path).await.unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(
            loaded.get("swiftui/state").map(|d| d.title.as_str()),
            Some("State")
        );
        assert!(loaded.get("missing").is_none());
    }

    #[tokio::test]
    async fn load_rejects_unknown_schema_version() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("corpus.json");
        tokio::fs::write(&path, r#"{"schema_version":99,"records":{}}"#)
            .await
            .unwrap();

        let err = CorpusStore::load(&path).await.unwrap_err();
        assert!(matches!(
            err,
            CorpusError::SchemaVersion {
                found: 99,
                expected: CORPUS_SCHEMA_VERSION
            }
        ));
    }

    #[test]
    fn exclusion_scan_skips_listed_ids() {
        let store = CorpusStore::from_records(vec![
            record("a", "A", &[1.0]),
            record("b", "B", &[1.0]),
            record("c", "C", &[1.0]),
        ]);
        let exclude: HashSet<String> = ["b".to_string()].into_iter().collect();
        let ids: Vec<&str> = store
            .records_excluding(&exclude)
            .map(|r| r.document.id.as_str())
            .collect();
        assert_eq!(ids, vec!["a", "c"]);
    }

    #[test]
    fn stats_sample_first_five_titles() {
        let records: Vec<DocumentRecord> = (0..8)
            .map(|i| record(&format!("doc{i}"), &format!("Title {i}"), &[1.0]))
            .collect();
        let store = CorpusStore::from_records(records);
        let stats = store.stats();
        assert_eq!(stats.total_documents, 8);
        assert_eq!(stats.sample_titles.len(), 5);
    }

    #[test]
    fn get_many_skips_absent_ids() {
        let store = CorpusStore::from_records(vec![record("a", "A", &[1.0])]);
        let docs = store.get_many(&["a".to_string(), "missing".to_string()]);
        assert_eq!(docs.len(), 1);
    }
}
