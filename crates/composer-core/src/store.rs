//! Document stores.
//!
//! ## Learning: Async Traits
//!
//! `async fn` in a trait object needs boxing. `#[async_trait]` writes the
//! `Pin<Box<dyn Future + Send>>` plumbing for us, so a session can hold an
//! `Arc<dyn DocumentStore>` and not care whether records live in memory or
//! on disk.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::persistence::StoredDocument;

/// Identifier a store assigns to a document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(String);

impl DocumentId {
    /// Generates a fresh random id.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for DocumentId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for DocumentId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl std::fmt::Display for DocumentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Store errors.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Document not found: {0}")]
    NotFound(DocumentId),

    #[error("Invalid document id: {0}")]
    InvalidId(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed record: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Listing entry for a stored document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentSummary {
    pub id: DocumentId,
    pub title: String,
    pub updated_at: Option<DateTime<Utc>>,
}

/// A place documents are loaded from and saved to.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Loads a record.
    async fn load(&self, id: &DocumentId) -> StoreResult<StoredDocument>;

    /// Saves a record.
    ///
    /// With `id == None` the store creates a new record and returns its
    /// fresh id. Otherwise the record under `id` is replaced (or created)
    /// and `id` is returned. The store stamps `createdAt` and `updatedAt`.
    async fn save(&self, id: Option<&DocumentId>, record: &StoredDocument)
    -> StoreResult<DocumentId>;

    /// Lists stored documents, most recently updated first.
    async fn list(&self) -> StoreResult<Vec<DocumentSummary>>;
}

/// Applies store timestamps to a record about to be written.
fn stamp(record: &StoredDocument, previous: Option<DateTime<Utc>>) -> StoredDocument {
    let now = Utc::now();
    let mut stamped = record.clone();
    stamped.created_at = previous.or(record.created_at).or(Some(now));
    stamped.updated_at = Some(now);
    stamped
}

fn sort_summaries(summaries: &mut [DocumentSummary]) {
    summaries.sort_by(|a, b| b.updated_at.cmp(&a.updated_at).then_with(|| a.id.cmp(&b.id)));
}

// ============================================================================
// MemoryStore
// ============================================================================

/// In-process store. Everything is lost when it is dropped.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RwLock<HashMap<DocumentId, StoredDocument>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn load(&self, id: &DocumentId) -> StoreResult<StoredDocument> {
        let records = self.records.read().await;
        records
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.clone()))
    }

    async fn save(
        &self,
        id: Option<&DocumentId>,
        record: &StoredDocument,
    ) -> StoreResult<DocumentId> {
        let mut records = self.records.write().await;
        let id = id.cloned().unwrap_or_else(DocumentId::generate);
        let previous = records.get(&id).and_then(|r| r.created_at);
        records.insert(id.clone(), stamp(record, previous));
        Ok(id)
    }

    async fn list(&self) -> StoreResult<Vec<DocumentSummary>> {
        let records = self.records.read().await;
        let mut summaries: Vec<_> = records
            .iter()
            .map(|(id, record)| DocumentSummary {
                id: id.clone(),
                title: record.title.clone(),
                updated_at: record.updated_at,
            })
            .collect();
        sort_summaries(&mut summaries);
        Ok(summaries)
    }
}

// ============================================================================
// FileStore
// ============================================================================

/// One pretty-printed JSON file per document in a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Creates a store rooted at `root`. The directory is created on the
    /// first save.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, id: &DocumentId) -> StoreResult<PathBuf> {
        let valid = !id.as_str().is_empty()
            && id
                .as_str()
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(StoreError::InvalidId(id.to_string()));
        }
        Ok(self.root.join(format!("{}.json", id)))
    }

    async fn read(&self, id: &DocumentId) -> StoreResult<Option<StoredDocument>> {
        let path = self.path_for(id)?;
        match tokio::fs::read_to_string(&path).await {
            Ok(content) => Ok(Some(serde_json::from_str(&content)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait]
impl DocumentStore for FileStore {
    async fn load(&self, id: &DocumentId) -> StoreResult<StoredDocument> {
        self.read(id)
            .await?
            .ok_or_else(|| StoreError::NotFound(id.clone()))
    }

    async fn save(
        &self,
        id: Option<&DocumentId>,
        record: &StoredDocument,
    ) -> StoreResult<DocumentId> {
        let id = id.cloned().unwrap_or_else(DocumentId::generate);
        let path = self.path_for(&id)?;

        let previous = match self.read(&id).await {
            Ok(existing) => existing.and_then(|r| r.created_at),
            Err(StoreError::Malformed(e)) => {
                tracing::warn!("Overwriting malformed record {}: {}", id, e);
                None
            }
            Err(e) => return Err(e),
        };

        tokio::fs::create_dir_all(&self.root).await?;
        let content = serde_json::to_string_pretty(&stamp(record, previous))?;

        // Write next to the target and rename so readers never see half a file
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, content).await?;
        tokio::fs::rename(&tmp, &path).await?;

        tracing::debug!("Wrote {}", path.display());
        Ok(id)
    }

    async fn list(&self) -> StoreResult<Vec<DocumentSummary>> {
        let mut entries = match tokio::fs::read_dir(&self.root).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut summaries = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let id = DocumentId::from(stem);
            match self.read(&id).await {
                Ok(Some(record)) => summaries.push(DocumentSummary {
                    id,
                    title: record.title,
                    updated_at: record.updated_at,
                }),
                Ok(None) => {}
                Err(e) => tracing::warn!("Skipping {}: {}", path.display(), e),
            }
        }

        sort_summaries(&mut summaries);
        Ok(summaries)
    }
}
