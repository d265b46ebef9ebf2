//! In-process backends
//!
//! [`MemoryRecordStore`] and [`MemoryBlobStore`] keep their state behind an
//! `Arc<Mutex<_>>`, so clones share data: a test keeps one handle for
//! inspection and hands another to the pipeline through a
//! [`MemoryConnector`]. Both support injecting failures.
//!
//! Only compiled for tests and with the `test-util` feature; the binary
//! never links it.

use crate::adapters::traits::{BlobStore, Connector, RecordStore};
use crate::domain::{BlobStorageError, CosmosDbError, PlateExportError, Result, StoredRecord};
use async_trait::async_trait;
use std::collections::{BTreeMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Default)]
struct RecordState {
    records: Vec<StoredRecord>,
    failing_ids: HashSet<String>,
    fail_queries: bool,
    next_etag: u64,
    query_calls: usize,
    replace_calls: usize,
}

impl RecordState {
    fn next_etag(&mut self) -> String {
        self.next_etag += 1;
        format!("\"{:08x}\"", self.next_etag)
    }
}

/// Record store backed by a vector
#[derive(Debug, Clone, Default)]
pub struct MemoryRecordStore {
    state: Arc<Mutex<RecordState>>,
}

impl MemoryRecordStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store seeded with records
    pub fn with_records(records: impl IntoIterator<Item = StoredRecord>) -> Self {
        let store = Self::new();
        for record in records {
            store.insert(record);
        }
        store
    }

    fn state(&self) -> MutexGuard<'_, RecordState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Insert a record, assigning it a fresh version
    pub fn insert(&self, mut record: StoredRecord) {
        let mut state = self.state();
        record.etag = Some(state.next_etag());
        state.records.push(record);
    }

    /// Snapshot of all stored records, in insertion order
    pub fn records(&self) -> Vec<StoredRecord> {
        self.state().records.clone()
    }

    /// Look up a record by id
    pub fn get(&self, id: &str) -> Option<StoredRecord> {
        self.state()
            .records
            .iter()
            .find(|r| r.id.as_str() == id)
            .cloned()
    }

    /// Make every replace of `id` fail
    pub fn fail_replace_for(&self, id: &str) {
        self.state().failing_ids.insert(id.to_string());
    }

    /// Make queries fail
    pub fn fail_queries(&self, fail: bool) {
        self.state().fail_queries = fail;
    }

    /// Number of queries issued
    pub fn query_count(&self) -> usize {
        self.state().query_calls
    }

    /// Number of replace calls, failed ones included
    pub fn replace_count(&self) -> usize {
        self.state().replace_calls
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn query_unexported(&self, page_size: usize) -> Result<Vec<StoredRecord>> {
        let mut state = self.state();
        state.query_calls += 1;

        if state.fail_queries {
            return Err(PlateExportError::CosmosDb(CosmosDbError::QueryFailed(
                "query rejected by memory store".to_string(),
            )));
        }

        let unexported: Vec<StoredRecord> = state
            .records
            .iter()
            .filter(|r| r.is_unexported())
            .cloned()
            .collect();

        let mut fetched = Vec::with_capacity(unexported.len());
        for page in unexported.chunks(page_size.max(1)) {
            fetched.extend_from_slice(page);
        }
        Ok(fetched)
    }

    async fn replace_record(&self, record: &StoredRecord) -> Result<()> {
        let mut state = self.state();
        state.replace_calls += 1;

        if state.failing_ids.contains(record.id.as_str()) {
            return Err(PlateExportError::CosmosDb(CosmosDbError::UpdateFailed(
                format!("record {}: write rejected", record.id),
            )));
        }

        let etag = state.next_etag();
        let stored = state
            .records
            .iter_mut()
            .find(|r| r.id == record.id)
            .ok_or_else(|| {
                PlateExportError::CosmosDb(CosmosDbError::UpdateFailed(format!(
                    "record {}: not found",
                    record.id
                )))
            })?;

        if record.etag.is_some() && record.etag != stored.etag {
            return Err(PlateExportError::CosmosDb(
                CosmosDbError::PreconditionFailed(format!("record {}", record.id)),
            ));
        }

        *stored = record.clone();
        stored.etag = Some(etag);
        Ok(())
    }

    fn describe(&self) -> String {
        "memory://records".to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct StoredBlob {
    data: Vec<u8>,
    content_type: String,
}

#[derive(Debug, Default)]
struct BlobState {
    container_created: bool,
    blobs: BTreeMap<String, StoredBlob>,
    fail_uploads: bool,
    fail_container: bool,
    upload_attempts: usize,
}

/// Blob store backed by a map of name to bytes
#[derive(Debug, Clone)]
pub struct MemoryBlobStore {
    container_name: String,
    state: Arc<Mutex<BlobState>>,
}

impl MemoryBlobStore {
    /// Create a store for `container_name`; the container starts missing
    pub fn new(container_name: impl Into<String>) -> Self {
        Self {
            container_name: container_name.into(),
            state: Arc::default(),
        }
    }

    fn state(&self) -> MutexGuard<'_, BlobState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Reject every upload
    pub fn fail_uploads(&self, fail: bool) {
        self.state().fail_uploads = fail;
    }

    /// Reject container creation
    pub fn fail_container(&self, fail: bool) {
        self.state().fail_container = fail;
    }

    /// Whether the container exists
    pub fn container_created(&self) -> bool {
        self.state().container_created
    }

    /// Names of all stored blobs, sorted
    pub fn blob_names(&self) -> Vec<String> {
        self.state().blobs.keys().cloned().collect()
    }

    /// Content of a blob
    pub fn blob(&self, name: &str) -> Option<Vec<u8>> {
        self.state().blobs.get(name).map(|b| b.data.clone())
    }

    /// Content type a blob was stored with
    pub fn content_type(&self, name: &str) -> Option<String> {
        self.state().blobs.get(name).map(|b| b.content_type.clone())
    }

    /// Number of upload calls, failed ones included
    pub fn upload_attempts(&self) -> usize {
        self.state().upload_attempts
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn ensure_container_exists(&self) -> Result<()> {
        let mut state = self.state();
        if state.fail_container {
            return Err(PlateExportError::BlobStorage(
                BlobStorageError::ContainerCreationFailed(self.container_name.clone()),
            ));
        }
        state.container_created = true;
        Ok(())
    }

    async fn upload(&self, blob_name: &str, data: Vec<u8>, content_type: &str) -> Result<()> {
        let mut state = self.state();
        state.upload_attempts += 1;

        if state.fail_uploads {
            return Err(PlateExportError::BlobStorage(BlobStorageError::UploadFailed(
                format!("{blob_name}: upload rejected by memory store"),
            )));
        }
        if !state.container_created {
            return Err(PlateExportError::BlobStorage(BlobStorageError::UploadFailed(
                format!("{blob_name}: container {} not found", self.container_name),
            )));
        }

        state.blobs.insert(
            blob_name.to_string(),
            StoredBlob {
                data,
                content_type: content_type.to_string(),
            },
        );
        Ok(())
    }

    fn container_name(&self) -> &str {
        &self.container_name
    }
}

/// Connector handing out clones of in-memory stores
#[derive(Debug, Clone)]
pub struct MemoryConnector {
    /// Shared record store
    pub records: MemoryRecordStore,

    /// Shared blob store
    pub blobs: MemoryBlobStore,

    opened: Arc<Mutex<usize>>,
}

impl MemoryConnector {
    /// Create a connector over the given stores
    pub fn new(records: MemoryRecordStore, blobs: MemoryBlobStore) -> Self {
        Self {
            records,
            blobs,
            opened: Arc::default(),
        }
    }

    /// Number of clients handed out so far
    pub fn clients_opened(&self) -> usize {
        *self.opened.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn count_open(&self) {
        *self.opened.lock().unwrap_or_else(|e| e.into_inner()) += 1;
    }
}

#[async_trait]
impl Connector for MemoryConnector {
    async fn record_store(&self) -> Result<Box<dyn RecordStore>> {
        self.count_open();
        Ok(Box::new(self.records.clone()))
    }

    async fn blob_store(&self) -> Result<Box<dyn BlobStore>> {
        self.count_open();
        Ok(Box::new(self.blobs.clone()))
    }
}
