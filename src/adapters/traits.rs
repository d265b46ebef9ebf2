//! Backend abstraction traits
//!
//! The export cycle only talks to its backing services through these traits.
//! Clients are obtained from a [`Connector`] at the start of the phase that
//! needs them and dropped when the phase ends, so no connection outlives the
//! step that uses it.

use crate::domain::{Result, StoredRecord};
use async_trait::async_trait;

/// Repository over the license plate record container
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Return every record whose `Exported` flag is false
    ///
    /// Results are fetched `page_size` records at a time until the query is
    /// exhausted. Order is whatever the store returns.
    ///
    /// # Errors
    ///
    /// Returns an error if the query cannot be issued or a page fails.
    async fn query_unexported(&self, page_size: usize) -> Result<Vec<StoredRecord>>;

    /// Replace a stored record, addressed by its id
    ///
    /// # Errors
    ///
    /// Returns an error if the document is missing or the write is rejected.
    async fn replace_record(&self, record: &StoredRecord) -> Result<()>;

    /// Human-readable name of the backing container, for logs
    fn describe(&self) -> String;
}

/// Object storage receiving the CSV exports
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Create the target container if it doesn't exist yet
    ///
    /// # Errors
    ///
    /// Returns an error if the container can neither be created nor found.
    async fn ensure_container_exists(&self) -> Result<()>;

    /// Upload `data` as a new object named `blob_name`
    ///
    /// # Errors
    ///
    /// Returns an error if the upload is not acknowledged by the service.
    async fn upload(&self, blob_name: &str, data: Vec<u8>, content_type: &str) -> Result<()>;

    /// Name of the target container
    fn container_name(&self) -> &str;
}

/// Factory for per-phase backend clients
#[async_trait]
pub trait Connector: Send + Sync {
    /// Open a client for the record store
    ///
    /// # Errors
    ///
    /// Returns an error if the client cannot be constructed.
    async fn record_store(&self) -> Result<Box<dyn RecordStore>>;

    /// Open a client for blob storage
    ///
    /// # Errors
    ///
    /// Returns an error if the client cannot be constructed.
    async fn blob_store(&self) -> Result<Box<dyn BlobStore>>;
}
