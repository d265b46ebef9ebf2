//! Reader phase: fetch the records still waiting for export

use crate::adapters::Connector;
use crate::domain::{Result, StoredRecord};
use std::sync::Arc;

/// Fetches unexported records from the record store
pub struct RecordReader {
    connector: Arc<dyn Connector>,
    page_size: usize,
}

impl RecordReader {
    /// Create a reader; `page_size` is passed through to the store
    pub fn new(connector: Arc<dyn Connector>, page_size: usize) -> Self {
        Self {
            connector,
            page_size,
        }
    }

    /// Return every record whose `Exported` flag is false
    ///
    /// The store client lives only for the duration of this call.
    ///
    /// # Errors
    ///
    /// Connection and query failures are returned as-is, nothing is retried.
    pub async fn fetch_unexported(&self) -> Result<Vec<StoredRecord>> {
        let store = self.connector.record_store().await?;
        let records = store.query_unexported(self.page_size).await?;

        tracing::info!(
            count = records.len(),
            source = %store.describe(),
            "Found unexported records"
        );

        Ok(records)
    }
}
