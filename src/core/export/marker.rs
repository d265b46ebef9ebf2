//! Marker phase: flag exported records in the store

use crate::adapters::Connector;
use crate::domain::{PlateExportError, Result, StoredRecord};
use std::sync::Arc;

/// Sets `Exported = true` on records included in an uploaded CSV
pub struct RecordMarker {
    connector: Arc<dyn Connector>,
}

impl RecordMarker {
    /// Create a new marker
    pub fn new(connector: Arc<dyn Connector>) -> Self {
        Self { connector }
    }

    /// Mark every record as exported, one replace at a time in input order
    ///
    /// Returns the number of records marked.
    ///
    /// # Errors
    ///
    /// Stops at the first failed replace and returns
    /// [`PlateExportError::MarkingInterrupted`]. Records before it stay marked.
    pub async fn mark_exported(&self, records: Vec<StoredRecord>) -> Result<usize> {
        if records.is_empty() {
            return Ok(0);
        }

        let store = self.connector.record_store().await?;
        let total = records.len();

        for (marked, mut record) in records.into_iter().enumerate() {
            record.mark_exported();

            if let Err(e) = store.replace_record(&record).await {
                tracing::error!(
                    record_id = %record.id,
                    marked = marked,
                    total = total,
                    error = %e,
                    "Failed to mark record as exported"
                );
                return Err(PlateExportError::MarkingInterrupted {
                    marked,
                    total,
                    source: Box::new(e),
                });
            }

            tracing::trace!(record_id = %record.id, "Marked record as exported");
        }

        tracing::info!(count = total, "Marked records as exported");
        Ok(total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{MemoryBlobStore, MemoryConnector, MemoryRecordStore};
    use crate::domain::{RecordBuilder, RecordId};
    use chrono::Utc;

    fn record(id: &str) -> StoredRecord {
        let record = RecordBuilder::new()
            .file_name(format!("{id}.jpg"))
            .license_plate_text("ABC123")
            .timestamp(Utc::now())
            .build()
            .unwrap();
        StoredRecord::new(RecordId::new(id).unwrap(), record)
    }

    fn setup(ids: &[&str]) -> (MemoryRecordStore, RecordMarker) {
        let store = MemoryRecordStore::with_records(ids.iter().map(|id| record(id)));
        let connector = MemoryConnector::new(store.clone(), MemoryBlobStore::new("exports"));
        (store, RecordMarker::new(Arc::new(connector)))
    }

    #[tokio::test]
    async fn test_marks_all_records() {
        let (store, marker) = setup(&["1", "2", "3"]);
        let records = store.records();

        let marked = marker.mark_exported(records).await.unwrap();

        assert_eq!(marked, 3);
        assert!(store.records().iter().all(|r| r.record.exported));
    }

    #[tokio::test]
    async fn test_stops_at_first_failure() {
        let (store, marker) = setup(&["1", "2", "3"]);
        store.fail_replace_for("2");

        let err = marker.mark_exported(store.records()).await.unwrap_err();

        match err {
            PlateExportError::MarkingInterrupted { marked, total, .. } => {
                assert_eq!(marked, 1);
                assert_eq!(total, 3);
            }
            other => panic!("unexpected error {other:?}"),
        }
        assert!(store.get("1").unwrap().record.exported);
        assert!(!store.get("2").unwrap().record.exported);
        assert!(!store.get("3").unwrap().record.exported);
        assert_eq!(store.replace_count(), 2);
    }

    #[tokio::test]
    async fn test_empty_input_opens_no_client() {
        let store = MemoryRecordStore::new();
        let connector = MemoryConnector::new(store.clone(), MemoryBlobStore::new("exports"));
        let marker = RecordMarker::new(Arc::new(connector.clone()));

        assert_eq!(marker.mark_exported(Vec::new()).await.unwrap(), 0);
        assert_eq!(connector.clients_opened(), 0);
    }
}
