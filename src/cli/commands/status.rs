//! Status command implementation
//!
//! This module implements the `status` command, a read-only view of the
//! records waiting for the next export cycle.

use crate::adapters::{AzureConnector, Connector};
use crate::cli::{exit_code, exit_code_for};
use crate::config::load_config;
use crate::domain::Result;
use chrono::{DateTime, Utc};
use clap::Args;

/// Arguments for the status command
#[derive(Args, Debug)]
pub struct StatusArgs {}

/// Records waiting for export
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingStatus {
    /// Number of unexported records
    pub count: usize,

    /// Earliest observation timestamp among them
    pub oldest: Option<DateTime<Utc>>,

    /// Latest observation timestamp among them
    pub newest: Option<DateTime<Utc>>,
}

/// Query the record store for unexported records and summarize them
///
/// # Errors
///
/// Returns an error if the store cannot be reached or queried.
pub async fn pending_status(connector: &dyn Connector, page_size: usize) -> Result<PendingStatus> {
    let store = connector.record_store().await?;
    let records = store.query_unexported(page_size).await?;

    let timestamps = records.iter().map(|r| r.record.timestamp);
    Ok(PendingStatus {
        count: records.len(),
        oldest: timestamps.clone().min(),
        newest: timestamps.max(),
    })
}

impl StatusArgs {
    /// Execute the status command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!("Checking export status");

        println!("📊 Export Status");
        println!();

        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Failed to load configuration file");
                println!("   Error: {e}");
                return Ok(exit_code::CONFIG_ERROR);
            }
        };

        let page_size = config.cosmosdb.page_size;
        let connector = AzureConnector::new(config.cosmosdb, config.storage);

        if let Err(e) = connector.check_record_store().await {
            println!("❌ Failed to connect to Cosmos DB");
            println!("   Error: {e}");
            return Ok(exit_code::CONNECTION_ERROR);
        }

        let status = match pending_status(&connector, page_size).await {
            Ok(s) => s,
            Err(e) => {
                println!("❌ Failed to query unexported records");
                println!("   Error: {e}");
                return Ok(exit_code_for(&e));
            }
        };

        if status.count == 0 {
            println!("No records waiting for export.");
            return Ok(exit_code::SUCCESS);
        }

        println!("  Unexported records: {}", status.count);
        if let (Some(oldest), Some(newest)) = (status.oldest, status.newest) {
            println!("  Oldest: {}", oldest.to_rfc3339());
            println!("  Newest: {}", newest.to_rfc3339());
        }
        println!();
        println!("Run 'plate-export export' to export them.");

        Ok(exit_code::SUCCESS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{MemoryBlobStore, MemoryConnector, MemoryRecordStore};
    use crate::domain::{RecordBuilder, RecordId, StoredRecord};
    use chrono::TimeZone;

    fn record(id: &str, hour: u32, exported: bool) -> StoredRecord {
        let record = RecordBuilder::new()
            .file_name(format!("{id}.jpg"))
            .timestamp(Utc.with_ymd_and_hms(2024, 1, 1, hour, 0, 0).unwrap())
            .exported(exported)
            .build()
            .unwrap();
        StoredRecord::new(RecordId::new(id).unwrap(), record)
    }

    #[tokio::test]
    async fn test_pending_status_counts_unexported() {
        let connector = MemoryConnector::new(
            MemoryRecordStore::with_records(vec![
                record("1", 9, false),
                record("2", 7, true),
                record("3", 11, false),
                record("4", 8, false),
            ]),
            MemoryBlobStore::new("exports"),
        );

        let status = pending_status(&connector, 100).await.unwrap();

        assert_eq!(status.count, 3);
        assert_eq!(status.oldest, Some(Utc.with_ymd_and_hms(2024, 1, 1, 8, 0, 0).unwrap()));
        assert_eq!(status.newest, Some(Utc.with_ymd_and_hms(2024, 1, 1, 11, 0, 0).unwrap()));
    }

    #[tokio::test]
    async fn test_pending_status_empty() {
        let connector =
            MemoryConnector::new(MemoryRecordStore::new(), MemoryBlobStore::new("exports"));

        let status = pending_status(&connector, 100).await.unwrap();

        assert_eq!(status.count, 0);
        assert!(status.oldest.is_none());
        assert!(status.newest.is_none());
    }
}
