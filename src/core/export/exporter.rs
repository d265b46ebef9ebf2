//! Exporter phase: serialize records to CSV and upload them
//!
//! Rows keep the order of the input records and are never deduplicated. The
//! object name is the UTC time of the cycle at second granularity, so names
//! sort chronologically.

use crate::adapters::Connector;
use crate::domain::{ExportRow, PlateExportError, Result, StoredRecord};
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Content type of uploaded exports
pub const CSV_CONTENT_TYPE: &str = "text/csv";

/// Result of an export attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    /// The CSV was stored
    Uploaded {
        blob_name: String,
        rows: usize,
        bytes: usize,
    },

    /// The container could not be created or the upload was rejected
    UploadFailed { blob_name: String, reason: String },
}

impl ExportOutcome {
    /// Whether the CSV was stored
    pub fn is_success(&self) -> bool {
        matches!(self, ExportOutcome::Uploaded { .. })
    }

    /// Name of the object the CSV was (or would have been) stored as
    pub fn blob_name(&self) -> &str {
        match self {
            ExportOutcome::Uploaded { blob_name, .. } | ExportOutcome::UploadFailed { blob_name, .. } => {
                blob_name
            }
        }
    }
}

/// Object name for an export produced at `now`, e.g. `2024-01-01T12:00:00.csv`
pub fn blob_name_for(now: DateTime<Utc>) -> String {
    format!("{}.csv", now.format("%Y-%m-%dT%H:%M:%S"))
}

/// Serialize records to CSV
///
/// The header row is always written, so an empty input yields a header-only
/// document.
///
/// # Errors
///
/// Returns [`PlateExportError::Csv`] if a row cannot be encoded.
pub fn render_csv(records: &[StoredRecord]) -> Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());

    writer.write_record(ExportRow::HEADERS)?;
    for record in records {
        writer.serialize(ExportRow::from(record))?;
    }

    writer
        .into_inner()
        .map_err(|e| PlateExportError::Csv(format!("Failed to flush CSV buffer: {e}")))
}

/// Writes record batches to blob storage as CSV
pub struct CsvExporter {
    connector: Arc<dyn Connector>,
}

impl CsvExporter {
    /// Create a new exporter
    pub fn new(connector: Arc<dyn Connector>) -> Self {
        Self { connector }
    }

    /// Serialize `records` and upload them as `<now>.csv`
    ///
    /// Storage failures are logged and reported as
    /// [`ExportOutcome::UploadFailed`] rather than returned as errors.
    ///
    /// # Errors
    ///
    /// Only CSV encoding failures are returned as errors.
    pub async fn export(&self, records: &[StoredRecord], now: DateTime<Utc>) -> Result<ExportOutcome> {
        let data = render_csv(records)?;
        let blob_name = blob_name_for(now);
        let rows = records.len();
        let bytes = data.len();

        match self.upload(&blob_name, data).await {
            Ok(container) => {
                tracing::info!(
                    container = %container,
                    blob = %blob_name,
                    rows = rows,
                    bytes = bytes,
                    "Uploaded export"
                );
                Ok(ExportOutcome::Uploaded {
                    blob_name,
                    rows,
                    bytes,
                })
            }
            Err(e) => {
                tracing::error!(blob = %blob_name, error = %e, "Failed to upload export");
                Ok(ExportOutcome::UploadFailed {
                    blob_name,
                    reason: e.to_string(),
                })
            }
        }
    }

    /// Upload through a client scoped to this call, returning the container name
    async fn upload(&self, blob_name: &str, data: Vec<u8>) -> Result<String> {
        let store = self.connector.blob_store().await?;
        store.ensure_container_exists().await?;
        store.upload(blob_name, data, CSV_CONTENT_TYPE).await?;
        Ok(store.container_name().to_string())
    }
}
