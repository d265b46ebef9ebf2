//! Export cycle - runs Reader → Exporter → Marker once
//!
//! This module coordinates one cycle of the export. Each phase opens its own
//! backend client through the [`Connector`] and drops it before the next
//! phase starts.

use crate::adapters::Connector;
use crate::config::AppConfig;
use crate::core::export::exporter::{blob_name_for, render_csv, CsvExporter, ExportOutcome};
use crate::core::export::marker::RecordMarker;
use crate::core::export::reader::RecordReader;
use crate::core::export::summary::{CycleOutcome, CycleState, CycleSummary};
use crate::domain::Result;
use crate::log_phase;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Instant;

/// Tunables for an export cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineOptions {
    /// Progress log interval of the reader, in records
    pub page_size: usize,

    /// Read and serialize only
    pub dry_run: bool,

    /// Upload a header-only CSV when nothing is pending
    pub upload_empty: bool,
}

impl PipelineOptions {
    /// Options taken from the loaded configuration
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            page_size: config.cosmosdb.page_size,
            dry_run: config.export.dry_run,
            upload_empty: config.export.upload_empty,
        }
    }
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            page_size: 100,
            dry_run: false,
            upload_empty: false,
        }
    }
}

/// Export cycle runner
pub struct ExportPipeline {
    reader: RecordReader,
    exporter: CsvExporter,
    marker: RecordMarker,
    options: PipelineOptions,
}

impl ExportPipeline {
    /// Create a pipeline over the given backends
    pub fn new(connector: Arc<dyn Connector>, options: PipelineOptions) -> Self {
        Self {
            reader: RecordReader::new(connector.clone(), options.page_size),
            exporter: CsvExporter::new(connector.clone()),
            marker: RecordMarker::new(connector),
            options,
        }
    }

    /// Run one cycle, naming the export after the current time
    ///
    /// # Errors
    ///
    /// Reader and Marker failures are returned. A failed upload is not an
    /// error: it is reported in the summary and nothing is marked.
    pub async fn run_cycle(&self) -> Result<CycleSummary> {
        self.run_cycle_at(Utc::now()).await
    }

    /// Run one cycle with an explicit export time
    ///
    /// # Errors
    ///
    /// See [`ExportPipeline::run_cycle`].
    pub async fn run_cycle_at(&self, now: DateTime<Utc>) -> Result<CycleSummary> {
        let start_time = Instant::now();
        let mut summary = CycleSummary::new(self.options.dry_run);

        tracing::info!(dry_run = self.options.dry_run, "Starting export cycle");

        log_phase!(CycleState::Reading);
        let records = self.reader.fetch_unexported().await?;
        summary.records_read = records.len();

        if records.is_empty() && !self.options.upload_empty {
            tracing::info!("Nothing to export");
            log_phase!(CycleState::Idle);
            return Ok(self.finish(summary, start_time));
        }

        log_phase!(CycleState::Exporting, records.len());

        if self.options.dry_run {
            let data = render_csv(&records)?;
            let blob_name = blob_name_for(now);

            tracing::info!(
                blob = %blob_name,
                rows = records.len(),
                bytes = data.len(),
                "Dry run: skipping upload and marking"
            );

            summary.outcome = CycleOutcome::DryRun;
            summary.blob_name = Some(blob_name);
            summary.rows_written = records.len();
            summary.bytes_written = data.len();
            log_phase!(CycleState::Idle);
            return Ok(self.finish(summary, start_time));
        }

        match self.exporter.export(&records, now).await? {
            ExportOutcome::Uploaded {
                blob_name,
                rows,
                bytes,
            } => {
                summary.blob_name = Some(blob_name);
                summary.rows_written = rows;
                summary.bytes_written = bytes;
            }
            ExportOutcome::UploadFailed { blob_name, reason } => {
                summary.outcome = CycleOutcome::UploadFailed;
                summary.blob_name = Some(blob_name);
                summary.failure = Some(reason);
                log_phase!(CycleState::Idle);
                return Ok(self.finish(summary, start_time));
            }
        }

        log_phase!(CycleState::Marking, records.len());
        summary.records_marked = self.marker.mark_exported(records).await?;
        summary.outcome = CycleOutcome::Exported;

        log_phase!(CycleState::Idle);
        Ok(self.finish(summary, start_time))
    }

    fn finish(&self, summary: CycleSummary, start_time: Instant) -> CycleSummary {
        let summary = summary.with_duration(start_time.elapsed());
        summary.log_summary();
        summary
    }
}
