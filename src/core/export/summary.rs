//! Cycle summary and reporting
//!
//! This module defines the phases of an export cycle and the summary each
//! cycle produces.

use std::fmt;
use std::time::Duration;

/// Phase of an export cycle
///
/// A cycle moves `Idle → Reading → Exporting → Marking → Idle`; a failed
/// upload returns to `Idle` without marking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleState {
    Idle,
    Reading,
    Exporting,
    Marking,
}

impl fmt::Display for CycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CycleState::Idle => "idle",
            CycleState::Reading => "reading",
            CycleState::Exporting => "exporting",
            CycleState::Marking => "marking",
        };
        f.write_str(name)
    }
}

/// How a cycle ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// No unexported records were found
    NothingToExport,

    /// Records were read and serialized, nothing was written
    DryRun,

    /// The CSV was uploaded and every record marked
    Exported,

    /// The upload failed; records are left for the next cycle
    UploadFailed,
}

impl fmt::Display for CycleOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CycleOutcome::NothingToExport => "nothing to export",
            CycleOutcome::DryRun => "dry run",
            CycleOutcome::Exported => "exported",
            CycleOutcome::UploadFailed => "upload failed",
        };
        f.write_str(name)
    }
}

/// Summary of one export cycle
#[derive(Debug, Clone)]
pub struct CycleSummary {
    /// How the cycle ended
    pub outcome: CycleOutcome,

    /// Unexported records returned by the reader
    pub records_read: usize,

    /// Name of the CSV object, when one was produced
    pub blob_name: Option<String>,

    /// Data rows in the CSV
    pub rows_written: usize,

    /// Size of the CSV in bytes
    pub bytes_written: usize,

    /// Records flagged as exported
    pub records_marked: usize,

    /// Reason the upload failed
    pub failure: Option<String>,

    /// Whether this was a dry run
    pub dry_run: bool,

    /// Wall-clock duration of the cycle
    pub duration: Duration,
}

impl CycleSummary {
    /// Create a summary for a cycle that has not read anything yet
    pub fn new(dry_run: bool) -> Self {
        Self {
            outcome: CycleOutcome::NothingToExport,
            records_read: 0,
            blob_name: None,
            rows_written: 0,
            bytes_written: 0,
            records_marked: 0,
            failure: None,
            dry_run,
            duration: Duration::from_secs(0),
        }
    }

    /// Set the duration
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Whether the cycle left nothing to retry
    pub fn is_successful(&self) -> bool {
        self.outcome != CycleOutcome::UploadFailed
    }

    /// Log the summary
    pub fn log_summary(&self) {
        match self.outcome {
            CycleOutcome::UploadFailed => {
                tracing::warn!(
                    records_read = self.records_read,
                    blob = self.blob_name.as_deref().unwrap_or_default(),
                    reason = self.failure.as_deref().unwrap_or_default(),
                    duration_ms = self.duration.as_millis() as u64,
                    "Export cycle ended without upload, records left for the next cycle"
                );
            }
            _ => {
                tracing::info!(
                    outcome = %self.outcome,
                    blob = self.blob_name.as_deref().unwrap_or_default(),
                    rows = self.rows_written,
                    bytes = self.bytes_written,
                    dry_run = self.dry_run,
                    "Export cycle summary"
                );
                crate::log_cycle_complete!(self.records_read, self.records_marked, self.duration);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle_summary_creation() {
        let summary = CycleSummary::new(false);

        assert_eq!(summary.outcome, CycleOutcome::NothingToExport);
        assert_eq!(summary.records_read, 0);
        assert_eq!(summary.records_marked, 0);
        assert!(summary.blob_name.is_none());
        assert!(summary.failure.is_none());
        assert!(!summary.dry_run);
        assert!(summary.is_successful());
    }

    #[test]
    fn test_cycle_summary_with_duration() {
        let summary = CycleSummary::new(true).with_duration(Duration::from_secs(3));

        assert_eq!(summary.duration, Duration::from_secs(3));
        assert!(summary.dry_run);
    }

    #[test]
    fn test_upload_failure_is_not_successful() {
        let mut summary = CycleSummary::new(false);
        summary.outcome = CycleOutcome::UploadFailed;
        assert!(!summary.is_successful());

        summary.outcome = CycleOutcome::DryRun;
        assert!(summary.is_successful());
    }

    #[test]
    fn test_state_display() {
        assert_eq!(CycleState::Idle.to_string(), "idle");
        assert_eq!(CycleState::Marking.to_string(), "marking");
        assert_eq!(CycleOutcome::NothingToExport.to_string(), "nothing to export");
    }
}
