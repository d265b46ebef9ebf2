//! Export cycle
//!
//! This module provides the core export logic, including:
//! - Reading unexported records
//! - CSV serialization and upload
//! - Marking exported records
//! - Cycle orchestration and reporting

pub mod exporter;
pub mod marker;
pub mod pipeline;
pub mod reader;
pub mod summary;

pub use exporter::{blob_name_for, render_csv, CsvExporter, ExportOutcome, CSV_CONTENT_TYPE};
pub use marker::RecordMarker;
pub use pipeline::{ExportPipeline, PipelineOptions};
pub use reader::RecordReader;
pub use summary::{CycleOutcome, CycleState, CycleSummary};
