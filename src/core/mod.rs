//! Core business logic for plate-export.
//!
//! # Modules
//!
//! - [`export`] - Reader, Exporter, Marker and the cycle that runs them
//!
//! # Export Workflow
//!
//! 1. **Read**: Query the record container for `Exported == false`
//! 2. **Export**: Serialize to CSV and upload as `<UTC time>.csv`
//! 3. **Mark**: Flip `Exported` to true on each record, one at a time
//! 4. **Report**: Produce a cycle summary
//!
//! If the upload fails the cycle stops before marking, so the same records
//! are picked up again by the next cycle.
//!
//! # Example
//!
//! ```rust,no_run
//! use plate_export::adapters::AzureConnector;
//! use plate_export::config::load_config;
//! use plate_export::core::export::{ExportPipeline, PipelineOptions};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("plate-export.toml")?;
//! let connector = AzureConnector::new(config.cosmosdb.clone(), config.storage.clone());
//!
//! let pipeline = ExportPipeline::new(Arc::new(connector), PipelineOptions::from_config(&config));
//! let summary = pipeline.run_cycle().await?;
//!
//! println!("Read: {}", summary.records_read);
//! println!("Marked: {}", summary.records_marked);
//! # Ok(())
//! # }
//! ```

pub mod export;
