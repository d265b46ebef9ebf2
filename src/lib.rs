// plate-export - License plate record export to Azure Blob Storage
// Copyright (c) 2025 plate-export Contributors
// Licensed under the MIT License

//! # plate-export - License plate records to CSV
//!
//! plate-export periodically collects recognized license plate records that
//! have not been exported yet, writes them to a CSV file in Azure Blob
//! Storage, and flags them as exported so they are never exported twice.
//!
//! ## Overview
//!
//! One export cycle runs three phases in sequence:
//! - **Reader** queries Cosmos DB for records with `Exported == false`
//! - **Exporter** serializes them to CSV and uploads `<UTC time>.csv`
//! - **Marker** sets `Exported = true` on each record, only after a successful upload
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - The export cycle (reader, exporter, marker, pipeline)
//! - [`adapters`] - External integrations (Cosmos DB, Blob Storage, in-memory)
//! - [`domain`] - Core domain types and models
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging and observability
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use plate_export::adapters::AzureConnector;
//! use plate_export::config::load_config;
//! use plate_export::core::export::{ExportPipeline, PipelineOptions};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("plate-export.toml")?;
//!     let options = PipelineOptions::from_config(&config);
//!     let connector = AzureConnector::new(config.cosmosdb, config.storage);
//!
//!     let summary = ExportPipeline::new(Arc::new(connector), options)
//!         .run_cycle()
//!         .await?;
//!
//!     println!("Exported {} records", summary.records_marked);
//!     Ok(())
//! }
//! ```
//!
//! ## Failure Semantics
//!
//! - A failed query aborts the cycle before anything is written.
//! - A failed upload is reported in the [`core::export::CycleSummary`]; no
//!   record is touched and the next cycle picks them up again.
//! - A failed mark stops the cycle with
//!   [`domain::PlateExportError::MarkingInterrupted`]. Records marked before
//!   it stay marked, the rest appear again in a later CSV.
//!
//! ## Error Handling
//!
//! All library errors are [`domain::PlateExportError`]:
//!
//! ```rust,no_run
//! use plate_export::domain::PlateExportError;
//!
//! fn example() -> Result<(), PlateExportError> {
//!     let config = plate_export::config::load_config("plate-export.toml")?;
//!     println!("exporting to {}", config.storage.container_name);
//!     Ok(())
//! }
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
