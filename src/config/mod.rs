//! Configuration management for plate-export.
//!
//! This module provides TOML-based configuration loading, parsing, and validation.
//!
//! # Overview
//!
//! Configuration files support:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `PLATE_EXPORT_<SECTION>_<KEY>` environment overrides
//! - Default values for optional settings
//! - Validation on load
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - Application settings (log level)
//! - [`CosmosDbConfig`] - Record store connection and query settings
//! - [`StorageConfig`] - Blob storage connection and target container
//! - [`ExportConfig`] - Export cycle behavior (dry run, empty uploads)
//! - [`LoggingConfig`] - Local file logging
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//!
//! [cosmosdb]
//! endpoint = "https://your-account.documents.azure.com:443/"
//! key = "${COSMOS_KEY}"
//! database_name = "LicensePlates"
//! container_name = "Processed"
//!
//! [storage]
//! connection_string = "${BLOB_CONNECTION_STRING}"
//! container_name = "export"
//! ```
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use plate_export::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("plate-export.toml")?;
//! println!("Cosmos DB: {}", config.cosmosdb.database_name);
//! println!("Export container: {}", config.storage.container_name);
//! # Ok(())
//! # }
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

// Re-export commonly used types
pub use loader::{load_config, parse_config};
pub use schema::{
    AppConfig, ApplicationConfig, CosmosDbConfig, ExportConfig, LoggingConfig, PartitionKeyField,
    StorageConfig,
};
pub use secret::{secret_string, SecretString, SecretValue};
