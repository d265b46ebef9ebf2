//! External system integrations for plate-export.
//!
//! This module provides adapters for the services the export cycle talks to:
//!
//! - [`cosmosdb`] - Azure Cosmos DB record store
//! - [`blob`] - Azure Blob Storage REST client
//! - `memory` - In-process stores for tests (`test-util` feature)
//! - [`factory`] - Builds the Azure clients from configuration
//!
//! # Design Pattern
//!
//! Adapters follow the **Adapter Pattern** to isolate external dependencies and
//! enable testing with in-memory implementations. The pipeline only sees the
//! traits in [`traits`].
//!
//! # Cosmos DB Adapter
//!
//! ```rust,no_run
//! use plate_export::adapters::cosmosdb::CosmosDbClient;
//! use plate_export::config::{CosmosDbConfig, PartitionKeyField, SecretValue};
//! use secrecy::Secret;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = CosmosDbConfig {
//!     endpoint: "https://account.documents.azure.com:443/".to_string(),
//!     key: Secret::new(SecretValue::from("key".to_string())),
//!     database_name: "LicensePlates".to_string(),
//!     container_name: "Processed".to_string(),
//!     partition_key: PartitionKeyField::Id,
//!     page_size: 100,
//! };
//!
//! let client = CosmosDbClient::new(config).await?;
//! let pending = client.query_unexported(100).await?;
//! println!("{} records to export", pending.len());
//! # Ok(())
//! # }
//! ```

pub mod blob;
pub mod cosmosdb;
pub mod factory;
#[cfg(any(test, feature = "test-util"))]
pub mod memory;
pub mod traits;

pub use factory::AzureConnector;
pub use traits::{BlobStore, Connector, RecordStore};
