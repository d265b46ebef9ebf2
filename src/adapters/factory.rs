//! Client factory for the Azure backends
//!
//! This module builds Cosmos DB and Blob Storage clients from configuration.
//! Each call creates a fresh client; the pipeline drops it when its phase ends.

use crate::adapters::blob::BlobStorageClient;
use crate::adapters::cosmosdb::{CosmosDbAdapter, CosmosDbClient};
use crate::adapters::traits::{BlobStore, Connector, RecordStore};
use crate::config::{CosmosDbConfig, StorageConfig};
use crate::domain::Result;
use async_trait::async_trait;

/// [`Connector`] for Azure Cosmos DB and Azure Blob Storage
#[derive(Debug, Clone)]
pub struct AzureConnector {
    cosmosdb: CosmosDbConfig,
    storage: StorageConfig,
}

impl AzureConnector {
    /// Create a connector from the backend sections of the configuration
    pub fn new(cosmosdb: CosmosDbConfig, storage: StorageConfig) -> Self {
        Self { cosmosdb, storage }
    }

    /// Open a Cosmos DB client and read the container to verify access
    ///
    /// # Errors
    ///
    /// Returns an error if the container cannot be reached.
    pub async fn check_record_store(&self) -> Result<()> {
        let client = CosmosDbClient::new(self.cosmosdb.clone()).await?;
        client.test_connection().await
    }
}

#[async_trait]
impl Connector for AzureConnector {
    async fn record_store(&self) -> Result<Box<dyn RecordStore>> {
        tracing::debug!(
            database = %self.cosmosdb.database_name,
            container = %self.cosmosdb.container_name,
            "Creating Cosmos DB client"
        );
        let client = CosmosDbClient::new(self.cosmosdb.clone()).await?;
        Ok(Box::new(CosmosDbAdapter::new(client)))
    }

    async fn blob_store(&self) -> Result<Box<dyn BlobStore>> {
        tracing::debug!(container = %self.storage.container_name, "Creating Blob Storage client");
        let client = BlobStorageClient::new(&self.storage)?;
        Ok(Box::new(client))
    }
}
