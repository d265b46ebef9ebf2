//! Cosmos DB client implementation
//!
//! This module provides the client for reading and replacing license plate
//! records in an Azure Cosmos DB container.

use crate::adapters::cosmosdb::models::{
    collect_records, partition_key_value, EXPORTED_PARAM, UNEXPORTED_QUERY,
};
use crate::config::CosmosDbConfig;
use crate::domain::{CosmosDbError, PlateExportError, Result, StoredRecord};
use azure_core::credentials::Secret;
use azure_data_cosmos::clients::ContainerClient;
use azure_data_cosmos::{CosmosClient, CosmosClientOptions, PartitionKey, Query};
use futures::stream::StreamExt;
use serde_json::Value;

/// Cosmos DB client for the record container
pub struct CosmosDbClient {
    /// Container client
    container: ContainerClient,

    /// Configuration
    config: CosmosDbConfig,
}

impl CosmosDbClient {
    /// Create a new Cosmos DB client
    ///
    /// # Errors
    ///
    /// Returns an error if the client cannot be created.
    pub async fn new(config: CosmosDbConfig) -> Result<Self> {
        use secrecy::ExposeSecret;

        let key = Secret::new(config.key.expose_secret().as_ref().to_string());
        let options = Some(CosmosClientOptions::default());

        let client = CosmosClient::with_key(&config.endpoint, key, options).map_err(|e| {
            PlateExportError::CosmosDb(CosmosDbError::ConnectionFailed(format!(
                "Failed to create Cosmos client: {e}"
            )))
        })?;

        let container = client
            .database_client(&config.database_name)
            .container_client(&config.container_name);

        Ok(Self { container, config })
    }

    /// Test the connection by reading the container properties
    pub async fn test_connection(&self) -> Result<()> {
        self.container.read(None).await.map_err(|e| {
            if is_not_found(&e.to_string()) {
                PlateExportError::CosmosDb(CosmosDbError::ContainerNotFound(format!(
                    "{}/{}",
                    self.config.database_name, self.config.container_name
                )))
            } else {
                PlateExportError::CosmosDb(CosmosDbError::ConnectionFailed(format!(
                    "Connection test failed: {e}"
                )))
            }
        })?;

        Ok(())
    }

    /// Fetch every record whose `Exported` flag is false
    ///
    /// The query runs across partitions; the SDK pager follows continuation
    /// tokens until the result set is exhausted. `page_size` only paces the
    /// progress log. Documents that don't decode as records are logged and
    /// skipped.
    pub async fn query_unexported(&self, page_size: usize) -> Result<Vec<StoredRecord>> {
        tracing::debug!(
            database = %self.config.database_name,
            container = %self.config.container_name,
            page_size = page_size,
            "Querying unexported records"
        );

        let query = Query::from(UNEXPORTED_QUERY)
            .with_parameter(EXPORTED_PARAM, false)
            .map_err(|e| {
                PlateExportError::CosmosDb(CosmosDbError::QueryFailed(format!(
                    "Failed to build query: {e}"
                )))
            })?;

        // () = cross-partition
        let mut pager = self
            .container
            .query_items::<Value>(query, (), None)
            .map_err(|e| {
                PlateExportError::CosmosDb(CosmosDbError::QueryFailed(format!(
                    "Failed to create query: {e}"
                )))
            })?;

        let mut documents = Vec::new();
        while let Some(item) = pager.next().await {
            let document = item.map_err(|e| {
                PlateExportError::CosmosDb(CosmosDbError::QueryFailed(format!(
                    "Failed to fetch records: {e}"
                )))
            })?;
            documents.push(document);

            if documents.len() % page_size.max(1) == 0 {
                tracing::debug!(fetched = documents.len(), "Fetched page of records");
            }
        }

        let fetched = documents.len();
        let records = collect_records(documents);
        if records.len() < fetched {
            tracing::warn!(
                skipped = fetched - records.len(),
                "Some unexported documents could not be read and stay unexported"
            );
        }

        Ok(records)
    }

    /// Replace a record document, addressed by partition key and id
    pub async fn replace_record(&self, record: &StoredRecord) -> Result<()> {
        let partition_key =
            PartitionKey::from(partition_key_value(record, self.config.partition_key));

        self.container
            .replace_item(partition_key, record.id.as_str(), record, None)
            .await
            .map_err(|e| {
                let message = format!("record {}: {e}", record.id);
                if is_precondition_failed(&message) {
                    PlateExportError::CosmosDb(CosmosDbError::PreconditionFailed(message))
                } else {
                    PlateExportError::CosmosDb(CosmosDbError::UpdateFailed(message))
                }
            })?;

        tracing::trace!(record_id = %record.id, "Record replaced");
        Ok(())
    }

    /// Get the database name
    pub fn database_name(&self) -> &str {
        &self.config.database_name
    }

    /// Get the container name
    pub fn container_name(&self) -> &str {
        &self.config.container_name
    }

    /// Get the endpoint URL
    pub fn endpoint(&self) -> &str {
        &self.config.endpoint
    }
}

fn is_not_found(message: &str) -> bool {
    message.contains("404") || message.contains("NotFound")
}

fn is_precondition_failed(message: &str) -> bool {
    message.contains("412") || message.contains("PreconditionFailed")
}
