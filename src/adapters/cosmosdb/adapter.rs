//! Cosmos DB adapter implementing the record store trait

use crate::adapters::cosmosdb::client::CosmosDbClient;
use crate::adapters::traits::RecordStore;
use crate::domain::{Result, StoredRecord};
use async_trait::async_trait;

/// Cosmos DB implementation of [`RecordStore`]
pub struct CosmosDbAdapter {
    client: CosmosDbClient,
}

impl CosmosDbAdapter {
    /// Create a new Cosmos DB adapter
    pub fn new(client: CosmosDbClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl RecordStore for CosmosDbAdapter {
    async fn query_unexported(&self, page_size: usize) -> Result<Vec<StoredRecord>> {
        self.client.query_unexported(page_size).await
    }

    async fn replace_record(&self, record: &StoredRecord) -> Result<()> {
        self.client.replace_record(record).await
    }

    fn describe(&self) -> String {
        format!(
            "cosmosdb://{}/{}",
            self.client.database_name(),
            self.client.container_name()
        )
    }
}
