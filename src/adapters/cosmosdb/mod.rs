//! Azure Cosmos DB integration
//!
//! Reads unexported license plate records and writes them back once they are
//! exported.

pub mod adapter;
pub mod client;
pub mod models;

pub use adapter::CosmosDbAdapter;
pub use client::CosmosDbClient;
