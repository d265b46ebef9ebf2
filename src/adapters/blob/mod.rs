//! Azure Blob Storage integration
//!
//! A small REST client covering the two calls the export needs: create the
//! target container if missing and upload a block blob.

pub mod auth;
pub mod client;
pub mod connection;

pub use client::BlobStorageClient;
pub use connection::{BlobConnection, BlobCredential};
