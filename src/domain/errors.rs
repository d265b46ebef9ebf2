//! Domain error types
//!
//! This module defines the error hierarchy for plate-export.
//! All errors are domain-specific and don't expose third-party types.

use thiserror::Error;

/// Main plate-export error type
///
/// This is the primary error type used throughout the application.
/// It wraps backend-specific error types and provides context for error handling.
#[derive(Debug, Error)]
pub enum PlateExportError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Cosmos DB-related errors
    #[error("Cosmos DB error: {0}")]
    CosmosDb(#[from] CosmosDbError),

    /// Blob storage-related errors
    #[error("Blob storage error: {0}")]
    BlobStorage(#[from] BlobStorageError),

    /// A replace failed part-way through marking; earlier records stay marked
    #[error("Marking stopped after {marked} of {total} records: {source}")]
    MarkingInterrupted {
        marked: usize,
        total: usize,
        #[source]
        source: Box<PlateExportError>,
    },

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// CSV encoding errors
    #[error("CSV error: {0}")]
    Csv(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),
}

/// Cosmos DB-specific errors
///
/// Errors that occur when interacting with Azure Cosmos DB.
/// These errors don't expose third-party SDK types.
#[derive(Debug, Error)]
pub enum CosmosDbError {
    /// Failed to connect to Cosmos DB
    #[error("Failed to connect to Cosmos DB: {0}")]
    ConnectionFailed(String),

    /// Container not found
    #[error("Container not found: {0}")]
    ContainerNotFound(String),

    /// Failed to query documents
    #[error("Failed to query documents: {0}")]
    QueryFailed(String),

    /// Failed to replace a document
    #[error("Failed to update document: {0}")]
    UpdateFailed(String),

    /// Optimistic concurrency check failed (412)
    #[error("Precondition failed: {0}")]
    PreconditionFailed(String),

    /// Failed to deserialize response
    #[error("Failed to deserialize response: {0}")]
    DeserializationFailed(String),
}

/// Blob storage-specific errors
///
/// Errors that occur when talking to the Azure Blob Storage REST API.
#[derive(Debug, Error)]
pub enum BlobStorageError {
    /// Connection string could not be parsed
    #[error("Invalid connection string: {0}")]
    InvalidConnectionString(String),

    /// Request could not be signed
    #[error("Failed to sign request: {0}")]
    SigningFailed(String),

    /// Transport-level failure (DNS, TLS, timeout)
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Failed to create the container
    #[error("Failed to create container: {0}")]
    ContainerCreationFailed(String),

    /// Failed to upload a blob
    #[error("Failed to upload blob: {0}")]
    UploadFailed(String),
}

// Conversion from std::io::Error
impl From<std::io::Error> for PlateExportError {
    fn from(err: std::io::Error) -> Self {
        PlateExportError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for PlateExportError {
    fn from(err: serde_json::Error) -> Self {
        PlateExportError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for PlateExportError {
    fn from(err: toml::de::Error) -> Self {
        PlateExportError::Configuration(format!("TOML parse error: {err}"))
    }
}

impl From<csv::Error> for PlateExportError {
    fn from(err: csv::Error) -> Self {
        PlateExportError::Csv(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PlateExportError::Configuration("Invalid config".to_string());
        assert_eq!(err.to_string(), "Configuration error: Invalid config");
    }

    #[test]
    fn test_cosmosdb_error_conversion() {
        let cosmos_err = CosmosDbError::QueryFailed("timeout".to_string());
        let err: PlateExportError = cosmos_err.into();
        assert!(matches!(err, PlateExportError::CosmosDb(_)));
        assert_eq!(
            err.to_string(),
            "Cosmos DB error: Failed to query documents: timeout"
        );
    }

    #[test]
    fn test_blob_storage_error_conversion() {
        let blob_err = BlobStorageError::UploadFailed("HTTP 403 (AuthenticationFailed)".to_string());
        let err: PlateExportError = blob_err.into();
        assert!(matches!(err, PlateExportError::BlobStorage(_)));
        assert!(err.to_string().contains("403"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let err: PlateExportError = io_err.into();
        assert!(matches!(err, PlateExportError::Io(_)));
    }

    #[test]
    fn test_serde_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let err: PlateExportError = json_err.into();
        assert!(matches!(err, PlateExportError::Serialization(_)));
    }

    #[test]
    fn test_toml_error_conversion() {
        let toml_err = toml::from_str::<toml::Value>("invalid = toml = syntax").unwrap_err();
        let err: PlateExportError = toml_err.into();
        assert!(matches!(err, PlateExportError::Configuration(_)));
        assert!(err.to_string().contains("TOML parse error"));
    }

    #[test]
    fn test_marking_interrupted_keeps_source() {
        use std::error::Error as _;

        let err = PlateExportError::MarkingInterrupted {
            marked: 2,
            total: 5,
            source: Box::new(CosmosDbError::UpdateFailed("doc-3".to_string()).into()),
        };
        assert!(err.to_string().starts_with("Marking stopped after 2 of 5 records"));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_errors_implement_std_error() {
        let _: &dyn std::error::Error = &PlateExportError::Csv("x".to_string());
        let _: &dyn std::error::Error = &CosmosDbError::UpdateFailed("x".to_string());
        let _: &dyn std::error::Error = &BlobStorageError::UploadFailed("x".to_string());
    }
}
