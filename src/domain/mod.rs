//! Domain models and types for plate-export.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Strongly-typed identifiers** ([`RecordId`])
//! - **Domain models** ([`LicensePlateRecord`], [`StoredRecord`], [`ExportRow`])
//! - **Error types** ([`PlateExportError`], [`CosmosDbError`], [`BlobStorageError`])
//! - **Result type alias** ([`Result`])
//!
//! # Builder Pattern
//!
//! ```rust
//! use plate_export::domain::RecordBuilder;
//! use chrono::Utc;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let record = RecordBuilder::new()
//!     .file_name("cars/0001.jpg")
//!     .license_plate_text("ABC123")
//!     .timestamp(Utc::now())
//!     .build()?;
//! assert!(record.plate_found);
//! # Ok(())
//! # }
//! ```

pub mod errors;
pub mod ids;
pub mod record;
pub mod result;

// Re-export commonly used types for convenience
pub use errors::{BlobStorageError, CosmosDbError, PlateExportError};
pub use ids::RecordId;
pub use record::{ExportRow, LicensePlateRecord, RecordBuilder, StoredRecord};
pub use result::Result;
