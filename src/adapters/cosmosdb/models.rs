//! Query text and partition key helpers for the record container

use crate::config::PartitionKeyField;
use crate::domain::{CosmosDbError, PlateExportError, Result, StoredRecord};
use serde_json::Value;

/// Parameterized query selecting records not yet exported
pub const UNEXPORTED_QUERY: &str = "SELECT * FROM c WHERE c.Exported = @exported";

/// Name of the boolean parameter in [`UNEXPORTED_QUERY`]
pub const EXPORTED_PARAM: &str = "@exported";

/// Partition key value of a record for the configured key property
pub fn partition_key_value(record: &StoredRecord, field: PartitionKeyField) -> String {
    match field {
        PartitionKeyField::Id => record.id.as_str().to_string(),
        PartitionKeyField::FileName => record.record.file_name.clone(),
        PartitionKeyField::LicensePlateText => record.record.license_plate_text.clone(),
    }
}

/// Decode a queried document into a record
///
/// # Errors
///
/// Returns [`CosmosDbError::DeserializationFailed`] naming the document id.
pub fn parse_document(document: Value) -> Result<StoredRecord> {
    let id = document_id(&document);
    serde_json::from_value(document).map_err(|e| {
        PlateExportError::CosmosDb(CosmosDbError::DeserializationFailed(format!(
            "document {id}: {e}"
        )))
    })
}

/// Decode queried documents, skipping the ones that are not license plate records
///
/// A skipped document keeps `Exported == false` in the store and is logged
/// on every cycle until it is fixed upstream.
pub fn collect_records(documents: impl IntoIterator<Item = Value>) -> Vec<StoredRecord> {
    documents
        .into_iter()
        .filter_map(|document| {
            let id = document_id(&document);
            match parse_document(document) {
                Ok(record) => Some(record),
                Err(e) => {
                    tracing::warn!(document_id = %id, error = %e, "Skipping malformed record");
                    None
                }
            }
        })
        .collect()
}

fn document_id(document: &Value) -> String {
    document
        .get("id")
        .and_then(Value::as_str)
        .unwrap_or("<no id>")
        .to_string()
}
