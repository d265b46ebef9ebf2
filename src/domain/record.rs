//! License plate record domain model
//!
//! A record is written by the upstream recognition pipeline and later picked
//! up by the export cycle. The persisted document is split into the plain data
//! ([`LicensePlateRecord`]) and the store-assigned identity and version
//! ([`StoredRecord`]). [`ExportRow`] is the narrower shape written to CSV.

use super::ids::RecordId;
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Recognized license plate event
///
/// Field names on the wire follow the documents produced by the upstream
/// ingestion (`FileName`, `LicensePlateText`, `TimeStamp`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LicensePlateRecord {
    /// Name of the source image, empty when the document has none
    #[serde(rename = "FileName", default, deserialize_with = "null_as_empty")]
    pub file_name: String,

    /// Recognized plate text, empty when nothing was recognized
    #[serde(
        rename = "LicensePlateText",
        default,
        deserialize_with = "null_as_empty"
    )]
    pub license_plate_text: String,

    /// When the source image was observed
    #[serde(rename = "TimeStamp", deserialize_with = "lenient_utc")]
    pub timestamp: DateTime<Utc>,

    /// Whether recognition succeeded
    #[serde(rename = "LicensePlateFound", default)]
    pub plate_found: bool,

    /// Whether the record has been included in a successful export
    #[serde(rename = "Exported", default)]
    pub exported: bool,
}

/// A record together with its store-assigned identity and version
///
/// Properties of the stored document that this crate doesn't model are kept
/// in `extra` so a replace writes them back untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredRecord {
    /// Document id
    pub id: RecordId,

    /// Version token assigned by the store
    #[serde(rename = "_etag", default, skip_serializing_if = "Option::is_none")]
    pub etag: Option<String>,

    /// Record data
    #[serde(flatten)]
    pub record: LicensePlateRecord,

    /// Remaining document properties
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl StoredRecord {
    /// Wraps a record with a known id and no version
    pub fn new(id: RecordId, record: LicensePlateRecord) -> Self {
        Self {
            id,
            etag: None,
            record,
            extra: Map::new(),
        }
    }

    /// Whether the record still has to be exported
    pub fn is_unexported(&self) -> bool {
        !self.record.exported
    }

    /// Flags the record as exported
    pub fn mark_exported(&mut self) {
        self.record.exported = true;
    }
}

/// Row written to the export CSV
///
/// Derived 1:1 from a record; drops the id, version, `LicensePlateFound` and
/// `Exported`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportRow {
    /// Name of the source image
    #[serde(rename = "FileName")]
    pub file_name: String,

    /// Recognized plate text
    #[serde(rename = "LicensePlateText")]
    pub license_plate_text: String,

    /// When the source image was observed
    #[serde(rename = "TimeStamp")]
    pub timestamp: DateTime<Utc>,
}

impl ExportRow {
    /// CSV header, in column order
    pub const HEADERS: [&'static str; 3] = ["FileName", "LicensePlateText", "TimeStamp"];
}

impl From<&LicensePlateRecord> for ExportRow {
    fn from(source: &LicensePlateRecord) -> Self {
        Self {
            file_name: source.file_name.clone(),
            license_plate_text: source.license_plate_text.clone(),
            timestamp: source.timestamp,
        }
    }
}

impl From<&StoredRecord> for ExportRow {
    fn from(source: &StoredRecord) -> Self {
        Self::from(&source.record)
    }
}

/// Builder for constructing LicensePlateRecord instances
#[derive(Debug, Default)]
pub struct RecordBuilder {
    file_name: Option<String>,
    license_plate_text: Option<String>,
    timestamp: Option<DateTime<Utc>>,
    plate_found: Option<bool>,
    exported: bool,
}

impl RecordBuilder {
    /// Creates a new RecordBuilder
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the source file name
    pub fn file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }

    /// Sets the recognized plate text
    pub fn license_plate_text(mut self, text: impl Into<String>) -> Self {
        self.license_plate_text = Some(text.into());
        self
    }

    /// Sets the observation timestamp
    pub fn timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Overrides whether a plate was found
    ///
    /// Defaults to whether the plate text is non-empty.
    pub fn plate_found(mut self, found: bool) -> Self {
        self.plate_found = Some(found);
        self
    }

    /// Sets the exported flag
    pub fn exported(mut self, exported: bool) -> Self {
        self.exported = exported;
        self
    }

    /// Builds the LicensePlateRecord
    ///
    /// # Errors
    ///
    /// Returns an error if the file name or timestamp is missing
    pub fn build(self) -> Result<LicensePlateRecord, String> {
        let license_plate_text = self.license_plate_text.unwrap_or_default();
        let plate_found = self
            .plate_found
            .unwrap_or(!license_plate_text.is_empty());

        Ok(LicensePlateRecord {
            file_name: self.file_name.ok_or("file_name is required")?,
            license_plate_text,
            timestamp: self.timestamp.ok_or("timestamp is required")?,
            plate_found,
            exported: self.exported,
        })
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Accepts RFC 3339 timestamps as well as offset-less ones, which are read as UTC.
fn lenient_utc<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw).map_err(serde::de::Error::custom)
}

/// Parses a document timestamp
///
/// Offset-less values are interpreted as UTC.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .map_err(|e| format!("invalid timestamp '{raw}': {e}"))
}
