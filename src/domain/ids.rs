//! Domain identifier types
//!
//! Newtype wrappers keep store-assigned identifiers from being mixed up with
//! arbitrary strings such as file names or plate text.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Record identifier newtype wrapper
///
/// The document id assigned by the record store. Opaque to this crate.
///
/// # Examples
///
/// ```
/// use plate_export::domain::ids::RecordId;
/// use std::str::FromStr;
///
/// let id = RecordId::from_str("0f6c9b1e-8a4e-4d53-9a57-0d8a3f0a9c11").unwrap();
/// assert_eq!(id.as_str(), "0f6c9b1e-8a4e-4d53-9a57-0d8a3f0a9c11");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RecordId(String);

impl RecordId {
    /// Creates a new RecordId from a string
    ///
    /// # Returns
    ///
    /// Returns `Ok(RecordId)` if the ID is non-empty, `Err` otherwise
    pub fn new(id: impl Into<String>) -> Result<Self, String> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err("Record ID cannot be empty".to_string());
        }
        Ok(Self(id))
    }

    /// Generates a fresh random identifier
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// Returns the record ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes self and returns the inner String
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RecordId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for RecordId {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<RecordId> for String {
    fn from(id: RecordId) -> Self {
        id.0
    }
}

impl AsRef<str> for RecordId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
