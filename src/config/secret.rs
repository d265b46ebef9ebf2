//! Secure credential handling using the secrecy crate
//!
//! The Cosmos DB key and the blob storage connection string are held in
//! `Secret<SecretValue>` so they are zeroized on drop and redacted in `Debug`
//! output. Access requires an explicit `expose_secret()`.
//!
//! # Example
//!
//! ```rust
//! use plate_export::config::secret_string;
//! use secrecy::ExposeSecret;
//!
//! let key = secret_string("cosmos-key".to_string());
//! assert_eq!(key.expose_secret().as_ref(), "cosmos-key");
//! assert!(!format!("{key:?}").contains("cosmos-key"));
//! ```

use secrecy::{CloneableSecret, DebugSecret, Secret, SerializableSecret};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use zeroize::Zeroize;

/// String wrapper implementing the marker traits `Secret` needs
#[derive(Clone, Debug, Zeroize)]
#[zeroize(drop)]
pub struct SecretValue(String);

impl CloneableSecret for SecretValue {}
impl DebugSecret for SecretValue {}
impl SerializableSecret for SecretValue {}

impl From<String> for SecretValue {
    fn from(s: String) -> Self {
        SecretValue(s)
    }
}

impl PartialEq<str> for SecretValue {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl AsRef<str> for SecretValue {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl SecretValue {
    /// Check if the secret value is empty
    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl Serialize for SecretValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for SecretValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        String::deserialize(deserializer).map(SecretValue)
    }
}

/// A secret string: zeroized on drop, redacted in `Debug`
pub type SecretString = Secret<SecretValue>;

/// Wraps a String in a [`SecretString`]
#[inline]
pub fn secret_string(value: String) -> SecretString {
    Secret::new(SecretValue::from(value))
}
