//! Storage account connection strings
//!
//! Parses the `Key=Value;Key=Value` connection strings handed out by the
//! Azure portal into a blob endpoint and a credential.

use crate::domain::{BlobStorageError, PlateExportError, Result};
use base64::{engine::general_purpose, Engine as _};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use url::Url;

/// Account name used by the local storage emulator
pub const DEV_STORE_ACCOUNT: &str = "devstoreaccount1";

/// Well-known account key of the local storage emulator
pub const DEV_STORE_KEY: &str =
    "Eby8vdM02xNOcqFlqUwJPLlmEtlCDXJ1OUzFT50uSRZ6IFsuFq2UVErCz4I6tq/K1SZFPTOtr/KBHBeksoGMGw==";

const DEV_STORE_BLOB_ENDPOINT: &str = "http://127.0.0.1:10000/devstoreaccount1";

/// Credential used to authorize blob requests
#[derive(Clone)]
pub enum BlobCredential {
    /// Account name and decoded account key, signed per request
    SharedKey { account: String, key: Vec<u8> },

    /// Pre-signed SAS query string, without the leading `?`
    SharedAccessSignature(String),
}

impl fmt::Debug for BlobCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlobCredential::SharedKey { account, .. } => f
                .debug_struct("SharedKey")
                .field("account", account)
                .field("key", &"[REDACTED]")
                .finish(),
            BlobCredential::SharedAccessSignature(_) => {
                f.write_str("SharedAccessSignature([REDACTED])")
            }
        }
    }
}

/// Parsed storage connection string
#[derive(Debug, Clone)]
pub struct BlobConnection {
    /// Blob service endpoint, e.g. `https://account.blob.core.windows.net`
    pub endpoint: Url,

    /// Request credential
    pub credential: BlobCredential,
}

impl BlobConnection {
    /// Parse a connection string
    ///
    /// Recognized keys (case-insensitive): `DefaultEndpointsProtocol`,
    /// `AccountName`, `AccountKey`, `EndpointSuffix`, `BlobEndpoint`,
    /// `SharedAccessSignature` and `UseDevelopmentStorage`.
    ///
    /// # Errors
    ///
    /// Returns [`BlobStorageError::InvalidConnectionString`] when the string
    /// is malformed or carries no usable credential.
    pub fn parse(connection_string: &str) -> Result<Self> {
        let settings = parse_settings(connection_string)?;
        let get = |key: &str| settings.get(key).map(String::as_str);

        if get("usedevelopmentstorage").is_some_and(|v| v.eq_ignore_ascii_case("true")) {
            let endpoint = get("blobendpoint").unwrap_or(DEV_STORE_BLOB_ENDPOINT);
            return Ok(Self {
                endpoint: parse_endpoint(endpoint)?,
                credential: BlobCredential::SharedKey {
                    account: DEV_STORE_ACCOUNT.to_string(),
                    key: decode_key(DEV_STORE_KEY)?,
                },
            });
        }

        let account = get("accountname");

        let endpoint = match (get("blobendpoint"), account) {
            (Some(endpoint), _) => parse_endpoint(endpoint)?,
            (None, Some(account)) => {
                let protocol = get("defaultendpointsprotocol").unwrap_or("https");
                let suffix = get("endpointsuffix").unwrap_or("core.windows.net");
                parse_endpoint(&format!("{protocol}://{account}.blob.{suffix}"))?
            }
            (None, None) => {
                return Err(invalid(
                    "either BlobEndpoint or AccountName must be present",
                ))
            }
        };

        let credential = match (account, get("accountkey"), get("sharedaccesssignature")) {
            (Some(account), Some(key), _) => BlobCredential::SharedKey {
                account: account.to_string(),
                key: decode_key(key)?,
            },
            (_, _, Some(sas)) => {
                BlobCredential::SharedAccessSignature(sas.trim_start_matches('?').to_string())
            }
            (None, Some(_), None) => return Err(invalid("AccountKey requires AccountName")),
            _ => {
                return Err(invalid(
                    "no credential found (expected AccountKey or SharedAccessSignature)",
                ))
            }
        };

        Ok(Self {
            endpoint,
            credential,
        })
    }

    /// Account name, when known
    pub fn account_name(&self) -> Option<&str> {
        match &self.credential {
            BlobCredential::SharedKey { account, .. } => Some(account),
            BlobCredential::SharedAccessSignature(_) => None,
        }
    }
}

impl FromStr for BlobConnection {
    type Err = PlateExportError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

fn parse_settings(connection_string: &str) -> Result<HashMap<String, String>> {
    let mut settings = HashMap::new();

    for part in connection_string.split(';') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }

        let (key, value) = part
            .split_once('=')
            .ok_or_else(|| invalid(&format!("segment '{}' is not Key=Value", redact(part))))?;

        if value.is_empty() {
            return Err(invalid(&format!("'{}' has an empty value", key.trim())));
        }

        settings.insert(key.trim().to_ascii_lowercase(), value.trim().to_string());
    }

    if settings.is_empty() {
        return Err(invalid("connection string is empty"));
    }

    Ok(settings)
}

fn parse_endpoint(endpoint: &str) -> Result<Url> {
    let url = Url::parse(endpoint).map_err(|e| invalid(&format!("bad endpoint '{endpoint}': {e}")))?;
    if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(&format!("bad endpoint '{endpoint}'")));
    }
    Ok(url)
}

fn decode_key(key: &str) -> Result<Vec<u8>> {
    general_purpose::STANDARD
        .decode(key)
        .map_err(|_| invalid("AccountKey is not valid base64"))
}

// Keeps the key name only, values may be secrets
fn redact(part: &str) -> String {
    match part.find(['=', ' ']) {
        Some(idx) => format!("{}...", &part[..idx]),
        None => "...".to_string(),
    }
}

fn invalid(message: &str) -> PlateExportError {
    PlateExportError::BlobStorage(BlobStorageError::InvalidConnectionString(message.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_parse_account_key_connection_string() {
        let conn = BlobConnection::parse(
            "DefaultEndpointsProtocol=https;AccountName=tollbooth;AccountKey=c2VjcmV0;EndpointSuffix=core.windows.net",
        )
        .unwrap();

        assert_eq!(
            conn.endpoint.as_str(),
            "https://tollbooth.blob.core.windows.net/"
        );
        assert_eq!(conn.account_name(), Some("tollbooth"));
        match conn.credential {
            BlobCredential::SharedKey { key, .. } => assert_eq!(key, b"secret"),
            other => panic!("unexpected credential {other:?}"),
        }
    }

    #[test]
    fn test_parse_defaults_protocol_and_suffix() {
        let conn = BlobConnection::parse("AccountName=acct;AccountKey=c2VjcmV0").unwrap();
        assert_eq!(conn.endpoint.as_str(), "https://acct.blob.core.windows.net/");
    }

    #[test]
    fn test_parse_explicit_blob_endpoint_wins() {
        let conn = BlobConnection::parse(
            "AccountName=acct;AccountKey=c2VjcmV0;BlobEndpoint=http://localhost:1234/acct",
        )
        .unwrap();
        assert_eq!(conn.endpoint.as_str(), "http://localhost:1234/acct");
    }

    #[test]
    fn test_parse_sas_connection_string() {
        let conn = BlobConnection::parse(
            "BlobEndpoint=https://acct.blob.core.windows.net/;SharedAccessSignature=?sv=2021-08-06&sig=abc%3D",
        )
        .unwrap();

        assert_eq!(conn.account_name(), None);
        match conn.credential {
            BlobCredential::SharedAccessSignature(sas) => {
                assert_eq!(sas, "sv=2021-08-06&sig=abc%3D")
            }
            other => panic!("unexpected credential {other:?}"),
        }
    }

    #[test]
    fn test_parse_development_storage() {
        let conn = BlobConnection::parse("UseDevelopmentStorage=true").unwrap();
        assert_eq!(conn.endpoint.as_str(), DEV_STORE_BLOB_ENDPOINT);
        assert_eq!(conn.account_name(), Some(DEV_STORE_ACCOUNT));
    }

    #[test]
    fn test_keys_are_case_insensitive() {
        let conn = BlobConnection::parse("accountname=acct;ACCOUNTKEY=c2VjcmV0").unwrap();
        assert_eq!(conn.account_name(), Some("acct"));
    }

    #[test_case(""; "empty")]
    #[test_case("AccountName=acct"; "no credential")]
    #[test_case("AccountKey=c2VjcmV0;BlobEndpoint=https://x.blob.core.windows.net"; "key without account")]
    #[test_case("AccountName=acct;AccountKey=not base64!"; "bad key")]
    #[test_case("AccountName=acct;garbage"; "segment without equals")]
    #[test_case("BlobEndpoint=not a url;SharedAccessSignature=sv=1"; "bad endpoint")]
    fn test_parse_rejects(input: &str) {
        let err = BlobConnection::parse(input).unwrap_err();
        assert!(matches!(
            err,
            PlateExportError::BlobStorage(BlobStorageError::InvalidConnectionString(_))
        ));
    }

    #[test]
    fn test_debug_redacts_key() {
        let conn = BlobConnection::parse("AccountName=acct;AccountKey=c2VjcmV0").unwrap();
        let debug = format!("{conn:?}");
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("115")); // first byte of "secret"
    }
}
