//! Shared Key request signing for the Blob service
//!
//! Implements the `SharedKey` authorization scheme: a canonical string is
//! built from the verb, standard headers, `x-ms-*` headers and the resource
//! path, then signed with HMAC-SHA256 under the account key.

use crate::domain::{BlobStorageError, PlateExportError, Result};
use base64::{engine::general_purpose, Engine as _};
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use reqwest::header::HeaderMap;
use reqwest::Method;
use sha2::Sha256;
use std::collections::BTreeMap;
use url::Url;

type HmacSha256 = Hmac<Sha256>;

/// Standard headers in signing order, `Content-Length` handled separately
const SIGNED_HEADERS: [&str; 10] = [
    "content-encoding",
    "content-language",
    "content-md5",
    "content-type",
    "date",
    "if-modified-since",
    "if-match",
    "if-none-match",
    "if-unmodified-since",
    "range",
];

/// Format a timestamp for the `x-ms-date` header
pub fn format_http_date(at: DateTime<Utc>) -> String {
    at.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

/// Build the canonical string to sign for a request
///
/// `content_length` is the body length; zero is signed as an empty value.
pub fn string_to_sign(
    method: &Method,
    url: &Url,
    account: &str,
    headers: &HeaderMap,
    content_length: usize,
) -> String {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string()
    };

    let mut lines = vec![method.as_str().to_string()];
    for (idx, name) in SIGNED_HEADERS.iter().enumerate() {
        // Content-Length sits between Content-Language and Content-MD5
        if idx == 2 {
            lines.push(if content_length == 0 {
                String::new()
            } else {
                content_length.to_string()
            });
        }
        lines.push(header(name));
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out.push_str(&canonicalized_headers(headers));
    out.push_str(&canonicalized_resource(url, account));
    out
}

/// Sign `string_to_sign` and format the `Authorization` header value
///
/// # Errors
///
/// Returns [`BlobStorageError::SigningFailed`] if the key is unusable.
pub fn authorization_header(account: &str, key: &[u8], string_to_sign: &str) -> Result<String> {
    let mut mac = HmacSha256::new_from_slice(key).map_err(|e| {
        PlateExportError::BlobStorage(BlobStorageError::SigningFailed(e.to_string()))
    })?;
    mac.update(string_to_sign.as_bytes());
    let signature = general_purpose::STANDARD.encode(mac.finalize().into_bytes());

    Ok(format!("SharedKey {account}:{signature}"))
}

fn canonicalized_headers(headers: &HeaderMap) -> String {
    let mut ms_headers = BTreeMap::new();
    for (name, value) in headers {
        let name = name.as_str().to_ascii_lowercase();
        if name.starts_with("x-ms-") {
            let value = value.to_str().unwrap_or_default().trim().to_string();
            ms_headers.insert(name, value);
        }
    }

    ms_headers
        .into_iter()
        .map(|(name, value)| format!("{name}:{value}\n"))
        .collect()
}

fn canonicalized_resource(url: &Url, account: &str) -> String {
    let mut resource = format!("/{account}{}", url.path());

    let mut params: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for (name, value) in url.query_pairs() {
        params
            .entry(name.to_ascii_lowercase())
            .or_default()
            .push(value.into_owned());
    }

    for (name, mut values) in params {
        values.sort();
        resource.push_str(&format!("\n{name}:{}", values.join(",")));
    }

    resource
}
