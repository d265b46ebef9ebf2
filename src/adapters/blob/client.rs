//! Blob Storage REST client
//!
//! Talks to the Blob service over plain HTTPS with `reqwest`, signing each
//! request with the account key or appending the SAS token from the
//! connection string.

use crate::adapters::blob::auth::{authorization_header, format_http_date, string_to_sign};
use crate::adapters::blob::connection::{BlobConnection, BlobCredential};
use crate::adapters::traits::BlobStore;
use crate::config::StorageConfig;
use crate::domain::{BlobStorageError, PlateExportError, Result};
use async_trait::async_trait;
use chrono::Utc;
use regex::Regex;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, ClientBuilder, Method, Response, StatusCode};
use std::sync::OnceLock;
use std::time::Duration;
use url::Url;

/// REST API version sent with every request
pub const API_VERSION: &str = "2021-08-06";

/// Blob Storage client for a single container
pub struct BlobStorageClient {
    /// HTTP client for making requests
    http: Client,

    /// Endpoint and credential
    connection: BlobConnection,

    /// Target container
    container_name: String,
}

impl BlobStorageClient {
    /// Create a client from storage configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the connection string is invalid or the HTTP
    /// client cannot be built.
    pub fn new(config: &StorageConfig) -> Result<Self> {
        use secrecy::ExposeSecret;

        let connection = BlobConnection::parse(config.connection_string.expose_secret().as_ref())?;
        Self::with_connection(
            connection,
            config.container_name.clone(),
            Duration::from_secs(config.request_timeout_seconds),
        )
    }

    /// Create a client from an already parsed connection
    pub fn with_connection(
        connection: BlobConnection,
        container_name: String,
        timeout: Duration,
    ) -> Result<Self> {
        let http = ClientBuilder::new()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| {
                PlateExportError::BlobStorage(BlobStorageError::RequestFailed(format!(
                    "Failed to build HTTP client: {e}"
                )))
            })?;

        Ok(Self {
            http,
            connection,
            container_name,
        })
    }

    /// Blob service endpoint
    pub fn endpoint(&self) -> &Url {
        &self.connection.endpoint
    }

    /// URL of the container resource
    pub fn container_url(&self) -> Result<Url> {
        self.resource_url(&[self.container_name.as_str()])
    }

    /// URL of a blob in the container
    pub fn blob_url(&self, blob_name: &str) -> Result<Url> {
        self.resource_url(&[self.container_name.as_str(), blob_name])
    }

    fn resource_url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.connection.endpoint.clone();
        url.path_segments_mut()
            .map_err(|_| {
                PlateExportError::BlobStorage(BlobStorageError::InvalidConnectionString(format!(
                    "endpoint '{}' cannot hold a path",
                    self.connection.endpoint
                )))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Sign and send a request
    async fn send(
        &self,
        method: Method,
        mut url: Url,
        mut headers: HeaderMap,
        body: Vec<u8>,
    ) -> Result<Response> {
        headers.insert(
            HeaderName::from_static("x-ms-date"),
            header_value(&format_http_date(Utc::now()))?,
        );
        headers.insert(
            HeaderName::from_static("x-ms-version"),
            HeaderValue::from_static(API_VERSION),
        );

        match &self.connection.credential {
            BlobCredential::SharedKey { account, key } => {
                let sts = string_to_sign(&method, &url, account, &headers, body.len());
                let authorization = authorization_header(account, key, &sts)?;
                headers.insert(AUTHORIZATION, header_value(&authorization)?);
            }
            BlobCredential::SharedAccessSignature(sas) => {
                let pairs: Vec<(String, String)> = url::form_urlencoded::parse(sas.as_bytes())
                    .into_owned()
                    .collect();
                url.query_pairs_mut().extend_pairs(pairs);
            }
        }

        tracing::trace!(method = %method, path = %url.path(), "Sending blob request");

        self.http
            .request(method, url)
            .headers(headers)
            .body(body)
            .send()
            .await
            .map_err(|e| PlateExportError::BlobStorage(BlobStorageError::RequestFailed(e.to_string())))
    }
}

#[async_trait]
impl BlobStore for BlobStorageClient {
    async fn ensure_container_exists(&self) -> Result<()> {
        let mut url = self.container_url()?;
        url.query_pairs_mut().append_pair("restype", "container");

        let response = self.send(Method::PUT, url, HeaderMap::new(), Vec::new()).await?;

        match response.status() {
            StatusCode::CREATED => {
                tracing::info!(container = %self.container_name, "Created blob container");
                Ok(())
            }
            StatusCode::CONFLICT => {
                tracing::debug!(container = %self.container_name, "Blob container already exists");
                Ok(())
            }
            status => {
                let detail = describe_failure(status, response).await;
                Err(PlateExportError::BlobStorage(
                    BlobStorageError::ContainerCreationFailed(format!(
                        "{}: {detail}",
                        self.container_name
                    )),
                ))
            }
        }
    }

    async fn upload(&self, blob_name: &str, data: Vec<u8>, content_type: &str) -> Result<()> {
        let url = self.blob_url(blob_name)?;
        let size = data.len();

        let mut headers = HeaderMap::new();
        headers.insert(
            HeaderName::from_static("x-ms-blob-type"),
            HeaderValue::from_static("BlockBlob"),
        );
        headers.insert(CONTENT_TYPE, header_value(content_type)?);

        let response = self.send(Method::PUT, url, headers, data).await?;

        if response.status() == StatusCode::CREATED {
            tracing::debug!(
                container = %self.container_name,
                blob = %blob_name,
                bytes = size,
                "Blob uploaded"
            );
            return Ok(());
        }

        let status = response.status();
        let detail = describe_failure(status, response).await;
        Err(PlateExportError::BlobStorage(BlobStorageError::UploadFailed(
            format!("{blob_name}: {detail}"),
        )))
    }

    fn container_name(&self) -> &str {
        &self.container_name
    }
}

fn header_value(value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value).map_err(|e| {
        PlateExportError::BlobStorage(BlobStorageError::SigningFailed(format!(
            "invalid header value: {e}"
        )))
    })
}

/// Status plus the service error code from the XML body, when present
async fn describe_failure(status: StatusCode, response: Response) -> String {
    let body = response.text().await.unwrap_or_default();
    match error_code(&body) {
        Some(code) => format!("HTTP {} ({code})", status.as_u16()),
        None => format!("HTTP {}", status.as_u16()),
    }
}

fn error_code(body: &str) -> Option<String> {
    static CODE: OnceLock<Regex> = OnceLock::new();
    let re = CODE
        .get_or_init(|| Regex::new(r"<Code>\s*([^<]+?)\s*</Code>").expect("error code pattern is valid"));
    re.captures(body).map(|c| c[1].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(connection_string: &str) -> BlobStorageClient {
        let connection = BlobConnection::parse(connection_string).unwrap();
        BlobStorageClient::with_connection(connection, "exports".to_string(), Duration::from_secs(5))
            .unwrap()
    }

    #[test]
    fn test_blob_url_keeps_colons_in_name() {
        let client = client("AccountName=acct;AccountKey=c2VjcmV0");
        let url = client.blob_url("2024-03-05T07:08:09.csv").unwrap();
        assert_eq!(
            url.as_str(),
            "https://acct.blob.core.windows.net/exports/2024-03-05T07:08:09.csv"
        );
    }

    #[test]
    fn test_container_url_on_path_style_endpoint() {
        let client = client("UseDevelopmentStorage=true");
        assert_eq!(
            client.container_url().unwrap().as_str(),
            "http://127.0.0.1:10000/devstoreaccount1/exports"
        );
    }

    #[test]
    fn test_error_code_extraction() {
        let body = r#"<?xml version="1.0" encoding="utf-8"?><Error><Code>AuthenticationFailed</Code><Message>nope</Message></Error>"#;
        assert_eq!(error_code(body).as_deref(), Some("AuthenticationFailed"));
        assert_eq!(error_code("not xml"), None);
    }
}
