//! Blob Storage client against a mock HTTP server

use chrono::{TimeZone, Utc};
use mockito::{Matcher, Server};
use plate_export::adapters::blob::{BlobConnection, BlobStorageClient};
use plate_export::adapters::{AzureConnector, BlobStore};
use plate_export::config::{secret_string, CosmosDbConfig, PartitionKeyField, StorageConfig};
use plate_export::core::export::{CsvExporter, ExportOutcome};
use plate_export::domain::{RecordBuilder, RecordId, StoredRecord};
use std::sync::Arc;
use std::time::Duration;

const BLOB_NAME: &str = "2024-01-02T03:04:05.csv";

fn shared_key_connection(server: &Server) -> String {
    format!(
        "BlobEndpoint={};AccountName=acct;AccountKey=c2VjcmV0",
        server.url()
    )
}

fn client(connection_string: &str) -> BlobStorageClient {
    let connection = BlobConnection::parse(connection_string).unwrap();
    BlobStorageClient::with_connection(connection, "exports".to_string(), Duration::from_secs(5))
        .unwrap()
}

#[tokio::test]
async fn test_create_container_signs_request() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("PUT", "/exports")
        .match_query(Matcher::UrlEncoded("restype".into(), "container".into()))
        .match_header("authorization", Matcher::Regex("^SharedKey acct:".into()))
        .match_header("x-ms-version", "2021-08-06")
        .match_header("x-ms-date", Matcher::Any)
        .with_status(201)
        .create_async()
        .await;

    client(&shared_key_connection(&server))
        .ensure_container_exists()
        .await
        .unwrap();

    mock.assert_async().await;
}

#[tokio::test]
async fn test_existing_container_is_not_an_error() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("PUT", "/exports")
        .match_query(Matcher::UrlEncoded("restype".into(), "container".into()))
        .with_status(409)
        .with_body("<?xml version=\"1.0\" encoding=\"utf-8\"?><Error><Code>ContainerAlreadyExists</Code></Error>")
        .create_async()
        .await;

    let result = client(&shared_key_connection(&server))
        .ensure_container_exists()
        .await;

    assert!(result.is_ok());
    mock.assert_async().await;
}

#[tokio::test]
async fn test_upload_block_blob() {
    let mut server = Server::new_async().await;
    let body = "FileName,LicensePlateText,TimeStamp\na.jpg,ABC123,2024-01-01T12:00:00Z\n";
    let mock = server
        .mock("PUT", format!("/exports/{BLOB_NAME}").as_str())
        .match_header("x-ms-blob-type", "BlockBlob")
        .match_header("content-type", "text/csv")
        .match_header("authorization", Matcher::Regex("^SharedKey acct:".into()))
        .match_body(body)
        .with_status(201)
        .create_async()
        .await;

    client(&shared_key_connection(&server))
        .upload(BLOB_NAME, body.as_bytes().to_vec(), "text/csv")
        .await
        .unwrap();

    mock.assert_async().await;
}

#[tokio::test]
async fn test_upload_failure_reports_service_code() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("PUT", format!("/exports/{BLOB_NAME}").as_str())
        .with_status(403)
        .with_body(
            "<?xml version=\"1.0\" encoding=\"utf-8\"?>\
             <Error><Code>AuthenticationFailed</Code><Message>Signature mismatch</Message></Error>",
        )
        .create_async()
        .await;

    let err = client(&shared_key_connection(&server))
        .upload(BLOB_NAME, b"FileName\n".to_vec(), "text/csv")
        .await
        .unwrap_err();

    let message = err.to_string();
    assert!(message.contains("403"));
    assert!(message.contains("AuthenticationFailed"));
}

#[tokio::test]
async fn test_sas_credential_goes_in_query() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("PUT", format!("/exports/{BLOB_NAME}").as_str())
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("sv".into(), "2021-08-06".into()),
            Matcher::UrlEncoded("sig".into(), "abc=".into()),
        ]))
        .match_header("authorization", Matcher::Missing)
        .with_status(201)
        .create_async()
        .await;

    let connection = format!(
        "BlobEndpoint={};SharedAccessSignature=sv=2021-08-06&sig=abc%3D",
        server.url()
    );
    client(&connection)
        .upload(BLOB_NAME, b"FileName\n".to_vec(), "text/csv")
        .await
        .unwrap();

    mock.assert_async().await;
}

fn connector(server: &Server) -> AzureConnector {
    let cosmosdb = CosmosDbConfig {
        endpoint: "https://unused.documents.azure.com:443/".to_string(),
        key: secret_string("unused".to_string()),
        database_name: "LicensePlates".to_string(),
        container_name: "Processed".to_string(),
        partition_key: PartitionKeyField::Id,
        page_size: 100,
    };
    let storage = StorageConfig {
        connection_string: secret_string(shared_key_connection(server)),
        container_name: "exports".to_string(),
        request_timeout_seconds: 5,
    };
    AzureConnector::new(cosmosdb, storage)
}

fn records() -> Vec<StoredRecord> {
    let record = RecordBuilder::new()
        .file_name("a.jpg")
        .license_plate_text("ABC123")
        .timestamp(Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap())
        .build()
        .unwrap();
    vec![StoredRecord::new(RecordId::new("1").unwrap(), record)]
}

#[tokio::test]
async fn test_exporter_creates_container_then_uploads() {
    let mut server = Server::new_async().await;
    let container = server
        .mock("PUT", "/exports")
        .match_query(Matcher::UrlEncoded("restype".into(), "container".into()))
        .with_status(409)
        .create_async()
        .await;
    let blob = server
        .mock("PUT", format!("/exports/{BLOB_NAME}").as_str())
        .match_body("FileName,LicensePlateText,TimeStamp\na.jpg,ABC123,2024-01-01T12:00:00Z\n")
        .with_status(201)
        .create_async()
        .await;

    let exporter = CsvExporter::new(Arc::new(connector(&server)));
    let now = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
    let outcome = exporter.export(&records(), now).await.unwrap();

    assert!(outcome.is_success());
    assert_eq!(outcome.blob_name(), BLOB_NAME);
    container.assert_async().await;
    blob.assert_async().await;
}

#[tokio::test]
async fn test_exporter_reports_failed_upload() {
    let mut server = Server::new_async().await;
    let _container = server
        .mock("PUT", "/exports")
        .match_query(Matcher::UrlEncoded("restype".into(), "container".into()))
        .with_status(201)
        .create_async()
        .await;
    let _blob = server
        .mock("PUT", format!("/exports/{BLOB_NAME}").as_str())
        .with_status(500)
        .create_async()
        .await;

    let exporter = CsvExporter::new(Arc::new(connector(&server)));
    let now = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();

    match exporter.export(&records(), now).await.unwrap() {
        ExportOutcome::UploadFailed { blob_name, reason } => {
            assert_eq!(blob_name, BLOB_NAME);
            assert!(reason.contains("500"));
        }
        other => panic!("expected a failed upload, got {other:?}"),
    }
}
