//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the plate-export configuration file.

use crate::adapters::blob::{BlobConnection, BlobCredential};
use crate::cli::exit_code;
use crate::config::{load_config, AppConfig};
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        let config = match load_config(config_path) {
            Ok(c) => {
                println!("✅ Configuration file loaded and validated");
                c
            }
            Err(e) => {
                println!("❌ Configuration is invalid");
                println!("   Error: {e}");
                return Ok(exit_code::CONFIG_ERROR);
            }
        };

        match summarize(&config) {
            Ok(lines) => {
                println!();
                println!("Configuration Summary:");
                for line in lines {
                    println!("  {line}");
                }
                println!();
                Ok(exit_code::SUCCESS)
            }
            Err(e) => {
                println!("❌ Configuration validation failed");
                println!("   Error: {e}");
                println!();
                Ok(exit_code::CONFIG_ERROR)
            }
        }
    }
}

/// Human-readable configuration summary with secrets left out
///
/// Also parses the storage connection string, which plain validation only
/// checks for presence.
pub fn summarize(config: &AppConfig) -> crate::domain::Result<Vec<String>> {
    use secrecy::ExposeSecret;

    let connection = BlobConnection::parse(config.storage.connection_string.expose_secret().as_ref())?;
    let storage_auth = match &connection.credential {
        BlobCredential::SharedKey { account, .. } => format!("shared key (account {account})"),
        BlobCredential::SharedAccessSignature(_) => "shared access signature".to_string(),
    };

    Ok(vec![
        format!("Log Level: {}", config.application.log_level),
        format!("Cosmos DB Endpoint: {}", config.cosmosdb.endpoint),
        format!("Cosmos DB Database: {}", config.cosmosdb.database_name),
        format!("Cosmos DB Container: {}", config.cosmosdb.container_name),
        format!("Partition Key: {}", config.cosmosdb.partition_key),
        format!("Page Size: {}", config.cosmosdb.page_size),
        format!("Blob Endpoint: {}", connection.endpoint),
        format!("Blob Auth: {storage_auth}"),
        format!("Blob Container: {}", config.storage.container_name),
        format!("Dry Run: {}", config.export.dry_run),
        format!("Upload Empty: {}", config.export.upload_empty),
        format!(
            "File Logging: {}",
            if config.logging.local_enabled {
                format!("{} ({})", config.logging.local_path, config.logging.local_rotation)
            } else {
                "disabled".to_string()
            }
        ),
    ])
}
