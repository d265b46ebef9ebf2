//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file.

use crate::cli::exit_code;
use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "plate-export.toml")]
    pub output: String,

    /// Include comments explaining every option
    #[arg(long)]
    pub with_examples: bool,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing plate-export configuration");
        println!();

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(exit_code::CONFIG_ERROR);
        }

        let config_content = if self.with_examples {
            Self::generate_config_with_examples()
        } else {
            Self::generate_minimal_config()
        };

        match fs::write(&self.output, config_content) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Edit {} with your account and container names", self.output);
                println!("  2. Create a .env file with your credentials:");
                println!("     - COSMOSDB_KEY");
                println!("     - BLOB_STORAGE_CONNECTION");
                println!("  3. Validate configuration: plate-export validate-config");
                println!("  4. Run export: plate-export export");
                println!();
                Ok(exit_code::SUCCESS)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {e}");
                Ok(exit_code::FATAL)
            }
        }
    }

    /// Generate minimal configuration
    fn generate_minimal_config() -> String {
        r#"# plate-export configuration

[application]
log_level = "info"

[cosmosdb]
endpoint = "https://your-account.documents.azure.com:443/"
key = "${COSMOSDB_KEY}"
database_name = "LicensePlates"
container_name = "Processed"
partition_key = "id"
page_size = 100

[storage]
connection_string = "${BLOB_STORAGE_CONNECTION}"
container_name = "export"
request_timeout_seconds = 60

[export]
dry_run = false
upload_empty = false

[logging]
local_enabled = false
local_path = "/var/log/plate-export"
local_rotation = "daily"
"#
        .to_string()
    }

    /// Generate configuration with examples and comments
    fn generate_config_with_examples() -> String {
        r#"# plate-export configuration
#
# Values of the form ${NAME} are read from the environment (or a .env file).
# Any option can also be overridden with PLATE_EXPORT_<SECTION>_<KEY>,
# e.g. PLATE_EXPORT_COSMOSDB_PAGE_SIZE=500.

# ============================================================================
# Application Settings
# ============================================================================
[application]
# Log level (trace, debug, info, warn, error); RUST_LOG takes precedence
log_level = "info"

# ============================================================================
# Record Store (Azure Cosmos DB)
# ============================================================================
[cosmosdb]
# Account endpoint
endpoint = "https://your-account.documents.azure.com:443/"

# Account key (use environment variable)
key = "${COSMOSDB_KEY}"

# Database and container holding the license plate records
database_name = "LicensePlates"
container_name = "Processed"

# Partition key property of the container: id | FileName | LicensePlateText
partition_key = "id"

# Progress log interval while reading, in records (1-1000).
# Cosmos DB pages the query itself.
page_size = 100

# ============================================================================
# Export Target (Azure Blob Storage)
# ============================================================================
[storage]
# Storage account connection string. Supported forms:
#   DefaultEndpointsProtocol=https;AccountName=...;AccountKey=...;EndpointSuffix=core.windows.net
#   BlobEndpoint=https://account.blob.core.windows.net;SharedAccessSignature=sv=...
#   UseDevelopmentStorage=true
connection_string = "${BLOB_STORAGE_CONNECTION}"

# Container receiving the CSV files; created on first export
container_name = "export"

# Per-request timeout in seconds
request_timeout_seconds = 60

# ============================================================================
# Export Behaviour
# ============================================================================
[export]
# Read and serialize only; nothing is uploaded or marked
dry_run = false

# Upload a header-only CSV when no records are pending
upload_empty = false

# ============================================================================
# Logging
# ============================================================================
[logging]
# JSON log files in addition to console output
local_enabled = false
local_path = "/var/log/plate-export"

# Rotation: daily | hourly | never
local_rotation = "daily"
"#
        .to_string()
    }
}
