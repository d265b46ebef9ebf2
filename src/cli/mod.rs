//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for plate-export using clap.

pub mod commands;

use crate::domain::{BlobStorageError, CosmosDbError, PlateExportError};
use clap::{Parser, Subcommand};

/// Process exit codes
pub mod exit_code {
    /// Success, nothing to export, or dry run
    pub const SUCCESS: i32 = 0;
    /// The upload failed; records are left for the next cycle
    pub const UPLOAD_FAILED: i32 = 1;
    /// Configuration could not be loaded or is invalid
    pub const CONFIG_ERROR: i32 = 2;
    /// A backend client could not be created or reached
    pub const CONNECTION_ERROR: i32 = 4;
    /// Any other failure
    pub const FATAL: i32 = 5;
}

/// Exit code for an error that ended a command
pub fn exit_code_for(error: &PlateExportError) -> i32 {
    match error {
        PlateExportError::Configuration(_)
        | PlateExportError::BlobStorage(BlobStorageError::InvalidConnectionString(_)) => {
            exit_code::CONFIG_ERROR
        }
        PlateExportError::CosmosDb(CosmosDbError::ConnectionFailed(_))
        | PlateExportError::CosmosDb(CosmosDbError::ContainerNotFound(_)) => {
            exit_code::CONNECTION_ERROR
        }
        _ => exit_code::FATAL,
    }
}

/// plate-export - License plate record export to Azure Blob Storage
#[derive(Parser, Debug)]
#[command(name = "plate-export")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(
        short,
        long,
        default_value = "plate-export.toml",
        env = "PLATE_EXPORT_CONFIG"
    )]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "PLATE_EXPORT_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run one export cycle: read unexported records, upload CSV, mark them
    Export(commands::export::ExportArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Show how many records are waiting for export
    Status(commands::status::StatusArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}
