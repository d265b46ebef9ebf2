//! Export command implementation
//!
//! This module implements the `export` command, which runs one export cycle
//! against the configured Cosmos DB container and blob container.

use crate::adapters::AzureConnector;
use crate::cli::{exit_code, exit_code_for};
use crate::config::load_config;
use crate::core::export::{CycleOutcome, CycleSummary, ExportPipeline, PipelineOptions};
use clap::Args;
use std::sync::Arc;

/// Arguments for the export command
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Dry run mode - read and serialize, but skip upload and marking
    #[arg(long)]
    pub dry_run: bool,
}

impl ExportArgs {
    /// Execute the export command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!("Starting export command");

        let mut config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load configuration");
                eprintln!("Failed to load configuration: {e}");
                return Ok(exit_code::CONFIG_ERROR);
            }
        };

        if self.dry_run {
            tracing::info!("Enabling dry-run mode from CLI");
            config.export.dry_run = true;
        }

        if config.export.dry_run {
            println!("🔍 DRY RUN MODE - nothing will be uploaded or marked");
            println!();
        }

        let options = PipelineOptions::from_config(&config);
        let connector = AzureConnector::new(config.cosmosdb, config.storage);
        let pipeline = ExportPipeline::new(Arc::new(connector), options);

        let summary = match pipeline.run_cycle().await {
            Ok(s) => s,
            Err(e) => {
                crate::log_error_with_context!(&e, "Export cycle failed");
                eprintln!("Export failed: {e}");
                return Ok(exit_code_for(&e));
            }
        };

        print_summary(&summary);
        Ok(summary_exit_code(&summary))
    }
}

fn summary_exit_code(summary: &CycleSummary) -> i32 {
    if summary.is_successful() {
        exit_code::SUCCESS
    } else {
        exit_code::UPLOAD_FAILED
    }
}

fn print_summary(summary: &CycleSummary) {
    println!("📊 Export Summary:");
    println!("  Outcome: {}", summary.outcome);
    println!("  Records read: {}", summary.records_read);
    if let Some(blob) = &summary.blob_name {
        println!("  Blob: {blob}");
        println!("  Rows: {}", summary.rows_written);
        println!("  Bytes: {}", summary.bytes_written);
    }
    println!("  Records marked: {}", summary.records_marked);
    println!("  Duration: {:.2}s", summary.duration.as_secs_f64());
    println!();

    match summary.outcome {
        CycleOutcome::Exported => println!("✅ Export completed successfully!"),
        CycleOutcome::NothingToExport => println!("✅ Nothing to export"),
        CycleOutcome::DryRun => println!("✅ Dry run completed"),
        CycleOutcome::UploadFailed => {
            println!(
                "⚠️  Upload failed: {}",
                summary.failure.as_deref().unwrap_or("unknown error")
            );
            println!("   Records were left unexported and will be retried next cycle.");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_args_defaults() {
        let args = ExportArgs { dry_run: false };
        assert!(!args.dry_run);
    }

    #[test]
    fn test_summary_exit_code() {
        let mut summary = CycleSummary::new(false);
        summary.outcome = CycleOutcome::Exported;
        assert_eq!(summary_exit_code(&summary), exit_code::SUCCESS);

        summary.outcome = CycleOutcome::UploadFailed;
        assert_eq!(summary_exit_code(&summary), exit_code::UPLOAD_FAILED);
    }

    #[tokio::test]
    async fn test_missing_config_is_config_error() {
        let args = ExportArgs { dry_run: true };
        let code = args
            .execute("/nonexistent/plate-export.toml")
            .await
            .unwrap();
        assert_eq!(code, exit_code::CONFIG_ERROR);
    }
}
