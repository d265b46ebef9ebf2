//! Configuration schema types
//!
//! This module defines the configuration structure for plate-export.

use crate::config::SecretString;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Main plate-export configuration
///
/// This is the root configuration structure that maps to the TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Record store (Azure Cosmos DB) configuration
    pub cosmosdb: CosmosDbConfig,

    /// Blob storage configuration
    pub storage: StorageConfig,

    /// Export settings
    #[serde(default)]
    pub export: ExportConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.cosmosdb.validate()?;
        self.storage.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// Document property holding the container's partition key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum PartitionKeyField {
    /// Partitioned by document id
    #[default]
    #[serde(rename = "id")]
    Id,
    /// Partitioned by source file name
    #[serde(rename = "FileName")]
    FileName,
    /// Partitioned by recognized plate text
    #[serde(rename = "LicensePlateText")]
    LicensePlateText,
}

impl fmt::Display for PartitionKeyField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PartitionKeyField::Id => "id",
            PartitionKeyField::FileName => "FileName",
            PartitionKeyField::LicensePlateText => "LicensePlateText",
        };
        write!(f, "/{name}")
    }
}

impl std::str::FromStr for PartitionKeyField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim_start_matches('/') {
            "id" => Ok(PartitionKeyField::Id),
            "FileName" => Ok(PartitionKeyField::FileName),
            "LicensePlateText" => Ok(PartitionKeyField::LicensePlateText),
            other => Err(format!(
                "Invalid partition_key '{other}'. Must be one of: id, FileName, LicensePlateText"
            )),
        }
    }
}

/// Azure Cosmos DB configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CosmosDbConfig {
    /// Cosmos DB endpoint URL
    pub endpoint: String,

    /// Cosmos DB access key
    /// Stored securely in memory and automatically zeroized on drop
    pub key: SecretString,

    /// Database name
    pub database_name: String,

    /// Container holding the license plate records
    pub container_name: String,

    /// Partition key property of the container
    #[serde(default)]
    pub partition_key: PartitionKeyField,

    /// Progress log interval when reading, in records
    ///
    /// The Cosmos DB SDK pages queries itself and takes no page size, so this
    /// does not change what is fetched per round trip.
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

impl CosmosDbConfig {
    fn validate(&self) -> Result<(), String> {
        use secrecy::ExposeSecret;

        if self.endpoint.is_empty() {
            return Err("cosmosdb.endpoint cannot be empty".to_string());
        }

        if !self.endpoint.starts_with("https://") {
            return Err("cosmosdb.endpoint must start with https://".to_string());
        }

        if self.key.expose_secret().is_empty() {
            return Err("cosmosdb.key cannot be empty".to_string());
        }

        if self.database_name.is_empty() {
            return Err("cosmosdb.database_name cannot be empty".to_string());
        }

        if self.container_name.is_empty() {
            return Err("cosmosdb.container_name cannot be empty".to_string());
        }

        if self.page_size == 0 || self.page_size > 1000 {
            return Err(format!(
                "cosmosdb.page_size must be between 1 and 1000, got {}",
                self.page_size
            ));
        }

        Ok(())
    }
}

/// Blob storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Storage account connection string
    /// Stored securely in memory and automatically zeroized on drop
    pub connection_string: SecretString,

    /// Container receiving the CSV exports
    pub container_name: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_request_timeout_seconds")]
    pub request_timeout_seconds: u64,
}

impl StorageConfig {
    fn validate(&self) -> Result<(), String> {
        use secrecy::ExposeSecret;

        if self.connection_string.expose_secret().is_empty() {
            return Err("storage.connection_string cannot be empty".to_string());
        }

        validate_container_name(&self.container_name)?;

        if self.request_timeout_seconds == 0 {
            return Err("storage.request_timeout_seconds must be > 0".to_string());
        }

        Ok(())
    }
}

/// Blob container names: 3-63 chars of lowercase letters, digits and single
/// dashes, starting and ending with a letter or digit.
fn validate_container_name(name: &str) -> Result<(), String> {
    let valid_chars = name
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
    let valid_edges = !name.starts_with('-') && !name.ends_with('-');

    if !(3..=63).contains(&name.len()) || !valid_chars || !valid_edges || name.contains("--") {
        return Err(format!(
            "storage.container_name '{name}' is not a valid blob container name \
             (3-63 lowercase letters, digits or single dashes)"
        ));
    }
    Ok(())
}

/// Export configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ExportConfig {
    /// Dry run mode - read and serialize, but skip upload and marking
    #[serde(default)]
    pub dry_run: bool,

    /// Upload a header-only CSV when there is nothing to export
    #[serde(default)]
    pub upload_empty: bool,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable local JSON file logging
    #[serde(default)]
    pub local_enabled: bool,

    /// Local log directory
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Log rotation strategy
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }

        if self.local_enabled && self.local_path.is_empty() {
            return Err("logging.local_path cannot be empty when local_enabled".to_string());
        }

        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_page_size() -> usize {
    100
}

fn default_request_timeout_seconds() -> u64 {
    60
}

fn default_local_path() -> String {
    "/var/log/plate-export".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::secret_string;
    use test_case::test_case;

    fn cosmos_config() -> CosmosDbConfig {
        CosmosDbConfig {
            endpoint: "https://plates.documents.azure.com:443/".to_string(),
            key: secret_string("test-key".to_string()),
            database_name: "LicensePlates".to_string(),
            container_name: "Processed".to_string(),
            partition_key: PartitionKeyField::Id,
            page_size: 100,
        }
    }

    fn storage_config() -> StorageConfig {
        StorageConfig {
            connection_string: secret_string("UseDevelopmentStorage=true".to_string()),
            container_name: "export".to_string(),
            request_timeout_seconds: 60,
        }
    }

    #[test]
    fn test_application_config_validation() {
        let mut config = ApplicationConfig::default();
        assert!(config.validate().is_ok());

        config.log_level = "invalid".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_cosmosdb_config_validation() {
        let mut config = cosmos_config();
        assert!(config.validate().is_ok());

        config.endpoint = "http://plates.documents.azure.com".to_string();
        assert!(config.validate().is_err());

        config = cosmos_config();
        config.key = secret_string(String::new());
        assert!(config.validate().is_err());

        config = cosmos_config();
        config.container_name = String::new();
        assert!(config.validate().is_err());

        config = cosmos_config();
        config.page_size = 0;
        assert!(config.validate().is_err());
        config.page_size = 1001;
        assert!(config.validate().is_err());
    }

    #[test_case("export", true ; "simple")]
    #[test_case("plate-exports-2024", true ; "dashes and digits")]
    #[test_case("ex", false ; "too short")]
    #[test_case("Export", false ; "uppercase")]
    #[test_case("-export", false ; "leading dash")]
    #[test_case("ex--port", false ; "double dash")]
    #[test_case("ex_port", false ; "underscore")]
    fn test_container_name_validation(name: &str, valid: bool) {
        assert_eq!(validate_container_name(name).is_ok(), valid);
    }

    #[test]
    fn test_storage_config_validation() {
        let mut config = storage_config();
        assert!(config.validate().is_ok());

        config.connection_string = secret_string(String::new());
        assert!(config.validate().is_err());

        config = storage_config();
        config.request_timeout_seconds = 0;
        assert!(config.validate().is_err());
    }

    #[test_case("id", PartitionKeyField::Id)]
    #[test_case("/id", PartitionKeyField::Id)]
    #[test_case("/FileName", PartitionKeyField::FileName)]
    #[test_case("LicensePlateText", PartitionKeyField::LicensePlateText)]
    fn test_partition_key_field_parse(raw: &str, expected: PartitionKeyField) {
        assert_eq!(raw.parse::<PartitionKeyField>().unwrap(), expected);
    }

    #[test]
    fn test_partition_key_field_display() {
        assert_eq!(PartitionKeyField::FileName.to_string(), "/FileName");
        assert!("/licensePlateText".parse::<PartitionKeyField>().is_err());
    }

    #[test]
    fn test_logging_config_default() {
        let config = LoggingConfig::default();
        assert!(!config.local_enabled);
        assert_eq!(config.local_path, "/var/log/plate-export");
        assert_eq!(config.local_rotation, "daily");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_logging_config_invalid_rotation() {
        let config = LoggingConfig {
            local_rotation: "size".to_string(),
            ..LoggingConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_export_config_default() {
        let config = ExportConfig::default();
        assert!(!config.dry_run);
        assert!(!config.upload_empty);
    }

    #[test]
    fn test_app_config_from_toml() {
        let config: AppConfig = toml::from_str(
            r#"
[cosmosdb]
endpoint = "https://plates.documents.azure.com:443/"
key = "k"
database_name = "LicensePlates"
container_name = "Processed"
partition_key = "FileName"

[storage]
connection_string = "UseDevelopmentStorage=true"
container_name = "export"
"#,
        )
        .unwrap();

        assert_eq!(config.application.log_level, "info");
        assert_eq!(config.cosmosdb.partition_key, PartitionKeyField::FileName);
        assert_eq!(config.cosmosdb.page_size, 100);
        assert_eq!(config.storage.request_timeout_seconds, 60);
        assert!(!config.export.dry_run);
        assert!(config.validate().is_ok());
    }
}
