//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::AppConfig;
use super::secret::secret_string;
use crate::domain::errors::PlateExportError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

/// Prefix of environment variables that override configuration values
pub const ENV_PREFIX: &str = "PLATE_EXPORT";

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into AppConfig
/// 4. Applies environment variable overrides (PLATE_EXPORT_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns an error if:
/// - File cannot be read
/// - TOML parsing fails
/// - A referenced environment variable is not set
/// - Configuration validation fails
///
/// # Examples
///
/// ```no_run
/// use plate_export::config::loader::load_config;
///
/// let config = load_config("plate-export.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<AppConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(PlateExportError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        PlateExportError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    parse_config(&contents)
}

/// Parses configuration from TOML text, applying the same substitution,
/// overrides and validation as [`load_config`]
pub fn parse_config(contents: &str) -> Result<AppConfig> {
    let contents = substitute_env_vars(contents)?;

    let mut config: AppConfig = toml::from_str(&contents)
        .map_err(|e| PlateExportError::Configuration(format!("Failed to parse TOML: {e}")))?;

    apply_env_overrides(&mut config)?;

    config.validate().map_err(|e| {
        PlateExportError::Configuration(format!("Configuration validation failed: {e}"))
    })?;

    Ok(config)
}

fn placeholder_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").expect("placeholder pattern is valid")
    })
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are left alone. All missing variables are reported together.
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = placeholder_regex();
    let mut result = String::with_capacity(input.len());
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let processed = re.replace_all(line, |cap: &regex::Captures<'_>| {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => value,
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                    String::new()
                }
            }
        });
        result.push_str(&processed);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(PlateExportError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

fn env_var(section: &str, key: &str) -> Option<String> {
    std::env::var(format!("{ENV_PREFIX}_{section}_{key}")).ok()
}

fn parse_env<T: std::str::FromStr>(section: &str, key: &str) -> Result<Option<T>> {
    match env_var(section, key) {
        Some(raw) => raw.trim().parse().map(Some).map_err(|_| {
            PlateExportError::Configuration(format!(
                "Invalid value '{raw}' for {ENV_PREFIX}_{section}_{key}"
            ))
        }),
        None => Ok(None),
    }
}

/// Applies environment variable overrides using the PLATE_EXPORT_* prefix
///
/// Environment variables follow the pattern: PLATE_EXPORT_<SECTION>_<KEY>,
/// for example PLATE_EXPORT_COSMOSDB_KEY or PLATE_EXPORT_EXPORT_DRY_RUN.
fn apply_env_overrides(config: &mut AppConfig) -> Result<()> {
    // Application overrides
    if let Some(val) = env_var("APPLICATION", "LOG_LEVEL") {
        config.application.log_level = val;
    }

    // Cosmos DB overrides
    if let Some(val) = env_var("COSMOSDB", "ENDPOINT") {
        config.cosmosdb.endpoint = val;
    }
    if let Some(val) = env_var("COSMOSDB", "KEY") {
        config.cosmosdb.key = secret_string(val);
    }
    if let Some(val) = env_var("COSMOSDB", "DATABASE_NAME") {
        config.cosmosdb.database_name = val;
    }
    if let Some(val) = env_var("COSMOSDB", "CONTAINER_NAME") {
        config.cosmosdb.container_name = val;
    }
    if let Some(val) = env_var("COSMOSDB", "PARTITION_KEY") {
        config.cosmosdb.partition_key = val.parse().map_err(PlateExportError::Configuration)?;
    }
    if let Some(size) = parse_env("COSMOSDB", "PAGE_SIZE")? {
        config.cosmosdb.page_size = size;
    }

    // Storage overrides
    if let Some(val) = env_var("STORAGE", "CONNECTION_STRING") {
        config.storage.connection_string = secret_string(val);
    }
    if let Some(val) = env_var("STORAGE", "CONTAINER_NAME") {
        config.storage.container_name = val;
    }
    if let Some(timeout) = parse_env("STORAGE", "REQUEST_TIMEOUT_SECONDS")? {
        config.storage.request_timeout_seconds = timeout;
    }

    // Export overrides
    if let Some(dry_run) = parse_env("EXPORT", "DRY_RUN")? {
        config.export.dry_run = dry_run;
    }
    if let Some(upload_empty) = parse_env("EXPORT", "UPLOAD_EMPTY")? {
        config.export.upload_empty = upload_empty;
    }

    // Logging overrides
    if let Some(enabled) = parse_env("LOGGING", "LOCAL_ENABLED")? {
        config.logging.local_enabled = enabled;
    }
    if let Some(val) = env_var("LOGGING", "LOCAL_PATH") {
        config.logging.local_path = val;
    }
    if let Some(val) = env_var("LOGGING", "LOCAL_ROTATION") {
        config.logging.local_rotation = val;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_substitute_env_vars() {
        std::env::set_var("PLATE_LOADER_TEST_VAR", "test_value");
        let input = "key = \"${PLATE_LOADER_TEST_VAR}\"";
        let result = substitute_env_vars(input).unwrap();
        assert_eq!(result, "key = \"test_value\"\n");
        std::env::remove_var("PLATE_LOADER_TEST_VAR");
    }

    #[test]
    fn test_substitute_env_vars_missing() {
        std::env::remove_var("PLATE_LOADER_MISSING_A");
        std::env::remove_var("PLATE_LOADER_MISSING_B");
        let input = "a = \"${PLATE_LOADER_MISSING_A}\"\nb = \"${PLATE_LOADER_MISSING_B}\"";
        let err = substitute_env_vars(input).unwrap_err().to_string();
        assert!(err.contains("PLATE_LOADER_MISSING_A"));
        assert!(err.contains("PLATE_LOADER_MISSING_B"));
    }

    #[test]
    fn test_substitute_env_vars_skips_comments() {
        std::env::remove_var("PLATE_LOADER_IN_COMMENT");
        let input = "# key = \"${PLATE_LOADER_IN_COMMENT}\"";
        let result = substitute_env_vars(input).unwrap();
        assert_eq!(result, "# key = \"${PLATE_LOADER_IN_COMMENT}\"\n");
    }

    #[test]
    fn test_load_config_missing_file() {
        let result = load_config("nonexistent.toml");
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_valid() {
        let toml_content = r#"
[application]
log_level = "debug"

[cosmosdb]
endpoint = "https://plates.documents.azure.com:443/"
key = "test-key"
database_name = "LicensePlates"
container_name = "Processed"

[storage]
connection_string = "UseDevelopmentStorage=true"
container_name = "export"
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();
        temp_file.flush().unwrap();

        let config = load_config(temp_file.path()).unwrap();
        assert_eq!(config.application.log_level, "debug");
        assert_eq!(config.cosmosdb.database_name, "LicensePlates");
        assert_eq!(config.storage.container_name, "export");
    }
}
