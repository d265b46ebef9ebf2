//! Integration tests for logging functionality
//!
//! The global subscriber can only be installed once per process, so every
//! check that needs it lives in a single test.

use plate_export::config::LoggingConfig;
use plate_export::core::export::CycleState;
use plate_export::log_phase;
use plate_export::logging::init_logging;
use tempfile::TempDir;

#[test]
fn test_logging_config_default() {
    let config = LoggingConfig::default();
    assert!(!config.local_enabled);
    assert_eq!(config.local_path, "/var/log/plate-export");
    assert_eq!(config.local_rotation, "daily");
}

#[test]
fn test_invalid_log_level_rejected() {
    let config = LoggingConfig::default();

    let result = init_logging("verbose", &config);
    assert!(result.is_err());
    if let Err(e) = result {
        assert!(e.to_string().contains("Invalid log level"));
    }
}

#[test]
fn test_file_logging_initialization() {
    let temp_dir = TempDir::new().unwrap();
    let log_path = temp_dir.path().join("logs");

    let config = LoggingConfig {
        local_enabled: true,
        local_path: log_path.to_string_lossy().to_string(),
        local_rotation: "never".to_string(),
    };

    assert!(!log_path.exists());

    let guard = init_logging("debug", &config).expect("first initialization succeeds");
    assert!(guard.has_file_output());
    assert!(log_path.is_dir());

    log_phase!(CycleState::Reading);
    log_phase!(CycleState::Exporting, 3);

    // A second subscriber cannot be installed
    let second = init_logging("info", &LoggingConfig::default());
    assert!(second.is_err());

    drop(guard);
    let files: Vec<_> = std::fs::read_dir(&log_path).unwrap().collect();
    assert!(!files.is_empty());
}
