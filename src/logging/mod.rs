//! Logging and observability
//!
//! This module provides structured logging with support for:
//! - Configurable log levels, overridable through `RUST_LOG`
//! - Console output
//! - JSON-formatted local file logging with rotation
//!
//! # Example
//!
//! ```no_run
//! use plate_export::logging::init_logging;
//! use plate_export::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!("Application started");
//! ```

pub mod structured;

// Re-export commonly used items
pub use structured::{init_logging, LoggingGuard};

/// Log the transition of an export cycle into a new phase
///
/// # Example
///
/// ```no_run
/// use plate_export::log_phase;
/// use plate_export::core::export::CycleState;
///
/// log_phase!(CycleState::Reading);
/// ```
#[macro_export]
macro_rules! log_phase {
    ($state:expr) => {
        tracing::debug!(phase = %$state, "Entering export phase");
    };
    ($state:expr, $count:expr) => {
        tracing::debug!(phase = %$state, records = $count, "Entering export phase");
    };
}

/// Log the completion of an export cycle
///
/// # Example
///
/// ```no_run
/// use plate_export::log_cycle_complete;
/// use std::time::Duration;
///
/// let read = 42;
/// let marked = 42;
/// let duration = Duration::from_secs(3);
/// log_cycle_complete!(read, marked, duration);
/// ```
#[macro_export]
macro_rules! log_cycle_complete {
    ($read:expr, $marked:expr, $duration:expr) => {
        tracing::info!(
            records_read = $read,
            records_marked = $marked,
            duration_ms = $duration.as_millis() as u64,
            "Export cycle completed"
        );
    };
}

/// Log an error with context
///
/// # Example
///
/// ```no_run
/// use plate_export::log_error_with_context;
/// use plate_export::domain::PlateExportError;
///
/// let error = PlateExportError::Configuration("Invalid config".to_string());
/// log_error_with_context!(&error, "Failed to load configuration");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            context = $context,
            "Error occurred"
        );
    };
}
