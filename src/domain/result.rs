//! Result type alias for plate-export

use super::errors::PlateExportError;

/// Result type alias for plate-export operations
///
/// # Examples
///
/// ```
/// use plate_export::domain::result::Result;
/// use plate_export::domain::errors::PlateExportError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(PlateExportError::Configuration("Invalid input".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, PlateExportError>;
