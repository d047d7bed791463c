//! Result type alias for Clinia
//!
//! This module provides a convenient Result type alias that uses CliniaError
//! as the error type.

use super::errors::CliniaError;

/// Result type alias for Clinia operations
///
/// This is a convenience type alias that uses `CliniaError` as the error type.
/// Use this throughout the codebase for fallible operations.
///
/// # Examples
///
/// ```
/// use clinia::domain::result::Result;
/// use clinia::domain::errors::CliniaError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(CliniaError::Configuration("missing base URL".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, CliniaError>;
