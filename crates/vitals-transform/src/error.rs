//! Error types for submission validation and feature assembly.

use thiserror::Error;

/// A required user-supplied value was missing or not a number.
///
/// Raised before any export or persistence side effect takes place.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Field was empty or whitespace.
    #[error("{field} is required")]
    Missing { field: &'static str },

    /// Field was present but did not parse as a number.
    #[error("{field} must be a valid number, got '{value}'")]
    NotNumeric { field: &'static str, value: String },
}

/// A snapshot could not be turned into a classifier feature vector.
///
/// The classifier must not be called when this is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FeatureError {
    /// A non-empty numeric input did not parse.
    #[error("preprocessing failed: {field} is not numeric ('{value}')")]
    NotNumeric { field: &'static str, value: String },

    /// A numeric input parsed to NaN or infinity.
    #[error("preprocessing failed: {field} is not a finite number")]
    NotFinite { field: &'static str },
}

/// Result type for validation.
pub type Result<T> = std::result::Result<T, ValidationError>;
