//! # Error Types
//!
//! Structured error types for precast_core. A rejected calculation carries the
//! offending field and the raw value so a form can point the user at the
//! input that needs fixing.
//!
//! ## Example
//!
//! ```rust
//! use precast_core::errors::{CalcError, CalcResult};
//!
//! fn validate_quantity(qty: u32) -> CalcResult<()> {
//!     if qty == 0 {
//!         return Err(CalcError::invalid_input(
//!             "quantity",
//!             qty.to_string(),
//!             "Quantity must be at least 1",
//!         ));
//!     }
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for precast_core operations
pub type CalcResult<T> = Result<T, CalcError>;

/// Structured error type for calculation and workbook operations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum CalcError {
    /// An input value is invalid (non-numeric, negative, out of range)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// A required field is missing or blank
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    /// A form or saved calculation id does not exist in the workbook
    #[error("{kind} not found: {id}")]
    RecordNotFound { kind: String, id: String },

    /// File I/O error
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// Schema version mismatch
    #[error("Version mismatch: file version {file_version}, expected {expected_version}")]
    VersionMismatch {
        file_version: String,
        expected_version: String,
    },
}

impl CalcError {
    /// Create an InvalidInput error
    pub fn invalid_input(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a MissingField error
    pub fn missing_field(field: impl Into<String>) -> Self {
        CalcError::MissingField {
            field: field.into(),
        }
    }

    /// Create a RecordNotFound error
    pub fn record_not_found(kind: impl Into<String>, id: impl ToString) -> Self {
        CalcError::RecordNotFound {
            kind: kind.into(),
            id: id.to_string(),
        }
    }

    /// Create a FileError
    pub fn file_error(operation: impl Into<String>, path: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// True for errors caused by user-entered values.
    ///
    /// A calculator form recovers from these silently by leaving the result unset.
    pub fn is_input_error(&self) -> bool {
        matches!(self, CalcError::InvalidInput { .. } | CalcError::MissingField { .. })
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            CalcError::InvalidInput { .. } => "INVALID_INPUT",
            CalcError::MissingField { .. } => "MISSING_FIELD",
            CalcError::RecordNotFound { .. } => "RECORD_NOT_FOUND",
            CalcError::FileError { .. } => "FILE_ERROR",
            CalcError::SerializationError { .. } => "SERIALIZATION_ERROR",
            CalcError::VersionMismatch { .. } => "VERSION_MISMATCH",
        }
    }
}

impl From<serde_json::Error> for CalcError {
    fn from(e: serde_json::Error) -> Self {
        CalcError::SerializationError {
            reason: e.to_string(),
        }
    }
}
