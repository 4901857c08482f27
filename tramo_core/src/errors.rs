//! # Error Types
//!
//! Structured error types for tramo_core. The calculation engine itself never
//! fails (invalid dimensions produce an empty result instead), so these errors
//! come from id parsing, quote pricing and quote persistence.
//!
//! ## Example
//!
//! ```rust
//! use tramo_core::errors::{CalcError, CalcResult};
//!
//! fn validate_quantity(quantity: u32) -> CalcResult<()> {
//!     if quantity == 0 {
//!         return Err(CalcError::InvalidInput {
//!             field: "quantity".to_string(),
//!             value: quantity.to_string(),
//!             reason: "Quantity must be at least 1".to_string(),
//!         });
//!     }
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for tramo_core operations
pub type CalcResult<T> = Result<T, CalcError>;

/// Structured error type for catalog, pricing and storage operations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum CalcError {
    /// An input value is invalid (out of range, wrong type, etc.)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// Work-type id is not part of the catalog
    #[error("Unknown work type: {id}")]
    UnknownWorkType { id: String },

    /// Material id not found in the catalog
    #[error("Material not found: {material_id}")]
    MaterialNotFound { material_id: String },

    /// No BOM line carries the given key
    #[error("No material line with key '{key}'")]
    LineNotFound { key: String },

    /// No extra item with the given id
    #[error("Extra item not found: {id}")]
    ExtraItemNotFound { id: String },

    /// Quote id not present in the store
    #[error("Quote not found: {id}")]
    QuoteNotFound { id: String },

    /// File I/O error
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// File is locked by another user/process
    #[error("File locked: '{path}' is locked by {locked_by} since {locked_at}")]
    FileLocked {
        path: String,
        locked_by: String,
        locked_at: String,
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

    /// Create an UnknownWorkType error
    pub fn unknown_work_type(id: impl Into<String>) -> Self {
        CalcError::UnknownWorkType { id: id.into() }
    }

    /// Create a MaterialNotFound error
    pub fn material_not_found(material_id: impl Into<String>) -> Self {
        CalcError::MaterialNotFound {
            material_id: material_id.into(),
        }
    }

    /// Create a LineNotFound error
    pub fn line_not_found(key: impl Into<String>) -> Self {
        CalcError::LineNotFound { key: key.into() }
    }

    /// Create a FileError
    pub fn file_error(operation: impl Into<String>, path: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a FileLocked error
    pub fn file_locked(path: impl Into<String>, locked_by: impl Into<String>, locked_at: impl Into<String>) -> Self {
        CalcError::FileLocked {
            path: path.into(),
            locked_by: locked_by.into(),
            locked_at: locked_at.into(),
        }
    }

    /// Wrap a serde_json failure
    pub fn serialization(err: impl std::fmt::Display) -> Self {
        CalcError::SerializationError {
            reason: err.to_string(),
        }
    }

    /// Check if this is a recoverable error (e.g., can retry)
    pub fn is_recoverable(&self) -> bool {
        matches!(self, CalcError::FileLocked { .. })
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            CalcError::InvalidInput { .. } => "INVALID_INPUT",
            CalcError::UnknownWorkType { .. } => "UNKNOWN_WORK_TYPE",
            CalcError::MaterialNotFound { .. } => "MATERIAL_NOT_FOUND",
            CalcError::LineNotFound { .. } => "LINE_NOT_FOUND",
            CalcError::ExtraItemNotFound { .. } => "EXTRA_ITEM_NOT_FOUND",
            CalcError::QuoteNotFound { .. } => "QUOTE_NOT_FOUND",
            CalcError::FileError { .. } => "FILE_ERROR",
            CalcError::FileLocked { .. } => "FILE_LOCKED",
            CalcError::SerializationError { .. } => "SERIALIZATION_ERROR",
            CalcError::VersionMismatch { .. } => "VERSION_MISMATCH",
        }
    }
}
