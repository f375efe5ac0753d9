//! Error types for PBCore operations
//!
//! This module defines all error types used throughout the toolkit.

use thiserror::Error;

/// Error types for PBCore operations
#[derive(Debug, Error)]
pub enum PbcoreError {
    /// Symbolic field name is not present in the mapping table
    #[error("Unknown field: {0}")]
    UnknownField(String),

    /// Read against a singleton path that does not exist in the document
    #[error("Node not found: {0}")]
    NodeNotFound(String),

    /// Index beyond the current number of matching nodes
    #[error("Index {index} out of range for '{field}' ({count} present)")]
    IndexOutOfRange {
        /// Field or group name that was addressed
        field: String,
        /// Requested position
        index: usize,
        /// Number of nodes present at the time of the lookup
        count: usize,
    },

    /// Template built with parameters that do not fit the group's shape
    #[error("Template parameter error: {0}")]
    TemplateParameter(String),

    /// Write against a field that addresses a whole group
    #[error("Field is read-only: {0}")]
    ReadOnlyField(String),

    /// Malformed declarative node path
    #[error("Bad path: {0}")]
    BadPath(String),

    /// Parse error (XML or configuration parsing failed)
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Invalid configuration (settings or custom mapping table)
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Internal error (should not occur in normal operation)
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Result type alias for PBCore operations
pub type PbcoreResult<T> = Result<T, PbcoreError>;
