//! Error types for QuantaStore
//!
//! Provides a unified error type for all operations.

use thiserror::Error;

/// Result type alias using StoreError
pub type Result<T> = std::result::Result<T, StoreError>;

/// Unified error type for QuantaStore operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    // -------------------------------------------------------------------------
    // Storage Errors
    // -------------------------------------------------------------------------
    #[error("Out of memory while allocating device storage")]
    OutOfMemory,

    // -------------------------------------------------------------------------
    // Concurrency Errors
    // -------------------------------------------------------------------------
    #[error("Interrupted while waiting for device access")]
    Interrupted,

    // -------------------------------------------------------------------------
    // Argument Errors
    // -------------------------------------------------------------------------
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    // -------------------------------------------------------------------------
    // Handle Errors
    // -------------------------------------------------------------------------
    #[error("Device {index} not found ({count} devices registered)")]
    DeviceNotFound { index: usize, count: usize },

    #[error("Access denied: {0}")]
    AccessDenied(&'static str),

    // -------------------------------------------------------------------------
    // Console Errors
    // -------------------------------------------------------------------------
    #[error("Command error: {0}")]
    Command(String),
}

impl From<std::collections::TryReserveError> for StoreError {
    fn from(_: std::collections::TryReserveError) -> Self {
        StoreError::OutOfMemory
    }
}
