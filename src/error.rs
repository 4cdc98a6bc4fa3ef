//! Error types for SortedKV
//!
//! Provides a unified error type for all operations.

use std::collections::TryReserveError;

use thiserror::Error;

/// Result type alias using KvError
pub type Result<T> = std::result::Result<T, KvError>;

/// Unified error type for SortedKV operations
#[derive(Debug, Error)]
pub enum KvError {
    // -------------------------------------------------------------------------
    // Table Errors
    // -------------------------------------------------------------------------
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Allocation failed: {0}")]
    AllocationFailure(String),

    #[error("Key not found")]
    KeyNotFound,

    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Network Errors
    // -------------------------------------------------------------------------
    #[error("Network error: {0}")]
    Network(String),

    #[error("Protocol error: {0}")]
    Protocol(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl KvError {
    /// Wrap a failed fallible reservation with what was being allocated
    pub(crate) fn alloc(what: &str, err: TryReserveError) -> Self {
        KvError::AllocationFailure(format!("{}: {}", what, err))
    }
}
