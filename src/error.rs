//! Error types for platter
//!
//! Provides a unified error type for all store operations.

use thiserror::Error;

/// Result type alias using StoreError
pub type Result<T> = std::result::Result<T, StoreError>;

/// Unified error type for platter operations
#[derive(Debug, Error)]
pub enum StoreError {
    // -------------------------------------------------------------------------
    // Key Errors
    // -------------------------------------------------------------------------
    #[error("empty key")]
    EmptyKey,

    #[error("key not found")]
    NotFound,

    /// The resolved path is a directory, not a file. This means the key
    /// collides with another key's transform path.
    #[error("bad key: path resolves to a directory")]
    BadKey,

    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Cache Errors
    // -------------------------------------------------------------------------
    /// The value cannot ever fit in the configured cache. Reads and writes
    /// of such values still succeed; only caching is skipped.
    #[error("value size ({size} bytes) too large for cache ({max} bytes)")]
    ValueTooLarge { size: u64, max: u64 },

    // -------------------------------------------------------------------------
    // Corruption Errors
    // -------------------------------------------------------------------------
    /// The on-disk layout no longer matches what the transform produces
    /// (e.g. an expected directory is missing mid-prune). Continuing could
    /// silently lose data, so this aborts the operation.
    #[error("corrupt store state: {0}")]
    Corrupt(String),
}

impl StoreError {
    /// Whether this error means the key has no file on disk
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound)
    }
}

/// Error-kind classifier for callers holding an opaque error
pub fn is_not_found(err: &StoreError) -> bool {
    err.is_not_found()
}
