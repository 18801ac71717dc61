//! Error types for noticeq
//!
//! Centralized error handling using thiserror.

use thiserror::Error;

/// All error types that can occur in noticeq
#[derive(Debug, Error)]
pub enum QueueError {
    /// The reserved empty kind was passed where a real notice kind is required
    #[error("Invalid kind: {0}")]
    InvalidKind(String),

    /// A queue operation was invoked off the owning thread
    #[error("Wrong thread: {operation} must be called on the thread that owns the queue")]
    WrongThread { operation: &'static str },

    /// The engine reached a state no sequence of public calls should produce
    #[error("Internal invariant violated: {0}")]
    Invariant(String),

    /// The driver loop is no longer running
    #[error("Driver closed")]
    DriverClosed,

    /// A scenario referenced a notice kind it never defined
    #[error("Unknown notice kind: {0}")]
    UnknownKind(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML deserialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Result type alias for noticeq operations
pub type Result<T> = std::result::Result<T, QueueError>;
