//! Error types for the SMDR collector
//!
//! Provides a unified error type for all operations.

use thiserror::Error;

/// Result type alias using SmdrError
pub type Result<T> = std::result::Result<T, SmdrError>;

/// Unified error type for collector operations
#[derive(Debug, Error)]
pub enum SmdrError {
    // -------------------------------------------------------------------------
    // Transport Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Connection closed before a record was received")]
    ConnectionClosed,

    // -------------------------------------------------------------------------
    // Parse Errors
    // -------------------------------------------------------------------------
    #[error("{found} columns received instead of 38")]
    ColumnCount { found: usize },

    // -------------------------------------------------------------------------
    // Database Errors
    // -------------------------------------------------------------------------
    #[error("Database error: {0}")]
    Database(#[from] postgres::Error),

    #[error("Timed out waiting for a database client")]
    PoolTimeout,

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl SmdrError {
    /// True for transport errors caused by the peer going away or going quiet
    pub fn is_disconnect(&self) -> bool {
        match self {
            SmdrError::ConnectionClosed => true,
            SmdrError::Io(e) => matches!(
                e.kind(),
                std::io::ErrorKind::UnexpectedEof
                    | std::io::ErrorKind::ConnectionReset
                    | std::io::ErrorKind::ConnectionAborted
                    | std::io::ErrorKind::WouldBlock
                    | std::io::ErrorKind::TimedOut
            ),
            _ => false,
        }
    }
}
