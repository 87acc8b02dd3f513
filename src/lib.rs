//! # SMDR Collector
//!
//! Receives Station Message Detail Recording (SMDR) call records pushed by a
//! telephone switch over TCP and stores them in PostgreSQL:
//! - One record per TCP connection, 38 comma-separated columns
//! - Null-aware typed coercion of every column
//! - Optional single-address source filter
//! - Shared client pool, schema ensured once at startup
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Connection Listener                       │
//! │              (accept loop, Address Filter)                   │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │  one thread per admitted connection
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                  Connection Handler                          │
//! │          (single bounded read of one RawBuffer)              │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!                       ▼
//!               ┌───────────────┐
//!               │ Record Parser │──► Field Coercers
//!               └───────┬───────┘
//!                       │ CdrRecord
//!                       ▼
//!               ┌───────────────┐
//!               │  RecordSink   │  (PgGateway + ClientPool)
//!               └───────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod record;
pub mod network;
pub mod store;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{Result, SmdrError};
pub use config::Config;
pub use record::{parse_buffer, CdrRecord};
pub use network::{AddressFilter, Listener};
pub use store::{PgGateway, RecordSink};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of the collector
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
