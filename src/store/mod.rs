//! Store Module
//!
//! Persists parsed records to PostgreSQL.
//!
//! ## Responsibilities
//! - Ensure the destination table exists (once, at startup)
//! - One parameterized insert per record, all 38 columns bound
//! - Share a fixed set of clients across handler threads
//!
//! ## Column Types
//! ```text
//! Timestamp → timestamp     Duration → interval
//! Integer   → integer       Boolean  → boolean
//! Text      → text
//! ```

mod gateway;
mod interval;
mod pool;
pub mod schema;

pub use gateway::PgGateway;
pub use pool::{ClientPool, PooledClient};

use crate::error::Result;
use crate::record::CdrRecord;

/// Destination for parsed records
///
/// Implementations are shared by every connection handler.
pub trait RecordSink: Send + Sync {
    /// Store one record, a single attempt
    fn insert(&self, record: &CdrRecord) -> Result<()>;
}
