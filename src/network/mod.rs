//! Network Module
//!
//! TCP ingestion of SMDR records.
//!
//! ## Architecture
//! - Single acceptor thread, address filter applied before any read
//! - One handler thread per admitted connection
//! - Parsed records handed to a `RecordSink`

mod filter;
mod listener;
mod connection;

pub use filter::AddressFilter;
pub use listener::Listener;
pub use connection::Connection;
