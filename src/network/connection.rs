//! Connection Handler
//!
//! Handles one admitted switch connection: a single read, parse, insert.

use std::io::Read;
use std::net::{Shutdown, TcpStream};
use std::sync::Arc;
use std::time::Duration;

use crate::error::{Result, SmdrError};
use crate::record::{parse_buffer, MAX_RECORD_SIZE};
use crate::store::RecordSink;

/// Handles a single switch connection
pub struct Connection {
    /// TCP stream the record arrives on
    stream: TcpStream,

    /// Destination for the parsed record
    sink: Arc<dyn RecordSink>,
}

impl Connection {
    /// Create a new connection handler
    pub fn new(stream: TcpStream, sink: Arc<dyn RecordSink>) -> Self {
        Self { stream, sink }
    }

    /// Bound the record read (0 leaves it unbounded)
    pub fn set_read_timeout(&mut self, read_ms: u64) -> Result<()> {
        if read_ms > 0 {
            self.stream
                .set_read_timeout(Some(Duration::from_millis(read_ms)))?;
        }
        Ok(())
    }

    /// Handle the connection (blocking until the record is stored or dropped)
    ///
    /// Every failure is logged here; the returned error is for the caller's
    /// bookkeeping only.
    pub fn handle(&mut self) -> Result<()> {
        let result = self.ingest();
        let _ = self.stream.shutdown(Shutdown::Both);
        result
    }

    fn ingest(&mut self) -> Result<()> {
        let buf = match self.read_buffer() {
            Ok(buf) => buf,
            Err(e) if e.is_disconnect() => {
                tracing::warn!(error = %e, "No record received");
                return Err(e);
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to read from connection");
                return Err(e);
            }
        };

        tracing::trace!(bytes = buf.len(), "Received buffer");

        let record = match parse_buffer(&buf) {
            Ok(record) => record,
            Err(e) => {
                tracing::error!(error = %e, "Failed to parse record");
                return Err(e);
            }
        };

        if let Err(e) = self.sink.insert(&record) {
            tracing::error!(
                error = %e,
                call_id = ?record.call_id,
                call_start = ?record.call_start,
                caller = ?record.caller,
                "Failed to store record, dropping it"
            );
            return Err(e);
        }

        tracing::debug!(call_id = ?record.call_id, "Stored record");
        Ok(())
    }

    /// One receive call, never more
    fn read_buffer(&mut self) -> Result<Vec<u8>> {
        let mut buf = vec![0u8; MAX_RECORD_SIZE];
        let n = self.stream.read(&mut buf)?;
        if n == 0 {
            return Err(SmdrError::ConnectionClosed);
        }
        buf.truncate(n);
        Ok(buf)
    }
}
