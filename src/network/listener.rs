//! TCP Listener
//!
//! Accepts switch connections and dispatches each to its own thread.

use std::net::{Shutdown, SocketAddr, TcpListener, TcpStream};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crate::config::Config;
use crate::error::Result;
use crate::store::RecordSink;

use super::{AddressFilter, Connection};

/// Pause after a failed accept so a persistent error (e.g. out of file
/// descriptors) does not spin the loop
const ACCEPT_BACKOFF: Duration = Duration::from_millis(50);

/// TCP listener for SMDR connections
pub struct Listener {
    /// Bound socket
    listener: TcpListener,

    /// Source allowlist, checked before any read
    filter: AddressFilter,

    /// Destination for parsed records, shared by all handlers
    sink: Arc<dyn RecordSink>,

    /// Per-connection read deadline (milliseconds)
    read_timeout_ms: u64,

    /// Cap on live handler threads
    max_connections: usize,

    /// Live handler threads
    active: Arc<AtomicUsize>,

    /// Sequence number for thread names
    next_conn_id: u64,
}

impl Listener {
    /// Bind the configured address
    ///
    /// Fails if the socket cannot be bound; there is no fallback port.
    pub fn bind(config: &Config, sink: Arc<dyn RecordSink>) -> Result<Self> {
        let listener = TcpListener::bind(config.listen_addr)?;

        Ok(Self {
            listener,
            filter: AddressFilter::new(config.allowed_source),
            sink,
            read_timeout_ms: config.read_timeout_ms,
            max_connections: config.max_connections,
            active: Arc::new(AtomicUsize::new(0)),
            next_conn_id: 0,
        })
    }

    /// Address the socket is actually bound to
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Run the accept loop (blocking, does not return)
    ///
    /// Accept errors are logged and the loop carries on after a short pause.
    pub fn run(&mut self) -> Result<()> {
        tracing::info!(addr = %self.local_addr()?, "Listening for SMDR connections");

        loop {
            match self.listener.accept() {
                Ok((stream, peer)) => self.dispatch(stream, peer),
                Err(e) => accept_failed(&e),
            }
        }
    }

    /// Filter a freshly accepted connection and hand it to a handler thread
    fn dispatch(&mut self, stream: TcpStream, peer: SocketAddr) {
        if !self.filter.admits(&peer.to_string()) {
            close(stream);
            return;
        }

        if self.active.load(Ordering::Acquire) >= self.max_connections {
            tracing::warn!(
                remote = %peer,
                limit = self.max_connections,
                "Connection limit reached, closing connection"
            );
            close(stream);
            return;
        }

        self.next_conn_id += 1;
        let conn_id = self.next_conn_id;
        let sink = Arc::clone(&self.sink);
        let read_timeout_ms = self.read_timeout_ms;
        let active = ActiveGuard::new(Arc::clone(&self.active));

        let spawned = thread::Builder::new()
            .name(format!("smdr-conn-{}", conn_id))
            .spawn(move || {
                let _active = active;
                let span = tracing::info_span!("connection", id = conn_id, remote = %peer);
                let _entered = span.enter();

                tracing::debug!("Connection established");
                let mut conn = Connection::new(stream, sink);
                let result = conn
                    .set_read_timeout(read_timeout_ms)
                    .and_then(|()| conn.handle());
                if let Err(e) = result {
                    tracing::debug!(error = %e, "Connection finished without storing a record");
                }
            });

        if let Err(e) = spawned {
            tracing::error!(remote = %peer, error = %e, "Failed to spawn connection handler");
        }
    }
}

/// Log a failed accept and back off before the next attempt
fn accept_failed(e: &std::io::Error) {
    tracing::error!(error = %e, "Failed to accept incoming connection");
    thread::sleep(ACCEPT_BACKOFF);
}

/// Shut a connection down without reading from it
fn close(stream: TcpStream) {
    let _ = stream.shutdown(Shutdown::Both);
}

/// Counts a handler thread as live until dropped
struct ActiveGuard {
    active: Arc<AtomicUsize>,
}

impl ActiveGuard {
    fn new(active: Arc<AtomicUsize>) -> Self {
        active.fetch_add(1, Ordering::AcqRel);
        Self { active }
    }
}

impl Drop for ActiveGuard {
    fn drop(&mut self) {
        self.active.fetch_sub(1, Ordering::AcqRel);
    }
}
