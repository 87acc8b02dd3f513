//! Listener Tests
//!
//! These tests verify, over real loopback sockets:
//! - Admitted connections deliver exactly one record to the sink
//! - Filtered connections are closed without a read
//! - Parse and insert failures stay inside their connection
//! - Slow peers neither block the accept loop nor live forever

use std::io::{Read, Write};
use std::net::{SocketAddr, TcpStream};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use smdr_collector::config::ConfigBuilder;
use smdr_collector::{CdrRecord, Config, Listener, RecordSink, Result, SmdrError};

const SAMPLE: &str = "2024/01/02 03:04:05,01:02:03,10,Alice,Outbound,555,556,acct,true,1,false,\
dev1,Alice,dev2,Bob,ext,5,2,valid,code,user,1.50,USD,1.40,10,9,0.1,0,cause,target,\
ip1,id1,ip2,id2,2024/01/02 03:05:00,consent,verified,undef";

// =============================================================================
// Helper Functions
// =============================================================================

/// Keeps every record it is handed
#[derive(Default)]
struct CollectingSink {
    records: Mutex<Vec<CdrRecord>>,
}

impl CollectingSink {
    fn len(&self) -> usize {
        self.records.lock().len()
    }
}

impl RecordSink for CollectingSink {
    fn insert(&self, record: &CdrRecord) -> Result<()> {
        self.records.lock().push(record.clone());
        Ok(())
    }
}

/// Rejects every record, counting attempts
#[derive(Default)]
struct FailingSink {
    attempts: AtomicUsize,
}

impl RecordSink for FailingSink {
    fn insert(&self, _record: &CdrRecord) -> Result<()> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(SmdrError::PoolTimeout)
    }
}

fn loopback() -> ConfigBuilder {
    Config::builder().listen_addr("127.0.0.1:0".parse().unwrap())
}

fn start(config: Config, sink: Arc<dyn RecordSink>) -> SocketAddr {
    let mut listener = Listener::bind(&config, sink).unwrap();
    let addr = listener.local_addr().unwrap();
    thread::spawn(move || {
        let _ = listener.run();
    });
    addr
}

/// Send one buffer and wait for the collector to hang up
fn send(addr: SocketAddr, payload: &[u8]) {
    let mut stream = TcpStream::connect(addr).unwrap();
    let _ = stream.write_all(payload);
    wait_closed(&mut stream);
}

/// True once the peer has closed the connection
fn wait_closed(stream: &mut TcpStream) -> bool {
    stream
        .set_read_timeout(Some(Duration::from_secs(5)))
        .unwrap();
    let mut scratch = [0u8; 16];
    match stream.read(&mut scratch) {
        Ok(0) => true,
        Ok(_) => false,
        Err(e) => e.kind() != std::io::ErrorKind::WouldBlock && e.kind() != std::io::ErrorKind::TimedOut,
    }
}

fn wait_for<F: Fn() -> bool>(condition: F) -> bool {
    let deadline = Instant::now() + Duration::from_secs(5);
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        thread::sleep(Duration::from_millis(10));
    }
    condition()
}

// =============================================================================
// Delivery Tests
// =============================================================================

#[test]
fn test_record_is_delivered() {
    let sink = Arc::new(CollectingSink::default());
    let addr = start(loopback().build(), sink.clone());

    send(addr, format!("{}\r\n", SAMPLE).as_bytes());

    assert!(wait_for(|| sink.len() == 1));
    let records = sink.records.lock();
    assert_eq!(records[0].caller.as_deref(), Some("Alice"));
    assert_eq!(records[0].ring_time, Some(10));
}

#[test]
fn test_one_record_per_connection() {
    let sink = Arc::new(CollectingSink::default());
    let addr = start(loopback().build(), sink.clone());

    for _ in 0..5 {
        send(addr, format!("{}\n", SAMPLE).as_bytes());
    }

    assert!(wait_for(|| sink.len() == 5));
}

#[test]
fn test_bad_column_count_stores_nothing() {
    let sink = Arc::new(CollectingSink::default());
    let addr = start(loopback().build(), sink.clone());

    send(addr, b"only,three,columns\n");
    send(addr, format!("{}\n", SAMPLE).as_bytes());

    assert!(wait_for(|| sink.len() == 1));
    thread::sleep(Duration::from_millis(100));
    assert_eq!(sink.len(), 1);
}

#[test]
fn test_insert_failure_is_contained() {
    let sink = Arc::new(FailingSink::default());
    let addr = start(loopback().build(), sink.clone());

    send(addr, format!("{}\n", SAMPLE).as_bytes());
    send(addr, format!("{}\n", SAMPLE).as_bytes());

    assert!(wait_for(|| sink.attempts.load(Ordering::SeqCst) == 2));
}

// =============================================================================
// Filter Tests
// =============================================================================

#[test]
fn test_filtered_connection_closed_without_read() {
    let sink = Arc::new(CollectingSink::default());
    let config = loopback()
        .allowed_source(Some("10.0.0.5".parse().unwrap()))
        .build();
    let addr = start(config, sink.clone());

    let mut stream = TcpStream::connect(addr).unwrap();
    let _ = stream.write_all(format!("{}\n", SAMPLE).as_bytes());
    assert!(wait_closed(&mut stream));

    thread::sleep(Duration::from_millis(100));
    assert_eq!(sink.len(), 0);
}

#[test]
fn test_matching_source_is_admitted() {
    let sink = Arc::new(CollectingSink::default());
    let config = loopback()
        .allowed_source(Some("127.0.0.1".parse().unwrap()))
        .build();
    let addr = start(config, sink.clone());

    send(addr, format!("{}\n", SAMPLE).as_bytes());

    assert!(wait_for(|| sink.len() == 1));
}

// =============================================================================
// Slow Peer Tests
// =============================================================================

#[test]
fn test_silent_peer_times_out() {
    let sink = Arc::new(CollectingSink::default());
    let addr = start(loopback().read_timeout_ms(100).build(), sink.clone());

    let mut stream = TcpStream::connect(addr).unwrap();
    assert!(wait_closed(&mut stream));
    assert_eq!(sink.len(), 0);
}

#[test]
fn test_stalled_peer_does_not_block_others() {
    let sink = Arc::new(CollectingSink::default());
    let addr = start(loopback().read_timeout_ms(10_000).build(), sink.clone());

    let _stalled = TcpStream::connect(addr).unwrap();
    send(addr, format!("{}\n", SAMPLE).as_bytes());

    assert!(wait_for(|| sink.len() == 1));
}

#[test]
fn test_connection_limit_closes_extra_peers() {
    let sink = Arc::new(CollectingSink::default());
    let config = loopback()
        .max_connections(1)
        .read_timeout_ms(10_000)
        .build();
    let addr = start(config, sink.clone());

    let _stalled = TcpStream::connect(addr).unwrap();
    // Let the accept loop pick up the first peer before the second arrives.
    thread::sleep(Duration::from_millis(200));

    let mut extra = TcpStream::connect(addr).unwrap();
    let _ = extra.write_all(format!("{}\n", SAMPLE).as_bytes());
    assert!(wait_closed(&mut extra));

    thread::sleep(Duration::from_millis(100));
    assert_eq!(sink.len(), 0);
}

// =============================================================================
// Bind Tests
// =============================================================================

#[test]
fn test_bind_conflict_is_an_error() {
    let sink: Arc<dyn RecordSink> = Arc::new(CollectingSink::default());
    let first = Listener::bind(&loopback().build(), sink.clone()).unwrap();
    let taken = first.local_addr().unwrap();

    let result = Listener::bind(&Config::builder().listen_addr(taken).build(), sink);
    assert!(matches!(result, Err(SmdrError::Io(_))));
}
