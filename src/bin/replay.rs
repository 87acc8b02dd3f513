//! SMDR Replay Tool
//!
//! Sends SMDR lines to a collector the way a switch does: one connection
//! per record.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Read, Write};
use std::net::{Shutdown, TcpStream};
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use smdr_collector::Result;
use tracing_subscriber::{fmt, EnvFilter};

/// SMDR Replay
#[derive(Parser, Debug)]
#[command(name = "smdr-replay")]
#[command(about = "Replay SMDR lines against a running collector")]
struct Args {
    /// Collector address
    #[arg(short, long, default_value = "127.0.0.1:514")]
    server: String,

    /// How long to wait for the collector to close each connection (ms)
    #[arg(long, default_value = "2000")]
    wait_ms: u64,

    /// File with one SMDR record per line (stdin if omitted)
    file: Option<PathBuf>,
}

fn main() {
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let args = Args::parse();

    let input: Box<dyn BufRead> = match &args.file {
        Some(path) => match File::open(path) {
            Ok(f) => Box::new(BufReader::new(f)),
            Err(e) => {
                tracing::error!("Failed to open {}: {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => Box::new(BufReader::new(io::stdin())),
    };

    let mut sent = 0usize;
    let mut failed = 0usize;

    for (i, line) in input.lines().enumerate() {
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                tracing::error!("Failed to read input: {}", e);
                std::process::exit(1);
            }
        };
        let line = line.trim_end_matches('\r');
        if line.is_empty() {
            continue;
        }

        match send_record(&args.server, line, args.wait_ms) {
            Ok(()) => sent += 1,
            Err(e) => {
                failed += 1;
                tracing::warn!(line = i + 1, "Failed to send record: {}", e);
            }
        }
    }

    tracing::info!(sent, failed, "Replay finished");
    if failed > 0 {
        std::process::exit(1);
    }
}

/// Deliver one record on its own connection
fn send_record(server: &str, line: &str, wait_ms: u64) -> Result<()> {
    let mut stream = TcpStream::connect(server)?;
    let mut payload = Vec::with_capacity(line.len() + 2);
    payload.extend_from_slice(line.as_bytes());
    payload.extend_from_slice(b"\r\n");
    stream.write_all(&payload)?;
    stream.flush()?;
    stream.shutdown(Shutdown::Write)?;

    // The collector never answers; wait for it to hang up.
    if wait_ms > 0 {
        stream.set_read_timeout(Some(Duration::from_millis(wait_ms)))?;
        let mut scratch = [0u8; 64];
        let _ = stream.read(&mut scratch);
    }
    Ok(())
}
