//! SMDR Collector Binary
//!
//! Listens for SMDR records from a telephone switch and stores them.

use std::ffi::OsString;
use std::net::IpAddr;
use std::sync::Arc;

use clap::{Arg, CommandFactory, Parser, ValueEnum};
use smdr_collector::config::{DEFAULT_PORT, DEFAULT_TABLE};
use smdr_collector::{Config, Listener, PgGateway};
use tracing_subscriber::{fmt, EnvFilter};

/// Log line format
#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogFormat {
    Json,
    Text,
}

/// SMDR Collector
#[derive(Parser, Debug)]
#[command(name = "smdr-collector")]
#[command(about = "Receives SMDR call records over TCP and stores them in PostgreSQL")]
#[command(version)]
struct Args {
    /// Listen port (all IPv4 interfaces)
    #[arg(short, long, default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Only accept records from this source address
    #[arg(short, long)]
    filter: Option<IpAddr>,

    /// PostgreSQL connection string
    #[arg(short, long, env = "SMDR_DATABASE_URL", hide_env_values = true)]
    database: String,

    /// Destination table
    #[arg(long, default_value = DEFAULT_TABLE)]
    table: String,

    /// Number of pooled database clients
    #[arg(long, default_value = "4")]
    pool_size: usize,

    /// Maximum concurrent connections
    #[arg(long, default_value = "1024")]
    max_connections: usize,

    /// Deadline for receiving a record, in milliseconds (0 = none)
    #[arg(long, default_value = "5000")]
    read_timeout_ms: u64,

    /// Database connect/statement/checkout timeout, in milliseconds (0 = none)
    #[arg(long, default_value = "5000")]
    db_timeout_ms: u64,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Json)]
    log_format: LogFormat,
}

impl Args {
    /// Parse the process arguments, skipping tokens no flag claims
    fn parse_lenient() -> Self {
        Self::parse_from(known_tokens(std::env::args_os()))
    }
}

/// Keep the binary name, every recognized flag and the values those flags
/// take; drop everything else
///
/// A flag's value is taken from the next token whatever it looks like, so a
/// bad value still reaches clap and fails there.
fn known_tokens<I, T>(raw: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut cmd = Args::command();
    cmd.build();

    let mut tokens = raw.into_iter().map(Into::into);
    let mut kept: Vec<OsString> = tokens.next().into_iter().collect();

    while let Some(token) = tokens.next() {
        let text = token.to_string_lossy().into_owned();
        let Some((arg, inline_value)) = cmd.get_arguments().find_map(|a| match_flag(a, &text))
        else {
            continue;
        };

        let takes_value = arg.get_action().takes_values();
        if inline_value && !takes_value {
            continue;
        }
        kept.push(token);
        if takes_value && !inline_value {
            if let Some(value) = tokens.next() {
                kept.push(value);
            }
        }
    }
    kept
}

/// Match `-p`, `-p514`, `--port` or `--port=514` against one argument;
/// the flag is returned with whether its value is inline
fn match_flag<'a>(arg: &'a Arg, token: &str) -> Option<(&'a Arg, bool)> {
    if let Some(long) = token.strip_prefix("--") {
        let (name, inline) = match long.split_once('=') {
            Some((name, _)) => (name, true),
            None => (long, false),
        };
        return (arg.get_long() == Some(name)).then_some((arg, inline));
    }

    let mut chars = token.strip_prefix('-')?.chars();
    let short = chars.next()?;
    (arg.get_short() == Some(short)).then_some((arg, chars.next().is_some()))
}

fn main() {
    let args = Args::parse_lenient();

    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,smdr_collector=debug"));

    match args.log_format {
        LogFormat::Json => fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .with_thread_ids(true)
            .init(),
        LogFormat::Text => fmt()
            .with_env_filter(filter)
            .with_target(true)
            .with_thread_ids(true)
            .init(),
    }

    tracing::info!("SMDR Collector v{}", smdr_collector::VERSION);

    let config = Config::builder()
        .port(args.port)
        .allowed_source(args.filter)
        .database_url(args.database)
        .table(args.table)
        .pool_size(args.pool_size)
        .max_connections(args.max_connections)
        .read_timeout_ms(args.read_timeout_ms)
        .db_timeout_ms(args.db_timeout_ms)
        .build();

    match config.allowed_source {
        Some(ip) => tracing::info!("Accepting records from {} only", ip),
        None => tracing::info!("Accepting records from any source"),
    }

    // Open database and make sure the table exists before taking traffic
    let gateway = match PgGateway::connect(&config) {
        Ok(g) => g,
        Err(e) => {
            tracing::error!("Failed to open database: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = gateway.ensure_schema() {
        tracing::error!("Failed to ensure schema: {}", e);
        std::process::exit(1);
    }

    let mut listener = match Listener::bind(&config, Arc::new(gateway)) {
        Ok(l) => l,
        Err(e) => {
            tracing::error!("Failed to bind {}: {}", config.listen_addr, e);
            std::process::exit(1);
        }
    };

    if let Err(e) = listener.run() {
        tracing::error!("Listener error: {}", e);
        std::process::exit(1);
    }
}
