//! Configuration for the SMDR collector
//!
//! Centralized configuration with sensible defaults.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

/// Default SMDR listen port
pub const DEFAULT_PORT: u16 = 514;

/// Default destination table
pub const DEFAULT_TABLE: &str = "AvayaData";

/// Main configuration for a collector instance
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Network Configuration
    // -------------------------------------------------------------------------
    /// TCP listen address (all IPv4 interfaces by default)
    pub listen_addr: SocketAddr,

    /// Only source address allowed to deliver records, if any
    pub allowed_source: Option<IpAddr>,

    /// Max concurrent connection handlers
    pub max_connections: usize,

    /// Deadline for the single record read (milliseconds, 0 = none)
    pub read_timeout_ms: u64,

    // -------------------------------------------------------------------------
    // Database Configuration
    // -------------------------------------------------------------------------
    /// PostgreSQL connection string (URL or key=value form)
    pub database_url: String,

    /// Destination table name
    pub table: String,

    /// Number of pooled database clients
    pub pool_size: usize,

    /// Bound on connect, statement and pool checkout (milliseconds, 0 = none)
    pub db_timeout_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), DEFAULT_PORT),
            allowed_source: None,
            max_connections: 1024,
            read_timeout_ms: 5000,
            database_url: String::new(),
            table: DEFAULT_TABLE.to_string(),
            pool_size: 4,
            db_timeout_ms: 5000,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Listen on the given port on all IPv4 interfaces
    pub fn port(mut self, port: u16) -> Self {
        self.config.listen_addr.set_port(port);
        self
    }

    /// Set the full TCP listen address
    pub fn listen_addr(mut self, addr: SocketAddr) -> Self {
        self.config.listen_addr = addr;
        self
    }

    /// Restrict ingestion to a single source address
    pub fn allowed_source(mut self, addr: Option<IpAddr>) -> Self {
        self.config.allowed_source = addr;
        self
    }

    /// Set the maximum number of concurrent connections
    pub fn max_connections(mut self, count: usize) -> Self {
        self.config.max_connections = count;
        self
    }

    /// Set the read timeout (in milliseconds)
    pub fn read_timeout_ms(mut self, ms: u64) -> Self {
        self.config.read_timeout_ms = ms;
        self
    }

    /// Set the PostgreSQL connection string
    pub fn database_url(mut self, url: impl Into<String>) -> Self {
        self.config.database_url = url.into();
        self
    }

    /// Set the destination table name
    pub fn table(mut self, name: impl Into<String>) -> Self {
        self.config.table = name.into();
        self
    }

    /// Set the number of pooled database clients
    pub fn pool_size(mut self, size: usize) -> Self {
        self.config.pool_size = size;
        self
    }

    /// Set the database timeout (in milliseconds)
    pub fn db_timeout_ms(mut self, ms: u64) -> Self {
        self.config.db_timeout_ms = ms;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
