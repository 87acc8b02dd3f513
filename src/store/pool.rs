//! Client pool
//!
//! A fixed number of PostgreSQL clients shared by all handler threads.

use std::ops::{Deref, DerefMut};
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};
use postgres::{Client, NoTls};

use crate::error::{Result, SmdrError};

/// Fixed-size pool of blocking PostgreSQL clients
///
/// ## Concurrency:
/// - `slots`: Protected by Mutex, one entry per client not checked out
/// - `available`: Signalled whenever a slot is returned
/// - A `None` slot is a client that must be (re)opened on next checkout
pub struct ClientPool {
    /// Connection parameters, kept for reconnecting
    config: postgres::Config,

    /// Idle slots
    slots: Mutex<Vec<Option<Client>>>,

    /// Wakes threads waiting for a slot
    available: Condvar,

    /// Longest wait for a slot
    checkout_timeout: Option<Duration>,

    /// Total number of slots
    size: usize,
}

impl ClientPool {
    /// Open `size` clients against `url`
    ///
    /// A non-zero `timeout_ms` bounds connecting, every statement (through
    /// the server-side `statement_timeout`) and waiting for a free client.
    /// Every client is opened up front; the first failure is returned.
    pub fn connect(url: &str, size: usize, timeout_ms: u64) -> Result<Self> {
        if size == 0 {
            return Err(SmdrError::Config("pool size must be at least 1".to_string()));
        }

        let mut config: postgres::Config = url.parse()?;
        let checkout_timeout = if timeout_ms > 0 {
            let timeout = Duration::from_millis(timeout_ms);
            config.connect_timeout(timeout);
            let options = match config.get_options() {
                Some(existing) => format!("{} -c statement_timeout={}", existing, timeout_ms),
                None => format!("-c statement_timeout={}", timeout_ms),
            };
            config.options(&options);
            Some(timeout)
        } else {
            None
        };

        let mut slots = Vec::with_capacity(size);
        for _ in 0..size {
            slots.push(Some(config.connect(NoTls)?));
        }

        tracing::debug!(size, "Opened database client pool");

        Ok(Self {
            config,
            slots: Mutex::new(slots),
            available: Condvar::new(),
            checkout_timeout,
            size,
        })
    }

    /// Check out a client, waiting for one to come back if all are busy
    ///
    /// A client found closed is reopened before it is handed out.
    pub fn get(&self) -> Result<PooledClient<'_>> {
        let slot = self.take_slot()?;

        let client = match slot {
            Some(client) if !client.is_closed() => client,
            _ => {
                tracing::info!("Reopening database client");
                match self.config.connect(NoTls) {
                    Ok(client) => client,
                    Err(e) => {
                        self.put_slot(None);
                        return Err(e.into());
                    }
                }
            }
        };

        Ok(PooledClient {
            pool: self,
            client: Some(client),
        })
    }

    /// Total number of clients
    pub fn size(&self) -> usize {
        self.size
    }

    /// Clients not currently checked out
    pub fn idle_count(&self) -> usize {
        self.slots.lock().len()
    }

    fn take_slot(&self) -> Result<Option<Client>> {
        let deadline = self.checkout_timeout.map(|t| Instant::now() + t);
        let mut slots = self.slots.lock();

        loop {
            if let Some(slot) = slots.pop() {
                return Ok(slot);
            }
            match deadline {
                Some(deadline) => {
                    if self.available.wait_until(&mut slots, deadline).timed_out()
                        && slots.is_empty()
                    {
                        return Err(SmdrError::PoolTimeout);
                    }
                }
                None => self.available.wait(&mut slots),
            }
        }
    }

    fn put_slot(&self, slot: Option<Client>) {
        self.slots.lock().push(slot);
        self.available.notify_one();
    }
}

/// A client checked out of a `ClientPool`, returned on drop
pub struct PooledClient<'a> {
    pool: &'a ClientPool,
    client: Option<Client>,
}

impl Deref for PooledClient<'_> {
    type Target = Client;

    fn deref(&self) -> &Client {
        self.client.as_ref().expect("client is present until drop")
    }
}

impl DerefMut for PooledClient<'_> {
    fn deref_mut(&mut self) -> &mut Client {
        self.client.as_mut().expect("client is present until drop")
    }
}

impl Drop for PooledClient<'_> {
    fn drop(&mut self) {
        self.pool.put_slot(self.client.take());
    }
}
