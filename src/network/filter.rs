//! Address filter
//!
//! Optional single-source allowlist evaluated before any data is read.

use std::net::IpAddr;

/// Decides whether a remote peer may deliver records
#[derive(Debug, Clone, Default)]
pub struct AddressFilter {
    /// Textual form of the allowed address, if one is configured
    allowed: Option<String>,
}

impl AddressFilter {
    /// Create a filter for the given source address (`None` admits everyone)
    pub fn new(allowed: Option<IpAddr>) -> Self {
        Self {
            allowed: allowed.map(|ip| ip.to_string()),
        }
    }

    /// A filter that admits every connection
    pub fn allow_all() -> Self {
        Self::default()
    }

    /// True if a source address is configured
    pub fn is_restricted(&self) -> bool {
        self.allowed.is_some()
    }

    /// Check a remote address such as `"10.0.0.5:51324"`
    ///
    /// The check is a substring match on the text, so the port suffix does
    /// not get in the way. It is not exact IP equality.
    pub fn admits(&self, remote: &str) -> bool {
        let Some(allowed) = &self.allowed else {
            return true;
        };

        if remote.contains(allowed.as_str()) {
            return true;
        }

        tracing::warn!(remote = %remote, "Blocked connection");
        false
    }
}
