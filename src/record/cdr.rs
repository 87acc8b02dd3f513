//! CDR record definitions
//!
//! One parsed SMDR line. Every field is nullable.

use chrono::NaiveDateTime;

/// Elapsed call time, held at microsecond resolution
///
/// Calendar months and days are never represented: a connected call does not
/// span a calendar month, so hours simply keep counting past 24.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CallDuration {
    micros: i64,
}

impl CallDuration {
    /// Build a duration from a microsecond count
    pub fn from_micros(micros: i64) -> Self {
        Self { micros }
    }

    /// Build a duration from hour/minute/second components
    ///
    /// Returns `None` if the total overflows.
    pub fn from_hms(hours: i64, minutes: i64, seconds: i64) -> Option<Self> {
        let total_secs = hours
            .checked_mul(3600)?
            .checked_add(minutes.checked_mul(60)?)?
            .checked_add(seconds)?;
        Some(Self {
            micros: total_secs.checked_mul(1_000_000)?,
        })
    }

    /// Total microseconds
    pub fn as_micros(&self) -> i64 {
        self.micros
    }

    /// Total whole seconds
    pub fn as_secs(&self) -> i64 {
        self.micros / 1_000_000
    }
}

/// A parsed SMDR call record
///
/// Fields appear in wire order. A record always carries all 38 slots;
/// any of them may be `None`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CdrRecord {
    pub call_start: Option<NaiveDateTime>,
    pub connected_time: Option<CallDuration>,
    pub ring_time: Option<i64>,
    pub caller: Option<String>,
    pub call_direction: Option<String>,
    pub called_number: Option<String>,
    pub dialed_number: Option<String>,
    pub account: Option<String>,
    pub is_internal: Option<bool>,
    pub call_id: Option<i64>,
    pub continuation: Option<bool>,
    pub party1_device: Option<String>,
    pub party1_name: Option<String>,
    pub party2_device: Option<String>,
    pub party2_name: Option<String>,
    pub external_targeter_id: Option<String>,
    pub hold_time: Option<i64>,
    pub park_time: Option<i64>,
    pub auth_valid: Option<String>,
    pub auth_code: Option<String>,
    pub user_charged: Option<String>,
    pub call_charge: Option<String>,
    pub currency: Option<String>,
    pub amount_at_last_user_change: Option<String>,
    pub call_units: Option<String>,
    pub units_at_last_user_change: Option<String>,
    pub cost_per_unit: Option<String>,
    pub mark_up: Option<String>,
    pub external_targeting_cause: Option<String>,
    pub external_targeted_number: Option<String>,
    pub calling_party_server_ip_address: Option<String>,
    pub unique_call_id_for_caller_ext: Option<String>,
    pub called_party_server_ip: Option<String>,
    pub unique_call_id_for_called_ext: Option<String>,
    pub smdr_record_time: Option<NaiveDateTime>,
    pub caller_consent_directive: Option<String>,
    pub calling_number_verification: Option<String>,
    pub undefined: Option<String>,
}
