//! Record parser
//!
//! Turns one raw buffer into a `CdrRecord`.

use crate::error::{Result, SmdrError};

use super::coerce::{coerce_bool, coerce_duration, coerce_integer, coerce_text, coerce_timestamp};
use super::{CdrRecord, COLUMN_COUNT};

/// Column separator
pub const FIELD_SEPARATOR: char = ',';

/// Largest buffer read from a connection
pub const MAX_RECORD_SIZE: usize = 2096;

/// Parse one SMDR buffer
///
/// Everything from the first `\n` or `\r` on is ignored. The rest is decoded
/// once as UTF-8 (invalid sequences become U+FFFD) and split on
/// `FIELD_SEPARATOR`. Anything other than exactly 38 columns is rejected with
/// `SmdrError::ColumnCount`; each column is then logged at debug level with
/// its 1-based position so format drift upstream can be spotted.
pub fn parse_buffer(buf: &[u8]) -> Result<CdrRecord> {
    let line = match buf.iter().position(|&b| b == b'\n' || b == b'\r') {
        Some(end) => &buf[..end],
        None => buf,
    };
    let text = String::from_utf8_lossy(line);
    let cols: Vec<&str> = text.split(FIELD_SEPARATOR).collect();

    if cols.len() != COLUMN_COUNT {
        for (i, col) in cols.iter().enumerate() {
            tracing::debug!(position = i + 1, value = %col, "Rejected column");
        }
        return Err(SmdrError::ColumnCount { found: cols.len() });
    }

    Ok(CdrRecord {
        call_start: coerce_timestamp(cols[0]),
        connected_time: coerce_duration(cols[1]),
        ring_time: coerce_integer(cols[2]),
        caller: coerce_text(cols[3]),
        call_direction: coerce_text(cols[4]),
        called_number: coerce_text(cols[5]),
        dialed_number: coerce_text(cols[6]),
        account: coerce_text(cols[7]),
        is_internal: coerce_bool(cols[8]),
        call_id: coerce_integer(cols[9]),
        continuation: coerce_bool(cols[10]),
        party1_device: coerce_text(cols[11]),
        party1_name: coerce_text(cols[12]),
        party2_device: coerce_text(cols[13]),
        party2_name: coerce_text(cols[14]),
        external_targeter_id: coerce_text(cols[15]),
        hold_time: coerce_integer(cols[16]),
        park_time: coerce_integer(cols[17]),
        auth_valid: coerce_text(cols[18]),
        auth_code: coerce_text(cols[19]),
        user_charged: coerce_text(cols[20]),
        call_charge: coerce_text(cols[21]),
        currency: coerce_text(cols[22]),
        amount_at_last_user_change: coerce_text(cols[23]),
        call_units: coerce_text(cols[24]),
        units_at_last_user_change: coerce_text(cols[25]),
        cost_per_unit: coerce_text(cols[26]),
        mark_up: coerce_text(cols[27]),
        external_targeting_cause: coerce_text(cols[28]),
        external_targeted_number: coerce_text(cols[29]),
        calling_party_server_ip_address: coerce_text(cols[30]),
        unique_call_id_for_caller_ext: coerce_text(cols[31]),
        called_party_server_ip: coerce_text(cols[32]),
        unique_call_id_for_called_ext: coerce_text(cols[33]),
        smdr_record_time: coerce_timestamp(cols[34]),
        caller_consent_directive: coerce_text(cols[35]),
        calling_number_verification: coerce_text(cols[36]),
        undefined: coerce_text(cols[37]),
    })
}
