//! Column layout
//!
//! The one place that fixes the name and kind of every SMDR column. The
//! schema DDL and the insert statement are generated from `COLUMNS`; the
//! parser and `CdrRecord::values` spell out the same order field by field.

use chrono::NaiveDateTime;

use super::{CallDuration, CdrRecord, COLUMN_COUNT};

/// Value kind carried by a column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Timestamp,
    Duration,
    Integer,
    Boolean,
    Text,
}

impl ColumnKind {
    /// PostgreSQL type the column is stored as
    pub fn sql_type(&self) -> &'static str {
        match self {
            ColumnKind::Timestamp => "timestamp",
            ColumnKind::Duration => "interval",
            ColumnKind::Integer => "integer",
            ColumnKind::Boolean => "boolean",
            ColumnKind::Text => "text",
        }
    }
}

/// One column of the SMDR record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    /// SQL column name
    pub name: &'static str,

    pub kind: ColumnKind,
}

const fn col(name: &'static str, kind: ColumnKind) -> Column {
    Column { name, kind }
}

use ColumnKind::{Boolean, Duration, Integer, Text, Timestamp};

/// All columns in wire order
pub const COLUMNS: [Column; COLUMN_COUNT] = [
    col("CallStart", Timestamp),
    col("ConnectedTime", Duration),
    col("RingTime", Integer),
    col("Caller", Text),
    col("CallDirection", Text),
    col("CalledNumber", Text),
    col("DialedNumber", Text),
    col("Account", Text),
    col("IsInternal", Boolean),
    col("CallId", Integer),
    col("Continuation", Boolean),
    col("Party1Device", Text),
    col("Party1Name", Text),
    col("Party2Device", Text),
    col("Party2Name", Text),
    col("ExternalTargeterId", Text),
    col("HoldTime", Integer),
    col("ParkTime", Integer),
    col("AuthValid", Text),
    col("AuthCode", Text),
    col("UserCharged", Text),
    col("CallCharge", Text),
    col("Currency", Text),
    col("AmountatLastUserChange", Text),
    col("CallUnits", Text),
    col("UnitsatLastUserChange", Text),
    col("CostperUnit", Text),
    col("MarkUp", Text),
    col("ExternalTargetingCause", Text),
    col("ExternalTargetedNumber", Text),
    col("CallingPartyServerIpAddress", Text),
    col("UniqueCallIDForTheCallerExt", Text),
    col("CalledPartyServerIP", Text),
    col("UniqueCallIDforCalledExt", Text),
    col("SMDRRecordTime", Timestamp),
    col("CallerConsentDirective", Text),
    col("CallingNumberVerification", Text),
    col("Undefined", Text),
];

/// Borrowed view of one record slot
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue<'a> {
    Timestamp(&'a Option<NaiveDateTime>),
    Duration(&'a Option<CallDuration>),
    Integer(&'a Option<i64>),
    Boolean(&'a Option<bool>),
    Text(&'a Option<String>),
}

impl FieldValue<'_> {
    /// Kind of the borrowed slot
    pub fn kind(&self) -> ColumnKind {
        match self {
            FieldValue::Timestamp(_) => ColumnKind::Timestamp,
            FieldValue::Duration(_) => ColumnKind::Duration,
            FieldValue::Integer(_) => ColumnKind::Integer,
            FieldValue::Boolean(_) => ColumnKind::Boolean,
            FieldValue::Text(_) => ColumnKind::Text,
        }
    }

    pub fn is_null(&self) -> bool {
        match self {
            FieldValue::Timestamp(v) => v.is_none(),
            FieldValue::Duration(v) => v.is_none(),
            FieldValue::Integer(v) => v.is_none(),
            FieldValue::Boolean(v) => v.is_none(),
            FieldValue::Text(v) => v.is_none(),
        }
    }
}

impl CdrRecord {
    /// All slots in wire order, matching `COLUMNS` position for position
    pub fn values(&self) -> [FieldValue<'_>; COLUMN_COUNT] {
        use FieldValue as V;
        [
            V::Timestamp(&self.call_start),
            V::Duration(&self.connected_time),
            V::Integer(&self.ring_time),
            V::Text(&self.caller),
            V::Text(&self.call_direction),
            V::Text(&self.called_number),
            V::Text(&self.dialed_number),
            V::Text(&self.account),
            V::Boolean(&self.is_internal),
            V::Integer(&self.call_id),
            V::Boolean(&self.continuation),
            V::Text(&self.party1_device),
            V::Text(&self.party1_name),
            V::Text(&self.party2_device),
            V::Text(&self.party2_name),
            V::Text(&self.external_targeter_id),
            V::Integer(&self.hold_time),
            V::Integer(&self.park_time),
            V::Text(&self.auth_valid),
            V::Text(&self.auth_code),
            V::Text(&self.user_charged),
            V::Text(&self.call_charge),
            V::Text(&self.currency),
            V::Text(&self.amount_at_last_user_change),
            V::Text(&self.call_units),
            V::Text(&self.units_at_last_user_change),
            V::Text(&self.cost_per_unit),
            V::Text(&self.mark_up),
            V::Text(&self.external_targeting_cause),
            V::Text(&self.external_targeted_number),
            V::Text(&self.calling_party_server_ip_address),
            V::Text(&self.unique_call_id_for_caller_ext),
            V::Text(&self.called_party_server_ip),
            V::Text(&self.unique_call_id_for_called_ext),
            V::Timestamp(&self.smdr_record_time),
            V::Text(&self.caller_consent_directive),
            V::Text(&self.calling_number_verification),
            V::Text(&self.undefined),
        ]
    }

    /// Number of slots holding a value
    pub fn populated_count(&self) -> usize {
        self.values().iter().filter(|v| !v.is_null()).count()
    }
}
