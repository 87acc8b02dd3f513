//! Record Module
//!
//! Typed, null-aware representation of one SMDR line and the parser that
//! produces it.
//!
//! ## Wire Format
//! ```text
//! ┌───────────┬───────────────┬──────────┬─────┬───────────┬────────┐
//! │ CallStart │ ConnectedTime │ RingTime │ ... │ Undefined │ CR/LF  │
//! └───────────┴───────────────┴──────────┴─────┴───────────┴────────┘
//!   38 columns separated by ',', terminator optional
//! ```
//!
//! - Exactly one record per buffer, no quoting or escaping
//! - A column that fails its coercion becomes NULL, the record survives
//! - A buffer that does not split into 38 columns is rejected whole
//!
//! Timestamps use the pattern `YYYY/MM/DD HH:MM:SS`, durations `HH:MM:SS`.

mod cdr;
mod layout;
mod parser;
pub mod coerce;

pub use cdr::{CallDuration, CdrRecord};
pub use layout::{Column, ColumnKind, FieldValue, COLUMNS};
pub use parser::{parse_buffer, FIELD_SEPARATOR, MAX_RECORD_SIZE};

/// Number of columns in every SMDR record
pub const COLUMN_COUNT: usize = 38;
