//! SQL generation
//!
//! DDL and the insert statement are derived from `COLUMNS`, so column order,
//! names and placeholder numbering cannot drift apart.

use crate::error::{Result, SmdrError};
use crate::record::COLUMNS;

/// Longest identifier PostgreSQL keeps without truncation
const MAX_IDENTIFIER_LEN: usize = 63;

/// Check that a table name is a plain, unquoted SQL identifier
///
/// Table names end up spliced into DDL, which cannot take parameters.
pub fn validate_table_name(name: &str) -> Result<()> {
    let mut chars = name.chars();
    let first_ok = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
    let rest_ok = chars.all(|c| c.is_ascii_alphanumeric() || c == '_');

    if !first_ok || !rest_ok || name.len() > MAX_IDENTIFIER_LEN {
        return Err(SmdrError::Config(format!(
            "invalid table name {:?}: expected letters, digits and '_' (max {} chars)",
            name, MAX_IDENTIFIER_LEN
        )));
    }
    Ok(())
}

/// `CREATE TABLE IF NOT EXISTS` for the record table
pub fn create_table_sql(table: &str) -> String {
    let columns = COLUMNS
        .iter()
        .map(|c| format!("    {} {}", c.name, c.kind.sql_type()))
        .collect::<Vec<_>>()
        .join(",\n");
    format!("CREATE TABLE IF NOT EXISTS {} (\n{}\n)", table, columns)
}

/// Parameterized insert of all columns, `$1` through `$38` in layout order
pub fn insert_sql(table: &str) -> String {
    let names = COLUMNS
        .iter()
        .map(|c| c.name)
        .collect::<Vec<_>>()
        .join(", ");
    let placeholders = (1..=COLUMNS.len())
        .map(|i| format!("${}", i))
        .collect::<Vec<_>>()
        .join(", ");
    format!("INSERT INTO {} ({}) VALUES ({})", table, names, placeholders)
}
