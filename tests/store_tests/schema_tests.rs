//! Schema Tests
//!
//! Tests for the generated DDL and insert statement.

use smdr_collector::record::{COLUMNS, COLUMN_COUNT};
use smdr_collector::store::schema::{create_table_sql, insert_sql, validate_table_name};
use smdr_collector::SmdrError;

// =============================================================================
// Table Name Tests
// =============================================================================

#[test]
fn test_valid_table_names() {
    for name in ["AvayaData", "smdr", "_records", "cdr_2024", "a"] {
        assert!(validate_table_name(name).is_ok(), "{}", name);
    }
}

#[test]
fn test_invalid_table_names() {
    for name in ["", "1cdr", "cdr-records", "cdr records", "cdr;drop table x", "\"quoted\""] {
        assert!(
            matches!(validate_table_name(name), Err(SmdrError::Config(_))),
            "{}",
            name
        );
    }
}

#[test]
fn test_table_name_length_limit() {
    assert!(validate_table_name(&"a".repeat(63)).is_ok());
    assert!(validate_table_name(&"a".repeat(64)).is_err());
}

// =============================================================================
// DDL Tests
// =============================================================================

#[test]
fn test_create_is_idempotent_statement() {
    let sql = create_table_sql("AvayaData");
    assert!(sql.starts_with("CREATE TABLE IF NOT EXISTS AvayaData ("));
}

#[test]
fn test_create_declares_every_column_with_its_type() {
    let sql = create_table_sql("AvayaData");

    for column in COLUMNS.iter() {
        let declaration = format!("{} {}", column.name, column.kind.sql_type());
        assert!(sql.contains(&declaration), "missing {}", declaration);
    }
    assert_eq!(sql.matches(",\n").count(), COLUMN_COUNT - 1);
}

#[test]
fn test_create_column_types() {
    let sql = create_table_sql("t");

    assert!(sql.contains("CallStart timestamp"));
    assert!(sql.contains("ConnectedTime interval"));
    assert!(sql.contains("RingTime integer"));
    assert!(sql.contains("IsInternal boolean"));
    assert!(sql.contains("Undefined text"));
}

// =============================================================================
// Insert Tests
// =============================================================================

#[test]
fn test_insert_binds_every_column_in_order() {
    let sql = insert_sql("AvayaData");

    let names = COLUMNS.iter().map(|c| c.name).collect::<Vec<_>>().join(", ");
    assert!(sql.starts_with(&format!("INSERT INTO AvayaData ({})", names)));
    assert!(sql.contains("$1, $2, $3"));
    assert!(sql.ends_with("$37, $38)"));
    assert!(!sql.contains("$39"));
}
