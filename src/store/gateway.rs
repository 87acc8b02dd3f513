//! PostgreSQL gateway
//!
//! Schema presence plus one parameterized insert per record.

use postgres::types::{ToSql, Type};

use crate::config::Config;
use crate::error::Result;
use crate::record::{CdrRecord, FieldValue, COLUMNS};

use super::schema::{create_table_sql, insert_sql, validate_table_name};
use super::{ClientPool, RecordSink};

/// Writes records to the destination table
pub struct PgGateway {
    /// Shared clients
    pool: ClientPool,

    /// Destination table
    table: String,

    /// Insert statement for `table`, built once
    insert_sql: String,
}

impl PgGateway {
    /// Validate the table name and open the client pool
    pub fn connect(config: &Config) -> Result<Self> {
        validate_table_name(&config.table)?;
        let pool = ClientPool::connect(&config.database_url, config.pool_size, config.db_timeout_ms)?;

        Ok(Self {
            pool,
            table: config.table.clone(),
            insert_sql: insert_sql(&config.table),
        })
    }

    /// Create the destination table if it does not exist yet
    ///
    /// Safe to call repeatedly.
    pub fn ensure_schema(&self) -> Result<()> {
        let mut client = self.pool.get()?;
        client.batch_execute(&create_table_sql(&self.table))?;
        tracing::info!(table = %self.table, "Destination table ready");
        Ok(())
    }

    /// Underlying client pool
    pub fn pool(&self) -> &ClientPool {
        &self.pool
    }
}

impl RecordSink for PgGateway {
    /// Integer slots are bound at the width the table declares: `i64` for
    /// `bigint` columns, `i32` for `integer` columns (out of range → NULL)
    fn insert(&self, record: &CdrRecord) -> Result<()> {
        let mut client = self.pool.get()?;
        let statement = client.prepare(&self.insert_sql)?;
        let types = statement.params();

        let values = record.values();
        let narrowed = narrow_integers(&values, types);
        let params: Vec<&(dyn ToSql + Sync)> = values
            .iter()
            .zip(types)
            .zip(&narrowed)
            .map(|((value, ty), small)| match value {
                FieldValue::Integer(_) if *ty == Type::INT4 => small as &(dyn ToSql + Sync),
                other => bind(*other),
            })
            .collect();

        client.execute(&statement, &params)?;
        Ok(())
    }
}

/// `i32` copies of the integer slots whose parameter is `int4`; every other
/// position is `None`
fn narrow_integers(values: &[FieldValue<'_>], types: &[Type]) -> Vec<Option<i32>> {
    values
        .iter()
        .zip(types)
        .enumerate()
        .map(|(i, (value, ty))| match value {
            FieldValue::Integer(Some(n)) if *ty == Type::INT4 => match i32::try_from(*n) {
                Ok(small) => Some(small),
                Err(_) => {
                    tracing::warn!(column = COLUMNS[i].name, value = n, "Integer out of range for column, storing NULL");
                    None
                }
            },
            _ => None,
        })
        .collect()
}

/// Borrow a slot as a statement parameter; `None` binds NULL
fn bind(value: FieldValue<'_>) -> &(dyn ToSql + Sync) {
    match value {
        FieldValue::Timestamp(v) => v,
        FieldValue::Duration(v) => v,
        FieldValue::Integer(v) => v,
        FieldValue::Boolean(v) => v,
        FieldValue::Text(v) => v,
    }
}
