//! INTERVAL encoding for call durations
//!
//! Binary layout: microseconds (i64), days (i32), months (i32). Durations
//! only ever fill the microsecond part.

use std::error::Error;

use bytes::{BufMut, BytesMut};
use postgres::types::{accepts, to_sql_checked, IsNull, ToSql, Type};

use crate::record::CallDuration;

impl ToSql for CallDuration {
    fn to_sql(&self, _ty: &Type, out: &mut BytesMut) -> Result<IsNull, Box<dyn Error + Sync + Send>> {
        out.put_i64(self.as_micros());
        out.put_i32(0);
        out.put_i32(0);
        Ok(IsNull::No)
    }

    accepts!(INTERVAL);

    to_sql_checked!();
}
