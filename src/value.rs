//! SQL parameter values produced by the seeder.

use chrono::{NaiveDate, NaiveTime};

/// The closed set of value shapes the seeder binds into insert statements.
///
/// Every column of every insert payload maps onto one of these variants;
/// store backends decide how to encode them (the PostgreSQL store turns
/// them into `ToSql` parameters).
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    /// `bigint` (identifiers and foreign keys).
    BigInt(i64),
    /// `integer` (year labels).
    Int(i32),
    /// `smallint` (grade levels).
    SmallInt(i16),
    /// `text` / `varchar`.
    Text(String),
    /// `date`.
    Date(NaiveDate),
    /// `time`.
    Time(NaiveTime),
    /// `bigint[]` (classroom teacher sets).
    BigIntArray(Vec<i64>),
}

impl From<i64> for SqlValue {
    fn from(v: i64) -> Self {
        SqlValue::BigInt(v)
    }
}

impl From<String> for SqlValue {
    fn from(v: String) -> Self {
        SqlValue::Text(v)
    }
}
