//! Error types for the seeding pipeline.

use crate::rows::Table;
use thiserror::Error;

/// Errors surfaced by a store backend.
#[derive(Error, Debug)]
pub enum StoreError {
    /// PostgreSQL connection or query error.
    #[error("PostgreSQL error: {0}")]
    PostgreSQL(#[from] tokio_postgres::Error),

    /// Connection establishment failure.
    #[error("connection error: {0}")]
    Connection(String),

    /// Any other backend failure (serialization, injected test failures).
    #[error("store error: {0}")]
    Backend(String),
}

/// Errors that abort a seeding run.
///
/// Every failure is fatal: the pipeline never retries and never rolls back
/// completed stages. The operator re-runs the whole pipeline, whose reset
/// stage clears any partial data.
#[derive(Error, Debug)]
pub enum SeedError {
    /// Required configuration absent or invalid; raised before any
    /// database access.
    #[error("configuration error: {0}")]
    Config(String),

    /// A delete, insert or read-back failed while working on `table`.
    #[error("seeding {table} failed: {source}")]
    Stage {
        table: Table,
        #[source]
        source: StoreError,
    },
}

impl SeedError {
    pub(crate) fn stage(table: Table, source: StoreError) -> Self {
        SeedError::Stage { table, source }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_failing_piece() {
        let connect = StoreError::Connection("connection refused".to_string());
        assert_eq!(connect.to_string(), "connection error: connection refused");

        let stage = SeedError::stage(Table::Classrooms, StoreError::Backend("boom".to_string()));
        assert_eq!(stage.to_string(), "seeding classrooms failed: store error: boom");

        let config = SeedError::Config("SEED_DATABASE_URL is not set".to_string());
        assert!(config.to_string().starts_with("configuration error"));
    }
}
