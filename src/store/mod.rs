//! Persistence backends.
//!
//! The pipeline only ever sees the [`SeedStore`] contract: clear a table,
//! insert a batch of typed rows, and read back the columns later stages
//! depend on. [`postgres::PgStore`] talks to the real destination;
//! [`mem::MemStore`] backs tests and `--dry-run`.

pub mod mem;
pub mod postgres;

use crate::error::StoreError;
use crate::rows::{ClassroomRef, Table, TableRow};
use async_trait::async_trait;

/// The three-operation persistence contract of the seeding engine.
#[async_trait]
pub trait SeedStore: Send + Sync {
    /// Delete every row in `table`, returning the number removed.
    /// Deleting from an empty table is a no-op, not an error.
    async fn delete_all(&self, table: Table) -> Result<u64, StoreError>;

    /// Insert a batch of rows. Identifiers are assigned by the store and
    /// only become visible through [`fetch_ids`](SeedStore::fetch_ids).
    async fn insert_many<R: TableRow>(&self, rows: &[R]) -> Result<(), StoreError>;

    /// Read back the identifiers assigned to `table`, in ascending order.
    async fn fetch_ids(&self, table: Table) -> Result<Vec<i64>, StoreError>;

    /// Read back classroom ids together with their academic year, the two
    /// columns the offering and enrollment stages need.
    async fn fetch_classrooms(&self) -> Result<Vec<ClassroomRef>, StoreError>;
}
