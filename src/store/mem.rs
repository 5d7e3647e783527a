//! In-memory store backing tests and `--dry-run`.
//!
//! Rows are kept as JSON objects (via the `Serialize` derive on the row
//! types) and identifiers are handed out sequentially per table, which is
//! close enough to the destination's bigserial behavior for the pipeline
//! to run end to end without PostgreSQL.

use crate::error::StoreError;
use crate::rows::{ClassroomRef, Table, TableRow};
use crate::store::SeedStore;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use tokio::sync::Mutex;

#[derive(Default)]
struct MemTable {
    next_id: i64,
    rows: Vec<(i64, Value)>,
}

#[derive(Default)]
struct Inner {
    tables: HashMap<Table, MemTable>,
    delete_log: Vec<Table>,
}

/// In-memory [`SeedStore`] implementation.
#[derive(Default)]
pub struct MemStore {
    inner: Mutex<Inner>,
    fail_insert_on: Option<Table>,
    fail_delete_on: Option<Table>,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose inserts and read-backs fail once they touch `table`,
    /// for error-path tests.
    pub fn failing_on(table: Table) -> Self {
        Self {
            fail_insert_on: Some(table),
            ..Self::default()
        }
    }

    /// A store whose teardown fails on `table`, for reset error-path tests.
    pub fn failing_on_delete(table: Table) -> Self {
        Self {
            fail_delete_on: Some(table),
            ..Self::default()
        }
    }

    /// Current rows of `table` with their assigned ids.
    pub async fn rows(&self, table: Table) -> Vec<(i64, Value)> {
        let inner = self.inner.lock().await;
        inner
            .tables
            .get(&table)
            .map(|t| t.rows.clone())
            .unwrap_or_default()
    }

    /// Current row count of `table`.
    pub async fn row_count(&self, table: Table) -> usize {
        let inner = self.inner.lock().await;
        inner.tables.get(&table).map(|t| t.rows.len()).unwrap_or(0)
    }

    /// Every `delete_all` target so far, in call order.
    pub async fn delete_log(&self) -> Vec<Table> {
        self.inner.lock().await.delete_log.clone()
    }

    fn check(&self, table: Table) -> Result<(), StoreError> {
        if self.fail_insert_on == Some(table) {
            return Err(StoreError::Backend(format!("injected failure on {table}")));
        }
        Ok(())
    }

    fn check_delete(&self, table: Table) -> Result<(), StoreError> {
        if self.fail_delete_on == Some(table) {
            return Err(StoreError::Backend(format!(
                "injected teardown failure on {table}"
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl SeedStore for MemStore {
    async fn delete_all(&self, table: Table) -> Result<u64, StoreError> {
        self.check_delete(table)?;
        let mut inner = self.inner.lock().await;
        inner.delete_log.push(table);
        let removed = inner
            .tables
            .get_mut(&table)
            .map(|t| {
                let n = t.rows.len();
                t.rows.clear();
                n
            })
            .unwrap_or(0);
        Ok(removed as u64)
    }

    async fn insert_many<R: TableRow>(&self, rows: &[R]) -> Result<(), StoreError> {
        self.check(R::TABLE)?;
        let mut inner = self.inner.lock().await;
        let table = inner.tables.entry(R::TABLE).or_default();
        for row in rows {
            let value =
                serde_json::to_value(row).map_err(|e| StoreError::Backend(e.to_string()))?;
            table.next_id += 1;
            table.rows.push((table.next_id, value));
        }
        Ok(())
    }

    async fn fetch_ids(&self, table: Table) -> Result<Vec<i64>, StoreError> {
        self.check(table)?;
        let inner = self.inner.lock().await;
        Ok(inner
            .tables
            .get(&table)
            .map(|t| t.rows.iter().map(|(id, _)| *id).collect())
            .unwrap_or_default())
    }

    async fn fetch_classrooms(&self) -> Result<Vec<ClassroomRef>, StoreError> {
        self.check(Table::Classrooms)?;
        let inner = self.inner.lock().await;
        let Some(table) = inner.tables.get(&Table::Classrooms) else {
            return Ok(Vec::new());
        };
        table
            .rows
            .iter()
            .map(|(id, row)| {
                let academic_year_id = row
                    .get("academic_year_id")
                    .and_then(Value::as_i64)
                    .ok_or_else(|| {
                        StoreError::Backend("classroom row missing academic_year_id".to_string())
                    })?;
                Ok(ClassroomRef {
                    id: *id,
                    academic_year_id,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rows::NewCourse;

    #[test]
    fn ids_are_sequential_and_survive_deletes() {
        tokio_test::block_on(async {
            let store = MemStore::new();
            let rows = vec![
                NewCourse {
                    name: "Historia".to_string(),
                    code: "HIS".to_string(),
                },
                NewCourse {
                    name: "Arte".to_string(),
                    code: "ART".to_string(),
                },
            ];

            store.insert_many(&rows).await.unwrap();
            assert_eq!(store.fetch_ids(Table::Courses).await.unwrap(), vec![1, 2]);

            assert_eq!(store.delete_all(Table::Courses).await.unwrap(), 2);
            assert_eq!(store.delete_all(Table::Courses).await.unwrap(), 0);

            // Ids keep counting up after a reset, like a bigserial would.
            store.insert_many(&rows[..1]).await.unwrap();
            assert_eq!(store.fetch_ids(Table::Courses).await.unwrap(), vec![3]);
        });
    }

    #[test]
    fn injected_failures_only_hit_their_table_and_operation() {
        tokio_test::block_on(async {
            let failing_insert = MemStore::failing_on(Table::Students);
            assert!(failing_insert.delete_all(Table::Students).await.is_ok());
            assert!(matches!(
                failing_insert.fetch_ids(Table::Students).await,
                Err(StoreError::Backend(_))
            ));

            let failing_delete = MemStore::failing_on_delete(Table::Students);
            assert!(failing_delete.delete_all(Table::Courses).await.is_ok());
            assert!(matches!(
                failing_delete.delete_all(Table::Students).await,
                Err(StoreError::Backend(_))
            ));
        });
    }
}
