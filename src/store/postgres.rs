//! PostgreSQL-backed store.

use crate::error::StoreError;
use crate::rows::{ClassroomRef, Table, TableRow};
use crate::store::SeedStore;
use crate::value::SqlValue;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio_postgres::types::ToSql;
use tokio_postgres::{Client, NoTls};

/// Store backed by a single privileged PostgreSQL connection.
///
/// The connection is used exclusively by one seeding run; batches are
/// written one at a time, so a plain mutex around the client suffices.
pub struct PgStore {
    client: Arc<Mutex<Client>>,
}

impl PgStore {
    /// Connect to the destination and probe the connection.
    pub async fn connect(config: &tokio_postgres::Config) -> Result<Self, StoreError> {
        let (client, connection) = config
            .connect(NoTls)
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        // Drive the connection until the run ends.
        tokio::spawn(async move {
            if let Err(e) = connection.await {
                tracing::error!("PostgreSQL connection error: {e}");
            }
        });

        client.simple_query("SELECT 1").await?;

        Ok(Self {
            client: Arc::new(Mutex::new(client)),
        })
    }
}

#[async_trait]
impl SeedStore for PgStore {
    async fn delete_all(&self, table: Table) -> Result<u64, StoreError> {
        // `id <> 0` holds for every assigned bigserial key, so this clears
        // the table and succeeds unchanged when it is already empty.
        let sql = format!("DELETE FROM \"{}\" WHERE id <> 0", table.name());
        let client = self.client.lock().await;
        Ok(client.execute(&sql, &[]).await?)
    }

    async fn insert_many<R: TableRow>(&self, rows: &[R]) -> Result<(), StoreError> {
        if rows.is_empty() {
            return Ok(());
        }

        let sql = build_insert_sql(R::TABLE, R::COLUMNS, rows.len());

        let params: Vec<Box<dyn ToSql + Sync + Send>> = rows
            .iter()
            .flat_map(|row| row.values().into_iter().map(boxed_param))
            .collect();
        let param_refs: Vec<&(dyn ToSql + Sync)> = params
            .iter()
            .map(|p| p.as_ref() as &(dyn ToSql + Sync))
            .collect();

        let client = self.client.lock().await;
        client.execute(&sql, &param_refs).await?;
        Ok(())
    }

    async fn fetch_ids(&self, table: Table) -> Result<Vec<i64>, StoreError> {
        let sql = format!("SELECT id FROM \"{}\" ORDER BY id", table.name());
        let client = self.client.lock().await;
        let rows = client.query(&sql, &[]).await?;
        Ok(rows.iter().map(|row| row.get(0)).collect())
    }

    async fn fetch_classrooms(&self) -> Result<Vec<ClassroomRef>, StoreError> {
        let sql = format!(
            "SELECT id, academic_year_id FROM \"{}\" ORDER BY id",
            Table::Classrooms.name()
        );
        let client = self.client.lock().await;
        let rows = client.query(&sql, &[]).await?;
        Ok(rows
            .iter()
            .map(|row| ClassroomRef {
                id: row.get(0),
                academic_year_id: row.get(1),
            })
            .collect())
    }
}

/// Build a multi-row parameterized INSERT statement.
fn build_insert_sql(table: Table, columns: &[&str], row_count: usize) -> String {
    let mut placeholders = Vec::with_capacity(row_count);
    let mut param_idx = 1;
    for _ in 0..row_count {
        let row_placeholders: Vec<String> = (0..columns.len())
            .map(|_| {
                let p = format!("${param_idx}");
                param_idx += 1;
                p
            })
            .collect();
        placeholders.push(format!("({})", row_placeholders.join(", ")));
    }

    format!(
        "INSERT INTO \"{}\" ({}) VALUES {}",
        table.name(),
        columns
            .iter()
            .map(|c| format!("\"{c}\""))
            .collect::<Vec<_>>()
            .join(", "),
        placeholders.join(", ")
    )
}

/// Convert an [`SqlValue`] into a boxed `ToSql` parameter.
fn boxed_param(value: SqlValue) -> Box<dyn ToSql + Sync + Send> {
    match value {
        SqlValue::BigInt(v) => Box::new(v),
        SqlValue::Int(v) => Box::new(v),
        SqlValue::SmallInt(v) => Box::new(v),
        SqlValue::Text(v) => Box::new(v),
        SqlValue::Date(v) => Box::new(v),
        SqlValue::Time(v) => Box::new(v),
        SqlValue::BigIntArray(v) => Box::new(v),
    }
}
