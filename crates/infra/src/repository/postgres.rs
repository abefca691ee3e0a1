//! Postgres-backed demo store.
//!
//! Rows live in a single `demo` table keyed by a `BIGSERIAL` id. Every unit of
//! work runs inside a SQL transaction taken from the pool; read-only units
//! issue `SET TRANSACTION READ ONLY` so Postgres rejects stray writes and can
//! skip write bookkeeping.
//!
//! ## Error Mapping
//!
//! | Situation | RepositoryError |
//! |-----------|-----------------|
//! | `UPDATE` touched zero rows | `NotFound(id)` |
//! | pool sized at zero connections | `Unavailable` |
//! | write inside a read-only unit | `ReadOnly` (checked before hitting the database) |
//! | any sqlx failure (pool, network, constraint) | `Database` |

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Postgres, Row, Transaction};
use tracing::instrument;

use msstudy_core::{Demo, DemoId};

use super::sort::Sort;
use super::{DemoRepository, DemoTransaction, RepositoryError, TxMode};

/// Bootstrap DDL for the `demo` table.
pub const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS demo (
    id BIGSERIAL PRIMARY KEY,
    demofield TEXT
)
"#;

/// Postgres-backed demo repository.
///
/// Uses the SQLx connection pool, which is `Send + Sync`; the pool is owned by
/// the process wiring, not by this type.
#[derive(Debug, Clone)]
pub struct PostgresDemoRepository {
    pool: Arc<PgPool>,
}

impl PostgresDemoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    /// Open a pool against `database_url`.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, RepositoryError> {
        if max_connections == 0 {
            return Err(RepositoryError::Unavailable(
                "connection pool needs at least one connection".to_string(),
            ));
        }
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        Ok(Self::new(pool))
    }

    /// Create the `demo` table if it does not exist yet.
    pub async fn ensure_schema(&self) -> Result<(), RepositoryError> {
        sqlx::query(SCHEMA).execute(&*self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl DemoRepository for PostgresDemoRepository {
    #[instrument(skip(self), err)]
    async fn begin(&self, mode: TxMode) -> Result<Box<dyn DemoTransaction>, RepositoryError> {
        let mut tx = self.pool.begin().await?;
        if mode == TxMode::ReadOnly {
            sqlx::query("SET TRANSACTION READ ONLY")
                .execute(&mut *tx)
                .await?;
        }
        Ok(Box::new(PgDemoTransaction { tx, mode }))
    }
}

struct PgDemoTransaction {
    tx: Transaction<'static, Postgres>,
    mode: TxMode,
}

impl PgDemoTransaction {
    fn ensure_writable(&self) -> Result<(), RepositoryError> {
        match self.mode {
            TxMode::ReadWrite => Ok(()),
            TxMode::ReadOnly => Err(RepositoryError::ReadOnly),
        }
    }
}

fn demo_from_row(row: &PgRow) -> Result<Demo, sqlx::Error> {
    let mut demo = Demo::new();
    demo.set_id(Some(DemoId::from_i64(row.try_get::<i64, _>("id")?)));
    demo.set_demofield(row.try_get::<Option<String>, _>("demofield")?);
    Ok(demo)
}

#[async_trait]
impl DemoTransaction for PgDemoTransaction {
    #[instrument(skip(self, demo), fields(demo_id = ?demo.id()), err)]
    async fn save(&mut self, mut demo: Demo) -> Result<Demo, RepositoryError> {
        self.ensure_writable()?;

        match demo.id() {
            None => {
                let row = sqlx::query("INSERT INTO demo (demofield) VALUES ($1) RETURNING id")
                    .bind(demo.demofield())
                    .fetch_one(&mut *self.tx)
                    .await?;
                demo.set_id(Some(DemoId::from_i64(row.try_get::<i64, _>("id")?)));
            }
            Some(id) => {
                let result = sqlx::query("UPDATE demo SET demofield = $2 WHERE id = $1")
                    .bind(id.as_i64())
                    .bind(demo.demofield())
                    .execute(&mut *self.tx)
                    .await?;
                if result.rows_affected() == 0 {
                    return Err(RepositoryError::NotFound(id));
                }
            }
        }

        Ok(demo)
    }

    #[instrument(skip(self), err)]
    async fn find_all(&mut self, sort: Option<Sort>) -> Result<Vec<Demo>, RepositoryError> {
        let order_by = sort.map(|s| s.order_by_clause()).unwrap_or("id ASC");
        let sql = format!("SELECT id, demofield FROM demo ORDER BY {order_by}");

        let rows = sqlx::query(&sql).fetch_all(&mut *self.tx).await?;
        let demos = rows
            .iter()
            .map(demo_from_row)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(demos)
    }

    #[instrument(skip(self), err)]
    async fn find_by_id(&mut self, id: DemoId) -> Result<Option<Demo>, RepositoryError> {
        let row = sqlx::query("SELECT id, demofield FROM demo WHERE id = $1")
            .bind(id.as_i64())
            .fetch_optional(&mut *self.tx)
            .await?;
        Ok(row.as_ref().map(demo_from_row).transpose()?)
    }

    #[instrument(skip(self), err)]
    async fn delete_by_id(&mut self, id: DemoId) -> Result<(), RepositoryError> {
        self.ensure_writable()?;
        sqlx::query("DELETE FROM demo WHERE id = $1")
            .bind(id.as_i64())
            .execute(&mut *self.tx)
            .await?;
        Ok(())
    }

    async fn commit(self: Box<Self>) -> Result<(), RepositoryError> {
        self.tx.commit().await?;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<(), RepositoryError> {
        self.tx.rollback().await?;
        Ok(())
    }
}
