//! Demo storage boundary.
//!
//! The service talks to storage only through [`DemoRepository`]; every unit of
//! work runs inside a [`DemoTransaction`] so writes can be committed or rolled
//! back as a whole.

pub mod in_memory;
pub mod postgres;
pub mod sort;

use async_trait::async_trait;
use thiserror::Error;

use msstudy_core::{Demo, DemoId};

pub use in_memory::InMemoryDemoRepository;
pub use postgres::PostgresDemoRepository;
pub use sort::{Direction, Sort, SortProperty};

/// Access mode requested when a transaction begins.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TxMode {
    ReadWrite,
    /// Writes are rejected; the store may apply read optimizations.
    ReadOnly,
}

#[derive(Debug, Error)]
pub enum RepositoryError {
    /// An update targeted an id with no row behind it.
    #[error("demo {0} does not exist")]
    NotFound(DemoId),

    #[error("write attempted in a read-only transaction")]
    ReadOnly,

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Factory for transactions against the backing store.
#[async_trait]
pub trait DemoRepository: Send + Sync {
    async fn begin(&self, mode: TxMode) -> Result<Box<dyn DemoTransaction>, RepositoryError>;
}

/// One unit of work. Dropping it without `commit` discards its writes.
#[async_trait]
pub trait DemoTransaction: Send {
    /// Insert when `demo` has no id (the store assigns one), update in place otherwise.
    ///
    /// Updating an id with no row fails with [`RepositoryError::NotFound`].
    async fn save(&mut self, demo: Demo) -> Result<Demo, RepositoryError>;

    /// All rows, ascending id unless `sort` says otherwise.
    async fn find_all(&mut self, sort: Option<Sort>) -> Result<Vec<Demo>, RepositoryError>;

    async fn find_by_id(&mut self, id: DemoId) -> Result<Option<Demo>, RepositoryError>;

    /// Removes the row if present; absent ids are a no-op.
    async fn delete_by_id(&mut self, id: DemoId) -> Result<(), RepositoryError>;

    async fn commit(self: Box<Self>) -> Result<(), RepositoryError>;

    async fn rollback(self: Box<Self>) -> Result<(), RepositoryError>;
}
