//! Transaction-scoped façade over [`DemoRepository`].
//!
//! Writes (`save`, `delete`) run in a read-write transaction that is committed
//! on success and rolled back on failure. Reads (`find_all`, `find_one`) run
//! in a read-only transaction. Errors from the repository propagate unchanged.

use std::sync::Arc;

use msstudy_core::{Demo, DemoId};

use crate::repository::{DemoRepository, DemoTransaction, RepositoryError, Sort, TxMode};

/// Service for managing `Demo` rows.
#[derive(Clone)]
pub struct DemoService {
    repository: Arc<dyn DemoRepository>,
}

impl DemoService {
    pub fn new(repository: Arc<dyn DemoRepository>) -> Self {
        Self { repository }
    }

    /// Insert or update a demo; returns the persisted row.
    pub async fn save(&self, demo: Demo) -> Result<Demo, RepositoryError> {
        tracing::debug!("Request to save Demo : {demo}");
        let mut tx = self.repository.begin(TxMode::ReadWrite).await?;
        match tx.save(demo).await {
            Ok(saved) => {
                tx.commit().await?;
                Ok(saved)
            }
            Err(e) => Err(abort(tx, e).await),
        }
    }

    pub async fn find_all(&self, sort: Option<Sort>) -> Result<Vec<Demo>, RepositoryError> {
        tracing::debug!("Request to get all Demos");
        let mut tx = self.repository.begin(TxMode::ReadOnly).await?;
        let demos = tx.find_all(sort).await?;
        tx.commit().await?;
        Ok(demos)
    }

    pub async fn find_one(&self, id: DemoId) -> Result<Option<Demo>, RepositoryError> {
        tracing::debug!("Request to get Demo : {id}");
        let mut tx = self.repository.begin(TxMode::ReadOnly).await?;
        let demo = tx.find_by_id(id).await?;
        tx.commit().await?;
        Ok(demo)
    }

    /// Delete by id. Absent ids are not an error.
    pub async fn delete(&self, id: DemoId) -> Result<(), RepositoryError> {
        tracing::debug!("Request to delete Demo : {id}");
        let mut tx = self.repository.begin(TxMode::ReadWrite).await?;
        match tx.delete_by_id(id).await {
            Ok(()) => tx.commit().await,
            Err(e) => Err(abort(tx, e).await),
        }
    }
}

/// Roll back after a failed write and hand back the original error.
async fn abort(tx: Box<dyn DemoTransaction>, err: RepositoryError) -> RepositoryError {
    if let Err(rollback_err) = tx.rollback().await {
        tracing::warn!("rollback failed after {err}: {rollback_err}");
    }
    err
}
