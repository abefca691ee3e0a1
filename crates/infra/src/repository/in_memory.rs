use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use tokio::sync::{Mutex, OwnedMutexGuard};

use msstudy_core::{Demo, DemoId};

use super::sort::{sort_rows, Sort};
use super::{DemoRepository, DemoTransaction, RepositoryError, TxMode};

type Table = BTreeMap<DemoId, Demo>;

/// In-memory demo store.
///
/// Intended for tests/dev. Writers are serialized: a read-write transaction
/// holds the writer lock, edits a private copy of the table and publishes it
/// on commit. Read-only transactions work on the last committed snapshot and
/// never wait for writers.
#[derive(Debug, Default)]
pub struct InMemoryDemoRepository {
    committed: Arc<RwLock<Arc<Table>>>,
    writer: Arc<Mutex<()>>,
    // Like a database sequence: never reused, not rolled back.
    sequence: Arc<AtomicI64>,
}

impl InMemoryDemoRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn snapshot(&self) -> Result<Arc<Table>, RepositoryError> {
        self.committed
            .read()
            .map(|table| Arc::clone(&table))
            .map_err(|_| poisoned())
    }
}

fn poisoned() -> RepositoryError {
    RepositoryError::Unavailable("lock poisoned".to_string())
}

#[async_trait]
impl DemoRepository for InMemoryDemoRepository {
    async fn begin(&self, mode: TxMode) -> Result<Box<dyn DemoTransaction>, RepositoryError> {
        match mode {
            TxMode::ReadOnly => Ok(Box::new(ReadTx {
                snapshot: self.snapshot()?,
            })),
            TxMode::ReadWrite => {
                let guard = Arc::clone(&self.writer).lock_owned().await;
                // Snapshot after acquiring the lock so the previous writer's commit is visible.
                let working = (*self.snapshot()?).clone();
                Ok(Box::new(WriteTx {
                    _writer: guard,
                    working,
                    committed: Arc::clone(&self.committed),
                    sequence: Arc::clone(&self.sequence),
                }))
            }
        }
    }
}

struct ReadTx {
    snapshot: Arc<Table>,
}

#[async_trait]
impl DemoTransaction for ReadTx {
    async fn save(&mut self, _demo: Demo) -> Result<Demo, RepositoryError> {
        Err(RepositoryError::ReadOnly)
    }

    async fn find_all(&mut self, sort: Option<Sort>) -> Result<Vec<Demo>, RepositoryError> {
        let mut rows: Vec<Demo> = self.snapshot.values().cloned().collect();
        sort_rows(&mut rows, sort);
        Ok(rows)
    }

    async fn find_by_id(&mut self, id: DemoId) -> Result<Option<Demo>, RepositoryError> {
        Ok(self.snapshot.get(&id).cloned())
    }

    async fn delete_by_id(&mut self, _id: DemoId) -> Result<(), RepositoryError> {
        Err(RepositoryError::ReadOnly)
    }

    async fn commit(self: Box<Self>) -> Result<(), RepositoryError> {
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<(), RepositoryError> {
        Ok(())
    }
}

struct WriteTx {
    _writer: OwnedMutexGuard<()>,
    working: Table,
    committed: Arc<RwLock<Arc<Table>>>,
    sequence: Arc<AtomicI64>,
}

#[async_trait]
impl DemoTransaction for WriteTx {
    async fn save(&mut self, mut demo: Demo) -> Result<Demo, RepositoryError> {
        let id = match demo.id() {
            Some(id) if self.working.contains_key(&id) => id,
            Some(id) => return Err(RepositoryError::NotFound(id)),
            None => {
                let id = DemoId::from_i64(self.sequence.fetch_add(1, Ordering::SeqCst) + 1);
                demo.set_id(Some(id));
                id
            }
        };
        self.working.insert(id, demo.clone());
        Ok(demo)
    }

    async fn find_all(&mut self, sort: Option<Sort>) -> Result<Vec<Demo>, RepositoryError> {
        let mut rows: Vec<Demo> = self.working.values().cloned().collect();
        sort_rows(&mut rows, sort);
        Ok(rows)
    }

    async fn find_by_id(&mut self, id: DemoId) -> Result<Option<Demo>, RepositoryError> {
        Ok(self.working.get(&id).cloned())
    }

    async fn delete_by_id(&mut self, id: DemoId) -> Result<(), RepositoryError> {
        self.working.remove(&id);
        Ok(())
    }

    async fn commit(self: Box<Self>) -> Result<(), RepositoryError> {
        let WriteTx {
            _writer,
            working,
            committed,
            ..
        } = *self;
        let mut slot = committed.write().map_err(|_| poisoned())?;
        *slot = Arc::new(working);
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<(), RepositoryError> {
        Ok(())
    }
}
