//! In-memory application state

pub mod items;
pub mod loans;
pub mod users;

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::{watch, RwLock};

use crate::{
    error::AppResult,
    models::{settings::SystemConfig, snapshot::Snapshot},
};

/// All records of the application
#[derive(Debug, Clone, Default)]
pub struct Repository {
    pub items: items::ItemStore,
    pub loans: loans::LoanStore,
    pub users: users::UserStore,
    pub config: SystemConfig,
}

impl Repository {
    /// Build the state described by `snapshot`. Sections absent from the
    /// snapshot are taken from `seed`.
    pub fn from_snapshot(snapshot: Snapshot, seed: Repository) -> Self {
        Self {
            items: snapshot
                .items
                .map(items::ItemStore::from_items)
                .unwrap_or(seed.items),
            loans: loans::LoanStore::from_loans(snapshot.loans),
            users: snapshot
                .users
                .map(users::UserStore::from_users)
                .unwrap_or(seed.users),
            config: snapshot.config.unwrap_or(seed.config),
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            items: Some(self.items.to_vec()),
            loans: self.loans.to_vec(),
            users: Some(self.users.to_vec()),
            config: Some(self.config.clone()),
            updated_at: Utc::now(),
        }
    }
}

/// Handle to the application state shared by all services.
///
/// Every mutation runs inside one write-lock scope. Successful mutations bump
/// a change counter that the persistence flusher watches.
#[derive(Clone)]
pub struct SharedRepository {
    inner: Arc<RwLock<Repository>>,
    changes: Arc<watch::Sender<u64>>,
}

impl SharedRepository {
    pub fn new(repository: Repository) -> Self {
        let (changes, _) = watch::channel(0);
        Self {
            inner: Arc::new(RwLock::new(repository)),
            changes: Arc::new(changes),
        }
    }

    /// Run `f` with shared access to the state
    pub async fn read<F, T>(&self, f: F) -> T
    where
        F: FnOnce(&Repository) -> T,
    {
        let guard = self.inner.read().await;
        f(&*guard)
    }

    /// Run `f` with exclusive access to the state and mark it changed if it
    /// succeeds. `f` must validate before mutating.
    pub async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: FnOnce(&mut Repository) -> AppResult<T>,
    {
        let mut guard = self.inner.write().await;
        let result = f(&mut *guard)?;
        drop(guard);
        self.mark_changed();
        Ok(result)
    }

    /// Swap in a whole new state without marking it changed
    pub async fn replace(&self, repository: Repository) {
        *self.inner.write().await = repository;
    }

    pub async fn snapshot(&self) -> Snapshot {
        self.inner.read().await.snapshot()
    }

    /// Receiver notified after every successful transaction
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.changes.subscribe()
    }

    /// Number of successful transactions so far
    pub fn generation(&self) -> u64 {
        *self.changes.borrow()
    }

    fn mark_changed(&self) {
        self.changes.send_modify(|generation| *generation += 1);
    }
}
