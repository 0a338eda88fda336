//! Snapshot persistence: backends, debounced flusher and startup restore

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use redis::{AsyncCommands, Client};
use tokio::{
    sync::{oneshot, watch, Mutex},
    task::JoinHandle,
};

use crate::{
    config::{StorageBackend, StorageConfig},
    error::{AppError, AppResult},
    models::snapshot::Snapshot,
    repository::{Repository, SharedRepository},
};

/// Key/value slot holding the serialized application snapshot
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Read the snapshot, `None` if nothing was ever saved
    async fn load(&self) -> AppResult<Option<Snapshot>>;

    /// Overwrite the snapshot
    async fn save(&self, snapshot: &Snapshot) -> AppResult<()>;
}

/// Snapshot kept as one JSON string under a fixed Redis key
#[derive(Clone)]
pub struct RedisSnapshotStore {
    client: Client,
    key: String,
}

impl RedisSnapshotStore {
    /// Create the client. No connection is made until first use.
    pub fn new(url: &str, key: &str) -> AppResult<Self> {
        let client = Client::open(url)
            .map_err(|e| AppError::Storage(format!("Failed to create Redis client: {}", e)))?;

        Ok(Self {
            client,
            key: key.to_string(),
        })
    }

    /// Check the server answers
    pub async fn ping(&self) -> AppResult<()> {
        let mut conn = self
            .client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| AppError::Storage(format!("Failed to connect to Redis: {}", e)))?;

        redis::cmd("PING")
            .query_async::<_, String>(&mut conn)
            .await
            .map_err(|e| AppError::Storage(format!("Redis connection test failed: {}", e)))?;
        Ok(())
    }
}

#[async_trait]
impl SnapshotStore for RedisSnapshotStore {
    async fn load(&self) -> AppResult<Option<Snapshot>> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let raw: Option<String> = conn.get(&self.key).await?;
        raw.map(|json| serde_json::from_str(&json))
            .transpose()
            .map_err(AppError::from)
    }

    async fn save(&self, snapshot: &Snapshot) -> AppResult<()> {
        let json = serde_json::to_string(snapshot)?;
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        conn.set::<_, _, ()>(&self.key, json).await?;
        Ok(())
    }
}

/// In-process snapshot slot for development and tests
#[derive(Default)]
pub struct MemorySnapshotStore {
    slot: Mutex<Option<String>>,
}

impl MemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store raw JSON, bypassing serialization
    pub async fn put_raw(&self, json: impl Into<String>) {
        *self.slot.lock().await = Some(json.into());
    }
}

#[async_trait]
impl SnapshotStore for MemorySnapshotStore {
    async fn load(&self) -> AppResult<Option<Snapshot>> {
        let slot = self.slot.lock().await;
        slot.as_deref()
            .map(serde_json::from_str)
            .transpose()
            .map_err(AppError::from)
    }

    async fn save(&self, snapshot: &Snapshot) -> AppResult<()> {
        let json = serde_json::to_string(snapshot)?;
        *self.slot.lock().await = Some(json);
        Ok(())
    }
}

/// Open the backend selected in the configuration.
///
/// An unreachable Redis server is not fatal: the restore falls back to seed
/// data and the flusher keeps trying on later changes.
pub async fn open_store(config: &StorageConfig) -> AppResult<Arc<dyn SnapshotStore>> {
    match config.backend {
        StorageBackend::Redis => {
            let store = RedisSnapshotStore::new(&config.redis_url, &config.snapshot_key)?;
            match store.ping().await {
                Ok(()) => {
                    tracing::info!(key = %config.snapshot_key, "Using Redis snapshot store")
                }
                Err(e) => tracing::warn!(
                    error = %e,
                    key = %config.snapshot_key,
                    "Redis snapshot store unreachable, continuing without saved state"
                ),
            }
            Ok(Arc::new(store))
        }
        StorageBackend::Memory => {
            tracing::info!("Using in-memory snapshot store, state is lost on exit");
            Ok(Arc::new(MemorySnapshotStore::new()))
        }
    }
}

/// Where the state came from at startup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestoreOutcome {
    Snapshot,
    Seed,
}

#[derive(Clone)]
pub struct PersistenceService {
    store: Arc<dyn SnapshotStore>,
    repository: SharedRepository,
    debounce: Duration,
    load_delay: Duration,
}

impl PersistenceService {
    pub fn new(
        store: Arc<dyn SnapshotStore>,
        repository: SharedRepository,
        debounce: Duration,
        load_delay: Duration,
    ) -> Self {
        Self {
            store,
            repository,
            debounce,
            load_delay,
        }
    }

    pub fn from_config(
        store: Arc<dyn SnapshotStore>,
        repository: SharedRepository,
        config: &StorageConfig,
    ) -> Self {
        Self::new(
            store,
            repository,
            Duration::from_millis(config.flush_debounce_ms),
            Duration::from_millis(config.load_delay_ms),
        )
    }

    /// Load the saved state into the shared repository.
    ///
    /// Read failures are not fatal: the service starts from `seed`.
    pub async fn restore(&self, seed: Repository) -> RestoreOutcome {
        if !self.load_delay.is_zero() {
            tokio::time::sleep(self.load_delay).await;
        }

        let (repository, outcome) = match self.store.load().await {
            Ok(Some(snapshot)) => {
                tracing::info!(
                    loans = snapshot.loans.len(),
                    updated_at = %snapshot.updated_at,
                    "Restored snapshot"
                );
                (Repository::from_snapshot(snapshot, seed), RestoreOutcome::Snapshot)
            }
            Ok(None) => {
                tracing::info!("No snapshot found, starting from seed data");
                (seed, RestoreOutcome::Seed)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read snapshot, starting from seed data");
                (seed, RestoreOutcome::Seed)
            }
        };

        self.repository.replace(repository).await;
        outcome
    }

    /// Write the current state right away
    pub async fn flush(&self) -> AppResult<()> {
        let snapshot = self.repository.snapshot().await;
        self.store.save(&snapshot).await?;
        tracing::debug!(loans = snapshot.loans.len(), "Snapshot written");
        Ok(())
    }

    /// Start the background writer. Each burst of changes is written once,
    /// after `debounce` without further changes.
    pub fn spawn_flusher(&self) -> FlusherHandle {
        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        // Baseline taken here: changes made before the task first runs still count
        let changes = self.repository.subscribe();
        let saved = self.repository.generation();
        let service = self.clone();
        let task = tokio::spawn(async move { service.run_flusher(changes, saved, shutdown_rx).await });
        FlusherHandle {
            shutdown: shutdown_tx,
            task,
        }
    }

    async fn run_flusher(
        self,
        mut changes: watch::Receiver<u64>,
        mut saved: u64,
        mut shutdown: oneshot::Receiver<()>,
    ) {
        'run: loop {
            tokio::select! {
                changed = changes.changed() => {
                    if changed.is_err() {
                        break 'run;
                    }
                }
                _ = &mut shutdown => break 'run,
            }

            // Any change inside the window starts it again
            loop {
                tokio::select! {
                    changed = changes.changed() => {
                        if changed.is_err() {
                            break 'run;
                        }
                    }
                    _ = tokio::time::sleep(self.debounce) => break,
                    _ = &mut shutdown => break 'run,
                }
            }

            self.flush_pending(&mut saved).await;
        }

        self.flush_pending(&mut saved).await;
        tracing::debug!("Snapshot flusher stopped");
    }

    /// Write the state if it changed since the last successful write.
    /// A failed write is retried with the next change.
    async fn flush_pending(&self, saved: &mut u64) {
        let generation = self.repository.generation();
        if generation == *saved {
            return;
        }
        match self.flush().await {
            Ok(()) => *saved = generation,
            Err(e) => tracing::warn!(error = %e, "Failed to write snapshot"),
        }
    }
}

/// Running flusher task
pub struct FlusherHandle {
    shutdown: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

impl FlusherHandle {
    /// Stop the flusher after a final write of pending changes
    pub async fn shutdown(self) {
        let _ = self.shutdown.send(());
        if let Err(e) = self.task.await {
            tracing::error!(error = %e, "Snapshot flusher panicked");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::{enums::LoanStatus, item::seed_items, loan::fixtures::loan},
        repository::items::ItemStore,
    };
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn seed() -> Repository {
        Repository {
            items: ItemStore::from_items(seed_items()),
            ..Default::default()
        }
    }

    fn service(store: Arc<dyn SnapshotStore>, repository: SharedRepository) -> PersistenceService {
        PersistenceService::new(store, repository, Duration::from_millis(2000), Duration::ZERO)
    }

    async fn take_one(repository: &SharedRepository) {
        repository
            .transaction(|repo| repo.items.adjust_availability("1", -1).map(|_| ()))
            .await
            .unwrap();
    }

    fn counting_store(saves: Arc<AtomicUsize>) -> MockSnapshotStore {
        let mut store = MockSnapshotStore::new();
        store.expect_save().returning(move |_| {
            saves.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });
        store
    }

    #[tokio::test]
    async fn test_restore_falls_back_to_seed_on_read_error() {
        let mut store = MockSnapshotStore::new();
        store
            .expect_load()
            .times(1)
            .returning(|| Err(AppError::Storage("connection refused".into())));

        let repository = SharedRepository::new(Repository::default());
        let outcome = service(Arc::new(store), repository.clone()).restore(seed()).await;

        assert_eq!(outcome, RestoreOutcome::Seed);
        assert_eq!(repository.read(|repo| repo.items.len()).await, 5);
        assert_eq!(repository.generation(), 0);
    }

    #[tokio::test]
    async fn test_unreachable_redis_starts_from_seed() {
        let config = StorageConfig {
            backend: StorageBackend::Redis,
            redis_url: "redis://127.0.0.1:1".to_string(),
            ..Default::default()
        };
        let store = open_store(&config).await.unwrap();

        let repository = SharedRepository::new(Repository::default());
        let outcome = service(store, repository.clone()).restore(seed()).await;
        assert_eq!(outcome, RestoreOutcome::Seed);
        assert_eq!(repository.read(|repo| repo.items.len()).await, 5);
    }

    #[tokio::test]
    async fn test_malformed_redis_url_is_rejected() {
        let config = StorageConfig {
            backend: StorageBackend::Redis,
            redis_url: "not a url".to_string(),
            ..Default::default()
        };
        assert!(matches!(open_store(&config).await, Err(AppError::Storage(_))));
    }

    #[tokio::test]
    async fn test_restore_falls_back_to_seed_on_garbage() {
        let store = Arc::new(MemorySnapshotStore::new());
        store.put_raw("{not json").await;

        let repository = SharedRepository::new(Repository::default());
        let outcome = service(store, repository.clone()).restore(seed()).await;
        assert_eq!(outcome, RestoreOutcome::Seed);
    }

    #[tokio::test]
    async fn test_flush_then_restore_round_trips() {
        let store: Arc<dyn SnapshotStore> = Arc::new(MemorySnapshotStore::new());
        let mut state = seed();
        state.loans.append(loan("TRX000001", "1", "a@x.com", LoanStatus::Verified));
        state.items.adjust_availability("5", -2).unwrap();
        let original = SharedRepository::new(state);
        service(store.clone(), original).flush().await.unwrap();

        let restored = SharedRepository::new(Repository::default());
        let outcome = service(store, restored.clone()).restore(Repository::default()).await;

        assert_eq!(outcome, RestoreOutcome::Snapshot);
        let (loans, available) = restored
            .read(|repo| {
                (
                    repo.loans.len(),
                    repo.items.get("5").map(|i| i.available_quantity).ok(),
                )
            })
            .await;
        assert_eq!(loans, 1);
        assert_eq!(available, Some(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_of_changes_is_written_once() {
        let saves = Arc::new(AtomicUsize::new(0));
        let repository = SharedRepository::new(seed());
        let persistence = service(Arc::new(counting_store(saves.clone())), repository.clone());
        let flusher = persistence.spawn_flusher();

        for _ in 0..3 {
            take_one(&repository).await;
            tokio::time::sleep(Duration::from_millis(500)).await;
        }
        assert_eq!(saves.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_millis(2100)).await;
        assert_eq!(saves.load(Ordering::SeqCst), 1);

        flusher.shutdown().await;
        assert_eq!(saves.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_change_before_flusher_first_runs_is_written() {
        let saves = Arc::new(AtomicUsize::new(0));
        let repository = SharedRepository::new(seed());
        let persistence = service(Arc::new(counting_store(saves.clone())), repository.clone());
        let flusher = persistence.spawn_flusher();

        // The flusher task has not been polled yet
        take_one(&repository).await;

        tokio::time::sleep(Duration::from_millis(2500)).await;
        assert_eq!(saves.load(Ordering::SeqCst), 1);

        flusher.shutdown().await;
        assert_eq!(saves.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_writes_pending_changes() {
        let saves = Arc::new(AtomicUsize::new(0));
        let repository = SharedRepository::new(seed());
        let persistence = service(Arc::new(counting_store(saves.clone())), repository.clone());
        let flusher = persistence.spawn_flusher();

        take_one(&repository).await;
        tokio::time::sleep(Duration::from_millis(100)).await;
        flusher.shutdown().await;

        assert_eq!(saves.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_write_is_retried_on_next_change() {
        let attempts = Arc::new(AtomicUsize::new(0));
        let counter = attempts.clone();
        let mut store = MockSnapshotStore::new();
        store.expect_save().returning(move |_| {
            if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                Err(AppError::Storage("disk full".into()))
            } else {
                Ok(())
            }
        });

        let repository = SharedRepository::new(seed());
        let flusher = service(Arc::new(store), repository.clone()).spawn_flusher();

        take_one(&repository).await;
        tokio::time::sleep(Duration::from_millis(2500)).await;
        assert_eq!(attempts.load(Ordering::SeqCst), 1);

        // Nothing new: no retry yet
        tokio::time::sleep(Duration::from_millis(5000)).await;
        assert_eq!(attempts.load(Ordering::SeqCst), 1);

        take_one(&repository).await;
        tokio::time::sleep(Duration::from_millis(2500)).await;
        assert_eq!(attempts.load(Ordering::SeqCst), 2);

        flusher.shutdown().await;
        assert_eq!(attempts.load(Ordering::SeqCst), 2);
    }
}
