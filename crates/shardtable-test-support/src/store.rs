//! Test scene stores — `SceneStore` doubles for tests.

use std::sync::Mutex;

use async_trait::async_trait;
use shardtable_core::error::SyncError;
use shardtable_scene::Scene;
use shardtable_store::{InMemorySceneStore, SceneStore};
use tokio::sync::broadcast;

/// A scene store that always reports the store as unreachable. Useful for
/// outage-path tests: the caller must keep its working copy and surface the
/// error without retrying.
#[derive(Debug, Default)]
pub struct FailingSceneStore;

#[async_trait]
impl SceneStore for FailingSceneStore {
    async fn load(&self, _session_id: &str) -> Result<Scene, SyncError> {
        Err(SyncError::StoreUnavailable("connection refused".to_owned()))
    }

    async fn save(&self, _session_id: &str, _scene: &Scene) -> Result<(), SyncError> {
        Err(SyncError::StoreUnavailable("connection refused".to_owned()))
    }

    async fn subscribe(
        &self,
        _session_id: &str,
    ) -> Result<broadcast::Receiver<Scene>, SyncError> {
        Err(SyncError::StoreUnavailable("connection refused".to_owned()))
    }
}

/// A store that serves reads normally but rejects every write. Useful for
/// testing the release path when the write fails mid-session.
#[derive(Debug, Default)]
pub struct ReadOnlySceneStore {
    inner: InMemorySceneStore,
}

impl ReadOnlySceneStore {
    /// Creates a read-only store pre-seeded with one scene.
    ///
    /// # Panics
    ///
    /// Panics if seeding the inner store fails, which it cannot.
    pub async fn seeded(session_id: &str, scene: &Scene) -> Self {
        let store = Self::default();
        store.inner.save(session_id, scene).await.unwrap();
        store
    }
}

#[async_trait]
impl SceneStore for ReadOnlySceneStore {
    async fn load(&self, session_id: &str) -> Result<Scene, SyncError> {
        self.inner.load(session_id).await
    }

    async fn save(&self, _session_id: &str, _scene: &Scene) -> Result<(), SyncError> {
        Err(SyncError::StoreUnavailable("write rejected".to_owned()))
    }

    async fn subscribe(&self, session_id: &str) -> Result<broadcast::Receiver<Scene>, SyncError> {
        self.inner.subscribe(session_id).await
    }
}

/// A working in-memory store that additionally records every save, so tests
/// can assert exactly what was written and how many times.
#[derive(Debug, Default)]
pub struct RecordingSceneStore {
    inner: InMemorySceneStore,
    saves: Mutex<Vec<(String, Scene)>>,
}

impl RecordingSceneStore {
    /// Creates an empty recording store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of every `(session_id, scene)` save so far.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn saved(&self) -> Vec<(String, Scene)> {
        self.saves.lock().unwrap().clone()
    }
}

#[async_trait]
impl SceneStore for RecordingSceneStore {
    async fn load(&self, session_id: &str) -> Result<Scene, SyncError> {
        self.inner.load(session_id).await
    }

    async fn save(&self, session_id: &str, scene: &Scene) -> Result<(), SyncError> {
        self.saves
            .lock()
            .unwrap()
            .push((session_id.to_owned(), scene.clone()));
        self.inner.save(session_id, scene).await
    }

    async fn subscribe(&self, session_id: &str) -> Result<broadcast::Receiver<Scene>, SyncError> {
        self.inner.subscribe(session_id).await
    }
}
