//! In-memory scene store.
//!
//! Stands in for the external document store during development and in
//! tests. Change notifications fan out over a per-session broadcast
//! channel, mirroring the substrate's update-notification feed.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use shardtable_core::error::SyncError;
use shardtable_scene::Scene;
use tokio::sync::broadcast;

use crate::SceneStore;

/// Buffered snapshots per subscriber before a lagging reader drops old ones.
const NOTIFY_BUFFER: usize = 16;

/// An in-memory `SceneStore` holding one document per session.
#[derive(Debug, Default)]
pub struct InMemorySceneStore {
    documents: RwLock<HashMap<String, Scene>>,
    notifiers: RwLock<HashMap<String, broadcast::Sender<Scene>>>,
}

impl InMemorySceneStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn notifier(&self, session_id: &str) -> broadcast::Sender<Scene> {
        let mut notifiers = self.notifiers.write().expect("notifier lock poisoned");
        notifiers
            .entry(session_id.to_owned())
            .or_insert_with(|| broadcast::channel(NOTIFY_BUFFER).0)
            .clone()
    }
}

#[async_trait]
impl SceneStore for InMemorySceneStore {
    async fn load(&self, session_id: &str) -> Result<Scene, SyncError> {
        let documents = self.documents.read().expect("document lock poisoned");
        documents
            .get(session_id)
            .cloned()
            .ok_or_else(|| SyncError::SceneNotFound(session_id.to_owned()))
    }

    async fn save(&self, session_id: &str, scene: &Scene) -> Result<(), SyncError> {
        {
            let mut documents = self.documents.write().expect("document lock poisoned");
            documents.insert(session_id.to_owned(), scene.clone());
        }
        // No subscribers yet is fine; the send result only reports that.
        let _ = self.notifier(session_id).send(scene.clone());
        tracing::debug!(session_id, "scene document committed");
        Ok(())
    }

    async fn subscribe(&self, session_id: &str) -> Result<broadcast::Receiver<Scene>, SyncError> {
        Ok(self.notifier(session_id).subscribe())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_load_missing_session_is_not_found() {
        let store = InMemorySceneStore::new();
        let result = store.load("session-1").await;
        assert!(matches!(result, Err(SyncError::SceneNotFound(_))));
    }

    #[tokio::test]
    async fn test_save_then_load_round_trips() {
        let store = InMemorySceneStore::new();
        let scene = Scene::new("maps/a.png", "ordem");
        store.save("session-1", &scene).await.unwrap();
        assert_eq!(store.load("session-1").await.unwrap(), scene);
    }

    #[tokio::test]
    async fn test_save_notifies_subscribers() {
        let store = InMemorySceneStore::new();
        let mut rx = store.subscribe("session-1").await.unwrap();

        let scene = Scene::new("maps/a.png", "ordem");
        store.save("session-1", &scene).await.unwrap();

        assert_eq!(rx.recv().await.unwrap(), scene);
    }

    #[tokio::test]
    async fn test_subscriber_sees_other_writers_commits() {
        let store = InMemorySceneStore::new();
        store
            .save("session-1", &Scene::new("maps/a.png", "ordem"))
            .await
            .unwrap();

        let mut rx = store.subscribe("session-1").await.unwrap();
        let updated = Scene::new("maps/b.png", "ordem");
        store.save("session-1", &updated).await.unwrap();

        assert_eq!(rx.recv().await.unwrap().background_ref, "maps/b.png");
    }
}
