//! Shardtable — scene preset manager.
//!
//! Named, timestamped full copies of a scene document for later recall.
//! Presets live in the external store only; restoring one is an ordinary
//! whole-document scene write, so other clients pick it up through the
//! normal store subscription. There is no real-time component.

pub mod memory;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shardtable_core::clock::Clock;
use shardtable_core::error::SyncError;
use shardtable_scene::Scene;
use shardtable_store::SceneStore;
use uuid::Uuid;

pub use memory::InMemoryPresetStore;

/// A named, timestamped full copy of a scene's mutable fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenePreset {
    /// Preset identifier.
    pub id: Uuid,
    /// The session the preset belongs to.
    pub session_id: String,
    /// Display name.
    pub name: String,
    /// The captured scene document.
    pub snapshot: Scene,
    /// When the preset was captured.
    pub created_at: DateTime<Utc>,
}

/// Repository trait for preset records.
#[async_trait]
pub trait PresetStore: Send + Sync {
    /// Persists a preset record.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::StoreUnavailable` on a write failure.
    async fn save(&self, preset: &ScenePreset) -> Result<(), SyncError>;

    /// Lists the presets for a session, newest first.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::StoreUnavailable` on a read failure.
    async fn list(&self, session_id: &str) -> Result<Vec<ScenePreset>, SyncError>;

    /// Fetches one preset by identifier.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::PresetNotFound` if no such preset exists.
    async fn get(&self, id: Uuid) -> Result<ScenePreset, SyncError>;

    /// Deletes a preset record.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::StoreUnavailable` on a write failure.
    async fn delete(&self, id: Uuid) -> Result<(), SyncError>;
}

/// Snapshot/restore façade over the preset and scene stores.
pub struct PresetManager {
    presets: Arc<dyn PresetStore>,
    scenes: Arc<dyn SceneStore>,
    clock: Arc<dyn Clock>,
}

impl PresetManager {
    /// Creates a manager over the given stores.
    pub fn new(
        presets: Arc<dyn PresetStore>,
        scenes: Arc<dyn SceneStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            presets,
            scenes,
            clock,
        }
    }

    /// Captures the given scene as a named preset.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::Validation` for a blank name, or
    /// `SyncError::StoreUnavailable` on a write failure.
    pub async fn save_preset(
        &self,
        session_id: &str,
        name: &str,
        scene: &Scene,
    ) -> Result<ScenePreset, SyncError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(SyncError::Validation("preset name is empty".to_owned()));
        }

        let preset = ScenePreset {
            id: Uuid::new_v4(),
            session_id: session_id.to_owned(),
            name: name.to_owned(),
            snapshot: scene.clone(),
            created_at: self.clock.now(),
        };
        self.presets.save(&preset).await?;
        tracing::info!(session_id, preset = %preset.id, "scene preset saved");
        Ok(preset)
    }

    /// Lists the presets for a session, newest first.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::StoreUnavailable` on a read failure.
    pub async fn list(&self, session_id: &str) -> Result<Vec<ScenePreset>, SyncError> {
        self.presets.list(session_id).await
    }

    /// Restores a preset: writes its snapshot back as the session's durable
    /// scene document and returns the restored scene. Other clients see the
    /// change through the normal store subscription.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::PresetNotFound` if the preset does not exist, or
    /// `SyncError::StoreUnavailable` if the scene write fails.
    pub async fn restore(&self, preset_id: Uuid) -> Result<Scene, SyncError> {
        let preset = self.presets.get(preset_id).await?;
        self.scenes
            .save(&preset.session_id, &preset.snapshot)
            .await?;
        tracing::info!(session_id = %preset.session_id, preset = %preset_id, "scene preset restored");
        Ok(preset.snapshot)
    }

    /// Deletes a preset record.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::StoreUnavailable` on a write failure.
    pub async fn delete(&self, preset_id: Uuid) -> Result<(), SyncError> {
        self.presets.delete(preset_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use shardtable_store::InMemorySceneStore;
    use shardtable_test_support::FixedClock;

    fn manager() -> (PresetManager, Arc<InMemorySceneStore>) {
        let scenes = Arc::new(InMemorySceneStore::new());
        let clock = FixedClock(Utc.with_ymd_and_hms(2026, 8, 29, 21, 0, 0).unwrap());
        let manager = PresetManager::new(
            Arc::new(InMemoryPresetStore::new()),
            Arc::clone(&scenes) as Arc<dyn SceneStore>,
            Arc::new(clock),
        );
        (manager, scenes)
    }

    #[tokio::test]
    async fn test_save_preset_captures_snapshot_and_timestamp() {
        let (manager, _) = manager();
        let scene = Scene::new("maps/crypt.png", "ordem");

        let preset = manager
            .save_preset("session-1", "Crypt ambush", &scene)
            .await
            .unwrap();
        assert_eq!(preset.snapshot, scene);
        assert_eq!(
            preset.created_at,
            Utc.with_ymd_and_hms(2026, 8, 29, 21, 0, 0).unwrap()
        );
    }

    #[tokio::test]
    async fn test_blank_name_is_rejected() {
        let (manager, _) = manager();
        let scene = Scene::new("", "ordem");
        let result = manager.save_preset("session-1", "   ", &scene).await;
        assert!(matches!(result, Err(SyncError::Validation(_))));
    }

    #[tokio::test]
    async fn test_restore_writes_snapshot_as_durable_scene() {
        let (manager, scenes) = manager();
        let scene = Scene::new("maps/crypt.png", "ordem");
        let preset = manager
            .save_preset("session-1", "Crypt ambush", &scene)
            .await
            .unwrap();

        let restored = manager.restore(preset.id).await.unwrap();
        assert_eq!(restored, scene);
        assert_eq!(scenes.load("session-1").await.unwrap(), scene);
    }

    #[tokio::test]
    async fn test_restore_missing_preset_fails() {
        let (manager, _) = manager();
        let result = manager.restore(Uuid::new_v4()).await;
        assert!(matches!(result, Err(SyncError::PresetNotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_removes_from_listing() {
        let (manager, _) = manager();
        let scene = Scene::new("", "ordem");
        let preset = manager
            .save_preset("session-1", "One", &scene)
            .await
            .unwrap();

        manager.delete(preset.id).await.unwrap();
        assert!(manager.list("session-1").await.unwrap().is_empty());
    }
}
