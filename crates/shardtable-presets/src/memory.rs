//! In-memory preset store.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use shardtable_core::error::SyncError;
use uuid::Uuid;

use crate::{PresetStore, ScenePreset};

/// An in-memory `PresetStore` keyed by preset identifier.
#[derive(Debug, Default)]
pub struct InMemoryPresetStore {
    records: RwLock<HashMap<Uuid, ScenePreset>>,
}

impl InMemoryPresetStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PresetStore for InMemoryPresetStore {
    async fn save(&self, preset: &ScenePreset) -> Result<(), SyncError> {
        let mut records = self.records.write().expect("record lock poisoned");
        records.insert(preset.id, preset.clone());
        Ok(())
    }

    async fn list(&self, session_id: &str) -> Result<Vec<ScenePreset>, SyncError> {
        let records = self.records.read().expect("record lock poisoned");
        let mut presets: Vec<ScenePreset> = records
            .values()
            .filter(|p| p.session_id == session_id)
            .cloned()
            .collect();
        presets.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(presets)
    }

    async fn get(&self, id: Uuid) -> Result<ScenePreset, SyncError> {
        let records = self.records.read().expect("record lock poisoned");
        records
            .get(&id)
            .cloned()
            .ok_or(SyncError::PresetNotFound(id))
    }

    async fn delete(&self, id: Uuid) -> Result<(), SyncError> {
        let mut records = self.records.write().expect("record lock poisoned");
        records.remove(&id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use shardtable_scene::Scene;

    fn preset(session_id: &str, name: &str, minute: u32) -> ScenePreset {
        ScenePreset {
            id: Uuid::new_v4(),
            session_id: session_id.to_owned(),
            name: name.to_owned(),
            snapshot: Scene::new("", "ordem"),
            created_at: Utc.with_ymd_and_hms(2026, 8, 29, 21, minute, 0).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_list_filters_by_session_newest_first() {
        let store = InMemoryPresetStore::new();
        store.save(&preset("session-1", "older", 0)).await.unwrap();
        store.save(&preset("session-1", "newer", 5)).await.unwrap();
        store.save(&preset("session-2", "other", 9)).await.unwrap();

        let listed = store.list("session-1").await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].name, "newer");
        assert_eq!(listed[1].name, "older");
    }

    #[tokio::test]
    async fn test_get_missing_is_not_found() {
        let store = InMemoryPresetStore::new();
        let result = store.get(Uuid::new_v4()).await;
        assert!(matches!(result, Err(SyncError::PresetNotFound(_))));
    }
}
