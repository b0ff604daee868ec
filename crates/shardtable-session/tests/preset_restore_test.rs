//! Preset capture and restore across connected clients.

mod common;

use std::sync::Arc;

use shardtable_presets::{InMemoryPresetStore, PresetManager};
use shardtable_store::SceneStore;
use shardtable_visibility::Viewer;

#[tokio::test]
async fn test_restore_overwrites_later_edits() {
    let (store, channel) = common::seeded_infra().await;
    let mut director = common::connect(&store, &channel, Viewer::director("gm")).await;
    let manager = PresetManager::new(
        Arc::new(InMemoryPresetStore::new()),
        Arc::clone(&store) as Arc<dyn SceneStore>,
        common::fixed_clock(),
    );

    let preset = manager
        .save_preset(common::SESSION, "Ambush setup", director.working())
        .await
        .unwrap();

    director.set_background("maps/vault.png").await.unwrap();
    director.remove_token("npc-1").await.unwrap();

    let restored = manager.restore(preset.id).await.unwrap();
    assert_eq!(restored.background_ref, "maps/crypt.png");

    let stored = store.load(common::SESSION).await.unwrap();
    assert_eq!(stored, preset.snapshot);
    assert!(stored.token("npc-1").is_some());
}

#[tokio::test]
async fn test_restore_propagates_through_store_subscription() {
    let (store, channel) = common::seeded_infra().await;
    let director = common::connect(&store, &channel, Viewer::director("gm")).await;
    let mut watcher = common::connect(&store, &channel, Viewer::participant("char-1")).await;
    let manager = PresetManager::new(
        Arc::new(InMemoryPresetStore::new()),
        Arc::clone(&store) as Arc<dyn SceneStore>,
        common::fixed_clock(),
    );

    let preset = manager
        .save_preset(common::SESSION, "Ambush setup", director.working())
        .await
        .unwrap();

    let mut updates = store.subscribe(common::SESSION).await.unwrap();
    manager.restore(preset.id).await.unwrap();

    watcher.apply_remote_snapshot(updates.recv().await.unwrap());
    assert_eq!(watcher.working(), &preset.snapshot);
}
