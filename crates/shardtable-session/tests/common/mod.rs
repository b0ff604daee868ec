//! Shared fixtures for multi-client synchronization tests.

use std::sync::Arc;

use chrono::TimeZone;
use shardtable_channel::InMemoryChannel;
use shardtable_scene::{OccludingShape, Scene, Token};
use shardtable_session::SceneSession;
use shardtable_store::{InMemorySceneStore, SceneStore};
use shardtable_test_support::FixedClock;
use shardtable_visibility::Viewer;

pub const SESSION: &str = "session-1";

pub fn sample_scene() -> Scene {
    let mut scene = Scene::new("maps/crypt.png", "ordem");
    scene
        .add_token(Token::participant("char-1", "Ana", "ana.png"))
        .unwrap();
    scene
        .add_token(Token::npc("npc-1", "Wretch", "wretch.png", true))
        .unwrap();
    scene.add_shape(OccludingShape::spawn("fog-1")).unwrap();
    scene.grant_viewer("char-1");
    scene
}

pub fn fixed_clock() -> Arc<FixedClock> {
    Arc::new(FixedClock(
        chrono::Utc.with_ymd_and_hms(2026, 1, 10, 20, 0, 0).unwrap(),
    ))
}

/// Builds a seeded store and a shared channel for a two-client scenario.
pub async fn seeded_infra() -> (Arc<InMemorySceneStore>, Arc<InMemoryChannel>) {
    let store = Arc::new(InMemorySceneStore::new());
    store.save(SESSION, &sample_scene()).await.unwrap();
    (store, Arc::new(InMemoryChannel::new()))
}

pub async fn connect(
    store: &Arc<InMemorySceneStore>,
    channel: &InMemoryChannel,
    viewer: Viewer,
) -> SceneSession {
    SceneSession::connect(
        Arc::clone(store) as Arc<dyn SceneStore>,
        channel,
        fixed_clock(),
        SESSION,
        viewer,
    )
    .await
    .unwrap()
}
