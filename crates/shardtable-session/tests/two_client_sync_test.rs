//! Two-client synchronization flows over a shared store and delta channel.

mod common;

use std::sync::Arc;

use shardtable_session::SceneSession;
use shardtable_store::SceneStore;
use shardtable_test_support::UnreachableChannel;
use shardtable_visibility::Viewer;

#[tokio::test]
async fn test_live_drag_streams_to_other_client_without_store_write() {
    let (store, channel) = common::seeded_infra().await;
    let mut mover = common::connect(&store, &channel, Viewer::participant("char-1")).await;
    let mut watcher = common::connect(&store, &channel, Viewer::director("gm")).await;

    mover.begin_token_drag("char-1").unwrap();
    mover.drag_token_to("char-1", 10.0, 20.0).unwrap();

    assert_eq!(watcher.pump_channel(), 1);
    let seen = watcher.working().token("char-1").unwrap();
    assert_eq!((seen.x, seen.y), (10.0, 20.0));

    // Nothing durable happened yet.
    let stored = store.load(common::SESSION).await.unwrap();
    assert_eq!(stored.token("char-1").unwrap().x, 50.0);
}

#[tokio::test]
async fn test_own_echo_is_discarded() {
    let (store, channel) = common::seeded_infra().await;
    let mut mover = common::connect(&store, &channel, Viewer::director("gm")).await;

    mover.begin_token_drag("char-1").unwrap();
    mover.drag_token_to("char-1", 10.0, 20.0).unwrap();

    assert_eq!(mover.pump_channel(), 0);
}

#[tokio::test]
async fn test_release_write_converges_via_store_subscription() {
    let (store, channel) = common::seeded_infra().await;
    let mut mover = common::connect(&store, &channel, Viewer::director("gm")).await;
    let mut watcher = common::connect(&store, &channel, Viewer::director("gm-2")).await;
    let mut updates = store.subscribe(common::SESSION).await.unwrap();

    mover.begin_token_drag("char-1").unwrap();
    mover.drag_token_to("char-1", 72.0, 18.0).unwrap();
    mover.end_token_drag("char-1").await.unwrap();

    let snapshot = updates.recv().await.unwrap();
    watcher.apply_remote_snapshot(snapshot);

    assert_eq!(watcher.working(), mover.working());
    assert_eq!(watcher.working().token("char-1").unwrap().x, 72.0);
}

#[tokio::test]
async fn test_remote_snapshot_does_not_disturb_local_drag() {
    let (store, channel) = common::seeded_infra().await;
    let mut mover = common::connect(&store, &channel, Viewer::participant("char-1")).await;
    let mut director = common::connect(&store, &channel, Viewer::director("gm")).await;
    let mut updates = store.subscribe(common::SESSION).await.unwrap();

    mover.begin_token_drag("char-1").unwrap();
    mover.drag_token_to("char-1", 90.0, 90.0).unwrap();

    // A concurrent durable change lands mid-drag.
    director.toggle_token_visibility("npc-1").await.unwrap();
    let snapshot = updates.recv().await.unwrap();
    mover.apply_remote_snapshot(snapshot);

    let dragged = mover.working().token("char-1").unwrap();
    assert_eq!((dragged.x, dragged.y), (90.0, 90.0));
    assert!(!mover.working().token("npc-1").unwrap().visible);

    // The release write carries both the drag result and the adopted change.
    mover.end_token_drag("char-1").await.unwrap();
    let stored = store.load(common::SESSION).await.unwrap();
    assert_eq!(stored.token("char-1").unwrap().x, 90.0);
    assert!(!stored.token("npc-1").unwrap().visible);
}

#[tokio::test]
async fn test_concurrent_drags_on_distinct_tokens_converge() {
    let (store, channel) = common::seeded_infra().await;
    let mut player = common::connect(&store, &channel, Viewer::participant("char-1")).await;
    let mut director = common::connect(&store, &channel, Viewer::director("gm")).await;

    player.begin_token_drag("char-1").unwrap();
    player.drag_token_to("char-1", 10.0, 10.0).unwrap();
    director.begin_token_drag("npc-1").unwrap();
    director.drag_token_to("npc-1", 80.0, 80.0).unwrap();

    assert_eq!(player.pump_channel(), 1);
    assert_eq!(director.pump_channel(), 1);

    player.end_token_drag("char-1").await.unwrap();
    director.end_token_drag("npc-1").await.unwrap();

    // Whole-document writes raced, but each working copy had already
    // adopted the other's live position, so the last write holds both.
    let stored = store.load(common::SESSION).await.unwrap();
    assert_eq!(stored.token("char-1").unwrap().x, 10.0);
    assert_eq!(stored.token("npc-1").unwrap().x, 80.0);
}

#[tokio::test]
async fn test_degraded_client_catches_up_from_the_store() {
    let (store, channel) = common::seeded_infra().await;
    let mut mover = common::connect(&store, &channel, Viewer::director("gm")).await;
    let mut degraded = SceneSession::connect(
        Arc::clone(&store) as Arc<dyn SceneStore>,
        &UnreachableChannel,
        common::fixed_clock(),
        common::SESSION,
        Viewer::participant("char-1"),
    )
    .await
    .unwrap();
    let mut updates = store.subscribe(common::SESSION).await.unwrap();

    mover.begin_token_drag("npc-1").unwrap();
    mover.drag_token_to("npc-1", 25.0, 75.0).unwrap();

    // No live positions without a channel.
    assert_eq!(degraded.pump_channel(), 0);
    assert_eq!(degraded.working().token("npc-1").unwrap().x, 50.0);

    mover.end_token_drag("npc-1").await.unwrap();
    degraded.apply_remote_snapshot(updates.recv().await.unwrap());
    assert_eq!(degraded.working().token("npc-1").unwrap().x, 25.0);
}

#[tokio::test]
async fn test_turn_order_changes_reach_other_clients_via_store() {
    let (store, channel) = common::seeded_infra().await;
    let mut director = common::connect(&store, &channel, Viewer::director("gm")).await;
    let mut player = common::connect(&store, &channel, Viewer::participant("char-1")).await;
    let mut updates = store.subscribe(common::SESSION).await.unwrap();

    director.activate_combat().await.unwrap();
    director.add_npc_turn_entry("Wretch", 14).await.unwrap();

    player.apply_remote_snapshot(updates.recv().await.unwrap());
    player.apply_remote_snapshot(updates.recv().await.unwrap());

    assert!(player.working().combat_active);
    assert_eq!(player.working().turn_entries.len(), 1);
    assert_eq!(player.working().turn_entries[0].name, "Wretch");
}
