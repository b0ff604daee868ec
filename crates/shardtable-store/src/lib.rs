//! Shardtable — scene store adapter.
//!
//! A typed façade over the external key-document store: one scene document
//! per session, whole-document writes, and a change notification stream.
//! The store is a black box to the rest of the engine; everything flows
//! through the [`SceneStore`] trait.

pub mod memory;

use async_trait::async_trait;
use shardtable_core::error::SyncError;
use shardtable_scene::Scene;
use tokio::sync::broadcast;

pub use memory::InMemorySceneStore;

/// Repository trait for loading and saving scene documents.
///
/// Writes are whole-document replacements; the server side performs no
/// field-level merge, so the last write to land wins. Callers never retry a
/// failed save automatically — the in-memory optimistic state is kept so the
/// next user action re-attempts a full write.
#[async_trait]
pub trait SceneStore: Send + Sync {
    /// Loads the scene document for a session.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::SceneNotFound` if no document exists, or
    /// `SyncError::StoreUnavailable` on a read failure.
    async fn load(&self, session_id: &str) -> Result<Scene, SyncError>;

    /// Replaces the scene document for a session.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::StoreUnavailable` on a write failure.
    async fn save(&self, session_id: &str, scene: &Scene) -> Result<(), SyncError>;

    /// Subscribes to committed snapshots for a session.
    ///
    /// Every commit is delivered, including the subscriber's own; the
    /// reconciliation step makes the echo harmless.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::StoreUnavailable` if the notification stream
    /// cannot be established.
    async fn subscribe(&self, session_id: &str) -> Result<broadcast::Receiver<Scene>, SyncError>;
}
