//! Synchronization error types.
//!
//! Two of the failure modes described by the engine are deliberately *not*
//! errors: out-of-range geometry is clamped silently, and a viewer outside
//! the permitted list receives a denied view rather than an `Err`.

use thiserror::Error;
use uuid::Uuid;

/// Top-level error type for the scene synchronization engine.
#[derive(Debug, Error)]
pub enum SyncError {
    /// No scene document exists for the session.
    #[error("scene not found for session: {0}")]
    SceneNotFound(String),

    /// No preset exists with the given identifier.
    #[error("preset not found: {0}")]
    PresetNotFound(Uuid),

    /// The document store rejected a read or write. Never retried
    /// automatically; the caller keeps its working copy so the next user
    /// action re-attempts a full write.
    #[error("scene store unavailable: {0}")]
    StoreUnavailable(String),

    /// The ephemeral channel could not be joined. Synchronization degrades
    /// to store snapshots only.
    #[error("ephemeral channel unavailable: {0}")]
    ChannelUnavailable(String),

    /// A validation error in domain logic.
    #[error("validation error: {0}")]
    Validation(String),
}
