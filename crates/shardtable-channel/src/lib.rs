//! Shardtable — ephemeral delta channel.
//!
//! A per-session publish/subscribe topic carrying fire-and-forget token
//! deltas. Delivery is at-most-once per message and unordered across
//! senders; nothing is persisted, so a client that joins after a message was
//! sent never receives it. The durable scene document is the catch-up
//! mechanism for late joiners.

pub mod delta;
pub mod memory;

use async_trait::async_trait;
use shardtable_core::client::ClientId;
use shardtable_core::error::SyncError;

pub use delta::{DeltaEnvelope, TokenDelta};
pub use memory::InMemoryChannel;

/// A joined per-session topic.
///
/// Publishing is best-effort: a dropped message is never retried, because
/// the next throttled tick or the final release-write corrects any drift.
pub trait ChannelConnection: Send {
    /// Publishes a delta to every other member of the topic.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::ChannelUnavailable` if the topic is gone. Callers
    /// treat this as a silent degradation, not a failure of the drag.
    fn publish(&mut self, delta: &TokenDelta) -> Result<(), SyncError>;

    /// Pulls the next pending delta, if any. Messages lost to lag are
    /// skipped without error.
    fn try_recv(&mut self) -> Option<DeltaEnvelope>;

    /// Leaves the topic.
    fn leave(self: Box<Self>);
}

/// Factory for joining per-session delta topics.
#[async_trait]
pub trait EphemeralChannel: Send + Sync {
    /// Joins the topic for a session.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::ChannelUnavailable` if the topic cannot be
    /// joined; the caller degrades to store-snapshot-only sync.
    async fn join(
        &self,
        session_id: &str,
        client_id: ClientId,
    ) -> Result<Box<dyn ChannelConnection>, SyncError>;
}
