//! In-memory delta channel.
//!
//! Fan-out over a tokio broadcast channel per session topic. Every member
//! holds an independent receiver; a lagging member silently loses the oldest
//! messages, which matches the at-most-once contract.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use shardtable_core::client::ClientId;
use shardtable_core::error::SyncError;
use tokio::sync::broadcast;

use crate::delta::{DeltaEnvelope, TokenDelta};
use crate::{ChannelConnection, EphemeralChannel};

/// Deltas buffered per member before lag starts dropping the oldest.
const DEFAULT_CAPACITY: usize = 64;

/// An in-memory `EphemeralChannel` with one broadcast topic per session.
#[derive(Debug)]
pub struct InMemoryChannel {
    topics: RwLock<HashMap<String, broadcast::Sender<DeltaEnvelope>>>,
    capacity: usize,
}

impl InMemoryChannel {
    /// Creates a channel with the default per-member buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Creates a channel with an explicit per-member buffer capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            topics: RwLock::new(HashMap::new()),
            capacity,
        }
    }
}

impl Default for InMemoryChannel {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EphemeralChannel for InMemoryChannel {
    async fn join(
        &self,
        session_id: &str,
        client_id: ClientId,
    ) -> Result<Box<dyn ChannelConnection>, SyncError> {
        let sender = {
            let mut topics = self.topics.write().expect("topic lock poisoned");
            topics
                .entry(session_id.to_owned())
                .or_insert_with(|| broadcast::channel(self.capacity).0)
                .clone()
        };
        let receiver = sender.subscribe();
        Ok(Box::new(InMemoryConnection {
            client_id,
            sender,
            receiver,
        }))
    }
}

struct InMemoryConnection {
    client_id: ClientId,
    sender: broadcast::Sender<DeltaEnvelope>,
    receiver: broadcast::Receiver<DeltaEnvelope>,
}

impl ChannelConnection for InMemoryConnection {
    fn publish(&mut self, delta: &TokenDelta) -> Result<(), SyncError> {
        let envelope = DeltaEnvelope {
            sender: self.client_id,
            delta: delta.clone(),
        };
        // Our own receiver keeps the topic alive, so send cannot fail here;
        // receivers drop lagged messages on their side.
        let _ = self.sender.send(envelope);
        Ok(())
    }

    fn try_recv(&mut self) -> Option<DeltaEnvelope> {
        loop {
            match self.receiver.try_recv() {
                Ok(envelope) => return Some(envelope),
                Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                    tracing::debug!(skipped, "delta channel lagged, dropping oldest");
                }
                Err(_) => return None,
            }
        }
    }

    fn leave(self: Box<Self>) {}
}
