//! Test channels — `EphemeralChannel` doubles for tests.

use async_trait::async_trait;
use shardtable_channel::{ChannelConnection, EphemeralChannel};
use shardtable_core::client::ClientId;
use shardtable_core::error::SyncError;

/// A channel that can never be joined. Sessions built over it must degrade
/// to store-snapshot-only synchronization.
#[derive(Debug, Default)]
pub struct UnreachableChannel;

#[async_trait]
impl EphemeralChannel for UnreachableChannel {
    async fn join(
        &self,
        _session_id: &str,
        _client_id: ClientId,
    ) -> Result<Box<dyn ChannelConnection>, SyncError> {
        Err(SyncError::ChannelUnavailable("no route to relay".to_owned()))
    }
}
