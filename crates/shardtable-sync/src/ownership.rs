//! Local manipulation ownership.

use std::collections::HashMap;

use shardtable_core::client::ClientId;
use shardtable_core::error::SyncError;

/// Records which client is currently manipulating which entity.
///
/// This is an explicit ownership token (entity id → owner client id), not a
/// boolean drag flag. The invariant it expresses: at most one manipulator
/// per entity *per client process*. Nothing is enforced across clients —
/// the marker exists purely to suppress self-overwrite during reconciliation.
#[derive(Debug, Default)]
pub struct OwnershipRegistry {
    owners: HashMap<String, ClientId>,
}

impl OwnershipRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims an entity for a client. Re-claiming an entity already held by
    /// the same client is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::Validation` if a different client in this
    /// registry already holds the entity.
    pub fn claim(&mut self, entity_id: &str, client: ClientId) -> Result<(), SyncError> {
        match self.owners.get(entity_id) {
            Some(owner) if *owner != client => Err(SyncError::Validation(format!(
                "entity already under manipulation: {entity_id}"
            ))),
            _ => {
                self.owners.insert(entity_id.to_owned(), client);
                Ok(())
            }
        }
    }

    /// Releases an entity if the client holds it. Returns whether a claim
    /// was released.
    pub fn release(&mut self, entity_id: &str, client: ClientId) -> bool {
        if self.owners.get(entity_id) == Some(&client) {
            self.owners.remove(entity_id);
            true
        } else {
            false
        }
    }

    /// Returns the current owner of an entity, if any.
    #[must_use]
    pub fn owner_of(&self, entity_id: &str) -> Option<ClientId> {
        self.owners.get(entity_id).copied()
    }

    /// Returns whether the given client holds the entity.
    #[must_use]
    pub fn is_owned_by(&self, entity_id: &str, client: ClientId) -> bool {
        self.owner_of(entity_id) == Some(client)
    }
}
