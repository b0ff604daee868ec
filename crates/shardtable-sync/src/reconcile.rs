//! Snapshot and delta merging.

use shardtable_channel::DeltaEnvelope;
use shardtable_core::client::ClientId;
use shardtable_scene::Scene;
use shardtable_scene::geometry::clamp_coord;

use crate::ownership::OwnershipRegistry;

/// Merges an incoming store snapshot into the working copy.
///
/// The result is the incoming snapshot with every locally-owned token and
/// shape replaced by its current working value. Entities deleted remotely
/// disappear even while owned; entities unknown to the working copy adopt
/// the incoming value. All non-entity fields always adopt the incoming
/// value.
#[must_use]
pub fn reconcile_snapshot(
    working: &Scene,
    mut incoming: Scene,
    ownership: &OwnershipRegistry,
    local: ClientId,
) -> Scene {
    for token in &mut incoming.tokens {
        if ownership.is_owned_by(&token.id, local) {
            if let Some(kept) = working.token(&token.id) {
                *token = kept.clone();
            }
        }
    }
    for shape in &mut incoming.shapes {
        if ownership.is_owned_by(&shape.id, local) {
            if let Some(kept) = working.shape(&shape.id) {
                *shape = kept.clone();
            }
        }
    }
    incoming
}

/// Applies a channel delta to the working copy.
///
/// The delta is discarded when it is the local client's own echo, when the
/// target is locally owned (a stale remote echo must not overwrite an
/// in-progress drag), or when the target token is unknown. Returns whether
/// the working copy changed.
pub fn apply_delta(
    working: &mut Scene,
    envelope: &DeltaEnvelope,
    ownership: &OwnershipRegistry,
    local: ClientId,
) -> bool {
    if envelope.sender == local {
        return false;
    }
    let delta = &envelope.delta;
    if ownership.is_owned_by(&delta.token_id, local) {
        return false;
    }
    let Some(token) = working.token_mut(&delta.token_id) else {
        return false;
    };

    token.x = clamp_coord(delta.x);
    token.y = clamp_coord(delta.y);
    if let Some(mirror) = delta.mirror {
        token.mirror = mirror;
    }
    if let Some(rotation) = delta.rotation {
        token.rotation = rotation;
    }
    if let Some(variant) = delta.variant {
        token.variant = variant;
    }
    if let Some(visible) = delta.visible {
        token.visible = visible;
    }
    true
}
