//! The per-client scene session.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use shardtable_channel::{ChannelConnection, EphemeralChannel, TokenDelta};
use shardtable_core::client::ClientId;
use shardtable_core::clock::Clock;
use shardtable_core::error::SyncError;
use shardtable_core::rng::RandomSource;
use shardtable_scene::geometry::{clamp_coord, clamp_scale, clamp_span};
use shardtable_scene::{OccludingShape, Scene, Token, TurnEntry};
use shardtable_store::SceneStore;
use shardtable_sync::{OwnershipRegistry, apply_delta, reconcile_snapshot};
use shardtable_turn_order::{InitiativeProfile, ReorderDirection};
use shardtable_visibility::{SceneView, Viewer, ViewerRole, view_for};
use uuid::Uuid;

/// Degrees added or removed per rotation step.
pub const ROTATION_STEP_DEGREES: f64 = 15.0;

/// Minimum spacing between outbound deltas for an actively-dragged token.
const BROADCAST_INTERVAL_MS: i64 = 40;

/// Direction of one rotation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationDirection {
    /// Positive degrees.
    Clockwise,
    /// Negative degrees.
    CounterClockwise,
}

/// One client's live connection to a session's scene.
///
/// The session keeps an optimistic working copy: local manipulation updates
/// it immediately, remote snapshots and deltas are merged through the
/// reconciliation engine, and releases commit the whole document back to the
/// store. A failed commit leaves the working copy intact so the next user
/// action re-attempts a full write.
pub struct SceneSession {
    session_id: String,
    client_id: ClientId,
    viewer: Viewer,
    store: Arc<dyn SceneStore>,
    connection: Option<Box<dyn ChannelConnection>>,
    clock: Arc<dyn Clock>,
    working: Scene,
    ownership: OwnershipRegistry,
    last_broadcast_at: HashMap<String, DateTime<Utc>>,
}

impl SceneSession {
    /// Connects to a session: loads the durable scene (the catch-up path for
    /// late joiners) and joins the delta topic. A channel failure is not
    /// fatal — the session degrades to store-snapshot-only sync.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::SceneNotFound` or `SyncError::StoreUnavailable`
    /// if the durable scene cannot be loaded.
    pub async fn connect(
        store: Arc<dyn SceneStore>,
        channel: &dyn EphemeralChannel,
        clock: Arc<dyn Clock>,
        session_id: impl Into<String>,
        viewer: Viewer,
    ) -> Result<Self, SyncError> {
        let session_id = session_id.into();
        let client_id = ClientId::new();
        let working = store.load(&session_id).await?;

        let connection = match channel.join(&session_id, client_id).await {
            Ok(connection) => Some(connection),
            Err(error) => {
                tracing::warn!(%error, %session_id, "channel join failed, store-only sync");
                None
            }
        };

        tracing::debug!(%session_id, %client_id, "scene session connected");
        Ok(Self {
            session_id,
            client_id,
            viewer,
            store,
            connection,
            clock,
            working,
            ownership: OwnershipRegistry::new(),
            last_broadcast_at: HashMap::new(),
        })
    }

    /// The local client identity.
    #[must_use]
    pub fn client_id(&self) -> ClientId {
        self.client_id
    }

    /// The current working copy.
    #[must_use]
    pub fn working(&self) -> &Scene {
        &self.working
    }

    /// The working copy filtered for this session's viewer.
    #[must_use]
    pub fn view(&self) -> SceneView {
        view_for(&self.working, &self.viewer)
    }

    /// Whether the local client currently holds the entity.
    #[must_use]
    pub fn owns(&self, entity_id: &str) -> bool {
        self.ownership.is_owned_by(entity_id, self.client_id)
    }

    /// Writes the working copy to the store as a whole-document replacement.
    ///
    /// Never retried automatically: on failure the error surfaces to the
    /// caller and the working copy is kept, so a later user action (or an
    /// explicit call to this method) re-attempts the write.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::StoreUnavailable` on a write failure.
    pub async fn commit(&mut self) -> Result<(), SyncError> {
        if let Err(error) = self.store.save(&self.session_id, &self.working).await {
            tracing::warn!(%error, session_id = %self.session_id, "scene commit failed");
            return Err(error);
        }
        Ok(())
    }

    // --- inbound synchronization ---

    /// Merges a snapshot delivered by the store subscription.
    pub fn apply_remote_snapshot(&mut self, incoming: Scene) {
        self.working =
            reconcile_snapshot(&self.working, incoming, &self.ownership, self.client_id);
    }

    /// Drains pending channel deltas into the working copy. Returns how many
    /// were applied (own echoes and locally-owned targets are discarded).
    pub fn pump_channel(&mut self) -> usize {
        let Some(connection) = self.connection.as_mut() else {
            return 0;
        };
        let mut applied = 0;
        while let Some(envelope) = connection.try_recv() {
            if apply_delta(&mut self.working, &envelope, &self.ownership, self.client_id) {
                applied += 1;
            }
        }
        applied
    }

    /// Leaves the delta topic. Synchronization falls back to store
    /// snapshots only, the same degraded mode as a failed join.
    pub fn disconnect(&mut self) {
        if let Some(connection) = self.connection.take() {
            connection.leave();
            tracing::debug!(session_id = %self.session_id, "left delta topic");
        }
    }

    // --- token manipulation ---

    /// Starts dragging a token, claiming local ownership.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::Validation` if the token is unknown, the viewer
    /// controls neither the token nor the session, or the entity is already
    /// claimed.
    pub fn begin_token_drag(&mut self, token_id: &str) -> Result<(), SyncError> {
        self.require_token_control(token_id)?;
        if self.working.token(token_id).is_none() {
            return Err(SyncError::Validation(format!("unknown token: {token_id}")));
        }
        self.ownership.claim(token_id, self.client_id)?;
        tracing::debug!(token_id, "token drag started");
        Ok(())
    }

    /// Moves a dragged token to a normalized position, clamped to the scene
    /// bounds, and broadcasts a throttled delta.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::Validation` if the token is not under local
    /// manipulation.
    pub fn drag_token_to(&mut self, token_id: &str, x: f64, y: f64) -> Result<(), SyncError> {
        self.require_owned(token_id)?;
        if let Some(token) = self.working.token_mut(token_id) {
            token.x = clamp_coord(x);
            token.y = clamp_coord(y);
        }
        self.maybe_broadcast(token_id);
        Ok(())
    }

    /// Rotates a dragged token by one fixed step. The change rides the next
    /// throttled delta; no store write happens until release.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::Validation` if the token is not under local
    /// manipulation.
    pub fn rotate_token(
        &mut self,
        token_id: &str,
        direction: RotationDirection,
    ) -> Result<(), SyncError> {
        self.require_owned(token_id)?;
        let step = match direction {
            RotationDirection::Clockwise => ROTATION_STEP_DEGREES,
            RotationDirection::CounterClockwise => -ROTATION_STEP_DEGREES,
        };
        if let Some(token) = self.working.token_mut(token_id) {
            // Unbounded by design; the renderer wraps it.
            token.rotation += step;
        }
        Ok(())
    }

    /// Sets a dragged token's appearance variant. Rides the next delta.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::Validation` if the token is not under local
    /// manipulation.
    pub fn set_token_variant(
        &mut self,
        token_id: &str,
        variant: shardtable_scene::AppearanceVariant,
    ) -> Result<(), SyncError> {
        self.require_owned(token_id)?;
        if let Some(token) = self.working.token_mut(token_id) {
            token.variant = variant;
        }
        Ok(())
    }

    /// Toggles a dragged token's mirror flag. Rides the next delta.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::Validation` if the token is not under local
    /// manipulation.
    pub fn toggle_token_mirror(&mut self, token_id: &str) -> Result<(), SyncError> {
        self.require_owned(token_id)?;
        if let Some(token) = self.working.token_mut(token_id) {
            token.mirror = !token.mirror;
        }
        Ok(())
    }

    /// Ends a drag: releases ownership and commits the final state with a
    /// single whole-scene store write. Ownership is released even when the
    /// write fails, so remote updates resume either way.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::Validation` if the token is not under local
    /// manipulation, or `SyncError::StoreUnavailable` if the commit fails.
    pub async fn end_token_drag(&mut self, token_id: &str) -> Result<(), SyncError> {
        self.require_owned(token_id)?;
        self.ownership.release(token_id, self.client_id);
        self.last_broadcast_at.remove(token_id);
        tracing::debug!(token_id, "token drag released");
        self.commit().await
    }

    /// Adjusts a token's scale, floored at the minimum, and writes the store
    /// immediately. Not throttled, not broadcast — remote clients read it
    /// from the next store snapshot.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::Validation` if the viewer controls neither the
    /// token nor the session, or `SyncError::StoreUnavailable` on a write
    /// failure.
    pub async fn adjust_token_scale(
        &mut self,
        token_id: &str,
        delta: f64,
    ) -> Result<(), SyncError> {
        self.require_token_control(token_id)?;
        if let Some(token) = self.working.token_mut(token_id) {
            token.scale = clamp_scale(token.scale + delta);
        }
        self.commit().await
    }

    /// Toggles a token's visibility flag and writes the store immediately.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::Validation` if the viewer controls neither the
    /// token nor the session, or `SyncError::StoreUnavailable` on a write
    /// failure.
    pub async fn toggle_token_visibility(&mut self, token_id: &str) -> Result<(), SyncError> {
        self.require_token_control(token_id)?;
        if let Some(token) = self.working.token_mut(token_id) {
            token.visible = !token.visible;
        }
        self.commit().await
    }

    // --- shape manipulation (store-only path, no channel publication) ---

    /// Starts dragging or resizing a shape. Directors only.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::Validation` if the viewer is not a director, the
    /// shape is unknown, or the entity is already claimed.
    pub fn begin_shape_edit(&mut self, shape_id: &str) -> Result<(), SyncError> {
        self.require_director()?;
        if self.working.shape(shape_id).is_none() {
            return Err(SyncError::Validation(format!("unknown shape: {shape_id}")));
        }
        self.ownership.claim(shape_id, self.client_id)?;
        Ok(())
    }

    /// Translates an edited shape. Live-updates the working copy only;
    /// other clients see the move after the release write.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::Validation` if the shape is not under local
    /// manipulation.
    pub fn drag_shape_by(&mut self, shape_id: &str, dx: f64, dy: f64) -> Result<(), SyncError> {
        self.require_owned(shape_id)?;
        if let Some(shape) = self.working.shape_mut(shape_id) {
            shape.x = clamp_coord(shape.x + dx);
            shape.y = clamp_coord(shape.y + dy);
        }
        Ok(())
    }

    /// Resizes an edited shape, flooring width and height at the minimum.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::Validation` if the shape is not under local
    /// manipulation.
    pub fn resize_shape_by(&mut self, shape_id: &str, dw: f64, dh: f64) -> Result<(), SyncError> {
        self.require_owned(shape_id)?;
        if let Some(shape) = self.working.shape_mut(shape_id) {
            shape.width = clamp_span(shape.width + dw);
            shape.height = clamp_span(shape.height + dh);
        }
        Ok(())
    }

    /// Ends a shape edit: releases ownership and commits.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::Validation` if the shape is not under local
    /// manipulation, or `SyncError::StoreUnavailable` if the commit fails.
    pub async fn end_shape_edit(&mut self, shape_id: &str) -> Result<(), SyncError> {
        self.require_owned(shape_id)?;
        self.ownership.release(shape_id, self.client_id);
        self.commit().await
    }

    // --- director scene management ---

    /// Adds a participant avatar token at the spawn point and commits.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::Validation` for non-directors or a duplicate
    /// identifier, or `SyncError::StoreUnavailable` on a write failure.
    pub async fn add_participant_token(
        &mut self,
        character_id: &str,
        label: &str,
        image_ref: &str,
    ) -> Result<(), SyncError> {
        self.require_director()?;
        self.working
            .add_token(Token::participant(character_id, label, image_ref))?;
        self.commit().await
    }

    /// Adds an NPC token with a generated identifier and commits. Returns
    /// the new identifier.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::Validation` for non-directors, or
    /// `SyncError::StoreUnavailable` on a write failure.
    pub async fn add_npc_token(
        &mut self,
        label: &str,
        image_ref: &str,
        visible: bool,
    ) -> Result<String, SyncError> {
        self.require_director()?;
        let id = format!("npc-{}", Uuid::new_v4());
        self.working
            .add_token(Token::npc(id.clone(), label, image_ref, visible))?;
        self.commit().await?;
        Ok(id)
    }

    /// Removes a token and commits.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::Validation` for non-directors, or
    /// `SyncError::StoreUnavailable` on a write failure.
    pub async fn remove_token(&mut self, token_id: &str) -> Result<(), SyncError> {
        self.require_director()?;
        self.working.remove_token(token_id);
        self.commit().await
    }

    /// Adds an occluding shape at the spawn position and commits. Returns
    /// the new identifier.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::Validation` for non-directors, or
    /// `SyncError::StoreUnavailable` on a write failure.
    pub async fn add_shape(&mut self) -> Result<String, SyncError> {
        self.require_director()?;
        let id = format!("shape-{}", Uuid::new_v4());
        self.working.add_shape(OccludingShape::spawn(id.clone()))?;
        self.commit().await?;
        Ok(id)
    }

    /// Removes an occluding shape and commits.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::Validation` for non-directors, or
    /// `SyncError::StoreUnavailable` on a write failure.
    pub async fn remove_shape(&mut self, shape_id: &str) -> Result<(), SyncError> {
        self.require_director()?;
        self.working.remove_shape(shape_id);
        self.commit().await
    }

    /// Replaces the background reference and commits.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::Validation` for non-directors, or
    /// `SyncError::StoreUnavailable` on a write failure.
    pub async fn set_background(&mut self, background_ref: &str) -> Result<(), SyncError> {
        self.require_director()?;
        self.working.background_ref = background_ref.to_owned();
        self.commit().await
    }

    /// Grants a viewer identity access to the scene and commits.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::Validation` for non-directors, or
    /// `SyncError::StoreUnavailable` on a write failure.
    pub async fn grant_viewer(&mut self, identity: &str) -> Result<(), SyncError> {
        self.require_director()?;
        self.working.grant_viewer(identity);
        self.commit().await
    }

    /// Revokes a viewer identity's access and commits.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::Validation` for non-directors, or
    /// `SyncError::StoreUnavailable` on a write failure.
    pub async fn revoke_viewer(&mut self, identity: &str) -> Result<(), SyncError> {
        self.require_director()?;
        self.working.revoke_viewer(identity);
        self.commit().await
    }

    // --- turn order (store-only path) ---

    /// Activates combat mode, clearing the list, and commits.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::Validation` for non-directors, or
    /// `SyncError::StoreUnavailable` on a write failure.
    pub async fn activate_combat(&mut self) -> Result<(), SyncError> {
        self.require_director()?;
        shardtable_turn_order::activate_combat(&mut self.working);
        self.commit().await
    }

    /// Deactivates combat mode, clearing the list, and commits.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::Validation` for non-directors, or
    /// `SyncError::StoreUnavailable` on a write failure.
    pub async fn deactivate_combat(&mut self) -> Result<(), SyncError> {
        self.require_director()?;
        shardtable_turn_order::deactivate_combat(&mut self.working);
        self.commit().await
    }

    /// Rolls initiative for a character (any participant, or a director on
    /// a participant's behalf) and commits.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::Validation` if combat is not active, or
    /// `SyncError::StoreUnavailable` on a write failure.
    pub async fn roll_initiative(
        &mut self,
        profile: &InitiativeProfile,
        rng: &mut dyn RandomSource,
    ) -> Result<TurnEntry, SyncError> {
        let entry = shardtable_turn_order::roll_initiative(&mut self.working, profile, rng)?;
        self.commit().await?;
        Ok(entry)
    }

    /// Records a manually supplied raw roll for a character and commits.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::Validation` if combat is not active, or
    /// `SyncError::StoreUnavailable` on a write failure.
    pub async fn enter_manual_initiative(
        &mut self,
        profile: &InitiativeProfile,
        roll: i32,
    ) -> Result<TurnEntry, SyncError> {
        let entry =
            shardtable_turn_order::enter_manual_initiative(&mut self.working, profile, roll)?;
        self.commit().await?;
        Ok(entry)
    }

    /// Appends an NPC entry with a director-supplied total and commits.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::Validation` for non-directors or inactive
    /// combat, or `SyncError::StoreUnavailable` on a write failure.
    pub async fn add_npc_turn_entry(
        &mut self,
        name: &str,
        initiative: i32,
    ) -> Result<TurnEntry, SyncError> {
        self.require_director()?;
        let entry = shardtable_turn_order::add_npc_entry(&mut self.working, name, initiative)?;
        self.commit().await?;
        Ok(entry)
    }

    /// Swaps a turn entry with its neighbor and commits.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::Validation` for non-directors or inactive
    /// combat, or `SyncError::StoreUnavailable` on a write failure.
    pub async fn move_turn_entry(
        &mut self,
        index: usize,
        direction: ReorderDirection,
    ) -> Result<(), SyncError> {
        self.require_director()?;
        shardtable_turn_order::move_entry(&mut self.working, index, direction)?;
        self.commit().await
    }

    /// Removes a turn entry and commits.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::Validation` for non-directors or inactive
    /// combat, or `SyncError::StoreUnavailable` on a write failure.
    pub async fn remove_turn_entry(&mut self, index: usize) -> Result<(), SyncError> {
        self.require_director()?;
        shardtable_turn_order::remove_entry(&mut self.working, index)?;
        self.commit().await
    }

    // --- internals ---

    fn require_director(&self) -> Result<(), SyncError> {
        if self.viewer.role == ViewerRole::Director {
            Ok(())
        } else {
            Err(SyncError::Validation(
                "operation requires director rights".to_owned(),
            ))
        }
    }

    fn require_token_control(&self, token_id: &str) -> Result<(), SyncError> {
        if self.viewer.role == ViewerRole::Director || self.viewer.identity == token_id {
            Ok(())
        } else {
            Err(SyncError::Validation(format!(
                "no control over token: {token_id}"
            )))
        }
    }

    fn require_owned(&self, entity_id: &str) -> Result<(), SyncError> {
        if self.owns(entity_id) {
            Ok(())
        } else {
            Err(SyncError::Validation(format!(
                "entity not under local manipulation: {entity_id}"
            )))
        }
    }

    /// Publishes the token's full current transform, at most once per
    /// throttle window per token. Publish failures degrade silently — the
    /// final release-write corrects any drift.
    fn maybe_broadcast(&mut self, token_id: &str) {
        let Some(connection) = self.connection.as_mut() else {
            return;
        };
        let now = self.clock.now();
        if let Some(last) = self.last_broadcast_at.get(token_id) {
            if now - *last <= Duration::milliseconds(BROADCAST_INTERVAL_MS) {
                return;
            }
        }
        let Some(token) = self.working.token(token_id) else {
            return;
        };
        if let Err(error) = connection.publish(&TokenDelta::from_token(token)) {
            tracing::debug!(%error, token_id, "delta publish failed");
        }
        self.last_broadcast_at.insert(token_id.to_owned(), now);
    }
}
