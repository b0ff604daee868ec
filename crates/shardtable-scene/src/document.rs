//! The durable scene document.

use serde::{Deserialize, Serialize};
use shardtable_core::error::SyncError;

use crate::shape::OccludingShape;
use crate::token::Token;
use crate::turn::TurnEntry;

/// The full persisted spatial state of one session.
///
/// Persisted as a whole-document replacement: concurrent writers race and
/// the last write to land wins. That limitation is part of the contract, not
/// something this type attempts to patch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scene {
    /// Background image reference.
    pub background_ref: String,
    /// Movable tokens; identifiers are unique within the scene.
    pub tokens: Vec<Token>,
    /// Occluding shapes.
    #[serde(default)]
    pub shapes: Vec<OccludingShape>,
    /// Identifiers of viewers permitted to see the scene.
    #[serde(default)]
    pub permitted_viewers: Vec<String>,
    /// Opaque ruleset tag.
    pub ruleset: String,
    /// Whether combat mode is active.
    #[serde(default)]
    pub combat_active: bool,
    /// The initiative list, sorted descending by total.
    #[serde(default)]
    pub turn_entries: Vec<TurnEntry>,
}

impl Scene {
    /// Creates an empty scene.
    #[must_use]
    pub fn new(background_ref: impl Into<String>, ruleset: impl Into<String>) -> Self {
        Self {
            background_ref: background_ref.into(),
            tokens: Vec::new(),
            shapes: Vec::new(),
            permitted_viewers: Vec::new(),
            ruleset: ruleset.into(),
            combat_active: false,
            turn_entries: Vec::new(),
        }
    }

    /// Looks up a token by identifier.
    #[must_use]
    pub fn token(&self, id: &str) -> Option<&Token> {
        self.tokens.iter().find(|t| t.id == id)
    }

    /// Looks up a token by identifier, mutably.
    pub fn token_mut(&mut self, id: &str) -> Option<&mut Token> {
        self.tokens.iter_mut().find(|t| t.id == id)
    }

    /// Looks up a shape by identifier.
    #[must_use]
    pub fn shape(&self, id: &str) -> Option<&OccludingShape> {
        self.shapes.iter().find(|s| s.id == id)
    }

    /// Looks up a shape by identifier, mutably.
    pub fn shape_mut(&mut self, id: &str) -> Option<&mut OccludingShape> {
        self.shapes.iter_mut().find(|s| s.id == id)
    }

    /// Adds a token, enforcing the unique-identifier invariant.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::Validation` if a token with the same identifier
    /// already exists.
    pub fn add_token(&mut self, token: Token) -> Result<(), SyncError> {
        if self.token(&token.id).is_some() {
            return Err(SyncError::Validation(format!(
                "token already on scene: {}",
                token.id
            )));
        }
        self.tokens.push(token);
        Ok(())
    }

    /// Removes a token. Returns whether one was removed.
    pub fn remove_token(&mut self, id: &str) -> bool {
        let before = self.tokens.len();
        self.tokens.retain(|t| t.id != id);
        self.tokens.len() != before
    }

    /// Adds a shape, enforcing the unique-identifier invariant.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::Validation` if a shape with the same identifier
    /// already exists.
    pub fn add_shape(&mut self, shape: OccludingShape) -> Result<(), SyncError> {
        if self.shape(&shape.id).is_some() {
            return Err(SyncError::Validation(format!(
                "shape already on scene: {}",
                shape.id
            )));
        }
        self.shapes.push(shape);
        Ok(())
    }

    /// Removes a shape. Returns whether one was removed.
    pub fn remove_shape(&mut self, id: &str) -> bool {
        let before = self.shapes.len();
        self.shapes.retain(|s| s.id != id);
        self.shapes.len() != before
    }

    /// Returns whether the viewer identity is permitted to see the scene.
    #[must_use]
    pub fn permits(&self, identity: &str) -> bool {
        self.permitted_viewers.iter().any(|v| v == identity)
    }

    /// Adds a viewer to the permitted list. Idempotent.
    pub fn grant_viewer(&mut self, identity: impl Into<String>) {
        let identity = identity.into();
        if !self.permits(&identity) {
            self.permitted_viewers.push(identity);
        }
    }

    /// Removes a viewer from the permitted list.
    pub fn revoke_viewer(&mut self, identity: &str) {
        self.permitted_viewers.retain(|v| v != identity);
    }
}
