//! Movable scene tokens.

use serde::{Deserialize, Serialize};

/// What a token represents on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TokenKind {
    /// A participant's avatar; the identifier matches the owning character.
    Participant,
    /// A director-controlled creature with a generated identifier.
    Npc,
}

/// One of a small closed set of token appearances, serialized as `1|2|3` on
/// the wire and in the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum AppearanceVariant {
    /// The standard appearance.
    #[default]
    Default,
    /// An alternate appearance.
    Alternate,
    /// The defeated appearance.
    Defeated,
}

impl From<AppearanceVariant> for u8 {
    fn from(variant: AppearanceVariant) -> Self {
        match variant {
            AppearanceVariant::Default => 1,
            AppearanceVariant::Alternate => 2,
            AppearanceVariant::Defeated => 3,
        }
    }
}

impl TryFrom<u8> for AppearanceVariant {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Default),
            2 => Ok(Self::Alternate),
            3 => Ok(Self::Defeated),
            other => Err(format!("appearance variant out of range: {other}")),
        }
    }
}

/// A movable token on the scene.
///
/// Positions are percentages of the scene bounds. Rotation is unbounded in
/// degrees and wraps visually.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Token {
    /// Stable identifier, unique within a scene. Shared with the owning
    /// character when the token is a participant avatar.
    pub id: String,
    /// Whether this is a participant avatar or an NPC.
    pub kind: TokenKind,
    /// Horizontal position in `[0, 100]`.
    pub x: f64,
    /// Vertical position in `[0, 100]`.
    pub y: f64,
    /// Display label.
    pub label: String,
    /// Image reference.
    pub image_ref: String,
    /// Scale multiplier, floored at 0.3.
    #[serde(default = "default_scale")]
    pub scale: f64,
    /// Mirror (horizontal flip) flag.
    #[serde(default)]
    pub mirror: bool,
    /// Rotation in degrees, unbounded.
    #[serde(default)]
    pub rotation: f64,
    /// Current appearance variant.
    #[serde(default)]
    pub variant: AppearanceVariant,
    /// Whether non-directors can see the token.
    #[serde(default = "default_visible")]
    pub visible: bool,
}

fn default_scale() -> f64 {
    1.0
}

fn default_visible() -> bool {
    true
}

impl Token {
    /// Creates a participant token at the spawn point, visible.
    #[must_use]
    pub fn participant(
        id: impl Into<String>,
        label: impl Into<String>,
        image_ref: impl Into<String>,
    ) -> Self {
        Self::spawn(id, TokenKind::Participant, label, image_ref, true)
    }

    /// Creates an NPC token at the spawn point. NPCs often start hidden so
    /// the director can reveal them mid-scene.
    #[must_use]
    pub fn npc(
        id: impl Into<String>,
        label: impl Into<String>,
        image_ref: impl Into<String>,
        visible: bool,
    ) -> Self {
        Self::spawn(id, TokenKind::Npc, label, image_ref, visible)
    }

    fn spawn(
        id: impl Into<String>,
        kind: TokenKind,
        label: impl Into<String>,
        image_ref: impl Into<String>,
        visible: bool,
    ) -> Self {
        Self {
            id: id.into(),
            kind,
            x: 50.0,
            y: 50.0,
            label: label.into(),
            image_ref: image_ref.into(),
            scale: 1.0,
            mirror: false,
            rotation: 0.0,
            variant: AppearanceVariant::Default,
            visible,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawn_defaults() {
        let token = Token::participant("char-1", "Ana", "tokens/ana.png");
        assert_eq!(token.x, 50.0);
        assert_eq!(token.y, 50.0);
        assert_eq!(token.scale, 1.0);
        assert_eq!(token.rotation, 0.0);
        assert_eq!(token.variant, AppearanceVariant::Default);
        assert!(token.visible);
        assert!(!token.mirror);
    }

    #[test]
    fn test_npc_can_spawn_hidden() {
        let token = Token::npc("npc-9", "Wretch", "", false);
        assert_eq!(token.kind, TokenKind::Npc);
        assert!(!token.visible);
    }

    #[test]
    fn test_variant_wire_values() {
        assert_eq!(u8::from(AppearanceVariant::Default), 1);
        assert_eq!(u8::from(AppearanceVariant::Alternate), 2);
        assert_eq!(u8::from(AppearanceVariant::Defeated), 3);
        assert_eq!(AppearanceVariant::try_from(3).unwrap(), AppearanceVariant::Defeated);
        assert!(AppearanceVariant::try_from(4).is_err());
    }

    #[test]
    fn test_token_document_shape() {
        let token = Token::participant("char-1", "Ana", "tokens/ana.png");
        let value = serde_json::to_value(&token).unwrap();
        assert_eq!(value["id"], "char-1");
        assert_eq!(value["kind"], "PARTICIPANT");
        assert_eq!(value["imageRef"], "tokens/ana.png");
        assert_eq!(value["variant"], 1);
    }

    #[test]
    fn test_token_deserializes_with_missing_optionals() {
        let token: Token = serde_json::from_str(
            r#"{"id":"t1","kind":"NPC","x":10.0,"y":20.0,"label":"W","imageRef":""}"#,
        )
        .unwrap();
        assert_eq!(token.scale, 1.0);
        assert!(token.visible);
        assert_eq!(token.variant, AppearanceVariant::Default);
    }
}
