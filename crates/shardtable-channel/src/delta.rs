//! Ephemeral token delta messages.

use serde::{Deserialize, Serialize};
use shardtable_core::client::ClientId;
use shardtable_scene::{AppearanceVariant, Token};

/// A fire-and-forget partial update to one token's transform.
///
/// Position is always present; the optional fields ride along so a receiver
/// that missed earlier messages still converges on the full transform. There
/// is deliberately no delta type for shapes or turn order — those rely
/// solely on store writes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenDelta {
    /// Target token identifier.
    pub token_id: String,
    /// Horizontal position in `[0, 100]`.
    pub x: f64,
    /// Vertical position in `[0, 100]`.
    pub y: f64,
    /// Mirror flag, when the sender knows it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mirror: Option<bool>,
    /// Rotation in degrees.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f64>,
    /// Appearance variant.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variant: Option<AppearanceVariant>,
    /// Visibility flag.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
}

impl TokenDelta {
    /// Captures a token's full current transform as a delta.
    #[must_use]
    pub fn from_token(token: &Token) -> Self {
        Self {
            token_id: token.id.clone(),
            x: token.x,
            y: token.y,
            mirror: Some(token.mirror),
            rotation: Some(token.rotation),
            variant: Some(token.variant),
            visible: Some(token.visible),
        }
    }
}

/// A delta tagged with its sender so clients can drop their own echoes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeltaEnvelope {
    /// The publishing client.
    pub sender: ClientId,
    /// The carried delta.
    pub delta: TokenDelta,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delta_wire_shape() {
        let delta = TokenDelta {
            token_id: "char-1".to_owned(),
            x: 12.5,
            y: 90.0,
            mirror: Some(true),
            rotation: Some(45.0),
            variant: Some(AppearanceVariant::Defeated),
            visible: None,
        };
        let value = serde_json::to_value(&delta).unwrap();
        assert_eq!(value["tokenId"], "char-1");
        assert_eq!(value["variant"], 3);
        assert!(value.get("visible").is_none());
    }

    #[test]
    fn test_from_token_carries_full_transform() {
        let mut token = Token::participant("char-1", "Ana", "");
        token.rotation = 30.0;
        token.mirror = true;

        let delta = TokenDelta::from_token(&token);
        assert_eq!(delta.rotation, Some(30.0));
        assert_eq!(delta.mirror, Some(true));
        assert_eq!(delta.visible, Some(true));
    }
}
