//! Occluding shapes.

use serde::{Deserialize, Serialize};

/// An opaque rectangle hiding part of the scene from non-directors.
///
/// Participants only ever see its effect; the identifier and edit handles
/// are a director-side concept. All fields are percentages of the scene
/// bounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OccludingShape {
    /// Stable identifier, unique within a scene.
    pub id: String,
    /// Left edge in `[0, 100]`.
    pub x: f64,
    /// Top edge in `[0, 100]`.
    pub y: f64,
    /// Width, floored at [`MIN_SHAPE_SPAN`](crate::geometry::MIN_SHAPE_SPAN).
    pub width: f64,
    /// Height, floored at [`MIN_SHAPE_SPAN`](crate::geometry::MIN_SHAPE_SPAN).
    pub height: f64,
}

impl OccludingShape {
    /// Creates a shape at the spawn position with the default size.
    #[must_use]
    pub fn spawn(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            x: 40.0,
            y: 40.0,
            width: 20.0,
            height: 20.0,
        }
    }
}
