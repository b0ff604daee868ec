//! Shardtable — visibility engine.
//!
//! A pure filter over the working scene: given the viewer's role and
//! identity, produce exactly what that viewer may render. The engine never
//! authenticates — the caller supplies the role and identity from its own
//! access-control boundary, and this crate only filters.

use shardtable_scene::{OccludingShape, Scene, Token};

/// The viewer's rights over the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewerRole {
    /// Elevated rights: sees hidden tokens and shape edit handles.
    Director,
    /// Restricted to the filtered view.
    Participant,
}

/// Who is looking at the scene.
#[derive(Debug, Clone)]
pub struct Viewer {
    /// The viewer's identity, matched against the permitted-viewer list.
    pub identity: String,
    /// The viewer's role.
    pub role: ViewerRole,
}

impl Viewer {
    /// Creates a director viewer.
    #[must_use]
    pub fn director(identity: impl Into<String>) -> Self {
        Self {
            identity: identity.into(),
            role: ViewerRole::Director,
        }
    }

    /// Creates a participant viewer.
    #[must_use]
    pub fn participant(identity: impl Into<String>) -> Self {
        Self {
            identity: identity.into(),
            role: ViewerRole::Participant,
        }
    }
}

/// Whether the viewer may see the scene at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// The viewer sees the filtered scene.
    Granted,
    /// The viewer is not in the permitted list; the view is empty. This is
    /// a rendered state, not an error.
    Denied,
}

/// An occluding rectangle as a participant sees it: position and size only,
/// no identity, no handles.
#[derive(Debug, Clone, PartialEq)]
pub struct Occluder {
    /// Left edge in percent.
    pub x: f64,
    /// Top edge in percent.
    pub y: f64,
    /// Width in percent.
    pub width: f64,
    /// Height in percent.
    pub height: f64,
}

/// The filtered scene a single viewer may render.
#[derive(Debug, Clone)]
pub struct SceneView {
    /// Whether the viewer was permitted at all.
    pub access: Access,
    /// Background image reference.
    pub background_ref: String,
    /// Tokens the viewer may see.
    pub tokens: Vec<Token>,
    /// Opaque occluders, rendered for everyone who sees the scene.
    pub occluders: Vec<Occluder>,
    /// Editable shape handles; directors only.
    pub shape_handles: Vec<OccludingShape>,
}

impl SceneView {
    fn denied() -> Self {
        Self {
            access: Access::Denied,
            background_ref: String::new(),
            tokens: Vec::new(),
            occluders: Vec::new(),
            shape_handles: Vec::new(),
        }
    }
}

/// Filters the scene for one viewer.
///
/// Directors see every token and the editable handles of every shape.
/// Participants see only visible tokens, and shapes as bare occluders. A
/// participant missing from the permitted-viewer list sees nothing,
/// regardless of individual token visibility flags.
#[must_use]
pub fn view_for(scene: &Scene, viewer: &Viewer) -> SceneView {
    let occluders = scene
        .shapes
        .iter()
        .map(|s| Occluder {
            x: s.x,
            y: s.y,
            width: s.width,
            height: s.height,
        })
        .collect();

    match viewer.role {
        ViewerRole::Director => SceneView {
            access: Access::Granted,
            background_ref: scene.background_ref.clone(),
            tokens: scene.tokens.clone(),
            occluders,
            shape_handles: scene.shapes.clone(),
        },
        ViewerRole::Participant => {
            if !scene.permits(&viewer.identity) {
                return SceneView::denied();
            }
            SceneView {
                access: Access::Granted,
                background_ref: scene.background_ref.clone(),
                tokens: scene.tokens.iter().filter(|t| t.visible).cloned().collect(),
                occluders,
                shape_handles: Vec::new(),
            }
        }
    }
}
