//! Shardtable — per-client scene session.
//!
//! One [`SceneSession`](session::SceneSession) per connected client: it owns
//! the working copy of the scene, converts manipulation input into clamped
//! document changes, throttles outbound deltas, commits on release, and
//! feeds incoming snapshots and deltas through the reconciliation engine.
//!
//! Everything is single-threaded and event-driven per client. The only
//! cross-update protection is the local ownership registry, which suppresses
//! self-overwrite; nothing is enforced across clients.

pub mod session;

pub use session::{ROTATION_STEP_DEGREES, RotationDirection, SceneSession};
