//! Shardtable — persisted scene data model.
//!
//! One [`Scene`](document::Scene) per session: background reference, movable
//! tokens, occluding shapes, the permitted-viewer list, and the turn-order
//! list that shares the same durable record. Geometry limits live in
//! [`geometry`]; violations are clamped, never rejected.

pub mod document;
pub mod geometry;
pub mod shape;
pub mod token;
pub mod turn;

pub use document::Scene;
pub use shape::OccludingShape;
pub use token::{AppearanceVariant, Token, TokenKind};
pub use turn::TurnEntry;
