//! Shardtable — reconciliation engine.
//!
//! Merges durable store snapshots and ephemeral channel deltas into a
//! client's working copy. The two-path merge is the core correctness
//! property of the engine: store snapshots are authoritative for everything
//! *not* actively being manipulated locally, and channel deltas are
//! authoritative for positions of entities being dragged by *other* clients.
//!
//! Both merge operations are pure functions of (incoming value, current
//! working copy, ownership registry) — no state is captured by reference.

pub mod ownership;
pub mod reconcile;

pub use ownership::OwnershipRegistry;
pub use reconcile::{apply_delta, reconcile_snapshot};
