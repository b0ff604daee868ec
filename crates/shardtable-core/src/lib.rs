//! Shardtable Core — shared abstractions.
//!
//! This crate defines the error taxonomy, client identity, and the clock and
//! randomness seams that every other crate depends on. It contains no
//! synchronization logic.

pub mod client;
pub mod clock;
pub mod error;
pub mod rng;
