//! Shared test doubles for the Shardtable engine.

mod channel;
mod clock;
mod rng;
mod store;

pub use channel::UnreachableChannel;
pub use clock::{FixedClock, SteppingClock};
pub use rng::{ConstRng, SequenceRng};
pub use store::{FailingSceneStore, ReadOnlySceneStore, RecordingSceneStore};
