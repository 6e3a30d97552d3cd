//! Eviction policy: memory modes and distance-based priorities.

pub(crate) mod memory;
pub(crate) mod priority;

pub use memory::{EvictionThresholds, MemoryMode, ResourceAction, action_for_priority};
