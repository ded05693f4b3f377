//! Data structures shared across the recheck workspace.

pub mod collections;
pub mod generation;

pub use collections::{FxHashMap, FxHashSet};
pub use generation::CheckGeneration;
