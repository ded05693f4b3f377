//! Shared traits.

pub mod progress;

pub use progress::{NoopProgress, ProgressReporter};
