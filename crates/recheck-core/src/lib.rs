//! recheck-core: shared foundation for the recheck selection engine.
//!
//! - Types: performance collections, check generations
//! - Errors: one `thiserror` enum per concern
//! - Config: TOML-based with env overrides
//! - Traits: polled progress reporting
//! - Tracing: `RECHECK_LOG` driven subscriber setup

pub mod config;
pub mod errors;
pub mod tracing;
pub mod traits;
pub mod types;

// Re-exports for convenience
pub use config::{RecheckConfig, SelectionConfig};
pub use errors::{ConfigError, ReportError};
pub use traits::{NoopProgress, ProgressReporter};
pub use types::{CheckGeneration, FxHashMap, FxHashSet};
