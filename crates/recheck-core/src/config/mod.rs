//! Configuration system for recheck.
//! TOML-based, 3-layer resolution: env > project > defaults.

pub mod recheck_config;
pub mod selection_config;

pub use recheck_config::RecheckConfig;
pub use selection_config::SelectionConfig;
