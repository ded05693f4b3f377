//! Selection engine configuration.

use serde::{Deserialize, Serialize};

/// Configuration for the broken-parts selection engine.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SelectionConfig {
    /// Record per-definition infection diagnostics. Default: false.
    pub debug: Option<bool>,
    /// Wall-clock budget for definition-level selection, in milliseconds.
    /// `None` disables the budget (the default); on overrun the engine
    /// falls back to whole-module selection.
    pub time_limit_ms: Option<u64>,
    /// Attempt definition-level selection before whole-module selection.
    /// Default: true.
    pub definition_level: Option<bool>,
}

impl SelectionConfig {
    /// Returns whether diagnostic recording is enabled, defaulting to false.
    pub fn effective_debug(&self) -> bool {
        self.debug.unwrap_or(false)
    }

    /// Returns the wall-clock budget, if any.
    pub fn effective_time_limit(&self) -> Option<std::time::Duration> {
        self.time_limit_ms.map(std::time::Duration::from_millis)
    }

    /// Returns whether definition-level selection runs first, defaulting to true.
    pub fn effective_definition_level(&self) -> bool {
        self.definition_level.unwrap_or(true)
    }
}
