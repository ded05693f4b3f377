//! Check generations — monotonically increasing analysis pass counters.

use serde::{Deserialize, Serialize};

/// Identifier of one completed semantic-check pass.
///
/// A module's `last_checked` records the generation of its most recent
/// successful check; `None` means the module was never checked and no
/// prior analysis can be trusted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CheckGeneration(pub u64);

impl CheckGeneration {
    /// First generation.
    pub const INITIAL: CheckGeneration = CheckGeneration(0);

    /// The generation following this one.
    pub fn next(self) -> CheckGeneration {
        CheckGeneration(self.0 + 1)
    }
}

impl std::fmt::Display for CheckGeneration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "gen{}", self.0)
    }
}
