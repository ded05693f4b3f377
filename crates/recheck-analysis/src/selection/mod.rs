//! Broken-parts selection — the incremental re-check planner.
//!
//! Cooperating pieces:
//! - **Extract** — splits a definition's references into non-contagious
//!   (executable regions) and contagious (declarative regions) sets
//! - **Types** — per-definition infection state and selection results
//! - **Handlers** — strategy per definition kind, the two check
//!   operations, and the per-module handler store
//! - **Imports** — inverted "who imports me" adjacency, built once per run
//! - **Fixpoint** — within-module contagion settling
//! - **Engine** — seed selection, cross-module propagation with a
//!   wall-clock budget, whole-module fallback, finalize
//! - **Report** — advisory human-readable/dot/JSON diagnostics

pub mod engine;
pub mod extract;
pub mod fixpoint;
pub mod handlers;
pub mod imports;
pub mod report;
pub mod types;

pub use engine::{select_broken_parts, SelectionEngine};
pub use handlers::{DefinitionHandler, HandlerStore, MemberBucket};
pub use imports::InvertedImports;
pub use types::{
    DefinitionReport, InfectionSnapshot, InfectionState, ModuleSelection, SelectionMode,
    SelectionOutcome, SelectionStats,
};
