//! recheck-analysis: incremental broken-parts selection.
//!
//! Given a module graph and the set of modules already known good, the
//! engine computes the minimal set of definitions that must be
//! semantically re-checked after an edit:
//! - **Lang** — modules, definitions, AST nodes, references, visitor
//! - **Selection** — reference extraction, infection state, handlers,
//!   inverted imports, propagation engine, local fixpoint, reporting

pub mod lang;
pub mod selection;

// Re-exports for convenience
pub use lang::{
    DefKind, Definition, ImportEdge, Module, ModuleGraph, Node, Reference, VisitDirective,
    Visitor,
};
pub use selection::{
    InfectionState, ModuleSelection, SelectionEngine, SelectionMode, SelectionOutcome,
    SelectionStats,
};
