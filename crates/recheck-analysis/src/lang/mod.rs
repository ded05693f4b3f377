//! Language model consumed by the selection subsystem.
//!
//! A deliberately closed representation: modules own definitions,
//! definitions own a body tree of `Node`s, and references carry their
//! resolution outcome inline. Semantic checking itself is opaque to
//! this workspace.

pub mod ast;
pub mod definition;
pub mod module;
pub mod visit;

pub use ast::{Node, Reference};
pub use definition::{DefKind, Definition};
pub use module::{ImportEdge, Module, ModuleGraph};
pub use visit::{walk, VisitDirective, Visitor};
