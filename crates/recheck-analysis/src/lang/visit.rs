//! Generic tree walk with a three-way directive.

use super::ast::Node;

/// Directive returned by a visitor when entering a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisitDirective {
    /// Descend into the node's children.
    Continue,
    /// Skip this node's subtree, continue with its siblings.
    SkipSubtree,
    /// Stop the whole walk.
    Abort,
}

/// Visitor over a definition body tree.
pub trait Visitor {
    /// Called before a node's children are visited.
    fn enter(&mut self, node: &Node) -> VisitDirective;

    /// Called after a node's children were visited (or skipped).
    /// Not called for aborted subtrees.
    fn leave(&mut self, node: &Node) {
        let _ = node;
    }
}

/// Walk `node` depth-first. Returns `false` if the visitor aborted.
pub fn walk(node: &Node, visitor: &mut dyn Visitor) -> bool {
    match visitor.enter(node) {
        VisitDirective::Abort => return false,
        VisitDirective::SkipSubtree => {
            visitor.leave(node);
            return true;
        }
        VisitDirective::Continue => {}
    }

    for child in node.children() {
        if !walk(child, visitor) {
            return false;
        }
    }

    visitor.leave(node);
    true
}
