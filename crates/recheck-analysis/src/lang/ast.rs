//! AST nodes — a closed sum type over definition bodies.

use serde::{Deserialize, Serialize};

/// A node in a definition body.
///
/// The selection subsystem only distinguishes executable regions from
/// declarative ones; everything else a front end produces collapses
/// into `Seq`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Node {
    /// Ordered sequence of children with no region semantics of its own.
    Seq(Vec<Node>),
    /// Executable statement region. References below it can make the
    /// owning definition re-checkable but never an infection source.
    StatementBlock(Vec<Node>),
    /// Declarative region: signatures, parameter/return types, type
    /// bodies, extends/attribute lists.
    Declaration(Vec<Node>),
    /// A use of a named definition.
    Reference(Reference),
}

impl Node {
    /// Empty node.
    pub fn empty() -> Node {
        Node::Seq(Vec::new())
    }

    /// A resolved reference to `name`.
    pub fn reference(name: &str) -> Node {
        Node::Reference(Reference::resolved(name))
    }

    /// Child nodes, in order.
    pub fn children(&self) -> &[Node] {
        match self {
            Node::Seq(children) | Node::StatementBlock(children) | Node::Declaration(children) => {
                children
            }
            Node::Reference(_) => &[],
        }
    }
}

/// A use of a named definition, with its resolution outcome inline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reference {
    /// The identifier as written. `None` means the parser could not
    /// recover an identifier at all.
    pub text: Option<String>,
    /// Name of the resolved target definition. `None` means resolution
    /// failed.
    pub target: Option<String>,
}

impl Reference {
    /// A reference whose resolution succeeded and agrees with its text.
    pub fn resolved(name: &str) -> Reference {
        Reference {
            text: Some(name.to_string()),
            target: Some(name.to_string()),
        }
    }

    /// A reference whose target could not be resolved.
    pub fn unresolved(text: &str) -> Reference {
        Reference {
            text: Some(text.to_string()),
            target: None,
        }
    }

    /// A reference with no recoverable identifier.
    pub fn damaged() -> Reference {
        Reference { text: None, target: None }
    }

    /// A reference whose resolved target does not match its text.
    pub fn mismatched(text: &str, target: &str) -> Reference {
        Reference {
            text: Some(text.to_string()),
            target: Some(target.to_string()),
        }
    }

    /// The referenced name, if the identifier was recovered.
    pub fn name(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Whether this reference's resolution result is indeterminate:
    /// missing identifier, missing target, or a text/target mismatch.
    /// Erroneous references always force a full re-check of their owner.
    pub fn is_erroneous(&self) -> bool {
        match (&self.text, &self.target) {
            (Some(text), Some(target)) => text != target,
            _ => true,
        }
    }
}
