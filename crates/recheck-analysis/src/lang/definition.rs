//! Definitions — named semantic units owned by a module.

use serde::{Deserialize, Serialize};

use super::ast::{Node, Reference};

/// Syntactic kind of a definition. Drives the reference-extraction and
/// infection-propagation strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DefKind {
    Function,
    Testcase,
    Altstep,
    /// Type definition that does not resolve to a component type.
    Type,
    /// Type definition resolved to a component type. Aggregates member
    /// definitions whose reference sets stay separable.
    ComponentType,
    Const,
    Template,
}

impl DefKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Function => "function",
            Self::Testcase => "testcase",
            Self::Altstep => "altstep",
            Self::Type => "type",
            Self::ComponentType => "component_type",
            Self::Const => "const",
            Self::Template => "template",
        }
    }

    /// Whether definitions of this kind use the component strategy.
    pub fn is_component(&self) -> bool {
        matches!(self, Self::ComponentType)
    }
}

impl std::fmt::Display for DefKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A named semantic unit belonging to exactly one module.
///
/// Identity is the name within the owning module. Instances are
/// produced by a front end and replaced wholesale on re-parse.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Definition {
    pub name: String,
    pub kind: DefKind,
    /// Body tree. For component types this holds the type-list region;
    /// member bodies live in `members`.
    pub body: Node,
    /// Member definitions (component types only).
    pub members: Vec<Definition>,
    /// Extends/attribute references (component types only); uses in
    /// this position always spread infection onward.
    pub extends: Vec<Reference>,
    /// Edited since the last check; forces an unconditional re-check.
    pub check_root: bool,
}

impl Definition {
    /// A non-component definition with the given body.
    pub fn new(name: &str, kind: DefKind, body: Node) -> Definition {
        Definition {
            name: name.to_string(),
            kind,
            body,
            members: Vec::new(),
            extends: Vec::new(),
            check_root: false,
        }
    }

    /// A component-type definition with member definitions and an
    /// extends list.
    pub fn component(name: &str, members: Vec<Definition>, extends: Vec<Reference>) -> Definition {
        Definition {
            name: name.to_string(),
            kind: DefKind::ComponentType,
            body: Node::empty(),
            members,
            extends,
            check_root: false,
        }
    }

    /// Mark this definition as edited.
    pub fn with_check_root(mut self) -> Definition {
        self.check_root = true;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_component_types_use_the_component_strategy() {
        assert!(DefKind::ComponentType.is_component());
        assert!(!DefKind::Type.is_component());
        assert!(!DefKind::Function.is_component());
    }

    #[test]
    fn with_check_root_marks_the_definition() {
        let def = Definition::new("f_a", DefKind::Function, Node::empty()).with_check_root();
        assert!(def.check_root);
    }
}
