//! Reference extraction — populate a definition's reference sets.

use crate::lang::ast::{Node, Reference};
use crate::lang::visit::{walk, VisitDirective, Visitor};

use super::types::InfectionState;

/// Visitor that files every reference under the node tree into the
/// owning definition's state.
///
/// References below an executable statement region go into
/// `non_contagious_refs`; references anywhere else (signatures, type
/// bodies, extends/attribute lists) go into `contagious_refs`.
/// Erroneous references immediately mark the owner infected and
/// contagious; the walk continues so the sets stay complete for
/// diagnostics.
struct ReferenceCollector<'a> {
    state: &'a mut InfectionState,
    statement_depth: usize,
}

impl ReferenceCollector<'_> {
    fn collect(&mut self, reference: &Reference) {
        if reference.is_erroneous() {
            force_erroneous(self.state, reference);
            return;
        }
        // Not erroneous, so the identifier is present.
        let name = match reference.name() {
            Some(name) => name.to_string(),
            None => return,
        };
        if self.statement_depth > 0 {
            self.state.non_contagious_refs.insert(name);
        } else {
            self.state.contagious_refs.insert(name);
        }
    }
}

impl Visitor for ReferenceCollector<'_> {
    fn enter(&mut self, node: &Node) -> VisitDirective {
        match node {
            Node::StatementBlock(_) => self.statement_depth += 1,
            Node::Reference(reference) => self.collect(reference),
            Node::Seq(_) | Node::Declaration(_) => {}
        }
        VisitDirective::Continue
    }

    fn leave(&mut self, node: &Node) {
        if let Node::StatementBlock(_) = node {
            self.statement_depth -= 1;
        }
    }
}

/// Walk `body` and file its references into `state`.
pub fn extract_references(body: &Node, state: &mut InfectionState) {
    let mut collector = ReferenceCollector { state, statement_depth: 0 };
    walk(body, &mut collector);
}

/// File a single always-contagious reference (extends/attribute
/// position) into `state`.
pub fn extract_contagious_reference(reference: &Reference, state: &mut InfectionState) {
    if reference.is_erroneous() {
        force_erroneous(state, reference);
        return;
    }
    if let Some(name) = reference.name() {
        state.contagious_refs.insert(name.to_string());
    }
}

fn force_erroneous(state: &mut InfectionState, reference: &Reference) {
    let shown = reference.name().unwrap_or("<unknown>");
    state.mark_infected(format!("reference `{shown}` cannot be resolved"));
    state.mark_contagious(format!("resolution of `{shown}` is indeterminate"));
}
