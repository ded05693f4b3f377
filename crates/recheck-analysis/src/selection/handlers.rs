//! Definition handlers — per-kind infection strategy and the two check
//! operations.

use recheck_core::{FxHashMap, FxHashSet};

use crate::lang::definition::{DefKind, Definition};

use super::extract::{extract_contagious_reference, extract_references};
use super::types::{InfectionSnapshot, InfectionState};

/// One member definition's reference bucket inside a component type.
///
/// Buckets stay separable so that infection through one member is never
/// conflated with its siblings.
#[derive(Debug, Clone)]
pub struct MemberBucket {
    /// Name of the member definition.
    pub member: String,
    /// Every name the member references, either reference class.
    pub refs: FxHashSet<String>,
}

/// Strategy selected by the definition classifier.
#[derive(Debug, Clone)]
enum HandlerKind {
    /// Functions, testcases, altsteps, and non-component types: one
    /// flat reference set per definition.
    General,
    /// Component types: per-member buckets on top of the aggregate sets.
    Component { buckets: Vec<MemberBucket> },
}

/// Infection handler for one definition under analysis.
#[derive(Debug, Clone)]
pub struct DefinitionHandler {
    state: InfectionState,
    kind: HandlerKind,
    /// The owning module has no prior successful check; no prior
    /// analysis can be trusted.
    module_never_checked: bool,
}

impl DefinitionHandler {
    /// Classify `def` and extract its reference sets.
    pub fn classify(def: &Definition, module_never_checked: bool) -> DefinitionHandler {
        let mut state = InfectionState::new(&def.name);

        let kind = if def.kind.is_component() {
            // Type-list/attribute-extension references always spread.
            for reference in &def.extends {
                extract_contagious_reference(reference, &mut state);
            }
            extract_references(&def.body, &mut state);

            let mut buckets = Vec::with_capacity(def.members.len());
            for member in &def.members {
                let mut member_state = InfectionState::new(&member.name);
                extract_references(&member.body, &mut member_state);

                // Union the member's references into the component's sets.
                for name in &member_state.non_contagious_refs {
                    state.non_contagious_refs.insert(name.clone());
                }
                for name in &member_state.contagious_refs {
                    state.contagious_refs.insert(name.clone());
                }
                // An erroneous reference inside a member makes the
                // whole component indeterminate.
                if member_state.is_infected() {
                    state.mark_infected(format!(
                        "member `{}` contains an unresolvable reference",
                        member.name
                    ));
                    state.mark_contagious(format!(
                        "member `{}` resolution is indeterminate",
                        member.name
                    ));
                }

                let mut refs: FxHashSet<String> = FxHashSet::default();
                refs.extend(member_state.non_contagious_refs.iter().cloned());
                refs.extend(member_state.contagious_refs.iter().cloned());
                buckets.push(MemberBucket { member: member.name.clone(), refs });
            }
            HandlerKind::Component { buckets }
        } else {
            extract_references(&def.body, &mut state);
            HandlerKind::General
        };

        DefinitionHandler { state, kind, module_never_checked }
    }

    /// Name of the definition this handler covers.
    pub fn name(&self) -> &str {
        &self.state.name
    }

    pub fn state(&self) -> &InfectionState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut InfectionState {
        &mut self.state
    }

    /// Member buckets whose reference set mentions `name`. Empty for
    /// the general strategy.
    pub fn compute_infected_fields(&self, name: &str) -> Vec<&MemberBucket> {
        match &self.kind {
            HandlerKind::General => Vec::new(),
            HandlerKind::Component { buckets } => {
                buckets.iter().filter(|b| b.refs.contains(name)).collect()
            }
        }
    }

    /// First check operation: does `other`'s infection make this
    /// definition re-checkable?
    pub fn check_is_infected(&mut self, other: &InfectionSnapshot) {
        if !other.infected {
            return;
        }
        let referenced = self.state.non_contagious_refs.contains(&other.name)
            || self.state.contagious_refs.contains(&other.name);
        if !referenced {
            return;
        }

        self.state.infected_refs.insert(other.name.clone());
        self.state
            .mark_infected(format!("references infected definition `{}`", other.name));

        // Component attribution: infection spreads through whichever
        // members used the infected name, and the name is re-added as a
        // contagious reference of the component itself.
        let touched: Vec<String> = self
            .compute_infected_fields(&other.name)
            .iter()
            .map(|b| b.member.clone())
            .collect();
        for member in touched {
            self.state.contagious_refs.insert(other.name.clone());
            self.state.infected_refs.insert(other.name.clone());
            self.state.mark_contagious(format!(
                "member `{member}` uses infected definition `{}`",
                other.name
            ));
        }
    }

    /// Second check operation: does `other`'s infection make this
    /// definition contagious? Always evaluated together with
    /// [`check_is_infected`](Self::check_is_infected).
    pub fn check_is_contagious(&mut self, other: &InfectionSnapshot) {
        if !other.infected {
            return;
        }
        if !self.state.contagious_refs.contains(&other.name) {
            return;
        }

        self.state.mark_contagious(format!(
            "declarative reference to infected definition `{}`",
            other.name
        ));
        // A definition in a never-checked module cannot trust prior
        // analysis at all: infect immediately, without an established
        // infection path.
        if self.module_never_checked {
            self.state.infected_refs.insert(other.name.clone());
            self.state.mark_infected(format!(
                "owning module was never checked; declarative use of infected `{}`",
                other.name
            ));
        }
    }

    /// Run both check operations against `other`, in their fixed order.
    pub fn check_against(&mut self, other: &InfectionSnapshot) {
        self.check_is_infected(other);
        self.check_is_contagious(other);
    }
}

/// Per-module slab of handlers with a name index.
///
/// Cross-definition checks always pair one mutable handler with an
/// immutable view of another, so the store hands out split borrows.
#[derive(Debug, Default)]
pub struct HandlerStore {
    items: Vec<DefinitionHandler>,
    index: FxHashMap<String, usize>,
}

impl HandlerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a handler, returning its slot. A handler with a duplicate
    /// name replaces nothing and keeps the first slot.
    pub fn insert(&mut self, handler: DefinitionHandler) -> usize {
        if let Some(&existing) = self.index.get(handler.name()) {
            return existing;
        }
        let slot = self.items.len();
        self.index.insert(handler.name().to_string(), slot);
        self.items.push(handler);
        slot
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn slot_of(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn handler(&self, slot: usize) -> &DefinitionHandler {
        &self.items[slot]
    }

    pub fn handler_mut(&mut self, slot: usize) -> &mut DefinitionHandler {
        &mut self.items[slot]
    }

    pub fn snapshot(&self, slot: usize) -> InfectionSnapshot {
        self.items[slot].state().snapshot()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DefinitionHandler> {
        self.items.iter()
    }

    /// Split borrow: mutable handler at `a`, shared handler at `b`.
    pub fn pair_mut(&mut self, a: usize, b: usize) -> (&mut DefinitionHandler, &DefinitionHandler) {
        assert_ne!(a, b, "pair_mut requires distinct slots");
        if a < b {
            let (left, right) = self.items.split_at_mut(b);
            (&mut left[a], &right[0])
        } else {
            let (left, right) = self.items.split_at_mut(a);
            (&mut right[0], &left[b])
        }
    }
}
