//! Infection state and selection results.

use recheck_core::types::collections::SmallVec8;
use recheck_core::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

/// Per-definition infection state for one selection run.
///
/// `infected` and `contagious` are monotonic within a run: once set
/// they are never unset. Each state exclusively owns its reference
/// sets; cross-definition lookups go by name through the handler
/// store's index, never by aliasing another state's sets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InfectionState {
    /// Name of the definition this state belongs to.
    pub name: String,
    infected: bool,
    contagious: bool,
    /// Names referenced from executable regions. Can make this
    /// definition re-checkable, never an infection source for others.
    pub non_contagious_refs: FxHashSet<String>,
    /// Names referenced from declarative regions (signatures, type
    /// bodies, extends lists). Infection through these spreads onward.
    pub contagious_refs: FxHashSet<String>,
    /// Referenced names whose definition was found infected. Kept for
    /// diagnostics.
    pub infected_refs: FxHashSet<String>,
    /// Human-readable trail of why the flags were set. Audit only.
    pub reasons: SmallVec8<String>,
}

impl InfectionState {
    pub fn new(name: &str) -> InfectionState {
        InfectionState {
            name: name.to_string(),
            infected: false,
            contagious: false,
            non_contagious_refs: FxHashSet::default(),
            contagious_refs: FxHashSet::default(),
            infected_refs: FxHashSet::default(),
            reasons: SmallVec8::new(),
        }
    }

    /// Whether this definition must be re-checked this run.
    pub fn is_infected(&self) -> bool {
        self.infected
    }

    /// Whether infection spreads from this definition to its dependents.
    pub fn is_contagious(&self) -> bool {
        self.contagious
    }

    /// Set `infected`. Monotonic; repeated calls only extend the reason
    /// trail while the flag is first being set.
    pub fn mark_infected(&mut self, reason: impl Into<String>) {
        if !self.infected {
            self.infected = true;
            self.reasons.push(reason.into());
        }
    }

    /// Set `contagious`. Monotonic. Does not imply `infected` by
    /// itself; the paired check operation establishes that, so the
    /// combination is only transient during a local fixpoint.
    pub fn mark_contagious(&mut self, reason: impl Into<String>) {
        if !self.contagious {
            self.contagious = true;
            self.reasons.push(reason.into());
        }
    }

    /// Cheap copy of the propagation-relevant fields.
    pub fn snapshot(&self) -> InfectionSnapshot {
        InfectionSnapshot {
            name: self.name.clone(),
            infected: self.infected,
            contagious: self.contagious,
        }
    }
}

/// Propagation-relevant view of an upstream definition's state.
#[derive(Debug, Clone)]
pub struct InfectionSnapshot {
    pub name: String,
    pub infected: bool,
    pub contagious: bool,
}

/// What to re-check within one selected module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModuleSelection {
    /// Re-check the entire module (fallback mode).
    WholeModule,
    /// Re-check exactly these definitions. May be empty: the module's
    /// post-checks still run.
    Definitions(Vec<String>),
}

/// Which algorithm produced the outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SelectionMode {
    DefinitionLevel,
    WholeModule,
}

impl SelectionMode {
    pub fn name(&self) -> &'static str {
        match self {
            Self::DefinitionLevel => "definition_level",
            Self::WholeModule => "whole_module",
        }
    }
}

/// Result of one selection run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectionOutcome {
    pub mode: SelectionMode,
    /// Module name → what to re-check. Absence means "provably not
    /// affected," never "unknown."
    pub to_check: FxHashMap<String, ModuleSelection>,
    /// Modules skipped from semantic checking this run.
    pub skipped: FxHashSet<String>,
    pub stats: SelectionStats,
    /// Per-definition diagnostics, recorded when `debug` is enabled and
    /// definition-level selection completed.
    pub debug: Option<Vec<DefinitionReport>>,
}

impl SelectionOutcome {
    /// The definitions selected for `module`, if it was selected at
    /// definition level.
    pub fn definitions_for(&self, module: &str) -> Option<&[String]> {
        match self.to_check.get(module) {
            Some(ModuleSelection::Definitions(defs)) => Some(defs),
            _ => None,
        }
    }
}

/// Statistics from a selection run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SelectionStats {
    pub modules_total: usize,
    pub modules_selected: usize,
    pub definitions_examined: usize,
    pub definitions_infected: usize,
    /// Whether the wall-clock budget forced the whole-module fallback.
    pub fell_back: bool,
    pub duration_ms: u64,
}

/// Diagnostic record for one examined definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefinitionReport {
    pub module: String,
    pub name: String,
    pub infected: bool,
    pub contagious: bool,
    pub infected_refs: Vec<String>,
    pub reasons: Vec<String>,
}
