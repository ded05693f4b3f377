//! Propagation engine — computes the minimal re-check set per module.

use std::time::Instant;

use petgraph::graph::NodeIndex;
use recheck_core::traits::ProgressReporter;
use recheck_core::{FxHashMap, FxHashSet, NoopProgress, SelectionConfig};
use tracing::{debug, info, warn};

use crate::lang::module::{Module, ModuleGraph};

use super::fixpoint::resolve_local_fixpoint;
use super::handlers::{DefinitionHandler, HandlerStore};
use super::imports::InvertedImports;
use super::types::{
    DefinitionReport, InfectionSnapshot, ModuleSelection, SelectionMode, SelectionOutcome,
    SelectionStats,
};

/// The broken-parts selection engine.
///
/// Runs definition-level selection first (unless configured off) and
/// degrades to whole-module selection when the wall-clock budget is
/// exceeded. Whole-module selection is always a safe superset, so a
/// timeout costs precision, never correctness.
///
/// Single-threaded and synchronous; the caller guarantees exclusive
/// ownership of the module graph for the duration of one run.
pub struct SelectionEngine {
    config: SelectionConfig,
}

/// Per-module working state during definition-level selection.
struct ModuleHandlers {
    store: HandlerStore,
    brokens: Vec<usize>,
    not_brokens: Vec<usize>,
}

impl ModuleHandlers {
    fn classify_module(module: &Module) -> ModuleHandlers {
        let never_checked = module.last_checked.is_none();
        let mut store = HandlerStore::new();
        for def in &module.definitions {
            store.insert(DefinitionHandler::classify(def, never_checked));
        }
        ModuleHandlers { store, brokens: Vec::new(), not_brokens: Vec::new() }
    }

    /// Rebuild the broken/not-broken partition from current flags.
    fn partition(&mut self) {
        self.brokens.clear();
        self.not_brokens.clear();
        for slot in 0..self.store.len() {
            if self.store.handler(slot).state().is_infected() {
                self.brokens.push(slot);
            } else {
                self.not_brokens.push(slot);
            }
        }
    }

    fn contagious_snapshots(&self) -> Vec<InfectionSnapshot> {
        self.store
            .iter()
            .filter(|h| h.state().is_contagious())
            .map(|h| h.state().snapshot())
            .collect()
    }

    fn infected_names(&self) -> Vec<String> {
        self.store
            .iter()
            .filter(|h| h.state().is_infected())
            .map(|h| h.name().to_string())
            .collect()
    }
}

/// Working state of one definition-level attempt.
struct DefinitionRun {
    handlers: FxHashMap<NodeIndex, ModuleHandlers>,
    worklist: Vec<NodeIndex>,
    in_worklist: FxHashSet<NodeIndex>,
}

impl SelectionEngine {
    pub fn new(config: SelectionConfig) -> Self {
        Self { config }
    }

    /// Compute the set of definitions, grouped by module, that must be
    /// re-checked, given the modules already known good by name.
    ///
    /// Mutates run-scoped flags on the graph: definition and module
    /// check-roots of processed modules are cleared, and the skipped
    /// flag is set symmetrically on every module.
    pub fn select(
        &self,
        graph: &mut ModuleGraph,
        already_checked: &FxHashSet<String>,
        progress: &mut dyn ProgressReporter,
    ) -> SelectionOutcome {
        let started = Instant::now();
        let inverted = InvertedImports::build(graph);
        let seeds = collect_seeds(graph, already_checked);

        info!(
            modules = graph.module_count(),
            seeds = seeds.len(),
            "selection started"
        );
        progress.begin_task("broken-parts selection", graph.module_count());

        let mut fell_back = false;
        let mut outcome = if self.config.effective_definition_level() {
            match self.select_definitions(graph, &inverted, &seeds, started, progress) {
                Some(run) => self.finalize_definitions(graph, run),
                None => {
                    warn!("definition-level selection exceeded its budget, falling back");
                    fell_back = true;
                    self.select_whole_modules(graph, &inverted, &seeds)
                }
            }
        } else {
            self.select_whole_modules(graph, &inverted, &seeds)
        };

        outcome.stats.modules_total = graph.module_count();
        outcome.stats.modules_selected = outcome.to_check.len();
        outcome.stats.fell_back = fell_back;
        outcome.stats.duration_ms = started.elapsed().as_millis() as u64;
        progress.done();

        info!(
            mode = outcome.mode.name(),
            selected = outcome.stats.modules_selected,
            infected = outcome.stats.definitions_infected,
            "selection finished"
        );
        outcome
    }

    /// Definition-level selection. Returns `None` when the wall-clock
    /// budget trips; partial results are discarded, never merged.
    fn select_definitions(
        &self,
        graph: &ModuleGraph,
        inverted: &InvertedImports,
        seeds: &[NodeIndex],
        started: Instant,
        progress: &mut dyn ProgressReporter,
    ) -> Option<DefinitionRun> {
        let mut run = DefinitionRun {
            handlers: FxHashMap::default(),
            worklist: Vec::new(),
            in_worklist: FxHashSet::default(),
        };

        for &seed in seeds {
            let module = graph.module(seed);
            progress.subtask(&module.name);
            let mut handlers = ModuleHandlers::classify_module(module);

            if module.last_checked.is_some() && !module.check_root {
                // Previously compiled: only edited definitions start broken.
                for def in &module.definitions {
                    if def.check_root {
                        if let Some(slot) = handlers.store.slot_of(&def.name) {
                            let state = handlers.store.handler_mut(slot).state_mut();
                            state.mark_infected("definition changed by incremental parse");
                            state.mark_contagious("definition changed by incremental parse");
                        }
                    }
                }
                handlers.partition();
                resolve_local_fixpoint(
                    &mut handlers.store,
                    &mut handlers.brokens,
                    &mut handlers.not_brokens,
                );
            } else {
                let reason = if module.last_checked.is_none() {
                    "owning module was never checked"
                } else {
                    "owning module forced a full re-check"
                };
                for slot in 0..handlers.store.len() {
                    let state = handlers.store.handler_mut(slot).state_mut();
                    state.mark_infected(reason);
                    state.mark_contagious(reason);
                }
                handlers.partition();
            }

            debug!(
                module = %module.name,
                broken = handlers.brokens.len(),
                "seed module classified"
            );
            run.handlers.insert(seed, handlers);
            run.worklist.push(seed);
            run.in_worklist.insert(seed);
        }

        // Growing worklist, iterated by index so appended modules are
        // visited in the same sweep.
        let mut i = 0;
        while i < run.worklist.len() {
            if self.too_slow(started) {
                return None;
            }
            let current = run.worklist[i];
            i += 1;

            let contagious = run.handlers[&current].contagious_snapshots();
            progress.worked(1);
            if contagious.is_empty() {
                continue;
            }

            let importers: Vec<NodeIndex> = inverted.importers_of(current).to_vec();
            for dependent in importers {
                if dependent == current {
                    continue;
                }
                if self.too_slow(started) {
                    return None;
                }
                let dependent_module = graph.module(dependent);
                progress.subtask(&dependent_module.name);

                let handlers = run.handlers.entry(dependent).or_insert_with(|| {
                    let mut h = ModuleHandlers::classify_module(dependent_module);
                    h.partition();
                    h
                });

                let mut newly_infected = false;
                for upstream in &contagious {
                    for slot in 0..handlers.store.len() {
                        let handler = handlers.store.handler_mut(slot);
                        let was_infected = handler.state().is_infected();
                        handler.check_against(upstream);
                        if !was_infected && handler.state().is_infected() {
                            newly_infected = true;
                        }
                    }
                }
                if newly_infected {
                    handlers.partition();
                }
                resolve_local_fixpoint(
                    &mut handlers.store,
                    &mut handlers.brokens,
                    &mut handlers.not_brokens,
                );

                if !handlers.brokens.is_empty() && !run.in_worklist.contains(&dependent) {
                    debug!(module = %dependent_module.name, "infection reached dependent module");
                    run.worklist.push(dependent);
                    run.in_worklist.insert(dependent);
                }
            }
        }

        Some(run)
    }

    /// Turn a completed definition-level run into the outcome, filter
    /// to infected definitions, and settle run-scoped flags.
    fn finalize_definitions(&self, graph: &mut ModuleGraph, run: DefinitionRun) -> SelectionOutcome {
        let mut to_check: FxHashMap<String, ModuleSelection> = FxHashMap::default();
        let mut infected_total = 0;

        // Modules the worklist never reached contribute nothing: their
        // handlers were computed speculatively and are dropped here.
        for &node in &run.worklist {
            let handlers = &run.handlers[&node];
            let infected = handlers.infected_names();
            infected_total += infected.len();
            to_check.insert(
                graph.module(node).name.clone(),
                ModuleSelection::Definitions(infected),
            );
        }

        let examined: usize = run.handlers.values().map(|h| h.store.len()).sum();
        let debug_reports = self.config.effective_debug().then(|| {
            let mut reports: Vec<DefinitionReport> = Vec::with_capacity(examined);
            for (&node, handlers) in &run.handlers {
                let module_name = &graph.module(node).name;
                for handler in handlers.store.iter() {
                    let state = handler.state();
                    let mut infected_refs: Vec<String> =
                        state.infected_refs.iter().cloned().collect();
                    infected_refs.sort();
                    reports.push(DefinitionReport {
                        module: module_name.clone(),
                        name: handler.name().to_string(),
                        infected: state.is_infected(),
                        contagious: state.is_contagious(),
                        infected_refs,
                        reasons: state.reasons.to_vec(),
                    });
                }
            }
            reports
        });

        // Processed definitions lose their check-root flag so they do
        // not force infection again next run.
        for &node in run.handlers.keys() {
            let module = graph.module_mut(node);
            for def in &mut module.definitions {
                def.check_root = false;
            }
        }

        // The skipped flag is symmetric: set for unselected modules,
        // cleared for selected ones.
        let nodes: Vec<NodeIndex> = graph.graph.node_indices().collect();
        let mut skipped: FxHashSet<String> = FxHashSet::default();
        for node in nodes {
            let selected = run.in_worklist.contains(&node);
            let module = graph.module_mut(node);
            module.skipped = !selected;
            if selected {
                module.check_root = false;
            } else {
                skipped.insert(module.name.clone());
            }
        }

        SelectionOutcome {
            mode: SelectionMode::DefinitionLevel,
            to_check,
            skipped,
            stats: SelectionStats {
                definitions_examined: examined,
                definitions_infected: infected_total,
                ..Default::default()
            },
            debug: debug_reports,
        }
    }

    /// Whole-module selection: transitively collect every module
    /// reachable from the seeds via "imported-by" edges and mark it for
    /// a full re-check.
    fn select_whole_modules(
        &self,
        graph: &mut ModuleGraph,
        inverted: &InvertedImports,
        seeds: &[NodeIndex],
    ) -> SelectionOutcome {
        let mut visited: Vec<NodeIndex> = Vec::new();
        let mut seen: FxHashSet<NodeIndex> = FxHashSet::default();
        for &seed in seeds {
            if seen.insert(seed) {
                visited.push(seed);
            }
        }

        let mut i = 0;
        while i < visited.len() {
            let current = visited[i];
            i += 1;
            for &importer in inverted.importers_of(current) {
                if seen.insert(importer) {
                    visited.push(importer);
                }
            }
        }

        let mut to_check: FxHashMap<String, ModuleSelection> = FxHashMap::default();
        let mut definitions_total = 0;
        for &node in &visited {
            let module = graph.module_mut(node);
            for def in &mut module.definitions {
                def.check_root = false;
            }
            module.check_root = false;
            definitions_total += module.definitions.len();
            to_check.insert(module.name.clone(), ModuleSelection::WholeModule);
        }

        let nodes: Vec<NodeIndex> = graph.graph.node_indices().collect();
        let mut skipped: FxHashSet<String> = FxHashSet::default();
        for node in nodes {
            let selected = seen.contains(&node);
            let module = graph.module_mut(node);
            module.skipped = !selected;
            if !selected {
                skipped.insert(module.name.clone());
            }
        }

        SelectionOutcome {
            mode: SelectionMode::WholeModule,
            to_check,
            skipped,
            stats: SelectionStats {
                definitions_examined: definitions_total,
                definitions_infected: definitions_total,
                ..Default::default()
            },
            debug: None,
        }
    }

    fn too_slow(&self, started: Instant) -> bool {
        match self.config.effective_time_limit() {
            Some(limit) => started.elapsed() >= limit,
            None => false,
        }
    }
}

/// Start modules: never checked, explicitly flagged for re-check, or
/// absent from the session's already-checked registry.
fn collect_seeds(graph: &ModuleGraph, already_checked: &FxHashSet<String>) -> Vec<NodeIndex> {
    graph
        .graph
        .node_indices()
        .filter(|&node| {
            let module = graph.module(node);
            module.last_checked.is_none()
                || module.check_root
                || !already_checked.contains(&module.name)
        })
        .collect()
}

/// Convenience entry point with default progress reporting.
pub fn select_broken_parts(
    graph: &mut ModuleGraph,
    already_checked: &FxHashSet<String>,
    config: SelectionConfig,
) -> SelectionOutcome {
    SelectionEngine::new(config).select(graph, already_checked, &mut NoopProgress)
}
