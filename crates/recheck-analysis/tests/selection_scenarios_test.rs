//! End-to-end selection scenarios over small module universes.

use recheck_analysis::lang::{DefKind, Definition, Module, ModuleGraph, Node, Reference};
use recheck_analysis::selection::engine::select_broken_parts;
use recheck_analysis::selection::{ModuleSelection, SelectionMode};
use recheck_core::types::CheckGeneration;
use recheck_core::{FxHashSet, SelectionConfig};

fn function(name: &str, body: Node) -> Definition {
    Definition::new(name, DefKind::Function, body)
}

fn body_ref(name: &str) -> Node {
    Node::StatementBlock(vec![Node::reference(name)])
}

fn signature_ref(name: &str) -> Node {
    Node::Declaration(vec![Node::reference(name)])
}

fn checked(names: &[&str]) -> FxHashSet<String> {
    names.iter().map(|s| s.to_string()).collect()
}

fn debug_config() -> SelectionConfig {
    SelectionConfig { debug: Some(true), ..Default::default() }
}

// A fresh module that already passed one check.
fn checked_module(name: &str, definitions: Vec<Definition>) -> Module {
    Module::new(name)
        .with_definitions(definitions)
        .with_last_checked(CheckGeneration::INITIAL)
}

#[test]
fn never_checked_module_is_fully_selected() {
    // Module x was never checked: every definition must come back,
    // infected and contagious, even though f_a references nothing.
    let mut graph = ModuleGraph::from_modules(vec![
        Module::new("x").with_definitions(vec![function("f_a", Node::empty())]),
    ]);

    let outcome = select_broken_parts(&mut graph, &checked(&[]), debug_config());

    assert_eq!(outcome.mode, SelectionMode::DefinitionLevel);
    assert_eq!(outcome.definitions_for("x"), Some(&["f_a".to_string()][..]));
    assert!(!outcome.skipped.contains("x"));

    let reports = outcome.debug.unwrap();
    let f_a = reports.iter().find(|r| r.name == "f_a").unwrap();
    assert!(f_a.infected);
    assert!(f_a.contagious);
}

#[test]
fn check_root_infection_spreads_through_the_contagious_export_only() {
    // x: f_a edited, f_b calls f_a from its body.
    // y imports x: f_c calls f_a from its body.
    let mut graph = ModuleGraph::from_modules(vec![
        checked_module(
            "x",
            vec![
                function("f_a", Node::empty()).with_check_root(),
                function("f_b", body_ref("f_a")),
            ],
        ),
        checked_module("y", vec![function("f_c", body_ref("f_a"))]).with_imports(&["x"]),
    ]);

    let outcome = select_broken_parts(&mut graph, &checked(&["y"]), debug_config());

    let mut x_defs = outcome.definitions_for("x").unwrap().to_vec();
    x_defs.sort();
    assert_eq!(x_defs, vec!["f_a".to_string(), "f_b".to_string()]);
    assert_eq!(outcome.definitions_for("y"), Some(&["f_c".to_string()][..]));

    let reports = outcome.debug.unwrap();
    let by_name = |n: &str| reports.iter().find(|r| r.name == n).unwrap();
    // f_a is the infection source.
    assert!(by_name("f_a").infected);
    assert!(by_name("f_a").contagious);
    // f_b is re-checkable but not an infection source: its only path
    // to f_a is a body reference.
    assert!(by_name("f_b").infected);
    assert!(!by_name("f_b").contagious);
    // f_c was reached through x's contagious export of f_a, and the
    // trail says so.
    assert!(by_name("f_c").infected);
    assert!(by_name("f_c").infected_refs.contains(&"f_a".to_string()));
}

#[test]
fn component_infection_attributes_members_and_spreads_locally() {
    // m1 uses the external function g in a declarative position; m2
    // uses m1. f_t names the component in its signature.
    let component = Definition::component(
        "c_comp",
        vec![
            Definition::new("m1", DefKind::Const, signature_ref("g")),
            Definition::new("m2", DefKind::Const, signature_ref("m1")),
        ],
        vec![Reference::resolved("c_base")],
    );
    let mut graph = ModuleGraph::from_modules(vec![
        checked_module("lib", vec![function("g", Node::empty()).with_check_root()]),
        checked_module("suite", vec![component, function("f_t", signature_ref("c_comp"))])
            .with_imports(&["lib"]),
    ]);

    let outcome = select_broken_parts(&mut graph, &checked(&["suite"]), debug_config());

    let mut suite_defs = outcome.definitions_for("suite").unwrap().to_vec();
    suite_defs.sort();
    assert_eq!(suite_defs, vec!["c_comp".to_string(), "f_t".to_string()]);

    let reports = outcome.debug.unwrap();
    let c = reports.iter().find(|r| r.name == "c_comp").unwrap();
    assert!(c.infected);
    assert!(c.contagious);
    assert!(c.infected_refs.contains(&"g".to_string()));
    // The local fixpoint carried the infection on to the signature user.
    let f_t = reports.iter().find(|r| r.name == "f_t").unwrap();
    assert!(f_t.infected);
    assert!(f_t.infected_refs.contains(&"c_comp".to_string()));
}

#[test]
fn budget_overrun_matches_whole_module_selection() {
    let modules = || {
        vec![
            checked_module("base", vec![function("f_a", Node::empty()).with_check_root()]),
            checked_module("mid", vec![function("f_b", body_ref("f_a"))]).with_imports(&["base"]),
            checked_module("top", vec![function("f_c", body_ref("f_b"))]).with_imports(&["mid"]),
            checked_module("aside", vec![function("f_d", Node::empty())]),
        ]
    };
    let registry = checked(&["mid", "top", "aside"]);

    // An exhausted budget trips on the first worklist step.
    let mut timed_out = ModuleGraph::from_modules(modules());
    let overrun = select_broken_parts(
        &mut timed_out,
        &registry,
        SelectionConfig { time_limit_ms: Some(0), ..Default::default() },
    );

    let mut coarse_graph = ModuleGraph::from_modules(modules());
    let coarse = select_broken_parts(
        &mut coarse_graph,
        &registry,
        SelectionConfig { definition_level: Some(false), ..Default::default() },
    );

    assert_eq!(overrun.mode, SelectionMode::WholeModule);
    assert!(overrun.stats.fell_back);
    assert!(!coarse.stats.fell_back);
    assert_eq!(overrun.to_check, coarse.to_check);
    assert_eq!(overrun.skipped, coarse.skipped);
}

#[test]
fn whole_module_selection_is_a_superset_of_definition_level() {
    let modules = || {
        vec![
            checked_module("base", vec![function("f_a", Node::empty()).with_check_root()]),
            checked_module("user", vec![function("f_b", body_ref("f_a"))]).with_imports(&["base"]),
            // untouched never references anything broken.
            checked_module("untouched", vec![function("f_c", Node::empty())])
                .with_imports(&["base"]),
        ]
    };
    let registry = checked(&["user", "untouched"]);

    let mut fine_graph = ModuleGraph::from_modules(modules());
    let fine = select_broken_parts(&mut fine_graph, &registry, SelectionConfig::default());

    let mut coarse_graph = ModuleGraph::from_modules(modules());
    let coarse = select_broken_parts(
        &mut coarse_graph,
        &registry,
        SelectionConfig { definition_level: Some(false), ..Default::default() },
    );

    for (module, selection) in &fine.to_check {
        if matches!(selection, ModuleSelection::Definitions(defs) if !defs.is_empty()) {
            assert!(
                coarse.to_check.contains_key(module),
                "whole-module selection must cover {module}"
            );
        }
    }
}

#[test]
fn unaffected_module_is_dropped_and_marked_skipped() {
    // downstream imports base but never references the broken name.
    let mut graph = ModuleGraph::from_modules(vec![
        checked_module("base", vec![function("f_a", Node::empty()).with_check_root()]),
        checked_module("downstream", vec![function("f_other", body_ref("f_unrelated"))])
            .with_imports(&["base"]),
    ]);

    let outcome = select_broken_parts(&mut graph, &checked(&["downstream"]), SelectionConfig::default());

    assert!(outcome.to_check.contains_key("base"));
    assert!(!outcome.to_check.contains_key("downstream"));
    assert!(outcome.skipped.contains("downstream"));
    let downstream = graph.get_node("downstream").unwrap();
    assert!(graph.module(downstream).skipped);
}

#[test]
fn seed_with_no_infection_is_still_included_with_an_empty_list() {
    // quiet is a seed (absent from the registry) but nothing in it is
    // broken: its post-checks still run, so it stays in the result.
    let mut graph = ModuleGraph::from_modules(vec![
        checked_module("quiet", vec![function("f_a", Node::empty())]),
    ]);

    let outcome = select_broken_parts(&mut graph, &checked(&[]), SelectionConfig::default());

    assert_eq!(outcome.definitions_for("quiet"), Some(&[][..]));
    assert!(!outcome.skipped.contains("quiet"));
}

#[test]
fn run_scoped_flags_are_settled_after_selection() {
    let mut graph = ModuleGraph::from_modules(vec![
        checked_module("x", vec![function("f_a", Node::empty()).with_check_root()]),
        checked_module("bystander", vec![function("f_b", Node::empty())]),
    ]);

    let outcome = select_broken_parts(&mut graph, &checked(&["bystander"]), SelectionConfig::default());

    let x = graph.get_node("x").unwrap();
    // Processed check-roots are cleared so they do not force infection
    // again next run.
    assert!(!graph.module(x).definitions[0].check_root);
    assert!(!graph.module(x).skipped);
    let bystander = graph.get_node("bystander").unwrap();
    assert!(graph.module(bystander).skipped);
    assert!(outcome.skipped.contains("bystander"));
}

#[test]
fn erroneous_reference_forces_selection_of_its_owner() {
    let body = Node::Seq(vec![Node::Reference(Reference::unresolved("f_gone"))]);
    let mut graph = ModuleGraph::from_modules(vec![
        checked_module("broken", vec![function("f_bad", body), function("f_ok", Node::empty())]),
    ]);

    let outcome = select_broken_parts(&mut graph, &checked(&[]), SelectionConfig::default());

    let defs = outcome.definitions_for("broken").unwrap();
    assert!(defs.contains(&"f_bad".to_string()));
}

#[test]
fn cyclic_imports_terminate_and_select_both_sides() {
    let mut graph = ModuleGraph::from_modules(vec![
        checked_module("a", vec![function("f_a", Node::empty()).with_check_root()])
            .with_imports(&["b"]),
        checked_module("b", vec![function("f_b", signature_ref("f_a"))]).with_imports(&["a"]),
    ]);

    let outcome = select_broken_parts(&mut graph, &checked(&["b"]), SelectionConfig::default());

    assert!(outcome.to_check.contains_key("a"));
    assert_eq!(outcome.definitions_for("b"), Some(&["f_b".to_string()][..]));
}
