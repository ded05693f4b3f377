//! Advisory diagnostics — human-readable report, Graphviz dot, JSON.
//!
//! Side-channel output only; nothing here participates in the
//! selection contract.

use std::io::Write;

use recheck_core::errors::ReportError;

use super::types::{DefinitionReport, ModuleSelection, SelectionOutcome};

/// Render a human-readable summary of a selection run.
pub fn render_report(outcome: &SelectionOutcome) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "broken-parts selection ({} mode)\n",
        outcome.mode.name()
    ));
    out.push_str(&format!(
        "  modules: {} total, {} selected, {} skipped\n",
        outcome.stats.modules_total,
        outcome.stats.modules_selected,
        outcome.skipped.len()
    ));
    out.push_str(&format!(
        "  definitions: {} examined, {} infected\n",
        outcome.stats.definitions_examined, outcome.stats.definitions_infected
    ));
    if outcome.stats.fell_back {
        out.push_str("  budget exceeded: whole-module fallback was used\n");
    }

    let mut modules: Vec<&String> = outcome.to_check.keys().collect();
    modules.sort();
    for module in modules {
        match &outcome.to_check[module] {
            ModuleSelection::WholeModule => {
                out.push_str(&format!("  {module}: whole module\n"));
            }
            ModuleSelection::Definitions(defs) => {
                let mut defs: Vec<&String> = defs.iter().collect();
                defs.sort();
                out.push_str(&format!("  {module}: {} definition(s)\n", defs.len()));
                for def in defs {
                    out.push_str(&format!("    - {def}\n"));
                }
            }
        }
    }

    if let Some(reports) = &outcome.debug {
        out.push_str("  infection trail:\n");
        for report in reports {
            if report.reasons.is_empty() {
                continue;
            }
            out.push_str(&format!("    {}::{}\n", report.module, report.name));
            for reason in &report.reasons {
                out.push_str(&format!("      {reason}\n"));
            }
        }
    }
    out
}

/// Render the infection edges of a run as a Graphviz digraph.
///
/// One edge per (definition, infected reference) pair; contagious
/// definitions are drawn filled.
pub fn render_dot(reports: &[DefinitionReport]) -> String {
    let mut out = String::new();
    out.push_str("digraph infection {\n");
    out.push_str("  rankdir=LR;\n");
    for report in reports {
        if !report.infected {
            continue;
        }
        let label = format!("{}::{}", report.module, report.name);
        if report.contagious {
            out.push_str(&format!(
                "  \"{label}\" [style=filled, fillcolor=lightcoral];\n"
            ));
        } else {
            out.push_str(&format!("  \"{label}\";\n"));
        }
        let mut refs: Vec<&String> = report.infected_refs.iter().collect();
        refs.sort();
        for name in refs {
            out.push_str(&format!("  \"{label}\" -> \"{name}\";\n"));
        }
    }
    out.push_str("}\n");
    out
}

/// Write the human-readable report to `writer`.
pub fn write_report(outcome: &SelectionOutcome, writer: &mut dyn Write) -> Result<(), ReportError> {
    writer.write_all(render_report(outcome).as_bytes())?;
    Ok(())
}

/// Serialize the outcome as pretty JSON.
pub fn to_json(outcome: &SelectionOutcome) -> Result<String, ReportError> {
    serde_json::to_string_pretty(outcome).map_err(|e| ReportError::Serialization {
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selection::types::{SelectionMode, SelectionStats};
    use recheck_core::{FxHashMap, FxHashSet};

    fn outcome() -> SelectionOutcome {
        let mut to_check = FxHashMap::default();
        to_check.insert(
            "mod_a".to_string(),
            ModuleSelection::Definitions(vec!["f_a".to_string(), "f_b".to_string()]),
        );
        to_check.insert("mod_b".to_string(), ModuleSelection::WholeModule);
        let mut skipped = FxHashSet::default();
        skipped.insert("mod_c".to_string());
        SelectionOutcome {
            mode: SelectionMode::DefinitionLevel,
            to_check,
            skipped,
            stats: SelectionStats {
                modules_total: 3,
                modules_selected: 2,
                definitions_examined: 4,
                definitions_infected: 2,
                fell_back: false,
                duration_ms: 1,
            },
            debug: Some(vec![DefinitionReport {
                module: "mod_a".to_string(),
                name: "f_b".to_string(),
                infected: true,
                contagious: false,
                infected_refs: vec!["f_a".to_string()],
                reasons: vec!["references infected definition `f_a`".to_string()],
            }]),
        }
    }

    #[test]
    fn report_names_selected_modules_and_definitions() {
        let text = render_report(&outcome());
        assert!(text.contains("mod_a: 2 definition(s)"));
        assert!(text.contains("- f_a"));
        assert!(text.contains("mod_b: whole module"));
        assert!(text.contains("references infected definition `f_a`"));
    }

    #[test]
    fn dot_output_has_one_edge_per_infected_ref() {
        let reports = outcome().debug.unwrap();
        let dot = render_dot(&reports);
        assert!(dot.starts_with("digraph infection {"));
        assert!(dot.contains("\"mod_a::f_b\" -> \"f_a\";"));
        assert!(dot.ends_with("}\n"));
    }

    #[test]
    fn json_round_trips_the_outcome() {
        let json = to_json(&outcome()).unwrap();
        let parsed: SelectionOutcome = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.mode, SelectionMode::DefinitionLevel);
        assert_eq!(parsed.to_check.len(), 2);
    }
}
