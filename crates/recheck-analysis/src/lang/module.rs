//! Modules and the module graph.

use petgraph::graph::NodeIndex;
use petgraph::stable_graph::StableGraph;
use petgraph::Directed;
use recheck_core::types::CheckGeneration;
use recheck_core::FxHashMap;
use serde::{Deserialize, Serialize};

use super::definition::Definition;

/// A compilation unit: an ordered collection of definitions plus the
/// names of the modules it imports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Module {
    pub name: String,
    pub definitions: Vec<Definition>,
    /// Names of directly imported modules.
    pub imports: Vec<String>,
    /// Generation of the last successful check; `None` means never
    /// checked and no prior analysis can be trusted.
    pub last_checked: Option<CheckGeneration>,
    /// Force a full re-check regardless of incremental analysis.
    pub check_root: bool,
    /// Excluded from semantic checking in the current run. Symmetric:
    /// set for unselected modules, cleared for selected ones.
    pub skipped: bool,
}

impl Module {
    pub fn new(name: &str) -> Module {
        Module {
            name: name.to_string(),
            definitions: Vec::new(),
            imports: Vec::new(),
            last_checked: None,
            check_root: false,
            skipped: false,
        }
    }

    pub fn with_definitions(mut self, definitions: Vec<Definition>) -> Module {
        self.definitions = definitions;
        self
    }

    pub fn with_imports(mut self, imports: &[&str]) -> Module {
        self.imports = imports.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_last_checked(mut self, generation: CheckGeneration) -> Module {
        self.last_checked = Some(generation);
        self
    }

    /// Look up a definition by name.
    pub fn definition(&self, name: &str) -> Option<&Definition> {
        self.definitions.iter().find(|d| d.name == name)
    }
}

/// Import edge weight. Direction is importer → imported.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ImportEdge;

/// The module universe: a directed import graph over modules.
pub struct ModuleGraph {
    /// The underlying petgraph StableGraph.
    pub graph: StableGraph<Module, ImportEdge, Directed>,
    /// Map from module name → NodeIndex for O(1) lookup.
    pub node_index: FxHashMap<String, NodeIndex>,
}

impl ModuleGraph {
    /// Create an empty module graph.
    pub fn new() -> Self {
        Self {
            graph: StableGraph::new(),
            node_index: FxHashMap::default(),
        }
    }

    /// Build a graph from a module list, wiring import edges for every
    /// import name that resolves to a module in the list. Unknown
    /// import names are ignored.
    pub fn from_modules(modules: Vec<Module>) -> Self {
        let mut graph = Self::new();
        for module in modules {
            graph.add_module(module);
        }
        graph.wire_imports();
        graph
    }

    /// Add a module node, returning its NodeIndex. Re-adding a name
    /// returns the existing node.
    pub fn add_module(&mut self, module: Module) -> NodeIndex {
        if let Some(&existing) = self.node_index.get(&module.name) {
            return existing;
        }
        let name = module.name.clone();
        let idx = self.graph.add_node(module);
        self.node_index.insert(name, idx);
        idx
    }

    /// Add importer → imported edges for all declared imports that
    /// resolve to known modules. Idempotent per edge pair.
    pub fn wire_imports(&mut self) {
        let nodes: Vec<NodeIndex> = self.graph.node_indices().collect();
        for importer in nodes {
            let imports = self.graph[importer].imports.clone();
            for name in imports {
                if let Some(&imported) = self.node_index.get(&name) {
                    if self.graph.find_edge(importer, imported).is_none() {
                        self.graph.add_edge(importer, imported, ImportEdge);
                    }
                }
            }
        }
    }

    /// Number of modules in the universe.
    pub fn module_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Look up a module node by name.
    pub fn get_node(&self, name: &str) -> Option<NodeIndex> {
        self.node_index.get(name).copied()
    }

    /// The module at `idx`.
    pub fn module(&self, idx: NodeIndex) -> &Module {
        &self.graph[idx]
    }

    /// Mutable access to the module at `idx`.
    pub fn module_mut(&mut self, idx: NodeIndex) -> &mut Module {
        &mut self.graph[idx]
    }
}

impl Default for ModuleGraph {
    fn default() -> Self {
        Self::new()
    }
}
