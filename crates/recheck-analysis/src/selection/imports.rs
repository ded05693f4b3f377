//! Inverted import index — "who imports me," built once per run.

use petgraph::graph::NodeIndex;
use petgraph::Direction;
use recheck_core::FxHashMap;

use crate::lang::module::ModuleGraph;

/// Reverse adjacency of the declared import relation.
///
/// Every module in the universe appears as a key, even with an empty
/// importer list, so leaf and top-level modules are always addressable.
/// Cycles in the import graph are permitted and not detected here.
#[derive(Debug, Default)]
pub struct InvertedImports {
    map: FxHashMap<NodeIndex, Vec<NodeIndex>>,
}

impl InvertedImports {
    /// Build the index from the forward import edges of `graph`.
    ///
    /// Appends are idempotent via a linear contains check; importer
    /// lists are small enough that this stays cheap.
    pub fn build(graph: &ModuleGraph) -> Self {
        let mut map: FxHashMap<NodeIndex, Vec<NodeIndex>> = FxHashMap::default();
        for node in graph.graph.node_indices() {
            map.insert(node, Vec::new());
        }
        for importer in graph.graph.node_indices() {
            for imported in graph.graph.neighbors_directed(importer, Direction::Outgoing) {
                let list = map.entry(imported).or_default();
                if !list.contains(&importer) {
                    list.push(importer);
                }
            }
        }
        Self { map }
    }

    /// Modules that directly import `module`.
    pub fn importers_of(&self, module: NodeIndex) -> &[NodeIndex] {
        self.map.get(&module).map(|v| v.as_slice()).unwrap_or(&[])
    }

    /// Whether `module` is a key in the index.
    pub fn contains(&self, module: NodeIndex) -> bool {
        self.map.contains_key(&module)
    }

    /// Number of modules indexed.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}
