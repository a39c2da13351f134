//! Dependency Graph
//!
//! Links each declared implementation to the interfaces its files reference.
//! Edges are keyed by (interface, implementation) because different
//! implementations of one interface may require different things; cycle
//! detection runs on the interface-level union, since header inclusion must
//! form a DAG no matter which implementations get chosen.

use std::collections::{BTreeMap, BTreeSet};

use crate::domain::error::{ConfigureError, Result};
use crate::domain::module::FileScan;

#[derive(Debug, Default)]
pub struct DependencyGraph {
    /// (interface, implementation) -> interfaces its header+source reference.
    edges: BTreeMap<(String, String), BTreeSet<String>>,
}

impl DependencyGraph {
    /// Build the graph from the per-file scans. Files without a declaration
    /// contribute no edges; a module's header and source merge under one key.
    pub fn build(scans: &[FileScan]) -> Self {
        let mut graph = DependencyGraph::default();
        for scan in scans {
            if let Some(decl) = &scan.declaration {
                graph
                    .edges
                    .entry((decl.interface.clone(), decl.implementation.clone()))
                    .or_default()
                    .extend(scan.references.iter().cloned());
            }
        }
        graph
    }

    /// Interfaces required by one implementation, in name order.
    /// Self-references are kept; the resolver treats them as a no-op.
    pub fn requires(&self, interface: &str, implementation: &str) -> BTreeSet<String> {
        self.edges
            .get(&(interface.to_string(), implementation.to_string()))
            .cloned()
            .unwrap_or_default()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.values().map(|refs| refs.len()).sum()
    }

    /// Fail on any cycle through distinct interfaces, reporting the full
    /// cycle path. A module referencing its own interface is not a cycle.
    pub fn verify_acyclic(&self) -> Result<()> {
        // Union the per-implementation edges into interface-level adjacency.
        let mut adjacency: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
        for ((interface, _), refs) in &self.edges {
            let entry = adjacency.entry(interface.as_str()).or_default();
            for reference in refs {
                if reference != interface {
                    entry.insert(reference.as_str());
                }
            }
        }

        #[derive(Clone, Copy, PartialEq)]
        enum Mark {
            Visiting,
            Done,
        }

        fn visit<'a>(
            node: &'a str,
            adjacency: &BTreeMap<&'a str, BTreeSet<&'a str>>,
            marks: &mut BTreeMap<&'a str, Mark>,
            stack: &mut Vec<&'a str>,
        ) -> Result<()> {
            match marks.get(node) {
                Some(Mark::Done) => return Ok(()),
                Some(Mark::Visiting) => {
                    let start = stack.iter().position(|&n| n == node).unwrap_or(0);
                    let mut cycle: Vec<String> =
                        stack[start..].iter().map(|n| n.to_string()).collect();
                    cycle.push(node.to_string());
                    return Err(ConfigureError::CyclicDependency { cycle });
                }
                None => {}
            }

            marks.insert(node, Mark::Visiting);
            stack.push(node);
            if let Some(next) = adjacency.get(node) {
                for &reference in next {
                    visit(reference, adjacency, marks, stack)?;
                }
            }
            stack.pop();
            marks.insert(node, Mark::Done);
            Ok(())
        }

        let mut marks = BTreeMap::new();
        let mut stack = Vec::new();
        for &node in adjacency.keys() {
            visit(node, &adjacency, &mut marks, &mut stack)?;
        }
        Ok(())
    }
}
