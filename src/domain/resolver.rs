//! Resolver
//!
//! Walks the dependency graph from the root module and binds every
//! transitively required interface to exactly one implementation. Explicit
//! configuration bindings take precedence; a sole implementation binds by
//! default; anything else fails — resolution never guesses. The closure is
//! computed from the edges of the *chosen* implementation at each step, not
//! a union across all implementations of an interface.

use std::collections::{BTreeMap, VecDeque};
use std::path::PathBuf;

use crate::domain::config::Configuration;
use crate::domain::depgraph::DependencyGraph;
use crate::domain::error::{ConfigureError, Result};
use crate::domain::registry::{ImplementationRecord, ModuleRegistry};

/// One interface bound to one concrete implementation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedBinding {
    pub implementation: String,
    pub header: PathBuf,
    pub source: Option<PathBuf>,
}

/// The full outcome of a resolution run: the root plus one binding per
/// interface in the root's transitive closure (the root's own interface
/// included). Consumed once by the emitter.
#[derive(Debug, Clone)]
pub struct Resolution {
    pub root_interface: String,
    pub root_implementation: String,
    pub bindings: BTreeMap<String, ResolvedBinding>,
}

impl Resolution {
    /// All implementation source files in the closure, sorted and deduplicated.
    pub fn source_files(&self) -> Vec<PathBuf> {
        let mut sources: Vec<PathBuf> = self
            .bindings
            .values()
            .filter_map(|b| b.source.clone())
            .collect();
        sources.sort();
        sources.dedup();
        sources
    }
}

pub struct Resolver<'a> {
    registry: &'a ModuleRegistry,
    graph: &'a DependencyGraph,
    config: &'a Configuration,
}

impl<'a> Resolver<'a> {
    pub fn new(
        registry: &'a ModuleRegistry,
        graph: &'a DependencyGraph,
        config: &'a Configuration,
    ) -> Self {
        Self { registry, graph, config }
    }

    /// Resolve the root's transitive closure. The graph has already been
    /// verified acyclic, so traversal order cannot change the result.
    pub fn resolve(&self) -> Result<Resolution> {
        let root_interface = self.config.root.clone();
        let (root_implementation, root_record) = self.registry.lookup_root(
            &root_interface,
            self.config.bindings.get(&root_interface).map(String::as_str),
        )?;

        let mut bindings = BTreeMap::new();
        bindings.insert(root_interface.clone(), make_binding(&root_implementation, root_record));

        let mut worklist: VecDeque<String> = self
            .graph
            .requires(&root_interface, &root_implementation)
            .into_iter()
            .collect();

        while let Some(interface) = worklist.pop_front() {
            if bindings.contains_key(&interface) {
                continue;
            }
            let (name, record) = self.choose(&interface)?;
            bindings.insert(interface.clone(), make_binding(&name, record));
            worklist.extend(self.graph.requires(&interface, &name));
        }

        Ok(Resolution {
            root_interface,
            root_implementation,
            bindings,
        })
    }

    /// Pick the implementation for one required interface.
    fn choose(&self, interface: &str) -> Result<(String, &'a ImplementationRecord)> {
        let candidates = self.registry.bindable_names(interface);

        if let Some(requested) = self.config.bindings.get(interface) {
            return match self
                .registry
                .record(interface, requested)
                .filter(|r| r.is_bindable())
            {
                Some(record) => Ok((requested.clone(), record)),
                None => Err(ConfigureError::UnknownImplementation {
                    interface: interface.to_string(),
                    requested: Some(requested.clone()),
                    known: candidates,
                }),
            };
        }

        match candidates.as_slice() {
            [only] => {
                let record = self
                    .registry
                    .record(interface, only)
                    .filter(|r| r.is_bindable())
                    .ok_or_else(|| ConfigureError::UnknownImplementation {
                        interface: interface.to_string(),
                        requested: None,
                        known: vec![],
                    })?;
                Ok((only.clone(), record))
            }
            [] => Err(ConfigureError::UnknownImplementation {
                interface: interface.to_string(),
                requested: None,
                known: vec![],
            }),
            many => Err(ConfigureError::AmbiguousImplementation {
                interface: interface.to_string(),
                candidates: many.to_vec(),
            }),
        }
    }
}

fn make_binding(name: &str, record: &ImplementationRecord) -> ResolvedBinding {
    ResolvedBinding {
        implementation: name.to_string(),
        // Bindable records always carry a header; lookup paths enforce it.
        header: record
            .header_path()
            .map(PathBuf::from)
            .unwrap_or_default(),
        source: record.source_path().map(PathBuf::from),
    }
}
