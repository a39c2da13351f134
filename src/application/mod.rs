// Application layer: the usecase that runs the whole configurator pipeline
// in order - load, scan, register, graph, resolve, emit.

use anyhow::Result;
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::config::Configuration;
use crate::domain::depgraph::DependencyGraph;
use crate::domain::error::ConfigureError;
use crate::domain::metadata;
use crate::domain::module::FileScan;
use crate::domain::registry::ModuleRegistry;
use crate::domain::resolver::{Resolution, Resolver};
use crate::infrastructure::{DeclarationCache, FileStamp, ProjectLoader};
use crate::ports::RedirectionEmitter;

pub struct ConfigureUsecase<'a> {
    pub emitter: &'a dyn RedirectionEmitter,
    /// Optional incremental extraction cache; a cold run behaves identically.
    pub cache: Option<&'a dyn DeclarationCache>,
}

impl ConfigureUsecase<'_> {
    /// Run one configuration pass. Artifacts are only written when every
    /// required interface resolved; any earlier failure aborts with the
    /// first error and leaves the output directory untouched.
    pub fn run(&self, config: &Configuration) -> Result<Resolution> {
        let files = ProjectLoader::collect_files(&config.search_paths)?;
        if config.verbose {
            println!("[Scan] {} candidate files", files.len());
        }

        let scans = self.scan_files(&files)?;

        // Registration is sequential over the path-sorted scans, so
        // duplicate detection reports the same pair of files no matter how
        // the tree was enumerated.
        let mut registry = ModuleRegistry::default();
        for scan in &scans {
            if let Some(decl) = &scan.declaration {
                registry.register(decl.clone())?;
            }
        }
        if config.verbose {
            println!("[Registry] {} interfaces declared", registry.interface_count());
        }

        let graph = DependencyGraph::build(&scans);
        graph.verify_acyclic()?;
        if config.verbose {
            println!("[Graph] {} dependency edges", graph.edge_count());
        }

        let resolution = Resolver::new(&registry, &graph, config).resolve()?;
        if config.verbose {
            for (interface, binding) in &resolution.bindings {
                println!("[Resolve] {} -> {}", interface, binding.implementation);
            }
        }

        self.emitter.emit(&resolution, &config.output)?;
        if let Some(list_path) = &config.sources_list {
            write_sources_list(&resolution, list_path)?;
        }

        Ok(resolution)
    }

    /// Fan the per-file scans out over the thread pool and collect them in
    /// input order; the first failure in path order is the one reported.
    fn scan_files(&self, files: &[PathBuf]) -> Result<Vec<FileScan>> {
        let cache = self.cache;
        let outcomes: Vec<Result<FileScan>> = files
            .par_iter()
            .map(|path| scan_one(cache, path))
            .collect();

        let mut scans = Vec::with_capacity(outcomes.len());
        for outcome in outcomes {
            scans.push(outcome?);
        }
        Ok(scans)
    }
}

fn scan_one(cache: Option<&dyn DeclarationCache>, path: &Path) -> Result<FileScan> {
    let stamp = FileStamp::of(path)?;
    if let Some(cache) = cache {
        if let Some(hit) = cache.get(path, &stamp) {
            return Ok(hit);
        }
    }

    let text = ProjectLoader::read_file(path)?;
    let scan = metadata::scan_file(path, &text)?;
    if let Some(cache) = cache {
        cache.put(path, &stamp, &scan);
    }
    Ok(scan)
}

/// Write the resolved implementation sources, one path per line.
pub fn write_sources_list(resolution: &Resolution, path: &Path) -> Result<(), ConfigureError> {
    let mut content = String::new();
    for source in resolution.source_files() {
        content.push_str(&source.to_string_lossy());
        content.push('\n');
    }
    fs::write(path, content).map_err(|source| ConfigureError::EmissionIo {
        path: path.to_path_buf(),
        source,
    })
}
