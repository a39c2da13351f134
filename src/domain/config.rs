//! Configuration
//!
//! The explicit value threaded through the whole pipeline: root interface,
//! bindings, search paths, output location. Loaded from a TOML file and/or
//! CLI flags (flags win); never process-global state.

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Which redirection artifacts to emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactFormat {
    /// Per-interface forwarding headers plus the prelude header.
    #[default]
    Headers,
    /// A JSON include table for consumption by a build system.
    Table,
}

impl ArtifactFormat {
    pub fn from_str(s: &str) -> Option<ArtifactFormat> {
        match s {
            "headers" => Some(ArtifactFormat::Headers),
            "table" => Some(ArtifactFormat::Table),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ArtifactFormat::Headers => "headers",
            ArtifactFormat::Table => "table",
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields, default)]
pub struct Configuration {
    /// Root interface whose transitive requirements define the build.
    pub root: String,
    /// Explicit interface -> implementation selections.
    pub bindings: BTreeMap<String, String>,
    /// Directories scanned for module metadata.
    pub search_paths: Vec<PathBuf>,
    /// Directory receiving the redirection artifacts.
    pub output: PathBuf,
    /// If set, emitted include paths are written relative to this directory.
    pub include_base: Option<PathBuf>,
    /// If set, the resolved implementation source list is written here.
    pub sources_list: Option<PathBuf>,
    pub format: ArtifactFormat,
    /// Directory for the incremental extraction cache.
    pub cache_dir: Option<PathBuf>,
    /// Worker thread override for the scan phase.
    pub jobs: Option<usize>,
    #[serde(skip)]
    pub verbose: bool,
}

impl Configuration {
    /// Load a TOML configuration file.
    pub fn from_file(path: &Path) -> Result<Configuration> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file {}", path.display()))?;
        let config: Configuration = toml::from_str(&text)
            .with_context(|| format!("Invalid configuration file {}", path.display()))?;
        Ok(config)
    }

    /// Check the fields a run cannot proceed without and fill defaults.
    pub fn finalize(mut self) -> Result<Configuration> {
        if self.root.is_empty() {
            bail!("no root interface configured (set 'root' or pass --root)");
        }
        if self.output.as_os_str().is_empty() {
            bail!("no output directory configured (set 'output' or pass --output)");
        }
        if self.search_paths.is_empty() {
            self.search_paths.push(PathBuf::from("."));
        }
        Ok(self)
    }
}

/// Parse one `INTERFACE=IMPLEMENTATION` binding flag.
pub fn parse_binding(arg: &str) -> Result<(String, String)> {
    match arg.split_once('=') {
        Some((interface, implementation))
            if !interface.trim().is_empty() && !implementation.trim().is_empty() =>
        {
            Ok((interface.trim().to_string(), implementation.trim().to_string()))
        }
        _ => bail!("invalid binding '{arg}' (expected INTERFACE=IMPLEMENTATION)"),
    }
}
