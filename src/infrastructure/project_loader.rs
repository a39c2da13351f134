use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::source_kind::SourceKind;

pub struct ProjectLoader;

impl ProjectLoader {
    /// Collect every scannable file under the given search paths.
    /// Returns sorted, deduplicated paths so overlapping search paths and
    /// platform-specific directory iteration order cannot change a run.
    pub fn collect_files(search_paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        for path in search_paths {
            if !path.exists() {
                anyhow::bail!("search path {} does not exist", path.display());
            }
            Self::collect_recursive(path, &mut files)?;
        }

        files.sort();
        files.dedup();
        Ok(files)
    }

    fn collect_recursive(dir: &Path, out: &mut Vec<PathBuf>) -> Result<()> {
        if dir.ends_with("target") || dir.ends_with(".git") {
            return Ok(());
        }

        if dir.is_file() {
            // A search path may name a single file directly.
            if SourceKind::from_path(dir).is_some() {
                out.push(Self::absolute(dir)?);
            }
            return Ok(());
        }

        for entry in fs::read_dir(dir)
            .with_context(|| format!("Failed to read directory {}", dir.display()))?
        {
            let entry = entry?;
            let path = entry.path();

            if path.is_dir() {
                Self::collect_recursive(&path, out)?;
            } else if SourceKind::from_path(&path).is_some() {
                out.push(Self::absolute(&path)?);
            }
        }
        Ok(())
    }

    /// Read one file's text.
    pub fn read_file(path: &Path) -> Result<String> {
        fs::read_to_string(path)
            .with_context(|| format!("Failed to read file {}", path.display()))
    }

    fn absolute(path: &Path) -> Result<PathBuf> {
        path.canonicalize()
            .with_context(|| format!("Failed to resolve path {}", path.display()))
    }
}
