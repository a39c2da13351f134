use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::error::{ConfigureError, Result};
use crate::domain::resolver::Resolution;

pub mod header_emitter;
pub mod table_emitter;

pub use header_emitter::ForwardingHeaderEmitter;
pub use table_emitter::IncludeTableEmitter;

/// Banner placed at the top of every generated file.
pub const GENERATED_BANNER: &str = "Generated by wirecraft, DO NOT EDIT.";

/// One rendered artifact, not yet on disk.
pub struct Artifact {
    pub file_name: String,
    pub content: String,
}

/// Produces the redirection artifacts for a resolution.
///
/// Rendering and writing are split so emission can be all-or-nothing:
/// every artifact is rendered in memory before the first byte is written.
pub trait RedirectionEmitter {
    fn render(&self, resolution: &Resolution) -> Vec<Artifact>;

    fn emit(&self, resolution: &Resolution, out_dir: &Path) -> Result<()> {
        write_artifacts(out_dir, &self.render(resolution))
    }
}

/// Write the rendered artifacts into `out_dir`. On any failure the files
/// written in this run are removed again, so a failed run leaves no
/// partial output behind.
pub fn write_artifacts(out_dir: &Path, artifacts: &[Artifact]) -> Result<()> {
    fs::create_dir_all(out_dir).map_err(|source| ConfigureError::EmissionIo {
        path: out_dir.to_path_buf(),
        source,
    })?;

    let mut written: Vec<PathBuf> = Vec::new();
    for artifact in artifacts {
        let path = out_dir.join(&artifact.file_name);
        if let Err(source) = fs::write(&path, &artifact.content) {
            for done in &written {
                let _ = fs::remove_file(done);
            }
            return Err(ConfigureError::EmissionIo { path, source });
        }
        written.push(path);
    }
    Ok(())
}

/// Render a header path for embedding in generated output: relative to
/// `include_base` when configured and possible, absolute otherwise.
/// Forward slashes keep the output byte-identical across platforms.
pub fn display_path(header: &Path, include_base: Option<&Path>) -> String {
    let chosen = match include_base {
        Some(base) => header.strip_prefix(base).unwrap_or(header),
        None => header,
    };
    chosen.to_string_lossy().replace('\\', "/")
}
