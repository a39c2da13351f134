/// Source Kind Domain Module
///
/// Classifies the file extensions the configurator scans. The role of a
/// module still comes from its metadata tag, not its extension; this only
/// decides which files are worth scanning at all.

use std::path::Path;

/// File categories recognized in a project tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Header,
    Source,
}

impl SourceKind {
    /// Infer the kind from a file extension. The set matches what C trees
    /// using the marker convention contain, `.S` assembly included.
    pub fn from_extension(ext: &str) -> Option<SourceKind> {
        match ext {
            "h" | "hpp" => Some(SourceKind::Header),
            "c" | "cpp" | "cc" | "S" => Some(SourceKind::Source),
            _ => None,
        }
    }

    /// Infer the kind from a file path.
    pub fn from_path(path: &Path) -> Option<SourceKind> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }

    /// Get the display name of the kind.
    pub fn name(&self) -> &'static str {
        match self {
            SourceKind::Header => "header",
            SourceKind::Source => "source",
        }
    }

    /// All extensions the project loader scans.
    pub fn scanned_extensions() -> &'static [&'static str] {
        &["h", "hpp", "c", "cpp", "cc", "S"]
    }
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
