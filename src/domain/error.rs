//! Error Taxonomy
//!
//! Every fatal condition the configurator can hit, with enough context in the
//! message to act on it (file paths, interface/implementation names, cycle
//! paths). The first error aborts the run; there is no partial recovery,
//! because a misconfiguration must never silently resolve against the wrong
//! implementation.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigureError {
    /// A recognized `FX_METADATA((` marker with a payload that does not parse.
    #[error("{}:{offset}: malformed metadata payload: {reason}", .path.display())]
    MetadataSyntax {
        path: PathBuf,
        /// Byte offset of the marker in the file.
        offset: usize,
        reason: String,
    },

    /// Two implementation files tagged with the same (interface, implementation) pair.
    #[error(
        "duplicate implementation {interface}/{implementation}: declared by both {} and {}",
        .first.display(),
        .second.display()
    )]
    DuplicateImplementation {
        interface: String,
        implementation: String,
        first: PathBuf,
        second: PathBuf,
    },

    /// Two interface headers collide on the same (interface, implementation) name.
    #[error(
        "conflicting interface declarations for {interface}/{implementation}: {} and {}",
        .first.display(),
        .second.display()
    )]
    ConflictingRole {
        interface: String,
        implementation: String,
        first: PathBuf,
        second: PathBuf,
    },

    /// The root interface could not be pinned to exactly one implementation.
    #[error("root interface {interface}: {reason}")]
    RootResolution { interface: String, reason: String },

    /// Interface requirements form a cycle; headers must include as a DAG.
    #[error("cyclic interface dependency: {}", .cycle.join(" -> "))]
    CyclicDependency { cycle: Vec<String> },

    /// A required interface has no usable implementation, or a configured
    /// binding names one that does not exist.
    #[error("{}", unknown_implementation_message(.interface, .requested.as_deref(), .known))]
    UnknownImplementation {
        interface: String,
        /// The implementation the configuration asked for, if any.
        requested: Option<String>,
        known: Vec<String>,
    },

    /// Several implementations exist and the configuration picks none.
    #[error(
        "interface {interface} has multiple implementations ({}) and no binding selects one",
        .candidates.join(", ")
    )]
    AmbiguousImplementation {
        interface: String,
        candidates: Vec<String>,
    },

    /// Writing a redirection artifact failed.
    #[error("failed to write redirection artifact {}", .path.display())]
    EmissionIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn unknown_implementation_message(
    interface: &str,
    requested: Option<&str>,
    known: &[String],
) -> String {
    match requested {
        Some(name) if known.is_empty() => format!(
            "interface {interface} has no implementation named {name} (none are registered)"
        ),
        Some(name) => format!(
            "interface {interface} has no implementation named {name} (known: {})",
            known.join(", ")
        ),
        None => format!("interface {interface} is required but has no usable implementation"),
    }
}

pub type Result<T> = std::result::Result<T, ConfigureError>;
