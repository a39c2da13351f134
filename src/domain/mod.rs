// Core domain for Wirecraft: metadata scanning, the module registry, the
// dependency graph, and resolution. No filesystem side effects live here
// except configuration file loading.

pub mod config;
pub mod depgraph;
pub mod error;
pub mod metadata;
pub mod module;
pub mod registry;
pub mod resolver;
pub mod source_kind;
