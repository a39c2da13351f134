//! Include Table Emitter
//!
//! Emits one JSON table mapping every resolved interface to its chosen
//! implementation, header, and source, for build systems that expand the
//! symbolic reference themselves instead of using forwarding headers.

use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::domain::resolver::Resolution;
use crate::ports::{display_path, Artifact, RedirectionEmitter, GENERATED_BANNER};

/// File name of the emitted table.
pub const TABLE_FILE: &str = "include_table.json";

#[derive(Debug, Serialize)]
struct TableDto {
    generated_by: String,
    root: RootDto,
    bindings: BTreeMap<String, BindingDto>,
    sources: Vec<String>,
}

#[derive(Debug, Serialize)]
struct RootDto {
    interface: String,
    implementation: String,
}

#[derive(Debug, Serialize)]
struct BindingDto {
    implementation: String,
    header: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    source: Option<String>,
}

pub struct IncludeTableEmitter {
    include_base: Option<PathBuf>,
}

impl IncludeTableEmitter {
    pub fn new(include_base: Option<PathBuf>) -> Self {
        Self { include_base }
    }

    fn to_dto(&self, resolution: &Resolution) -> TableDto {
        let base = self.include_base.as_deref();
        let bindings = resolution
            .bindings
            .iter()
            .map(|(interface, binding)| {
                (
                    interface.clone(),
                    BindingDto {
                        implementation: binding.implementation.clone(),
                        header: display_path(&binding.header, base),
                        source: binding.source.as_deref().map(|s| display_path(s, base)),
                    },
                )
            })
            .collect();

        TableDto {
            generated_by: GENERATED_BANNER.to_string(),
            root: RootDto {
                interface: resolution.root_interface.clone(),
                implementation: resolution.root_implementation.clone(),
            },
            bindings,
            sources: resolution
                .source_files()
                .iter()
                .map(|s| display_path(s, base))
                .collect(),
        }
    }
}

impl RedirectionEmitter for IncludeTableEmitter {
    fn render(&self, resolution: &Resolution) -> Vec<Artifact> {
        let dto = self.to_dto(resolution);
        // BTreeMap fields keep the serialized table in name order, so the
        // bytes are stable across runs.
        let json = serde_json::to_string_pretty(&dto).unwrap_or_default();
        vec![Artifact {
            file_name: TABLE_FILE.to_string(),
            content: format!("{json}\n"),
        }]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::resolver::ResolvedBinding;

    fn resolution() -> Resolution {
        let mut bindings = BTreeMap::new();
        bindings.insert(
            "OUTPUT".to_string(),
            ResolvedBinding {
                implementation: "CONSOLE".to_string(),
                header: PathBuf::from("/project/output2.h"),
                source: Some(PathBuf::from("/project/output2.c")),
            },
        );
        bindings.insert(
            "HELLO".to_string(),
            ResolvedBinding {
                implementation: "VERSION1".to_string(),
                header: PathBuf::from("/project/hello.h"),
                source: None,
            },
        );
        Resolution {
            root_interface: "MAIN".to_string(),
            root_implementation: "DEFAULT".to_string(),
            bindings,
        }
    }

    #[test]
    fn test_table_contains_root_bindings_and_sources() {
        let emitter = IncludeTableEmitter::new(None);
        let artifacts = emitter.render(&resolution());
        assert_eq!(artifacts.len(), 1);
        assert_eq!(artifacts[0].file_name, TABLE_FILE);

        let value: serde_json::Value = serde_json::from_str(&artifacts[0].content).unwrap();
        assert_eq!(value["root"]["interface"], "MAIN");
        assert_eq!(value["root"]["implementation"], "DEFAULT");
        assert_eq!(value["bindings"]["OUTPUT"]["implementation"], "CONSOLE");
        assert_eq!(value["bindings"]["OUTPUT"]["header"], "/project/output2.h");
        assert_eq!(value["sources"][0], "/project/output2.c");
        // Header-only modules serialize without a source key.
        assert!(value["bindings"]["HELLO"].get("source").is_none());
    }

    #[test]
    fn test_include_base_applies_to_every_path() {
        let emitter = IncludeTableEmitter::new(Some(PathBuf::from("/project")));
        let artifacts = emitter.render(&resolution());
        let value: serde_json::Value = serde_json::from_str(&artifacts[0].content).unwrap();
        assert_eq!(value["bindings"]["HELLO"]["header"], "hello.h");
        assert_eq!(value["sources"][0], "output2.c");
    }

    #[test]
    fn test_render_is_byte_identical_across_runs() {
        let emitter = IncludeTableEmitter::new(None);
        let res = resolution();
        assert_eq!(emitter.render(&res)[0].content, emitter.render(&res)[0].content);
    }
}
