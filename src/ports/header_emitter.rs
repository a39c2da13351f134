//! Forwarding Header Emitter
//!
//! Emits one tiny header per resolved interface whose sole content includes
//! the bound implementation's real header, plus a prelude header that makes
//! `#include FX_INTERFACE(NAME)` expand to `<NAME.h>` and hides the
//! metadata marker from the compiler. Pointing the compiler's include path
//! at the output directory is all the build has to do.

use std::path::PathBuf;

use crate::domain::resolver::Resolution;
use crate::ports::{display_path, Artifact, RedirectionEmitter, GENERATED_BANNER};

/// Name of the prelude header force-included by the build.
pub const PRELUDE_FILE: &str = "fx_prelude.h";

pub struct ForwardingHeaderEmitter {
    include_base: Option<PathBuf>,
}

impl ForwardingHeaderEmitter {
    pub fn new(include_base: Option<PathBuf>) -> Self {
        Self { include_base }
    }

    fn prelude(&self) -> Artifact {
        let content = format!(
            "// {GENERATED_BANNER}\n\
             #ifndef WIRECRAFT_PRELUDE_H\n\
             #define WIRECRAFT_PRELUDE_H\n\
             \n\
             // The marker is metadata for the configurator, nothing for the\n\
             // compiler. The double parentheses keep commas in the payload\n\
             // inside a single macro argument.\n\
             #define FX_METADATA(data)\n\
             \n\
             // A symbolic interface reference resolves to the generated\n\
             // forwarding header of the same name.\n\
             #define FX_INTERFACE(name) <name.h>\n\
             \n\
             #endif\n"
        );
        Artifact { file_name: PRELUDE_FILE.to_string(), content }
    }

    fn forwarding_header(&self, interface: &str, header: &std::path::Path) -> Artifact {
        let include = display_path(header, self.include_base.as_deref());
        let content = format!(
            "// {GENERATED_BANNER}\n\
             #ifndef WIRECRAFT_FWD_{interface}_H\n\
             #define WIRECRAFT_FWD_{interface}_H\n\
             \n\
             #include \"{include}\"\n\
             \n\
             #endif\n"
        );
        Artifact { file_name: format!("{interface}.h"), content }
    }
}

impl RedirectionEmitter for ForwardingHeaderEmitter {
    /// One artifact per binding plus the prelude, in interface-name order.
    fn render(&self, resolution: &Resolution) -> Vec<Artifact> {
        let mut artifacts = vec![self.prelude()];
        for (interface, binding) in &resolution.bindings {
            artifacts.push(self.forwarding_header(interface, &binding.header));
        }
        artifacts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::resolver::ResolvedBinding;
    use std::collections::BTreeMap;

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
    fn test_renders_prelude_and_one_header_per_binding() {
        let emitter = ForwardingHeaderEmitter::new(None);
        let artifacts = emitter.render(&resolution());
        let names: Vec<_> = artifacts.iter().map(|a| a.file_name.clone()).collect();
        assert_eq!(names, vec!["fx_prelude.h", "HELLO.h", "OUTPUT.h"]);
    }

    #[test]
    fn test_forwarding_header_includes_bound_implementation() {
        let emitter = ForwardingHeaderEmitter::new(None);
        let artifacts = emitter.render(&resolution());
        let output = artifacts.iter().find(|a| a.file_name == "OUTPUT.h").unwrap();
        assert!(output.content.contains("#include \"/project/output2.h\""));
        assert!(output.content.contains(GENERATED_BANNER));
        assert!(output.content.contains("WIRECRAFT_FWD_OUTPUT_H"));
    }

    #[test]
    fn test_include_base_makes_paths_relative() {
        let emitter = ForwardingHeaderEmitter::new(Some(PathBuf::from("/project")));
        let artifacts = emitter.render(&resolution());
        let hello = artifacts.iter().find(|a| a.file_name == "HELLO.h").unwrap();
        assert!(hello.content.contains("#include \"hello.h\""));
    }

    #[test]
    fn test_prelude_defines_both_macros() {
        let emitter = ForwardingHeaderEmitter::new(None);
        let prelude = emitter.prelude();
        assert!(prelude.content.contains("#define FX_METADATA(data)"));
        assert!(prelude.content.contains("#define FX_INTERFACE(name) <name.h>"));
    }

    #[test]
    fn test_render_is_idempotent() {
        let emitter = ForwardingHeaderEmitter::new(None);
        let res = resolution();
        let first = emitter.render(&res);
        let second = emitter.render(&res);
        let bytes = |artifacts: &[Artifact]| {
            artifacts
                .iter()
                .map(|a| format!("{}\n{}", a.file_name, a.content))
                .collect::<String>()
        };
        assert_eq!(bytes(&first), bytes(&second));
    }

    #[test]
    fn test_emit_writes_via_trait_default() {
        use tempfile::tempdir;
        let dir = tempdir().unwrap();
        let emitter = ForwardingHeaderEmitter::new(None);
        emitter.emit(&resolution(), dir.path()).unwrap();
        assert!(dir.path().join("fx_prelude.h").exists());
        assert!(dir.path().join("HELLO.h").exists());
    }
}
