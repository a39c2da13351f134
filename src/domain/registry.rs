//! Module Registry
//!
//! Owns every parsed declaration, keyed by interface name and implementation
//! name. Built once per run by sequential registration (duplicate detection
//! stays deterministic that way) and read-only afterwards.

use std::collections::BTreeMap;
use std::path::Path;

use crate::domain::error::{ConfigureError, Result};
use crate::domain::module::{ModuleDeclaration, Role};

/// Header and source declarations for one (interface, implementation) pair.
#[derive(Debug, Clone, Default)]
pub struct ImplementationRecord {
    pub header: Option<ModuleDeclaration>,
    pub source: Option<ModuleDeclaration>,
}

impl ImplementationRecord {
    /// Only implementations with an interface header can satisfy a
    /// reference: the redirection artifact forwards to that header.
    pub fn is_bindable(&self) -> bool {
        self.header.is_some()
    }

    pub fn header_path(&self) -> Option<&Path> {
        self.header.as_ref().map(|d| d.path.as_path())
    }

    pub fn source_path(&self) -> Option<&Path> {
        self.source.as_ref().map(|d| d.path.as_path())
    }
}

/// Registry of all module declarations in the project tree.
///
/// BTreeMaps keep every lookup and iteration in name order, never in scan
/// order, so downstream phases are independent of filesystem enumeration.
#[derive(Debug, Default)]
pub struct ModuleRegistry {
    interfaces: BTreeMap<String, BTreeMap<String, ImplementationRecord>>,
}

impl ModuleRegistry {
    /// Register one declaration.
    ///
    /// A second source for an occupied (interface, implementation) slot is a
    /// `DuplicateImplementation`; a second header for the same pair is a
    /// `ConflictingRole` (two interface declarators colliding on one name).
    pub fn register(&mut self, decl: ModuleDeclaration) -> Result<()> {
        let record = self
            .interfaces
            .entry(decl.interface.clone())
            .or_default()
            .entry(decl.implementation.clone())
            .or_default();

        match decl.role {
            Role::Interface => {
                if let Some(existing) = &record.header {
                    return Err(ConfigureError::ConflictingRole {
                        interface: decl.interface,
                        implementation: decl.implementation,
                        first: existing.path.clone(),
                        second: decl.path,
                    });
                }
                record.header = Some(decl);
            }
            Role::Implementation => {
                if let Some(existing) = &record.source {
                    return Err(ConfigureError::DuplicateImplementation {
                        interface: decl.interface,
                        implementation: decl.implementation,
                        first: existing.path.clone(),
                        second: decl.path,
                    });
                }
                record.source = Some(decl);
            }
        }
        Ok(())
    }

    /// All implementations declared for an interface, in name order.
    pub fn implementations(&self, interface: &str) -> Option<&BTreeMap<String, ImplementationRecord>> {
        self.interfaces.get(interface)
    }

    /// Bindable implementation names for an interface, in name order.
    pub fn bindable_names(&self, interface: &str) -> Vec<String> {
        self.interfaces
            .get(interface)
            .map(|impls| {
                impls
                    .iter()
                    .filter(|(_, rec)| rec.is_bindable())
                    .map(|(name, _)| name.clone())
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn record(&self, interface: &str, implementation: &str) -> Option<&ImplementationRecord> {
        self.interfaces.get(interface).and_then(|impls| impls.get(implementation))
    }

    /// Pin the root interface to exactly one implementation.
    ///
    /// An explicit binding wins; otherwise exactly one bindable
    /// implementation must exist. Anything else is a `RootResolution`.
    pub fn lookup_root(
        &self,
        interface: &str,
        binding: Option<&str>,
    ) -> Result<(String, &ImplementationRecord)> {
        let candidates = self.bindable_names(interface);

        if let Some(requested) = binding {
            return match self.record(interface, requested).filter(|r| r.is_bindable()) {
                Some(record) => Ok((requested.to_string(), record)),
                None => Err(ConfigureError::RootResolution {
                    interface: interface.to_string(),
                    reason: if candidates.is_empty() {
                        format!("bound implementation {requested} is not declared")
                    } else {
                        format!(
                            "bound implementation {requested} is not declared (known: {})",
                            candidates.join(", ")
                        )
                    },
                }),
            };
        }

        match candidates.as_slice() {
            [only] => self
                .record(interface, only)
                .map(|record| (only.clone(), record))
                .ok_or_else(|| ConfigureError::RootResolution {
                    interface: interface.to_string(),
                    reason: "no implementation is declared".to_string(),
                }),
            [] => Err(ConfigureError::RootResolution {
                interface: interface.to_string(),
                reason: "no implementation is declared".to_string(),
            }),
            many => Err(ConfigureError::RootResolution {
                interface: interface.to_string(),
                reason: format!(
                    "multiple implementations ({}) and no binding selects one",
                    many.join(", ")
                ),
            }),
        }
    }

    /// Number of declared interfaces.
    pub fn interface_count(&self) -> usize {
        self.interfaces.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn decl(path: &str, role: Role, interface: &str, implementation: &str) -> ModuleDeclaration {
        ModuleDeclaration {
            path: PathBuf::from(path),
            role,
            interface: interface.to_string(),
            implementation: implementation.to_string(),
        }
    }

    #[test]
    fn test_register_and_lookup() {
        let mut reg = ModuleRegistry::default();
        reg.register(decl("output1.h", Role::Interface, "OUTPUT", "MSGBOX")).unwrap();
        reg.register(decl("output2.h", Role::Interface, "OUTPUT", "CONSOLE")).unwrap();
        reg.register(decl("output2.c", Role::Implementation, "OUTPUT", "CONSOLE")).unwrap();

        let impls = reg.implementations("OUTPUT").unwrap();
        assert_eq!(impls.len(), 2);
        assert!(impls["CONSOLE"].source.is_some());
        assert!(impls["MSGBOX"].source.is_none());
        assert_eq!(reg.bindable_names("OUTPUT"), vec!["CONSOLE", "MSGBOX"]);
    }

    #[test]
    fn test_duplicate_implementation_rejected() {
        let mut reg = ModuleRegistry::default();
        reg.register(decl("console.c", Role::Implementation, "OUTPUT", "CONSOLE")).unwrap();
        let err = reg
            .register(decl("console_copy.c", Role::Implementation, "OUTPUT", "CONSOLE"))
            .unwrap_err();
        match err {
            ConfigureError::DuplicateImplementation { interface, implementation, first, second } => {
                assert_eq!(interface, "OUTPUT");
                assert_eq!(implementation, "CONSOLE");
                assert_eq!(first, PathBuf::from("console.c"));
                assert_eq!(second, PathBuf::from("console_copy.c"));
            }
            other => panic!("expected DuplicateImplementation, got {other:?}"),
        }
    }

    #[test]
    fn test_conflicting_interface_declarators_rejected() {
        let mut reg = ModuleRegistry::default();
        reg.register(decl("hello.h", Role::Interface, "HELLO", "VERSION1")).unwrap();
        let err = reg
            .register(decl("hello_alt.h", Role::Interface, "HELLO", "VERSION1"))
            .unwrap_err();
        assert!(matches!(err, ConfigureError::ConflictingRole { .. }));
    }

    #[test]
    fn test_header_and_source_pair_is_not_a_conflict() {
        let mut reg = ModuleRegistry::default();
        reg.register(decl("world.h", Role::Interface, "WORLD", "VERSION1")).unwrap();
        reg.register(decl("world.c", Role::Implementation, "WORLD", "VERSION1")).unwrap();
        let record = reg.record("WORLD", "VERSION1").unwrap();
        assert!(record.header.is_some());
        assert!(record.source.is_some());
    }

    #[test]
    fn test_source_only_record_is_not_bindable() {
        let mut reg = ModuleRegistry::default();
        reg.register(decl("orphan.c", Role::Implementation, "ORPHAN", "ONLY")).unwrap();
        assert!(reg.bindable_names("ORPHAN").is_empty());
    }

    #[test]
    fn test_lookup_root_sole_implementation() {
        let mut reg = ModuleRegistry::default();
        reg.register(decl("main.h", Role::Interface, "MAIN", "DEFAULT")).unwrap();
        let (name, _) = reg.lookup_root("MAIN", None).unwrap();
        assert_eq!(name, "DEFAULT");
    }

    #[test]
    fn test_lookup_root_binding_wins() {
        let mut reg = ModuleRegistry::default();
        reg.register(decl("main1.h", Role::Interface, "MAIN", "DEBUG")).unwrap();
        reg.register(decl("main2.h", Role::Interface, "MAIN", "RELEASE")).unwrap();
        let (name, _) = reg.lookup_root("MAIN", Some("RELEASE")).unwrap();
        assert_eq!(name, "RELEASE");
    }

    #[test]
    fn test_lookup_root_zero_or_many_fails() {
        let mut reg = ModuleRegistry::default();
        assert!(matches!(
            reg.lookup_root("MAIN", None),
            Err(ConfigureError::RootResolution { .. })
        ));

        reg.register(decl("main1.h", Role::Interface, "MAIN", "DEBUG")).unwrap();
        reg.register(decl("main2.h", Role::Interface, "MAIN", "RELEASE")).unwrap();
        let err = reg.lookup_root("MAIN", None).unwrap_err();
        assert!(err.to_string().contains("DEBUG, RELEASE"));
    }

    #[test]
    fn test_lookup_root_unknown_binding_fails() {
        let mut reg = ModuleRegistry::default();
        reg.register(decl("main.h", Role::Interface, "MAIN", "DEFAULT")).unwrap();
        let err = reg.lookup_root("MAIN", Some("MISSING")).unwrap_err();
        assert!(matches!(err, ConfigureError::RootResolution { .. }));
        assert!(err.to_string().contains("MISSING"));
    }
}
