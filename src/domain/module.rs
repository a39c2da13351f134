//! Module Declaration Records
//!
//! The data produced by the metadata extractor: one declaration per tagged
//! file, plus the set of interfaces the file references.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::PathBuf;

/// Which side of an interface a file declares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    /// A header declaring the interface contract (and naming the
    /// implementation it belongs to).
    Interface,
    /// A body providing one concrete implementation.
    Implementation,
}

impl Role {
    /// The payload keyword that selects this role.
    pub fn keyword(&self) -> &'static str {
        match self {
            Role::Interface => "interface",
            Role::Implementation => "implementation",
        }
    }

    pub fn from_keyword(word: &str) -> Option<Role> {
        match word {
            "interface" => Some(Role::Interface),
            "implementation" => Some(Role::Implementation),
            _ => None,
        }
    }
}

/// One parsed metadata declaration.
///
/// A header tagged `interface: [OUTPUT, CONSOLE]` declares the OUTPUT
/// contract and names CONSOLE as the implementation it belongs to; a body
/// tagged `implementation: [OUTPUT, CONSOLE]` is the matching source. The
/// pair of name fields plus the role expresses that duality explicitly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleDeclaration {
    pub path: PathBuf,
    pub role: Role,
    pub interface: String,
    pub implementation: String,
}

/// Extraction outcome for a single file.
///
/// `declaration` is None for plain support code (no marker). `references`
/// is the deduplicated set of `FX_INTERFACE(X)` tokens in the file and is
/// collected for every file, declared or not; only declared modules
/// contribute edges to the dependency graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileScan {
    pub path: PathBuf,
    pub declaration: Option<ModuleDeclaration>,
    pub references: BTreeSet<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_keyword_round_trip() {
        assert_eq!(Role::from_keyword("interface"), Some(Role::Interface));
        assert_eq!(Role::from_keyword("implementation"), Some(Role::Implementation));
        assert_eq!(Role::from_keyword("module"), None);
        assert_eq!(Role::Interface.keyword(), "interface");
    }
}
