//! Module finders for the modeled import system.
//!
//! A finder answers "where does module X live?" without loading anything.
//! Finders are consulted in order through [`InterpState::meta_path`], the
//! same chain the real interpreter walks on import. [`PathFinder`] is the
//! stock filesystem finder; [`BuildPathFinder`] wraps it to graft build-time
//! packages into default lookups.
//!
//! [`InterpState::meta_path`]: crate::state::InterpState::meta_path

use std::any::Any;
use std::fmt;
use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

use crate::state::InterpState;

mod build;
mod path_finder;

pub use build::BuildPathFinder;
pub use path_finder::PathFinder;

/// A validated, possibly dotted module name.
///
/// Each dot-separated component must be a plain ASCII identifier. This rules
/// out empty components, path separators, and relative-import forms before
/// any finder sees the name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct ModuleName(String);

/// A module name that is not a dotted chain of identifiers.
#[derive(Debug, Error)]
#[error("invalid module name '{name}'")]
pub struct InvalidName {
  pub name: String,
}

impl ModuleName {
  /// Validate and wrap a module name.
  pub fn new(name: &str) -> Result<Self, InvalidName> {
    if !name.is_empty() && name.split('.').all(is_identifier) {
      Ok(Self(name.to_string()))
    } else {
      Err(InvalidName {
        name: name.to_string(),
      })
    }
  }

  /// The full dotted name.
  pub fn as_str(&self) -> &str {
    &self.0
  }

  /// The final component of the dotted name.
  pub fn basename(&self) -> &str {
    match self.0.rfind('.') {
      Some(i) => &self.0[i + 1..],
      None => &self.0,
    }
  }

  /// Every ancestor prefix followed by the name itself, outermost first.
  ///
  /// For `a.b.c` this yields `a`, `a.b`, `a.b.c`.
  pub fn prefixes(&self) -> impl Iterator<Item = &str> {
    self
      .0
      .match_indices('.')
      .map(|(i, _)| &self.0[..i])
      .chain(std::iter::once(self.0.as_str()))
  }
}

impl fmt::Display for ModuleName {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

fn is_identifier(s: &str) -> bool {
  let mut chars = s.chars();
  match chars.next() {
    Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
    _ => return false,
  }
  chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// What kind of artifact a module resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ModuleKind {
  /// A plain source file.
  Source,
  /// A compiled extension module.
  Extension,
  /// A package directory with an init file.
  Package,
  /// A namespace package assembled from bare directories.
  Namespace,
}

impl ModuleKind {
  pub fn as_str(&self) -> &'static str {
    match self {
      ModuleKind::Source => "source",
      ModuleKind::Extension => "extension",
      ModuleKind::Package => "package",
      ModuleKind::Namespace => "namespace",
    }
  }
}

impl fmt::Display for ModuleKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// The result of a successful find: where a module lives and what it is.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleSpec {
  /// Full dotted module name.
  pub name: String,

  /// File backing the module. Namespace packages have no single origin.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub origin: Option<PathBuf>,

  /// What kind of artifact was found.
  pub kind: ModuleKind,

  /// Directories to search for submodules. Only packages carry these.
  #[serde(skip_serializing_if = "Vec::is_empty")]
  pub search_locations: Vec<PathBuf>,
}

impl ModuleSpec {
  /// Whether submodules can be imported beneath this module.
  pub fn is_package(&self) -> bool {
    !self.search_locations.is_empty()
  }
}

/// A finder consulted during import, in [`meta_path`] order.
///
/// `path` is `None` for top-level imports, which search the interpreter's
/// path list, and `Some` for submodule imports, which search the parent
/// package's locations.
///
/// [`meta_path`]: crate::state::InterpState::meta_path
pub trait MetaPathFinder: fmt::Debug {
  /// Look for `name`, returning `None` if this finder can't locate it.
  fn find_spec(
    &self,
    state: &InterpState,
    name: &ModuleName,
    path: Option<&[PathBuf]>,
  ) -> Option<ModuleSpec>;

  /// Identity hook so callers can recognize concrete finder types in a
  /// meta-path list.
  fn as_any(&self) -> &dyn Any;
}

#[cfg(test)]
mod tests {
  use super::*;

  mod module_name {
    use super::*;

    #[test]
    fn accepts_plain_and_dotted_names() {
      for name in ["site", "os_path", "_abc", "a.b.c", "pkg2.mod3"] {
        assert!(ModuleName::new(name).is_ok(), "{name} should be valid");
      }
    }

    #[test]
    fn rejects_malformed_names() {
      for name in ["", ".", "a.", ".a", "a..b", "1abc", "a-b", "a/b", "a b"] {
        assert!(ModuleName::new(name).is_err(), "{name} should be invalid");
      }
    }

    #[test]
    fn basename_is_last_component() {
      assert_eq!(ModuleName::new("site").unwrap().basename(), "site");
      assert_eq!(ModuleName::new("a.b.c").unwrap().basename(), "c");
    }

    #[test]
    fn prefixes_walk_outermost_first() {
      let name = ModuleName::new("a.b.c").unwrap();
      let prefixes: Vec<&str> = name.prefixes().collect();
      assert_eq!(prefixes, vec!["a", "a.b", "a.b.c"]);
    }

    #[test]
    fn prefixes_of_top_level_name_is_itself() {
      let name = ModuleName::new("site").unwrap();
      let prefixes: Vec<&str> = name.prefixes().collect();
      assert_eq!(prefixes, vec!["site"]);
    }
  }

  mod module_spec {
    use super::*;

    #[test]
    fn package_detection_follows_search_locations() {
      let module = ModuleSpec {
        name: "mod".to_string(),
        origin: Some(PathBuf::from("/lib/mod.py")),
        kind: ModuleKind::Source,
        search_locations: Vec::new(),
      };
      assert!(!module.is_package());

      let package = ModuleSpec {
        name: "pkg".to_string(),
        origin: Some(PathBuf::from("/lib/pkg/__init__.py")),
        kind: ModuleKind::Package,
        search_locations: vec![PathBuf::from("/lib/pkg")],
      };
      assert!(package.is_package());
    }

    #[test]
    fn json_omits_empty_fields() {
      let spec = ModuleSpec {
        name: "ns".to_string(),
        origin: None,
        kind: ModuleKind::Namespace,
        search_locations: vec![PathBuf::from("/lib/ns")],
      };
      let json = serde_json::to_string(&spec).unwrap();

      assert!(!json.contains("origin"));
      assert!(json.contains(r#""kind":"namespace""#));
      assert!(json.contains(r#""searchLocations""#));
    }
  }
}
