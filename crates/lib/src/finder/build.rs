//! The augmenting finder that grafts build-time packages into lookups.

use std::any::Any;
use std::path::{Path, PathBuf};

use tracing::trace;

use crate::state::InterpState;
use crate::util::fsid::normalize;

use super::{MetaPathFinder, ModuleName, ModuleSpec, PathFinder};

/// Wraps a [`PathFinder`] so top-level lookups also see the build-time
/// package directories.
///
/// The build entries are spliced into a copy of the interpreter path just
/// before its first entry under the target stdlib root. The splice happens
/// on every lookup, so later edits to the interpreter path are honored, and
/// the path itself is never modified. Submodule lookups, which carry an
/// explicit search path, are delegated untouched.
#[derive(Debug)]
pub struct BuildPathFinder {
  inner: PathFinder,
  stdlib: PathBuf,
}

impl BuildPathFinder {
  pub fn new(inner: PathFinder, stdlib: &Path) -> Self {
    Self {
      inner,
      stdlib: normalize(stdlib),
    }
  }

  /// The search order a top-level lookup actually sees.
  ///
  /// Entries of `state.path` up to the first one under the stdlib root,
  /// then all of `state.build_path`, then the rest beginning with that
  /// stdlib entry. Without a stdlib entry the path is returned unchanged.
  pub fn effective_path(&self, state: &InterpState) -> Vec<PathBuf> {
    let mut effective: Vec<PathBuf> = Vec::with_capacity(state.path.len() + state.build_path.len());

    for (index, entry) in state.path.iter().enumerate() {
      if normalize(entry).starts_with(&self.stdlib) {
        effective.extend(state.build_path.iter().cloned());
        effective.extend(state.path[index..].iter().cloned());
        return effective;
      }
      effective.push(entry.clone());
    }

    effective
  }
}

impl MetaPathFinder for BuildPathFinder {
  fn find_spec(
    &self,
    state: &InterpState,
    name: &ModuleName,
    path: Option<&[PathBuf]>,
  ) -> Option<ModuleSpec> {
    match path {
      Some(_) => self.inner.find_spec(state, name, path),
      None => {
        let effective = self.effective_path(state);
        trace!(module = %name, entries = effective.len(), "searching spliced path");
        self.inner.find_spec(state, name, Some(&effective))
      }
    }
  }

  fn as_any(&self) -> &dyn Any {
    self
  }
}
