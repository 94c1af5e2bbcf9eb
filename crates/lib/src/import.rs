//! Import machinery over the meta-finder list.
//!
//! Resolution-level modeling of how an interpreter turns a dotted name into
//! a located module: consult every finder on [`InterpState::meta_path`] in
//! order, resolving parents before children and caching what was imported.
//! Module code is never executed.

use std::path::PathBuf;

use thiserror::Error;
use tracing::debug;

use crate::finder::{InvalidName, ModuleName, ModuleSpec};
use crate::state::{InterpState, LoadedModule};

/// Errors that can occur during import.
#[derive(Debug, Error)]
pub enum ImportError {
  #[error(transparent)]
  InvalidName(#[from] InvalidName),

  /// No finder located the module.
  #[error("no module named '{name}'")]
  NotFound { name: String },

  /// A dotted name descends through a module that has no search locations.
  #[error("cannot search '{name}': parent '{parent}' is not a package")]
  ParentNotPackage { parent: String, name: String },
}

/// Ask every finder on the meta-path, in order, for a single name.
///
/// `path` carries the parent package's search locations for submodule
/// lookups and is `None` for top-level ones.
pub fn find_with_meta_path(
  state: &InterpState,
  name: &ModuleName,
  path: Option<&[PathBuf]>,
) -> Option<ModuleSpec> {
  state
    .meta_path
    .iter()
    .find_map(|finder| finder.find_spec(state, name, path))
}

/// Resolve a dotted name without touching the module cache.
///
/// Each parent is resolved first; its search locations become the explicit
/// path for the next component. Returns the spec of the final component.
pub fn resolve(state: &InterpState, name: &str) -> Result<ModuleSpec, ImportError> {
  let full = ModuleName::new(name)?;
  let mut resolved: Option<ModuleSpec> = None;

  for prefix in full.prefixes() {
    let path = match &resolved {
      None => None,
      Some(parent) => {
        if !parent.is_package() {
          return Err(ImportError::ParentNotPackage {
            parent: parent.name.clone(),
            name: prefix.to_string(),
          });
        }
        Some(parent.search_locations.as_slice())
      }
    };

    let prefix_name = ModuleName::new(prefix)?;
    let spec =
      find_with_meta_path(state, &prefix_name, path).ok_or_else(|| ImportError::NotFound {
        name: prefix.to_string(),
      })?;
    resolved = Some(spec);
  }

  resolved.ok_or_else(|| ImportError::NotFound {
    name: name.to_string(),
  })
}

/// Import a module, resolving and caching the full dotted chain.
///
/// A cache hit returns the cached entry without consulting any finder.
/// Otherwise every not-yet-imported component along the chain is resolved
/// and inserted into `state.modules`, parents first. Already-cached parents
/// contribute their recorded search locations instead of being re-resolved.
pub fn import_module<'a>(
  state: &'a mut InterpState,
  name: &str,
) -> Result<&'a LoadedModule, ImportError> {
  let full = ModuleName::new(name)?;

  if !state.modules.contains_key(full.as_str()) {
    let newly = resolve_chain(state, &full)?;
    for (module, spec) in newly {
      debug!(module = %module, kind = %spec.kind, "module imported");
      state.modules.insert(module, LoadedModule::from(spec));
    }
  }

  state
    .modules
    .get(full.as_str())
    .ok_or_else(|| ImportError::NotFound {
      name: name.to_string(),
    })
}

/// Resolve every component of `name` that is not already cached.
///
/// Returns the newly resolved components in import order. The walk reads
/// the cache but never writes it, so a failure partway leaves the state
/// untouched.
fn resolve_chain(
  state: &InterpState,
  name: &ModuleName,
) -> Result<Vec<(String, ModuleSpec)>, ImportError> {
  let mut newly: Vec<(String, ModuleSpec)> = Vec::new();
  let mut parent: Option<(String, Vec<PathBuf>)> = None;

  for prefix in name.prefixes() {
    let path = match &parent {
      None => None,
      Some((parent_name, locations)) => {
        if locations.is_empty() {
          return Err(ImportError::ParentNotPackage {
            parent: parent_name.clone(),
            name: prefix.to_string(),
          });
        }
        Some(locations.as_slice())
      }
    };

    let locations = match state.modules.get(prefix) {
      Some(cached) => cached.search_locations.clone(),
      None => {
        let prefix_name = ModuleName::new(prefix)?;
        let spec =
          find_with_meta_path(state, &prefix_name, path).ok_or_else(|| ImportError::NotFound {
            name: prefix.to_string(),
          })?;
        let locations = spec.search_locations.clone();
        newly.push((prefix.to_string(), spec));
        locations
      }
    };

    parent = Some((prefix.to_string(), locations));
  }

  Ok(newly)
}
