//! Explicit interpreter state.
//!
//! The process-wide values the real interpreter scatters across globals are
//! gathered into one mutable [`InterpState`]: the search path, the finder
//! chain, the platform flag attributes, and the module cache. The bootstrap
//! patch in [`crate::bootstrap`] rewrites this state; resolution only reads
//! it.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::consts::RELOADED_MODULES;
use crate::finder::{MetaPathFinder, ModuleKind, ModuleSpec, PathFinder};
use crate::import::{self, ImportError};
use crate::platform;
use crate::sysconfig::{PATH_PURELIB, Sysconfig, SysconfigError};

/// Errors that can occur while modeling a pre-patch boot.
#[derive(Debug, Error)]
pub enum BootError {
  #[error(transparent)]
  Sysconfig(#[from] SysconfigError),

  #[error(transparent)]
  Import(#[from] ImportError),
}

/// The cached result of an import.
///
/// Resolution-level only; executing module code is the host runtime's job.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadedModule {
  /// Full dotted module name.
  pub name: String,

  /// File the module was loaded from.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub origin: Option<PathBuf>,

  /// What kind of artifact it is.
  pub kind: ModuleKind,

  /// Where submodules are searched. Empty for non-packages.
  #[serde(skip_serializing_if = "Vec::is_empty")]
  pub search_locations: Vec<PathBuf>,
}

impl From<ModuleSpec> for LoadedModule {
  fn from(spec: ModuleSpec) -> Self {
    Self {
      name: spec.name,
      origin: spec.origin,
      kind: spec.kind,
      search_locations: spec.search_locations,
    }
  }
}

/// The mutable interpreter state the bootstrap patch operates on.
///
/// `path` is the externally visible search path. Build-environment entries
/// never land in it; they live in `build_path` and are spliced in per
/// lookup by the augmenting finder.
#[derive(Debug)]
pub struct InterpState {
  /// Search path for top-level imports.
  pub path: Vec<PathBuf>,

  /// Finders consulted in order on every import.
  pub meta_path: Vec<Box<dyn MetaPathFinder>>,

  /// ABI flags attribute. `None` models the attribute being absent.
  pub abiflags: Option<String>,

  /// Multiarch tag attribute. `None` models the attribute being absent.
  pub multiarch: Option<String>,

  /// Modules already imported, keyed by dotted name.
  pub modules: BTreeMap<String, LoadedModule>,

  /// Build-environment package directories. Assigned once by the patch.
  pub build_path: Vec<PathBuf>,

  /// Marker naming the active cross-build layer, set by the patch.
  pub cross_marker: Option<&'static str>,
}

impl InterpState {
  /// A bare state with the given search path and the stock finder.
  pub fn new(path: Vec<PathBuf>) -> Self {
    Self {
      path,
      meta_path: vec![Box::new(PathFinder::new())],
      abiflags: None,
      multiarch: None,
      modules: BTreeMap::new(),
      build_path: Vec::new(),
      cross_marker: None,
    }
  }

  /// Model an unpatched interpreter booted into a cross-build environment.
  ///
  /// The search path is `prepend` followed by the target stdlib and purelib
  /// directories, the platform flags carry host guesses, and `site` and
  /// `sysconfig` are imported through the pristine machinery. With the
  /// bootstrap directory leading the path, the cached `site` is the hook's
  /// own shadowing copy; the patch later evicts and re-imports both modules.
  pub fn boot(sysconfig: &Sysconfig, prepend: &[PathBuf]) -> Result<Self, BootError> {
    let mut path = prepend.to_vec();
    path.push(sysconfig.stdlib()?.to_path_buf());
    path.push(sysconfig.path(PATH_PURELIB)?.to_path_buf());

    let mut state = Self {
      path,
      meta_path: vec![Box::new(PathFinder::from_sysconfig(sysconfig))],
      abiflags: platform::host_abiflags(),
      multiarch: platform::host_multiarch(),
      modules: BTreeMap::new(),
      build_path: Vec::new(),
      cross_marker: None,
    };

    for module in RELOADED_MODULES {
      import::import_module(&mut state, module)?;
    }

    debug!(
      entries = state.path.len(),
      cached = state.modules.len(),
      "modeled pre-patch interpreter state"
    );
    Ok(state)
  }
}
