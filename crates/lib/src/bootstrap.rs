//! The corrective patch applied to a freshly booted interpreter state.
//!
//! A cross-build environment starts an interpreter whose early boot ran
//! against host values: host platform flags, a search path led by the
//! bootstrap directory, and a module cache holding the hook's own shadowing
//! copies of `site` and `sysconfig`. [`apply`] fixes all of that in five
//! steps:
//!
//! 1. capture the build-environment package paths and set the cross marker,
//! 2. normalize the platform flag attributes from target sysconfig values,
//! 3. swap the stock finder for the augmenting [`BuildPathFinder`],
//! 4. drop the bootstrap directory and its sibling from the search path,
//! 5. evict the stale `site` and `sysconfig` cache entries, reload the
//!    provider, and re-import both through the patched machinery.
//!
//! The patch runs exactly once per state; applying it twice is unsupported.
//! Any error leaves the state partially patched and unusable.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

use crate::config::CrossConfig;
use crate::consts::{CROSS_MARKER, RELOADED_MODULES};
use crate::finder::{BuildPathFinder, PathFinder};
use crate::import::{self, ImportError};
use crate::state::InterpState;
use crate::sysconfig::{Sysconfig, SysconfigError, VAR_ABIFLAGS, VAR_MULTIARCH};
use crate::util::fsid::samefile;

/// Errors that can occur while applying the patch.
#[derive(Debug, Error)]
pub enum BootstrapError {
  #[error(transparent)]
  Sysconfig(#[from] SysconfigError),

  /// Re-importing an evicted module failed.
  #[error("failed to re-import module '{module}'")]
  Import {
    module: &'static str,
    #[source]
    source: ImportError,
  },

  /// A module that must be evicted was not in the cache.
  #[error("module '{module}' is not in the module cache")]
  StaleModule { module: &'static str },

  /// A search path entry could not be compared with the bootstrap directory.
  #[error("failed to compare path entry '{}' with the bootstrap directory", path.display())]
  Io {
    path: PathBuf,
    #[source]
    source: io::Error,
  },
}

/// Patch `state` to describe the cross target instead of the host.
///
/// Flag normalization reads the values `sysconfig` currently holds; the
/// provider reload happens afterwards, in step 5, together with the module
/// re-imports.
pub fn apply(
  state: &mut InterpState,
  sysconfig: &mut Sysconfig,
  config: &CrossConfig,
) -> Result<(), BootstrapError> {
  capture_build_path(state, config);
  normalize_flags(state, sysconfig);
  install_finder(state, sysconfig)?;
  remove_bootstrap_entries(state, &config.bootstrap_dir)?;
  reload_modules(state, sysconfig)?;
  Ok(())
}

/// Step 1: record where build-environment packages live and mark the state
/// as cross-building. The entries are taken as-is, without validation.
fn capture_build_path(state: &mut InterpState, config: &CrossConfig) {
  state.build_path = config.build_path.clone();
  state.cross_marker = Some(CROSS_MARKER);
  info!(
    entries = state.build_path.len(),
    "captured build-environment package paths"
  );
}

/// Step 2: replace the host-guessed flag attributes with target values.
///
/// A variable with no value in sysconfig means the attribute must be
/// absent. An empty string is a real value and is set verbatim.
fn normalize_flags(state: &mut InterpState, sysconfig: &Sysconfig) {
  state.abiflags = sysconfig.config_var(VAR_ABIFLAGS).map(str::to_string);
  state.multiarch = sysconfig.config_var(VAR_MULTIARCH).map(str::to_string);
  info!(
    abiflags = ?state.abiflags,
    multiarch = ?state.multiarch,
    "normalized platform flags"
  );
}

/// Step 3: put a [`BuildPathFinder`] where the stock finder sits.
///
/// The first stock [`PathFinder`] is replaced in place so finder priority
/// is preserved. Without one the augmenting finder is appended.
fn install_finder(state: &mut InterpState, sysconfig: &Sysconfig) -> Result<(), BootstrapError> {
  let stdlib = sysconfig.stdlib()?;
  let finder = BuildPathFinder::new(PathFinder::from_sysconfig(sysconfig), stdlib);

  let stock = state
    .meta_path
    .iter()
    .position(|entry| entry.as_any().is::<PathFinder>());
  match stock {
    Some(index) => {
      state.meta_path[index] = Box::new(finder);
      debug!(index, "replaced stock finder with the augmenting finder");
    }
    None => {
      state.meta_path.push(Box::new(finder));
      debug!("no stock finder on the meta-path, appended the augmenting finder");
    }
  }
  Ok(())
}

/// Step 4: drop the bootstrap directory from the search path.
///
/// The first entry that is the same filesystem object as `bootstrap_dir` is
/// removed together with the entry right after it, which the generating
/// tool also placed there. A match at the tail removes only itself. Entries
/// that do not exist are skipped; no match is not an error.
fn remove_bootstrap_entries(
  state: &mut InterpState,
  bootstrap_dir: &Path,
) -> Result<(), BootstrapError> {
  for index in 0..state.path.len() {
    let entry = &state.path[index];
    if !entry.exists() {
      continue;
    }
    let matched = samefile(entry, bootstrap_dir).map_err(|source| BootstrapError::Io {
      path: entry.clone(),
      source,
    })?;
    if matched {
      let end = (index + 2).min(state.path.len());
      let removed = end - index;
      state.path.drain(index..end);
      info!(
        removed,
        dir = %bootstrap_dir.display(),
        "removed bootstrap entries from the search path"
      );
      return Ok(());
    }
  }

  debug!(
    dir = %bootstrap_dir.display(),
    "bootstrap directory not on the search path"
  );
  Ok(())
}

/// Step 5: evict and re-acquire the modules that captured boot-time state.
///
/// Both cache entries must exist; the bootstrap put them there. The
/// provider is reloaded in between, so anything resolved after this point
/// sees target configuration. With the bootstrap directory already off the
/// path, the re-imported `site` is the real stdlib one.
fn reload_modules(
  state: &mut InterpState,
  sysconfig: &mut Sysconfig,
) -> Result<(), BootstrapError> {
  for module in RELOADED_MODULES {
    if state.modules.remove(module).is_none() {
      return Err(BootstrapError::StaleModule { module });
    }
  }

  sysconfig.reload()?;

  for module in RELOADED_MODULES {
    let loaded = import::import_module(state, module)
      .map_err(|source| BootstrapError::Import { module, source })?;
    info!(
      module,
      origin = ?loaded.origin,
      "re-imported configuration module"
    );
  }
  Ok(())
}
