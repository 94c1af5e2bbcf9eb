//! Target platform configuration provider.
//!
//! Answers the read-only queries the bootstrap fixup needs: config variables
//! (ABI flags, multiarch tag, extension suffix) and install paths (standard
//! library root, site packages). Values come from a JSON data file shaped
//! like an interpreter's generated build-time variables and are taken as
//! already correct for the cross target; the provider never guesses.
//!
//! # Data File Format
//!
//! ```json
//! {
//!   "config_vars": {
//!     "ABIFLAGS": "",
//!     "MULTIARCH": "aarch64-linux-gnu",
//!     "EXT_SUFFIX": ".cpython-312-aarch64-linux-gnu.so"
//!   },
//!   "paths": {
//!     "stdlib": "/cross/prefix/lib/python3.12",
//!     "purelib": "/cross/prefix/lib/python3.12/site-packages"
//!   }
//! }
//! ```
//!
//! A variable that is `null` or missing has no value for the target. The
//! distinction matters to the fixup: "no value" means the corresponding
//! interpreter attribute must be removed, while an empty string is a real
//! value to be set.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

/// Config variable holding the target's ABI flags.
pub const VAR_ABIFLAGS: &str = "ABIFLAGS";

/// Config variable holding the target's multiarch tag.
pub const VAR_MULTIARCH: &str = "MULTIARCH";

/// Config variable holding the target's extension module suffix.
pub const VAR_EXT_SUFFIX: &str = "EXT_SUFFIX";

/// Install path key for the standard library root.
pub const PATH_STDLIB: &str = "stdlib";

/// Install path key for the pure-python site packages directory.
pub const PATH_PURELIB: &str = "purelib";

/// Extension suffix every target accepts, appended after the configured one.
const DEFAULT_EXT_SUFFIX: &str = ".so";

/// On-disk shape of the sysconfig data file.
#[derive(Debug, Clone, Default, Deserialize)]
struct SysconfigData {
  #[serde(default)]
  config_vars: BTreeMap<String, Option<String>>,
  #[serde(default)]
  paths: BTreeMap<String, PathBuf>,
}

/// Errors that can occur when working with sysconfig data.
#[derive(Debug, Error)]
pub enum SysconfigError {
  /// Failed to read the data file.
  #[error("failed to read sysconfig data: {0}")]
  Read(#[source] io::Error),

  /// Failed to parse the data file JSON.
  #[error("failed to parse sysconfig data: {0}")]
  Parse(#[source] serde_json::Error),

  /// A required install path key is not present.
  #[error("sysconfig data has no '{key}' path")]
  MissingPath { key: String },
}

/// The target platform's configuration, loaded from a JSON data file.
///
/// Keeps its source path so the provider can be told to recompute after the
/// data file changes (see [`Sysconfig::reload`]).
#[derive(Debug, Clone)]
pub struct Sysconfig {
  source: PathBuf,
  config_vars: BTreeMap<String, Option<String>>,
  paths: BTreeMap<String, PathBuf>,
}

impl Sysconfig {
  /// Load sysconfig data from the given path.
  ///
  /// Unlike an optional config file, missing sysconfig data is an error: a
  /// cross build without target configuration cannot be patched.
  pub fn load(path: &Path) -> Result<Self, SysconfigError> {
    let data = Self::read(path)?;
    Ok(Self {
      source: path.to_path_buf(),
      config_vars: data.config_vars,
      paths: data.paths,
    })
  }

  fn read(path: &Path) -> Result<SysconfigData, SysconfigError> {
    let content = fs::read_to_string(path).map_err(SysconfigError::Read)?;
    serde_json::from_str(&content).map_err(SysconfigError::Parse)
  }

  /// Path of the backing data file.
  pub fn source(&self) -> &Path {
    &self.source
  }

  /// Look up a config variable.
  ///
  /// A missing key and an explicit JSON `null` both mean "no value".
  pub fn config_var(&self, name: &str) -> Option<&str> {
    self.config_vars.get(name).and_then(|value| value.as_deref())
  }

  /// Look up an install path.
  ///
  /// Required keys that are absent are an error, not a default.
  pub fn path(&self, key: &str) -> Result<&Path, SysconfigError> {
    self
      .paths
      .get(key)
      .map(PathBuf::as_path)
      .ok_or_else(|| SysconfigError::MissingPath { key: key.to_string() })
  }

  /// The standard library root for the target.
  pub fn stdlib(&self) -> Result<&Path, SysconfigError> {
    self.path(PATH_STDLIB)
  }

  /// Extension module suffixes for the target, most specific first.
  ///
  /// The configured `EXT_SUFFIX` followed by the plain `.so` fallback; just
  /// the fallback when the target reports no suffix.
  pub fn ext_suffixes(&self) -> Vec<String> {
    let mut suffixes = Vec::new();
    if let Some(suffix) = self.config_var(VAR_EXT_SUFFIX) {
      suffixes.push(suffix.to_string());
    }
    if !suffixes.iter().any(|s| s == DEFAULT_EXT_SUFFIX) {
      suffixes.push(DEFAULT_EXT_SUFFIX.to_string());
    }
    suffixes
  }

  /// Re-read the backing data file, replacing all cached values.
  ///
  /// The explicit recompute used after the fixup mutates state the data was
  /// derived from, rather than trusting values computed during early boot.
  pub fn reload(&mut self) -> Result<(), SysconfigError> {
    let data = Self::read(&self.source)?;
    self.config_vars = data.config_vars;
    self.paths = data.paths;
    debug!(source = %self.source.display(), "sysconfig data reloaded");
    Ok(())
  }
}
