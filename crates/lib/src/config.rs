//! Embedded cross-build configuration.
//!
//! The config file (`crossboot.json`) carries the values an external
//! generator bakes into the startup hook: the build-path list, the bootstrap
//! directory the hook runs from, and the location of the target's sysconfig
//! data. It stands in for the literal substitution the generator performs,
//! so the same values can be loaded by tooling instead of being embedded in
//! script text.
//!
//! # Config File Format
//!
//! ```json
//! {
//!   "version": 1,
//!   "buildPath": ["/build/venv/lib/python3.12/site-packages"],
//!   "bootstrapDir": "/cross/venv/lib/crossboot",
//!   "sysconfigData": "/cross/venv/etc/sysconfig.json"
//! }
//! ```

use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::{CONFIG_ENV, CONFIG_FILENAME, CONFIG_VERSION};

/// The embedded cross-build configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrossConfig {
  /// Config file format version.
  pub version: u32,

  /// Locations of packages installed for the build-time environment.
  ///
  /// Taken as valid at generation time; no runtime validation is performed.
  pub build_path: Vec<PathBuf>,

  /// Directory holding the generated hook artifacts, placed on the search
  /// path solely so the hook can run.
  pub bootstrap_dir: PathBuf,

  /// Location of the target's sysconfig data file.
  pub sysconfig_data: PathBuf,
}

/// Errors that can occur when working with config files.
#[derive(Debug, Error)]
pub enum ConfigError {
  /// Failed to read the config file.
  #[error("failed to read config file: {0}")]
  Read(#[source] io::Error),

  /// Failed to write the config file.
  #[error("failed to write config file: {0}")]
  Write(#[source] io::Error),

  /// Failed to parse the config file JSON.
  #[error("failed to parse config file: {0}")]
  Parse(#[source] serde_json::Error),

  /// Failed to serialize the config.
  #[error("failed to serialize config: {0}")]
  Serialize(#[source] serde_json::Error),

  /// Config file version is not supported.
  #[error("unsupported config version {0}, expected {CONFIG_VERSION}")]
  UnsupportedVersion(u32),
}

impl CrossConfig {
  /// Create a config at the current format version.
  pub fn new(build_path: Vec<PathBuf>, bootstrap_dir: PathBuf, sysconfig_data: PathBuf) -> Self {
    Self {
      version: CONFIG_VERSION,
      build_path,
      bootstrap_dir,
      sysconfig_data,
    }
  }

  /// Load a config from the given path.
  ///
  /// Returns `Ok(None)` if the file doesn't exist.
  /// Returns `Ok(Some(config))` if the file exists and was parsed successfully.
  /// Returns `Err` if the file exists but couldn't be read or parsed.
  ///
  /// Relative `bootstrapDir` and `sysconfigData` entries are resolved
  /// against the config file's directory. The build-path list is kept
  /// exactly as written.
  pub fn load(path: &Path) -> Result<Option<Self>, ConfigError> {
    let content = match fs::read_to_string(path) {
      Ok(content) => content,
      Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
      Err(e) => return Err(ConfigError::Read(e)),
    };

    let mut config: CrossConfig = serde_json::from_str(&content).map_err(ConfigError::Parse)?;

    if config.version != CONFIG_VERSION {
      return Err(ConfigError::UnsupportedVersion(config.version));
    }

    let base = path.parent().unwrap_or(Path::new("."));
    if config.bootstrap_dir.is_relative() {
      config.bootstrap_dir = base.join(&config.bootstrap_dir);
    }
    if config.sysconfig_data.is_relative() {
      config.sysconfig_data = base.join(&config.sysconfig_data);
    }

    Ok(Some(config))
  }

  /// Save the config to the given path.
  ///
  /// The file is written with pretty-printed JSON for readability.
  pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
    let content = serde_json::to_string_pretty(self).map_err(ConfigError::Serialize)?;
    fs::write(path, content).map_err(ConfigError::Write)?;
    Ok(())
  }

  /// Where to look for the config file.
  ///
  /// The `CROSSBOOT_CONFIG` environment variable wins; otherwise
  /// `crossboot.json` in the given directory.
  pub fn locate(dir: &Path) -> PathBuf {
    if let Ok(path) = env::var(CONFIG_ENV) {
      return PathBuf::from(path);
    }

    dir.join(CONFIG_FILENAME)
  }
}
