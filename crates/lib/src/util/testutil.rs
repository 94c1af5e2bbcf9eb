//! Test fixtures for crossboot-lib.
//!
//! Builds a throwaway cross-build environment on disk: a target prefix with
//! a stdlib and purelib, a bootstrap directory whose `site.py` shadows the
//! real one, a build-environment site-packages directory, and a sysconfig
//! data file describing the target.

use std::fs;
use std::path::PathBuf;

use serde_json::json;
use tempfile::TempDir;

use crate::config::CrossConfig;
use crate::state::InterpState;
use crate::sysconfig::Sysconfig;

/// Extension suffix the fixture's sysconfig data reports for the target.
pub const TARGET_EXT_SUFFIX: &str = ".cpython-312-aarch64-linux-gnu.so";

/// Multiarch tag the fixture's sysconfig data reports for the target.
pub const TARGET_MULTIARCH: &str = "aarch64-linux-gnu";

/// An on-disk cross-build environment rooted in a temp directory.
pub struct CrossEnv {
  pub root: TempDir,
  pub stdlib: PathBuf,
  pub purelib: PathBuf,
  pub bootstrap: PathBuf,
  pub support: PathBuf,
  pub build_site: PathBuf,
  pub data_path: PathBuf,
}

/// Lay out a full cross-build environment.
pub fn cross_env() -> CrossEnv {
  let root = TempDir::new().unwrap();

  let stdlib = root.path().join("target/lib/python3.12");
  let purelib = stdlib.join("site-packages");
  let bootstrap = root.path().join("cross/bootstrap");
  let support = root.path().join("cross/support");
  let build_site = root.path().join("build/site-packages");

  fs::create_dir_all(&purelib).unwrap();
  fs::create_dir_all(&bootstrap).unwrap();
  fs::create_dir_all(&support).unwrap();
  fs::create_dir_all(&build_site).unwrap();

  fs::write(stdlib.join("site.py"), "").unwrap();
  fs::write(stdlib.join("sysconfig.py"), "").unwrap();
  fs::write(bootstrap.join("site.py"), "# cross-build hook\n").unwrap();

  let data_path = root.path().join("sysconfig.json");
  let env = CrossEnv {
    root,
    stdlib,
    purelib,
    bootstrap,
    support,
    build_site,
    data_path,
  };

  env.write_data(&default_data(&env).to_string());
  env
}

fn default_data(env: &CrossEnv) -> serde_json::Value {
  json!({
    "config_vars": {
      "ABIFLAGS": "",
      "MULTIARCH": TARGET_MULTIARCH,
      "EXT_SUFFIX": TARGET_EXT_SUFFIX,
    },
    "paths": {
      "stdlib": env.stdlib,
      "purelib": env.purelib,
    },
  })
}

impl CrossEnv {
  /// Rewrite the sysconfig data file.
  pub fn write_data(&self, json: &str) {
    fs::write(&self.data_path, json).unwrap();
  }

  /// Rewrite the sysconfig data file with the given config variables and
  /// the fixture's standard paths.
  pub fn write_data_with_vars(&self, config_vars: serde_json::Value) {
    let data = json!({
      "config_vars": config_vars,
      "paths": {
        "stdlib": self.stdlib,
        "purelib": self.purelib,
      },
    });
    self.write_data(&data.to_string());
  }

  /// Load the sysconfig data file.
  pub fn sysconfig(&self) -> Sysconfig {
    Sysconfig::load(&self.data_path).unwrap()
  }

  /// A config pointing at this environment.
  pub fn config(&self) -> CrossConfig {
    CrossConfig::new(
      vec![self.build_site.clone()],
      self.bootstrap.clone(),
      self.data_path.clone(),
    )
  }

  /// Boot a pre-patch state with the bootstrap directory and its support
  /// sibling leading the path, the way the generating tool lays them out.
  pub fn boot(&self) -> InterpState {
    InterpState::boot(
      &self.sysconfig(),
      &[self.bootstrap.clone(), self.support.clone()],
    )
    .unwrap()
  }
}
