//! Implementation of the `crossboot init` command.
//!
//! Lays out a cross-build environment skeleton: a target prefix with stdlib
//! stand-ins, the bootstrap directory and its support sibling, an empty
//! build-environment site-packages, a sysconfig data file seeded with host
//! guesses, and the config tying them together.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use owo_colors::OwoColorize;
use serde_json::json;

use crossboot_lib::config::CrossConfig;
use crossboot_lib::consts::{CONFIG_FILENAME, SUPPORT_DIRNAME};
use crossboot_lib::platform;

use crate::output::symbols;

/// Execute the init command.
///
/// The generated sysconfig data carries host-guess values; pointing it at
/// real target values is the user's first edit.
///
/// # Errors
///
/// Returns an error if a config file already exists in the directory or if
/// the skeleton can't be written.
pub fn cmd_init(dir: &Path) -> Result<()> {
  fs::create_dir_all(dir)
    .with_context(|| format!("Failed to create directory {}", dir.display()))?;
  let root = dunce::canonicalize(dir)
    .with_context(|| format!("Failed to resolve directory {}", dir.display()))?;

  let config_path = root.join(CONFIG_FILENAME);
  if config_path.exists() {
    bail!("Config already exists at {}", config_path.display());
  }

  let stdlib = root.join("prefix/lib/python3.12");
  let purelib = stdlib.join("site-packages");
  let bootstrap = root.join("cross/bootstrap");
  let support = root.join("cross").join(SUPPORT_DIRNAME);
  let build_site = root.join("build/site-packages");
  let data_path = root.join("sysconfig.json");

  fs::create_dir_all(&purelib).context("Failed to create target prefix")?;
  fs::create_dir_all(&bootstrap).context("Failed to create bootstrap directory")?;
  fs::create_dir_all(&support).context("Failed to create support directory")?;
  fs::create_dir_all(&build_site).context("Failed to create build site-packages")?;

  // Stand-ins for the modules the patch re-imports.
  fs::write(stdlib.join("site.py"), "# target site module\n")
    .context("Failed to write stdlib site module")?;
  fs::write(stdlib.join("sysconfig.py"), "# target sysconfig module\n")
    .context("Failed to write stdlib sysconfig module")?;
  fs::write(bootstrap.join("site.py"), "# startup hook, shadows the real site\n")
    .context("Failed to write bootstrap hook")?;

  let data = json!({
    "config_vars": {
      "ABIFLAGS": platform::host_abiflags(),
      "MULTIARCH": platform::host_multiarch(),
      "EXT_SUFFIX": ".so",
    },
    "paths": {
      "stdlib": stdlib,
      "purelib": purelib,
    },
  });
  fs::write(&data_path, serde_json::to_string_pretty(&data)?)
    .context("Failed to write sysconfig data")?;

  let config = CrossConfig::new(vec![build_site.clone()], bootstrap.clone(), data_path.clone());
  config
    .save(&config_path)
    .with_context(|| format!("Failed to write config to {}", config_path.display()))?;

  println!(
    "{} {}",
    symbols::SUCCESS.green(),
    "Initialized cross-build environment!".green().bold()
  );
  println!();
  println!(
    "  {} Config:         {}",
    symbols::INFO.cyan(),
    config_path.display()
  );
  println!(
    "  {} Target stdlib:  {}",
    symbols::INFO.cyan(),
    stdlib.display()
  );
  println!(
    "  {} Bootstrap dir:  {}",
    symbols::INFO.cyan(),
    bootstrap.display()
  );
  println!(
    "  {} Build packages: {}",
    symbols::INFO.cyan(),
    build_site.display()
  );
  println!(
    "  {} Sysconfig data: {}",
    symbols::INFO.cyan(),
    data_path.display()
  );
  println!();
  println!("{}", "Next steps:".bold());
  println!(
    "  1. Edit {} with your target's values",
    data_path.display().to_string().cyan()
  );
  println!(
    "  2. Run: {}",
    format!("crossboot status -c {}", config_path.display()).cyan()
  );

  Ok(())
}
