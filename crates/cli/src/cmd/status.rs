//! Status command implementation.
//!
//! Boots the modeled interpreter, applies the patch, and reports what
//! changed: marker, platform flags, finder chain, and path sizes.

use anyhow::{Context, Result};
use std::path::Path;

use crossboot_lib::bootstrap;
use crossboot_lib::finder::{BuildPathFinder, MetaPathFinder, PathFinder};

use crate::cmd::{boot_state, load_config, load_sysconfig};
use crate::output::{print_json, print_stat, print_success, symbols};

pub fn cmd_status(config_path: Option<&Path>, json: bool) -> Result<()> {
  let config = load_config(config_path)?;
  let mut sysconfig = load_sysconfig(&config)?;
  let mut state = boot_state(&config, &sysconfig)?;

  let abiflags_before = state.abiflags.clone();
  let multiarch_before = state.multiarch.clone();
  let entries_before = state.path.len();

  bootstrap::apply(&mut state, &mut sysconfig, &config)
    .context("Failed to apply the bootstrap patch")?;

  let finders: Vec<&str> = state.meta_path.iter().map(|f| finder_label(f.as_ref())).collect();

  if json {
    let json_output = serde_json::json!({
      "marker": state.cross_marker,
      "buildPath": state.build_path,
      "sysconfigData": sysconfig.source(),
      "abiflags": { "before": abiflags_before, "after": state.abiflags },
      "multiarch": { "before": multiarch_before, "after": state.multiarch },
      "finders": finders,
      "pathEntries": { "before": entries_before, "after": state.path.len() },
    });
    print_json(&json_output)?;
  } else {
    print_success("Cross-build patch applied");
    print_stat("Marker", &state.cross_marker.unwrap_or("(none)").to_string());
    print_stat("Build path entries", &state.build_path.len().to_string());
    print_stat("Sysconfig data", &sysconfig.source().display().to_string());
    println!();
    print_stat(
      "ABI flags",
      &format!(
        "{} {} {}",
        flag(&abiflags_before),
        symbols::ARROW,
        flag(&state.abiflags)
      ),
    );
    print_stat(
      "Multiarch",
      &format!(
        "{} {} {}",
        flag(&multiarch_before),
        symbols::ARROW,
        flag(&state.multiarch)
      ),
    );
    println!();
    print_stat("Finders", &finders.join(", "));
    print_stat(
      "Search path",
      &format!(
        "{} entries {} {} entries",
        entries_before,
        symbols::ARROW,
        state.path.len()
      ),
    );
  }

  Ok(())
}

fn finder_label(finder: &dyn MetaPathFinder) -> &'static str {
  if finder.as_any().is::<BuildPathFinder>() {
    "BuildPathFinder"
  } else if finder.as_any().is::<PathFinder>() {
    "PathFinder"
  } else {
    "(other)"
  }
}

fn flag(value: &Option<String>) -> String {
  match value {
    Some(value) => format!("'{value}'"),
    None => "(absent)".to_string(),
  }
}
