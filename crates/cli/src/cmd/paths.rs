//! Paths command implementation.
//!
//! Shows the patched search path next to the effective order top-level
//! lookups actually see, with the spliced build entries marked.

use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use std::path::Path;

use crossboot_lib::bootstrap;
use crossboot_lib::finder::BuildPathFinder;

use crate::cmd::{boot_state, load_config, load_sysconfig};
use crate::output::{print_json, symbols};

pub fn cmd_paths(config_path: Option<&Path>, json: bool) -> Result<()> {
  let config = load_config(config_path)?;
  let mut sysconfig = load_sysconfig(&config)?;
  let mut state = boot_state(&config, &sysconfig)?;

  bootstrap::apply(&mut state, &mut sysconfig, &config)
    .context("Failed to apply the bootstrap patch")?;

  let finder = state
    .meta_path
    .iter()
    .find_map(|entry| entry.as_any().downcast_ref::<BuildPathFinder>());
  let effective = match finder {
    Some(finder) => finder.effective_path(&state),
    None => state.path.clone(),
  };

  if json {
    let json_output = serde_json::json!({
      "searchPath": state.path,
      "effectivePath": effective,
    });
    print_json(&json_output)?;
  } else {
    println!("{}", "Search path:".bold());
    for entry in &state.path {
      println!("  {} {}", symbols::INFO, entry.display());
    }
    println!();
    println!("{}", "Effective search order:".bold());
    for entry in &effective {
      if state.build_path.contains(entry) {
        println!(
          "  {} {}",
          symbols::PLUS.green(),
          entry.display().to_string().green()
        );
      } else {
        println!("  {} {}", symbols::INFO, entry.display());
      }
    }
  }

  Ok(())
}
