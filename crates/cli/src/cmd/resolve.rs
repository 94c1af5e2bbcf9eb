//! Resolve command implementation.
//!
//! Imports the named modules through the patched machinery and reports
//! where each one landed.

use anyhow::{Context, Result, bail};
use std::path::Path;

use crossboot_lib::bootstrap;
use crossboot_lib::import;

use crate::cmd::{boot_state, load_config, load_sysconfig};
use crate::output::{print_error, print_json, print_success, symbols};

pub fn cmd_resolve(config_path: Option<&Path>, modules: &[String], json: bool) -> Result<()> {
  let config = load_config(config_path)?;
  let mut sysconfig = load_sysconfig(&config)?;
  let mut state = boot_state(&config, &sysconfig)?;

  bootstrap::apply(&mut state, &mut sysconfig, &config)
    .context("Failed to apply the bootstrap patch")?;

  let mut reports: Vec<serde_json::Value> = Vec::new();
  let mut failures = 0usize;

  for module in modules {
    match import::import_module(&mut state, module) {
      Ok(loaded) => {
        if json {
          reports.push(serde_json::to_value(loaded)?);
        } else {
          let origin = match &loaded.origin {
            Some(origin) => origin.display().to_string(),
            None => "(namespace)".to_string(),
          };
          print_success(&format!(
            "{module} {} {origin} [{}]",
            symbols::ARROW,
            loaded.kind
          ));
        }
      }
      Err(e) => {
        failures += 1;
        if json {
          reports.push(serde_json::json!({
            "name": module,
            "error": e.to_string(),
          }));
        } else {
          print_error(&format!("{module}: {e}"));
        }
      }
    }
  }

  if json {
    print_json(&reports)?;
  }

  if failures > 0 {
    bail!("{failures} module(s) could not be resolved");
  }
  Ok(())
}
