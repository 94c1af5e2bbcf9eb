mod init;
mod paths;
mod resolve;
mod status;

pub use init::cmd_init;
pub use paths::cmd_paths;
pub use resolve::cmd_resolve;
pub use status::cmd_status;

use std::env;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use tracing::debug;

use crossboot_lib::config::CrossConfig;
use crossboot_lib::consts::{PATH_ENV, SUPPORT_DIRNAME};
use crossboot_lib::state::InterpState;
use crossboot_lib::sysconfig::Sysconfig;

/// Load the config from the explicit path or the default location.
fn load_config(config_path: Option<&Path>) -> Result<CrossConfig> {
  let path = match config_path {
    Some(path) => path.to_path_buf(),
    None => CrossConfig::locate(Path::new(".")),
  };

  let loaded = CrossConfig::load(&path)
    .with_context(|| format!("Failed to load config from {}", path.display()))?;

  match loaded {
    Some(config) => Ok(config),
    None => bail!(
      "No config found at {} (run 'crossboot init' first)",
      path.display()
    ),
  }
}

/// Load the sysconfig data the config points at.
fn load_sysconfig(config: &CrossConfig) -> Result<Sysconfig> {
  Sysconfig::load(&config.sysconfig_data).with_context(|| {
    format!(
      "Failed to load sysconfig data from {}",
      config.sysconfig_data.display()
    )
  })
}

/// Entries placed on the search path ahead of the target directories.
///
/// `CROSSBOOT_PATH` overrides them wholesale. The default models the
/// generated layout: the bootstrap directory followed by its support
/// sibling.
fn boot_prepend(config: &CrossConfig) -> Vec<PathBuf> {
  if let Some(list) = env::var_os(PATH_ENV) {
    let entries: Vec<PathBuf> = env::split_paths(&list).collect();
    debug!(
      count = entries.len(),
      "boot-time path prefix taken from environment"
    );
    return entries;
  }

  let mut entries = vec![config.bootstrap_dir.clone()];
  if let Some(parent) = config.bootstrap_dir.parent() {
    entries.push(parent.join(SUPPORT_DIRNAME));
  }
  entries
}

/// Boot a pre-patch model state for the given config.
fn boot_state(config: &CrossConfig, sysconfig: &Sysconfig) -> Result<InterpState> {
  InterpState::boot(sysconfig, &boot_prepend(config))
    .context("Failed to boot the interpreter model")
}
