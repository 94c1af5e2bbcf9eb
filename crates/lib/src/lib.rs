//! crossboot-lib: Cross-build interpreter bootstrap modeling and patching
//!
//! This crate models the import-relevant pieces of a Python-like interpreter's
//! early bootstrap as explicit values instead of ambient process globals:
//! - `InterpState`: the mutable interpreter state (search path, meta-finder
//!   list, platform flags, module cache)
//! - `Sysconfig`: the target platform's configuration provider
//! - `PathFinder` / `BuildPathFinder`: the resolution strategies consulted
//!   for every import
//! - `bootstrap::apply`: the run-once fixup that redirects top-level imports
//!   through build-time package locations without exposing them on the
//!   search path

pub mod bootstrap;
pub mod config;
pub mod consts;
pub mod finder;
pub mod import;
pub mod platform;
pub mod state;
pub mod sysconfig;
pub mod util;
