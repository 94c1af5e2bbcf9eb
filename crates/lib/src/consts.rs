//! Shared constants.

/// Marker recorded on the interpreter state once the fixup has run, so
/// tooling can tell a patched state from a pristine one.
pub const CROSS_MARKER: &str = "crossboot";

/// Current config file format version.
pub const CONFIG_VERSION: u32 = 1;

/// Config file name.
pub const CONFIG_FILENAME: &str = "crossboot.json";

/// Environment variable overriding the config file location.
pub const CONFIG_ENV: &str = "CROSSBOOT_CONFIG";

/// Environment variable carrying the boot-time path prefix entries, as an
/// OS path-separator list.
pub const PATH_ENV: &str = "CROSSBOOT_PATH";

/// Suffix of source module files.
pub const SOURCE_SUFFIX: &str = ".py";

/// Name of the auxiliary directory the generating tool lays out next to the
/// bootstrap directory. Both land at the head of the boot-time search path,
/// and the fixup removes them together.
pub const SUPPORT_DIRNAME: &str = "support";

/// Modules whose cached entries are discarded and re-acquired after the
/// fixup, in re-import order.
pub const RELOADED_MODULES: [&str; 2] = ["site", "sysconfig"];
