//! Host platform detection.
//!
//! A generic interpreter bootstrap stamps its process flags from the machine
//! it is running on. These helpers derive those host values so a model state
//! can start out the way an unpatched interpreter would: carrying flags for
//! the build machine rather than the cross target.

use std::fmt;

/// CPU architecture variants supported by crossboot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Arch {
  X86_64,
  Aarch64,
}

impl Arch {
  /// Detect the current CPU architecture at runtime
  pub fn current() -> Option<Self> {
    match std::env::consts::ARCH {
      "x86_64" => Some(Self::X86_64),
      "aarch64" => Some(Self::Aarch64),
      _ => None,
    }
  }

  /// Returns the lowercase string identifier for this architecture
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::X86_64 => "x86_64",
      Self::Aarch64 => "aarch64",
    }
  }
}

impl fmt::Display for Arch {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

/// Operating system variants supported by crossboot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Os {
  Linux,
  MacOs,
  Windows,
}

impl Os {
  /// Detect the current operating system at runtime
  pub fn current() -> Option<Self> {
    match std::env::consts::OS {
      "linux" => Some(Self::Linux),
      "macos" => Some(Self::MacOs),
      "windows" => Some(Self::Windows),
      _ => None,
    }
  }

  /// Returns the lowercase string identifier for this OS
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Linux => "linux",
      Self::MacOs => "darwin",
      Self::Windows => "windows",
    }
  }
}

impl fmt::Display for Os {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

/// Returns the multiarch tag a generic bootstrap would carry on this host.
///
/// The tag is a Linux multiarch convention (e.g. `x86_64-linux-gnu`); on
/// other systems the attribute does not exist and `None` is returned.
pub fn host_multiarch() -> Option<String> {
  let arch = Arch::current()?;
  match Os::current()? {
    Os::Linux => Some(format!("{}-linux-gnu", arch)),
    _ => None,
  }
}

/// Returns the ABI-flags string a generic bootstrap would carry on this host.
///
/// Unix interpreters expose an (often empty) flags string; on Windows the
/// attribute does not exist and `None` is returned.
pub fn host_abiflags() -> Option<String> {
  match Os::current()? {
    Os::Windows => None,
    _ => Some(String::new()),
  }
}
