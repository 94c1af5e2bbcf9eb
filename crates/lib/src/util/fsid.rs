//! Filesystem identity and lexical path normalization.
//!
//! `samefile` answers "do these two paths refer to the same filesystem
//! object?", which is how the fixup locates its own bootstrap directory on
//! the search path: the directory may appear there under a symlinked or
//! otherwise differently-spelled name, so string comparison is not enough.

use std::io;
use std::path::{Component, Path, PathBuf};

/// Returns whether `a` and `b` refer to the same filesystem object.
///
/// Symlinks are followed, so a symlink to a directory compares equal to the
/// directory itself. Fails if either path cannot be stat'ed.
#[cfg(unix)]
pub fn samefile(a: &Path, b: &Path) -> io::Result<bool> {
  use std::os::unix::fs::MetadataExt;

  let meta_a = std::fs::metadata(a)?;
  let meta_b = std::fs::metadata(b)?;
  Ok(meta_a.dev() == meta_b.dev() && meta_a.ino() == meta_b.ino())
}

/// Returns whether `a` and `b` refer to the same filesystem object.
///
/// Without device/inode identity available, both paths are canonicalized and
/// compared. Fails if either path cannot be resolved.
#[cfg(not(unix))]
pub fn samefile(a: &Path, b: &Path) -> io::Result<bool> {
  let canonical_a = dunce::canonicalize(a)?;
  let canonical_b = dunce::canonicalize(b)?;
  Ok(canonical_a == canonical_b)
}

/// Lexically normalize a path, resolving `.` and `..` components without
/// touching the filesystem.
pub fn normalize(path: &Path) -> PathBuf {
  let mut normalized = PathBuf::new();
  for component in path.components() {
    match component {
      Component::ParentDir => {
        normalized.pop();
      }
      Component::CurDir => {}
      _ => normalized.push(component),
    }
  }
  normalized
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::fs;
  use tempfile::TempDir;

  #[test]
  fn normalize_resolves_dot_components() {
    assert_eq!(normalize(Path::new("/a/./b/../c")), PathBuf::from("/a/c"));
    assert_eq!(normalize(Path::new("/a/b/")), PathBuf::from("/a/b"));
    assert_eq!(normalize(Path::new("a/./b")), PathBuf::from("a/b"));
  }

  #[test]
  fn samefile_true_for_same_directory() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path().join("dir");
    fs::create_dir(&dir).unwrap();

    assert!(samefile(&dir, &dir.join(".")).unwrap());
  }

  #[test]
  fn samefile_false_for_distinct_directories() {
    let temp = TempDir::new().unwrap();
    let a = temp.path().join("a");
    let b = temp.path().join("b");
    fs::create_dir(&a).unwrap();
    fs::create_dir(&b).unwrap();

    assert!(!samefile(&a, &b).unwrap());
  }

  #[test]
  #[cfg(unix)]
  fn samefile_follows_symlinks() {
    let temp = TempDir::new().unwrap();
    let real = temp.path().join("real");
    let link = temp.path().join("link");
    fs::create_dir(&real).unwrap();
    std::os::unix::fs::symlink(&real, &link).unwrap();

    assert!(samefile(&link, &real).unwrap());
  }

  #[test]
  fn samefile_errors_on_missing_path() {
    let temp = TempDir::new().unwrap();
    let missing = temp.path().join("missing");

    assert!(samefile(&missing, temp.path()).is_err());
  }
}
