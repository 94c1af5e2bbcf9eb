//! The stock filesystem finder.

use std::any::Any;
use std::path::{Path, PathBuf};

use tracing::trace;

use crate::consts::SOURCE_SUFFIX;
use crate::state::InterpState;
use crate::sysconfig::Sysconfig;

use super::{MetaPathFinder, ModuleKind, ModuleName, ModuleSpec};

/// Init file that marks a directory as a regular package.
const INIT_FILE: &str = "__init__.py";

/// Locates modules on the filesystem by scanning a list of directories.
///
/// Within each directory the checks run in a fixed order: package directory,
/// source file, extension file. Bare directories without an init file are
/// collected as namespace portions across the whole scan and only form a
/// module when nothing concrete matched.
#[derive(Debug, Clone, PartialEq)]
pub struct PathFinder {
  ext_suffixes: Vec<String>,
}

impl PathFinder {
  /// A finder recognizing only the bare `.so` extension suffix.
  pub fn new() -> Self {
    Self {
      ext_suffixes: vec![".so".to_string()],
    }
  }

  /// A finder recognizing the extension suffixes the target interpreter
  /// reports.
  pub fn from_sysconfig(sysconfig: &Sysconfig) -> Self {
    Self {
      ext_suffixes: sysconfig.ext_suffixes(),
    }
  }

  /// Scan `dirs` in order for the final component of `name`.
  fn find_in_dirs(&self, name: &ModuleName, dirs: &[PathBuf]) -> Option<ModuleSpec> {
    let basename = name.basename();
    let mut portions: Vec<PathBuf> = Vec::new();

    for dir in dirs {
      let candidate_dir = dir.join(basename);

      let init = candidate_dir.join(INIT_FILE);
      if init.is_file() {
        trace!(module = %name, origin = %init.display(), "found package");
        return Some(ModuleSpec {
          name: name.as_str().to_string(),
          origin: Some(init),
          kind: ModuleKind::Package,
          search_locations: vec![candidate_dir],
        });
      }

      let source = dir.join(format!("{basename}{SOURCE_SUFFIX}"));
      if source.is_file() {
        trace!(module = %name, origin = %source.display(), "found source module");
        return Some(ModuleSpec {
          name: name.as_str().to_string(),
          origin: Some(source),
          kind: ModuleKind::Source,
          search_locations: Vec::new(),
        });
      }

      if let Some(extension) = self.find_extension(basename, dir) {
        trace!(module = %name, origin = %extension.display(), "found extension module");
        return Some(ModuleSpec {
          name: name.as_str().to_string(),
          origin: Some(extension),
          kind: ModuleKind::Extension,
          search_locations: Vec::new(),
        });
      }

      if candidate_dir.is_dir() {
        trace!(module = %name, portion = %candidate_dir.display(), "found namespace portion");
        portions.push(candidate_dir);
      }
    }

    if portions.is_empty() {
      None
    } else {
      Some(ModuleSpec {
        name: name.as_str().to_string(),
        origin: None,
        kind: ModuleKind::Namespace,
        search_locations: portions,
      })
    }
  }

  fn find_extension(&self, basename: &str, dir: &Path) -> Option<PathBuf> {
    self
      .ext_suffixes
      .iter()
      .map(|suffix| dir.join(format!("{basename}{suffix}")))
      .find(|candidate| candidate.is_file())
  }
}

impl Default for PathFinder {
  fn default() -> Self {
    Self::new()
  }
}

impl MetaPathFinder for PathFinder {
  fn find_spec(
    &self,
    state: &InterpState,
    name: &ModuleName,
    path: Option<&[PathBuf]>,
  ) -> Option<ModuleSpec> {
    match path {
      Some(dirs) => self.find_in_dirs(name, dirs),
      None => self.find_in_dirs(name, &state.path),
    }
  }

  fn as_any(&self) -> &dyn Any {
    self
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::fs;
  use tempfile::TempDir;

  fn name(s: &str) -> ModuleName {
    ModuleName::new(s).unwrap()
  }

  #[test]
  fn finds_source_module() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("site.py"), "").unwrap();

    let finder = PathFinder::new();
    let spec = finder
      .find_in_dirs(&name("site"), &[temp.path().to_path_buf()])
      .unwrap();

    assert_eq!(spec.kind, ModuleKind::Source);
    assert_eq!(spec.origin, Some(temp.path().join("site.py")));
    assert!(!spec.is_package());
  }

  #[test]
  fn finds_package_with_init_file() {
    let temp = TempDir::new().unwrap();
    let pkg = temp.path().join("pkg");
    fs::create_dir(&pkg).unwrap();
    fs::write(pkg.join("__init__.py"), "").unwrap();

    let finder = PathFinder::new();
    let spec = finder
      .find_in_dirs(&name("pkg"), &[temp.path().to_path_buf()])
      .unwrap();

    assert_eq!(spec.kind, ModuleKind::Package);
    assert_eq!(spec.origin, Some(pkg.join("__init__.py")));
    assert_eq!(spec.search_locations, vec![pkg]);
  }

  #[test]
  fn finds_extension_module() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("_speedup.so"), "").unwrap();

    let finder = PathFinder::new();
    let spec = finder
      .find_in_dirs(&name("_speedup"), &[temp.path().to_path_buf()])
      .unwrap();

    assert_eq!(spec.kind, ModuleKind::Extension);
    assert_eq!(spec.origin, Some(temp.path().join("_speedup.so")));
  }

  #[test]
  fn recognizes_versioned_extension_suffixes() {
    let temp = TempDir::new().unwrap();
    let tagged = "_native.cpython-312-aarch64-linux-gnu.so";
    fs::write(temp.path().join(tagged), "").unwrap();

    let finder = PathFinder {
      ext_suffixes: vec![
        ".cpython-312-aarch64-linux-gnu.so".to_string(),
        ".so".to_string(),
      ],
    };
    let spec = finder
      .find_in_dirs(&name("_native"), &[temp.path().to_path_buf()])
      .unwrap();

    assert_eq!(spec.kind, ModuleKind::Extension);
    assert_eq!(spec.origin, Some(temp.path().join(tagged)));
  }

  #[test]
  fn package_shadows_source_in_same_directory() {
    let temp = TempDir::new().unwrap();
    let pkg = temp.path().join("both");
    fs::create_dir(&pkg).unwrap();
    fs::write(pkg.join("__init__.py"), "").unwrap();
    fs::write(temp.path().join("both.py"), "").unwrap();

    let finder = PathFinder::new();
    let spec = finder
      .find_in_dirs(&name("both"), &[temp.path().to_path_buf()])
      .unwrap();

    assert_eq!(spec.kind, ModuleKind::Package);
  }

  #[test]
  fn source_shadows_extension_in_same_directory() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("both.py"), "").unwrap();
    fs::write(temp.path().join("both.so"), "").unwrap();

    let finder = PathFinder::new();
    let spec = finder
      .find_in_dirs(&name("both"), &[temp.path().to_path_buf()])
      .unwrap();

    assert_eq!(spec.kind, ModuleKind::Source);
  }

  #[test]
  fn earlier_directory_wins() {
    let first = TempDir::new().unwrap();
    let second = TempDir::new().unwrap();
    fs::write(first.path().join("mod.py"), "").unwrap();
    fs::write(second.path().join("mod.py"), "").unwrap();

    let finder = PathFinder::new();
    let spec = finder
      .find_in_dirs(
        &name("mod"),
        &[first.path().to_path_buf(), second.path().to_path_buf()],
      )
      .unwrap();

    assert_eq!(spec.origin, Some(first.path().join("mod.py")));
  }

  #[test]
  fn missing_module_returns_none() {
    let temp = TempDir::new().unwrap();

    let finder = PathFinder::new();
    let spec = finder.find_in_dirs(&name("ghost"), &[temp.path().to_path_buf()]);

    assert!(spec.is_none());
  }

  #[test]
  fn only_last_component_is_searched() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("sub.py"), "").unwrap();

    let finder = PathFinder::new();
    let spec = finder
      .find_in_dirs(&name("pkg.sub"), &[temp.path().to_path_buf()])
      .unwrap();

    assert_eq!(spec.name, "pkg.sub");
    assert_eq!(spec.origin, Some(temp.path().join("sub.py")));
  }

  mod namespace {
    use super::*;

    #[test]
    fn bare_directories_collect_into_portions() {
      let first = TempDir::new().unwrap();
      let second = TempDir::new().unwrap();
      fs::create_dir(first.path().join("ns")).unwrap();
      fs::create_dir(second.path().join("ns")).unwrap();

      let finder = PathFinder::new();
      let spec = finder
        .find_in_dirs(
          &name("ns"),
          &[first.path().to_path_buf(), second.path().to_path_buf()],
        )
        .unwrap();

      assert_eq!(spec.kind, ModuleKind::Namespace);
      assert_eq!(spec.origin, None);
      assert_eq!(
        spec.search_locations,
        vec![first.path().join("ns"), second.path().join("ns")]
      );
    }

    #[test]
    fn later_concrete_match_beats_earlier_portion() {
      let first = TempDir::new().unwrap();
      let second = TempDir::new().unwrap();
      fs::create_dir(first.path().join("mod")).unwrap();
      fs::write(second.path().join("mod.py"), "").unwrap();

      let finder = PathFinder::new();
      let spec = finder
        .find_in_dirs(
          &name("mod"),
          &[first.path().to_path_buf(), second.path().to_path_buf()],
        )
        .unwrap();

      assert_eq!(spec.kind, ModuleKind::Source);
      assert_eq!(spec.origin, Some(second.path().join("mod.py")));
    }
  }
}
