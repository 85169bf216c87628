//! Shared `package_key` helpers (§6 "Input directory layout", §4.4
//! "Selecting the result").

use std::path::{Component, Path};

/// Build the package_key for `leaf_dir` relative to `input_dir`: the
/// portion of the path after `input_dir` and before the filename,
/// always beginning and ending with `/` (§6).
pub fn derive(input_dir: &Path, leaf_dir: &Path) -> String {
  let relative = leaf_dir.strip_prefix(input_dir).unwrap_or(leaf_dir);
  let mut key = String::from("/");
  for component in relative.components() {
    if let Component::Normal(part) = component {
      key.push_str(&part.to_string_lossy());
      key.push('/');
    }
  }
  key
}

/// Derive the target crate name from a package_key: its second path
/// segment (the package directory name), with `-` substituted for `_`
/// (§4.4 "Selecting the result").
pub fn crate_name(package_key: &str) -> String {
  package_key
    .split('/')
    .find(|segment| !segment.is_empty())
    .unwrap_or("")
    .replace('-', "_")
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn derive_begins_and_ends_with_separator() {
    let input_dir = Path::new("/tmp/inputs");
    let leaf_dir = Path::new("/tmp/inputs/mycrate/0.1.0");
    assert_eq!(derive(input_dir, leaf_dir), "/mycrate/0.1.0/");
  }

  #[test]
  fn crate_name_substitutes_dashes() {
    assert_eq!(crate_name("/my-crate/0.1.0/"), "my_crate");
  }

  #[test]
  fn crate_name_ignores_version_segment() {
    assert_eq!(crate_name("/a/0.1.0/"), "a");
  }
}
