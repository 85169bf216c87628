//! Input-tree discovery (§6 "Input directory layout"): locate per-package
//! leaves, each holding exactly one `callgraph.json` and one
//! `type_hierarchy.json`.

use crate::core::error::{ConvertError, ConvertResult};
use crate::io::package_key;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

pub const CALL_GRAPH_FILE: &str = "callgraph.json";
pub const TYPE_HIERARCHY_FILE: &str = "type_hierarchy.json";

/// One discovered input leaf: its package_key and the paths to its two
/// JSON files.
#[derive(Debug, Clone)]
pub struct InputLeaf {
  pub package_key: String,
  pub call_graph_path: PathBuf,
  pub type_hierarchy_path: PathBuf,
}

/// Walk `input_dir`, returning one `InputLeaf` per directory that holds
/// both expected files. Order is not significant — §5 parallelizes
/// across these leaves with no cross-input ordering guarantee.
pub fn discover(input_dir: &Path) -> ConvertResult<Vec<InputLeaf>> {
  let mut leaves = Vec::new();
  for entry in WalkDir::new(input_dir) {
    let entry = entry.map_err(|err| {
      ConvertError::Io(std::io::Error::other(format!("walking {}: {err}", input_dir.display())))
    })?;
    if !entry.file_type().is_dir() {
      continue;
    }

    let call_graph_path = entry.path().join(CALL_GRAPH_FILE);
    let type_hierarchy_path = entry.path().join(TYPE_HIERARCHY_FILE);
    if call_graph_path.is_file() && type_hierarchy_path.is_file() {
      leaves.push(InputLeaf {
        package_key: package_key::derive(input_dir, entry.path()),
        call_graph_path,
        type_hierarchy_path,
      });
    }
  }
  Ok(leaves)
}
