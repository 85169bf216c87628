//! The per-input entry point: decode one leaf's two JSON files and hand
//! them to the Graph Builder (§4.4).

use crate::core::error::{ConvertError, ConvertResult};
use crate::core::model::{RawCallGraph, RawTypeHierarchy};
use crate::core::wire::PackageGraph;
use crate::graph::builder;
use crate::io::InputLeaf;
use crate::typehierarchy::TypeHierarchyIndex;
use std::fs;
use std::path::Path;

/// Decode `leaf`'s `callgraph.json` and `type_hierarchy.json`, build a
/// per-input `TypeHierarchyIndex`, and run the Graph Builder against
/// `std_hierarchy` for the fallback lookups of §4.4 Pass 2.
pub fn run(leaf: &InputLeaf, std_hierarchy: &TypeHierarchyIndex) -> ConvertResult<PackageGraph> {
  let raw_cg = decode::<RawCallGraph>(&leaf.call_graph_path)?;
  let raw_hierarchy = decode::<RawTypeHierarchy>(&leaf.type_hierarchy_path)?;
  let per_input_hierarchy = TypeHierarchyIndex::build(&raw_hierarchy);
  builder::convert(&raw_cg, &per_input_hierarchy, std_hierarchy, &leaf.package_key)
}

fn decode<T: serde::de::DeserializeOwned>(path: &Path) -> ConvertResult<T> {
  let contents = fs::read_to_string(path)?;
  serde_json::from_str(&contents).map_err(|err| ConvertError::Decode {
    path: path.to_path_buf(),
    message: err.to_string(),
  })
}
