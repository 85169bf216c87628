//! Graph Builder (§4.4): the two-pass algorithm that turns one input's raw
//! call graph into the normalized `PackageGraph` for a single selected crate.

use crate::core::error::ConvertResult;
use crate::core::model::RawCallGraph;
use crate::core::wire::{Dispatch, PackageGraph};
use crate::formatter;
use crate::io::package_key;
use crate::typehierarchy::TypeHierarchyIndex;
use std::collections::HashMap;

const FORGE: &str = "cratesio";
const UNKNOWN_TARGET: &str = "UNKNOWN";

/// Per-node bookkeeping carried from Pass 1 into Pass 2, keyed by the
/// input-local node id.
struct NodeMeta {
  crate_name: String,
  package_version: String,
  relative_def_id: String,
}

/// Run both passes and return the graph for `package_key`'s crate (§4.4
/// "Selecting the result").
pub fn convert(
  raw_cg: &RawCallGraph,
  per_input_hierarchy: &TypeHierarchyIndex,
  std_hierarchy: &TypeHierarchyIndex,
  package_key: &str,
) -> ConvertResult<PackageGraph> {
  let mut graphs: HashMap<String, PackageGraph> = HashMap::new();
  let mut edge_map: HashMap<i64, Vec<i64>> = HashMap::new();
  let mut node_meta: HashMap<i64, NodeMeta> = HashMap::new();

  // Pass 1 — node ingest, in function-then-macro order (determines id
  // assignment, §5 "Ordering guarantees").
  for node in raw_cg.nodes() {
    let graph = graphs
      .entry(node.crate_name.clone())
      .or_insert_with(|| PackageGraph::new(node.crate_name.clone(), node.package_version.clone()));

    let formatted = per_input_hierarchy.full_path(&node.relative_def_id)?;
    let expansions = if per_input_hierarchy.is_generic(&node.relative_def_id) {
      formatter::expand_generic_tuples(&formatted)
    } else {
      vec![formatted]
    };

    let trait_path = per_input_hierarchy.lookup_trait_path(&node.relative_def_id);
    let source_file = postprocess_source_location(
      node.source_location.as_deref().unwrap_or(""),
      &node.package_name,
      &node.package_version,
    );

    let mut allocated = Vec::with_capacity(expansions.len());
    for expanded_path in &expansions {
      let namespace = namespace_of(expanded_path);
      let id = graph.add_method(namespace, expanded_path.clone());
      graph.add_super_interface(namespace, &trait_path);
      graph.set_source_file(namespace, source_file.clone());
      allocated.push(id);
    }

    edge_map.insert(node.id, allocated);
    node_meta.insert(
      node.id,
      NodeMeta {
        crate_name: node.crate_name.clone(),
        package_version: node.package_version.clone(),
        relative_def_id: node.relative_def_id.clone(),
      },
    );
  }

  // Pass 2 — edge ingest, preserving input edge order (§5).
  for edge in raw_cg.call_edges() {
    let (Some(src_meta), Some(tgt_meta)) = (node_meta.get(&edge.src), node_meta.get(&edge.tgt)) else {
      continue;
    };
    let (Some(src_ids), Some(tgt_ids)) = (edge_map.get(&edge.src), edge_map.get(&edge.tgt)) else {
      continue;
    };

    if src_meta.crate_name == tgt_meta.crate_name {
      let graph = graphs.get_mut(&src_meta.crate_name).expect("graph created in pass 1");
      for &src_id in src_ids {
        for &tgt_id in tgt_ids {
          graph.add_internal_call(src_id, tgt_id);
        }
      }
      continue;
    }

    let tgt_product = tgt_meta.crate_name.clone();
    let tgt_version = tgt_meta.package_version.clone();
    let target_paths = resolve_target_paths(&tgt_meta.relative_def_id, per_input_hierarchy, std_hierarchy)?;
    let dispatch = Dispatch::from_static_flag(edge.static_dispatch);

    let graph = graphs.get_mut(&src_meta.crate_name).expect("graph created in pass 1");
    graph.add_dependency(&tgt_product, &tgt_version);
    for &src_id in src_ids {
      for path in &target_paths {
        let target_uri = format!("//{FORGE}!{tgt_product}${tgt_version}{path}");
        graph.add_external_call(src_id, target_uri, dispatch);
      }
    }
  }

  let crate_name = package_key::crate_name(package_key);
  Ok(graphs.remove(&crate_name).unwrap_or_else(|| PackageGraph::new(crate_name, String::new())))
}

/// Try the per-input hierarchy, then the standard-library one; on a
/// genuine miss in both, fall back to the `UNKNOWN` sentinel singleton
/// (§4.4 Pass 2 "Determine target path(s)").
fn resolve_target_paths(
  relative_def_id: &str,
  per_input_hierarchy: &TypeHierarchyIndex,
  std_hierarchy: &TypeHierarchyIndex,
) -> ConvertResult<Vec<String>> {
  let resolved = match per_input_hierarchy.try_resolve_target(relative_def_id)? {
    Some(hit) => Some(hit),
    None => std_hierarchy.try_resolve_target(relative_def_id)?,
  };
  Ok(match resolved {
    Some((path, true)) => formatter::expand_generic_tuples(&path),
    Some((path, false)) => vec![path],
    None => vec![UNKNOWN_TARGET.to_string()],
  })
}

/// The CHA namespace for a formatted path is the path with its trailing
/// `.<method>()` segment removed — the last `.` in a formatted path is
/// always the one the formatter places immediately before the method.
fn namespace_of(formatted_path: &str) -> &str {
  match formatted_path.rfind('.') {
    Some(idx) => &formatted_path[..idx],
    None => formatted_path,
  }
}

/// §4.5: source-file post-processing.
fn postprocess_source_location(source_location: &str, product: &str, version: &str) -> String {
  let needle = format!("{product}-{version}");
  let Some(marker) = source_location.rfind(&needle) else {
    return String::new();
  };
  let after = &source_location[marker + needle.len()..];
  let trimmed = match after.rfind(':') {
    Some(idx) => &after[..idx],
    None => after,
  };
  if trimmed.contains(".rs") { trimmed.to_string() } else { String::new() }
}
