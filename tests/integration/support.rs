//! Shared scaffolding for integration tests: build a scratch `-i` input
//! tree matching §6's `<inputDir>/<packageName>/<version>/` layout and
//! invoke the built binary against it.

use anyhow::{Context, Result, bail};
use serde_json::{Value, json};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

/// A scratch input tree: one `callgraph.json` + `type_hierarchy.json`
/// pair per package/version leaf.
pub struct InputTree {
  _root: TempDir,
  pub path: PathBuf,
}

impl InputTree {
  pub fn new() -> Result<Self> {
    let root = TempDir::new()?;
    let path = root.path().to_path_buf();
    Ok(Self { _root: root, path })
  }

  /// Write one leaf's `callgraph.json` and `type_hierarchy.json`.
  pub fn add_leaf(&self, package_name: &str, version: &str, call_graph: &Value, type_hierarchy: &Value) -> Result<()> {
    let leaf = self.path.join(package_name).join(version);
    std::fs::create_dir_all(&leaf)?;
    std::fs::write(leaf.join("callgraph.json"), serde_json::to_vec_pretty(call_graph)?)?;
    std::fs::write(leaf.join("type_hierarchy.json"), serde_json::to_vec_pretty(type_hierarchy)?)?;
    Ok(())
  }
}

/// A function/macro node literal, matching §3's raw call graph shape.
pub fn node(id: i64, package_name: &str, version: &str, crate_name: &str, relative_def_id: &str) -> Value {
  json!({
    "id": id,
    "package_name": package_name,
    "package_version": version,
    "crate_name": crate_name,
    "relative_def_id": relative_def_id,
    "is_externally_visible": true,
    "num_lines": 1,
    "source_location": Value::Null,
  })
}

pub fn empty_type_hierarchy() -> Value {
  json!({ "types": [], "traits": [], "impls": [] })
}

/// Run the built binary against `input_dir`, writing to `output_dir` and
/// disabling the broker sink.
pub fn run_rust_callgraphs(input_dir: &Path, output_dir: &Path) -> Result<Output> {
  let bin = env!("CARGO_BIN_EXE_rust-callgraphs");
  let output = Command::new(bin)
    .args([
      "-i",
      &input_dir.to_string_lossy(),
      "-o",
      &output_dir.to_string_lossy(),
      "-t",
      "[no-value-provided]",
    ])
    .output()
    .context("failed to run rust-callgraphs")?;

  if !output.status.success() {
    let stderr = String::from_utf8_lossy(&output.stderr);
    bail!("rust-callgraphs exited with failure\nstderr: {}", stderr);
  }
  Ok(output)
}

/// Read back one converted document written by the filesystem sink
/// (§6 "Filesystem sink").
pub fn read_output(output_dir: &Path, package_key: &str, product: &str, version: &str) -> Value {
  let file_name = format!("fasten{package_key}{product}-{version}.json");
  let path = output_dir.join(file_name.strip_prefix('/').unwrap_or(&file_name));
  let contents =
    std::fs::read_to_string(&path).unwrap_or_else(|err| panic!("missing output at {}: {err}", path.display()));
  serde_json::from_str(&contents).expect("output is valid JSON")
}
