//! Filesystem sink (§6 "Filesystem sink"): writes
//! `<outputDir>/fasten<package_key><product>-<version>.json`, creating
//! intermediate directories with mode 0755.

use crate::core::error::{ConvertError, ConvertResult};
use crate::core::wire::PackageGraph;
use crate::sink::Sink;
use std::fs;
use std::path::{Path, PathBuf};

pub struct FilesystemSink {
  output_dir: PathBuf,
}

impl FilesystemSink {
  pub fn new(output_dir: impl Into<PathBuf>) -> Self {
    Self { output_dir: output_dir.into() }
  }

  fn target_path(&self, package_key: &str, graph: &PackageGraph) -> PathBuf {
    let file_name = format!("fasten{package_key}{}-{}.json", graph.product, graph.version);
    self.output_dir.join(file_name.trim_start_matches('/'))
  }
}

impl Sink for FilesystemSink {
  fn emit(&self, package_key: &str, graph: &PackageGraph) -> ConvertResult<()> {
    let path = self.target_path(package_key, graph);
    if let Some(parent) = path.parent() {
      create_dir_all_0755(parent)?;
    }
    let body = serde_json::to_vec_pretty(graph).map_err(|err| ConvertError::Write {
      path: path.clone(),
      message: err.to_string(),
    })?;
    fs::write(&path, body).map_err(|err| ConvertError::Write { path, message: err.to_string() })
  }
}

#[cfg(unix)]
fn create_dir_all_0755(dir: &Path) -> ConvertResult<()> {
  use std::os::unix::fs::DirBuilderExt;
  fs::DirBuilder::new()
    .recursive(true)
    .mode(0o755)
    .create(dir)
    .map_err(|err| ConvertError::Write { path: dir.to_path_buf(), message: err.to_string() })
}

#[cfg(not(unix))]
fn create_dir_all_0755(dir: &Path) -> ConvertResult<()> {
  fs::create_dir_all(dir).map_err(|err| ConvertError::Write { path: dir.to_path_buf(), message: err.to_string() })
}
