//! Output sinks (§6 "Publish sink", "Filesystem sink"): where a converted
//! `PackageGraph` goes once `convert` returns. Both sinks are thin
//! collaborators — the core has no notion of where its output lands.

pub mod broker;
pub mod filesystem;

use crate::core::error::ConvertResult;
use crate::core::wire::PackageGraph;

/// A destination a converted graph can be emitted to.
pub trait Sink {
  fn emit(&self, package_key: &str, graph: &PackageGraph) -> ConvertResult<()>;
}

pub use broker::BrokerSink;
pub use filesystem::FilesystemSink;
