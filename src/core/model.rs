//! Raw input data model: the shape of `callgraph.json` and `type_hierarchy.json`
//! as produced by the upstream static analyzer (§3 Data model).

use serde::Deserialize;

/// One input's call graph: functions, macros, and the edges between them.
///
/// Node ids are stable only within this one input; they are not reused
/// across packages.
#[derive(Debug, Clone, Deserialize)]
pub struct RawCallGraph {
  pub functions: Vec<Node>,
  pub macros: Vec<Node>,
  /// `(source_node_id, target_node_id, static_dispatch_flag)`
  pub function_calls: Vec<(i64, i64, bool)>,
}

impl RawCallGraph {
  /// Functions followed by macros, in that order — this concatenation
  /// order determines method-id assignment in Pass 1 (§4.4, §5).
  pub fn nodes(&self) -> impl Iterator<Item = &Node> {
    self.functions.iter().chain(self.macros.iter())
  }

  /// Decoded call edges, in input order (§5 "Ordering guarantees") —
  /// the heterogeneous tuple form never escapes this boundary
  /// (Design Notes §9 "Dynamic edge tuples").
  pub fn call_edges(&self) -> impl Iterator<Item = CallEdge> + '_ {
    self.function_calls.iter().copied().map(CallEdge::from)
  }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Node {
  pub id: i64,
  pub package_name: String,
  pub package_version: String,
  pub crate_name: String,
  pub relative_def_id: String,
  #[serde(default)]
  pub is_externally_visible: bool,
  #[serde(default)]
  pub num_lines: i64,
  #[serde(default)]
  pub source_location: Option<String>,
}

/// An input's type hierarchy: types, traits, and impls it declares.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawTypeHierarchy {
  pub types: Vec<Type>,
  pub traits: Vec<Trait>,
  pub impls: Vec<Impl>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Type {
  pub id: i64,
  pub string_id: String,
  pub package_name: String,
  pub package_version: String,
  pub relative_def_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Trait {
  pub id: i64,
  pub package_name: String,
  pub package_version: String,
  pub relative_def_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Impl {
  pub id: i64,
  pub type_id: i64,
  /// `0` is the sentinel "no trait" (inherent impl).
  pub trait_id: i64,
  pub package_name: String,
  pub package_version: String,
  pub relative_def_id: String,
}

/// A decoded call edge, never propagated beyond the decoder in its
/// heterogeneous `(i64, i64, bool)` tuple form (Design Notes §9).
#[derive(Debug, Clone, Copy)]
pub struct CallEdge {
  pub src: i64,
  pub tgt: i64,
  pub static_dispatch: bool,
}

impl From<(i64, i64, bool)> for CallEdge {
  fn from((src, tgt, static_dispatch): (i64, i64, bool)) -> Self {
    CallEdge { src, tgt, static_dispatch }
  }
}
