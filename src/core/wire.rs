//! Output wire format (§6 "Output wire format"): one `PackageGraph` per
//! crate, serialized with empty fields omitted the way the Go original's
//! `fasten.JSON` does via `omitempty`.

use serde::Serialize;
use std::collections::BTreeMap;

/// One normalized call-graph document for a single crate.
#[derive(Debug, Clone, Serialize)]
pub struct PackageGraph {
  #[serde(skip_serializing_if = "String::is_empty")]
  pub product: String,
  pub forge: String,
  pub generator: String,
  #[serde(skip_serializing_if = "Vec::is_empty")]
  pub depset: Vec<Vec<Dependency>>,
  #[serde(skip_serializing_if = "String::is_empty")]
  pub version: String,
  #[serde(skip_serializing_if = "BTreeMap::is_empty")]
  pub cha: BTreeMap<String, ChaEntry>,
  pub graph: CallGraphBody,
  pub timestamp: i64,

  /// Per-package method-id counter. Not serialized; lives only for the
  /// duration of one `convert` call (Design Notes §9 "Cyclic references").
  #[serde(skip)]
  pub(crate) next_method_id: i64,
}

impl PackageGraph {
  pub fn new(product: String, version: String) -> Self {
    Self {
      product,
      forge: "cratesio".to_string(),
      generator: "rust-callgraphs".to_string(),
      depset: Vec::new(),
      version,
      cha: BTreeMap::new(),
      graph: CallGraphBody::default(),
      timestamp: -1,
      next_method_id: 0,
    }
  }

  /// True when this graph has neither internal nor external calls —
  /// mirrors the Go original's `IsEmpty`.
  pub fn is_empty(&self) -> bool {
    self.graph.internal_calls.is_empty() && self.graph.external_calls.is_empty()
  }

  /// Allocate the next method id and register it under `namespace`.
  /// Returns the allocated id.
  pub fn add_method(&mut self, namespace: &str, formatted_path: String) -> i64 {
    let id = self.next_method_id;
    self.next_method_id += 1;
    self
      .cha
      .entry(namespace.to_string())
      .or_insert_with(ChaEntry::default)
      .methods
      .insert(id, formatted_path);
    id
  }

  /// Insert `trait_path` into `namespace`'s super-interfaces if non-empty
  /// and not already present (dedup, order-preserved — §8 Universal
  /// Property 6).
  pub fn add_super_interface(&mut self, namespace: &str, trait_path: &str) {
    if trait_path.is_empty() {
      return;
    }
    let entry = self.cha.entry(namespace.to_string()).or_insert_with(ChaEntry::default);
    if !entry.super_interfaces.iter().any(|existing| existing == trait_path) {
      entry.super_interfaces.push(trait_path.to_string());
    }
  }

  /// Set the source-file field for a namespace (§4.5), only once
  /// populated by the first node that resolves into it.
  pub fn set_source_file(&mut self, namespace: &str, source_file: String) {
    if source_file.is_empty() {
      return;
    }
    self.cha.entry(namespace.to_string()).or_insert_with(ChaEntry::default).source_file = source_file;
  }

  /// Idempotent dependency add (§3 "Dependency entry", §8 Universal
  /// Property 4): no `(product, version)` pair appears twice.
  pub fn add_dependency(&mut self, product: &str, version: &str) {
    let bracketed = format!("[{}]", version);
    let already_present = self
      .depset
      .iter()
      .flatten()
      .any(|dep| dep.product == product && dep.constraints.first() == Some(&bracketed));
    if already_present {
      return;
    }
    if self.depset.is_empty() {
      self.depset.push(Vec::new());
    }
    self.depset[0].push(Dependency {
      product: product.to_string(),
      forge: "cratesio".to_string(),
      constraints: vec![bracketed],
    });
  }

  pub fn add_internal_call(&mut self, source_id: i64, target_id: i64) {
    self.graph.internal_calls.push([source_id, target_id]);
  }

  pub fn add_external_call(&mut self, source_id: i64, target_uri: String, dispatch: Dispatch) {
    self.graph.external_calls.push(ExternalCall {
      source_id: source_id.to_string(),
      target_uri,
      dispatch,
    });
  }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Dependency {
  pub product: String,
  pub forge: String,
  pub constraints: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Default)]
pub struct ChaEntry {
  #[serde(skip_serializing_if = "BTreeMap::is_empty")]
  pub methods: BTreeMap<i64, String>,
  #[serde(rename = "superInterfaces", skip_serializing_if = "Vec::is_empty")]
  pub super_interfaces: Vec<String>,
  #[serde(rename = "sourceFile", skip_serializing_if = "String::is_empty")]
  pub source_file: String,
  /// Always present, never populated by this analyzer's inputs (§3).
  #[serde(rename = "superClasses", skip_serializing_if = "Vec::is_empty")]
  pub super_classes: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Default)]
pub struct CallGraphBody {
  #[serde(rename = "internalCalls", skip_serializing_if = "Vec::is_empty")]
  pub internal_calls: Vec<[i64; 2]>,
  #[serde(rename = "externalCalls", skip_serializing_if = "Vec::is_empty")]
  pub external_calls: Vec<ExternalCall>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Dispatch {
  Static,
  Dynamic,
}

impl Dispatch {
  pub fn from_static_flag(is_static: bool) -> Self {
    if is_static {
      Dispatch::Static
    } else {
      Dispatch::Dynamic
    }
  }
}

/// `[str(src_id), target_uri, {"dispatch": ...}]` serialized as a 3-tuple.
#[derive(Debug, Clone, Serialize)]
#[serde(into = "ExternalCallTuple")]
pub struct ExternalCall {
  pub source_id: String,
  pub target_uri: String,
  pub dispatch: Dispatch,
}

#[derive(Serialize)]
struct ExternalCallTuple(String, String, DispatchTag);

#[derive(Serialize)]
struct DispatchTag {
  dispatch: Dispatch,
}

impl From<ExternalCall> for ExternalCallTuple {
  fn from(call: ExternalCall) -> Self {
    ExternalCallTuple(call.source_id, call.target_uri, DispatchTag { dispatch: call.dispatch })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn dependency_add_is_idempotent_by_product_and_version() {
    let mut graph = PackageGraph::new("a".to_string(), "0.1.0".to_string());
    graph.add_dependency("b", "1.2.0");
    graph.add_dependency("b", "1.2.0");
    graph.add_dependency("b", "1.2.0");
    assert_eq!(graph.depset.len(), 1);
    assert_eq!(graph.depset[0].len(), 1);
  }

  #[test]
  fn dependency_add_keeps_distinct_versions_of_the_same_product() {
    let mut graph = PackageGraph::new("a".to_string(), "0.1.0".to_string());
    graph.add_dependency("b", "1.2.0");
    graph.add_dependency("b", "2.0.0");
    assert_eq!(graph.depset[0].len(), 2);
  }

  #[test]
  fn super_interfaces_dedup_and_preserve_insertion_order() {
    let mut graph = PackageGraph::new("a".to_string(), "0.1.0".to_string());
    graph.add_super_interface("/m/MyStruct", "/m/Second$Trait");
    graph.add_super_interface("/m/MyStruct", "/m/First$Trait");
    graph.add_super_interface("/m/MyStruct", "/m/Second$Trait");
    let entry = graph.cha.get("/m/MyStruct").unwrap();
    assert_eq!(entry.super_interfaces, vec!["/m/Second$Trait".to_string(), "/m/First$Trait".to_string()]);
  }

  #[test]
  fn empty_trait_path_is_never_recorded() {
    let mut graph = PackageGraph::new("a".to_string(), "0.1.0".to_string());
    graph.add_super_interface("/m/MyStruct", "");
    assert!(graph.cha.get("/m/MyStruct").is_none());
  }

  #[test]
  fn method_ids_are_allocated_densely_from_zero() {
    let mut graph = PackageGraph::new("a".to_string(), "0.1.0".to_string());
    let first = graph.add_method("/m/NO-TYPE-DEFINITION", "/m/NO-TYPE-DEFINITION.f()".to_string());
    let second = graph.add_method("/m/NO-TYPE-DEFINITION", "/m/NO-TYPE-DEFINITION.g()".to_string());
    assert_eq!((first, second), (0, 1));
    assert_eq!(graph.cha["/m/NO-TYPE-DEFINITION"].methods.len(), 2);
  }

  #[test]
  fn external_call_serializes_as_a_three_element_tuple() {
    let mut graph = PackageGraph::new("a".to_string(), "0.1.0".to_string());
    graph.add_external_call(0, "//cratesio!b$1.2.0/m/NO-TYPE-DEFINITION.g()".to_string(), Dispatch::Static);
    let json = serde_json::to_value(&graph.graph.external_calls[0]).unwrap();
    assert_eq!(json, serde_json::json!(["0", "//cratesio!b$1.2.0/m/NO-TYPE-DEFINITION.g()", {"dispatch": "static"}]));
  }

  #[test]
  fn empty_package_graph_omits_optional_fields_on_serialization() {
    let graph = PackageGraph::new("a".to_string(), "0.1.0".to_string());
    let json = serde_json::to_value(&graph).unwrap();
    assert!(json.get("depset").is_none());
    assert!(json.get("cha").is_none());
    assert_eq!(json["graph"], serde_json::json!({}));
  }
}
