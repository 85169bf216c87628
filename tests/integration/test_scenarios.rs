//! End-to-end coverage of §8 Scenarios A–F: materialize a scratch input
//! tree, run the built binary against it, and assert on the filesystem
//! sink's JSON output.

use crate::support::{InputTree, empty_type_hierarchy, node, read_output, run_rust_callgraphs};
use serde_json::json;

#[test]
fn scenario_a_intra_crate_static_call() {
  let input = InputTree::new().unwrap();
  let call_graph = json!({
    "functions": [
      node(0, "mycrate", "0.1.0", "mycrate", "mycrate::m::f"),
      node(1, "mycrate", "0.1.0", "mycrate", "mycrate::m::g"),
    ],
    "macros": [],
    "function_calls": [[0, 1, true]],
  });
  input.add_leaf("mycrate", "0.1.0", &call_graph, &empty_type_hierarchy()).unwrap();

  let output = tempfile::tempdir().unwrap();
  run_rust_callgraphs(&input.path, output.path()).unwrap();

  let doc = read_output(output.path(), "/mycrate/0.1.0/", "mycrate", "0.1.0");
  assert_eq!(doc["graph"]["internalCalls"], json!([[0, 1]]));
  assert!(doc.get("depset").is_none(), "depset should be omitted when empty");
  let cha = &doc["cha"]["/m/NO-TYPE-DEFINITION"];
  assert_eq!(cha["methods"].as_object().unwrap().len(), 2);
}

#[test]
fn scenario_b_cross_crate_dynamic_call() {
  let input = InputTree::new().unwrap();
  let call_graph = json!({
    "functions": [
      node(0, "a", "0.1.0", "a", "a::f"),
      node(1, "b", "1.2.0", "b", "b::g"),
    ],
    "macros": [],
    "function_calls": [[0, 1, false]],
  });
  input.add_leaf("a", "0.1.0", &call_graph, &empty_type_hierarchy()).unwrap();

  let output = tempfile::tempdir().unwrap();
  run_rust_callgraphs(&input.path, output.path()).unwrap();

  let doc = read_output(output.path(), "/a/0.1.0/", "a", "0.1.0");
  let depset = doc["depset"].as_array().unwrap();
  assert_eq!(depset.len(), 1);
  assert_eq!(depset[0][0]["product"], "b");
  assert_eq!(depset[0][0]["constraints"], json!(["[1.2.0]"]));

  let external = doc["graph"]["externalCalls"].as_array().unwrap();
  assert_eq!(external.len(), 1);
  assert_eq!(external[0][0], "0");
  assert!(external[0][1].as_str().unwrap().starts_with("//cratesio!b$1.2.0"));
  assert_eq!(external[0][2]["dispatch"], "dynamic");
}

#[test]
fn scenario_c_generic_expansion_doubles_every_outgoing_call() {
  let input = InputTree::new().unwrap();
  let call_graph = json!({
    "functions": [
      node(0, "mycrate", "0.1.0", "mycrate", "mycrate::{{impl}}[aaaa]::f"),
      node(1, "mycrate", "0.1.0", "mycrate", "mycrate::g"),
    ],
    "macros": [],
    "function_calls": [[0, 1, true]],
  });
  let type_hierarchy = json!({
    "types": [{
      "id": 1,
      "string_id": "(A, B)",
      "package_name": "mycrate",
      "package_version": "0.1.0",
      "relative_def_id": "mycrate::SomeTuple",
    }],
    "traits": [],
    "impls": [{
      "id": 0,
      "type_id": 1,
      "trait_id": 0,
      "package_name": "mycrate",
      "package_version": "0.1.0",
      "relative_def_id": "mycrate::{{impl}}[aaaa]",
    }],
  });
  input.add_leaf("mycrate", "0.1.0", &call_graph, &type_hierarchy).unwrap();

  let output = tempfile::tempdir().unwrap();
  run_rust_callgraphs(&input.path, output.path()).unwrap();

  let doc = read_output(output.path(), "/mycrate/0.1.0/", "mycrate", "0.1.0");
  // Two CHA method ids allocated for the single generic node (ids 0, 1),
  // one more for the plain callee `g` (id 2); every call from the
  // generic node emits once per instantiation.
  assert_eq!(doc["graph"]["internalCalls"], json!([[0, 2], [1, 2]]));
  let namespaces: Vec<&String> = doc["cha"].as_object().unwrap().keys().collect();
  assert!(namespaces.iter().any(|ns| ns.ends_with("/A")));
  assert!(namespaces.iter().any(|ns| ns.ends_with("/B")));
}

#[test]
fn scenario_e_unresolved_target_degrades_to_sentinel() {
  let input = InputTree::new().unwrap();
  let call_graph = json!({
    "functions": [
      node(0, "a", "0.1.0", "a", "a::f"),
      node(1, "b", "1.2.0", "b", "b::{{impl}}[abcd]::g"),
    ],
    "macros": [],
    "function_calls": [[0, 1, true]],
  });
  input.add_leaf("a", "0.1.0", &call_graph, &empty_type_hierarchy()).unwrap();

  let output = tempfile::tempdir().unwrap();
  run_rust_callgraphs(&input.path, output.path()).unwrap();

  let doc = read_output(output.path(), "/a/0.1.0/", "a", "0.1.0");
  let external = doc["graph"]["externalCalls"].as_array().unwrap();
  assert!(external[0][1].as_str().unwrap().ends_with("UNKNOWN"));
}
