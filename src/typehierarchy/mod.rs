//! Type-Hierarchy Index (§4.2): an in-memory, read-only-after-construction
//! lookup from a raw `type_hierarchy.json` (or the process-wide standard
//! library one), built once per input and shared by reference.

use crate::core::error::ConvertResult;
use crate::core::model::{Impl, RawTypeHierarchy, Trait, Type};
use crate::formatter;
use crate::parser::{self, TypeResolver};
use std::collections::HashMap;

pub const UNKNOWN_TYPE: &str = "UNKNOWN";

/// A read-only index over one input's (or the standard library's) types,
/// traits, and impls.
pub struct TypeHierarchyIndex {
  types_by_id: HashMap<i64, Type>,
  traits: Vec<Trait>,
  first_trait_id: i64,
  /// Keyed by the impl's relative def id with `[XXXX]` disambiguators
  /// stripped — the same normalized form node relative-def-ids present
  /// after stripping (§4.2 "Index construction").
  impls_by_key: HashMap<String, Impl>,
}

impl TypeHierarchyIndex {
  /// Build an index from one input's (or the standard library's) raw
  /// type hierarchy.
  pub fn build(raw: &RawTypeHierarchy) -> Self {
    let types_by_id = raw.types.iter().map(|t| (t.id, t.clone())).collect();

    let first_trait_id = raw.traits.iter().map(|t| t.id).min().unwrap_or(0);
    let traits = raw.traits.clone();

    let mut impls_by_key = HashMap::new();
    for imp in &raw.impls {
      let key = strip_disambiguators(&imp.relative_def_id);
      impls_by_key.insert(key, imp.clone());
    }

    Self {
      types_by_id,
      traits,
      first_trait_id,
      impls_by_key,
    }
  }

  /// Resolve a raw def id to the canonical concrete type string (§4.2
  /// `lookup_type`). Returns `(UNKNOWN, false)` on miss.
  pub fn lookup_type(&self, raw_id: &str) -> (String, bool) {
    match self.resolve_impl_for(raw_id) {
      Some(imp) => match self.types_by_id.get(&imp.type_id) {
        Some(ty) => (ty.string_id.clone(), true),
        None => (UNKNOWN_TYPE.to_string(), false),
      },
      None => (UNKNOWN_TYPE.to_string(), false),
    }
  }

  /// Resolve the trait path of the impl backing `raw_id` (§4.2
  /// `lookup_trait_path`). Empty string on miss or inherent impl.
  pub fn lookup_trait_path(&self, raw_id: &str) -> String {
    let Some(imp) = self.resolve_impl_for(raw_id) else {
      return String::new();
    };
    if imp.trait_id == 0 {
      return String::new();
    }
    let index = imp.trait_id - self.first_trait_id;
    let Some(trait_def) = usize::try_from(index).ok().and_then(|i| self.traits.get(i)) else {
      return String::new();
    };
    let (formatted, _) = self.full_path_uncached(&trait_def.relative_def_id);
    formatter::format_trait_path(&formatted)
  }

  /// Format a raw relative def id into its final URI-style path (§4.2
  /// `full_path`, §4.3).
  pub fn full_path(&self, raw_id: &str) -> ConvertResult<String> {
    let parsed = parser::parse(raw_id, self)?;
    Ok(formatter::format_path(&parsed))
  }

  fn full_path_uncached(&self, raw_id: &str) -> (String, bool) {
    match parser::parse(raw_id, self) {
      Ok(parsed) => (formatter::format_path(&parsed), true),
      Err(_) => (String::new(), false),
    }
  }

  /// True iff any `{{impl}}` prefix within `raw_id` resolves to a tuple
  /// type (`string_id` starting with `(`) — §4.2 `is_generic`, bounding
  /// the prefix scan per Design Notes §9 point (iii).
  pub fn is_generic(&self, raw_id: &str) -> bool {
    let raw_segments: Vec<&str> = raw_id.split("::").collect();
    // Iterate within `raw_segments.len()`, not `length + 1` — Design
    // Notes §9 point (iii) flags the original's off-by-one overrun here.
    for i in 0..raw_segments.len() {
      if is_impl_segment(raw_segments[i]) {
        let prefix = raw_segments[..=i].join("::");
        let (string_id, found) = self.lookup_type(&prefix);
        if found && string_id.starts_with('(') {
          return true;
        }
      }
    }
    false
  }

  /// Expand a formatted path whose impl anchor is a tuple type into one
  /// path per tuple element (§4.3 "Generic expansion").
  pub fn generic_expansions(&self, formatted_path: &str) -> Vec<String> {
    formatter::expand_generic_tuples(formatted_path)
  }

  /// Format `raw_id` against this index, returning `None` when `raw_id`
  /// names an `{{impl}}` anchor this index cannot resolve — the caller
  /// should then retry against another index (§4.4 Pass 2 "Determine
  /// target path(s)"). A `raw_id` with no impl anchor at all always
  /// resolves: there is nothing for this index to miss.
  pub fn try_resolve_target(&self, raw_id: &str) -> ConvertResult<Option<(String, bool)>> {
    if crop_to_last_impl_prefix(raw_id).is_some() && self.resolve_impl_for(raw_id).is_none() {
      return Ok(None);
    }
    let path = self.full_path(raw_id)?;
    Ok(Some((path, self.is_generic(raw_id))))
  }

  /// Locate the `Impl` backing a raw def id: crop to the last
  /// `{{impl}}[<digits>]` prefix, strip `[XXXX]` disambiguators, and look
  /// it up by that normalized key (§4.2 `lookup_type` steps a–c).
  fn resolve_impl_for(&self, raw_id: &str) -> Option<&Impl> {
    let cropped = crop_to_last_impl_prefix(raw_id)?;
    let key = strip_disambiguators(&cropped);
    self.impls_by_key.get(&key)
  }
}

impl TypeResolver for TypeHierarchyIndex {
  fn resolve_impl(&self, raw_prefix: &str) -> String {
    self.lookup_type(raw_prefix).0
  }
}

fn is_impl_segment(segment: &str) -> bool {
  segment.starts_with("{{impl}}[") && segment.ends_with(']')
}

/// Crop `raw_id` to the prefix ending at the LAST `{{impl}}[<digits>]`
/// occurrence (the `^.*{{impl}}[<digits>]` pattern is greedy).
fn crop_to_last_impl_prefix(raw_id: &str) -> Option<String> {
  let segments: Vec<&str> = raw_id.split("::").collect();
  let last_impl_index = segments.iter().rposition(|s| is_impl_segment(s))?;
  Some(segments[..=last_impl_index].join("::"))
}

/// Strip every `[XXXX]` (exactly four characters between brackets)
/// disambiguator from a relative def id (§3 Invariants).
fn strip_disambiguators(relative_def_id: &str) -> String {
  let mut result = String::with_capacity(relative_def_id.len());
  let bytes = relative_def_id.as_bytes();
  let mut i = 0;
  while i < bytes.len() {
    if bytes[i] == b'[' {
      if let Some(end) = relative_def_id[i..].find(']') {
        let inner = &relative_def_id[i + 1..i + end];
        if inner.chars().count() == 4 {
          i += end + 1;
          continue;
        }
      }
    }
    let ch_len = relative_def_id[i..].chars().next().map(|c| c.len_utf8()).unwrap_or(1);
    result.push_str(&relative_def_id[i..i + ch_len]);
    i += ch_len;
  }
  result
}

#[cfg(test)]
mod tests {
  use super::*;

  fn sample_hierarchy() -> RawTypeHierarchy {
    RawTypeHierarchy {
      types: vec![Type {
        id: 1,
        string_id: "MyStruct".to_string(),
        package_name: "mycrate".to_string(),
        package_version: "0.1.0".to_string(),
        relative_def_id: "mycrate::MyStruct".to_string(),
      }],
      traits: vec![Trait {
        id: 5,
        package_name: "mycrate".to_string(),
        package_version: "0.1.0".to_string(),
        relative_def_id: "mycrate::MyTrait".to_string(),
      }],
      impls: vec![Impl {
        id: 0,
        type_id: 1,
        trait_id: 5,
        package_name: "mycrate".to_string(),
        package_version: "0.1.0".to_string(),
        relative_def_id: "mycrate::{{impl}}[abcd]".to_string(),
      }],
    }
  }

  #[test]
  fn resolves_known_impl_to_concrete_type() {
    let index = TypeHierarchyIndex::build(&sample_hierarchy());
    let (ty, ok) = index.lookup_type("mycrate::{{impl}}[abcd]::method");
    assert!(ok);
    assert_eq!(ty, "MyStruct");
  }

  #[test]
  fn unknown_impl_yields_sentinel() {
    let index = TypeHierarchyIndex::build(&sample_hierarchy());
    // A disambiguator only changes the bracket contents, which are
    // stripped entirely before lookup — so misses must come from an
    // unrelated module path, not merely a different `[XXXX]` value.
    let (ty, ok) = index.lookup_type("othercrate::{{impl}}[zzzz]::method");
    assert!(!ok);
    assert_eq!(ty, UNKNOWN_TYPE);
  }

  #[test]
  fn trait_path_empty_for_inherent_impl() {
    let mut hierarchy = sample_hierarchy();
    hierarchy.impls[0].trait_id = 0;
    let index = TypeHierarchyIndex::build(&hierarchy);
    assert_eq!(index.lookup_trait_path("mycrate::{{impl}}[abcd]::method"), "");
  }

  #[test]
  fn trait_index_is_relative_to_first_trait_id() {
    let mut hierarchy = sample_hierarchy();
    hierarchy.traits.push(Trait {
      id: 6,
      package_name: "mycrate".to_string(),
      package_version: "0.1.0".to_string(),
      relative_def_id: "mycrate::OtherTrait".to_string(),
    });
    hierarchy.impls[0].trait_id = 6;
    let index = TypeHierarchyIndex::build(&hierarchy);
    let path = index.lookup_trait_path("mycrate::{{impl}}[abcd]::method");
    assert!(path.contains("OtherTrait"));
  }
}
