//! Path Parser (§4.1): decomposes a raw relative def id into modules,
//! impl anchor, nested elements, and method name.
//!
//! Pure function, no I/O, no dependency on the rest of the crate beyond the
//! `TypeResolver` trait it calls into for `{{impl}}[N]` resolution.

use crate::core::error::{ConvertError, ConvertResult};

pub const NO_TYPE_DEFINITION: &str = "NO-TYPE-DEFINITION";
pub const EMPTY_NAMESPACE: &str = "EMPTY-NAMESPACE";

/// One nested path element between the impl anchor and the method name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NestedElement {
  /// A nested function segment (rendered as `.<name>` by the formatter).
  Function(String),
  /// A nested `{{impl}}` anchor, resolved to a concrete type (`$<type>`).
  Anchor(String),
}

/// The structured decomposition of a relative def id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedPath {
  pub modules: Vec<String>,
  pub impl_anchor: String,
  pub nested: Vec<NestedElement>,
  pub method: String,
}

/// Resolves a raw (bracket-intact) impl prefix to a concrete type string.
/// Implemented by `TypeHierarchyIndex` (§4.2); kept as a trait here so the
/// parser has no direct dependency on the index's construction machinery.
pub trait TypeResolver {
  fn resolve_impl(&self, raw_prefix: &str) -> String;
}

/// Parse a raw relative def id into its structured pieces (§4.1 Algorithm).
pub fn parse(relative_def_id: &str, resolver: &impl TypeResolver) -> ConvertResult<ParsedPath> {
  let raw_segments: Vec<&str> = relative_def_id.split("::").collect();
  if raw_segments.len() < 2 {
    return Err(ConvertError::PathParse {
      relative_def_id: relative_def_id.to_string(),
    });
  }

  // `cleaned[k]` is the disambiguator-stripped text of the segment, and
  // `raw_upto[k]` is the raw-segment index it came from — segments that are
  // wholly a `{{closure}}[N]`/`{{constant}}[N]` tag are dropped entirely
  // (consuming a raw index but emitting nothing), so the two arrays can be
  // shorter than `raw_segments` and their indices diverge once a closure or
  // constant segment has been seen.
  let mut cleaned: Vec<String> = Vec::with_capacity(raw_segments.len());
  let mut raw_upto: Vec<usize> = Vec::with_capacity(raw_segments.len());
  for (r, segment) in raw_segments.iter().enumerate() {
    if is_closure_or_constant_tag(segment) {
      continue;
    }
    cleaned.push(strip_brackets(segment));
    raw_upto.push(r);
  }

  if cleaned.len() < 2 {
    return Err(ConvertError::PathParse {
      relative_def_id: relative_def_id.to_string(),
    });
  }

  let mut modules = Vec::new();
  let mut nested = Vec::new();
  let mut impl_anchor: Option<String> = None;
  let mut first_impl_seen = false;

  let last = cleaned.len() - 1;
  for i in 1..last {
    let segment = cleaned[i].as_str();
    if segment.is_empty() {
      continue;
    }

    if segment == "{{impl}}" {
      let raw_prefix = raw_segments[..=raw_upto[i]].join("::");
      let resolved = resolver.resolve_impl(&raw_prefix);
      if !first_impl_seen {
        impl_anchor = Some(resolved);
        first_impl_seen = true;
      } else {
        nested.push(NestedElement::Anchor(resolved));
      }
    } else if !first_impl_seen {
      modules.push(segment.to_string());
    } else {
      nested.push(NestedElement::Function(segment.to_string()));
    }
  }

  let method = cleaned[last].clone();

  let impl_anchor = impl_anchor.unwrap_or_else(|| NO_TYPE_DEFINITION.to_string());
  if modules.is_empty() {
    modules.push(EMPTY_NAMESPACE.to_string());
  }

  Ok(ParsedPath {
    modules,
    impl_anchor,
    nested,
    method,
  })
}

/// True if `segment` is exactly `{{closure}}[<digits>]` or `{{constant}}[<digits>]`.
fn is_closure_or_constant_tag(segment: &str) -> bool {
  for tag in ["{{closure}}", "{{constant}}"] {
    if let Some(rest) = segment.strip_prefix(tag)
      && let Some(digits) = rest.strip_prefix('[').and_then(|s| s.strip_suffix(']'))
      && !digits.is_empty()
      && digits.bytes().all(|b| b.is_ascii_digit())
    {
      return true;
    }
  }
  false
}

/// Remove every `[...]` bracketed span from a segment (non-nesting,
/// matching the analyzer's flat four-character disambiguator brackets).
fn strip_brackets(segment: &str) -> String {
  let mut result = String::with_capacity(segment.len());
  let mut depth = 0usize;
  for c in segment.chars() {
    match c {
      '[' => depth += 1,
      ']' if depth > 0 => depth -= 1,
      _ if depth == 0 => result.push(c),
      _ => {}
    }
  }
  result
}
