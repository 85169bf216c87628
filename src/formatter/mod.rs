//! Symbol Formatter (§4.3): turns a parsed path (§4.1) into the final
//! URI-style fully-qualified path, and expands tuple-of-concrete-types
//! impl anchors into one path per instantiation.

use crate::parser::{NestedElement, ParsedPath};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

/// Characters a path component may keep unescaped. Everything else
/// (including `:`, `&`, `(`, `)`) is percent-encoded — §8 Universal
/// Property 7 requires `(`/`)` to become `%28`/`%29` and forbids raw `:`
/// or `&` anywhere in a formatted path, so this set is deliberately
/// tighter than a typical URL path-segment escaper.
const COMPONENT_ESCAPE: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'_').remove(b'.').remove(b'~');

/// Build the final formatted path for a parsed symbol (§4.3 "Contract").
///
/// `/<modules joined by '.'>/<escaped-impl-anchor>[<nested>]*.<method>()`
pub fn format_path(parsed: &ParsedPath) -> String {
  let mut out = String::new();
  out.push('/');
  out.push_str(&parsed.modules.join("."));
  out.push('/');
  out.push_str(&escape_anchor(&parsed.impl_anchor));

  for element in &parsed.nested {
    match element {
      NestedElement::Anchor(ty) => {
        out.push('$');
        out.push_str(&escape_anchor(ty));
      }
      NestedElement::Function(name) => {
        out.push('.');
        out.push_str(&escape_component(name));
      }
    }
  }

  out.push('.');
  out.push_str(&escape_component(&parsed.method));
  out.push_str("()");
  out
}

/// Format a trait's relative def id into its trait-path form (§4.3
/// "Trait-path formatting"): full-path it, drop the trailing `()`, drop
/// `NO-TYPE-DEFINITION.` if present, else upgrade the last `.` to `$`.
pub fn format_trait_path(full_path: &str) -> String {
  let without_call = full_path.strip_suffix("()").unwrap_or(full_path);
  if let Some(idx) = without_call.find("NO-TYPE-DEFINITION.") {
    let mut result = without_call.to_string();
    result.replace_range(idx..idx + "NO-TYPE-DEFINITION.".len(), "");
    result
  } else if let Some(idx) = without_call.rfind('.') {
    let mut result = without_call.to_string();
    result.replace_range(idx..idx + 1, "$");
    result
  } else {
    without_call.to_string()
  }
}

/// Expand a formatted path whose impl anchor is a tuple type
/// (`(/|$)%28...%29`) into one formatted path per tuple element,
/// recursing until no tuple anchor remains (§4.3 "Generic expansion").
pub fn expand_generic_tuples(formatted_path: &str) -> Vec<String> {
  let Some((prefix_end, open, close)) = find_tuple_anchor(formatted_path) else {
    return vec![formatted_path.to_string()];
  };

  let marker = formatted_path.as_bytes()[prefix_end];
  let prefix = &formatted_path[..prefix_end + 1]; // includes the '/' or '$' marker
  let inner_encoded = &formatted_path[open + "%28".len()..close];
  let suffix = &formatted_path[close + "%29".len()..];
  let _ = marker;

  let decoded = percent_encoding::percent_decode_str(inner_encoded)
    .decode_utf8()
    .map(|s| s.into_owned())
    .unwrap_or_else(|_| inner_encoded.to_string());

  let mut expansions = Vec::new();
  for piece in decoded.split(',') {
    let trimmed = piece.trim();
    let re_escaped = escape_anchor(trimmed);
    let candidate = format!("{}{}{}", prefix, re_escaped, suffix);
    expansions.extend(expand_generic_tuples(&candidate));
  }
  expansions
}

/// Locate the first `%28...%29` tuple-anchor span immediately preceded by
/// `/` or `$`. Returns (index of the marker char, index of `%28`, index
/// of `%29`).
fn find_tuple_anchor(path: &str) -> Option<(usize, usize, usize)> {
  let bytes = path.as_bytes();
  let open = path.find("%28")?;
  if open == 0 {
    return None;
  }
  let marker_idx = open - 1;
  match bytes.get(marker_idx) {
    Some(b'/') | Some(b'$') => {}
    _ => return None,
  }
  let close = path[open..].find("%29").map(|i| open + i)?;
  Some((marker_idx, open, close))
}

/// Rewrite then escape an impl anchor (§4.3 "Impl-anchor rewriting",
/// steps 1–3).
fn escape_anchor(anchor: &str) -> String {
  if anchor.is_empty() {
    return String::new();
  }
  let collapsed = collapse_to_last_bracketed_segment(anchor);
  let rewritten = rewrite_bracket_spans(&collapsed);
  escape_component(&rewritten)
}

/// Step 1: if the anchor has more than one bracketed span, reduce it to
/// its last `::`-segment and merge that segment's bracket contents into
/// a single `[...]` pair.
fn collapse_to_last_bracketed_segment(anchor: &str) -> String {
  if count_bracket_spans(anchor) <= 1 {
    return anchor.to_string();
  }

  let last_segment = anchor.rsplit("::").next().unwrap_or(anchor);
  let (text, contents) = extract_bracket_contents(last_segment);
  if contents.is_empty() {
    return last_segment.to_string();
  }
  format!("{}[{}]", text, contents.join(","))
}

fn count_bracket_spans(s: &str) -> usize {
  s.chars().filter(|&c| c == '[').count()
}

/// Split `segment` into (text with bracket spans removed, ordered list
/// of each span's inner contents).
fn extract_bracket_contents(segment: &str) -> (String, Vec<String>) {
  let mut text = String::with_capacity(segment.len());
  let mut contents = Vec::new();
  let mut depth = 0usize;
  let mut current = String::new();
  for c in segment.chars() {
    match c {
      '[' => {
        if depth == 0 {
          current.clear();
        }
        depth += 1;
      }
      ']' if depth > 0 => {
        depth -= 1;
        if depth == 0 {
          contents.push(std::mem::take(&mut current));
        }
      }
      _ if depth > 0 => current.push(c),
      _ => text.push(c),
    }
  }
  (text, contents)
}

/// Step 2: rewrite each remaining `[...]` span — colon-prefixing when the
/// contents mention `generic`, otherwise append-and-strip.
fn rewrite_bracket_spans(anchor: &str) -> String {
  let mut result = String::with_capacity(anchor.len());
  let mut depth = 0usize;
  let mut current = String::new();
  for c in anchor.chars() {
    match c {
      '[' => {
        if depth == 0 {
          current.clear();
        }
        depth += 1;
      }
      ']' if depth > 0 => {
        depth -= 1;
        if depth == 0 {
          if current.contains("generic") {
            result.push_str(&current.replace(':', "[]:"));
          } else {
            result.push_str(&current);
            result.push_str("[]");
          }
        }
      }
      _ if depth > 0 => current.push(c),
      _ => result.push(c),
    }
  }
  result
}

/// Step 3: percent-encode, then upgrade the two characters a plain
/// percent-encoder would otherwise leave untouched.
fn escape_component(s: &str) -> String {
  let encoded = utf8_percent_encode(s, COMPONENT_ESCAPE).to_string();
  encoded.replace(':', "%3A").replace('&', "%26")
}
