//! Timestamp collaborator (§6 "Timestamp collaborator"): after `convert`
//! returns a non-empty graph, look up its release timestamp on crates.io
//! and stamp it onto the graph. Any failure leaves `timestamp` at -1.

use chrono::DateTime;
use serde::Deserialize;

const UNRESOLVED: i64 = -1;

#[derive(Debug, Deserialize)]
struct CrateVersionResponse {
  version: CrateVersion,
}

#[derive(Debug, Deserialize)]
struct CrateVersion {
  created_at: String,
}

/// Fetch `product`'s `version` release timestamp from crates.io, in
/// epoch seconds. Returns `-1` on any network, decode, or parse failure
/// — the timestamp is best-effort and never fails the batch.
pub fn lookup(product: &str, version: &str) -> i64 {
  fetch(product, version).unwrap_or(UNRESOLVED)
}

fn fetch(product: &str, version: &str) -> Option<i64> {
  let url = format!("https://crates.io/api/v1/crates/{product}/{version}");
  let body: CrateVersionResponse = ureq::get(&url).call().ok()?.body_mut().read_json().ok()?;
  let parsed = DateTime::parse_from_rfc3339(&body.version.created_at).ok()?;
  Some(parsed.timestamp())
}
