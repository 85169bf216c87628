//! Logging setup (§7 "Error handling design", ambient stack A.2): a
//! thin `env_logger` init plus the exact per-input/summary line shapes
//! the rest of the crate logs at `info`.

use std::time::Duration;

/// Initialize `env_logger` from `RUST_LOG`, defaulting to `info`.
pub fn init() {
  env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
}

/// "converted: <key> in <dt>" (§7).
pub fn log_converted(package_key: &str, elapsed: Duration) {
  log::info!("converted: {package_key} in {:.3?}", elapsed);
}

/// "failed to convert: <key>, ERROR: <msg>" (§7).
pub fn log_failed(package_key: &str, error: &dyn std::error::Error) {
  log::warn!("failed to convert: {package_key}, ERROR: {error}");
}

/// Final summary line: total count and wall time (§7).
pub fn log_summary(count: usize, elapsed: Duration) {
  log::info!("processed {count} call graphs in {:.3}s", elapsed.as_secs_f64());
}
