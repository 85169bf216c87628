mod core;
mod formatter;
mod graph;
mod io;
mod logging;
mod parser;
mod sink;
mod timestamp;
mod typehierarchy;

use clap::Parser;
use core::error::ConvertResult;
use core::model::RawTypeHierarchy;
use core::wire::PackageGraph;
use io::InputLeaf;
use rayon::prelude::*;
use sink::{BrokerSink, FilesystemSink, Sink};
use std::path::PathBuf;
use std::time::Instant;
use typehierarchy::TypeHierarchyIndex;

/// Sentinel shared by `-t`/`-o` to disable their sink (§6).
const NO_VALUE_PROVIDED: &str = "[no-value-provided]";

/// Fixed load path for the standard-library type hierarchy (§6).
const STD_TYPE_HIERARCHY_PATH: &str = "src/typehierarchy/standardlibrary/type_hierarchy.json";

/// Convert per-package Rust static-analyzer call graphs into normalized
/// cross-package FASTEN call graphs.
#[derive(Parser)]
#[command(name = "rust-callgraphs")]
#[command(version, about, long_about = None)]
#[command(styles = get_styles())]
struct CliArgs {
  /// Message broker address
  #[arg(short = 'b', default_value = "localhost:9092")]
  broker: String,

  /// Publish topic; `[no-value-provided]` disables the broker sink
  #[arg(short = 't', default_value = NO_VALUE_PROVIDED)]
  topic: String,

  /// Input directory containing per-package subdirectories
  #[arg(short = 'i', default_value = ".")]
  input: PathBuf,

  /// Output directory; `[no-value-provided]` disables the filesystem sink
  #[arg(short = 'o', default_value = NO_VALUE_PROVIDED)]
  output: String,

  /// Worker pool size
  #[arg(long, default_value_t = 1)]
  threads: usize,
}

fn get_styles() -> clap::builder::Styles {
  clap::builder::Styles::styled()
    .usage(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .header(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .literal(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))))
    .invalid(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .error(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .valid(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))),
    )
    .placeholder(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::White))))
}

fn main() {
  logging::init();
  let args = CliArgs::parse();

  // §6: exit code is always 0 — per-input failures are logged, never fatal,
  // and a startup collaborator failure (bad std hierarchy, bad broker
  // address) degrades the same way rather than aborting the batch.
  if let Err(err) = run(&args) {
    log::error!("{err}");
  }
}

fn run(args: &CliArgs) -> ConvertResult<()> {
  let std_hierarchy = load_std_hierarchy();
  let leaves = io::discover(&args.input)?;

  let filesystem_sink = (args.output != NO_VALUE_PROVIDED).then(|| FilesystemSink::new(args.output.clone()));
  let broker_sink = (args.topic != NO_VALUE_PROVIDED)
    .then(|| BrokerSink::new(&args.broker, args.topic.clone()))
    .transpose()?;

  let pool = rayon::ThreadPoolBuilder::new()
    .num_threads(args.threads.max(1))
    .build()
    .map_err(|err| anyhow::anyhow!("failed to build worker pool: {err}"))?;

  let start = Instant::now();
  let processed = pool.install(|| {
    leaves
      .par_iter()
      .filter(|leaf| convert_and_emit(leaf, &std_hierarchy, filesystem_sink.as_ref(), broker_sink.as_ref()))
      .count()
  });

  logging::log_summary(processed, start.elapsed());
  Ok(())
}

/// Convert and emit one input leaf, logging its outcome (§7). Returns
/// `true` on success so the caller can count the batch total.
fn convert_and_emit(
  leaf: &InputLeaf,
  std_hierarchy: &TypeHierarchyIndex,
  filesystem_sink: Option<&FilesystemSink>,
  broker_sink: Option<&BrokerSink>,
) -> bool {
  let start = Instant::now();

  // A malformed id can panic inside the Path Parser (§4.4/§5); that
  // failure is caught here, at the per-input worker boundary, not inside
  // the Graph Builder.
  let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| core::convert::run(leaf, std_hierarchy)));

  let result = match outcome {
    Ok(Ok(mut graph)) => {
      if graph.is_empty() {
        Ok(())
      } else {
        graph.timestamp = timestamp::lookup(&graph.product, &graph.version);
        emit(leaf, &graph, filesystem_sink, broker_sink)
      }
    }
    Ok(Err(err)) => Err(err),
    Err(panic) => Err(core::error::ConvertError::Other(anyhow::anyhow!("panic: {}", panic_message(&panic)))),
  };

  match result {
    Ok(()) => {
      logging::log_converted(&leaf.package_key, start.elapsed());
      true
    }
    Err(err) => {
      logging::log_failed(&leaf.package_key, &err);
      false
    }
  }
}

fn emit(
  leaf: &InputLeaf,
  graph: &PackageGraph,
  filesystem_sink: Option<&FilesystemSink>,
  broker_sink: Option<&BrokerSink>,
) -> ConvertResult<()> {
  if let Some(sink) = filesystem_sink {
    sink.emit(&leaf.package_key, graph)?;
  }
  if let Some(sink) = broker_sink {
    sink.emit(&leaf.package_key, graph)?;
  }
  Ok(())
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
  if let Some(message) = payload.downcast_ref::<&str>() {
    message.to_string()
  } else if let Some(message) = payload.downcast_ref::<String>() {
    message.clone()
  } else {
    "unknown panic".to_string()
  }
}

fn load_std_hierarchy() -> TypeHierarchyIndex {
  let raw = std::fs::read_to_string(STD_TYPE_HIERARCHY_PATH)
    .map_err(|err| err.to_string())
    .and_then(|contents| serde_json::from_str::<RawTypeHierarchy>(&contents).map_err(|err| err.to_string()));

  match raw {
    Ok(raw) => TypeHierarchyIndex::build(&raw),
    Err(message) => {
      log::warn!("failed to load standard library type hierarchy from {STD_TYPE_HIERARCHY_PATH}: {message}");
      TypeHierarchyIndex::build(&RawTypeHierarchy::default())
    }
  }
}
