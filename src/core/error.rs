//! Error types for rust-callgraphs with contextual messages.
//!
//! The core (parser, type-hierarchy index, formatter, graph builder) only
//! ever returns [`ConvertError::PathParse`] — every other failure mode
//! degrades to a sentinel value inside the core instead of propagating.
//! The other variants exist for the thin collaborators (directory walk,
//! sinks, timestamp lookup) that wrap the core per input.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Main error type for rust-callgraphs.
#[derive(Debug)]
pub enum ConvertError {
  /// A relative def id had fewer than two `::`-segments (§4.1 Edge cases).
  PathParse { relative_def_id: String },

  /// Failure reading or walking the input directory tree.
  Io(io::Error),

  /// Failure decoding a `callgraph.json` / `type_hierarchy.json` payload.
  Decode { path: PathBuf, message: String },

  /// Failure publishing a document to the message broker.
  Emit { package_key: String, message: String },

  /// Failure writing a document to the filesystem sink.
  Write { path: PathBuf, message: String },

  /// Generic error with context, for collaborator glue code.
  Other(anyhow::Error),
}

impl fmt::Display for ConvertError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ConvertError::PathParse { relative_def_id } => {
        write!(f, "relative def id has fewer than two '::' segments: {}", relative_def_id)
      }
      ConvertError::Io(e) => write!(f, "I/O error: {}", e),
      ConvertError::Decode { path, message } => {
        write!(f, "failed to decode {}: {}", path.display(), message)
      }
      ConvertError::Emit { package_key, message } => {
        write!(f, "failed to publish {}: {}", package_key, message)
      }
      ConvertError::Write { path, message } => {
        write!(f, "failed to write {}: {}", path.display(), message)
      }
      ConvertError::Other(e) => write!(f, "{}", e),
    }
  }
}

impl std::error::Error for ConvertError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      ConvertError::Io(e) => Some(e),
      ConvertError::Other(e) => e.source(),
      _ => None,
    }
  }
}

impl From<io::Error> for ConvertError {
  fn from(err: io::Error) -> Self {
    ConvertError::Io(err)
  }
}

impl From<anyhow::Error> for ConvertError {
  fn from(err: anyhow::Error) -> Self {
    ConvertError::Other(err)
  }
}

/// Result type alias for rust-callgraphs.
pub type ConvertResult<T> = Result<T, ConvertError>;
