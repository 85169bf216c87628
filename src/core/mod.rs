//! Core conversion engine.
//!
//! - **error**: `ConvertError`/`ConvertResult`, matching §7's propagation
//!   policy (only `PathParse` surfaces from the core; everything else is
//!   a collaborator-side variant).
//! - **model**: raw input types (`RawCallGraph`, `Node`, `RawTypeHierarchy`,
//!   `Type`, `Trait`, `Impl`) deserialized from a leaf's two JSON files.
//! - **wire**: output types (`PackageGraph`, `ChaEntry`, `Dependency`,
//!   `CallGraphBody`) serialized to the target FASTEN document.
//! - **convert**: the per-input entry point gluing decode → Graph Builder.

pub mod convert;
pub mod error;
pub mod model;
pub mod wire;
