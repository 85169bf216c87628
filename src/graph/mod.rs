//! Graph Builder (§4.4): two-pass conversion from one input's raw call
//! graph into the normalized per-crate `PackageGraph`.

pub mod builder;
