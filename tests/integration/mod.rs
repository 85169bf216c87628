//! Integration test entry point: runs the built `rust-callgraphs` binary
//! end-to-end against scratch input trees (§6 "Input directory layout").

mod support;
mod test_scenarios;
