//! Test modules for plugin discovery
//!
//! Filesystem-backed suites for the directory scanner and package traversal,
//! driven through an in-memory resolver.

mod utils;
