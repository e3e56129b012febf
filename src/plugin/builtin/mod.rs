//! Compiled-In Plugin Modules
//!
//! Modules linked into the host binary and resolved by name.

pub mod catalog;
