//! Plugin Discovery Module
//!
//! Locates plugin code on disk, loads it, and collects the types that opted
//! into extension points into a queryable registry.

// Modules referenced by the exported macros must stay reachable from other crates
pub mod builtin;
pub mod external;
pub mod key;
pub mod ledger;
pub mod types;

pub(crate) mod discovery;
pub(crate) mod error;
pub(crate) mod formats;
pub(crate) mod manifest;
pub(crate) mod packages;
pub(crate) mod registry;
pub(crate) mod resolver;
pub(crate) mod scan;
pub(crate) mod settings;

// Public API module - the supported interface for hosts and plugin authors
pub mod api;

#[cfg(test)]
mod tests;
