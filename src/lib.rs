//! plugscout: plugin discovery for directories and installed packages
//!
//! Plugin code lives in loadable units on disk. Discovery walks plugin
//! directories and package trees, loads the selected units, and collects every
//! type that registered itself for an extension point into a
//! [`PluginRegistry`](plugin::api::PluginRegistry).
//!
//! ```rust,ignore
//! use plugscout::plugin::api::*;
//!
//! plugscout::extension_point! {
//!     pub static EXPORTERS = "exporters";
//! }
//!
//! #[derive(Debug, Default)]
//! pub struct CsvExporter;
//! plugscout::plugin_setup!(CsvExporter, EXPORTERS, "csv");
//!
//! let mut discovery = PluginDiscovery::default();
//! discovery.scan_project(".").await;
//! for definition in discovery.get_plugins(&EXPORTERS) {
//!     println!("{}", definition.plugin_type().name());
//! }
//! ```

pub mod app;
pub mod core;
pub mod plugin;

// Used by the exported macros
#[doc(hidden)]
pub use inventory;
#[doc(hidden)]
pub use once_cell;
