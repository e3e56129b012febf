//! Public API for plugin discovery
//!
//! Hosts and plugin authors should import from here rather than from the
//! internal modules.

// Extension points and registration
pub use crate::plugin::key::ExtensionPoint;
pub use crate::plugin::ledger::{sync_static_registrations, LedgerEntries, RegistrationLedger};

// Plugin data model
pub use crate::plugin::types::{
    Export, ModuleExports, PluginData, PluginDefinition, PluginFactory, PluginType, PluginValue,
};

// Registry and queries
pub use crate::plugin::registry::{PluginRegistry, PluginSource};

// Object scanning
pub use crate::plugin::scan::{absorb, absorb_module};

// Unit resolution
pub use crate::plugin::builtin::catalog::{builtin_module_names, CatalogResolver};
pub use crate::plugin::external::library::{LibraryResolver, MODULE_ENTRY_SYMBOL};
pub use crate::plugin::formats::{ModuleFormats, UnitKind};
pub use crate::plugin::resolver::{StandardResolver, UnitResolver};

// Discovery and traversal
pub use crate::plugin::discovery::{list_files, PluginDiscovery};
pub use crate::plugin::manifest::{PackageManifest, PluginLocations};
pub use crate::plugin::settings::DiscoveryConfig;

// Error handling
pub use crate::plugin::error::{DiscoveryError, DiscoveryResult, LoadFailure};
