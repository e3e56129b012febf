//! Plugin Test Utilities
//!
//! A recording resolver and filesystem fixture helpers shared by the suites.

use crate::plugin::discovery::PluginDiscovery;
use crate::plugin::error::LoadFailure;
use crate::plugin::key::ExtensionPoint;
use crate::plugin::ledger::RegistrationLedger;
use crate::plugin::resolver::UnitResolver;
use crate::plugin::settings::DiscoveryConfig;
use crate::plugin::types::ModuleExports;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Resolver serving export tables by file name and recording every load
///
/// Files without a registered table fail to load.
#[derive(Clone, Default)]
pub struct RecordingResolver {
    modules: HashMap<String, ModuleExports>,
    loaded: Arc<Mutex<Vec<PathBuf>>>,
}

impl RecordingResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_module(mut self, file_name: &str, exports: ModuleExports) -> Self {
        self.modules.insert(file_name.to_string(), exports);
        self
    }

    /// Paths handed to the resolver, in call order
    pub fn loaded(&self) -> Vec<PathBuf> {
        self.loaded.lock().unwrap().clone()
    }

    /// File names handed to the resolver, in call order
    pub fn loaded_names(&self) -> Vec<String> {
        self.loaded()
            .iter()
            .filter_map(|path| path.file_name())
            .map(|name| name.to_string_lossy().into_owned())
            .collect()
    }
}

impl UnitResolver for RecordingResolver {
    fn load(&self, path: &Path) -> Result<ModuleExports, LoadFailure> {
        self.loaded.lock().unwrap().push(path.to_path_buf());

        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.modules
            .get(&name)
            .cloned()
            .ok_or_else(|| LoadFailure::new(path, "unexpected token at line 1"))
    }
}

/// Discovery engine over an isolated ledger
pub fn isolated_discovery(
    resolver: RecordingResolver,
) -> (PluginDiscovery<RecordingResolver>, Arc<RegistrationLedger>) {
    let ledger = Arc::new(RegistrationLedger::new());
    let discovery = PluginDiscovery::with_resolver(DiscoveryConfig::default(), resolver)
        .with_ledger(Arc::clone(&ledger));
    (discovery, ledger)
}

/// Create empty files (and their parent directories) below `root`
pub fn touch(root: &Path, files: &[&str]) {
    for file in files {
        let path = root.join(file);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&path, "").unwrap();
    }
}

/// Write a package manifest at `package_dir`
pub fn write_manifest(package_dir: &Path, content: &str) {
    std::fs::create_dir_all(package_dir).unwrap();
    std::fs::write(package_dir.join("package.json"), content).unwrap();
}

/// Short type names of the definitions registered for `key`, in order
pub fn plugin_names<R: UnitResolver>(
    discovery: &PluginDiscovery<R>,
    key: &ExtensionPoint,
) -> Vec<&'static str> {
    discovery
        .get_plugins(key)
        .iter()
        .map(|definition| definition.plugin_type().short_name())
        .collect()
}
