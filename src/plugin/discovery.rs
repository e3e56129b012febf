//! Plugin Discovery
//!
//! The discovery engine owns a [`PluginRegistry`] and fills it by walking
//! plugin locations. Data flows one way: package traversal picks directories,
//! the directory scanner picks one representation per logical module, the
//! resolver loads it, and the object scanner moves ledger entries into the
//! registry.
//!
//! Filesystem access goes through `tokio::fs`, so every read is a suspension
//! point, but scan steps run one after another and in a deterministic order:
//! directory entries sorted by name, subdirectories descended depth-first.

use crate::plugin::error::{DiscoveryError, DiscoveryResult};
use crate::plugin::key::ExtensionPoint;
use crate::plugin::ledger::{sync_static_registrations, RegistrationLedger};
use crate::plugin::registry::{PluginRegistry, PluginSource};
use crate::plugin::resolver::{StandardResolver, UnitResolver};
use crate::plugin::scan;
use crate::plugin::settings::DiscoveryConfig;
use crate::plugin::types::{ModuleExports, PluginData, PluginDefinition, PluginType};
use futures::future::{BoxFuture, FutureExt};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Plugin discovery engine
pub struct PluginDiscovery<R = StandardResolver> {
    pub(crate) config: DiscoveryConfig,
    pub(crate) resolver: R,
    ledger: Arc<RegistrationLedger>,
    registry: PluginRegistry,
}

impl PluginDiscovery<StandardResolver> {
    /// Engine with the default resolver for `config`'s unit formats
    pub fn with_config(config: DiscoveryConfig) -> Self {
        let resolver = StandardResolver::new(config.formats.clone());
        Self::with_resolver(config, resolver)
    }
}

impl Default for PluginDiscovery<StandardResolver> {
    fn default() -> Self {
        Self::with_config(DiscoveryConfig::default())
    }
}

impl<R: UnitResolver> PluginDiscovery<R> {
    /// Engine using the process-wide ledger and an injected resolver
    pub fn with_resolver(config: DiscoveryConfig, resolver: R) -> Self {
        Self {
            config,
            resolver,
            ledger: RegistrationLedger::global(),
            registry: PluginRegistry::new(),
        }
    }

    /// Read registrations from `ledger` instead of the process-wide one
    pub fn with_ledger(mut self, ledger: Arc<RegistrationLedger>) -> Self {
        self.ledger = ledger;
        self
    }

    pub fn config(&self) -> &DiscoveryConfig {
        &self.config
    }

    pub fn ledger(&self) -> &Arc<RegistrationLedger> {
        &self.ledger
    }

    pub fn registry(&self) -> &PluginRegistry {
        &self.registry
    }

    /// Hand the populated registry to the caller
    pub fn into_registry(self) -> PluginRegistry {
        self.registry
    }

    /// Record a definition directly, bypassing ledgers
    pub fn add(&mut self, key: ExtensionPoint, plugin_type: PluginType, data: PluginData) {
        self.registry.add(key, plugin_type, data);
    }

    /// Absorb the registrations of one candidate type
    pub fn scan(&mut self, candidate: &PluginType) -> usize {
        scan::absorb(&mut self.registry, &self.ledger, candidate)
    }

    /// Absorb every candidate type of a loaded unit's exports
    pub fn scan_module(&mut self, exports: &ModuleExports) -> usize {
        sync_static_registrations();
        scan::absorb_module(&mut self.registry, &self.ledger, exports)
    }

    /// Definitions registered for `key`, in discovery order
    pub fn get_plugins(&self, key: &ExtensionPoint) -> &[PluginDefinition] {
        self.registry.get_plugins(key)
    }

    /// Forget all discovered definitions; ledgers are left intact
    pub fn clear(&mut self) {
        self.registry.clear();
    }

    /// Scan every loadable unit below `directory`
    ///
    /// Fails only if `directory` itself cannot be listed. Units that fail to
    /// load and unreadable subdirectories are logged and skipped.
    pub async fn scan_directory(&mut self, directory: impl AsRef<Path>) -> DiscoveryResult<()> {
        let directory = directory.as_ref();
        log::debug!("Scanning plugin directory {}", directory.display());

        let files = list_files(directory).await?;
        let selected = self.config.formats.select(&files);
        log::debug!(
            "Selected {} of {} files in {}",
            selected.len(),
            files.len(),
            directory.display()
        );

        for path in &selected {
            self.load_unit(path);
        }
        Ok(())
    }

    /// Load one unit and absorb its exports; a failure is logged, not returned
    pub(crate) fn load_unit(&mut self, path: &Path) -> bool {
        match self.resolver.load(path) {
            Ok(exports) => {
                let added = self.scan_module(&exports);
                log::debug!("{}: {} plugin definitions", path.display(), added);
                true
            }
            Err(failure) => {
                log::error!("{}", failure);
                false
            }
        }
    }
}

impl<R: UnitResolver> PluginSource for PluginDiscovery<R> {
    fn get_plugins(&self, key: &ExtensionPoint) -> &[PluginDefinition] {
        self.registry.get_plugins(key)
    }
}

/// Recursively list every file below `root`
///
/// Entries are visited in name order, directories depth-first. Symlinked
/// directories are followed once; a directory already visited in this listing
/// is skipped.
pub async fn list_files(root: &Path) -> DiscoveryResult<Vec<PathBuf>> {
    let entries = read_sorted(root)
        .await
        .map_err(|e| DiscoveryError::listing(root, e))?;

    let mut visited = HashSet::new();
    visited.insert(canonical(root).await);

    let mut files = Vec::new();
    collect_files(entries, &mut visited, &mut files).await;
    Ok(files)
}

fn collect_files<'a>(
    entries: Vec<PathBuf>,
    visited: &'a mut HashSet<PathBuf>,
    files: &'a mut Vec<PathBuf>,
) -> BoxFuture<'a, ()> {
    async move {
        for entry in entries {
            let metadata = match tokio::fs::metadata(&entry).await {
                Ok(metadata) => metadata,
                Err(e) => {
                    log::warn!("Skipping {}: {}", entry.display(), e);
                    continue;
                }
            };

            if metadata.is_dir() {
                let identity = canonical(&entry).await;
                if !visited.insert(identity) {
                    log::debug!("Skipping already visited directory {}", entry.display());
                    continue;
                }
                match read_sorted(&entry).await {
                    Ok(children) => collect_files(children, visited, files).await,
                    Err(e) => log::warn!("{}", DiscoveryError::listing(&entry, e)),
                }
            } else if metadata.is_file() {
                files.push(entry);
            }
        }
    }
    .boxed()
}

/// Immediate entries of `directory`, sorted by name
pub(crate) async fn read_sorted(directory: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut reader = tokio::fs::read_dir(directory).await?;
    let mut entries = Vec::new();
    while let Some(entry) = reader.next_entry().await? {
        entries.push(entry.path());
    }
    entries.sort();
    Ok(entries)
}

async fn canonical(path: &Path) -> PathBuf {
    tokio::fs::canonicalize(path)
        .await
        .unwrap_or_else(|_| path.to_path_buf())
}
