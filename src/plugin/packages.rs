//! Package Traversal
//!
//! Walks package roots and installed-package directories. A package opts in
//! through the `plugins` section of its manifest; a package without a readable
//! manifest is scanned at its conventional fallback directory. Nothing in
//! here fails the overall traversal: every broken package, declared path or
//! listing is logged and skipped.

use crate::plugin::discovery::{read_sorted, PluginDiscovery};
use crate::plugin::error::DiscoveryError;
use crate::plugin::manifest::{PackageManifest, PluginLocations};
use crate::plugin::resolver::UnitResolver;
use std::path::{Path, PathBuf};

impl<R: UnitResolver> PluginDiscovery<R> {
    /// Scan one package root
    ///
    /// - manifest with a `plugins` section: declared directories, then declared
    ///   files, each in manifest order
    /// - manifest without one: nothing (packages opt in explicitly)
    /// - manifest missing or unparseable: the fallback directory, if present
    pub async fn scan_project(&mut self, package_dir: impl AsRef<Path>) {
        let package_dir = package_dir.as_ref();
        let manifest_path = package_dir.join(&self.config.manifest);

        match PackageManifest::read(&manifest_path).await {
            Ok(PackageManifest {
                plugins: Some(locations),
                ..
            }) => self.scan_declared(package_dir, &locations).await,
            Ok(manifest) => log::debug!(
                "Package {} ({}) declares no plugins",
                package_dir.display(),
                manifest.name.as_deref().unwrap_or("unnamed")
            ),
            Err(e) => {
                log::debug!("{}; using fallback directory", e);
                let fallback = package_dir.join(&self.config.fallback_dir);
                if let Err(e) = self.scan_directory(&fallback).await {
                    log::debug!("No fallback plugins for {}: {}", package_dir.display(), e);
                }
            }
        }
    }

    async fn scan_declared(&mut self, package_dir: &Path, locations: &PluginLocations) {
        for dir in locations.dirs() {
            let path = package_dir.join(dir);
            if let Err(e) = self.scan_directory(&path).await {
                log::warn!(
                    "{}",
                    DiscoveryError::DeclaredPathUnavailable {
                        path,
                        cause: e.to_string(),
                    }
                );
            }
        }

        for file in locations.files() {
            let path = package_dir.join(file);
            match tokio::fs::metadata(&path).await {
                Ok(metadata) if metadata.is_file() => {
                    self.load_unit(&path);
                }
                Ok(_) => log::warn!(
                    "{}",
                    DiscoveryError::DeclaredPathUnavailable {
                        path,
                        cause: "not a file".to_string(),
                    }
                ),
                Err(e) => log::warn!(
                    "{}",
                    DiscoveryError::DeclaredPathUnavailable {
                        path,
                        cause: e.to_string(),
                    }
                ),
            }
        }
    }

    /// Scan every package of an installed-packages directory
    ///
    /// Hidden entries are skipped; namespace entries are expanded one level and
    /// each of their entries is a package. Unreadable listings contribute no
    /// packages.
    pub async fn scan_node_modules(&mut self, install_root: impl AsRef<Path>) {
        let install_root = install_root.as_ref();
        let packages = self.installed_packages(install_root).await;
        log::debug!(
            "Found {} packages in {}",
            packages.len(),
            install_root.display()
        );

        for package in packages {
            self.scan_project(&package).await;
        }
    }

    /// Scan the installed-packages directory of a project
    pub async fn scan_project_dependencies(&mut self, project_dir: impl AsRef<Path>) {
        let install_root = project_dir.as_ref().join(&self.config.packages_dir);
        self.scan_node_modules(install_root).await;
    }

    /// Package directories below `install_root`, in traversal order
    pub async fn installed_packages(&self, install_root: &Path) -> Vec<PathBuf> {
        let entries = match read_sorted(install_root).await {
            Ok(entries) => entries,
            Err(e) => {
                log::debug!("{}", DiscoveryError::listing(install_root, e));
                return Vec::new();
            }
        };

        let mut packages = Vec::new();
        for entry in entries {
            let Some(name) = entry.file_name().and_then(|name| name.to_str()) else {
                continue;
            };
            if name.starts_with(self.config.hidden_prefix.as_str()) {
                continue;
            }

            if name.starts_with(self.config.scope_prefix.as_str()) {
                match read_sorted(&entry).await {
                    Ok(scoped) => {
                        for package in scoped {
                            if is_directory(&package).await {
                                packages.push(package);
                            }
                        }
                    }
                    Err(e) => log::debug!("{}", DiscoveryError::listing(&entry, e)),
                }
            } else if is_directory(&entry).await {
                packages.push(entry);
            }
        }
        packages
    }
}

async fn is_directory(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .map(|metadata| metadata.is_dir())
        .unwrap_or(false)
}
