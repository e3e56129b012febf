//! Package Manifest
//!
//! The subset of a package manifest that discovery consults: an optional
//! `plugins` object listing directories and files relative to the package root.

use crate::plugin::error::{DiscoveryError, DiscoveryResult};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Package manifest as far as plugin discovery is concerned
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PackageManifest {
    #[serde(default)]
    pub name: Option<String>,
    /// Explicit plugin locations; absent or `null` means the package opts out
    #[serde(default)]
    pub plugins: Option<PluginLocations>,
}

/// Plugin locations declared by a package
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PluginLocations {
    #[serde(default)]
    dirs: Option<Vec<PathBuf>>,
    #[serde(default)]
    files: Option<Vec<PathBuf>>,
}

impl PluginLocations {
    /// Declared directories, in manifest order
    pub fn dirs(&self) -> &[PathBuf] {
        self.dirs.as_deref().unwrap_or(&[])
    }

    /// Declared files, in manifest order
    pub fn files(&self) -> &[PathBuf] {
        self.files.as_deref().unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.dirs().is_empty() && self.files().is_empty()
    }
}

impl PackageManifest {
    pub fn from_json_str(content: &str) -> serde_json::Result<Self> {
        serde_json::from_str(content)
    }

    /// Read and parse the manifest at `path`
    ///
    /// Both a missing file and malformed content are `ManifestUnavailable`.
    pub async fn read(path: &Path) -> DiscoveryResult<Self> {
        let unavailable = |cause: String| DiscoveryError::ManifestUnavailable {
            path: path.to_path_buf(),
            cause,
        };

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| unavailable(e.to_string()))?;
        Self::from_json_str(&content).map_err(|e| unavailable(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_manifest_with_plugins() {
        let manifest = PackageManifest::from_json_str(
            r#"{
                "name": "exporters",
                "version": "1.2.0",
                "plugins": { "dirs": ["lib/a", "lib/b"], "files": ["extra.rs"] }
            }"#,
        )
        .unwrap();

        assert_eq!(manifest.name.as_deref(), Some("exporters"));
        let plugins = manifest.plugins.unwrap();
        assert_eq!(plugins.dirs(), &[PathBuf::from("lib/a"), PathBuf::from("lib/b")]);
        assert_eq!(plugins.files(), &[PathBuf::from("extra.rs")]);
    }

    #[test]
    fn test_manifest_without_plugins() {
        let manifest = PackageManifest::from_json_str(r#"{ "name": "plain" }"#).unwrap();
        assert!(manifest.plugins.is_none());

        let manifest = PackageManifest::from_json_str(r#"{ "plugins": null }"#).unwrap();
        assert!(manifest.plugins.is_none());
    }

    #[test]
    fn test_partial_plugin_locations() {
        let manifest =
            PackageManifest::from_json_str(r#"{ "plugins": { "files": ["one.rs"], "dirs": null } }"#)
                .unwrap();
        let plugins = manifest.plugins.unwrap();
        assert!(plugins.dirs().is_empty());
        assert_eq!(plugins.files().len(), 1);

        let manifest = PackageManifest::from_json_str(r#"{ "plugins": {} }"#).unwrap();
        assert!(manifest.plugins.unwrap().is_empty());
    }

    #[test]
    fn test_malformed_plugin_section_is_error() {
        assert!(PackageManifest::from_json_str(r#"{ "plugins": { "dirs": "lib" } }"#).is_err());
        assert!(PackageManifest::from_json_str("{ not json").is_err());
    }

    #[tokio::test]
    async fn test_read_missing_manifest() {
        let dir = TempDir::new().unwrap();
        let error = PackageManifest::read(&dir.path().join("package.json"))
            .await
            .unwrap_err();
        assert!(matches!(error, DiscoveryError::ManifestUnavailable { .. }));
    }

    #[tokio::test]
    async fn test_read_manifest_from_disk() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("package.json");
        std::fs::write(&path, r#"{ "name": "on-disk", "plugins": { "dirs": ["p"] } }"#).unwrap();

        let manifest = PackageManifest::read(&path).await.unwrap();
        assert_eq!(manifest.name.as_deref(), Some("on-disk"));
        assert_eq!(manifest.plugins.unwrap().dirs(), &[PathBuf::from("p")]);
    }
}
