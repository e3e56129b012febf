//! Discovery Settings
//!
//! Naming conventions and unit formats used during traversal. Every field has
//! a default, so an empty `[discovery]` table (or none at all) is valid.

use crate::plugin::error::{DiscoveryError, DiscoveryResult};
use crate::plugin::formats::ModuleFormats;
use serde::Deserialize;

/// Configuration for plugin discovery
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct DiscoveryConfig {
    /// Manifest file name at a package root
    pub manifest: String,
    /// Directory scanned in a package without manifest guidance
    pub fallback_dir: String,
    /// Installed-packages directory below a project
    pub packages_dir: String,
    /// Entries of the installed-packages directory starting with this are skipped
    pub hidden_prefix: String,
    /// Entries starting with this are namespaces holding further packages
    pub scope_prefix: String,
    /// Loadable unit formats
    pub formats: ModuleFormats,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            manifest: "package.json".to_string(),
            fallback_dir: "Plugins".to_string(),
            packages_dir: "node_modules".to_string(),
            hidden_prefix: ".".to_string(),
            scope_prefix: "@".to_string(),
            formats: ModuleFormats::default(),
        }
    }
}

impl DiscoveryConfig {
    /// Check values that would make traversal meaningless
    pub fn validate(&self) -> DiscoveryResult<()> {
        let required = [
            ("manifest", &self.manifest),
            ("fallback-dir", &self.fallback_dir),
            ("packages-dir", &self.packages_dir),
            ("hidden-prefix", &self.hidden_prefix),
            ("scope-prefix", &self.scope_prefix),
        ];
        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(DiscoveryError::Configuration {
                    message: format!("'{}' must not be empty", name),
                });
            }
        }

        let formats = &self.formats;
        if formats.artifacts.is_empty() && formats.sources.is_empty() {
            return Err(DiscoveryError::Configuration {
                message: "at least one artifact or source suffix is required".to_string(),
            });
        }
        if let Some(suffix) = formats
            .artifacts
            .iter()
            .chain(&formats.sources)
            .chain(&formats.declarations)
            .find(|suffix| suffix.is_empty())
        {
            return Err(DiscoveryError::Configuration {
                message: format!("empty unit suffix '{}' is not allowed", suffix),
            });
        }
        Ok(())
    }

    /// Parse a `[discovery]`-style TOML table body
    pub fn from_toml_str(content: &str) -> DiscoveryResult<Self> {
        let config: Self = toml::from_str(content).map_err(|e| DiscoveryError::Configuration {
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }
}
