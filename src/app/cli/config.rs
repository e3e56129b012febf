//! TOML configuration file loading
//!
//! The file has a `[discovery]` table (naming conventions and unit formats)
//! and a `[logging]` table. Both are optional and every key has a default.

use crate::core::error_handling::ContextualError;
use crate::plugin::api::DiscoveryConfig;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::args::Args;

/// Configuration loading failures; all of them are for the user to fix
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("The specified configuration file does not exist: {}", .path.display())]
    Missing { path: PathBuf },

    #[error("Error reading configuration file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Error in configuration file {}: {message}", .path.display())]
    Invalid { path: PathBuf, message: String },
}

impl ContextualError for ConfigError {
    fn is_user_actionable(&self) -> bool {
        true
    }

    fn user_message(&self) -> Option<&str> {
        match self {
            ConfigError::Missing { .. } => Some("Configuration file not found"),
            ConfigError::Read { .. } => Some("Configuration file cannot be read"),
            ConfigError::Invalid { message, .. } => Some(message),
        }
    }
}

/// Logging options from the `[logging]` table
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct LoggingSettings {
    pub level: Option<String>,
    pub format: Option<String>,
    pub file: Option<PathBuf>,
    pub color: Option<bool>,
}

/// Contents of the configuration file
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Settings {
    pub discovery: DiscoveryConfig,
    pub logging: LoggingSettings,
}

impl Settings {
    /// `<config dir>/Plugscout/plugscout.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("Plugscout").join("plugscout.toml"))
    }

    /// Load settings from `config_file`, or from the default location
    ///
    /// An explicit file must exist; a missing default file yields defaults.
    pub async fn load(config_file: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match config_file {
            Some(path) if !path.exists() => {
                return Err(ConfigError::Missing {
                    path: path.to_path_buf(),
                })
            }
            Some(path) => path.to_path_buf(),
            None => match Self::default_path() {
                Some(path) if path.exists() => path,
                _ => {
                    log::debug!("No configuration file, using defaults");
                    return Ok(Self::default());
                }
            },
        };

        let contents = tokio::fs::read_to_string(&path)
            .await
            .map_err(|source| ConfigError::Read {
                path: path.clone(),
                source,
            })?;
        let settings = Self::from_toml_str(&contents).map_err(|message| ConfigError::Invalid {
            path: path.clone(),
            message,
        })?;
        log::debug!("Loaded configuration from {}", path.display());
        Ok(settings)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, String> {
        let settings: Self = toml::from_str(contents).map_err(|e| e.to_string())?;
        settings.discovery.validate().map_err(|e| e.to_string())?;
        Ok(settings)
    }

    /// Let command-line logging flags override file values
    pub fn apply_args(&mut self, args: &Args) {
        let logging = &mut self.logging;
        if let Some(level) = &args.log_level {
            logging.level = Some(level.clone());
        }
        if let Some(format) = &args.log_format {
            logging.format = Some(format.clone());
        }
        if let Some(file) = &args.log_file {
            logging.file = Some(file.clone());
        }
        if let Some(color) = args.color_override() {
            logging.color = Some(color);
        }

        // Magic values "none" and "-" disable file logging
        if let Some(file) = &logging.file {
            if file.as_os_str().eq_ignore_ascii_case("none") || file.as_os_str() == "-" {
                logging.file = None;
            }
        }
    }

    /// Colour on when forced, otherwise when stdout is a terminal
    pub fn use_color(&self) -> bool {
        self.logging
            .color
            .unwrap_or_else(|| std::io::IsTerminal::is_terminal(&std::io::stdout()))
    }
}
