//! Plugin Discovery Error Handling
//!
//! Error taxonomy for discovery. Apart from a failure to list the root of a
//! direct directory scan, none of these escape a package traversal: they are
//! logged and the offending item is skipped.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type alias for discovery operations
pub type DiscoveryResult<T> = std::result::Result<T, DiscoveryError>;

/// A single loadable unit could not be loaded or evaluated
#[derive(Error, Debug, Clone, PartialEq)]
#[error("Failed to load module '{}': {cause}", .path.display())]
pub struct LoadFailure {
    pub path: PathBuf,
    pub cause: String,
}

impl LoadFailure {
    pub fn new(path: impl AsRef<Path>, cause: impl ToString) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            cause: cause.to_string(),
        }
    }
}

/// Error types for plugin discovery
#[derive(Error, Debug)]
pub enum DiscoveryError {
    /// Loadable unit failed; skipped
    #[error(transparent)]
    LoadFailure(#[from] LoadFailure),

    /// Package manifest missing or unparseable; triggers the fallback directory
    #[error("Manifest unavailable at '{}': {cause}", .path.display())]
    ManifestUnavailable { path: PathBuf, cause: String },

    /// A manifest-declared directory or file could not be processed; skipped
    #[error("Declared plugin path '{}' unavailable: {cause}", .path.display())]
    DeclaredPathUnavailable { path: PathBuf, cause: String },

    /// Directory listing failed; that branch contributes nothing
    #[error("Cannot list directory '{}': {source}", .path.display())]
    ListingUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Invalid discovery configuration
    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

impl DiscoveryError {
    pub(crate) fn listing(path: &Path, source: std::io::Error) -> Self {
        DiscoveryError::ListingUnavailable {
            path: path.to_path_buf(),
            source,
        }
    }
}

impl crate::core::error_handling::ContextualError for DiscoveryError {
    fn is_user_actionable(&self) -> bool {
        match self {
            DiscoveryError::Configuration { .. } => true, // User can fix config issues
            DiscoveryError::ListingUnavailable { .. } => true, // Usually a wrong path argument
            _ => false,
        }
    }

    fn user_message(&self) -> Option<&str> {
        match self {
            DiscoveryError::Configuration { message } => Some(message),
            DiscoveryError::ListingUnavailable { .. } => {
                Some("Plugin directory does not exist or cannot be read")
            }
            _ => None,
        }
    }
}
