//! Loadable Unit Formats
//!
//! Classifies files as build artifacts, sources or declaration-only files and
//! decides which single representation of each logical module gets loaded.
//! A logical module is the file path with its format suffix removed (and, for
//! artifacts, the platform library prefix dropped from the file name), so
//! `Plugins/libexporter.so` and `Plugins/exporter.rs` are the same module.
//! An artifact also answers to its unstripped stem, so `libexporter.rs` is
//! shadowed by `libexporter.so` as well.

use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// How a file participates in discovery
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitKind {
    /// Compiled form; always loaded
    Artifact,
    /// Source form; loaded only without a sibling artifact
    Source,
    /// Signature-only file; never loaded
    Declaration,
}

/// Suffix rules for loadable units
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ModuleFormats {
    /// Build-artifact suffixes
    pub artifacts: Vec<String>,
    /// Source suffixes
    pub sources: Vec<String>,
    /// Declaration-only suffixes, checked before everything else
    pub declarations: Vec<String>,
    /// File-name prefix stripped from artifacts when computing module identity
    pub library_prefix: String,
}

impl Default for ModuleFormats {
    fn default() -> Self {
        Self {
            artifacts: vec![".so".into(), ".dylib".into(), ".dll".into()],
            sources: vec![".rs".into()],
            declarations: vec![".d".into(), ".rmeta".into()],
            library_prefix: std::env::consts::DLL_PREFIX.to_string(),
        }
    }
}

impl ModuleFormats {
    /// Classify `path` by its file name, returning the kind and matched suffix
    pub fn classify<'a>(&'a self, path: &Path) -> Option<(UnitKind, &'a str)> {
        let file_name = path.file_name()?.to_str()?;

        [
            (UnitKind::Declaration, &self.declarations),
            (UnitKind::Artifact, &self.artifacts),
            (UnitKind::Source, &self.sources),
        ]
        .into_iter()
        .find_map(|(kind, suffixes)| {
            longest_suffix(file_name, suffixes).map(|suffix| (kind, suffix))
        })
    }

    /// Bare logical module name of `path` (no directory, suffix or library prefix)
    pub fn module_name(&self, path: &Path) -> Option<String> {
        let (kind, suffix) = self.classify(path)?;
        let file_name = path.file_name()?.to_str()?;
        let stem = &file_name[..file_name.len() - suffix.len()];

        let stem = match kind {
            UnitKind::Artifact if !self.library_prefix.is_empty() => stem
                .strip_prefix(self.library_prefix.as_str())
                .filter(|rest| !rest.is_empty())
                .unwrap_or(stem),
            _ => stem,
        };
        Some(stem.to_string())
    }

    /// Logical module identity: directory plus module name
    pub fn module_identity(&self, path: &Path) -> Option<PathBuf> {
        let name = self.module_name(path)?;
        Some(match path.parent() {
            Some(parent) => parent.join(name),
            None => PathBuf::from(name),
        })
    }

    /// Identities an artifact answers to: its bare stem and its prefix-stripped name
    pub fn artifact_identities(&self, path: &Path) -> Vec<PathBuf> {
        let Some((UnitKind::Artifact, suffix)) = self.classify(path) else {
            return Vec::new();
        };
        let Some(file_name) = path.file_name().and_then(|name| name.to_str()) else {
            return Vec::new();
        };
        let stem = &file_name[..file_name.len() - suffix.len()];

        let mut identities = vec![path.with_file_name(stem)];
        if let Some(identity) = self.module_identity(path) {
            if !identities.contains(&identity) {
                identities.push(identity);
            }
        }
        identities
    }

    pub fn is_artifact(&self, path: &Path) -> bool {
        matches!(self.classify(path), Some((UnitKind::Artifact, _)))
    }

    /// Choose the files to load, keeping listing order
    ///
    /// Every artifact is chosen. A source is chosen only if no artifact shares
    /// its identity, with or without the library prefix, and only the first
    /// such source per identity. Declarations and unrecognised files are never
    /// chosen.
    pub fn select(&self, files: &[PathBuf]) -> Vec<PathBuf> {
        let built: HashSet<PathBuf> = files
            .iter()
            .flat_map(|path| self.artifact_identities(path))
            .collect();

        let mut sourced = HashSet::new();
        let mut selected = Vec::new();
        for path in files {
            match self.classify(path) {
                Some((UnitKind::Artifact, _)) => selected.push(path.clone()),
                Some((UnitKind::Source, _)) => {
                    let Some(identity) = self.module_identity(path) else {
                        continue;
                    };
                    if built.contains(&identity) {
                        log::trace!("Skipping {}: build artifact present", path.display());
                    } else if sourced.insert(identity) {
                        selected.push(path.clone());
                    }
                }
                Some((UnitKind::Declaration, _)) => {
                    log::trace!("Skipping declaration-only {}", path.display());
                }
                None => {}
            }
        }
        selected
    }
}

// Longest suffix that leaves a non-empty stem
fn longest_suffix<'a>(file_name: &str, suffixes: &'a [String]) -> Option<&'a str> {
    suffixes
        .iter()
        .filter(|suffix| !suffix.is_empty())
        .filter(|suffix| file_name.len() > suffix.len() && file_name.ends_with(suffix.as_str()))
        .max_by_key(|suffix| suffix.len())
        .map(String::as_str)
}
