//! Plugin Registry
//!
//! Mapping from extension point to the ordered plugin definitions discovered
//! for it. The registry is a plain value owned by whoever runs discovery; it
//! performs no locking, so concurrent scans into one registry must be
//! serialised by the caller.

use crate::plugin::key::ExtensionPoint;
use crate::plugin::types::{PluginData, PluginDefinition, PluginType};
use std::collections::HashMap;

/// Read access to discovered plugins
pub trait PluginSource {
    /// Definitions registered for `key`, in discovery order
    ///
    /// Unknown keys yield an empty slice.
    fn get_plugins(&self, key: &ExtensionPoint) -> &[PluginDefinition];
}

/// Registry of discovered plugin definitions
#[derive(Default)]
pub struct PluginRegistry {
    /// Definitions per extension point, in insertion order
    plugins: HashMap<ExtensionPoint, Vec<PluginDefinition>>,

    /// Extension points in the order they were first populated
    keys: Vec<ExtensionPoint>,
}

impl std::fmt::Debug for PluginRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginRegistry")
            .field(
                "plugins",
                &self
                    .keys
                    .iter()
                    .map(|key| (key.label(), self.get_plugins(key).len()))
                    .collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl PluginRegistry {
    /// Create a new empty plugin registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a definition for `key`
    pub fn add(&mut self, key: ExtensionPoint, plugin_type: PluginType, data: PluginData) {
        self.add_definition(key, PluginDefinition::new(plugin_type, data));
    }

    /// Append an already built definition for `key`
    pub fn add_definition(&mut self, key: ExtensionPoint, definition: PluginDefinition) {
        let definitions = self.plugins.entry(key).or_insert_with(|| {
            self.keys.push(key);
            Vec::new()
        });
        definitions.push(definition);
    }

    /// Definitions registered for `key`, in discovery order
    pub fn get_plugins(&self, key: &ExtensionPoint) -> &[PluginDefinition] {
        self.plugins.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Extension points holding at least one definition, in first-seen order
    pub fn extension_points(&self) -> impl Iterator<Item = &ExtensionPoint> {
        self.keys.iter()
    }

    /// Whether any definition exists for `key`
    pub fn has_plugins(&self, key: &ExtensionPoint) -> bool {
        !self.get_plugins(key).is_empty()
    }

    /// Total number of definitions across all extension points
    pub fn plugin_count(&self) -> usize {
        self.plugins.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }

    /// Forget every definition
    ///
    /// Registrations recorded in ledgers are untouched and will be picked up
    /// again by the next scan.
    pub fn clear(&mut self) {
        self.plugins.clear();
        self.keys.clear();
    }
}

impl PluginSource for PluginRegistry {
    fn get_plugins(&self, key: &ExtensionPoint) -> &[PluginDefinition] {
        PluginRegistry::get_plugins(self, key)
    }
}
