//! Object Scanner
//!
//! Feeds the registrations a candidate type carries in a ledger into a
//! registry. Rescanning the same type appends its definitions again; callers
//! wanting a fresh view clear the registry first.

use crate::plugin::ledger::RegistrationLedger;
use crate::plugin::registry::PluginRegistry;
use crate::plugin::types::{Export, ModuleExports, PluginDefinition, PluginType};

/// Absorb the own registrations of `candidate` into `registry`
///
/// Returns the number of definitions added. Types without a ledger are a no-op.
pub fn absorb(
    registry: &mut PluginRegistry,
    ledger: &RegistrationLedger,
    candidate: &PluginType,
) -> usize {
    let Some(entries) = ledger.entries(candidate) else {
        return 0;
    };

    let mut added = 0;
    for (key, values) in entries {
        for data in values {
            registry.add_definition(key, PluginDefinition::new(*candidate, data));
            added += 1;
        }
    }
    log::debug!("Absorbed {} plugin definitions from {}", added, candidate.name());
    added
}

/// Absorb every candidate type exported by a loaded unit
///
/// Non-type exports are skipped silently.
pub fn absorb_module(
    registry: &mut PluginRegistry,
    ledger: &RegistrationLedger,
    exports: &ModuleExports,
) -> usize {
    let mut added = 0;
    for (name, export) in exports.iter() {
        match export {
            Export::Type(candidate) => added += absorb(registry, ledger, candidate),
            Export::Value(_) => log::trace!("Skipping non-type export '{}'", name),
        }
    }
    added
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugin::key::ExtensionPoint;

    #[derive(Debug, Default)]
    struct Exporter;
    struct Importer;
    struct Unregistered;

    #[test]
    fn test_absorb_without_ledger_is_noop() {
        let ledger = RegistrationLedger::new();
        let mut registry = PluginRegistry::new();

        let added = absorb(&mut registry, &ledger, &PluginType::of::<Unregistered>());

        assert_eq!(added, 0);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_absorb_yields_one_definition_per_registration() {
        let ledger = RegistrationLedger::new();
        let mut registry = PluginRegistry::new();
        let key = ExtensionPoint::new("exporters");

        ledger.register::<Exporter, _>(&key, "csv");
        ledger.register::<Exporter, _>(&key, "json");
        ledger.register::<Exporter, _>(&key, "xml");

        absorb(&mut registry, &ledger, &PluginType::of::<Exporter>());

        let definitions = registry.get_plugins(&key);
        let formats: Vec<&str> = definitions
            .iter()
            .map(|definition| *definition.data().downcast_ref::<&str>().unwrap())
            .collect();
        assert_eq!(formats, vec!["csv", "json", "xml"]);
        assert!(definitions
            .iter()
            .all(|definition| definition.plugin_type().is::<Exporter>()));
    }

    #[test]
    fn test_rescanning_duplicates_entries() {
        let ledger = RegistrationLedger::new();
        let mut registry = PluginRegistry::new();
        let key = ExtensionPoint::new("exporters");
        ledger.register::<Exporter, _>(&key, ());

        absorb(&mut registry, &ledger, &PluginType::of::<Exporter>());
        absorb(&mut registry, &ledger, &PluginType::of::<Exporter>());

        assert_eq!(registry.get_plugins(&key).len(), 2);

        registry.clear();
        absorb(&mut registry, &ledger, &PluginType::of::<Exporter>());
        assert_eq!(registry.get_plugins(&key).len(), 1);
    }

    #[test]
    fn test_absorb_keeps_exported_constructor() {
        let ledger = RegistrationLedger::new();
        let mut registry = PluginRegistry::new();
        let key = ExtensionPoint::new("exporters");
        ledger.register::<Exporter, _>(&key, ());

        absorb(&mut registry, &ledger, &PluginType::constructible::<Exporter>());

        let definition = &registry.get_plugins(&key)[0];
        assert!(definition.instantiate::<Exporter>().is_some());
    }

    #[test]
    fn test_absorb_module_skips_values() {
        let ledger = RegistrationLedger::new();
        let mut registry = PluginRegistry::new();
        let exporters = ExtensionPoint::new("exporters");
        let importers = ExtensionPoint::new("importers");
        ledger.register::<Exporter, _>(&exporters, ());
        ledger.register::<Importer, _>(&importers, ());

        let exports = ModuleExports::new()
            .with_value("VERSION", "1.0")
            .with_type::<Importer>("Importer")
            .with_type::<Unregistered>("Unregistered")
            .with_type::<Exporter>("Exporter");

        let added = absorb_module(&mut registry, &ledger, &exports);

        assert_eq!(added, 2);
        assert_eq!(registry.get_plugins(&exporters).len(), 1);
        assert_eq!(registry.get_plugins(&importers).len(), 1);
        let keys: Vec<ExtensionPoint> = registry.extension_points().copied().collect();
        assert_eq!(keys, vec![importers, exporters]);
    }
}
