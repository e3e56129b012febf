//! Registration Ledger
//!
//! Side-table from exact type identity to the extension points that type has
//! opted into, with the data attached at each opt-in. Lookups never walk any
//! notion of a type hierarchy: a wrapper or "derived" type has its own,
//! initially empty, entry.
//!
//! Plugin authors normally populate the process-wide ledger declaratively with
//! [`plugin_setup!`](crate::plugin_setup). Each use submits a static entry at
//! link time; entries are applied to the global ledger exactly once, the first
//! time [`sync_static_registrations`] runs after they become visible.

use crate::plugin::key::ExtensionPoint;
use crate::plugin::types::{PluginData, PluginType, PluginValue};
use once_cell::sync::Lazy;
use std::any::{Any, TypeId};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, RwLock};

/// Ordered registrations of a single type
pub type LedgerEntries = Vec<(ExtensionPoint, Vec<PluginData>)>;

/// Per-type registration records
#[derive(Debug, Default)]
pub struct RegistrationLedger {
    records: RwLock<HashMap<TypeId, LedgerEntries>>,
}

static GLOBAL: Lazy<Arc<RegistrationLedger>> = Lazy::new(|| Arc::new(RegistrationLedger::new()));

// Static registrations already applied to GLOBAL, keyed by entry address
static APPLIED: Lazy<Mutex<HashSet<usize>>> = Lazy::new(|| Mutex::new(HashSet::new()));

impl RegistrationLedger {
    /// Create an empty, independent ledger
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide ledger, with all visible static registrations applied
    pub fn global() -> Arc<RegistrationLedger> {
        sync_static_registrations();
        Arc::clone(&GLOBAL)
    }

    /// Append `data` to `T`'s own entry for `key`
    pub fn register<T: Any, V: PluginValue>(&self, key: &ExtensionPoint, data: V) {
        self.register_type(&PluginType::of::<T>(), key, PluginData::new(data));
    }

    /// Append `data` to the own entry of `plugin_type` for `key`
    pub fn register_type(&self, plugin_type: &PluginType, key: &ExtensionPoint, data: PluginData) {
        let mut records = self
            .records
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let entries = records.entry(plugin_type.type_id()).or_default();

        match entries.iter_mut().find(|(existing, _)| existing == key) {
            Some((_, values)) => values.push(data),
            None => entries.push((*key, vec![data])),
        }
        log::trace!("Registered {} for extension point '{}'", plugin_type.name(), key);
    }

    /// Snapshot of the own registrations of `plugin_type`, if it has any
    pub fn entries(&self, plugin_type: &PluginType) -> Option<LedgerEntries> {
        let records = self
            .records
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        records.get(&plugin_type.type_id()).cloned()
    }

    /// Whether `plugin_type` carries a ledger of its own
    pub fn has_entries(&self, plugin_type: &PluginType) -> bool {
        let records = self
            .records
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        records.contains_key(&plugin_type.type_id())
    }

    /// Number of types with a ledger
    pub fn type_count(&self) -> usize {
        let records = self
            .records
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        records.len()
    }
}

/// Link-time registration submitted by [`plugin_setup!`](crate::plugin_setup)
pub struct StaticRegistration {
    pub apply: fn(&RegistrationLedger),
}

inventory::collect!(StaticRegistration);

/// Apply every static registration not yet applied to the global ledger
///
/// Safe to call repeatedly; registrations contributed by a shared library
/// become visible once the library is loaded and are picked up by the next call.
pub fn sync_static_registrations() {
    let mut seen = APPLIED
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    let mut applied = 0usize;
    for registration in inventory::iter::<StaticRegistration>() {
        if seen.insert(registration as *const StaticRegistration as usize) {
            (registration.apply)(&GLOBAL);
            applied += 1;
        }
    }
    drop(seen);
    if applied > 0 {
        log::debug!("Applied {} static plugin registrations", applied);
    }
}

/// Register a type for an extension point at definition time
///
/// Separate invocations are applied in link order, which is unspecified. Use
/// the braced form when the relative order of several registrations matters;
/// it applies them in the order written.
///
/// ```rust,ignore
/// plugscout::plugin_setup!(CsvExporter, EXPORTERS, "csv");
/// plugscout::plugin_setup!(CsvExporter, IMPORTERS);
/// plugscout::plugin_setup!(TsvExporter {
///     EXPORTERS => "tsv",
///     EXPORTERS => "tab",
///     IMPORTERS,
/// });
/// ```
#[macro_export]
macro_rules! plugin_setup {
    ($plugin:ty { $($key:path $(=> $data:expr)?),+ $(,)? }) => {
        $crate::inventory::submit! {
            $crate::plugin::ledger::StaticRegistration {
                apply: |ledger| {
                    $(
                        ledger.register::<$plugin, _>(&$key, $crate::__plugin_data!($($data)?));
                    )+
                },
            }
        }
    };
    ($plugin:ty, $key:path) => {
        $crate::plugin_setup!($plugin { $key });
    };
    ($plugin:ty, $key:path, $data:expr) => {
        $crate::plugin_setup!($plugin { $key => $data });
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __plugin_data {
    () => {
        ()
    };
    ($data:expr) => {
        $data
    };
}
