//! Shared-Library Resolution
//!
//! Loads build artifacts (cdylib/dylib plugins) with `libloading`. A plugin
//! library exposes its export table through the entry point generated by
//! [`plugin_module!`](crate::plugin_module). To share the registration ledger
//! and extension point identities with the host, plugin libraries and the host
//! must link this crate dynamically (its `dylib` build).
//!
//! Libraries stay mapped for the life of the process: definitions hold type
//! handles and constructors that point into them.

use crate::plugin::error::LoadFailure;
use crate::plugin::types::ModuleExports;
use libloading::Library;
use once_cell::sync::Lazy;
use std::any::Any;
use std::panic;
use std::path::Path;
use std::sync::Mutex;

/// Symbol name of the entry point generated by `plugin_module!`
pub const MODULE_ENTRY_SYMBOL: &str = "plugscout_module";

/// Signature of the entry point
pub type ModuleEntry = fn() -> ModuleExports;

static LOADED_LIBRARIES: Lazy<Mutex<Vec<Library>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Resolver for shared-library plugins
#[derive(Debug, Clone, Default)]
pub struct LibraryResolver;

impl LibraryResolver {
    pub fn new() -> Self {
        Self
    }

    /// Number of libraries mapped by any resolver in this process
    pub fn loaded_count() -> usize {
        LOADED_LIBRARIES
            .lock()
            .map(|libraries| libraries.len())
            .unwrap_or_else(|poisoned| poisoned.into_inner().len())
    }

    pub fn load(&self, path: &Path) -> Result<ModuleExports, LoadFailure> {
        // SAFETY: loading a library runs its initialisers; discovery only loads
        // files the host was pointed at as plugin locations.
        let library = unsafe { Library::new(path) }.map_err(|e| LoadFailure::new(path, e))?;

        // SAFETY: the symbol is generated by `plugin_module!` with this signature.
        let entry: ModuleEntry = unsafe { library.get::<ModuleEntry>(MODULE_ENTRY_SYMBOL.as_bytes()) }
            .map(|symbol| *symbol)
            .map_err(|e| LoadFailure::new(path, e))?;

        LOADED_LIBRARIES
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(library);

        let exports = panic::catch_unwind(entry)
            .map_err(|payload| LoadFailure::new(path, panic_message(payload.as_ref())))?;

        // Registrations submitted by the library become visible only now
        crate::plugin::ledger::sync_static_registrations();

        log::debug!(
            "Loaded library {} with {} exports",
            path.display(),
            exports.len()
        );
        Ok(exports)
    }
}

impl crate::plugin::resolver::UnitResolver for LibraryResolver {
    fn load(&self, path: &Path) -> Result<ModuleExports, LoadFailure> {
        LibraryResolver::load(self, path)
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        format!("module initialisation panicked: {}", message)
    } else if let Some(message) = payload.downcast_ref::<String>() {
        format!("module initialisation panicked: {}", message)
    } else {
        "module initialisation panicked".to_string()
    }
}

/// Generate the entry point of a plugin library
///
/// Types marked `#[constructible]` (they must be `Default + Send`) can be
/// instantiated from their definitions.
///
/// ```rust,ignore
/// plugscout::plugin_module!(CsvExporter, #[constructible] TsvExporter);
/// ```
#[macro_export]
macro_rules! plugin_module {
    ($($(#[$flag:ident])? $name:ident),* $(,)?) => {
        #[no_mangle]
        pub fn plugscout_module() -> $crate::plugin::types::ModuleExports {
            let exports = $crate::plugin::types::ModuleExports::new();
            $(
                let exports = $crate::__plugin_export!(exports, $($flag)? $name);
            )*
            exports
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __plugin_export {
    ($exports:ident, constructible $name:ident) => {
        $exports.with_constructible::<$name>(stringify!($name))
    };
    ($exports:ident, $name:ident) => {
        $exports.with_type::<$name>(stringify!($name))
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugin::key::ExtensionPoint;
    use crate::plugin::ledger::RegistrationLedger;
    use crate::plugin::registry::PluginRegistry;
    use crate::plugin::scan::absorb_module;
    use crate::plugin::types::Export;
    use tempfile::TempDir;

    #[derive(Debug, Default, PartialEq)]
    struct LibraryExporter {
        rows: usize,
    }

    struct LibraryImporter;

    crate::plugin_module!(#[constructible] LibraryExporter, LibraryImporter);

    #[test]
    fn test_generated_entry_point_exports_in_order() {
        let entry: ModuleEntry = plugscout_module;
        let exports = entry();

        let names: Vec<&str> = exports.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["LibraryExporter", "LibraryImporter"]);

        let Some(Export::Type(exporter)) = exports.get("LibraryExporter") else {
            panic!("LibraryExporter not exported as a type");
        };
        assert!(exporter.is::<LibraryExporter>());
        assert!(exporter.is_constructible());

        let Some(Export::Type(importer)) = exports.get("LibraryImporter") else {
            panic!("LibraryImporter not exported as a type");
        };
        assert!(!importer.is_constructible());
    }

    #[test]
    fn test_generated_exports_absorbed_and_constructible() {
        let key = ExtensionPoint::new("exporters");
        let ledger = RegistrationLedger::new();
        ledger.register::<LibraryExporter, _>(&key, "rows");

        let mut registry = PluginRegistry::new();
        let added = absorb_module(&mut registry, &ledger, &plugscout_module());

        assert_eq!(added, 1);
        let definitions = registry.get_plugins(&key);
        assert_eq!(definitions.len(), 1);
        assert_eq!(
            definitions[0].instantiate::<LibraryExporter>(),
            Some(Box::new(LibraryExporter { rows: 0 }))
        );
    }

    #[test]
    fn test_missing_library_is_load_failure() {
        let resolver = LibraryResolver::new();
        let failure = resolver
            .load(Path::new("/definitely/not/here/libplugin.so"))
            .unwrap_err();

        assert!(failure.path.ends_with("libplugin.so"));
        assert!(!failure.cause.is_empty());
    }

    #[test]
    fn test_non_library_file_is_load_failure() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("libbroken.so");
        std::fs::write(&path, "this is not a shared library").unwrap();

        let before = LibraryResolver::loaded_count();
        let failure = LibraryResolver::new().load(&path).unwrap_err();

        assert_eq!(failure.path, path);
        assert_eq!(LibraryResolver::loaded_count(), before);
    }

    #[test]
    fn test_panic_message_extraction() {
        let payload: Box<dyn Any + Send> = Box::new("boom");
        assert_eq!(
            panic_message(payload.as_ref()),
            "module initialisation panicked: boom"
        );

        let payload: Box<dyn Any + Send> = Box::new(String::from("bang"));
        assert!(panic_message(payload.as_ref()).ends_with("bang"));

        let payload: Box<dyn Any + Send> = Box::new(42u8);
        assert_eq!(panic_message(payload.as_ref()), "module initialisation panicked");
    }
}
