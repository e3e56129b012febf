//! Compiled-In Module Catalog
//!
//! Source-form units whose code is linked into the host binary. A module
//! registers its export table under its logical module name with
//! [`builtin_module!`](crate::builtin_module); a source file of that name found
//! during discovery resolves to the registered table. The file on disk decides
//! whether, and in what order, the module participates.

use crate::plugin::error::LoadFailure;
use crate::plugin::formats::ModuleFormats;
use crate::plugin::resolver::UnitResolver;
use crate::plugin::types::ModuleExports;
use std::path::Path;

/// Entry for a compiled-in module
pub struct BuiltinModuleEntry {
    pub module: &'static str,
    pub exports: fn() -> ModuleExports,
}

// Collect all compiled-in module entries
inventory::collect!(BuiltinModuleEntry);

/// Macro for registering a compiled-in module
///
/// ```rust,ignore
/// plugscout::builtin_module!("my_example" => [MyExample, #[constructible] OtherExample]);
/// ```
#[macro_export]
macro_rules! builtin_module {
    ($module:expr => [$($(#[$flag:ident])? $name:ident),* $(,)?]) => {
        $crate::inventory::submit! {
            $crate::plugin::builtin::catalog::BuiltinModuleEntry {
                module: $module,
                exports: || {
                    let exports = $crate::plugin::types::ModuleExports::new();
                    $(
                        let exports = $crate::__plugin_export!(exports, $($flag)? $name);
                    )*
                    exports
                },
            }
        }
    };
}

/// Names of all compiled-in modules
pub fn builtin_module_names() -> Vec<&'static str> {
    let mut names: Vec<&'static str> = inventory::iter::<BuiltinModuleEntry>()
        .map(|entry| entry.module)
        .collect();
    names.sort_unstable();
    names
}

/// Resolver for compiled-in modules
#[derive(Debug, Clone, Default)]
pub struct CatalogResolver {
    formats: ModuleFormats,
}

impl CatalogResolver {
    pub fn new(formats: ModuleFormats) -> Self {
        Self { formats }
    }
}

impl UnitResolver for CatalogResolver {
    fn load(&self, path: &Path) -> Result<ModuleExports, LoadFailure> {
        let module = self
            .formats
            .module_name(path)
            .ok_or_else(|| LoadFailure::new(path, "not a recognised plugin unit"))?;

        let entry = inventory::iter::<BuiltinModuleEntry>()
            .find(|entry| entry.module == module)
            .ok_or_else(|| {
                LoadFailure::new(path, format!("no compiled-in module named '{}'", module))
            })?;

        crate::plugin::ledger::sync_static_registrations();
        Ok((entry.exports)())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugin::types::Export;

    #[derive(Debug, Default)]
    struct CatalogExample;
    struct CatalogHelper;

    crate::builtin_module!("catalog_example" => [#[constructible] CatalogExample, CatalogHelper]);

    #[test]
    fn test_catalog_lists_registered_modules() {
        assert!(builtin_module_names().contains(&"catalog_example"));
    }

    #[test]
    fn test_catalog_resolves_by_module_name() {
        let resolver = CatalogResolver::new(ModuleFormats::default());

        let exports = resolver
            .load(Path::new("anywhere/Plugins/catalog_example.rs"))
            .unwrap();

        let names: Vec<&str> = exports.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["CatalogExample", "CatalogHelper"]);
        match exports.get("CatalogExample") {
            Some(Export::Type(plugin_type)) => assert!(plugin_type.is_constructible()),
            other => panic!("unexpected export: {:?}", other),
        }
    }

    #[test]
    fn test_catalog_unknown_module_fails() {
        let resolver = CatalogResolver::new(ModuleFormats::default());

        let failure = resolver.load(Path::new("Plugins/unknown_thing.rs")).unwrap_err();
        assert!(failure.cause.contains("unknown_thing"));

        let failure = resolver.load(Path::new("Plugins/README")).unwrap_err();
        assert!(failure.cause.contains("not a recognised"));
    }
}
