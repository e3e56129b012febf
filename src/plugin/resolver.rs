//! Loadable-Unit Resolution
//!
//! The resolver is the only place that knows how code is actually brought into
//! the process. Discovery hands it a path and receives the unit's export table
//! or a [`LoadFailure`]; it never inspects file contents itself.

use crate::plugin::builtin::catalog::CatalogResolver;
use crate::plugin::error::LoadFailure;
use crate::plugin::external::library::LibraryResolver;
use crate::plugin::formats::ModuleFormats;
use crate::plugin::types::ModuleExports;
use std::path::Path;

/// Turns a file path into the exports of the unit it contains
pub trait UnitResolver {
    fn load(&self, path: &Path) -> Result<ModuleExports, LoadFailure>;
}

impl<F> UnitResolver for F
where
    F: Fn(&Path) -> Result<ModuleExports, LoadFailure>,
{
    fn load(&self, path: &Path) -> Result<ModuleExports, LoadFailure> {
        self(path)
    }
}

/// Default resolver: shared libraries for artifacts, the compiled-in catalog
/// for everything else
#[derive(Debug, Clone)]
pub struct StandardResolver {
    formats: ModuleFormats,
    library: LibraryResolver,
    catalog: CatalogResolver,
}

impl StandardResolver {
    pub fn new(formats: ModuleFormats) -> Self {
        Self {
            library: LibraryResolver::new(),
            catalog: CatalogResolver::new(formats.clone()),
            formats,
        }
    }
}

impl Default for StandardResolver {
    fn default() -> Self {
        Self::new(ModuleFormats::default())
    }
}

impl UnitResolver for StandardResolver {
    fn load(&self, path: &Path) -> Result<ModuleExports, LoadFailure> {
        if self.formats.is_artifact(path) {
            self.library.load(path)
        } else {
            self.catalog.load(path)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    struct Listed;

    #[test]
    fn test_closure_is_resolver() {
        let resolver = |path: &Path| -> Result<ModuleExports, LoadFailure> {
            if path.ends_with("good.rs") {
                Ok(ModuleExports::new().with_type::<Listed>("Listed"))
            } else {
                Err(LoadFailure::new(path, "unknown unit"))
            }
        };

        assert_eq!(resolver.load(Path::new("p/good.rs")).unwrap().len(), 1);
        let failure = resolver.load(Path::new("p/bad.rs")).unwrap_err();
        assert_eq!(failure.path, PathBuf::from("p/bad.rs"));
    }

    #[test]
    fn test_boxed_closure_is_resolver() {
        let resolver: Box<dyn Fn(&Path) -> Result<ModuleExports, LoadFailure>> =
            Box::new(|_: &Path| Ok(ModuleExports::new()));
        assert!(UnitResolver::load(&resolver, Path::new("any.rs"))
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_standard_resolver_reports_missing_units() {
        let resolver = StandardResolver::default();

        let failure = resolver
            .load(Path::new("/definitely/not/here/libghost.so"))
            .unwrap_err();
        assert!(failure.path.ends_with("libghost.so"));

        let failure = resolver
            .load(Path::new("/definitely/not/here/ghost_module.rs"))
            .unwrap_err();
        assert!(failure.cause.contains("ghost_module"));
    }
}
