//! Type definitions for the plugin system
//!
//! This module contains the core data structures shared by the ledger, the
//! registry and the scanners: candidate types, attached data, plugin
//! definitions and the export table of a loaded unit.

use std::any::{Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Constructor carried by a candidate type that can be instantiated
pub type PluginFactory = fn() -> Box<dyn Any + Send>;

/// A candidate type inspected by the scanner
///
/// Identity is the Rust `TypeId`; the name and optional constructor ride along.
#[derive(Clone, Copy)]
pub struct PluginType {
    id: TypeId,
    name: &'static str,
    factory: Option<PluginFactory>,
}

impl PluginType {
    /// Handle for `T` without a constructor
    pub fn of<T: Any>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
            factory: None,
        }
    }

    /// Handle for `T` that can build fresh instances via `Default`
    pub fn constructible<T: Any + Default + Send>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
            factory: Some(|| -> Box<dyn Any + Send> { Box::new(T::default()) }),
        }
    }

    pub fn type_id(&self) -> TypeId {
        self.id
    }

    /// Fully qualified type name
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Last path segment of the type name
    pub fn short_name(&self) -> &'static str {
        self.name.rsplit("::").next().unwrap_or(self.name)
    }

    pub fn is<T: Any>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }

    pub fn is_constructible(&self) -> bool {
        self.factory.is_some()
    }

    /// Build a new instance, if this handle carries a constructor
    pub fn instantiate(&self) -> Option<Box<dyn Any + Send>> {
        self.factory.map(|factory| factory())
    }
}

impl PartialEq for PluginType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for PluginType {}

impl Hash for PluginType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for PluginType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluginType")
            .field("name", &self.name)
            .field("constructible", &self.factory.is_some())
            .finish()
    }
}

/// Values that can be attached to a registration
pub trait PluginValue: Any + fmt::Debug + Send + Sync {
    fn as_any(&self) -> &dyn Any;
}

impl<T: Any + fmt::Debug + Send + Sync> PluginValue for T {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Data attached to one registration of a type
#[derive(Clone)]
pub struct PluginData(Arc<dyn PluginValue>);

impl PluginData {
    pub fn new<T: PluginValue>(value: T) -> Self {
        Self(Arc::new(value))
    }

    /// Registration carried no data
    pub fn none() -> Self {
        Self::new(())
    }

    pub fn is_none(&self) -> bool {
        self.value().is::<()>()
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.value().downcast_ref::<T>()
    }

    // Dispatch through the trait object, not the blanket impl on the Arc itself
    fn value(&self) -> &dyn Any {
        <dyn PluginValue as PluginValue>::as_any(&*self.0)
    }
}

impl fmt::Debug for PluginData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.0, f)
    }
}

/// A registered (type, data) pair, as returned by registry queries
#[derive(Debug, Clone)]
pub struct PluginDefinition {
    plugin_type: PluginType,
    data: PluginData,
}

impl PluginDefinition {
    pub fn new(plugin_type: PluginType, data: PluginData) -> Self {
        Self { plugin_type, data }
    }

    /// The implementing type
    pub fn plugin_type(&self) -> &PluginType {
        &self.plugin_type
    }

    pub fn data(&self) -> &PluginData {
        &self.data
    }

    /// Build an instance of the implementing type and downcast it to `T`
    pub fn instantiate<T: Any>(&self) -> Option<Box<T>> {
        self.plugin_type
            .instantiate()
            .and_then(|instance| instance.downcast::<T>().ok())
    }
}

/// One named value exported by a loaded unit
#[derive(Debug, Clone)]
pub enum Export {
    /// A candidate type, inspected for registrations
    Type(PluginType),
    /// Anything else; skipped by the scanner
    Value(PluginData),
}

/// Export table of a loaded unit, in declaration order
#[derive(Debug, Clone, Default)]
pub struct ModuleExports {
    entries: Vec<(String, Export)>,
}

impl ModuleExports {
    pub fn new() -> Self {
        Self::default()
    }

    /// Export `T` as a candidate type
    pub fn with_type<T: Any>(mut self, name: &str) -> Self {
        self.push(name, Export::Type(PluginType::of::<T>()));
        self
    }

    /// Export `T` as a candidate type that can be instantiated
    pub fn with_constructible<T: Any + Default + Send>(mut self, name: &str) -> Self {
        self.push(name, Export::Type(PluginType::constructible::<T>()));
        self
    }

    /// Export a non-type value
    pub fn with_value<V: PluginValue>(mut self, name: &str, value: V) -> Self {
        self.push(name, Export::Value(PluginData::new(value)));
        self
    }

    pub fn push(&mut self, name: &str, export: Export) {
        self.entries.push((name.to_string(), export));
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Export)> {
        self.entries.iter().map(|(name, export)| (name.as_str(), export))
    }

    pub fn get(&self, name: &str) -> Option<&Export> {
        self.entries
            .iter()
            .find(|(entry_name, _)| entry_name == name)
            .map(|(_, export)| export)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default)]
    struct Widget {
        size: u32,
    }

    struct Gadget;

    #[test]
    fn test_plugin_type_identity_ignores_constructor() {
        let plain = PluginType::of::<Widget>();
        let constructible = PluginType::constructible::<Widget>();

        assert_eq!(plain, constructible);
        assert_ne!(plain, PluginType::of::<Gadget>());
        assert!(!plain.is_constructible());
        assert!(constructible.is_constructible());
        assert_eq!(plain.short_name(), "Widget");
    }

    #[test]
    fn test_definition_instantiates_concrete_type() {
        let definition =
            PluginDefinition::new(PluginType::constructible::<Widget>(), PluginData::none());

        let widget = definition.instantiate::<Widget>().unwrap();
        assert_eq!(widget.size, 0);
        assert!(definition.instantiate::<Gadget>().is_none());
    }

    #[test]
    fn test_definition_without_constructor_cannot_instantiate() {
        let definition = PluginDefinition::new(PluginType::of::<Gadget>(), PluginData::none());
        assert!(definition.instantiate::<Gadget>().is_none());
    }

    #[test]
    fn test_plugin_data_downcast() {
        let data = PluginData::new("csv");

        assert_eq!(data.downcast_ref::<&str>(), Some(&"csv"));
        assert!(data.downcast_ref::<String>().is_none());
        assert!(!data.is_none());
        assert!(PluginData::none().is_none());
        assert_eq!(format!("{:?}", data), "\"csv\"");
    }

    #[test]
    fn test_module_exports_preserve_order() {
        let exports = ModuleExports::new()
            .with_type::<Widget>("Widget")
            .with_value("VERSION", 3u32)
            .with_type::<Gadget>("Gadget");

        let names: Vec<&str> = exports.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["Widget", "VERSION", "Gadget"]);
        assert!(matches!(exports.get("VERSION"), Some(Export::Value(_))));
        assert!(exports.get("Missing").is_none());
    }
}
