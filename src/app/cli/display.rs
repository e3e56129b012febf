//! Registry display

use crate::plugin::api::PluginRegistry;
use prettytable::{format, Cell, Row, Table};

/// One table row per discovered definition, grouped by extension point
pub fn registry_rows(registry: &PluginRegistry) -> Vec<[String; 3]> {
    let mut rows = Vec::new();
    for key in registry.extension_points() {
        for definition in registry.get_plugins(key) {
            let data = if definition.data().is_none() {
                String::new()
            } else {
                format!("{:?}", definition.data())
            };
            rows.push([
                key.label().to_string(),
                definition.plugin_type().name().to_string(),
                data,
            ]);
        }
    }
    rows
}

/// Render the registry as a table; empty registries yield `None`
pub fn registry_table(registry: &PluginRegistry, use_color: bool) -> Option<Table> {
    let rows = registry_rows(registry);
    if rows.is_empty() {
        return None;
    }

    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_CLEAN);

    let header_style = if use_color { "bFy" } else { "b" };
    table.set_titles(Row::new(
        ["Extension point", "Plugin type", "Data"]
            .iter()
            .map(|title| Cell::new(title).style_spec(header_style))
            .collect(),
    ));

    let mut previous_key = None;
    for [key, plugin_type, data] in rows {
        // Only the first row of each extension point names it
        let key_cell = if previous_key.as_ref() == Some(&key) {
            Cell::new("")
        } else if use_color {
            Cell::new(&key).style_spec("Fg")
        } else {
            Cell::new(&key)
        };
        previous_key = Some(key);

        table.add_row(Row::new(vec![
            key_cell,
            Cell::new(&plugin_type),
            Cell::new(&data),
        ]));
    }
    Some(table)
}

/// Print the registry to stdout
pub fn display_registry(registry: &PluginRegistry, use_color: bool) {
    match registry_table(registry, use_color) {
        Some(table) => {
            table.printstd();
        }
        None => eprintln!("No plugins discovered."),
    }
}
