/* src/config/defaults.rs */

use serde_json::{Map, Value, json};

/// Engine selected for every source until told otherwise.
pub const DEFAULT_ENGINE: &str = "handlebars";

/// Built-in settings every overlay starts from.
pub fn defaults() -> Map<String, Value> {
	let value = json!({
		"env": "production",
		"version": concat!("v", env!("CARGO_PKG_VERSION")),
		"project": {
			"title": "Component Library",
		},
		"components": {
			"path": null,
			"engine": DEFAULT_ENGINE,
			"ext": ".hbs",
		},
		"docs": {
			"path": null,
			"engine": DEFAULT_ENGINE,
			"ext": ".md",
		},
	});

	match value {
		Value::Object(map) => map,
		_ => Map::new(),
	}
}
