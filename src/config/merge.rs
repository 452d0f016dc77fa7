/* src/config/merge.rs */

//!
//! Path and merge helpers over `serde_json` maps.

use serde_json::{Map, Value};

/// Merges `layer` into `base`. Objects merge recursively, everything else
/// in `layer` replaces what `base` had.
pub(crate) fn deep_merge(base: &mut Map<String, Value>, layer: &Map<String, Value>) {
	for (key, incoming) in layer {
		match (base.get_mut(key), incoming) {
			(Some(Value::Object(existing)), Value::Object(nested)) => deep_merge(existing, nested),
			_ => {
				base.insert(key.clone(), incoming.clone());
			}
		}
	}
}

/// Resolves a dotted path such as `components.engine`.
pub(crate) fn lookup<'a>(map: &'a Map<String, Value>, path: &str) -> Option<&'a Value> {
	let mut segments = path.split('.');
	let mut current = map.get(segments.next()?)?;
	for segment in segments {
		current = current.as_object()?.get(segment)?;
	}
	Some(current)
}

/// Writes `value` at a dotted path, creating (or replacing non-object)
/// intermediate nodes on the way down.
pub(crate) fn assign(map: &mut Map<String, Value>, path: &str, value: Value) {
	match path.split_once('.') {
		None => {
			map.insert(path.to_string(), value);
		}
		Some((head, rest)) => {
			let node = map
				.entry(head.to_string())
				.or_insert_with(|| Value::Object(Map::new()));
			if !node.is_object() {
				*node = Value::Object(Map::new());
			}
			if let Value::Object(child) = node {
				assign(child, rest, value);
			}
		}
	}
}

/// Name of a JSON value's kind, for error messages.
pub(crate) fn kind_of(value: &Value) -> &'static str {
	match value {
		Value::Null => "null",
		Value::Bool(_) => "boolean",
		Value::Number(_) => "number",
		Value::String(_) => "string",
		Value::Array(_) => "array",
		Value::Object(_) => "object",
	}
}
