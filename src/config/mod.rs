/* src/config/mod.rs */

//!
//! Configuration overlay: built-in defaults with one override layer on top.
//!
//! Values are `serde_json::Value`s addressed by dotted paths
//! (`components.engine`). Reads are wait-free snapshot loads; writes go
//! through `ArcSwap::rcu` so a reader never observes a half-applied update.

mod defaults;
mod error;
mod file;
mod merge;

pub use defaults::{DEFAULT_ENGINE, defaults};
pub use error::ConfigError;
pub use file::{FileFormat, find_layer, read_layer};

use std::sync::Arc;

use arc_swap::ArcSwap;
use serde_json::{Map, Value};

/// Shared handle onto one configuration snapshot.
///
/// Cloning the handle shares the snapshot; it does not copy it.
#[derive(Clone)]
pub struct Config {
	defaults: Arc<Map<String, Value>>,
	current: Arc<ArcSwap<Map<String, Value>>>,
}

impl Config {
	/// Creates an overlay seeded with the built-in defaults.
	pub fn new() -> Self {
		Self::with_defaults(defaults())
	}

	/// Creates an overlay seeded with custom defaults.
	pub fn with_defaults(defaults: Map<String, Value>) -> Self {
		Self {
			current: Arc::new(ArcSwap::from_pointee(defaults.clone())),
			defaults: Arc::new(defaults),
		}
	}

	/// Establishes the working configuration: `overrides` merged over the
	/// defaults, overrides winning on collision.
	pub fn set_config(&self, overrides: Value) -> Result<(), ConfigError> {
		let layer = match overrides {
			Value::Object(map) => map,
			Value::Null => Map::new(),
			other => {
				return Err(ConfigError::NotAnObject {
					found: merge::kind_of(&other),
				});
			}
		};

		let mut merged = (*self.defaults).clone();
		merge::deep_merge(&mut merged, &layer);
		self.current.store(Arc::new(merged));
		Ok(())
	}

	/// Gets the value at a dotted path, or `None` if any segment is unset.
	pub fn get(&self, key: &str) -> Option<Value> {
		let snapshot = self.current.load();
		merge::lookup(&snapshot, key).cloned()
	}

	/// Gets the value at a dotted path if it is a string.
	pub fn get_str(&self, key: &str) -> Option<String> {
		let snapshot = self.current.load();
		merge::lookup(&snapshot, key)
			.and_then(Value::as_str)
			.map(str::to_string)
	}

	/// Sets a value at a dotted path.
	pub fn set(&self, key: &str, value: Value) -> Result<(), ConfigError> {
		if key.is_empty() || key.split('.').any(str::is_empty) {
			return Err(ConfigError::EmptyKey);
		}

		self.current.rcu(|map| {
			let mut next = (**map).clone();
			merge::assign(&mut next, key, value.clone());
			next
		});
		Ok(())
	}

	/// True when `env` is `debug`, compared case-insensitively.
	pub fn is_debug(&self) -> bool {
		self.get_str("env")
			.is_some_and(|env| env.eq_ignore_ascii_case("debug"))
	}

	/// Returns the whole current snapshot.
	pub fn snapshot(&self) -> Arc<Map<String, Value>> {
		self.current.load_full()
	}
}

impl Default for Config {
	fn default() -> Self {
		Self::new()
	}
}

impl std::fmt::Debug for Config {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Config")
			.field("current", &self.current.load_full())
			.finish_non_exhaustive()
	}
}
