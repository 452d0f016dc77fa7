/* src/source/static_source.rs */

use std::any::Any;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use arc_swap::ArcSwap;
use async_trait::async_trait;
use serde_json::Value;

use super::{ContentSource, Engine, EngineArg, SourceError, SourceKind};
use crate::config::{Config, DEFAULT_ENGINE};
use crate::console::Console;

#[derive(Debug, Clone)]
struct Selection {
	name: Engine,
	options: Vec<EngineArg>,
}

/// Content source over a fixed, in-memory item list.
///
/// Useful for embedding a catalog in a binary and for exercising the
/// coordinator without touching the filesystem.
pub struct StaticSource {
	kind: SourceKind,
	items: Arc<Vec<Value>>,
	published: ArcSwap<Vec<Value>>,
	selection: ArcSwap<Selection>,
	watching: AtomicBool,
	loads: AtomicU64,
	console: Console,
}

impl StaticSource {
	/// Creates an empty source using the default engine.
	pub fn new(kind: SourceKind) -> Self {
		Self {
			kind,
			items: Arc::new(Vec::new()),
			published: ArcSwap::from_pointee(Vec::new()),
			selection: ArcSwap::from_pointee(Selection {
				name: DEFAULT_ENGINE.to_string(),
				options: Vec::new(),
			}),
			watching: AtomicBool::new(false),
			loads: AtomicU64::new(0),
			console: Console::new(false),
		}
	}

	/// Creates a source whose engine comes from `<kind>.engine` in `config`
	/// and whose console follows the configured `env`.
	pub fn from_config(kind: SourceKind, config: &Config) -> Self {
		let mut source = Self::new(kind);
		source.console = Console::new(config.is_debug());
		if let Some(name) = config.get_str(&format!("{kind}.engine")) {
			source.selection.store(Arc::new(Selection {
				name,
				options: Vec::new(),
			}));
		}
		source
	}

	/// Sets the items published by the next [`load`](ContentSource::load).
	pub fn with_items(mut self, items: Vec<Value>) -> Self {
		self.items = Arc::new(items);
		self
	}

	pub fn kind(&self) -> SourceKind {
		self.kind
	}

	/// Items published by the last completed load; empty before the first.
	pub fn items(&self) -> Arc<Vec<Value>> {
		self.published.load_full()
	}

	/// Options passed after the engine name in the last selection.
	pub fn engine_options(&self) -> Vec<EngineArg> {
		self.selection.load().options.clone()
	}

	pub fn is_watching(&self) -> bool {
		self.watching.load(Ordering::SeqCst)
	}

	pub fn is_loaded(&self) -> bool {
		self.load_count() > 0
	}

	/// Number of completed loads.
	pub fn load_count(&self) -> u64 {
		self.loads.load(Ordering::SeqCst)
	}
}

#[async_trait]
impl ContentSource for StaticSource {
	fn watch(&self) -> Result<(), SourceError> {
		if !self.watching.swap(true, Ordering::SeqCst) {
			log::debug!("{} source: watching", self.kind);
		}
		Ok(())
	}

	fn unwatch(&self) -> Result<(), SourceError> {
		if self.watching.swap(false, Ordering::SeqCst) {
			log::debug!("{} source: stopped watching", self.kind);
		}
		Ok(())
	}

	fn engine(&self) -> Engine {
		self.selection.load().name.clone()
	}

	fn set_engine(&self, args: &[EngineArg]) -> Result<(), SourceError> {
		let (first, options) = args
			.split_first()
			.ok_or_else(|| SourceError::Engine("missing engine name".to_string()))?;
		let name = first
			.as_str()
			.ok_or_else(|| SourceError::Engine(format!("engine name must be a string, got {first}")))?;

		self.selection.store(Arc::new(Selection {
			name: name.to_string(),
			options: options.to_vec(),
		}));
		Ok(())
	}

	async fn load(&self) -> Result<(), SourceError> {
		tokio::task::yield_now().await;
		self.published.store(Arc::clone(&self.items));
		self.loads.fetch_add(1, Ordering::SeqCst);
		self.console
			.debug(format_args!("{} source: loaded {} items", self.kind, self.items.len()));
		Ok(())
	}

	fn console(&self) -> &Console {
		&self.console
	}

	fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
		self
	}
}

impl std::fmt::Debug for StaticSource {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("StaticSource")
			.field("kind", &self.kind)
			.field("engine", &self.engine())
			.field("items", &self.items.len())
			.field("watching", &self.is_watching())
			.field("loads", &self.load_count())
			.finish()
	}
}
