/* src/coordinator/mod.rs */

//!
//! The composition root.
//!
//! [`Folio`] owns the configuration overlay, the event channel, the CLI and
//! web front ends and the fixed registry of content sources, and dispatches
//! lifecycle calls to every source in registry order. Build it once at
//! process start, keep it in an `Arc`, and run the entry point through
//! [`Folio::run`] so the fatal policy applies to it.

mod error;
mod lifecycle;

pub use error::FolioError;
pub use lifecycle::EngineMap;

use std::collections::BTreeMap;
use std::future::Future;
use std::path::Path;
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::config::{self, Config};
use crate::console::Console;
use crate::events::{Emitter, Event, ListenerError, ListenerId};
use crate::fatal::FatalPolicy;
use crate::frontend::{ConsoleFrontEnd, FrontEnd, FrontEndKind};
use crate::source::{ContentSource, SourceKind, StaticSource};

type Registry = Vec<(SourceKind, Arc<dyn ContentSource>)>;

/// Process-wide coordinator over the registered content sources.
pub struct Folio {
	config: Config,
	events: Emitter,
	cli: Arc<dyn FrontEnd>,
	web: Arc<dyn FrontEnd>,
	sources: Registry,
	fatal: FatalPolicy,
	fatal_installed: bool,
}

/// Builder for [`Folio`].
pub struct FolioBuilder {
	defaults: Option<Map<String, Value>>,
	overrides: Value,
	sources: BTreeMap<SourceKind, Arc<dyn ContentSource>>,
	cli: Option<Arc<dyn FrontEnd>>,
	web: Option<Arc<dyn FrontEnd>>,
	install_fatal_handler: bool,
}

impl FolioBuilder {
	pub fn new() -> Self {
		Self {
			defaults: None,
			overrides: Value::Null,
			sources: BTreeMap::new(),
			cli: None,
			web: None,
			install_fatal_handler: true,
		}
	}

	/// Replaces the built-in defaults.
	pub fn defaults(mut self, defaults: Map<String, Value>) -> Self {
		self.defaults = Some(defaults);
		self
	}

	/// Sets the override layer merged over the defaults.
	pub fn overrides(mut self, overrides: Value) -> Self {
		self.overrides = overrides;
		self
	}

	/// Reads the override layer from `<base_name>.<ext>` in `dir`.
	///
	/// A missing file leaves the builder unchanged.
	pub async fn overrides_from(
		mut self,
		dir: impl AsRef<Path>,
		base_name: &str,
	) -> Result<Self, FolioError> {
		match config::find_layer(dir.as_ref(), base_name).await? {
			Some((path, layer)) => {
				log::info!("using project config {}", path.display());
				self.overrides = layer;
			}
			None => log::debug!("no project config named '{base_name}', using defaults"),
		}
		Ok(self)
	}

	/// Registers the source for `kind`, replacing any earlier one.
	pub fn source(mut self, kind: SourceKind, source: Arc<dyn ContentSource>) -> Self {
		self.sources.insert(kind, source);
		self
	}

	pub fn components(self, source: Arc<dyn ContentSource>) -> Self {
		self.source(SourceKind::Components, source)
	}

	pub fn docs(self, source: Arc<dyn ContentSource>) -> Self {
		self.source(SourceKind::Docs, source)
	}

	/// Registers the front end for `kind`, replacing any earlier one.
	pub fn front_end(mut self, kind: FrontEndKind, front_end: Arc<dyn FrontEnd>) -> Self {
		match kind {
			FrontEndKind::Cli => self.cli = Some(front_end),
			FrontEndKind::Web => self.web = Some(front_end),
		}
		self
	}

	pub fn cli(self, front_end: Arc<dyn FrontEnd>) -> Self {
		self.front_end(FrontEndKind::Cli, front_end)
	}

	pub fn web(self, front_end: Arc<dyn FrontEnd>) -> Self {
		self.front_end(FrontEndKind::Web, front_end)
	}

	/// Whether `build` may install the process panic hook. Defaults to true.
	pub fn install_fatal_handler(mut self, install: bool) -> Self {
		self.install_fatal_handler = install;
		self
	}

	/// Builds the coordinator.
	///
	/// Sources not supplied are filled with an empty [`StaticSource`]
	/// configured from the overlay, front ends with a [`ConsoleFrontEnd`].
	/// The fatal policy is decided here, from the `env` value as it stands
	/// after the overrides are applied.
	pub fn build(self) -> Result<Folio, FolioError> {
		let config = match self.defaults {
			Some(defaults) => Config::with_defaults(defaults),
			None => Config::new(),
		};
		config.set_config(self.overrides)?;

		let mut supplied = self.sources;
		let sources: Registry = SourceKind::ALL
			.into_iter()
			.map(|kind| {
				let source = supplied.remove(&kind).unwrap_or_else(|| {
					Arc::new(StaticSource::from_config(kind, &config)) as Arc<dyn ContentSource>
				});
				(kind, source)
			})
			.collect();

		let debug = config.is_debug();
		let front_end = |slot: Option<Arc<dyn FrontEnd>>, kind: FrontEndKind| {
			slot.unwrap_or_else(|| Arc::new(ConsoleFrontEnd::new(kind, debug)) as Arc<dyn FrontEnd>)
		};
		let cli = front_end(self.cli, FrontEndKind::Cli);
		let web = front_end(self.web, FrontEndKind::Web);

		let fatal = FatalPolicy::for_debug(debug);
		let fatal_installed = self.install_fatal_handler && fatal.install();
		log::debug!("folio ready (debug: {debug}, fatal policy: {fatal:?}, hook installed: {fatal_installed})");

		Ok(Folio {
			config,
			events: Emitter::new(),
			cli,
			web,
			sources,
			fatal,
			fatal_installed,
		})
	}
}

impl Default for FolioBuilder {
	fn default() -> Self {
		Self::new()
	}
}

impl Folio {
	pub fn builder() -> FolioBuilder {
		FolioBuilder::new()
	}

	/// Builds a coordinator with `overrides` over the built-in defaults.
	pub fn new(overrides: Value) -> Result<Self, FolioError> {
		FolioBuilder::new().overrides(overrides).build()
	}

	/// Configured version with any leading `v`/`V` removed.
	pub fn version(&self) -> String {
		let raw = self.config.get_str("version").unwrap_or_default();
		match raw.strip_prefix(['v', 'V']) {
			Some(stripped) => stripped.to_string(),
			None => raw,
		}
	}

	/// True when `env` is `debug`, compared case-insensitively.
	pub fn debug(&self) -> bool {
		self.config.is_debug()
	}

	pub fn config(&self) -> &Config {
		&self.config
	}

	pub fn events(&self) -> &Emitter {
		&self.events
	}

	pub fn cli(&self) -> &Arc<dyn FrontEnd> {
		&self.cli
	}

	pub fn web(&self) -> &Arc<dyn FrontEnd> {
		&self.web
	}

	/// The CLI front end's console.
	pub fn console(&self) -> &Console {
		self.cli.console()
	}

	/// Policy decided at construction.
	pub fn fatal_policy(&self) -> FatalPolicy {
		self.fatal
	}

	/// Awaits the entry point under the fatal policy.
	///
	/// Outside debug mode a panic that escapes `main` is logged and the
	/// process exits with [`FATAL_EXIT_CODE`](crate::fatal::FATAL_EXIT_CODE).
	/// Panics caught inside `main` are left alone.
	pub async fn run<F: Future>(&self, main: F) -> F::Output {
		self.fatal.guard_async(main).await
	}

	/// Whether construction actually installed the panic hook.
	pub fn fatal_handler_installed(&self) -> bool {
		self.fatal_installed
	}

	/// Registered source names in dispatch order.
	pub fn source_kinds(&self) -> Vec<SourceKind> {
		self.sources.iter().map(|(kind, _)| *kind).collect()
	}

	pub fn get(&self, key: &str) -> Option<Value> {
		self.config.get(key)
	}

	pub fn set(&self, key: &str, value: Value) -> Result<(), FolioError> {
		Ok(self.config.set(key, value)?)
	}

	pub fn on<F>(&self, name: impl Into<String>, listener: F) -> ListenerId
	where
		F: Fn(&Event) -> Result<(), ListenerError> + Send + Sync + 'static,
	{
		self.events.on(name, listener)
	}

	pub fn emit(&self, name: &str, payload: Value) -> Result<usize, FolioError> {
		Ok(self.events.emit(name, payload)?)
	}
}

impl std::fmt::Debug for Folio {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Folio")
			.field("version", &self.version())
			.field("debug", &self.debug())
			.field("sources", &self.source_kinds())
			.field("fatal", &self.fatal)
			.finish_non_exhaustive()
	}
}
