/* src/coordinator/lifecycle.rs */

//!
//! Fan-out of lifecycle calls over the source registry.

use std::collections::BTreeMap;
use std::sync::Arc;

use futures_util::stream::{FuturesUnordered, StreamExt};
use serde_json::{Value, json};

use super::{Folio, FolioError};
use crate::source::{ContentSource, Engine, EngineArg, SourceError, SourceKind, UnknownSource};

/// Engine currently selected by each source, keyed by source name.
pub type EngineMap = BTreeMap<String, Engine>;

impl Folio {
	/// Starts monitoring on every source, in registry order.
	pub fn watch(&self) -> Result<(), FolioError> {
		self.dispatch("watch", |source| source.watch())?;
		self.events.emit("watch", Value::Null)?;
		Ok(())
	}

	/// Stops monitoring on every source, in registry order.
	pub fn unwatch(&self) -> Result<(), FolioError> {
		self.dispatch("unwatch", |source| source.unwatch())?;
		self.events.emit("unwatch", Value::Null)?;
		Ok(())
	}

	/// Reads or writes the rendering engine of every source.
	///
	/// With no arguments this is a read and returns `Some` map of source
	/// name to engine. With arguments the same arguments are forwarded to
	/// every source's setter and `None` is returned.
	pub fn engine(&self, args: &[EngineArg]) -> Result<Option<EngineMap>, FolioError> {
		if args.is_empty() {
			return Ok(Some(self.engines()));
		}

		self.dispatch("engine", |source| source.set_engine(args))?;
		self.events.emit("engine", Value::Array(args.to_vec()))?;
		Ok(None)
	}

	/// Read-only shorthand for `engine(&[])`.
	pub fn engines(&self) -> EngineMap {
		self.sources
			.iter()
			.map(|(kind, source)| (kind.as_str().to_string(), source.engine()))
			.collect()
	}

	/// Loads every source concurrently.
	///
	/// Resolves once all loads succeed. The first failure is returned as
	/// soon as it happens; the other loads run as independent tasks and are
	/// neither awaited nor cancelled. A load that panics resumes the panic
	/// here, where the caller (or [`Folio::run`]) decides its fate. Needs a
	/// tokio runtime.
	pub async fn load(&self) -> Result<(), FolioError> {
		let mut pending: FuturesUnordered<_> = self
			.sources
			.iter()
			.map(|(kind, source)| {
				let kind = *kind;
				let source = Arc::clone(source);
				let task = tokio::spawn(async move { source.load().await });
				async move { (kind, task.await) }
			})
			.collect();

		while let Some((kind, outcome)) = pending.next().await {
			match outcome {
				Ok(Ok(())) => log::debug!("{kind} source loaded"),
				Ok(Err(error)) => {
					log::warn!("{kind} source failed to load: {error}");
					return Err(FolioError::Source { kind, error });
				}
				Err(join) => match join.try_into_panic() {
					Ok(payload) => std::panic::resume_unwind(payload),
					Err(_) => {
						return Err(FolioError::Source {
							kind,
							error: SourceError::Cancelled,
						});
					}
				},
			}
		}

		let names: Vec<&str> = self.sources.iter().map(|(kind, _)| kind.as_str()).collect();
		self.events.emit("loaded", json!({ "sources": names }))?;
		Ok(())
	}

	/// Returns the source registered under `name`.
	pub fn source(&self, name: &str) -> Result<Arc<dyn ContentSource>, FolioError> {
		let kind: SourceKind = name.parse()?;
		self.sources
			.iter()
			.find(|(registered, _)| *registered == kind)
			.map(|(_, source)| Arc::clone(source))
			.ok_or_else(|| UnknownSource(name.to_string()).into())
	}

	/// Returns the source registered under `name` as its concrete type.
	pub fn source_as<T>(&self, name: &str) -> Result<Arc<T>, FolioError>
	where
		T: ContentSource + 'static,
	{
		let kind: SourceKind = name.parse()?;
		self.source(name)?
			.into_any()
			.downcast::<T>()
			.map_err(|_| FolioError::SourceType {
				kind,
				expected: std::any::type_name::<T>(),
			})
	}

	fn dispatch<F>(&self, operation: &str, call: F) -> Result<(), FolioError>
	where
		F: Fn(&dyn ContentSource) -> Result<(), SourceError>,
	{
		for (kind, source) in &self.sources {
			log::debug!("{operation}: {kind} source");
			call(source.as_ref()).map_err(|error| FolioError::Source { kind: *kind, error })?;
		}
		Ok(())
	}
}
