/* src/source/mod.rs */

//!
//! The content-source contract and the names sources are registered under.
//!
//! A content source is anything the coordinator can watch, unwatch, switch
//! rendering engine on, and load. What it loads (a component catalog, a
//! documentation tree) is its own business.

mod error;
mod kind;
mod static_source;

pub use error::SourceError;
pub use kind::{SourceKind, UnknownSource};
pub use static_source::StaticSource;

use std::any::Any;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::console::Console;

/// Identifier of a rendering engine, e.g. `"handlebars"`.
pub type Engine = String;

/// One engine-selection argument. The first is conventionally the engine
/// name, anything after it engine options.
pub type EngineArg = Value;

/// Lifecycle contract every pluggable source implements.
#[async_trait]
pub trait ContentSource: Send + Sync {
	/// Starts monitoring. Must not block on the monitoring itself.
	fn watch(&self) -> Result<(), SourceError>;

	/// Stops monitoring started by [`watch`](Self::watch).
	fn unwatch(&self) -> Result<(), SourceError>;

	/// Currently selected rendering engine.
	fn engine(&self) -> Engine;

	/// Selects a rendering engine.
	fn set_engine(&self, args: &[EngineArg]) -> Result<(), SourceError>;

	/// Loads the source's content.
	async fn load(&self) -> Result<(), SourceError>;

	/// Output channel the CLI uses when reporting on this source.
	fn console(&self) -> &Console;

	/// Upcast used to recover the concrete type behind a registry entry.
	fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;
}
