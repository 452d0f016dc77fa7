/* src/coordinator/error.rs */

use thiserror::Error;

use crate::config::ConfigError;
use crate::events::EventError;
use crate::source::{SourceError, SourceKind, UnknownSource};

/// Errors surfaced by the coordinator.
#[derive(Debug, Error)]
pub enum FolioError {
	/// A name outside the registry was requested.
	#[error(transparent)]
	UnknownSource(#[from] UnknownSource),

	/// The registered source is not of the requested concrete type.
	#[error("source '{kind}' is not a {expected}")]
	SourceType {
		kind: SourceKind,
		expected: &'static str,
	},

	/// A source failed a lifecycle call; the error is passed through as is.
	#[error("{kind} source: {error}")]
	Source {
		kind: SourceKind,
		#[source]
		error: SourceError,
	},

	#[error("event error: {0}")]
	Event(#[from] EventError),

	#[error("config error: {0}")]
	Config(#[from] ConfigError),
}
