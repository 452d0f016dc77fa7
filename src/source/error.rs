/* src/source/error.rs */

/// Failures a content source reports through the lifecycle contract.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SourceError {
	/// Loading the source's content failed.
	#[error("load failed: {0}")]
	Load(String),

	/// Starting or stopping monitoring failed.
	#[error("watch failed: {0}")]
	Watch(String),

	/// The engine selection arguments were rejected.
	#[error("invalid engine selection: {0}")]
	Engine(String),

	/// The load task was cancelled by the runtime before it finished.
	#[error("load task was cancelled")]
	Cancelled,
}
