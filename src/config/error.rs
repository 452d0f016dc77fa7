/* src/config/error.rs */

use std::path::PathBuf;

/// Errors raised by the configuration overlay.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
	/// `set` was called with an empty key path.
	#[error("config key must not be empty")]
	EmptyKey,
	/// An override layer was not a key/value object.
	#[error("config overrides must be an object, got {found}")]
	NotAnObject { found: &'static str },
	/// A config file has an extension no enabled format understands.
	#[error("unsupported config format: {}", path.display())]
	UnsupportedFormat { path: PathBuf },
	/// A config file could not be read.
	#[error("failed to read {}: {error}", path.display())]
	Io {
		path: PathBuf,
		#[source]
		error: std::io::Error,
	},
	/// A config file could not be parsed.
	#[error("failed to parse {}: {message}", path.display())]
	Parse { path: PathBuf, message: String },
}
