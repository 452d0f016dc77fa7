/* src/config/file.rs */

//!
//! Project config files: `<base>.json`, `<base>.toml`, `<base>.yaml`/`.yml`.

use std::path::{Path, PathBuf};

use serde_json::Value;

use super::ConfigError;

/// Syntax of a project config file, chosen by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
	Json,
	#[cfg(feature = "toml")]
	Toml,
	#[cfg(feature = "yaml")]
	Yaml,
}

impl FileFormat {
	/// Probe order used by [`find_layer`].
	pub const ALL: &[FileFormat] = &[
		Self::Json,
		#[cfg(feature = "toml")]
		Self::Toml,
		#[cfg(feature = "yaml")]
		Self::Yaml,
	];

	pub fn extensions(self) -> &'static [&'static str] {
		match self {
			Self::Json => &["json"],
			#[cfg(feature = "toml")]
			Self::Toml => &["toml"],
			#[cfg(feature = "yaml")]
			Self::Yaml => &["yaml", "yml"],
		}
	}

	pub fn from_path(path: &Path) -> Option<Self> {
		let ext = path.extension()?.to_str()?;
		Self::ALL
			.iter()
			.copied()
			.find(|format| format.extensions().contains(&ext))
	}

	fn parse(self, text: &str) -> Result<Value, String> {
		match self {
			Self::Json => serde_json::from_str(text).map_err(|e| e.to_string()),
			#[cfg(feature = "toml")]
			Self::Toml => toml::from_str(text).map_err(|e| e.to_string()),
			#[cfg(feature = "yaml")]
			Self::Yaml => serde_yaml::from_str(text).map_err(|e| e.to_string()),
		}
	}
}

/// Reads and parses one config file.
pub async fn read_layer(path: &Path) -> Result<Value, ConfigError> {
	let format = FileFormat::from_path(path).ok_or_else(|| ConfigError::UnsupportedFormat {
		path: path.to_path_buf(),
	})?;
	let text = tokio::fs::read_to_string(path)
		.await
		.map_err(|error| ConfigError::Io {
			path: path.to_path_buf(),
			error,
		})?;
	format.parse(&text).map_err(|message| ConfigError::Parse {
		path: path.to_path_buf(),
		message,
	})
}

/// Finds `<base_name>.<ext>` in `dir` and parses it.
///
/// The first existing candidate in [`FileFormat::ALL`] order wins; any
/// others are reported at `warn`. `Ok(None)` when none exists.
pub async fn find_layer(dir: &Path, base_name: &str) -> Result<Option<(PathBuf, Value)>, ConfigError> {
	let mut found: Option<PathBuf> = None;

	for format in FileFormat::ALL {
		for ext in format.extensions() {
			let candidate = dir.join(format!("{base_name}.{ext}"));
			if !tokio::fs::try_exists(&candidate).await.unwrap_or(false) {
				continue;
			}
			if let Some(first) = &found {
				log::warn!(
					"ignoring {}: {} already supplies the project config",
					candidate.display(),
					first.display()
				);
				continue;
			}
			found = Some(candidate);
		}
	}

	match found {
		Some(path) => {
			let layer = read_layer(&path).await?;
			Ok(Some((path, layer)))
		}
		None => Ok(None),
	}
}
