/* src/source/kind.rs */

use std::fmt;
use std::str::FromStr;

/// Names of the sources a coordinator registers, in dispatch order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SourceKind {
	Components,
	Docs,
}

impl SourceKind {
	/// Registry order. Lifecycle calls fan out in exactly this sequence.
	pub const ALL: [SourceKind; 2] = [SourceKind::Components, SourceKind::Docs];

	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Components => "components",
			Self::Docs => "docs",
		}
	}
}

impl fmt::Display for SourceKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Returned when a name is not one of the registered source names.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("configuration error: source type '{0}' not recognised")]
pub struct UnknownSource(pub String);

impl FromStr for SourceKind {
	type Err = UnknownSource;

	fn from_str(name: &str) -> Result<Self, Self::Err> {
		Self::ALL
			.into_iter()
			.find(|kind| kind.as_str() == name)
			.ok_or_else(|| UnknownSource(name.to_string()))
	}
}
