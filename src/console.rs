/* src/console.rs */

//!
//! Console handed to front ends and content sources for user-facing output.
//!
//! Output goes through the `log` facade under the `folio::console` target,
//! so the embedding binary decides where it ends up.

/// Log target used for every console line.
pub const CONSOLE_TARGET: &str = "folio::console";

/// User-facing output channel.
#[derive(Debug, Clone, Copy)]
pub struct Console {
	debug: bool,
}

impl Console {
	/// `debug` enables [`Console::debug`] lines.
	pub fn new(debug: bool) -> Self {
		Self { debug }
	}

	pub fn is_debug(&self) -> bool {
		self.debug
	}

	pub fn log(&self, message: impl std::fmt::Display) {
		log::info!(target: CONSOLE_TARGET, "{message}");
	}

	pub fn success(&self, message: impl std::fmt::Display) {
		log::info!(target: CONSOLE_TARGET, "✔ {message}");
	}

	pub fn warn(&self, message: impl std::fmt::Display) {
		log::warn!(target: CONSOLE_TARGET, "{message}");
	}

	pub fn error(&self, message: impl std::fmt::Display) {
		log::error!(target: CONSOLE_TARGET, "✘ {message}");
	}

	/// Only emitted in debug mode.
	pub fn debug(&self, message: impl std::fmt::Display) {
		if self.debug {
			log::debug!(target: CONSOLE_TARGET, "{message}");
		}
	}
}
