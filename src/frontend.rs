/* src/frontend.rs */

//!
//! Front ends the coordinator holds: a command-line interface and a
//! development web server.
//!
//! A front end drives the coordinator by taking `&Folio` in its own
//! commands; the coordinator keeps the front ends, not the other way round.

use std::fmt;

use crate::console::Console;

/// Slots a front end can be registered under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrontEndKind {
	Cli,
	Web,
}

impl FrontEndKind {
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Cli => "cli",
			Self::Web => "web",
		}
	}
}

impl fmt::Display for FrontEndKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// What the coordinator needs from a front end.
pub trait FrontEnd: Send + Sync {
	fn kind(&self) -> FrontEndKind;

	/// Output channel for this front end's messages.
	fn console(&self) -> &Console;
}

/// Front end that only carries a console. Fills slots left empty.
#[derive(Debug, Clone, Copy)]
pub struct ConsoleFrontEnd {
	kind: FrontEndKind,
	console: Console,
}

impl ConsoleFrontEnd {
	pub fn new(kind: FrontEndKind, debug: bool) -> Self {
		Self {
			kind,
			console: Console::new(debug),
		}
	}
}

impl FrontEnd for ConsoleFrontEnd {
	fn kind(&self) -> FrontEndKind {
		self.kind
	}

	fn console(&self) -> &Console {
		&self.console
	}
}
