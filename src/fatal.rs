/* src/fatal.rs */

//!
//! Last-resort handling for panics nothing else caught.
//!
//! The panic hook only reports: a panic the application catches (with
//! `catch_unwind`, or as a tokio `JoinError`) never ends the process.
//! Termination happens at the boundary wrapped by [`FatalPolicy::guard`]
//! or [`FatalPolicy::guard_async`] (`Folio::run` uses the latter): under
//! [`FatalPolicy::Terminate`] a panic reaching it is logged and the process
//! exits with [`FATAL_EXIT_CODE`]. Under [`FatalPolicy::Propagate`] nothing
//! is intercepted.

use std::any::Any;
use std::future::Future;
use std::panic::{self, AssertUnwindSafe, PanicHookInfo};

use futures_util::FutureExt;

/// Exit status used when a panic terminates the process.
pub const FATAL_EXIT_CODE: i32 = 1;

/// What happens to a panic that escapes all application handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FatalPolicy {
	/// Log through `log::error!` and exit with [`FATAL_EXIT_CODE`].
	Terminate,
	/// Leave the default panic behaviour untouched.
	Propagate,
}

impl FatalPolicy {
	/// `Propagate` in debug mode, `Terminate` otherwise.
	pub fn for_debug(debug: bool) -> Self {
		if debug { Self::Propagate } else { Self::Terminate }
	}

	/// Routes panic reports through `log` instead of stderr.
	///
	/// Returns true if a hook was installed. Call once at startup; the
	/// decision is not revisited when configuration changes later.
	pub fn install(self) -> bool {
		match self {
			Self::Propagate => false,
			Self::Terminate => {
				panic::set_hook(Box::new(|info| {
					log::warn!("{}", describe(info));
				}));
				true
			}
		}
	}

	/// Runs `f` as a top-level boundary.
	pub fn guard<T>(self, f: impl FnOnce() -> T) -> T {
		match self {
			Self::Propagate => f(),
			Self::Terminate => match panic::catch_unwind(AssertUnwindSafe(f)) {
				Ok(value) => value,
				Err(payload) => terminate(payload.as_ref()),
			},
		}
	}

	/// Awaits `future` as a top-level boundary.
	pub async fn guard_async<F: Future>(self, future: F) -> F::Output {
		match self {
			Self::Propagate => future.await,
			Self::Terminate => match AssertUnwindSafe(future).catch_unwind().await {
				Ok(value) => value,
				Err(payload) => terminate(payload.as_ref()),
			},
		}
	}
}

fn terminate(payload: &(dyn Any + Send)) -> ! {
	log::error!("uncaught panic: {}", message(payload));
	std::process::exit(FATAL_EXIT_CODE);
}

fn message(payload: &(dyn Any + Send)) -> &str {
	match payload.downcast_ref::<&'static str>() {
		Some(message) => *message,
		None => match payload.downcast_ref::<String>() {
			Some(message) => message.as_str(),
			None => "<non-string panic payload>",
		},
	}
}

/// Renders a panic as `panicked at <file:line>: <message>`.
fn describe(info: &PanicHookInfo<'_>) -> String {
	let message = message(info.payload());
	match info.location() {
		Some(location) => format!(
			"panicked at {}:{}: {message}",
			location.file(),
			location.line()
		),
		None => format!("panicked: {message}"),
	}
}
