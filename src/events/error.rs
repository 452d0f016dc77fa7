/* src/events/error.rs */

/// Error type a listener may return.
pub type ListenerError = Box<dyn std::error::Error + Send + Sync>;

/// Errors surfaced to the publisher of an event.
#[derive(Debug, thiserror::Error)]
pub enum EventError {
	/// A listener failed; delivery stopped at that listener.
	#[error("listener for '{event}' failed: {error}")]
	Listener {
		event: String,
		#[source]
		error: ListenerError,
	},
}
