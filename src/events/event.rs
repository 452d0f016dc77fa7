/* src/events/event.rs */

use serde_json::Value;

/// A named notification with a JSON payload.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
	pub name: String,
	pub payload: Value,
}

/// Handle returned by `on`/`once`, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub(crate) u64);
