/* src/events/mod.rs */

//!
//! In-process event channel.
//!
//! Delivery is synchronous and ordered by subscription order for a given
//! event name. A failing listener stops delivery and the failure is handed
//! back to whoever called [`Emitter::emit`]. Successfully delivered events
//! are also mirrored onto a broadcast channel for async observers.

mod error;
mod event;

pub use error::{EventError, ListenerError};
pub use event::{Event, ListenerId};

use std::cell::Cell;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use arc_swap::ArcSwap;
use serde_json::Value;
use tokio::sync::broadcast;

/// Default capacity of the async observer channel.
pub const DEFAULT_EVENT_CAPACITY: usize = 100;

type Listener = Arc<dyn Fn(&Event) -> Result<(), ListenerError> + Send + Sync>;

#[derive(Clone)]
struct Registration {
	id: ListenerId,
	once: bool,
	listener: Listener,
}

struct Inner {
	listeners: ArcSwap<HashMap<String, Vec<Registration>>>,
	next_id: AtomicU64,
	tap: broadcast::Sender<Event>,
}

/// Publish/subscribe handle. Clones share the same listener table.
#[derive(Clone)]
pub struct Emitter {
	inner: Arc<Inner>,
}

impl Emitter {
	/// Creates an emitter with the default observer capacity.
	pub fn new() -> Self {
		Self::with_capacity(DEFAULT_EVENT_CAPACITY)
	}

	/// Creates an emitter with a custom observer capacity.
	///
	/// Observers that fall behind by more than `capacity` events lose the
	/// oldest ones. Synchronous listeners are unaffected.
	pub fn with_capacity(capacity: usize) -> Self {
		Self {
			inner: Arc::new(Inner {
				listeners: ArcSwap::from_pointee(HashMap::new()),
				next_id: AtomicU64::new(0),
				tap: broadcast::channel(capacity).0,
			}),
		}
	}

	/// Registers a listener for `name`.
	pub fn on<F>(&self, name: impl Into<String>, listener: F) -> ListenerId
	where
		F: Fn(&Event) -> Result<(), ListenerError> + Send + Sync + 'static,
	{
		self.register(name.into(), false, Arc::new(listener))
	}

	/// Registers a listener that is removed after its first delivery.
	pub fn once<F>(&self, name: impl Into<String>, listener: F) -> ListenerId
	where
		F: Fn(&Event) -> Result<(), ListenerError> + Send + Sync + 'static,
	{
		self.register(name.into(), true, Arc::new(listener))
	}

	fn register(&self, name: String, once: bool, listener: Listener) -> ListenerId {
		let id = ListenerId(self.inner.next_id.fetch_add(1, Ordering::SeqCst));
		let registration = Registration { id, once, listener };

		self.inner.listeners.rcu(|table| {
			let mut next = (**table).clone();
			next.entry(name.clone())
				.or_default()
				.push(registration.clone());
			next
		});
		id
	}

	/// Removes a listener. Returns false if it was not registered.
	pub fn off(&self, id: ListenerId) -> bool {
		// rcu may retry the closure, so the flag is reset on every attempt.
		let removed = Cell::new(false);

		self.inner.listeners.rcu(|table| {
			removed.set(false);
			let mut next = (**table).clone();
			for registrations in next.values_mut() {
				if let Some(pos) = registrations.iter().position(|r| r.id == id) {
					registrations.remove(pos);
					removed.set(true);
					break;
				}
			}
			next.retain(|_, registrations| !registrations.is_empty());
			next
		});

		removed.get()
	}

	/// Publishes an event to every listener of `name`, in subscription order.
	///
	/// Returns the number of listeners invoked. Listeners registered while
	/// the event is being delivered do not see it.
	pub fn emit(&self, name: &str, payload: Value) -> Result<usize, EventError> {
		let event = Event {
			name: name.to_string(),
			payload,
		};

		let registrations = self
			.inner
			.listeners
			.load()
			.get(name)
			.cloned()
			.unwrap_or_default();

		let mut delivered = 0;
		for registration in registrations {
			// A once-listener already consumed by a nested emit is skipped.
			if registration.once && !self.off(registration.id) {
				continue;
			}
			(registration.listener)(&event).map_err(|error| EventError::Listener {
				event: name.to_string(),
				error,
			})?;
			delivered += 1;
		}

		let _ = self.inner.tap.send(event);
		Ok(delivered)
	}

	/// Number of listeners currently registered for `name`.
	pub fn listener_count(&self, name: &str) -> usize {
		self.inner.listeners.load().get(name).map_or(0, Vec::len)
	}

	/// Subscribes an async observer to every delivered event.
	pub fn subscribe(&self) -> broadcast::Receiver<Event> {
		self.inner.tap.subscribe()
	}
}

impl Default for Emitter {
	fn default() -> Self {
		Self::new()
	}
}

impl std::fmt::Debug for Emitter {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let table = self.inner.listeners.load();
		let mut names: Vec<&String> = table.keys().collect();
		names.sort();
		f.debug_struct("Emitter")
			.field("events", &names)
			.field("observers", &self.inner.tap.receiver_count())
			.finish()
	}
}
