/// Core Dispatcher implementation: state, logger and subscription management
use super::registry::Registry;
use crate::handler::HandlerRef;
use crate::logger::FailureLogger;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::debug;

/// State guarded by the dispatcher's single mutex.
pub(super) struct State {
    pub(super) registry: Registry,
    pub(super) logger: Option<Arc<dyn FailureLogger>>,
}

/// In-process event dispatcher.
///
/// Handlers are subscribed against string tags and receive every event
/// published with that tag. All registry reads and writes are serialised by
/// one mutex per instance, so a `Dispatcher` can be shared freely between
/// threads (typically behind an `Arc`, or via the process-wide instance in
/// [`global`](crate::global)).
///
/// Each instance owns its own registry and logger; nothing is shared between
/// instances.
///
/// # Examples
///
/// ```rust
/// use tagbus::{handler_fn, Dispatcher, Event};
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use std::sync::Arc;
///
/// let dispatcher = Dispatcher::new();
/// let calls = Arc::new(AtomicUsize::new(0));
///
/// let counter = calls.clone();
/// let handler = handler_fn(move |_: &Event| {
///     counter.fetch_add(1, Ordering::SeqCst);
/// });
///
/// dispatcher.subscribe("foo", [handler.clone()]);
/// dispatcher.publish_sync(&Event::new("foo", None));
///
/// dispatcher.unsubscribe("foo", &[handler]);
/// dispatcher.publish_sync(&Event::new("foo", None));
///
/// assert_eq!(calls.load(Ordering::SeqCst), 1);
/// ```
pub struct Dispatcher {
    pub(super) state: Mutex<State>,
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // try_lock: formatting from inside a synchronous handler must not deadlock
        match self.state.try_lock() {
            Ok(state) => f
                .debug_struct("Dispatcher")
                .field("tags", &state.registry.tags().len())
                .field("logger", &state.logger.is_some())
                .finish(),
            Err(_) => f
                .debug_struct("Dispatcher")
                .field("state", &"<locked>")
                .finish(),
        }
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Dispatcher {
    /// Creates a new dispatcher with no subscriptions and no logger.
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State {
                registry: Registry::new(),
                logger: None,
            }),
        }
    }

    /// Acquires the state lock.
    ///
    /// Handlers run inside a failure boundary, so the lock is never held
    /// across an escaping panic; recover the guard anyway rather than
    /// propagate poisoning to every later caller.
    pub(super) fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Sets the logger used to report handler failures.
    ///
    /// Takes effect for publish calls started after this returns.
    pub fn with_logger<L>(&self, logger: L)
    where
        L: FailureLogger + 'static,
    {
        self.set_logger(Some(Arc::new(logger)));
    }

    /// Removes the logger; handler failures are silently discarded afterwards.
    pub fn without_logger(&self) {
        self.set_logger(None);
    }

    /// Replaces the logger with an already shared one, or clears it.
    pub fn set_logger(&self, logger: Option<Arc<dyn FailureLogger>>) {
        self.lock().logger = logger;
    }

    /// Subscribes handlers to events with the given tag.
    ///
    /// Handlers already subscribed to `tag` and `None` items are skipped.
    /// An empty list is a no-op.
    ///
    /// # Arguments
    ///
    /// * `tag` - Tag the handlers should receive events for
    /// * `handlers` - Handlers in the order they should run on synchronous publish
    pub fn subscribe<I, H>(&self, tag: &str, handlers: I)
    where
        I: IntoIterator<Item = H>,
        H: Into<Option<HandlerRef>>,
    {
        let mut state = self.lock();
        let added = state
            .registry
            .subscribe(tag, handlers.into_iter().map(Into::into));
        if added > 0 {
            debug!("📝 Subscribed {} handler(s) to '{}'", added, tag);
        }
    }

    /// Unsubscribes handlers from events with the given tag.
    ///
    /// If `handlers` is empty, every handler for `tag` is unsubscribed.
    pub fn unsubscribe(&self, tag: &str, handlers: &[HandlerRef]) {
        let mut state = self.lock();
        let removed = if handlers.is_empty() {
            state.registry.remove_tag(tag)
        } else {
            state.registry.unsubscribe(tag, handlers)
        };
        if removed > 0 {
            debug!("🗑️ Unsubscribed {} handler(s) from '{}'", removed, tag);
        }
    }

    /// Unsubscribes all handlers from the given tags.
    ///
    /// If `tags` is empty, handlers for all tags are unsubscribed.
    pub fn unsubscribe_all(&self, tags: &[&str]) {
        let mut state = self.lock();
        if tags.is_empty() {
            state.registry.clear();
            debug!("🗑️ Cleared all subscriptions");
            return;
        }

        for tag in tags {
            state.registry.remove_tag(tag);
        }
        debug!("🗑️ Cleared subscriptions for {:?}", tags);
    }

    /// Number of handlers currently subscribed to `tag`.
    pub fn handler_count(&self, tag: &str) -> usize {
        self.lock().registry.handlers(tag).len()
    }

    /// Returns true if `handler` is subscribed to `tag`.
    pub fn is_subscribed(&self, tag: &str, handler: &HandlerRef) -> bool {
        self.lock().registry.handlers(tag).contains(handler)
    }

    /// Tags that currently have a registry entry, in no particular order.
    pub fn tags(&self) -> Vec<String> {
        self.lock().registry.tags()
    }
}
