//! Process-wide default dispatcher.
//!
//! Convenience functions mirroring the [`Dispatcher`] API, all delegating to
//! one lazily created instance. Code that wants isolation (tests, multiple
//! tenants in one process) should create its own [`Dispatcher`] instead.

use crate::dispatcher::{Completion, Dispatcher};
use crate::event::Event;
use crate::handler::HandlerRef;
use crate::logger::FailureLogger;
use std::sync::OnceLock;

static DEFAULT_DISPATCHER: OnceLock<Dispatcher> = OnceLock::new();

/// Get the default dispatcher, creating it on first use.
pub fn default_dispatcher() -> &'static Dispatcher {
    DEFAULT_DISPATCHER.get_or_init(Dispatcher::new)
}

/// Sets the logger for the default dispatcher.
pub fn with_logger<L>(logger: L)
where
    L: FailureLogger + 'static,
{
    default_dispatcher().with_logger(logger);
}

/// Removes the logger from the default dispatcher.
pub fn without_logger() {
    default_dispatcher().without_logger();
}

/// Subscribes handlers to events with the given tag on the default dispatcher.
pub fn subscribe<I, H>(tag: &str, handlers: I)
where
    I: IntoIterator<Item = H>,
    H: Into<Option<HandlerRef>>,
{
    default_dispatcher().subscribe(tag, handlers);
}

/// Unsubscribes handlers from the default dispatcher. If no handlers are
/// given, all handlers for the tag are unsubscribed.
pub fn unsubscribe(tag: &str, handlers: &[HandlerRef]) {
    default_dispatcher().unsubscribe(tag, handlers);
}

/// Unsubscribes all handlers for the given tags from the default dispatcher.
/// If no tags are given, handlers for all tags are unsubscribed.
pub fn unsubscribe_all(tags: &[&str]) {
    default_dispatcher().unsubscribe_all(tags);
}

/// Publishes an event synchronously using the default dispatcher.
pub fn publish_sync(event: &Event) {
    default_dispatcher().publish_sync(event);
}

/// Publishes an event asynchronously using the default dispatcher.
pub fn publish(event: Event) -> Completion {
    default_dispatcher().publish(event)
}
