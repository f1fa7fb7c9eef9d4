/// Publish protocols and the per-handler failure boundary
use super::completion::{Completion, TaskGuard};
use super::core::Dispatcher;
use crate::error::HandlerPanic;
use crate::event::Event;
use crate::handler::HandlerRef;
use crate::logger::FailureLogger;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use tracing::{trace, warn};

impl Dispatcher {
    /// Publishes an event synchronously.
    ///
    /// Every handler subscribed to the event's tag runs on the calling thread,
    /// one after another in subscription order. The dispatcher lock is held
    /// for the whole call, so the handler set cannot change mid-dispatch and
    /// concurrent subscribe/unsubscribe calls wait until this returns.
    ///
    /// A handler must not call back into the same dispatcher from here: the
    /// lock is not reentrant and the call would deadlock.
    pub fn publish_sync(&self, event: &Event) {
        let state = self.lock();
        let handlers = state.registry.handlers(event.tag());
        trace!("📤 Publishing '{}' to {} handler(s) synchronously", event.tag(), handlers.len());

        for handler in handlers {
            invoke(handler, event, state.logger.as_deref());
        }
    }

    /// Publishes an event asynchronously.
    ///
    /// The handlers subscribed to the event's tag are captured under the lock,
    /// which is then released; later subscription changes do not affect this
    /// call. Each captured handler runs in its own task (on tokio's blocking
    /// pool when called from within a runtime, otherwise on a dedicated
    /// thread), with no ordering between them.
    ///
    /// Returns immediately. The returned [`Completion`] resolves once every
    /// launched handler has finished.
    pub fn publish(&self, event: Event) -> Completion {
        let (handlers, logger) = {
            let state = self.lock();
            (state.registry.snapshot(event.tag()), state.logger.clone())
        };

        trace!("📤 Publishing '{}' to {} handler(s)", event.tag(), handlers.len());

        let event = Arc::new(event);
        let (guard, completion) = Completion::channel(handlers.len());

        for handler in handlers {
            let event = Arc::clone(&event);
            let logger = logger.clone();
            spawn_handler(guard.clone(), move || {
                invoke(&handler, &event, logger.as_deref());
            });
        }

        completion
    }
}

/// Runs one handler inside the failure boundary.
///
/// A panic is caught and reported to `logger`; with no logger it is dropped.
/// A panic while reporting (from the logger, the handler's `name`, or the
/// payload's destructor) is contained the same way.
pub(super) fn invoke(handler: &HandlerRef, event: &Event, logger: Option<&dyn FailureLogger>) {
    let Err(payload) = catch_unwind(AssertUnwindSafe(|| handler.handle_event(event))) else {
        return;
    };

    // Building the report calls back into user code (`name`, the payload's
    // `Drop`), so all of it stays inside the boundary.
    let _ = catch_unwind(AssertUnwindSafe(move || {
        if let Some(logger) = logger {
            let failure = HandlerPanic::new(handler, event, payload.as_ref());
            logger.log(format_args!("{failure}"));
        }
        drop(payload);
    }));
}

/// Launches one handler task that releases `guard` when it finishes.
fn spawn_handler<F>(guard: TaskGuard, task: F)
where
    F: FnOnce() + Send + 'static,
{
    let run = move || {
        task();
        drop(guard);
    };

    // Handlers are blocking code, so they never go on the async workers.
    if let Ok(runtime) = tokio::runtime::Handle::try_current() {
        runtime.spawn_blocking(run);
        return;
    }

    if let Err(e) = std::thread::Builder::new()
        .name("tagbus-handler".to_string())
        .spawn(run)
    {
        warn!("⚠️ Failed to spawn handler thread: {}", e);
    }
}
