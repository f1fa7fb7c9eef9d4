//! Failure records produced by the dispatcher's failure boundary.

use crate::event::Event;
use crate::handler::HandlerRef;
use std::any::Any;

/// A handler panicked while processing an event.
///
/// This never reaches the publisher. It is rendered through the dispatcher's
/// [`FailureLogger`](crate::FailureLogger), if one is configured.
#[derive(Debug, Clone, thiserror::Error)]
#[error("handler {handler} panicked on event {event} with: {message}")]
pub struct HandlerPanic {
    /// The offending handler, as `name@address` so that handlers sharing a
    /// name can still be told apart
    pub handler: String,
    /// Rendered event the handler was processing
    pub event: String,
    /// Panic payload rendered as text
    pub message: String,
}

impl HandlerPanic {
    pub(crate) fn new(handler: &HandlerRef, event: &Event, payload: &(dyn Any + Send)) -> Self {
        Self {
            handler: format!("{handler:?}"),
            event: event.to_string(),
            message: panic_message(payload),
        }
    }
}

/// Renders a panic payload, which is a `&str` or `String` for `panic!` calls.
pub fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&'static str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::HandlerFn;

    #[test]
    fn test_panic_message_variants() {
        assert_eq!(panic_message(&"oops"), "oops");
        assert_eq!(panic_message(&String::from("bad state")), "bad state");
        assert_eq!(panic_message(&42_u32), "unknown panic");
    }

    #[test]
    fn test_display_identifies_handler_and_event() {
        let event = Event::new("foo", None);
        let handler = HandlerRef::new(HandlerFn::new(|_: &Event| {}).named("bad_handler"));
        let failure = HandlerPanic::new(&handler, &event, &"oops");

        assert_eq!(failure.handler, format!("bad_handler@{:#x}", handler.id()));
        assert_eq!(
            failure.to_string(),
            format!("handler {handler:?} panicked on event foo {{}} with: oops")
        );
    }
}
