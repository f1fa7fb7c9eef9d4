//! Handler capability and the shared handler reference used by the registry.

use crate::event::Event;
use std::fmt;
use std::sync::Arc;

/// Trait for event handlers.
///
/// A handler is invoked once per published event whose tag it is subscribed
/// to. Handlers return nothing: a panic is the only failure signal, and it is
/// contained by the dispatcher.
pub trait EventHandler: Send + Sync {
    /// Handle an event
    fn handle_event(&self, event: &Event);

    /// Name used when reporting a failure of this handler.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

/// Adapter turning a plain closure into an [`EventHandler`].
pub struct HandlerFn<F> {
    f: F,
    name: Option<String>,
}

impl<F> HandlerFn<F>
where
    F: Fn(&Event) + Send + Sync + 'static,
{
    pub fn new(f: F) -> Self {
        Self { f, name: None }
    }

    /// Attaches a name that failure reports will use instead of the closure type.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

impl<F> EventHandler for HandlerFn<F>
where
    F: Fn(&Event) + Send + Sync + 'static,
{
    fn handle_event(&self, event: &Event) {
        (self.f)(event)
    }

    fn name(&self) -> &str {
        match &self.name {
            Some(name) => name,
            None => std::any::type_name::<F>(),
        }
    }
}

/// Shared reference to a registered handler.
///
/// Equality is identity: two references are equal only when they point at
/// the same handler allocation. Cloning a `HandlerRef` keeps that identity,
/// so the clone can later be used to unsubscribe.
#[derive(Clone)]
pub struct HandlerRef(Arc<dyn EventHandler>);

impl HandlerRef {
    /// Wraps a handler in a new reference with its own identity.
    pub fn new<H: EventHandler + 'static>(handler: H) -> Self {
        Self(Arc::new(handler))
    }

    /// Wraps a closure in a new reference.
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(&Event) + Send + Sync + 'static,
    {
        Self::new(HandlerFn::new(f))
    }

    /// Invokes the underlying handler.
    #[inline]
    pub fn handle_event(&self, event: &Event) {
        self.0.handle_event(event)
    }

    /// Name of the underlying handler.
    pub fn name(&self) -> &str {
        self.0.name()
    }

    /// Address of the shared allocation, used as the identity.
    pub fn id(&self) -> usize {
        Arc::as_ptr(&self.0) as *const () as usize
    }
}

/// Wraps a closure into a [`HandlerRef`].
///
/// ```rust
/// use tagbus::{handler_fn, Dispatcher, Event};
///
/// let dispatcher = Dispatcher::new();
/// dispatcher.subscribe("foo", [handler_fn(|event: &Event| println!("{}", event.tag()))]);
/// dispatcher.publish_sync(&Event::new("foo", None));
/// ```
pub fn handler_fn<F>(f: F) -> HandlerRef
where
    F: Fn(&Event) + Send + Sync + 'static,
{
    HandlerRef::from_fn(f)
}

impl PartialEq for HandlerRef {
    fn eq(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}

impl Eq for HandlerRef {}

impl fmt::Debug for HandlerRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{:#x}", self.name(), self.id())
    }
}

impl<H: EventHandler + 'static> From<Arc<H>> for HandlerRef {
    fn from(handler: Arc<H>) -> Self {
        Self(handler)
    }
}

impl From<Arc<dyn EventHandler>> for HandlerRef {
    fn from(handler: Arc<dyn EventHandler>) -> Self {
        Self(handler)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Counting(AtomicUsize);

    impl EventHandler for Counting {
        fn handle_event(&self, _event: &Event) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn test_identity_equality() {
        let a = HandlerRef::new(Counting(AtomicUsize::new(0)));
        let b = HandlerRef::new(Counting(AtomicUsize::new(0)));

        assert_eq!(a, a.clone());
        assert_ne!(a, b);
    }

    #[test]
    fn test_shared_arc_keeps_identity() {
        let counting = Arc::new(Counting(AtomicUsize::new(0)));
        let a = HandlerRef::from(counting.clone());
        let b = HandlerRef::from(counting.clone());

        assert_eq!(a, b);
        a.handle_event(&Event::new("foo", None));
        b.handle_event(&Event::new("foo", None));
        assert_eq!(counting.0.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_handler_names() {
        let counting = HandlerRef::new(Counting(AtomicUsize::new(0)));
        assert!(counting.name().ends_with("Counting"));

        let named = HandlerRef::new(HandlerFn::new(|_: &Event| {}).named("greeter"));
        assert_eq!(named.name(), "greeter");
        assert!(format!("{named:?}").starts_with("greeter@0x"));
    }
}
