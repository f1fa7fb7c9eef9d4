//! # tagbus
//!
//! A small in-process publish/subscribe event dispatcher. Handlers subscribe
//! to string tags; publishers send tagged key-value events either
//! synchronously or asynchronously.
//!
//! ## Key Features
//!
//! - **Tag routing**: every event carries a tag, and only handlers
//!   subscribed to that tag receive it
//! - **Two publish modes**: [`Dispatcher::publish_sync`] blocks until every
//!   handler ran in subscription order; [`Dispatcher::publish`] runs handlers
//!   concurrently and returns a [`Completion`] immediately
//! - **Failure isolation**: a panicking handler never reaches the publisher
//!   or its sibling handlers; the failure is reported to an optional
//!   [`FailureLogger`]
//! - **Identity-based subscriptions**: subscribing the same [`HandlerRef`]
//!   twice to a tag registers it once
//!
//! ## Usage Examples
//!
//! ### Instance API
//!
//! ```rust
//! use tagbus::{handler_fn, Dispatcher, Event, TracingLogger};
//!
//! let dispatcher = Dispatcher::new();
//! dispatcher.with_logger(TracingLogger::with_prefix("bus: "));
//!
//! let greeter = handler_fn(|event: &Event| {
//!     if let Some(name) = event.get("name") {
//!         println!("hello {name}");
//!     }
//! });
//! dispatcher.subscribe("player:joined", [greeter.clone()]);
//!
//! let event = Event::new("player:joined", None).with("name", "alice");
//! dispatcher.publish_sync(&event);
//! dispatcher.publish(event).wait();
//!
//! dispatcher.unsubscribe("player:joined", &[greeter]);
//! ```
//!
//! ### Default instance
//!
//! ```rust
//! use tagbus::{global, handler_fn, Event};
//!
//! global::subscribe("tick", [handler_fn(|_: &Event| {})]);
//! global::publish_sync(&Event::new("tick", None));
//! global::unsubscribe("tick", &[]);
//! ```

pub mod dispatcher;
pub mod error;
pub mod event;
pub mod global;
pub mod handler;
pub mod logger;

// Re-exports for convenience
pub use dispatcher::{Completion, Dispatcher};
pub use error::{panic_message, HandlerPanic};
pub use event::{Event, EventData};
pub use handler::{handler_fn, EventHandler, HandlerFn, HandlerRef};
pub use logger::{FailureLogger, TracingLogger};

/// Crate version
pub const TAGBUS_VERSION: &str = env!("CARGO_PKG_VERSION");
