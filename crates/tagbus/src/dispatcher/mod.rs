/// Dispatcher module - registry, subscription management and publish protocols
mod completion;
mod core;
mod publish;
mod registry;

pub use completion::Completion;
pub use core::Dispatcher;
