//! Outbound events for the presentation layer.
//!
//! Subsystems append `GameEvent`s to an `EventQueue` owned by the session;
//! the presentation drains the queue after each command. This keeps
//! emission order independent of whatever the listeners do with it.

mod event;
mod queue;

pub use event::GameEvent;
pub use queue::EventQueue;
