//! Request middleware.
//!
//! [`Trace`] gives every request a trace identifier shared by its log events,
//! error payloads and any webhook deliveries it triggers.

pub mod trace;

pub use trace::Trace;
