//! # Event keys, key specifications, and the event value.
//!
//! - [`EventKey`] identifies what is being announced: a textual name or an
//!   opaque process-unique symbol.
//! - [`KeySpec`] is the normalized form of every polymorphic key argument
//!   (one key, many keys, a pattern, or the wildcard).
//! - [`Event`] is the ephemeral value handlers receive: matched key, payload,
//!   and producing emitter.
//! - [`KILL_EVENT`] is the reserved lifecycle key dispatched by
//!   [`Emitter::kill`](crate::Emitter::kill).

mod event;
mod key;

pub use event::Event;
pub use key::{EventKey, KeySpec, KILL_EVENT};
