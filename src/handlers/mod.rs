//! # Event handlers.
//!
//! This module provides the [`Handle`] trait, the clonable [`Handler`]
//! reference the registries store, and the [`Scope`] value handlers receive
//! as execution context.
//!
//! ## Flow
//! ```text
//!   emit(key, data)
//!       │            one Event per key
//!       ├──► exact entries ────┐
//!       ├──► pattern entries ──┼── stable merge by bind order ──► Handler::call(&Event, &Scope)
//!       └──► wildcard entries ─┘
//! ```
//!
//! ## Implementing custom handlers
//! ```
//! use herald::{Emitter, Handle, Handler, Event, Scope};
//!
//! struct Metrics;
//!
//! impl Handle for Metrics {
//!     fn on_event(&self, event: &Event, _scope: &Scope) {
//!         if event.key().as_str() == Some("task:failed") {
//!             // increment failure counter
//!         }
//!     }
//! }
//!
//! let e = Emitter::new();
//! e.on("task:failed", Handler::new(Metrics)).unwrap();
//! ```

mod handler;
#[cfg(feature = "logging")]
mod log;

pub use handler::{Handle, Handler, Scope};
#[cfg(feature = "logging")]
pub use log::LogWriter;
