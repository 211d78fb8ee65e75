//! # LogWriter — simple event reporter
//!
//! A minimal handler that reports every dispatched event through `tracing`.
//! Use it for tests or demos: bind it as a wildcard handler and every
//! emission shows up in the log stream.
//!
//! ## Example output
//! ```text
//! INFO herald::handlers::log: event key="save" data={"doc":3}
//! INFO herald::handlers::log: event key="emitter:kill" data={}
//! ```

use tracing::info;

use crate::events::Event;

use super::handler::{Handle, Scope};

/// Event reporter handler.
#[derive(Default)]
pub struct LogWriter;

impl LogWriter {
    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Handle for LogWriter {
    fn on_event(&self, event: &Event, _scope: &Scope) {
        info!(key = %event.key(), data = %event.data(), "event");
    }
}
