//! # The event value handed to handlers.
//!
//! An [`Event`] is built fresh for every key of every emission and discarded
//! once the handlers for that key have run; the engine never stores one. It
//! carries the matched key, the payload, and a handle to the emitter that
//! produced it (useful inside wildcard handlers, and inside hierarchies where
//! the same handler may observe events from several emitters).

use std::fmt;

use serde_json::Value;

use crate::emitter::Emitter;

use super::key::EventKey;

/// A dispatched event: matched key, payload, and producing emitter.
#[derive(Clone)]
pub struct Event {
    key: EventKey,
    data: Value,
    source: Emitter,
}

impl Event {
    pub(crate) fn new(key: EventKey, data: Value, source: Emitter) -> Self {
        Self { key, data, source }
    }

    /// The key this event was announced under.
    ///
    /// For pattern and wildcard handlers this is the concrete emitted key,
    /// not the pattern the handler was bound with.
    pub fn key(&self) -> &EventKey {
        &self.key
    }

    /// The payload. Defaults to an empty JSON object when the emission
    /// supplied none.
    pub fn data(&self) -> &Value {
        &self.data
    }

    /// The emitter that dispatched this event.
    ///
    /// During hierarchical propagation each level re-dispatches locally, so a
    /// handler on a parent sees the **parent** as source, not the child the
    /// emission started from.
    pub fn source(&self) -> &Emitter {
        &self.source
    }
}

impl fmt::Debug for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Event")
            .field("key", &self.key)
            .field("data", &self.data)
            .finish_non_exhaustive()
    }
}
