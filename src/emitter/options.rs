//! # Binding options.
//!
//! Options recognized when registering a handler: the one-shot flag and an
//! explicit execution scope. Unknown options cannot exist here — the struct
//! is the closed set the engine recognizes.

use std::any::Any;
use std::sync::Arc;

/// Options for a single binding.
///
/// # Example
/// ```
/// use std::sync::Arc;
/// use herald::{BindOptions, Emitter, Handler};
///
/// let e = Emitter::new();
/// let h = Handler::from_fn(|_, _| {});
/// e.on_with("boot", h, BindOptions::once().with_scope(Arc::new("ctx")))
///     .unwrap();
/// ```
#[derive(Clone, Default)]
pub struct BindOptions {
    /// Remove the binding after its first firing.
    pub once: bool,
    /// Execution context the handler observes as "self"; defaults to the
    /// dispatching emitter when absent.
    pub scope: Option<Arc<dyn Any + Send + Sync>>,
}

impl BindOptions {
    /// Default options: fire indefinitely, emitter as scope.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Options with the one-shot flag set.
    #[must_use]
    pub fn once() -> Self {
        Self {
            once: true,
            scope: None,
        }
    }

    /// Attaches an explicit execution scope.
    #[must_use]
    pub fn with_scope(mut self, scope: Arc<dyn Any + Send + Sync>) -> Self {
        self.scope = Some(scope);
        self
    }
}
