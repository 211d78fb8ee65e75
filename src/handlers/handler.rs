//! # Core handler trait and the handler reference type.
//!
//! [`Handle`] is the extension point for plugging code into an emitter. It is
//! blanket-implemented for closures, so most callers never implement it by
//! hand:
//!
//! ```
//! use herald::{Emitter, Handler};
//!
//! let e = Emitter::new();
//! let h = Handler::from_fn(|ev, _scope| {
//!     println!("got {}", ev.key());
//! });
//! e.on("ping", h).unwrap();
//! e.emit("ping").unwrap();
//! ```
//!
//! ## Identity
//! Removal and duplicate detection work on **reference identity**, not value
//! equality: two closures with byte-identical code are two distinct
//! registrations. Keep a clone of the [`Handler`] around if you intend to
//! unbind it later; [`Handler::same`] is the identity test the engine uses.
//!
//! ## Scope
//! Each invocation receives a [`Scope`]: the context the handler should treat
//! as "self". By default that is the dispatching emitter; a binding may carry
//! an explicit scope value instead (see
//! [`BindOptions::with_scope`](crate::BindOptions::with_scope)).

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::emitter::Emitter;
use crate::events::Event;

/// Contract for event handlers.
///
/// Invoked synchronously, on the emitting thread, with no isolation: a panic
/// unwinds to the `emit` caller.
pub trait Handle: Send + Sync {
    /// Handle a single dispatched event.
    ///
    /// # Parameters
    /// - `event`: the dispatched event (shared across all handlers of one key)
    /// - `scope`: the execution context recorded at bind time
    fn on_event(&self, event: &Event, scope: &Scope);
}

impl<F> Handle for F
where
    F: Fn(&Event, &Scope) + Send + Sync,
{
    fn on_event(&self, event: &Event, scope: &Scope) {
        self(event, scope)
    }
}

/// A cheaply clonable reference to a [`Handle`] implementation.
///
/// Clones share identity: `h.clone()` still compares [`same`](Handler::same)
/// to `h`, so the clone can be used to unbind the original registration.
#[derive(Clone)]
pub struct Handler(Arc<dyn Handle>);

impl Handler {
    /// Wraps a [`Handle`] implementation.
    pub fn new(handle: impl Handle + 'static) -> Self {
        Handler(Arc::new(handle))
    }

    /// Wraps a closure.
    pub fn from_fn(f: impl Fn(&Event, &Scope) + Send + Sync + 'static) -> Self {
        Handler(Arc::new(f))
    }

    /// Reference-identity test: do the two values name the same registration?
    ///
    /// # Example
    /// ```
    /// use herald::Handler;
    ///
    /// let a = Handler::from_fn(|_, _| {});
    /// let b = Handler::from_fn(|_, _| {});
    /// assert!(a.same(&a.clone()));
    /// assert!(!a.same(&b));
    /// ```
    pub fn same(&self, other: &Handler) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Invokes the underlying callable.
    pub(crate) fn call(&self, event: &Event, scope: &Scope) {
        self.0.on_event(event, scope);
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handler({:p})", Arc::as_ptr(&self.0))
    }
}

/// The execution context a handler observes as "self" when invoked.
pub enum Scope {
    /// Default: the emitter that dispatched the event.
    Emitter(Emitter),
    /// An explicit scope value supplied at bind time.
    Value(Arc<dyn Any + Send + Sync>),
}

impl Scope {
    /// Downcasts an explicit scope value to a concrete type.
    ///
    /// Returns `None` for the default emitter scope and for type mismatches.
    ///
    /// # Example
    /// ```
    /// use std::sync::Arc;
    /// use herald::{BindOptions, Emitter, Handler};
    ///
    /// struct Widget { id: u32 }
    ///
    /// let e = Emitter::new();
    /// let h = Handler::from_fn(|_ev, scope| {
    ///     let widget = scope.value_as::<Widget>().unwrap();
    ///     assert_eq!(widget.id, 7);
    /// });
    /// e.on_with("draw", h, BindOptions::new().with_scope(Arc::new(Widget { id: 7 })))
    ///     .unwrap();
    /// e.emit("draw").unwrap();
    /// ```
    pub fn value_as<T: Any + Send + Sync>(&self) -> Option<&T> {
        match self {
            Scope::Emitter(_) => None,
            Scope::Value(value) => value.downcast_ref::<T>(),
        }
    }

    /// The dispatching emitter, when no explicit scope was bound.
    pub fn emitter(&self) -> Option<&Emitter> {
        match self {
            Scope::Emitter(emitter) => Some(emitter),
            Scope::Value(_) => None,
        }
    }
}

impl fmt::Debug for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::Emitter(_) => f.write_str("Scope::Emitter"),
            Scope::Value(_) => f.write_str("Scope::Value"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clone_preserves_identity() {
        let h = Handler::from_fn(|_, _| {});
        assert!(h.same(&h.clone()));
    }

    #[test]
    fn test_distinct_closures_are_distinct_handlers() {
        let a = Handler::from_fn(|_, _| {});
        let b = Handler::from_fn(|_, _| {});
        assert!(!a.same(&b));
    }

    #[test]
    fn test_scope_downcast() {
        let scope = Scope::Value(Arc::new(41_u32));
        assert_eq!(scope.value_as::<u32>(), Some(&41));
        assert_eq!(scope.value_as::<String>(), None);
        assert!(scope.emitter().is_none());
    }
}
