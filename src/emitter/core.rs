//! # The emitter: registration, emission, lifecycle.
//!
//! [`Emitter`] owns the three handler registries (exact, pattern, wildcard)
//! and drives synchronous dispatch. Handles are cheap to clone and share one
//! underlying instance, so an emitter can be captured by its own handlers.
//!
//! ## Dispatch rules
//! - One `enabled` check per `emit` call; a disabled emitter makes the whole
//!   call a no-op.
//! - Per emitted key, the candidate set is **fixed when dispatch for that key
//!   begins**: handlers bound from inside a running handler never fire in the
//!   pass that triggered them.
//! - Handlers unbound mid-pass are skipped if their turn had not yet come.
//! - One-shot entries are filtered only **after** the pass, so `listeners()`
//!   observed from inside a callback still contains the running handler.
//! - Wildcard, pattern, and exact entries interleave strictly by bind order,
//!   not by registry kind.
//! - The registry lock is never held across a handler invocation, so handlers
//!   may freely call `on`/`off`/`emit` on the same emitter (synchronous
//!   reentrancy). A panicking handler unwinds to the `emit` caller.
//!
//! ## Hierarchy
//! An emitter may be created as a [`child`](Emitter::child) of another. After
//! local dispatch finishes for every key of an `emit` call, the same emission
//! is re-run on the parent (bottom-up propagation, honoring the parent's own
//! gate and registries). The child holds only a weak back-reference; the
//! parent's child list is what keeps children reachable for cascading
//! [`kill`](Emitter::kill).

use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use serde_json::Value;

use crate::error::EmitterError;
use crate::events::{Event, EventKey, KeySpec, KILL_EVENT};
use crate::handlers::{Handler, Scope};

use super::options::BindOptions;
use super::registry::Registry;

/// Synchronous event dispatcher.
///
/// All methods take `&self`; mutation is serialized by a per-instance mutex
/// so the single-threaded dispatch semantics hold under concurrent callers.
///
/// # Example
/// ```
/// use herald::{Emitter, Handler};
///
/// let e = Emitter::new();
/// let h = Handler::from_fn(|ev, _| println!("{} -> {}", ev.key(), ev.data()));
/// e.on("doc:saved", h).unwrap();
/// e.emit_with("doc:saved", serde_json::json!({ "id": 3 })).unwrap();
/// ```
#[derive(Clone)]
pub struct Emitter {
    inner: Arc<Inner>,
}

struct Inner {
    registry: Mutex<Registry>,
    enabled: AtomicBool,
    killed: AtomicBool,
    parent: Mutex<Weak<Inner>>,
    children: Mutex<Vec<Emitter>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn empty_data() -> Value {
    Value::Object(serde_json::Map::new())
}

pub(crate) fn validate_keys<'a>(
    keys: impl IntoIterator<Item = &'a EventKey>,
) -> Result<(), EmitterError> {
    for key in keys {
        if key.as_str() == Some("") {
            return Err(EmitterError::invalid("empty event name"));
        }
    }
    Ok(())
}

impl Emitter {
    /// Creates a standalone emitter (enabled, empty registries, no parent).
    #[must_use]
    pub fn new() -> Self {
        Emitter {
            inner: Arc::new(Inner {
                registry: Mutex::new(Registry::default()),
                enabled: AtomicBool::new(true),
                killed: AtomicBool::new(false),
                parent: Mutex::new(Weak::new()),
                children: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Creates a child emitter whose emissions propagate to `self` after
    /// local dispatch.
    ///
    /// The child keeps only a weak back-reference; `self` records the child
    /// in its child list so [`kill`](Emitter::kill) can cascade.
    pub fn child(&self) -> Result<Emitter, EmitterError> {
        self.ensure_live()?;
        let child = Emitter::new();
        *lock(&child.inner.parent) = Arc::downgrade(&self.inner);
        lock(&self.inner.children).push(child.clone());
        Ok(child)
    }

    /// Identity test: do both handles share one underlying emitter?
    pub fn same(&self, other: &Emitter) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// The parent emitter, if this one was created via [`child`](Emitter::child)
    /// and the parent is still alive.
    pub fn parent(&self) -> Option<Emitter> {
        lock(&self.inner.parent)
            .upgrade()
            .map(|inner| Emitter { inner })
    }

    // ---- Registration ----

    /// Binds a handler to the given key specification.
    ///
    /// Accepts a single key, a key list, a pattern (matched against the
    /// string form of each emitted key at emission time), or
    /// [`KeySpec::Any`] for a catch-all binding.
    pub fn on(
        &self,
        keys: impl Into<KeySpec>,
        handler: Handler,
    ) -> Result<&Self, EmitterError> {
        self.bind(keys.into(), handler, BindOptions::new())?;
        Ok(self)
    }

    /// Binds a handler with explicit [`BindOptions`].
    pub fn on_with(
        &self,
        keys: impl Into<KeySpec>,
        handler: Handler,
        opts: BindOptions,
    ) -> Result<&Self, EmitterError> {
        self.bind(keys.into(), handler, opts)?;
        Ok(self)
    }

    /// Binds a handler that is removed after its first firing.
    pub fn once(
        &self,
        keys: impl Into<KeySpec>,
        handler: Handler,
    ) -> Result<&Self, EmitterError> {
        self.bind(keys.into(), handler, BindOptions::once())?;
        Ok(self)
    }

    /// Like [`once`](Emitter::once), with the remaining options explicit.
    /// The one-shot flag is forced on regardless of `opts.once`.
    pub fn once_with(
        &self,
        keys: impl Into<KeySpec>,
        handler: Handler,
        mut opts: BindOptions,
    ) -> Result<&Self, EmitterError> {
        opts.once = true;
        self.bind(keys.into(), handler, opts)?;
        Ok(self)
    }

    /// Binds each `(key, handler)` pair, in iteration order.
    pub fn on_each(
        &self,
        bindings: impl IntoIterator<Item = (EventKey, Handler)>,
    ) -> Result<&Self, EmitterError> {
        self.on_each_with(bindings, BindOptions::new())
    }

    /// Binds each `(key, handler)` pair with shared options.
    pub fn on_each_with(
        &self,
        bindings: impl IntoIterator<Item = (EventKey, Handler)>,
        opts: BindOptions,
    ) -> Result<&Self, EmitterError> {
        self.ensure_live()?;
        let bindings: Vec<(EventKey, Handler)> = bindings.into_iter().collect();
        validate_keys(bindings.iter().map(|(k, _)| k))?;
        let mut registry = self.registry();
        for (key, handler) in bindings {
            registry.bind_key(key, handler, &opts);
        }
        Ok(self)
    }

    /// Binds each `(key, handler)` pair as a one-shot.
    pub fn once_each(
        &self,
        bindings: impl IntoIterator<Item = (EventKey, Handler)>,
    ) -> Result<&Self, EmitterError> {
        self.on_each_with(bindings, BindOptions::once())
    }

    fn bind(
        &self,
        spec: KeySpec,
        handler: Handler,
        opts: BindOptions,
    ) -> Result<(), EmitterError> {
        self.ensure_live()?;
        match &spec {
            KeySpec::One(key) => validate_keys([key])?,
            KeySpec::Many(keys) => validate_keys(keys)?,
            KeySpec::Pattern(_) | KeySpec::Any => {}
        }
        let mut registry = self.registry();
        match spec {
            KeySpec::One(key) => registry.bind_key(key, handler, &opts),
            KeySpec::Many(keys) => {
                for key in keys {
                    registry.bind_key(key, handler.clone(), &opts);
                }
            }
            KeySpec::Pattern(pattern) => registry.bind_pattern(pattern, handler, &opts),
            KeySpec::Any => registry.bind_wildcard(handler, &opts),
        }
        Ok(())
    }

    // ---- Removal ----

    /// Unbinds the handler from the given key specification.
    ///
    /// With [`KeySpec::Any`] only the wildcard registration is removed; with a
    /// pattern, only the registration bound to that identical pattern.
    /// Unbinding something never registered is a silent no-op.
    pub fn off(
        &self,
        keys: impl Into<KeySpec>,
        handler: &Handler,
    ) -> Result<&Self, EmitterError> {
        self.ensure_live()?;
        let mut registry = self.registry();
        match keys.into() {
            KeySpec::One(key) => registry.remove_key_handler(&key, handler),
            KeySpec::Many(keys) => {
                for key in keys {
                    registry.remove_key_handler(&key, handler);
                }
            }
            KeySpec::Pattern(pattern) => registry.remove_pattern_handler(&pattern, handler),
            KeySpec::Any => registry.remove_wildcard_handler(handler),
        }
        Ok(self)
    }

    /// Unbinds the handler from everywhere it appears: every exact-key
    /// registry, every pattern entry, and the wildcard registry.
    pub fn off_handler(&self, handler: &Handler) -> Result<&Self, EmitterError> {
        self.ensure_live()?;
        self.registry().remove_handler(handler);
        Ok(self)
    }

    /// Unbinds each `(key, handler)` pair.
    pub fn off_each(
        &self,
        bindings: impl IntoIterator<Item = (EventKey, Handler)>,
    ) -> Result<&Self, EmitterError> {
        self.ensure_live()?;
        let mut registry = self.registry();
        for (key, handler) in bindings {
            registry.remove_key_handler(&key, &handler);
        }
        Ok(self)
    }

    /// Removes **all** handlers registered for the given key(s), regardless
    /// of handler identity. Wildcard registrations are untouched; pattern
    /// registrations are only removed when the spec names their exact
    /// pattern, and [`KeySpec::Any`] clears the wildcard registry itself.
    pub fn off_key(&self, keys: impl Into<KeySpec>) -> Result<&Self, EmitterError> {
        self.ensure_live()?;
        let mut registry = self.registry();
        match keys.into() {
            KeySpec::One(key) => registry.remove_key(&key),
            KeySpec::Many(keys) => {
                for key in keys {
                    registry.remove_key(&key);
                }
            }
            KeySpec::Pattern(pattern) => registry.remove_pattern(&pattern),
            KeySpec::Any => registry.clear_wildcard(),
        }
        Ok(self)
    }

    /// Clears every registry, leaving the emitter as freshly constructed.
    /// The enabled gate and the parent/child links are untouched.
    pub fn unbind_all(&self) -> Result<&Self, EmitterError> {
        self.ensure_live()?;
        self.registry().clear();
        Ok(self)
    }

    // ---- Emission ----

    /// Emits the given key(s) with an empty payload.
    pub fn emit(&self, keys: impl Into<KeySpec>) -> Result<&Self, EmitterError> {
        self.emit_with(keys, empty_data())
    }

    /// Emits the given key(s) with a payload shared by every key.
    pub fn emit_with(
        &self,
        keys: impl Into<KeySpec>,
        data: Value,
    ) -> Result<&Self, EmitterError> {
        let keys = keys
            .into()
            .into_keys()
            .ok_or_else(|| EmitterError::invalid("emit requires concrete keys"))?;
        let pairs: Vec<(EventKey, Value)> =
            keys.into_iter().map(|k| (k, data.clone())).collect();
        self.emit_resolved(pairs)?;
        Ok(self)
    }

    /// Emits each `(key, payload)` pair, in iteration order.
    pub fn emit_each(
        &self,
        events: impl IntoIterator<Item = (EventKey, Value)>,
    ) -> Result<&Self, EmitterError> {
        self.emit_resolved(events.into_iter().collect())?;
        Ok(self)
    }

    fn emit_resolved(&self, pairs: Vec<(EventKey, Value)>) -> Result<(), EmitterError> {
        self.ensure_live()?;
        validate_keys(pairs.iter().map(|(k, _)| k))?;
        // The gate is checked once per emit invocation.
        if !self.is_enabled() {
            return Ok(());
        }
        for (key, data) in &pairs {
            self.dispatch_local(key, data);
        }
        // Bottom-up propagation: local dispatch for every key of this call
        // finishes before the event reaches the parent.
        if let Some(parent) = self.parent() {
            if !parent.is_killed() {
                parent.emit_resolved(pairs)?;
            }
        }
        Ok(())
    }

    /// Runs one dispatch pass for one key.
    ///
    /// The candidate set is snapshotted under the lock, then handlers run
    /// with the lock released. Before each invocation the entry's continued
    /// presence is re-checked so a mid-pass `off` suppresses handlers whose
    /// turn had not yet come. One-shot filtering is deferred to the end of
    /// the pass.
    fn dispatch_local(&self, key: &EventKey, data: &Value) {
        let snapshot = self.registry().candidates(key);
        if snapshot.is_empty() {
            return;
        }
        let event = Event::new(key.clone(), data.clone(), self.clone());
        let mut fired_once: Vec<u64> = Vec::new();
        for entry in snapshot {
            if !self.registry().contains(entry.seq) {
                continue;
            }
            let scope = match entry.scope {
                Some(value) => Scope::Value(value),
                None => Scope::Emitter(self.clone()),
            };
            entry.handler.call(&event, &scope);
            if entry.once {
                fired_once.push(entry.seq);
            }
        }
        self.registry().remove_seqs(&fired_once);
    }

    // ---- Queries and lifecycle ----

    /// Ordered snapshot of the handlers registered for the exact key.
    ///
    /// Pattern and wildcard registrations are not included, even when they
    /// would fire for this key.
    pub fn listeners(&self, key: impl Into<EventKey>) -> Vec<Handler> {
        self.registry().listeners(&key.into())
    }

    /// Ordered snapshot of the wildcard (catch-all) handlers.
    pub fn wildcard_listeners(&self) -> Vec<Handler> {
        self.registry().wildcard_listeners()
    }

    /// Opens the emission gate. Idempotent.
    pub fn enable(&self) -> &Self {
        self.inner.enabled.store(true, AtomicOrdering::SeqCst);
        self
    }

    /// Closes the emission gate: every `emit` becomes a no-op. Idempotent.
    pub fn disable(&self) -> &Self {
        self.inner.enabled.store(false, AtomicOrdering::SeqCst);
        self
    }

    /// Whether the emission gate is open.
    pub fn is_enabled(&self) -> bool {
        self.inner.enabled.load(AtomicOrdering::SeqCst)
    }

    /// Whether [`kill`](Emitter::kill) finalized this emitter.
    pub fn is_killed(&self) -> bool {
        self.inner.killed.load(AtomicOrdering::SeqCst)
    }

    /// Finalizes the emitter.
    ///
    /// In order: marks the instance terminal, notifies its own listeners via
    /// the reserved [`KILL_EVENT`] key (local dispatch only, honoring the
    /// enabled gate), detaches from the parent's child list, kills every
    /// child depth-first, then clears the registries. Afterwards every
    /// registration, removal, emission, or child-creation call fails with
    /// [`EmitterError::Killed`].
    ///
    /// The terminal flag is raised before the notification fires, so the
    /// instance is already terminal inside kill listeners: a listener that
    /// tries to re-register gets [`EmitterError::Killed`].
    pub fn kill(&self) -> Result<(), EmitterError> {
        self.ensure_live()?;
        self.inner.killed.store(true, AtomicOrdering::SeqCst);

        if self.is_enabled() {
            self.dispatch_local(&EventKey::name(KILL_EVENT), &empty_data());
        }

        if let Some(parent) = self.parent() {
            lock(&parent.inner.children).retain(|c| !c.same(self));
        }
        *lock(&self.inner.parent) = Weak::new();

        let children: Vec<Emitter> = lock(&self.inner.children).drain(..).collect();
        for child in children {
            // A kill listener may have already finalized the child.
            let _ = child.kill();
        }

        self.registry().clear();
        Ok(())
    }

    fn ensure_live(&self) -> Result<(), EmitterError> {
        if self.is_killed() {
            return Err(EmitterError::Killed);
        }
        Ok(())
    }

    fn registry(&self) -> MutexGuard<'_, Registry> {
        lock(&self.inner.registry)
    }
}

impl Default for Emitter {
    fn default() -> Self {
        Emitter::new()
    }
}

impl std::fmt::Debug for Emitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Emitter")
            .field("enabled", &self.is_enabled())
            .field("killed", &self.is_killed())
            .finish_non_exhaustive()
    }
}
