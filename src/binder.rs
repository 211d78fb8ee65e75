//! # Binder: batching façade for mass enable/disable.
//!
//! A [`Binder`] manages a group of bindings against one emitter without
//! losing track of them: [`disable`](Binder::disable) unregisters every
//! managed binding from the emitter while keeping the shadow list, and
//! [`enable`](Binder::enable) registers them all again. It delegates to the
//! emitter's own registry and dispatch; it adds no algorithm of its own.
//!
//! While inactive, `on`/`off` calls update only the shadow list; the next
//! `enable` replays the accumulated state.
//!
//! ## Example
//! ```
//! use herald::{Emitter, Handler};
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use std::sync::Arc;
//!
//! let e = Emitter::new();
//! let count = Arc::new(AtomicUsize::new(0));
//! let c = Arc::clone(&count);
//! let h = Handler::from_fn(move |_, _| { c.fetch_add(1, Ordering::SeqCst); });
//!
//! let mut binder = e.binder();
//! binder.on("tick", h).unwrap();
//! e.emit("tick").unwrap();
//!
//! binder.disable().unwrap();       // group gone from the emitter
//! e.emit("tick").unwrap();
//!
//! binder.enable().unwrap();        // group back, nothing forgotten
//! e.emit("tick").unwrap();
//! assert_eq!(count.load(Ordering::SeqCst), 2);
//! ```

use crate::emitter::{validate_keys, BindOptions, Emitter};
use crate::error::EmitterError;
use crate::events::{EventKey, KeySpec};
use crate::handlers::Handler;

/// One managed binding: normalized key spec, handler, options.
///
/// Key lists are flattened into per-key entries at `on` time so removal can
/// work key by key.
struct ShadowBinding {
    keys: KeySpec,
    handler: Handler,
    opts: BindOptions,
}

impl ShadowBinding {
    fn matches_key(&self, key: &EventKey, handler: &Handler) -> bool {
        matches!(&self.keys, KeySpec::One(k) if k == key) && self.handler.same(handler)
    }
}

/// Batching façade over an [`Emitter`].
pub struct Binder {
    emitter: Emitter,
    shadow: Vec<ShadowBinding>,
    active: bool,
}

impl Emitter {
    /// Creates a [`Binder`] managing a (initially empty) group of bindings
    /// against this emitter.
    #[must_use]
    pub fn binder(&self) -> Binder {
        Binder {
            emitter: self.clone(),
            shadow: Vec::new(),
            active: true,
        }
    }
}

impl Binder {
    /// The emitter this binder manages bindings against.
    pub fn emitter(&self) -> &Emitter {
        &self.emitter
    }

    /// Whether the managed group is currently registered on the emitter.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Binds a handler through the binder. Mirrors
    /// [`Emitter::on`](crate::Emitter::on) and records the binding in the
    /// shadow list.
    pub fn on(
        &mut self,
        keys: impl Into<KeySpec>,
        handler: Handler,
    ) -> Result<&mut Self, EmitterError> {
        self.bind(keys.into(), handler, BindOptions::new())
    }

    /// Binds a handler with explicit options.
    pub fn on_with(
        &mut self,
        keys: impl Into<KeySpec>,
        handler: Handler,
        opts: BindOptions,
    ) -> Result<&mut Self, EmitterError> {
        self.bind(keys.into(), handler, opts)
    }

    /// Binds a one-shot handler.
    ///
    /// Note the shadow list keeps the binding even after it fires, so a later
    /// `disable`/`enable` cycle arms the one-shot again.
    pub fn once(
        &mut self,
        keys: impl Into<KeySpec>,
        handler: Handler,
    ) -> Result<&mut Self, EmitterError> {
        self.bind(keys.into(), handler, BindOptions::once())
    }

    /// Binds each `(key, handler)` pair, in iteration order.
    pub fn on_each(
        &mut self,
        bindings: impl IntoIterator<Item = (EventKey, Handler)>,
    ) -> Result<&mut Self, EmitterError> {
        for (key, handler) in bindings {
            self.bind(KeySpec::One(key), handler, BindOptions::new())?;
        }
        Ok(self)
    }

    fn bind(
        &mut self,
        spec: KeySpec,
        handler: Handler,
        opts: BindOptions,
    ) -> Result<&mut Self, EmitterError> {
        if self.active {
            self.emitter.on_with(spec.clone(), handler.clone(), opts.clone())?;
        } else {
            match &spec {
                KeySpec::One(key) => validate_keys([key])?,
                KeySpec::Many(keys) => validate_keys(keys)?,
                KeySpec::Pattern(_) | KeySpec::Any => {}
            }
        }
        // Flatten key lists so off() can remove key by key.
        match spec {
            KeySpec::Many(keys) => {
                for key in keys {
                    self.shadow.push(ShadowBinding {
                        keys: KeySpec::One(key),
                        handler: handler.clone(),
                        opts: opts.clone(),
                    });
                }
            }
            spec => self.shadow.push(ShadowBinding {
                keys: spec,
                handler,
                opts,
            }),
        }
        Ok(self)
    }

    /// Unbinds the handler from the given key(s), in the shadow list and (if
    /// active) on the emitter. A no-op for bindings this binder never made.
    pub fn off(
        &mut self,
        keys: impl Into<KeySpec>,
        handler: &Handler,
    ) -> Result<&mut Self, EmitterError> {
        let spec = keys.into();
        if self.active {
            self.emitter.off(spec.clone(), handler)?;
        }
        match spec {
            KeySpec::One(key) => {
                self.shadow.retain(|b| !b.matches_key(&key, handler));
            }
            KeySpec::Many(keys) => {
                for key in keys {
                    self.shadow.retain(|b| !b.matches_key(&key, handler));
                }
            }
            KeySpec::Pattern(pattern) => {
                self.shadow.retain(|b| {
                    !(matches!(&b.keys, KeySpec::Pattern(p) if p.as_str() == pattern.as_str())
                        && b.handler.same(handler))
                });
            }
            KeySpec::Any => {
                self.shadow
                    .retain(|b| !(matches!(b.keys, KeySpec::Any) && b.handler.same(handler)));
            }
        }
        Ok(self)
    }

    /// Unbinds the handler from every binding this binder manages.
    pub fn off_handler(&mut self, handler: &Handler) -> Result<&mut Self, EmitterError> {
        if self.active {
            for binding in self.shadow.iter().filter(|b| b.handler.same(handler)) {
                self.emitter.off(binding.keys.clone(), handler)?;
            }
        }
        self.shadow.retain(|b| !b.handler.same(handler));
        Ok(self)
    }

    /// Drops every managed binding for the given key(s), regardless of
    /// handler identity.
    pub fn off_key(&mut self, keys: impl Into<KeySpec>) -> Result<&mut Self, EmitterError> {
        let resolved = match keys.into() {
            KeySpec::One(key) => vec![key],
            KeySpec::Many(keys) => keys,
            spec @ (KeySpec::Pattern(_) | KeySpec::Any) => {
                // Symmetric with Emitter::off_key: drop the matching
                // pattern/wildcard bindings of this group.
                let mut doomed = Vec::new();
                self.shadow.retain(|b| {
                    let hit = match (&spec, &b.keys) {
                        (KeySpec::Pattern(p), KeySpec::Pattern(q)) => p.as_str() == q.as_str(),
                        (KeySpec::Any, KeySpec::Any) => true,
                        _ => false,
                    };
                    if hit {
                        doomed.push((b.keys.clone(), b.handler.clone()));
                    }
                    !hit
                });
                if self.active {
                    for (keys, handler) in doomed {
                        self.emitter.off(keys, &handler)?;
                    }
                }
                return Ok(self);
            }
        };
        for key in resolved {
            let mut doomed = Vec::new();
            self.shadow.retain(|b| {
                let hit = matches!(&b.keys, KeySpec::One(k) if *k == key);
                if hit {
                    doomed.push(b.handler.clone());
                }
                !hit
            });
            if self.active {
                for handler in doomed {
                    self.emitter.off(KeySpec::One(key.clone()), &handler)?;
                }
            }
        }
        Ok(self)
    }

    /// Forgets every managed binding, removing the registered ones from the
    /// emitter. Bindings made on the emitter outside this binder are
    /// untouched, unless one aliases a managed binding (same key, same
    /// handler): removal goes through [`Emitter::off`], which strips every
    /// entry for that pair.
    pub fn unbind_all(&mut self) -> Result<&mut Self, EmitterError> {
        if self.active {
            for binding in &self.shadow {
                self.emitter.off(binding.keys.clone(), &binding.handler)?;
            }
        }
        self.shadow.clear();
        Ok(self)
    }

    /// Unregisters every managed binding from the emitter without forgetting
    /// it. Idempotent.
    ///
    /// Shares [`unbind_all`](Binder::unbind_all)'s caveat: a direct emitter
    /// binding that aliases a managed one (same key, same handler) is
    /// removed along with it.
    pub fn disable(&mut self) -> Result<&mut Self, EmitterError> {
        if !self.active {
            return Ok(self);
        }
        for binding in &self.shadow {
            self.emitter.off(binding.keys.clone(), &binding.handler)?;
        }
        self.active = false;
        Ok(self)
    }

    /// Re-registers every managed binding against the emitter. Idempotent.
    pub fn enable(&mut self) -> Result<&mut Self, EmitterError> {
        if self.active {
            return Ok(self);
        }
        for binding in &self.shadow {
            self.emitter.on_with(
                binding.keys.clone(),
                binding.handler.clone(),
                binding.opts.clone(),
            )?;
        }
        self.active = true;
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};
    use std::sync::Arc;

    fn counter() -> (Arc<AtomicUsize>, Handler) {
        let count = Arc::new(AtomicUsize::new(0));
        let c = Arc::clone(&count);
        let handler = Handler::from_fn(move |_, _| {
            c.fetch_add(1, AtomicOrdering::SeqCst);
        });
        (count, handler)
    }

    #[test]
    fn test_binder_on_binds_to_the_emitter() {
        let e = Emitter::new();
        let (count, h) = counter();
        let mut binder = e.binder();
        binder.on("evt", h).unwrap();
        e.emit("evt").unwrap();
        assert_eq!(count.load(AtomicOrdering::SeqCst), 1);
    }

    #[test]
    fn test_binder_off_unbinds_from_the_emitter() {
        let e = Emitter::new();
        let (count, h) = counter();
        let mut binder = e.binder();
        binder.on("evt", h.clone()).unwrap();
        binder.off("evt", &h).unwrap();
        e.emit("evt").unwrap();
        assert_eq!(count.load(AtomicOrdering::SeqCst), 0);
    }

    #[test]
    fn test_disable_enable_round_trip() {
        let e = Emitter::new();
        let (count, h) = counter();
        let mut binder = e.binder();
        binder.on("evt", h).unwrap();

        binder.disable().unwrap();
        binder.disable().unwrap(); // idempotent
        e.emit("evt").unwrap();
        assert_eq!(count.load(AtomicOrdering::SeqCst), 0);

        binder.enable().unwrap();
        binder.enable().unwrap(); // idempotent
        e.emit("evt").unwrap();
        assert_eq!(count.load(AtomicOrdering::SeqCst), 1);
    }

    #[test]
    fn test_disable_spares_unmanaged_bindings() {
        let e = Emitter::new();
        let (managed_count, managed) = counter();
        let (outside_count, outside) = counter();
        e.on("evt", outside).unwrap();

        let mut binder = e.binder();
        binder.on("evt", managed).unwrap();
        binder.disable().unwrap();

        e.emit("evt").unwrap();
        assert_eq!(managed_count.load(AtomicOrdering::SeqCst), 0);
        assert_eq!(outside_count.load(AtomicOrdering::SeqCst), 1);
    }

    #[test]
    fn test_disable_removes_aliased_direct_binding() {
        let e = Emitter::new();
        let (count, h) = counter();
        let mut binder = e.binder();
        binder.on("evt", h.clone()).unwrap();
        // same key, same handler, bound outside the binder
        e.on("evt", h).unwrap();

        binder.disable().unwrap();
        e.emit("evt").unwrap();
        assert_eq!(count.load(AtomicOrdering::SeqCst), 0);
    }

    #[test]
    fn test_bind_shapes() {
        let e = Emitter::new();
        let (count, h) = counter();
        let mut binder = e.binder();

        binder.on(["a", "b"], h.clone()).unwrap();
        binder.on(KeySpec::Any, h.clone()).unwrap();
        binder
            .on_each([(EventKey::name("c"), h.clone())])
            .unwrap();

        e.emit(["a", "b", "c"]).unwrap();
        // keyed a, b, c plus the wildcard firing for all three
        assert_eq!(count.load(AtomicOrdering::SeqCst), 6);

        binder.disable().unwrap();
        e.emit(["a", "b", "c"]).unwrap();
        assert_eq!(count.load(AtomicOrdering::SeqCst), 6);
    }

    #[test]
    fn test_unbind_shapes() {
        let e = Emitter::new();
        let (count, h) = counter();
        let mut binder = e.binder();

        binder.on("evt", h.clone()).unwrap();
        binder.off(["evt", "other"], &h).unwrap();
        e.emit("evt").unwrap();

        binder.on("evt", h.clone()).unwrap();
        binder.off_key("evt").unwrap();
        e.emit("evt").unwrap();

        binder.on("evt", h.clone()).unwrap();
        binder.off_handler(&h).unwrap();
        e.emit("evt").unwrap();

        binder.on("evt", h.clone()).unwrap();
        binder.unbind_all().unwrap();
        e.emit("evt").unwrap();

        assert_eq!(count.load(AtomicOrdering::SeqCst), 0);
    }

    #[test]
    fn test_mutations_while_inactive_apply_on_enable() {
        let e = Emitter::new();
        let (count, h) = counter();
        let mut binder = e.binder();
        binder.disable().unwrap();

        binder.on("evt", h).unwrap();
        e.emit("evt").unwrap();
        assert_eq!(count.load(AtomicOrdering::SeqCst), 0);

        binder.enable().unwrap();
        e.emit("evt").unwrap();
        assert_eq!(count.load(AtomicOrdering::SeqCst), 1);
    }

    #[test]
    fn test_enable_rearms_once_bindings() {
        let e = Emitter::new();
        let (count, h) = counter();
        let mut binder = e.binder();
        binder.once("evt", h).unwrap();

        e.emit("evt").unwrap();
        e.emit("evt").unwrap();
        assert_eq!(count.load(AtomicOrdering::SeqCst), 1);

        binder.disable().unwrap();
        binder.enable().unwrap();
        e.emit("evt").unwrap();
        e.emit("evt").unwrap();
        assert_eq!(count.load(AtomicOrdering::SeqCst), 2);
    }

    #[test]
    fn test_binder_surfaces_killed_emitter() {
        let e = Emitter::new();
        let (_, h) = counter();
        let mut binder = e.binder();
        e.kill().unwrap();
        assert!(matches!(binder.on("evt", h), Err(EmitterError::Killed)));
    }
}
