//! # Handler registries.
//!
//! Three registries back one emitter: exact-key entries, pattern entries, and
//! wildcard entries. Every entry carries a per-emitter monotonic sequence
//! number assigned at bind time; that number, not the registry kind, defines
//! the firing order when several registries contribute candidates for one
//! emitted key ("guarantee binding order").
//!
//! The registry is pure bookkeeping: it never invokes anything. Dispatch
//! (snapshotting, scope resolution, once-filtering, propagation) lives in
//! [`core`](super::core).

use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

use regex::Regex;

use crate::events::EventKey;
use crate::handlers::Handler;

use super::options::BindOptions;

/// One registered binding.
#[derive(Clone)]
pub(crate) struct Entry {
    /// Per-emitter registration sequence number; defines global firing order.
    pub seq: u64,
    pub handler: Handler,
    pub scope: Option<Arc<dyn Any + Send + Sync>>,
    pub once: bool,
}

struct PatternEntry {
    pattern: Regex,
    entry: Entry,
}

/// Registries of one emitter, guarded by the instance mutex in `core`.
#[derive(Default)]
pub(crate) struct Registry {
    by_key: HashMap<EventKey, Vec<Entry>>,
    patterns: Vec<PatternEntry>,
    wildcard: Vec<Entry>,
    next_seq: u64,
}

impl Registry {
    fn entry(&mut self, handler: Handler, opts: &BindOptions) -> Entry {
        let seq = self.next_seq;
        self.next_seq += 1;
        Entry {
            seq,
            handler,
            scope: opts.scope.clone(),
            once: opts.once,
        }
    }

    pub fn bind_key(&mut self, key: EventKey, handler: Handler, opts: &BindOptions) {
        let entry = self.entry(handler, opts);
        self.by_key.entry(key).or_default().push(entry);
    }

    pub fn bind_pattern(&mut self, pattern: Regex, handler: Handler, opts: &BindOptions) {
        let entry = self.entry(handler, opts);
        self.patterns.push(PatternEntry { pattern, entry });
    }

    pub fn bind_wildcard(&mut self, handler: Handler, opts: &BindOptions) {
        let entry = self.entry(handler, opts);
        self.wildcard.push(entry);
    }

    /// Removes the handler from every exact-key registry, every pattern
    /// entry, and the wildcard registry.
    pub fn remove_handler(&mut self, handler: &Handler) {
        for entries in self.by_key.values_mut() {
            entries.retain(|e| !e.handler.same(handler));
        }
        self.by_key.retain(|_, entries| !entries.is_empty());
        self.patterns.retain(|p| !p.entry.handler.same(handler));
        self.wildcard.retain(|e| !e.handler.same(handler));
    }

    /// Removes the handler from one exact-key registry only.
    pub fn remove_key_handler(&mut self, key: &EventKey, handler: &Handler) {
        if let Some(entries) = self.by_key.get_mut(key) {
            entries.retain(|e| !e.handler.same(handler));
            if entries.is_empty() {
                self.by_key.remove(key);
            }
        }
    }

    /// Removes pattern entries for an identical pattern and handler.
    pub fn remove_pattern_handler(&mut self, pattern: &Regex, handler: &Handler) {
        self.patterns
            .retain(|p| !(p.pattern.as_str() == pattern.as_str() && p.entry.handler.same(handler)));
    }

    /// Removes the handler from the wildcard registry only.
    pub fn remove_wildcard_handler(&mut self, handler: &Handler) {
        self.wildcard.retain(|e| !e.handler.same(handler));
    }

    /// Removes every entry registered for the exact key. Pattern and wildcard
    /// entries are untouched.
    pub fn remove_key(&mut self, key: &EventKey) {
        self.by_key.remove(key);
    }

    /// Removes every entry bound to an identical pattern, regardless of
    /// handler identity.
    pub fn remove_pattern(&mut self, pattern: &Regex) {
        self.patterns.retain(|p| p.pattern.as_str() != pattern.as_str());
    }

    /// Removes every wildcard entry.
    pub fn clear_wildcard(&mut self) {
        self.wildcard.clear();
    }

    pub fn clear(&mut self) {
        self.by_key.clear();
        self.patterns.clear();
        self.wildcard.clear();
    }

    /// Builds the candidate list for one emitted key: exact entries, pattern
    /// entries whose pattern matches the key's string form, and wildcard
    /// entries, stable-merged by registration sequence.
    ///
    /// Symbol keys have no string form and are never pattern-matched.
    pub fn candidates(&self, key: &EventKey) -> Vec<Entry> {
        let mut out: Vec<Entry> = Vec::new();
        if let Some(entries) = self.by_key.get(key) {
            out.extend(entries.iter().cloned());
        }
        if let Some(text) = key.as_str() {
            out.extend(
                self.patterns
                    .iter()
                    .filter(|p| p.pattern.is_match(text))
                    .map(|p| p.entry.clone()),
            );
        }
        out.extend(self.wildcard.iter().cloned());
        out.sort_by_key(|e| e.seq);
        out
    }

    /// Whether the entry with this sequence number is still registered.
    pub fn contains(&self, seq: u64) -> bool {
        self.by_key
            .values()
            .flatten()
            .any(|e| e.seq == seq)
            || self.patterns.iter().any(|p| p.entry.seq == seq)
            || self.wildcard.iter().any(|e| e.seq == seq)
    }

    /// Drops the entries whose sequence numbers fired as one-shots.
    pub fn remove_seqs(&mut self, seqs: &[u64]) {
        if seqs.is_empty() {
            return;
        }
        for entries in self.by_key.values_mut() {
            entries.retain(|e| !seqs.contains(&e.seq));
        }
        self.by_key.retain(|_, entries| !entries.is_empty());
        self.patterns.retain(|p| !seqs.contains(&p.entry.seq));
        self.wildcard.retain(|e| !seqs.contains(&e.seq));
    }

    /// Ordered snapshot of the handlers registered for the exact key.
    pub fn listeners(&self, key: &EventKey) -> Vec<Handler> {
        self.by_key
            .get(key)
            .map(|entries| entries.iter().map(|e| e.handler.clone()).collect())
            .unwrap_or_default()
    }

    /// Ordered snapshot of the wildcard handlers.
    pub fn wildcard_listeners(&self) -> Vec<Handler> {
        self.wildcard.iter().map(|e| e.handler.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop() -> Handler {
        Handler::from_fn(|_, _| {})
    }

    #[test]
    fn test_candidates_merge_by_bind_order() {
        let mut r = Registry::default();
        let h1 = noop();
        let h2 = noop();
        let h3 = noop();
        r.bind_wildcard(h1.clone(), &BindOptions::new());
        r.bind_key("evt".into(), h2.clone(), &BindOptions::new());
        r.bind_pattern(Regex::new("^ev").unwrap(), h3.clone(), &BindOptions::new());

        let c = r.candidates(&EventKey::name("evt"));
        assert_eq!(c.len(), 3);
        assert!(c[0].handler.same(&h1));
        assert!(c[1].handler.same(&h2));
        assert!(c[2].handler.same(&h3));
    }

    #[test]
    fn test_pattern_skips_symbols_and_mismatches() {
        let mut r = Registry::default();
        r.bind_pattern(Regex::new("^net:").unwrap(), noop(), &BindOptions::new());
        assert_eq!(r.candidates(&EventKey::name("net:up")).len(), 1);
        assert_eq!(r.candidates(&EventKey::name("disk:up")).len(), 0);
        assert_eq!(r.candidates(&EventKey::symbol()).len(), 0);
    }

    #[test]
    fn test_remove_handler_everywhere() {
        let mut r = Registry::default();
        let h = noop();
        let other = noop();
        r.bind_key("a".into(), h.clone(), &BindOptions::new());
        r.bind_key("a".into(), other.clone(), &BindOptions::new());
        r.bind_pattern(Regex::new("a").unwrap(), h.clone(), &BindOptions::new());
        r.bind_wildcard(h.clone(), &BindOptions::new());

        r.remove_handler(&h);
        let c = r.candidates(&EventKey::name("a"));
        assert_eq!(c.len(), 1);
        assert!(c[0].handler.same(&other));
    }

    #[test]
    fn test_remove_key_spares_wildcard() {
        let mut r = Registry::default();
        r.bind_key("a".into(), noop(), &BindOptions::new());
        r.bind_wildcard(noop(), &BindOptions::new());
        r.remove_key(&EventKey::name("a"));
        assert_eq!(r.listeners(&EventKey::name("a")).len(), 0);
        assert_eq!(r.wildcard_listeners().len(), 1);
    }

    #[test]
    fn test_remove_seqs_prunes_empty_slots() {
        let mut r = Registry::default();
        r.bind_key("a".into(), noop(), &BindOptions::once());
        let seqs: Vec<u64> = r
            .candidates(&EventKey::name("a"))
            .iter()
            .map(|e| e.seq)
            .collect();
        r.remove_seqs(&seqs);
        assert!(!r.contains(seqs[0]));
        assert_eq!(r.listeners(&EventKey::name("a")).len(), 0);
    }

    #[test]
    fn test_removal_of_unregistered_is_noop() {
        let mut r = Registry::default();
        r.bind_key("a".into(), noop(), &BindOptions::new());
        r.remove_handler(&noop());
        r.remove_key(&EventKey::name("b"));
        assert_eq!(r.listeners(&EventKey::name("a")).len(), 1);
    }
}
