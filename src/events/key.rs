//! # Event keys and key specifications.
//!
//! Events are announced under an [`EventKey`]: either a textual name or an
//! opaque [symbol](EventKey::symbol). Symbols are process-unique tokens with
//! no string form; they are useful for private channels that cannot collide
//! with (or be spoofed by) string names, and they are invisible to pattern
//! bindings.
//!
//! [`KeySpec`] is the normalized form every polymorphic call boils down to.
//! The public API accepts `impl Into<KeySpec>`, so all of these work:
//!
//! ```
//! use herald::{Emitter, Handler, KeySpec};
//! use regex::Regex;
//!
//! let e = Emitter::new();
//! let h = Handler::from_fn(|_ev, _scope| {});
//!
//! e.on("save", h.clone()).unwrap();                       // one key
//! e.on(["open", "close"], h.clone()).unwrap();            // many keys
//! e.on(Regex::new("^net:").unwrap(), h.clone()).unwrap(); // pattern
//! e.on(KeySpec::Any, h.clone()).unwrap();                 // wildcard
//! ```

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

use regex::Regex;

/// Global counter for minting unique symbol keys.
static SYMBOL_SEQ: AtomicU64 = AtomicU64::new(0);

/// The reserved lifecycle key emitted by [`Emitter::kill`](crate::Emitter::kill)
/// right before an emitter is finalized.
pub const KILL_EVENT: &str = "emitter:kill";

/// Identifier an event is announced under.
#[derive(Clone, PartialEq, Eq, Hash)]
pub enum EventKey {
    /// A textual event name. Never empty.
    Name(Arc<str>),
    /// An opaque, process-unique token minted by [`EventKey::symbol`].
    Symbol(u64),
}

impl EventKey {
    /// Creates a named key.
    pub fn name(name: impl Into<Arc<str>>) -> Self {
        EventKey::Name(name.into())
    }

    /// Mints a fresh symbol key, distinct from every other key in the process.
    ///
    /// # Example
    /// ```
    /// use herald::EventKey;
    ///
    /// let a = EventKey::symbol();
    /// let b = EventKey::symbol();
    /// assert_ne!(a, b);
    /// assert_eq!(a, a.clone());
    /// ```
    pub fn symbol() -> Self {
        EventKey::Symbol(SYMBOL_SEQ.fetch_add(1, AtomicOrdering::Relaxed))
    }

    /// The string form of the key, if it has one.
    ///
    /// Symbols return `None`; pattern bindings are matched against this value,
    /// so a symbol key is simply never pattern-matched (and never errors).
    pub fn as_str(&self) -> Option<&str> {
        match self {
            EventKey::Name(name) => Some(name),
            EventKey::Symbol(_) => None,
        }
    }

    /// Whether this is the reserved [`KILL_EVENT`] key.
    pub fn is_kill(&self) -> bool {
        self.as_str() == Some(KILL_EVENT)
    }
}

impl fmt::Debug for EventKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventKey::Name(name) => write!(f, "{name:?}"),
            EventKey::Symbol(id) => write!(f, "Symbol({id})"),
        }
    }
}

impl fmt::Display for EventKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventKey::Name(name) => f.write_str(name),
            EventKey::Symbol(id) => write!(f, "<symbol {id}>"),
        }
    }
}

impl From<&str> for EventKey {
    fn from(name: &str) -> Self {
        EventKey::name(name)
    }
}

impl From<String> for EventKey {
    fn from(name: String) -> Self {
        EventKey::name(name)
    }
}

impl From<Arc<str>> for EventKey {
    fn from(name: Arc<str>) -> Self {
        EventKey::Name(name)
    }
}

/// Normalized key specification for bind/unbind/emit calls.
///
/// The dispatch engine itself is shape-agnostic; every public entry point
/// converts its arguments into one of these variants first.
#[derive(Clone, Debug)]
pub enum KeySpec {
    /// A single key.
    One(EventKey),
    /// Several keys, all given the same treatment.
    Many(Vec<EventKey>),
    /// A pattern tested against the string form of each emitted key at
    /// emission time. Only valid for binding, never for emitting.
    Pattern(Regex),
    /// Every key. Only valid for binding ("catch-all" handlers), never for
    /// emitting.
    Any,
}

impl KeySpec {
    /// Resolves the spec into a concrete key list for emission.
    ///
    /// Returns `None` for [`Pattern`](KeySpec::Pattern) and
    /// [`Any`](KeySpec::Any), which denote no concrete key set.
    pub(crate) fn into_keys(self) -> Option<Vec<EventKey>> {
        match self {
            KeySpec::One(key) => Some(vec![key]),
            KeySpec::Many(keys) => Some(keys),
            KeySpec::Pattern(_) | KeySpec::Any => None,
        }
    }
}

impl From<EventKey> for KeySpec {
    fn from(key: EventKey) -> Self {
        KeySpec::One(key)
    }
}

impl From<&str> for KeySpec {
    fn from(name: &str) -> Self {
        KeySpec::One(EventKey::name(name))
    }
}

impl From<String> for KeySpec {
    fn from(name: String) -> Self {
        KeySpec::One(EventKey::name(name))
    }
}

impl From<Vec<EventKey>> for KeySpec {
    fn from(keys: Vec<EventKey>) -> Self {
        KeySpec::Many(keys)
    }
}

impl From<&[&str]> for KeySpec {
    fn from(names: &[&str]) -> Self {
        KeySpec::Many(names.iter().map(|n| EventKey::name(*n)).collect())
    }
}

impl<const N: usize> From<[&str; N]> for KeySpec {
    fn from(names: [&str; N]) -> Self {
        KeySpec::Many(names.iter().map(|n| EventKey::name(*n)).collect())
    }
}

impl From<Regex> for KeySpec {
    fn from(pattern: Regex) -> Self {
        KeySpec::Pattern(pattern)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbols_are_unique_and_self_equal() {
        let a = EventKey::symbol();
        let b = EventKey::symbol();
        assert_ne!(a, b);
        assert_eq!(a, a.clone());
    }

    #[test]
    fn test_symbol_has_no_string_form() {
        assert_eq!(EventKey::symbol().as_str(), None);
        assert_eq!(EventKey::name("x").as_str(), Some("x"));
    }

    #[test]
    fn test_kill_key_detection() {
        assert!(EventKey::name(KILL_EVENT).is_kill());
        assert!(!EventKey::name("emitter:born").is_kill());
        assert!(!EventKey::symbol().is_kill());
    }

    #[test]
    fn test_spec_resolves_concrete_keys() {
        assert_eq!(
            KeySpec::from("a").into_keys(),
            Some(vec![EventKey::name("a")])
        );
        assert_eq!(
            KeySpec::from(["a", "b"]).into_keys(),
            Some(vec![EventKey::name("a"), EventKey::name("b")])
        );
        assert!(KeySpec::Any.into_keys().is_none());
        let re = Regex::new("^x").unwrap();
        assert!(KeySpec::Pattern(re).into_keys().is_none());
    }
}
