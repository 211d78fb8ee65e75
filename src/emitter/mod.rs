//! # The dispatch engine.
//!
//! [`Emitter`] is the public face: registration (`on`/`once` and their map
//! variants), removal (`off`/`off_handler`/`off_each`/`off_key`), emission
//! (`emit`/`emit_with`/`emit_each`), queries, the enable gate, and the
//! kill lifecycle. [`BindOptions`] carries the per-binding one-shot flag and
//! execution scope. The registries themselves are internal.

mod core;
mod options;
mod registry;

pub(crate) use self::core::validate_keys;

pub use self::core::Emitter;
pub use options::BindOptions;
