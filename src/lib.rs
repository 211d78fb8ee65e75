//! # herald
//!
//! **Herald** is a minimal synchronous event-dispatch library for Rust.
//!
//! It provides one primitive, the [`Emitter`]: independent pieces of code
//! register interest in named occurrences and are notified, synchronously and
//! in-process, when those occurrences are announced. There is no scheduler,
//! no queue, and no delivery thread; `emit` is a direct fan-out call on the
//! calling thread.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!   on("save", h)   on(regex, h)   on(Any, h)
//!        │               │             │
//!        ▼               ▼             ▼
//! ┌───────────────────────────────────────────────────────────┐
//! │  Emitter                                                  │
//! │  - exact registry   (key → ordered entries)               │
//! │  - pattern registry (regex tested per emitted key)        │
//! │  - wildcard registry (fires for every key)                │
//! │  - enabled gate, kill state, parent/children links        │
//! └───────────────┬───────────────────────────────────────────┘
//!                 │ emit("save", data)
//!                 ▼
//!   candidates = exact ∪ matching patterns ∪ wildcard,
//!   stable-merged by bind order, snapshotted per pass
//!                 │
//!                 ▼
//!   Handler::on_event(&Event, &Scope)   (synchronous, reentrant)
//!                 │
//!                 ▼
//!   parent.emit(same keys, same data)   (bottom-up propagation)
//! ```
//!
//! ### Dispatch guarantees
//! - Handlers fire in bind order, across registry kinds.
//! - The candidate set is fixed when the pass begins: handlers bound from
//!   inside a handler don't fire in the pass that bound them; handlers
//!   unbound mid-pass are skipped if their turn had not come.
//! - One-shot (`once`) entries are dropped only after the pass completes.
//! - No fault isolation: a panicking handler unwinds to the `emit` caller.
//!
//! ## Features
//! | Area           | Description                                              | Key types / traits            |
//! |----------------|----------------------------------------------------------|-------------------------------|
//! | **Dispatch**   | Register, remove, and synchronously fan out events.      | [`Emitter`], [`KeySpec`]      |
//! | **Handlers**   | Closures or custom types, with identity-based removal.   | [`Handle`], [`Handler`]       |
//! | **Scoping**    | Per-binding execution context ("self") for handlers.     | [`Scope`], [`BindOptions`]    |
//! | **Hierarchy**  | Child emitters propagating bottom-up; cascading kill.    | [`Emitter::child`], [`KILL_EVENT`] |
//! | **Errors**     | Typed rejection of invalid calls and killed instances.   | [`EmitterError`]              |
//!
//! ## Optional features
//! - `binder` *(default)*: exports [`Binder`], a façade that batches a group
//!   of bindings for mass enable/disable.
//! - `logging`: exports a simple built-in [`LogWriter`] handler that reports
//!   events through `tracing` _(demo/reference only)_.
//!
//! ## Example
//! ```rust
//! use herald::{Emitter, Handler, KeySpec};
//! use serde_json::json;
//!
//! fn main() -> Result<(), herald::EmitterError> {
//!     let app = Emitter::new();
//!     let ui = app.child()?;
//!
//!     // Wildcard audit handler: sees everything, in bind order.
//!     app.on(KeySpec::Any, Handler::from_fn(|ev, _| {
//!         println!("[audit] {} {}", ev.key(), ev.data());
//!     }))?;
//!
//!     // One-shot boot hook.
//!     ui.once("boot", Handler::from_fn(|_, _| println!("booted")))?;
//!
//!     ui.emit("boot")?;                                  // fires hook, then audit (via parent)
//!     ui.emit_with("click", json!({ "x": 3, "y": 9 }))?; // audit only
//!     app.kill()?;                                       // notifies, cascades to ui
//!     Ok(())
//! }
//! ```

mod emitter;
mod error;
mod events;
mod handlers;

// ---- Public re-exports ----

pub use emitter::{BindOptions, Emitter};
pub use error::EmitterError;
pub use events::{Event, EventKey, KeySpec, KILL_EVENT};
pub use handlers::{Handle, Handler, Scope};

// Optional: expose the batching façade.
// Enabled by default; opt out with `default-features = false`.
#[cfg(feature = "binder")]
mod binder;
#[cfg(feature = "binder")]
pub use binder::Binder;

// Optional: expose a simple built-in logging handler (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use handlers::LogWriter;

/// Crate version identifier.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
