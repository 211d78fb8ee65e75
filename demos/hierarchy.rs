//! # Example: hierarchy
//!
//! Demonstrates parent/child emitters, bottom-up propagation, the binder
//! façade, and cascading kill.
//!
//! ## Flow
//! ```text
//! app (parent)
//!  ├─► window (child)
//!  │     └─► widget (grandchild)
//!  │
//!  widget.emit("focus")
//!      ├─► widget handlers        (local dispatch first)
//!      ├─► window handlers        (then each ancestor, bottom-up)
//!      └─► app handlers
//!
//!  app.kill()
//!      ├─► app "emitter:kill" listeners
//!      └─► window.kill() ──► widget.kill()   (depth-first cascade)
//! ```
//!
//! ## Run
//! ```bash
//! cargo run --example hierarchy
//! ```

use herald::{Emitter, Handler, KILL_EVENT};
use serde_json::json;

fn tap(name: &'static str) -> Handler {
    Handler::from_fn(move |ev, _| println!("[{name}] {} {}", ev.key(), ev.data()))
}

fn main() -> Result<(), herald::EmitterError> {
    let app = Emitter::new();
    let window = app.child()?;
    let widget = window.child()?;

    app.on("focus", tap("app"))?;
    window.on("focus", tap("window"))?;
    widget.on("focus", tap("widget"))?;

    // Fires widget, then window, then app.
    widget.emit_with("focus", json!({ "id": "search-box" }))?;

    // A binder groups the window's debug bindings for mass toggling.
    let mut debug = window.binder();
    debug.on("focus", tap("debug"))?;
    debug.disable()?;
    widget.emit("focus")?; // no [debug] line
    debug.enable()?;
    widget.emit("focus")?; // [debug] is back

    // Kill cascades: app notifies first, then each descendant.
    app.on(KILL_EVENT, tap("app:kill"))?;
    window.on(KILL_EVENT, tap("window:kill"))?;
    widget.on(KILL_EVENT, tap("widget:kill"))?;
    app.kill()?;

    assert!(window.is_killed() && widget.is_killed());
    Ok(())
}
