//! # Example: basic
//!
//! Demonstrates the core dispatch surface on a single emitter.
//!
//! Shows how to:
//! - Bind handlers to one key, a key list, a pattern, and the wildcard.
//! - Use one-shot bindings and explicit scopes.
//! - Remove bindings by handler identity.
//!
//! ## Run
//! ```bash
//! cargo run --example basic
//! ```

use std::sync::Arc;

use herald::{BindOptions, Emitter, Handler, KeySpec};
use regex::Regex;
use serde_json::json;

struct Session {
    user: &'static str,
}

fn main() -> Result<(), herald::EmitterError> {
    let e = Emitter::new();

    // Fires for every emission, in bind order relative to keyed handlers.
    e.on(
        KeySpec::Any,
        Handler::from_fn(|ev, _| println!("[any]     {} {}", ev.key(), ev.data())),
    )?;

    // One key.
    let on_save = Handler::from_fn(|ev, _| println!("[save]    {}", ev.data()));
    e.on("doc:save", on_save.clone())?;

    // Pattern: matched against each emitted key at emission time.
    e.on(
        Regex::new("^doc:")?,
        Handler::from_fn(|ev, _| println!("[doc:*]   {}", ev.key())),
    )?;

    // One-shot with an explicit scope.
    e.once_with(
        "login",
        Handler::from_fn(|_, scope| {
            let session = scope.value_as::<Session>().expect("scope");
            println!("[login]   welcome, {}", session.user);
        }),
        BindOptions::new().with_scope(Arc::new(Session { user: "ada" })),
    )?;

    e.emit_with("doc:save", json!({ "id": 7 }))?;
    e.emit("login")?;
    e.emit("login")?; // one-shot already gone; only the wildcard reports it

    // Identity-based removal: the clone names the same registration.
    e.off_handler(&on_save)?;
    e.emit("doc:save")?;

    println!("herald v{}", herald::VERSION);
    Ok(())
}
