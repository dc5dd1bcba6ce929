//! Element resolution for UI test automation.
//!
//! Turns a human-written element description ("el botón \"Comprar\"",
//! "campo de email") plus a textual snapshot of the screen into a stable
//! handle: a transport UID or a screen coordinate.
//!
//! Escalation order: validated cache hit, local scoring over the parsed
//! snapshot, an optional language-model fallback on a reduced snapshot,
//! then `NotFound`.

pub mod cache;
pub mod cli;
pub mod engine;
pub mod fallback;
pub mod matching;
pub mod snapshot;
pub mod trace;
pub mod transport;
