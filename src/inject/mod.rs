//! Command dispatch: turn a [`Command`] into a key press in the game window.
//!
//! # Overview
//!
//! 1. **Look up** the key bound to the command ([`KeyBindings`]).
//! 2. **Focus** the target window, best-effort ([`WindowFocuser`]).
//! 3. **Press** the key via `enigo` ([`EnigoKeys`]).
//!
//! Only a missing binding is reported to the caller.  Focus and injection
//! failures are logged and swallowed so a flaky desktop never stops a loop.

pub mod focus;
pub mod keyboard;
pub mod sink;

pub use focus::WindowFocuser;
pub use keyboard::{parse_key_name, EnigoKeys, KeyCode, KeyPresser};
pub use sink::{KeyBindings, KeyboardSink};

use thiserror::Error;

use crate::command::Command;

// ---------------------------------------------------------------------------
// DispatchError
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    /// The command has no key binding; nothing was pressed.
    #[error("no key bound to {0}")]
    UnknownCommand(Command),

    /// The OS refused the simulated key event.
    #[error("cannot simulate key press: {0}")]
    Injection(String),

    /// The target window could not be raised.
    #[error("cannot focus target window: {0}")]
    Focus(String),
}

// ---------------------------------------------------------------------------
// CommandSink
// ---------------------------------------------------------------------------

/// Where resolved commands go.  Shared by both input loops, so calls may
/// arrive concurrently and in any order.
pub trait CommandSink: Send + Sync {
    fn dispatch(&self, command: Command) -> Result<(), DispatchError>;
}

const _: fn() = || {
    fn _assert_object_safe(_: std::sync::Arc<dyn CommandSink>) {}
};
