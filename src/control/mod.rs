//! Session control: runs the gesture and/or voice loop for a chosen
//! [`Mode`] until one of them, the abort key, or an interrupt stops it.
//!
//! # Threading
//!
//! ```text
//! tokio task: CoordinationController::run_until
//!   ├─ spawn_blocking: run_gesture_loop ─┐
//!   ├─ spawn_blocking: run_voice_loop  ──┼─ share CancellationSignal + CommandSink
//!   └─ select! { join, interrupt } ──────┘
//! ```
//!
//! Each loop owns its source and recognizer state outright.

pub mod controller;
pub mod inputs;
pub mod loops;
pub mod signal;
pub mod state;

#[cfg(test)]
pub(crate) mod testing;

pub use controller::{ctrl_c, ControllerError, CoordinationController, InputFactory};
pub use inputs::DeviceInputs;
pub use loops::{run_gesture_loop, run_voice_loop};
pub use signal::{CancellationSignal, StopReason};
pub use state::{ControllerState, Mode, SessionReport};
