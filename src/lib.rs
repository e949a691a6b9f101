//! Hands-free game control: hand swipes and spoken words become arrow-key
//! presses.
//!
//! ```text
//! landmark extractor ─▶ gesture::classify ─┐
//!                                           ├─▶ inject::CommandSink ─▶ key press
//! microphone ─▶ voice recognizer ─▶ resolve ┘
//!                 control::CoordinationController runs one or both loops
//! ```

pub mod audio;
pub mod command;
pub mod config;
pub mod control;
pub mod feedback;
pub mod gesture;
pub mod hotkey;
pub mod inject;
pub mod stt;
pub mod voice;

pub use command::Command;
