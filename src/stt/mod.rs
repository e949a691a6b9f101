//! Speech-to-text engines.
//!
//! ```text
//! ModelPaths::resolve(id) ──▶ WhisperEngine::load ──▶ SttEngine::transcribe(utterance)
//! ```
//!
//! The voice recognizer calls [`SttEngine::transcribe`] once per finished
//! utterance; see [`crate::voice::recognizer`].

pub mod engine;
pub mod model;
pub mod params;

pub use engine::{SttEngine, SttError, WhisperEngine, MAX_AUDIO_SAMPLES, MIN_AUDIO_SAMPLES};
pub use model::{ModelPaths, COMMAND_MODELS};
pub use params::{vocabulary_prompt, WhisperParams};

#[cfg(test)]
pub use engine::MockSttEngine;
