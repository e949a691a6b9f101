//! Audio input: microphone capture → 16 kHz mono → fixed blocks → VAD.
//!
//! # Pipeline
//!
//! ```text
//! Microphone → cpal callback → AudioChunk (mpsc, capture thread)
//!           → to_mono → Resampler(16 kHz) → BlockAssembler → MicrophoneBlocks
//! ```
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use gesture_voice_control::audio::MicrophoneBlocks;
//!
//! let mic = MicrophoneBlocks::open(8_000).unwrap(); // 0.5 s blocks
//! while let Some(block) = mic.next_block() {
//!     println!("block of {} samples", block.len());
//! }
//! ```

pub mod blocks;
pub mod capture;
pub mod resample;
pub mod vad;

pub use blocks::BlockAssembler;
pub use capture::{AudioCapture, AudioChunk, CaptureError, MicrophoneBlocks};
pub use resample::{to_mono, Resampler, TARGET_RATE};
pub use vad::{rms, EnergyVad};
