//! Voice commands: microphone blocks in, transcripts out, mapped to
//! commands.
//!
//! # Pipeline
//!
//! ```text
//! MicrophoneBlocks → Recognizer (Whisper | external engine) → RecognitionResult
//!                                                                  │ final only
//!                                                                  ▼
//!                                                 mapper::resolve → Resolution
//! ```

pub mod mapper;
pub mod recognizer;
pub mod result;
pub mod segmenter;
pub mod source;

pub use mapper::{resolve, Resolution, RULE_GROUPS, STOP_WORD};
pub use recognizer::{ExternalRecognizer, Recognizer, WhisperRecognizer};
pub use result::{normalize_transcript, RecognitionError, RecognitionResult};
pub use segmenter::UtteranceSegmenter;
pub use source::{open_speech_source, BlockSource, SpeechPipeline, SpeechSource, VoiceStartError};
