//! The speech source consumed by the voice loop.
//!
//! A [`SpeechPipeline`] pulls fixed audio blocks from a [`BlockSource`] and
//! pushes them through a [`Recognizer`].  One call to
//! [`SpeechSource::next_result`] is one blocking block read.

use thiserror::Error;

use crate::audio::{CaptureError, MicrophoneBlocks, TARGET_RATE};
use crate::command::grammar_json;
use crate::config::{SpeechEngineKind, VoiceConfig};
use crate::stt::{ModelPaths, WhisperEngine, WhisperParams};

use super::recognizer::{ExternalRecognizer, Recognizer, WhisperRecognizer};
use super::result::{RecognitionError, RecognitionResult};

// ---------------------------------------------------------------------------
// Traits
// ---------------------------------------------------------------------------

/// Fixed-size 16 kHz mono blocks.
pub trait BlockSource: Send {
    /// Block until the next block.  `None` once the stream has ended.
    fn next_block(&mut self) -> Option<Vec<f32>>;
}

impl BlockSource for MicrophoneBlocks {
    fn next_block(&mut self) -> Option<Vec<f32>> {
        MicrophoneBlocks::next_block(self)
    }
}

/// What the voice loop reads from.
pub trait SpeechSource: Send {
    /// Read one audio block and return what the engine made of it.
    ///
    /// `Ok(None)` means the block produced no result.
    /// [`RecognitionError::Closed`] means no further results will come.
    fn next_result(&mut self) -> Result<Option<RecognitionResult>, RecognitionError>;
}

// ---------------------------------------------------------------------------
// SpeechPipeline
// ---------------------------------------------------------------------------

pub struct SpeechPipeline {
    blocks: Box<dyn BlockSource>,
    recognizer: Box<dyn Recognizer>,
}

impl SpeechPipeline {
    pub fn new(blocks: Box<dyn BlockSource>, recognizer: Box<dyn Recognizer>) -> Self {
        Self { blocks, recognizer }
    }
}

impl SpeechSource for SpeechPipeline {
    fn next_result(&mut self) -> Result<Option<RecognitionResult>, RecognitionError> {
        let block = self.blocks.next_block().ok_or(RecognitionError::Closed)?;
        self.recognizer.accept_block(&block)
    }
}

// ---------------------------------------------------------------------------
// Startup
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum VoiceStartError {
    /// Model file or engine program is not usable.
    #[error("speech engine unavailable: {0}")]
    AssetMissing(String),

    #[error(transparent)]
    Device(#[from] CaptureError),
}

/// Build the configured engine, then open the microphone.
///
/// The engine is checked first so a missing model is reported without
/// touching the audio device.
pub fn open_speech_source(
    config: &VoiceConfig,
    models: &ModelPaths,
) -> Result<Box<dyn SpeechSource>, VoiceStartError> {
    let recognizer: Box<dyn Recognizer> = match config.engine {
        SpeechEngineKind::Whisper => {
            let path = models.resolve(&config.model);
            if !path.exists() {
                return Err(VoiceStartError::AssetMissing(format!(
                    "model `{}` not found at {}",
                    config.model,
                    path.display()
                )));
            }
            let engine = WhisperEngine::load(&path, WhisperParams::for_language(&config.language))
                .map_err(|e| VoiceStartError::AssetMissing(e.to_string()))?;
            log::info!("voice: whisper model loaded from {}", path.display());
            Box::new(WhisperRecognizer::new(
                Box::new(engine),
                config.vad_threshold,
                config.trailing_silence_blocks,
            ))
        }
        SpeechEngineKind::External => {
            let recognizer =
                ExternalRecognizer::spawn(&config.external_command, TARGET_RATE, &grammar_json())
                    .map_err(|e| {
                        VoiceStartError::AssetMissing(format!(
                            "speech engine {:?}: {e}",
                            config.external_command
                        ))
                    })?;
            Box::new(recognizer)
        }
    };

    let mic = MicrophoneBlocks::open(config.block_size)?;
    Ok(Box::new(SpeechPipeline::new(Box::new(mic), recognizer)))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
