//! Utterance transcription.
//!
//! [`SttEngine`] turns one finished utterance of 16 kHz mono audio into
//! text.  [`WhisperEngine`] is the in-process implementation; tests use
//! `MockSttEngine`.

use std::path::Path;

use thiserror::Error;
use whisper_rs::{FullParams, SamplingStrategy, WhisperContext, WhisperContextParameters};

use super::params::WhisperParams;

#[derive(Debug, Clone, Error)]
pub enum SttError {
    #[error("model not found: {0}")]
    ModelNotFound(String),

    #[error("cannot load model: {0}")]
    Load(String),

    #[error("transcription failed: {0}")]
    Transcription(String),

    #[error("utterance of {0} samples is shorter than {MIN_AUDIO_SAMPLES}")]
    TooShort(usize),

    #[error("utterance of {0} samples is longer than {MAX_AUDIO_SAMPLES}")]
    TooLong(usize),
}

pub trait SttEngine: Send + Sync {
    /// Transcribe one utterance.  Audio must be between
    /// [`MIN_AUDIO_SAMPLES`] and [`MAX_AUDIO_SAMPLES`] long.
    fn transcribe(&self, audio: &[f32]) -> Result<String, SttError>;
}

/// 0.5 s at 16 kHz.
pub const MIN_AUDIO_SAMPLES: usize = 8_000;
/// 30 s at 16 kHz, one Whisper window.
pub const MAX_AUDIO_SAMPLES: usize = 480_000;

fn check_length(audio: &[f32]) -> Result<(), SttError> {
    match audio.len() {
        n if n < MIN_AUDIO_SAMPLES => Err(SttError::TooShort(n)),
        n if n > MAX_AUDIO_SAMPLES => Err(SttError::TooLong(n)),
        _ => Ok(()),
    }
}

/// A loaded GGML model.  Each call creates its own decoder state.
pub struct WhisperEngine {
    ctx: WhisperContext,
    params: WhisperParams,
}

// SAFETY: the context holds read-only weights after loading; all mutable
// decoding state lives in the per-call `WhisperState`.
unsafe impl Send for WhisperEngine {}
unsafe impl Sync for WhisperEngine {}

impl WhisperEngine {
    pub fn load(model_path: impl AsRef<Path>, params: WhisperParams) -> Result<Self, SttError> {
        let path = model_path.as_ref();
        if !path.exists() {
            return Err(SttError::ModelNotFound(path.display().to_string()));
        }
        let path_str = path
            .to_str()
            .ok_or_else(|| SttError::ModelNotFound(format!("non-UTF-8 path {}", path.display())))?;

        let ctx = WhisperContext::new_with_params(path_str, WhisperContextParameters::default())
            .map_err(|e| SttError::Load(e.to_string()))?;
        Ok(Self { ctx, params })
    }
}

impl SttEngine for WhisperEngine {
    fn transcribe(&self, audio: &[f32]) -> Result<String, SttError> {
        check_length(audio)?;

        let mut fp = FullParams::new(SamplingStrategy::Greedy { best_of: 1 });
        fp.set_language(self.params.language_code());
        fp.set_n_threads(self.params.threads);
        fp.set_single_segment(true);
        fp.set_print_progress(false);
        fp.set_print_realtime(false);
        if let Some(prompt) = self.params.prompt.as_deref() {
            fp.set_initial_prompt(prompt);
        }

        let failed = |e: whisper_rs::WhisperError| SttError::Transcription(e.to_string());
        let mut state = self.ctx.create_state().map_err(failed)?;
        state.full(fp, audio).map_err(failed)?;

        let segments = state.full_n_segments().map_err(failed)?;
        let mut text = String::new();
        for i in 0..segments {
            text.push_str(&state.full_get_segment_text(i).map_err(failed)?);
        }
        Ok(text.trim().to_string())
    }
}

/// Returns a fixed response after the same length check as Whisper.
#[cfg(test)]
pub struct MockSttEngine {
    response: Result<String, SttError>,
}

#[cfg(test)]
impl MockSttEngine {
    pub fn ok(text: impl Into<String>) -> Self {
        Self {
            response: Ok(text.into()),
        }
    }

    pub fn err(error: SttError) -> Self {
        Self { response: Err(error) }
    }
}

#[cfg(test)]
impl SttEngine for MockSttEngine {
    fn transcribe(&self, audio: &[f32]) -> Result<String, SttError> {
        check_length(audio)?;
        self.response.clone()
    }
}
