//! Decoder settings for command-word transcription.

use crate::command::GRAMMAR;

/// Settings applied to every Whisper run.  Decoding is always greedy with a
/// single candidate: utterances are one or two words long.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WhisperParams {
    /// ISO-639-1 code, or `"auto"` to let Whisper detect it.
    pub language: String,
    /// CPU threads, at most 8.
    pub threads: i32,
    /// Decoder prompt.  Seeded with the command vocabulary so Whisper leans
    /// toward those words.
    pub prompt: Option<String>,
}

impl WhisperParams {
    pub fn for_language(language: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            ..Self::default()
        }
    }

    /// `None` when the language should be detected.
    pub fn language_code(&self) -> Option<&str> {
        match self.language.as_str() {
            "auto" | "" => None,
            code => Some(code),
        }
    }
}

impl Default for WhisperParams {
    fn default() -> Self {
        Self {
            language: "en".into(),
            threads: decoder_threads(),
            prompt: Some(vocabulary_prompt()),
        }
    }
}

/// `"left, right, jump, roll, hoverboard, exit."`
pub fn vocabulary_prompt() -> String {
    format!("{}.", GRAMMAR.join(", "))
}

fn decoder_threads() -> i32 {
    std::thread::available_parallelism()
        .map(|n| n.get().min(8) as i32)
        .unwrap_or(4)
}
