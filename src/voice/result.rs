//! Typed recognition results and the errors a speech source can report.
//!
//! Engines that talk JSON are decoded with `serde_json` into a
//! [`RecognitionResult`]; text coming out of an engine is data and is never
//! interpreted any other way.
//!
//! Accepted shapes:
//!
//! | Wire object                         | Decoded as            |
//! |-------------------------------------|-----------------------|
//! | `{"isFinal": true, "text": "left"}` | final, `"left"`       |
//! | `{"isFinal": false, "text": "le"}`  | partial, `"le"`       |
//! | `{"text": "left"}`                  | final, `"left"`       |
//! | `{"partial": "le"}`                 | partial, `"le"`       |

use serde::Deserialize;
use thiserror::Error;

// ---------------------------------------------------------------------------
// RecognitionError
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecognitionError {
    /// Engine output could not be decoded into a [`RecognitionResult`].
    #[error("malformed recognition result: {0}")]
    Malformed(String),

    /// The engine failed on this block / utterance.
    #[error("speech engine error: {0}")]
    Engine(String),

    /// The audio stream or engine process is gone; no further results.
    #[error("speech source closed")]
    Closed,
}

// ---------------------------------------------------------------------------
// RecognitionResult
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecognitionResult {
    pub is_final: bool,
    pub text: String,
}

#[derive(Deserialize)]
struct WireResult {
    #[serde(rename = "isFinal")]
    is_final: Option<bool>,
    text: Option<String>,
    partial: Option<String>,
}

impl RecognitionResult {
    pub fn final_text(text: impl Into<String>) -> Self {
        Self {
            is_final: true,
            text: text.into(),
        }
    }

    pub fn partial(text: impl Into<String>) -> Self {
        Self {
            is_final: false,
            text: text.into(),
        }
    }

    /// Decode one line of engine output.
    ///
    /// # Errors
    ///
    /// [`RecognitionError::Malformed`] when `raw` is not a JSON object or
    /// carries neither `text` nor `partial`.
    pub fn parse(raw: &str) -> Result<Self, RecognitionError> {
        let wire: WireResult =
            serde_json::from_str(raw).map_err(|e| RecognitionError::Malformed(e.to_string()))?;

        match (wire.text, wire.partial) {
            (Some(text), _) => Ok(Self {
                is_final: wire.is_final.unwrap_or(true),
                text,
            }),
            (None, Some(partial)) => Ok(Self::partial(partial)),
            (None, None) => Err(RecognitionError::Malformed(format!(
                "neither `text` nor `partial` in {raw:?}"
            ))),
        }
    }

    /// The transcript to hand to the mapper: final and non-blank only.
    pub fn transcript(&self) -> Option<&str> {
        let text = self.text.trim();
        (self.is_final && !text.is_empty()).then_some(text)
    }
}

/// Lowercase, strip punctuation and collapse whitespace.
///
/// Free-form engines punctuate (`"Left."`, `"Jump!"`); the mapper expects
/// bare lowercase words.
pub fn normalize_transcript(text: &str) -> String {
    text.chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '\'' {
                c.to_ascii_lowercase()
            } else {
                ' '
            }
        })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_explicit_final_flag() {
        let r = RecognitionResult::parse(r#"{"isFinal": true, "text": "left"}"#).unwrap();
        assert_eq!(r, RecognitionResult::final_text("left"));

        let r = RecognitionResult::parse(r#"{"isFinal": false, "text": "le"}"#).unwrap();
        assert_eq!(r, RecognitionResult::partial("le"));
    }

    #[test]
    fn bare_text_is_final() {
        let r = RecognitionResult::parse(r#"{"text" : "jump"}"#).unwrap();
        assert!(r.is_final);
        assert_eq!(r.transcript(), Some("jump"));
    }

    #[test]
    fn vosk_partial_is_not_final() {
        let r = RecognitionResult::parse(r#"{"partial" : "ro"}"#).unwrap();
        assert!(!r.is_final);
        assert_eq!(r.transcript(), None);
    }

    #[test]
    fn extra_fields_are_ignored() {
        let raw = r#"{"result": [{"conf": 1.0, "word": "roll"}], "text": "roll"}"#;
        assert_eq!(RecognitionResult::parse(raw).unwrap().text, "roll");
    }

    #[test]
    fn expression_like_input_is_rejected_not_evaluated() {
        let err = RecognitionResult::parse("__import__('os').system('true')").unwrap_err();
        assert!(matches!(err, RecognitionError::Malformed(_)));
    }

    #[test]
    fn object_without_text_is_malformed() {
        let err = RecognitionResult::parse(r#"{"confidence": 0.4}"#).unwrap_err();
        assert!(err.to_string().contains("malformed"));
    }

    #[test]
    fn blank_final_has_no_transcript() {
        assert_eq!(RecognitionResult::final_text("   ").transcript(), None);
    }

    #[test]
    fn normalize_strips_punctuation_and_case() {
        assert_eq!(normalize_transcript(" Turn RIGHT, please! "), "turn right please");
        assert_eq!(normalize_transcript("Left."), "left");
        assert_eq!(normalize_transcript("..."), "");
    }
}
