//! Speech recognizers: audio blocks in, [`RecognitionResult`]s out.
//!
//! | Recognizer            | Engine                                  | Results          |
//! |-----------------------|-----------------------------------------|------------------|
//! | [`WhisperRecognizer`] | in-process `whisper-rs`, per utterance  | final only       |
//! | [`ExternalRecognizer`]| child process, JSON line per block      | partial or final |
//!
//! The external protocol: the child reads raw little-endian `i16` PCM on
//! stdin and answers **every** block with exactly one JSON line on stdout
//! (see [`RecognitionResult::parse`] for the accepted shapes).

use std::io::{BufRead, BufReader, Write};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

use crate::audio::EnergyVad;
use crate::stt::{SttEngine, MAX_AUDIO_SAMPLES};

use super::result::{normalize_transcript, RecognitionError, RecognitionResult};
use super::segmenter::UtteranceSegmenter;

// ---------------------------------------------------------------------------
// Recognizer trait
// ---------------------------------------------------------------------------

pub trait Recognizer: Send {
    /// Consume one audio block.  `Ok(None)` when the block produced nothing.
    fn accept_block(&mut self, block: &[f32]) -> Result<Option<RecognitionResult>, RecognitionError>;
}

// ---------------------------------------------------------------------------
// WhisperRecognizer
// ---------------------------------------------------------------------------

/// Whisper performs poorly on clips under a second; shorter utterances are
/// zero-padded to this length.
const MIN_UTTERANCE_SAMPLES: usize = 16_000;

/// Segments blocks into utterances and transcribes each finished one.
pub struct WhisperRecognizer {
    engine: Box<dyn SttEngine>,
    segmenter: UtteranceSegmenter,
}

impl WhisperRecognizer {
    pub fn new(engine: Box<dyn SttEngine>, vad_threshold: f32, trailing_silence_blocks: usize) -> Self {
        Self {
            engine,
            segmenter: UtteranceSegmenter::new(
                EnergyVad::new(vad_threshold),
                trailing_silence_blocks,
                MAX_AUDIO_SAMPLES,
            ),
        }
    }
}

impl Recognizer for WhisperRecognizer {
    fn accept_block(&mut self, block: &[f32]) -> Result<Option<RecognitionResult>, RecognitionError> {
        let Some(mut utterance) = self.segmenter.push_block(block) else {
            return Ok(None);
        };
        if utterance.len() < MIN_UTTERANCE_SAMPLES {
            utterance.resize(MIN_UTTERANCE_SAMPLES, 0.0);
        }

        let raw = self
            .engine
            .transcribe(&utterance)
            .map_err(|e| RecognitionError::Engine(e.to_string()))?;

        let text = normalize_transcript(&raw);
        log::debug!("voice: whisper {raw:?} -> {text:?}");
        if text.is_empty() {
            return Ok(None);
        }
        Ok(Some(RecognitionResult::final_text(text)))
    }
}

// ---------------------------------------------------------------------------
// ExternalRecognizer
// ---------------------------------------------------------------------------

/// A phrase-list engine running as a child process.
pub struct ExternalRecognizer<W, R> {
    input: W,
    output: R,
    line: String,
    child: Option<Child>,
}

impl ExternalRecognizer<ChildStdin, BufReader<ChildStdout>> {
    /// Spawn `argv`.  `{sample_rate}` and `{grammar}` in any argument are
    /// replaced with the capture rate and the JSON vocabulary.
    pub fn spawn(argv: &[String], sample_rate: u32, grammar: &str) -> std::io::Result<Self> {
        let args: Vec<String> = argv
            .iter()
            .map(|a| {
                a.replace("{sample_rate}", &sample_rate.to_string())
                    .replace("{grammar}", grammar)
            })
            .collect();
        let (program, rest) = args.split_first().ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "no speech engine command configured")
        })?;

        let mut child = Command::new(program)
            .args(rest)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .spawn()?;

        let missing = || std::io::Error::new(std::io::ErrorKind::BrokenPipe, "engine pipes unavailable");
        let input = child.stdin.take().ok_or_else(missing)?;
        let output = child.stdout.take().ok_or_else(missing)?;

        log::info!("voice: external speech engine started ({program})");

        Ok(Self {
            input,
            output: BufReader::new(output),
            line: String::new(),
            child: Some(child),
        })
    }
}

impl<W: Write, R: BufRead> ExternalRecognizer<W, R> {
    pub fn from_pipes(input: W, output: R) -> Self {
        Self {
            input,
            output,
            line: String::new(),
            child: None,
        }
    }
}

/// `f32` in `[-1, 1]` → little-endian `i16` PCM bytes.
pub fn to_pcm16_le(block: &[f32]) -> Vec<u8> {
    block
        .iter()
        .flat_map(|s| {
            let v = (s.clamp(-1.0, 1.0) * f32::from(i16::MAX)) as i16;
            v.to_le_bytes()
        })
        .collect()
}

impl<W: Write + Send, R: BufRead + Send> Recognizer for ExternalRecognizer<W, R> {
    fn accept_block(&mut self, block: &[f32]) -> Result<Option<RecognitionResult>, RecognitionError> {
        let pcm = to_pcm16_le(block);
        if let Err(e) = self.input.write_all(&pcm).and_then(|_| self.input.flush()) {
            log::warn!("voice: speech engine stopped accepting audio: {e}");
            return Err(RecognitionError::Closed);
        }

        self.line.clear();
        match self.output.read_line(&mut self.line) {
            Ok(0) => return Err(RecognitionError::Closed),
            Ok(_) => {}
            Err(e) => return Err(RecognitionError::Engine(e.to_string())),
        }

        let raw = self.line.trim();
        if raw.is_empty() {
            return Ok(None);
        }
        RecognitionResult::parse(raw).map(Some)
    }
}

impl<W, R> Drop for ExternalRecognizer<W, R> {
    fn drop(&mut self) {
        if let Some(mut child) = self.child.take() {
            let _ = child.kill();
            let _ = child.wait();
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stt::{MockSttEngine, SttError};
    use std::io::Cursor;

    fn whisper(engine: MockSttEngine) -> WhisperRecognizer {
        WhisperRecognizer::new(Box::new(engine), 0.01, 1)
    }

    #[test]
    fn whisper_waits_for_end_of_utterance() {
        let mut rec = whisper(MockSttEngine::ok("Left."));
        assert_eq!(rec.accept_block(&vec![0.0; 8_000]).unwrap(), None);
        assert_eq!(rec.accept_block(&vec![0.3; 8_000]).unwrap(), None);
        let result = rec.accept_block(&vec![0.0; 8_000]).unwrap();
        assert_eq!(result, Some(RecognitionResult::final_text("left")));
    }

    #[test]
    fn short_utterance_is_padded_for_the_engine() {
        // 200 voiced + 200 silent samples: far below the engine minimum.
        let mut rec = whisper(MockSttEngine::ok("jump"));
        rec.accept_block(&vec![0.3; 200]).unwrap();
        let result = rec.accept_block(&vec![0.0; 200]).unwrap();
        assert_eq!(result, Some(RecognitionResult::final_text("jump")));
    }

    #[test]
    fn whisper_engine_failure_is_reported_per_utterance() {
        let mut rec = whisper(MockSttEngine::err(SttError::Transcription("boom".into())));
        rec.accept_block(&vec![0.3; 8_000]).unwrap();
        let err = rec.accept_block(&vec![0.0; 8_000]).unwrap_err();
        assert!(matches!(err, RecognitionError::Engine(_)));
        // The recognizer keeps working afterwards.
        assert_eq!(rec.accept_block(&vec![0.0; 8_000]).unwrap(), None);
    }

    #[test]
    fn punctuation_only_transcript_is_dropped() {
        let mut rec = whisper(MockSttEngine::ok(" ... "));
        rec.accept_block(&vec![0.3; 8_000]).unwrap();
        assert_eq!(rec.accept_block(&vec![0.0; 8_000]).unwrap(), None);
    }

    #[test]
    fn pcm_conversion_clamps_and_scales() {
        assert_eq!(to_pcm16_le(&[0.0]), vec![0, 0]);
        assert_eq!(to_pcm16_le(&[1.0]), i16::MAX.to_le_bytes().to_vec());
        assert_eq!(to_pcm16_le(&[2.0]), i16::MAX.to_le_bytes().to_vec());
        assert_eq!(to_pcm16_le(&[-1.0]), (-i16::MAX).to_le_bytes().to_vec());
    }

    fn external(lines: &str) -> ExternalRecognizer<Vec<u8>, Cursor<Vec<u8>>> {
        ExternalRecognizer::from_pipes(Vec::new(), Cursor::new(lines.as_bytes().to_vec()))
    }

    #[test]
    fn external_engine_reads_one_line_per_block() {
        let mut rec = external(
            "{\"partial\": \"ri\"}\n{\"text\": \"right\"}\n\n",
        );
        let block = vec![0.5; 4];
        assert_eq!(rec.accept_block(&block).unwrap(), Some(RecognitionResult::partial("ri")));
        assert_eq!(rec.accept_block(&block).unwrap(), Some(RecognitionResult::final_text("right")));
        assert_eq!(rec.accept_block(&block).unwrap(), None);
        assert_eq!(rec.accept_block(&block).unwrap_err(), RecognitionError::Closed);
        // Every block was forwarded as 16-bit PCM.
        assert_eq!(rec.input.len(), 4 * 4 * 2);
    }

    #[test]
    fn external_malformed_line_is_an_error_not_a_stop() {
        let mut rec = external("garbage\n{\"text\": \"jump\"}\n");
        let block = vec![0.0; 2];
        assert!(matches!(rec.accept_block(&block), Err(RecognitionError::Malformed(_))));
        assert_eq!(rec.accept_block(&block).unwrap(), Some(RecognitionResult::final_text("jump")));
    }

    #[test]
    fn spawn_without_command_fails() {
        assert!(ExternalRecognizer::spawn(&[], 16_000, "[]").is_err());
    }
}
