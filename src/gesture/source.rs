//! Frame sources feeding the gesture loop.
//!
//! [`FrameSource`] is the seam to the video collaborator: each call blocks
//! until the next camera frame has been processed and yields the hand
//! centroid for it (or none).  [`LandmarkStream`] is the production source;
//! it reads JSON-lines landmark frames from an external extractor process.

use std::io::{BufRead, BufReader};
use std::process::{Child, ChildStdout, Command, Stdio};

use thiserror::Error;

use super::classifier::Centroid;
use super::landmarks::LandmarkFrame;

// ---------------------------------------------------------------------------
// Frame / SourceError
// ---------------------------------------------------------------------------

/// Per-frame observation handed to the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Frame {
    /// `None` when no hand is visible in this frame.
    pub centroid: Option<Centroid>,
}

impl Frame {
    pub fn with_hand(x: f32, y: f32) -> Self {
        Self {
            centroid: Some(Centroid::new(x, y)),
        }
    }

    pub fn empty() -> Self {
        Self { centroid: None }
    }
}

#[derive(Debug, Error)]
pub enum SourceError {
    /// The camera / extractor could not be opened.
    #[error("video source unavailable: {0}")]
    DeviceUnavailable(String),

    #[error("video source read failed: {0}")]
    Io(#[from] std::io::Error),
}

// ---------------------------------------------------------------------------
// FrameSource
// ---------------------------------------------------------------------------

/// Blocking supplier of frames.
pub trait FrameSource: Send {
    /// Wait for the next frame.  `Ok(None)` once the source is exhausted.
    fn next_frame(&mut self) -> Result<Option<Frame>, SourceError>;
}

// ---------------------------------------------------------------------------
// LandmarkStream
// ---------------------------------------------------------------------------

/// Reads [`LandmarkFrame`]s, one JSON object per line.
///
/// Lines that fail to decode are logged and reported as "no hand" so a
/// single garbled frame never stops the loop.
pub struct LandmarkStream<R> {
    reader: R,
    mirror: bool,
    line: String,
    child: Option<Child>,
}

impl<R: BufRead> LandmarkStream<R> {
    pub fn from_reader(reader: R, mirror: bool) -> Self {
        Self {
            reader,
            mirror,
            line: String::new(),
            child: None,
        }
    }
}

impl LandmarkStream<BufReader<ChildStdout>> {
    /// Spawn the extractor `argv` and stream its stdout.
    ///
    /// # Errors
    ///
    /// [`SourceError::DeviceUnavailable`] when `argv` is empty or the process
    /// cannot be started.
    pub fn spawn(argv: &[String], mirror: bool) -> Result<Self, SourceError> {
        let (program, args) = argv
            .split_first()
            .ok_or_else(|| SourceError::DeviceUnavailable("no landmark command configured".into()))?;

        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .spawn()
            .map_err(|e| SourceError::DeviceUnavailable(format!("{program}: {e}")))?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| SourceError::DeviceUnavailable(format!("{program}: no stdout")))?;

        log::info!("gesture: landmark extractor started ({program})");

        Ok(Self {
            reader: BufReader::new(stdout),
            mirror,
            line: String::new(),
            child: Some(child),
        })
    }
}

impl<R: BufRead + Send> FrameSource for LandmarkStream<R> {
    fn next_frame(&mut self) -> Result<Option<Frame>, SourceError> {
        self.line.clear();
        if self.reader.read_line(&mut self.line)? == 0 {
            return Ok(None);
        }

        let raw = self.line.trim();
        if raw.is_empty() {
            return Ok(Some(Frame::empty()));
        }

        match serde_json::from_str::<LandmarkFrame>(raw) {
            Ok(frame) => Ok(Some(Frame {
                centroid: frame.centroid(self.mirror),
            })),
            Err(e) => {
                log::warn!("gesture: skipping malformed landmark frame: {e}");
                Ok(Some(Frame::empty()))
            }
        }
    }
}

impl<R> Drop for LandmarkStream<R> {
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
