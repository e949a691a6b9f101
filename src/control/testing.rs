//! Scripted stand-ins for the camera, microphone, keyboard and screen.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::command::Command;
use crate::feedback::FeedbackSink;
use crate::gesture::{Frame, FrameSource, SourceError};
use crate::inject::{CommandSink, DispatchError};
use crate::voice::{RecognitionError, RecognitionResult, SpeechSource};

use super::controller::{ControllerError, InputFactory};

/// Read period of the "endless" sources.
pub const TICK: Duration = Duration::from_millis(5);

// ---------------------------------------------------------------------------
// Frames
// ---------------------------------------------------------------------------

pub struct ScriptedFrames {
    frames: VecDeque<Frame>,
    endless: bool,
}

impl ScriptedFrames {
    /// Plays `frames`, then reports the source exhausted.
    pub fn finite(frames: Vec<Frame>) -> Self {
        Self {
            frames: frames.into(),
            endless: false,
        }
    }

    /// Plays `frames`, then keeps producing empty frames every [`TICK`].
    pub fn endless(frames: Vec<Frame>) -> Self {
        Self {
            frames: frames.into(),
            endless: true,
        }
    }
}

impl FrameSource for ScriptedFrames {
    fn next_frame(&mut self) -> Result<Option<Frame>, SourceError> {
        if let Some(frame) = self.frames.pop_front() {
            return Ok(Some(frame));
        }
        if self.endless {
            std::thread::sleep(TICK);
            return Ok(Some(Frame::empty()));
        }
        Ok(None)
    }
}

/// A right swipe, then nothing.
pub fn right_swipe() -> Vec<Frame> {
    vec![Frame::with_hand(100.0, 100.0), Frame::with_hand(200.0, 100.0)]
}

// ---------------------------------------------------------------------------
// Speech
// ---------------------------------------------------------------------------

pub type Step = Result<Option<RecognitionResult>, RecognitionError>;

pub struct ScriptedSpeech {
    steps: VecDeque<Step>,
    endless: bool,
}

impl ScriptedSpeech {
    /// Plays `steps`, then reports the source closed.
    pub fn finite(steps: Vec<Step>) -> Self {
        Self {
            steps: steps.into(),
            endless: false,
        }
    }

    /// Plays `steps`, then keeps returning silence every [`TICK`].
    pub fn endless(steps: Vec<Step>) -> Self {
        Self {
            steps: steps.into(),
            endless: true,
        }
    }
}

impl SpeechSource for ScriptedSpeech {
    fn next_result(&mut self) -> Step {
        if let Some(step) = self.steps.pop_front() {
            return step;
        }
        if self.endless {
            std::thread::sleep(TICK);
            return Ok(None);
        }
        Err(RecognitionError::Closed)
    }
}

pub fn heard(text: &str) -> Step {
    Ok(Some(RecognitionResult::final_text(text)))
}

// ---------------------------------------------------------------------------
// Sink / feedback
// ---------------------------------------------------------------------------

/// Records every accepted command.  `exit` is unbound, as in the default
/// key table.
#[derive(Default)]
pub struct RecordingSink {
    commands: Mutex<Vec<Command>>,
}

impl RecordingSink {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn commands(&self) -> Vec<Command> {
        self.commands.lock().unwrap().clone()
    }
}

impl CommandSink for RecordingSink {
    fn dispatch(&self, command: Command) -> Result<(), DispatchError> {
        if command == Command::Exit {
            return Err(DispatchError::UnknownCommand(command));
        }
        self.commands.lock().unwrap().push(command);
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingFeedback {
    shown: Mutex<Vec<Option<Command>>>,
}

impl RecordingFeedback {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn shown(&self) -> Vec<Option<Command>> {
        self.shown.lock().unwrap().clone()
    }
}

impl FeedbackSink for RecordingFeedback {
    fn show(&self, last: Option<Command>) {
        self.shown.lock().unwrap().push(last);
    }
}

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

type Opener<T> = Box<dyn FnMut() -> Result<T, ControllerError> + Send>;

/// Hands out pre-built sources, or a startup error.
pub struct ScriptedInputs {
    frames: Opener<Box<dyn FrameSource>>,
    speech: Opener<Box<dyn SpeechSource>>,
}

impl ScriptedInputs {
    pub fn new(
        frames: impl FnMut() -> Result<Box<dyn FrameSource>, ControllerError> + Send + 'static,
        speech: impl FnMut() -> Result<Box<dyn SpeechSource>, ControllerError> + Send + 'static,
    ) -> Self {
        Self {
            frames: Box::new(frames),
            speech: Box::new(speech),
        }
    }
}

impl InputFactory for ScriptedInputs {
    fn open_frames(&mut self) -> Result<Box<dyn FrameSource>, ControllerError> {
        (self.frames)()
    }

    fn open_speech(&mut self) -> Result<Box<dyn SpeechSource>, ControllerError> {
        (self.speech)()
    }
}
