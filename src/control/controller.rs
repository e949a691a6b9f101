//! Session orchestration: open the inputs for a [`Mode`], run the loops on
//! blocking threads, wait for all of them, report.
//!
//! # Session flow
//!
//! ```text
//! run_until(mode, interrupt)
//!   ├─ Idle/Stopped → Running            (AlreadyRunning if not)
//!   ├─ open speech source   (voice modes)   ── error ─▶ Idle, Err
//!   ├─ open frame source    (gesture modes) ── error ─▶ Idle, Err
//!   ├─ spawn_blocking(run_voice_loop), spawn_blocking(run_gesture_loop)
//!   ├─ join all loops; interrupt future ─▶ signal.cancel(Interrupt)
//!   └─ Running → Stopped, Ok(SessionReport)
//! ```
//!
//! Nothing is restarted automatically.  The caller decides whether to run
//! another session.

use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard};

use thiserror::Error;
use tokio::task::{JoinError, JoinHandle};

use crate::feedback::FeedbackSink;
use crate::gesture::{FrameSource, GestureClassifier, GestureThresholds};
use crate::hotkey::AbortKey;
use crate::inject::CommandSink;
use crate::voice::{SpeechSource, VoiceStartError};

use super::loops::{run_gesture_loop, run_voice_loop};
use super::signal::{CancellationSignal, StopReason};
use super::state::{ControllerState, Mode, SessionReport};

// ---------------------------------------------------------------------------
// ControllerError
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ControllerError {
    /// A file or program the mode needs is missing (e.g. the speech model).
    #[error("startup asset missing: {0}")]
    StartupAssetMissing(String),

    /// The camera or microphone could not be opened.
    #[error("device unavailable: {0}")]
    DeviceUnavailable(String),

    #[error("a session is already running")]
    AlreadyRunning,
}

impl From<VoiceStartError> for ControllerError {
    fn from(e: VoiceStartError) -> Self {
        match e {
            VoiceStartError::AssetMissing(msg) => Self::StartupAssetMissing(msg),
            VoiceStartError::Device(e) => Self::DeviceUnavailable(e.to_string()),
        }
    }
}

// ---------------------------------------------------------------------------
// InputFactory
// ---------------------------------------------------------------------------

/// Opens fresh input sources for each session.
pub trait InputFactory: Send {
    fn open_frames(&mut self) -> Result<Box<dyn FrameSource>, ControllerError>;
    fn open_speech(&mut self) -> Result<Box<dyn SpeechSource>, ControllerError>;
}

// ---------------------------------------------------------------------------
// CoordinationController
// ---------------------------------------------------------------------------

pub struct CoordinationController<I> {
    inputs: Mutex<I>,
    sink: Arc<dyn CommandSink>,
    feedback: Arc<dyn FeedbackSink>,
    abort: Arc<dyn AbortKey>,
    thresholds: GestureThresholds,
    state: Mutex<ControllerState>,
}

/// Dropping the session future before the loops end cancels them and frees
/// the controller for the next session.
struct SessionGuard<'a> {
    signal: CancellationSignal,
    state: &'a Mutex<ControllerState>,
}

impl Drop for SessionGuard<'_> {
    fn drop(&mut self) {
        self.signal.cancel(StopReason::Interrupt);
        let mut state = lock(self.state);
        if *state == ControllerState::Running {
            *state = ControllerState::Stopped;
        }
    }
}

impl<I: InputFactory> CoordinationController<I> {
    pub fn new(
        inputs: I,
        sink: Arc<dyn CommandSink>,
        feedback: Arc<dyn FeedbackSink>,
        abort: Arc<dyn AbortKey>,
        thresholds: GestureThresholds,
    ) -> Self {
        Self {
            inputs: Mutex::new(inputs),
            sink,
            feedback,
            abort,
            thresholds,
            state: Mutex::new(ControllerState::Idle),
        }
    }

    pub fn state(&self) -> ControllerState {
        *lock(&self.state)
    }

    /// Run one session, stopping on Ctrl+C.
    pub async fn run(&self, mode: Mode) -> Result<SessionReport, ControllerError> {
        self.run_until(mode, ctrl_c()).await
    }

    /// Run one session.  When `interrupt` completes the session is cancelled
    /// with [`StopReason::Interrupt`].
    ///
    /// # Errors
    ///
    /// - [`ControllerError::AlreadyRunning`] if another session is active.
    /// - [`ControllerError::StartupAssetMissing`] /
    ///   [`ControllerError::DeviceUnavailable`] if an input cannot be
    ///   opened.  No loop is started and the state returns to `Idle`.
    pub async fn run_until<F>(&self, mode: Mode, interrupt: F) -> Result<SessionReport, ControllerError>
    where
        F: Future<Output = ()>,
    {
        self.begin()?;

        let (frames, speech) = match self.open_inputs(mode) {
            Ok(sources) => sources,
            Err(e) => {
                log::error!("controller: cannot start {mode} mode: {e}");
                *lock(&self.state) = ControllerState::Idle;
                return Err(e);
            }
        };

        let signal = CancellationSignal::new();
        let _guard = SessionGuard {
            signal: signal.clone(),
            state: &self.state,
        };
        self.abort.clear();

        log::info!("controller: {mode} session running");

        let gesture = frames.map(|source| {
            let classifier = GestureClassifier::new(self.thresholds);
            let sink = Arc::clone(&self.sink);
            let feedback = Arc::clone(&self.feedback);
            let abort = Arc::clone(&self.abort);
            let signal = signal.clone();
            tokio::task::spawn_blocking(move || {
                run_gesture_loop(source, classifier, sink, feedback, abort, signal)
            })
        });

        let voice = speech.map(|source| {
            let sink = Arc::clone(&self.sink);
            let signal = signal.clone();
            tokio::task::spawn_blocking(move || run_voice_loop(source, sink, signal))
        });

        tokio::pin!(interrupt);
        let mut interrupted = false;

        let gesture_commands = match gesture {
            Some(handle) => {
                let joined = join_loop(handle, &signal, interrupt.as_mut(), &mut interrupted).await;
                loop_count("gesture", joined, &signal)
            }
            None => 0,
        };
        let voice_commands = match voice {
            Some(handle) => {
                let joined = join_loop(handle, &signal, interrupt.as_mut(), &mut interrupted).await;
                loop_count("voice", joined, &signal)
            }
            None => 0,
        };

        // Every loop has ended on its own; no-op if one already cancelled.
        signal.cancel(StopReason::SourceExhausted);
        let stop_reason = signal.reason().unwrap_or(StopReason::SourceExhausted);
        *lock(&self.state) = ControllerState::Stopped;

        let report = SessionReport {
            mode,
            gesture_commands,
            voice_commands,
            stop_reason,
        };
        log::info!(
            "controller: session stopped ({stop_reason}; {gesture_commands} gesture, {voice_commands} voice commands)"
        );
        Ok(report)
    }

    fn begin(&self) -> Result<(), ControllerError> {
        let mut state = lock(&self.state);
        if *state == ControllerState::Running {
            return Err(ControllerError::AlreadyRunning);
        }
        *state = ControllerState::Running;
        Ok(())
    }

    /// Speech first, so a missing model is reported before the camera starts.
    #[allow(clippy::type_complexity)]
    fn open_inputs(
        &self,
        mode: Mode,
    ) -> Result<(Option<Box<dyn FrameSource>>, Option<Box<dyn SpeechSource>>), ControllerError> {
        let mut inputs = lock(&self.inputs);
        let speech = if mode.runs_voice() {
            Some(inputs.open_speech()?)
        } else {
            None
        };
        let frames = if mode.runs_gesture() {
            Some(inputs.open_frames()?)
        } else {
            None
        };
        Ok((frames, speech))
    }
}

/// Wait for one loop while watching the interrupt.
async fn join_loop<F>(
    mut handle: JoinHandle<usize>,
    signal: &CancellationSignal,
    mut interrupt: Pin<&mut F>,
    interrupted: &mut bool,
) -> Result<usize, JoinError>
where
    F: Future<Output = ()>,
{
    loop {
        tokio::select! {
            joined = &mut handle => return joined,
            _ = interrupt.as_mut(), if !*interrupted => {
                *interrupted = true;
                signal.cancel(StopReason::Interrupt);
            }
        }
    }
}

fn loop_count(name: &str, joined: Result<usize, JoinError>, signal: &CancellationSignal) -> usize {
    match joined {
        Ok(count) => count,
        Err(e) => {
            log::error!("controller: {name} loop failed: {e}");
            signal.cancel(StopReason::SourceExhausted);
            0
        }
    }
}

/// Resolves on Ctrl+C.  Never resolves if the handler cannot be installed.
pub async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::warn!("controller: cannot listen for Ctrl+C: {e}");
        std::future::pending::<()>().await;
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
