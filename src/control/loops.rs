//! The two input loops.  Each runs on a blocking thread, owns its source and
//! recognizer state, and shares only the sink and the [`CancellationSignal`].
//!
//! Both loops check the signal before every blocking read and again right
//! after it, so a cancelled session does no further work once the pending
//! read returns.

use std::sync::Arc;
use std::time::Instant;

use crate::command::Command;
use crate::feedback::FeedbackSink;
use crate::gesture::{FrameSource, GestureClassifier};
use crate::hotkey::AbortKey;
use crate::inject::CommandSink;
use crate::voice::{resolve, RecognitionError, SpeechSource};

use super::signal::{CancellationSignal, StopReason};

/// Send one command; `true` when the sink accepted it.
fn dispatch(sink: &dyn CommandSink, command: Command) -> bool {
    match sink.dispatch(command) {
        Ok(()) => true,
        Err(e) => {
            log::warn!("dispatch: {e}");
            false
        }
    }
}

// ---------------------------------------------------------------------------
// Gesture loop
// ---------------------------------------------------------------------------

/// Frames → classifier → sink, until cancelled or the source ends.
///
/// An exhausted or failing source cancels the whole session.  Returns the
/// number of commands the sink accepted.
pub fn run_gesture_loop(
    mut source: Box<dyn FrameSource>,
    mut classifier: GestureClassifier,
    sink: Arc<dyn CommandSink>,
    feedback: Arc<dyn FeedbackSink>,
    abort: Arc<dyn AbortKey>,
    signal: CancellationSignal,
) -> usize {
    classifier.reset();
    // Clear whatever the previous session left on screen.
    feedback.show(None);
    let start = Instant::now();
    let mut dispatched = 0;
    let mut last_command = None;

    log::info!("gesture: loop started");

    while !signal.is_cancelled() {
        let next = source.next_frame();
        if signal.is_cancelled() {
            break;
        }

        let frame = match next {
            Ok(Some(frame)) => frame,
            Ok(None) => {
                log::info!("gesture: frame source ended");
                signal.cancel(StopReason::SourceExhausted);
                break;
            }
            Err(e) => {
                log::warn!("gesture: {e}");
                signal.cancel(StopReason::SourceExhausted);
                break;
            }
        };

        if let Some(command) = classifier.observe(frame.centroid, start.elapsed()) {
            log::info!("gesture: {command}");
            last_command = Some(command);
            if dispatch(sink.as_ref(), command) {
                dispatched += 1;
            }
        }
        feedback.show(last_command);

        if abort.take_pressed() {
            signal.cancel(StopReason::AbortKey);
        }
    }

    log::info!("gesture: loop finished ({dispatched} commands)");
    dispatched
}

// ---------------------------------------------------------------------------
// Voice loop
// ---------------------------------------------------------------------------

/// Final transcripts → mapper → sink, until cancelled, the stop word is
/// heard, or the speech source closes.
///
/// Malformed or failed recognition results are logged and skipped.  A closed
/// source ends this loop only.  Returns the number of commands the sink
/// accepted.
pub fn run_voice_loop(
    mut source: Box<dyn SpeechSource>,
    sink: Arc<dyn CommandSink>,
    signal: CancellationSignal,
) -> usize {
    let mut dispatched = 0;

    log::info!("voice: loop started");

    while !signal.is_cancelled() {
        let next = source.next_result();
        if signal.is_cancelled() {
            break;
        }

        let result = match next {
            Ok(Some(result)) => result,
            Ok(None) => continue,
            Err(RecognitionError::Closed) => {
                log::info!("voice: speech source closed");
                break;
            }
            Err(e) => {
                log::warn!("voice: {e}");
                continue;
            }
        };

        let Some(transcript) = result.transcript() else {
            log::debug!("voice: partial {:?}", result.text);
            continue;
        };
        log::info!("voice: heard {transcript:?}");

        let resolution = resolve(transcript);
        if resolution.stop {
            signal.cancel(StopReason::VoiceExit);
            break;
        }
        if let Some(command) = resolution.command {
            if dispatch(sink.as_ref(), command) {
                dispatched += 1;
            }
        }
    }

    log::info!("voice: loop finished ({dispatched} commands)");
    dispatched
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
