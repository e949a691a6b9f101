//! Session-wide cancellation.
//!
//! A [`CancellationSignal`] is the only state the gesture and voice loops
//! share.  It is write-once: the first [`cancel`](CancellationSignal::cancel)
//! records why the session stopped, later calls change nothing.

use std::fmt;
use std::sync::{Arc, OnceLock};

/// Why a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The stop word was spoken.
    VoiceExit,
    /// The abort key was pressed during the gesture loop.
    AbortKey,
    /// Ctrl+C or another external interrupt.
    Interrupt,
    /// An input source ended or failed.
    SourceExhausted,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StopReason::VoiceExit => "voice exit",
            StopReason::AbortKey => "abort key",
            StopReason::Interrupt => "interrupt",
            StopReason::SourceExhausted => "input source ended",
        })
    }
}

/// Cheap to clone; all clones observe the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancellationSignal {
    reason: Arc<OnceLock<StopReason>>,
}

impl CancellationSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the signal.  Returns `true` only for the call that actually set it.
    pub fn cancel(&self, reason: StopReason) -> bool {
        let first = self.reason.set(reason).is_ok();
        if first {
            log::info!("controller: stopping ({reason})");
        }
        first
    }

    pub fn is_cancelled(&self) -> bool {
        self.reason.get().is_some()
    }

    /// The reason given by the first `cancel`.
    pub fn reason(&self) -> Option<StopReason> {
        self.reason.get().copied()
    }
}
