//! Controller mode, lifecycle state and the per-session report.

use std::fmt;
use std::str::FromStr;

use super::signal::StopReason;

// ---------------------------------------------------------------------------
// Mode
// ---------------------------------------------------------------------------

/// Which input loops a session runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    VoiceOnly,
    GestureOnly,
    Both,
}

impl Mode {
    pub fn runs_gesture(self) -> bool {
        matches!(self, Mode::GestureOnly | Mode::Both)
    }

    pub fn runs_voice(self) -> bool {
        matches!(self, Mode::VoiceOnly | Mode::Both)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Mode::VoiceOnly => "voice",
            Mode::GestureOnly => "gesture",
            Mode::Both => "both",
        })
    }
}

impl FromStr for Mode {
    type Err = String;

    /// `voice`, `gesture` or `both`, or the menu numbers `1`–`3`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "voice" | "1" => Ok(Mode::VoiceOnly),
            "gesture" | "2" => Ok(Mode::GestureOnly),
            "both" | "3" => Ok(Mode::Both),
            other => Err(format!("unknown mode {other:?} (expected voice, gesture or both)")),
        }
    }
}

// ---------------------------------------------------------------------------
// ControllerState
// ---------------------------------------------------------------------------

/// ```text
/// Idle ──run──▶ Running ──all loops joined──▶ Stopped ──run──▶ Running …
///        └─ startup error ─▶ Idle
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ControllerState {
    #[default]
    Idle,
    Running,
    Stopped,
}

impl ControllerState {
    pub fn label(&self) -> &'static str {
        match self {
            ControllerState::Idle => "Idle",
            ControllerState::Running => "Running",
            ControllerState::Stopped => "Stopped",
        }
    }
}

// ---------------------------------------------------------------------------
// SessionReport
// ---------------------------------------------------------------------------

/// What one `run` did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionReport {
    pub mode: Mode,
    /// Commands dispatched by the gesture loop.
    pub gesture_commands: usize,
    /// Commands dispatched by the voice loop.
    pub voice_commands: usize,
    pub stop_reason: StopReason,
}
