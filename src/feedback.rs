//! On-screen feedback for the gesture loop: the last recognized command.

use std::io::Write;
use std::sync::Mutex;

use crate::command::Command;

/// Shows the most recent gesture command.  Called once per frame, so
/// implementations should only redraw on change.
pub trait FeedbackSink: Send + Sync {
    fn show(&self, last: Option<Command>);
}

/// Prints `Command: LEFT` style lines to stdout.
#[derive(Debug, Default)]
pub struct TerminalFeedback {
    shown: Mutex<Option<Command>>,
}

impl TerminalFeedback {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `last` and return the line to print, if it changed.
    fn update(&self, last: Option<Command>) -> Option<String> {
        let mut shown = self.shown.lock().unwrap_or_else(|e| e.into_inner());
        if *shown == last {
            return None;
        }
        *shown = last;
        last.map(|c| c.label())
    }
}

impl FeedbackSink for TerminalFeedback {
    fn show(&self, last: Option<Command>) {
        if let Some(line) = self.update(last) {
            let mut out = std::io::stdout().lock();
            let _ = writeln!(out, "{line}");
        }
    }
}
