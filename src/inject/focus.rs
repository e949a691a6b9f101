//! Best-effort window focusing before a key press.
//!
//! There is no portable "activate window by title" API, so focusing runs a
//! user-configured command (`wmctrl -a {title}`, `xdotool search ...`, an
//! AppleScript one-liner) with `{title}` substituted.  A command that has
//! not exited within [`FOCUS_TIMEOUT`] is killed.

use std::process::{Command, ExitStatus, Stdio};
use std::time::{Duration, Instant};

use super::DispatchError;

/// Longest a focus command may run.
pub const FOCUS_TIMEOUT: Duration = Duration::from_secs(2);

const EXIT_POLL: Duration = Duration::from_millis(10);

#[derive(Debug, Clone)]
pub struct WindowFocuser {
    command: Option<Vec<String>>,
    title: String,
    settle: Duration,
    timeout: Duration,
}

impl WindowFocuser {
    /// `command: None` disables focusing.
    pub fn new(command: Option<Vec<String>>, title: impl Into<String>, settle: Duration) -> Self {
        Self {
            command,
            title: title.into(),
            settle,
            timeout: FOCUS_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn disabled() -> Self {
        Self::new(None, String::new(), Duration::ZERO)
    }

    /// The argv that [`focus`](Self::focus) runs, with the title substituted.
    pub fn argv(&self) -> Option<Vec<String>> {
        self.command.as_ref().map(|argv| {
            argv.iter()
                .map(|a| a.replace("{title}", &self.title))
                .collect()
        })
    }

    /// Raise the target window, then wait for it to settle.
    ///
    /// # Errors
    ///
    /// [`DispatchError::Focus`] if the command cannot be run, exits
    /// non-zero or times out.  Callers log it and carry on.
    pub fn focus(&self) -> Result<(), DispatchError> {
        let Some(argv) = self.argv() else {
            return Ok(());
        };
        let (program, args) = argv
            .split_first()
            .ok_or_else(|| DispatchError::Focus("empty focus command".into()))?;

        let status = self.run(program, args)?;
        if !status.success() {
            return Err(DispatchError::Focus(format!("{program} exited with {status}")));
        }

        if !self.settle.is_zero() {
            std::thread::sleep(self.settle);
        }
        Ok(())
    }

    fn run(&self, program: &str, args: &[String]) -> Result<ExitStatus, DispatchError> {
        let failed = |e: std::io::Error| DispatchError::Focus(format!("{program}: {e}"));
        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(failed)?;

        let deadline = Instant::now() + self.timeout;
        loop {
            if let Some(status) = child.try_wait().map_err(failed)? {
                return Ok(status);
            }
            if Instant::now() >= deadline {
                let _ = child.kill();
                let _ = child.wait();
                return Err(DispatchError::Focus(format!(
                    "{program} did not finish within {:?}",
                    self.timeout
                )));
            }
            std::thread::sleep(EXIT_POLL);
        }
    }
}
