//! Application entry point.
//!
//! # Startup sequence
//!
//! 1. Initialise logging.
//! 2. Load [`AppConfig`] (default on first run, or `--config`).
//! 3. Create the tokio runtime (multi-thread, 2 workers).
//! 4. Start the abort-key listener thread.
//! 5. Build the key-injection sink and the controller.
//! 6. Run one session (`--mode`) or show the mode menu until `4`.

use std::future::Future;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use gesture_voice_control::{
    config::{AppConfig, AppPaths},
    control::{ctrl_c, CoordinationController, DeviceInputs, Mode, SessionReport},
    feedback::TerminalFeedback,
    hotkey::{parse_key, AbortKey, AbortKeyListener, KeyLatch},
    inject::{KeyBindings, KeyboardSink, WindowFocuser},
    stt::ModelPaths,
};

#[derive(Parser)]
#[command(name = "gesture-voice-control", version, about = "Control a game with hand swipes and voice commands")]
struct Cli {
    /// Settings file to use instead of the platform default.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Run a single session (voice, gesture or both) and exit.
    #[arg(long)]
    mode: Option<Mode>,

    /// Directory holding the Whisper GGML models.
    #[arg(long)]
    model_dir: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => AppConfig::load_from(path)
            .with_context(|| format!("cannot load config from {}", path.display()))?,
        None => AppConfig::load().unwrap_or_else(|e| {
            log::warn!("config: failed to load settings ({e}); using defaults");
            AppConfig::default()
        }),
    };
    let models_dir = cli.model_dir.clone().unwrap_or_else(|| AppPaths::new().models_dir);

    let rt = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .context("failed to create tokio runtime")?;

    let abort = start_abort_key(&config.hotkey.abort_key);

    let focuser = WindowFocuser::new(
        config.window.focus_command.clone(),
        config.window.title.clone(),
        Duration::from_millis(config.window.settle_ms),
    );
    let sink = KeyboardSink::new(KeyBindings::from_names(&config.keys), focuser);

    let controller = CoordinationController::new(
        DeviceInputs::new(config.gesture.clone(), config.voice.clone(), ModelPaths::new(models_dir)),
        Arc::new(sink),
        Arc::new(TerminalFeedback::new()),
        abort,
        config.gesture.thresholds(),
    );

    if let Some(mode) = cli.mode {
        let report = rt.block_on(controller.run(mode))?;
        print_report(&report);
        return Ok(());
    }

    let mut input = BufReader::new(tokio::io::stdin());
    while let Some(mode) = rt.block_on(choose_mode(&mut input, ctrl_c()))? {
        match rt.block_on(controller.run(mode)) {
            Ok(report) => print_report(&report),
            Err(e) => println!("Could not start {mode} mode: {e}"),
        }
    }

    log::info!("exiting");
    // The stdin reader thread may still be blocked on a read.
    rt.shutdown_background();
    Ok(())
}

/// The menu, abandoned with `None` when `interrupt` fires first.
async fn choose_mode<R, F>(input: &mut R, interrupt: F) -> anyhow::Result<Option<Mode>>
where
    R: AsyncBufRead + Unpin,
    F: Future<Output = ()>,
{
    tokio::select! {
        choice = prompt_mode(input) => choice,
        _ = interrupt => {
            println!();
            Ok(None)
        }
    }
}

/// Falls back to a latch nobody presses when the listener cannot start.
fn start_abort_key(name: &str) -> Arc<dyn AbortKey> {
    let key = parse_key(name).unwrap_or_else(|| {
        log::warn!("hotkey: unknown abort key {name:?}, using Escape");
        rdev::Key::Escape
    });
    match AbortKeyListener::start(key) {
        Ok(listener) => Arc::new(listener),
        Err(e) => {
            log::warn!("hotkey: abort key unavailable: {e}");
            Arc::new(KeyLatch::new())
        }
    }
}

/// `None` on `4` or end of input.  Invalid choices re-prompt.
async fn prompt_mode<R: AsyncBufRead + Unpin>(input: &mut R) -> anyhow::Result<Option<Mode>> {
    loop {
        println!();
        println!("Select control mode:");
        println!("  1. Voice only");
        println!("  2. Gesture only");
        println!("  3. Voice + gesture");
        println!("  4. Quit");
        print!("> ");
        std::io::stdout().flush()?;

        let mut line = String::new();
        if input.read_line(&mut line).await? == 0 {
            return Ok(None);
        }
        let choice = line.trim();
        if choice == "4" {
            return Ok(None);
        }
        match choice.parse::<Mode>() {
            Ok(mode) => return Ok(Some(mode)),
            Err(_) => println!("Invalid choice {choice:?}, enter 1-4."),
        }
    }
}

fn print_report(report: &SessionReport) {
    println!(
        "Session ended ({}): {} gesture and {} voice commands sent.",
        report.stop_reason, report.gesture_commands, report.voice_commands
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn never() {
        std::future::pending::<()>().await
    }

    #[tokio::test]
    async fn menu_skips_invalid_input() {
        let mut input: &[u8] = b"9\nbanana\n2\n";
        assert_eq!(prompt_mode(&mut input).await.unwrap(), Some(Mode::GestureOnly));
    }

    #[tokio::test]
    async fn menu_quits_on_four_or_eof() {
        let mut four: &[u8] = b"4\n";
        let mut empty: &[u8] = b"";
        assert_eq!(prompt_mode(&mut four).await.unwrap(), None);
        assert_eq!(prompt_mode(&mut empty).await.unwrap(), None);
    }

    #[tokio::test]
    async fn ctrl_c_at_the_menu_quits() {
        // Nothing is ever typed: the read stays pending.
        let (_keyboard, terminal) = tokio::io::duplex(64);
        let mut input = BufReader::new(terminal);

        let choice = tokio::time::timeout(
            Duration::from_secs(5),
            choose_mode(&mut input, async {}),
        )
        .await
        .expect("interrupt should end the menu");
        assert_eq!(choice.unwrap(), None);
    }

    #[tokio::test]
    async fn typed_choice_wins_without_interrupt() {
        let mut input: &[u8] = b"1\n";
        assert_eq!(choose_mode(&mut input, never()).await.unwrap(), Some(Mode::VoiceOnly));
    }

    #[test]
    fn cli_parses_mode() {
        let cli = Cli::try_parse_from(["gesture-voice-control", "--mode", "both"]).unwrap();
        assert_eq!(cli.mode, Some(Mode::Both));
        assert!(Cli::try_parse_from(["gesture-voice-control", "--mode", "dance"]).is_err());
    }
}
