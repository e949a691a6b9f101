//! Application settings structs, defaults and TOML persistence.
//!
//! All structs implement `Serialize`, `Deserialize`, `Default` and `Clone`
//! so they can be round-tripped through TOML files and shared across threads.
//! Every section is `#[serde(default)]`, so a partial `settings.toml` only
//! overrides the keys it names.

use std::collections::BTreeMap;
use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::AppPaths;
use crate::gesture::GestureThresholds;

// ---------------------------------------------------------------------------
// GestureConfig
// ---------------------------------------------------------------------------

/// Swipe detection and landmark-extractor settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureConfig {
    /// Minimum horizontal centroid movement between frames, in pixels.
    pub swipe_threshold: f32,
    /// Minimum vertical centroid movement between frames, in pixels.
    pub vertical_threshold: f32,
    /// Seconds after a swipe during which further swipes are ignored.
    pub cooldown_secs: f32,
    /// Argv of the external hand-landmark extractor.  It must print one JSON
    /// object per camera frame on stdout.
    pub landmark_command: Vec<String>,
    /// Flip x coordinates (selfie view).
    pub mirror: bool,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            swipe_threshold: 40.0,
            vertical_threshold: 40.0,
            cooldown_secs: 1.0,
            landmark_command: vec!["hand-landmarks".into(), "--camera".into(), "0".into()],
            mirror: true,
        }
    }
}

impl GestureConfig {
    /// Classifier thresholds.  Non-positive or non-finite values, and
    /// cooldowns too long for a `Duration`, are replaced by their defaults
    /// with a warning.
    pub fn thresholds(&self) -> GestureThresholds {
        let defaults = GestureThresholds::default();

        let positive = |name: &str, value: f32, fallback: f32| {
            if value.is_finite() && value > 0.0 {
                value
            } else {
                log::warn!("config: gesture.{name} = {value} is not positive, using {fallback}");
                fallback
            }
        };

        let secs = positive("cooldown_secs", self.cooldown_secs, defaults.cooldown.as_secs_f32());
        let cooldown = Duration::try_from_secs_f32(secs).unwrap_or_else(|e| {
            log::warn!(
                "config: gesture.cooldown_secs = {secs} ({e}), using {:?}",
                defaults.cooldown
            );
            defaults.cooldown
        });

        GestureThresholds {
            swipe: positive("swipe_threshold", self.swipe_threshold, defaults.swipe),
            vertical: positive("vertical_threshold", self.vertical_threshold, defaults.vertical),
            cooldown,
        }
    }
}

// ---------------------------------------------------------------------------
// VoiceConfig
// ---------------------------------------------------------------------------

/// Which speech engine backs the voice loop.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpeechEngineKind {
    /// In-process Whisper over segmented utterances.
    #[default]
    Whisper,
    /// A child process speaking the JSON-lines protocol.
    External,
}

/// Microphone and speech-engine settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VoiceConfig {
    pub engine: SpeechEngineKind,
    /// Whisper model id (see `stt::COMMAND_MODELS`).
    pub model: String,
    /// ISO-639-1 code, or `"auto"`.
    pub language: String,
    /// Samples per audio block at 16 kHz.
    pub block_size: usize,
    /// RMS level above which a block counts as speech.
    pub vad_threshold: f32,
    /// Silent blocks that end an utterance.
    pub trailing_silence_blocks: usize,
    /// Argv for [`SpeechEngineKind::External`].  `{sample_rate}` and
    /// `{grammar}` are substituted.
    pub external_command: Vec<String>,
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            engine: SpeechEngineKind::default(),
            model: "base.en".into(),
            language: "en".into(),
            block_size: 8_000,
            vad_threshold: 0.01,
            trailing_silence_blocks: 1,
            external_command: vec![
                "vosk-stream".into(),
                "--rate".into(),
                "{sample_rate}".into(),
                "--grammar".into(),
                "{grammar}".into(),
            ],
        }
    }
}

// ---------------------------------------------------------------------------
// WindowConfig
// ---------------------------------------------------------------------------

/// The game window that receives key presses.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Title (or unique substring) of the target window.
    pub title: String,
    /// Argv run before each key press to raise the window, e.g.
    /// `["wmctrl", "-a", "{title}"]`.  `None` skips focusing.
    pub focus_command: Option<Vec<String>>,
    /// Pause after focusing, in milliseconds.
    pub settle_ms: u64,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "SUBWAY SURFERS - Play Online for Free! | Poki - Brave".into(),
            focus_command: None,
            settle_ms: 100,
        }
    }
}

// ---------------------------------------------------------------------------
// HotkeyConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HotkeyConfig {
    /// Key that stops a running session (e.g. `"Escape"`, `"Q"`).
    pub abort_key: String,
}

impl Default for HotkeyConfig {
    fn default() -> Self {
        Self {
            abort_key: "Escape".into(),
        }
    }
}

// ---------------------------------------------------------------------------
// AppConfig  (top-level)
// ---------------------------------------------------------------------------

/// Default command → key-name table.  `write` is a common mishearing of
/// `right` and is bound to the same key.
pub fn default_keys() -> BTreeMap<String, String> {
    [
        ("left", "Left"),
        ("right", "Right"),
        ("write", "Right"),
        ("jump", "Up"),
        ("roll", "Down"),
        ("hoverboard", "Space"),
    ]
    .into_iter()
    .map(|(command, key)| (command.to_string(), key.to_string()))
    .collect()
}

/// Top-level application configuration, serialised as `settings.toml`.
///
/// # Persistence
///
/// ```rust,no_run
/// use gesture_voice_control::config::AppConfig;
///
/// // Load (returns Default when file is missing)
/// let config = AppConfig::load().unwrap();
///
/// // Modify and save
/// // config.save().unwrap();
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub gesture: GestureConfig,
    pub voice: VoiceConfig,
    /// Command name → key name.
    pub keys: BTreeMap<String, String>,
    pub window: WindowConfig,
    pub hotkey: HotkeyConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            gesture: GestureConfig::default(),
            voice: VoiceConfig::default(),
            keys: default_keys(),
            window: WindowConfig::default(),
            hotkey: HotkeyConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the platform-appropriate `settings.toml`.
    ///
    /// Returns `Ok(AppConfig::default())` when the file does not exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&AppPaths::new().settings_file)
    }

    /// Load from an explicit path.
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to the platform-appropriate `settings.toml`,
    /// creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&AppPaths::new().settings_file)
    }

    /// Save to an explicit path.
    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
