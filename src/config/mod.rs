//! Configuration: `AppConfig` (one section per subsystem), `AppPaths` for
//! platform directories, and TOML persistence via `AppConfig::load` /
//! `AppConfig::save`.

pub mod paths;
pub mod settings;

pub use paths::AppPaths;
pub use settings::{
    default_keys, AppConfig, GestureConfig, HotkeyConfig, SpeechEngineKind, VoiceConfig,
    WindowConfig,
};
