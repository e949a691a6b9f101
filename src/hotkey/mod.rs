//! Global abort key, backed by `rdev`.
//!
//! `rdev::listen()` is a blocking OS-level call that never returns while the
//! process is alive.  It must run on a **dedicated OS thread**; see
//! [`AbortKeyListener`].
//!
//! The gesture loop does not block on the keyboard.  It asks an [`AbortKey`]
//! once per frame whether the key was pressed since the last check.
//!
//! ```no_run
//! use gesture_voice_control::hotkey::{parse_key, AbortKey, AbortKeyListener};
//!
//! let key = parse_key("Escape").expect("unknown key");
//! let listener = AbortKeyListener::start(key).expect("listener thread");
//! if listener.take_pressed() {
//!     println!("abort");
//! }
//! ```

pub mod listener;

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

pub use listener::AbortKeyListener;

// ---------------------------------------------------------------------------
// AbortKey
// ---------------------------------------------------------------------------

/// A latched "stop now" key press.
pub trait AbortKey: Send + Sync {
    /// `true` once per press; reading clears the latch.
    fn take_pressed(&self) -> bool;

    /// Forget any press that happened before now.
    fn clear(&self);
}

const _: fn() = || {
    fn _assert_object_safe(_: Arc<dyn AbortKey>) {}
};

/// Shared press flag.  Clones observe the same latch.
#[derive(Debug, Clone, Default)]
pub struct KeyLatch {
    pressed: Arc<AtomicBool>,
}

impl KeyLatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&self) {
        self.pressed.store(true, Ordering::SeqCst);
    }
}

impl AbortKey for KeyLatch {
    fn take_pressed(&self) -> bool {
        self.pressed.swap(false, Ordering::SeqCst)
    }

    fn clear(&self) {
        self.pressed.store(false, Ordering::SeqCst);
    }
}

// ---------------------------------------------------------------------------
// parse_key
// ---------------------------------------------------------------------------

/// Parse a key name from a config string into an [`rdev::Key`].
///
/// Case-insensitive.  Supports F1–F12, common named keys, and single ASCII
/// letters.
///
/// ```
/// use gesture_voice_control::hotkey::parse_key;
///
/// assert_eq!(parse_key("Escape"), Some(rdev::Key::Escape));
/// assert_eq!(parse_key("q"),      Some(rdev::Key::KeyQ));
/// assert_eq!(parse_key("xyz"),    None);
/// ```
pub fn parse_key(key_str: &str) -> Option<rdev::Key> {
    use rdev::Key;

    let name = key_str.trim().to_ascii_lowercase();
    let key = match name.as_str() {
        "f1" => Key::F1,
        "f2" => Key::F2,
        "f3" => Key::F3,
        "f4" => Key::F4,
        "f5" => Key::F5,
        "f6" => Key::F6,
        "f7" => Key::F7,
        "f8" => Key::F8,
        "f9" => Key::F9,
        "f10" => Key::F10,
        "f11" => Key::F11,
        "f12" => Key::F12,

        "escape" | "esc" => Key::Escape,
        "space" => Key::Space,
        "return" | "enter" => Key::Return,
        "tab" => Key::Tab,
        "backspace" => Key::Backspace,
        "delete" | "del" => Key::Delete,
        "home" => Key::Home,
        "end" => Key::End,
        "pause" => Key::Pause,

        "a" => Key::KeyA,
        "b" => Key::KeyB,
        "c" => Key::KeyC,
        "d" => Key::KeyD,
        "e" => Key::KeyE,
        "f" => Key::KeyF,
        "g" => Key::KeyG,
        "h" => Key::KeyH,
        "i" => Key::KeyI,
        "j" => Key::KeyJ,
        "k" => Key::KeyK,
        "l" => Key::KeyL,
        "m" => Key::KeyM,
        "n" => Key::KeyN,
        "o" => Key::KeyO,
        "p" => Key::KeyP,
        "q" => Key::KeyQ,
        "r" => Key::KeyR,
        "s" => Key::KeyS,
        "t" => Key::KeyT,
        "u" => Key::KeyU,
        "v" => Key::KeyV,
        "w" => Key::KeyW,
        "x" => Key::KeyX,
        "y" => Key::KeyY,
        "z" => Key::KeyZ,

        _ => return None,
    };
    Some(key)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
