//! Single key presses backed by the `enigo` crate.

use enigo::{Direction, Enigo, Key, Keyboard, Settings};

use super::DispatchError;

// ---------------------------------------------------------------------------
// KeyCode
// ---------------------------------------------------------------------------

/// The keys a command can be bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Left,
    Right,
    Up,
    Down,
    Space,
    /// A printable key, stored lowercase.
    Char(char),
}

impl KeyCode {
    pub fn to_enigo(self) -> Key {
        match self {
            Self::Left => Key::LeftArrow,
            Self::Right => Key::RightArrow,
            Self::Up => Key::UpArrow,
            Self::Down => Key::DownArrow,
            Self::Space => Key::Space,
            Self::Char(c) => Key::Unicode(c),
        }
    }
}

/// Parse a config key name (`"Left"`, `"ArrowUp"`, `"space"`, `"w"`).
///
/// Case-insensitive; `None` for anything else.
pub fn parse_key_name(name: &str) -> Option<KeyCode> {
    let lower = name.trim().to_ascii_lowercase();
    let key = match lower.as_str() {
        "left" | "leftarrow" | "arrowleft" => KeyCode::Left,
        "right" | "rightarrow" | "arrowright" => KeyCode::Right,
        "up" | "uparrow" | "arrowup" => KeyCode::Up,
        "down" | "downarrow" | "arrowdown" => KeyCode::Down,
        "space" => KeyCode::Space,
        other => {
            let mut chars = other.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) if c.is_ascii_graphic() => KeyCode::Char(c),
                _ => return None,
            }
        }
    };
    Some(key)
}

// ---------------------------------------------------------------------------
// KeyPresser
// ---------------------------------------------------------------------------

/// Performs one OS-level key click.
pub trait KeyPresser: Send + Sync {
    fn click(&self, key: KeyCode) -> Result<(), DispatchError>;
}

/// Production presser.
///
/// A new [`Enigo`] instance is created for each call because `Enigo` is not
/// `Send` and the handle is cheap to construct.
#[derive(Debug, Default, Clone, Copy)]
pub struct EnigoKeys;

impl KeyPresser for EnigoKeys {
    fn click(&self, key: KeyCode) -> Result<(), DispatchError> {
        let mut enigo =
            Enigo::new(&Settings::default()).map_err(|e| DispatchError::Injection(e.to_string()))?;
        enigo
            .key(key.to_enigo(), Direction::Click)
            .map_err(|e| DispatchError::Injection(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_arrow_names_in_any_case() {
        assert_eq!(parse_key_name("Left"), Some(KeyCode::Left));
        assert_eq!(parse_key_name("RIGHT"), Some(KeyCode::Right));
        assert_eq!(parse_key_name("ArrowUp"), Some(KeyCode::Up));
        assert_eq!(parse_key_name("downarrow"), Some(KeyCode::Down));
        assert_eq!(parse_key_name("Space"), Some(KeyCode::Space));
    }

    #[test]
    fn single_characters_become_char_keys() {
        assert_eq!(parse_key_name("W"), Some(KeyCode::Char('w')));
        assert_eq!(parse_key_name("1"), Some(KeyCode::Char('1')));
    }

    #[test]
    fn unknown_names_are_rejected() {
        assert_eq!(parse_key_name(""), None);
        assert_eq!(parse_key_name("hyperdrive"), None);
        assert_eq!(parse_key_name("é"), None);
    }

    #[test]
    fn arrows_map_to_enigo_arrows() {
        assert_eq!(KeyCode::Left.to_enigo(), Key::LeftArrow);
        assert_eq!(KeyCode::Space.to_enigo(), Key::Space);
        assert_eq!(KeyCode::Char('w').to_enigo(), Key::Unicode('w'));
    }
}
