//! The closed command vocabulary shared by the gesture and voice recognizers.
//!
//! Both recognizers resolve their input into a [`Command`]; the key-injection
//! sink turns a command into a platform key press.  `write` is accepted as a
//! spoken/configured alias of [`Command::Right`] and never exists as a value
//! of its own.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Command
// ---------------------------------------------------------------------------

/// One of the six discrete control actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Command {
    Left,
    Right,
    Jump,
    Roll,
    Hoverboard,
    /// Stop word.  Resolved by the voice mapper as a stop request; when it
    /// reaches the sink it has no key binding.
    Exit,
}

/// Words the speech engine's grammar is restricted to.
pub const GRAMMAR: [&str; 6] = ["left", "right", "jump", "roll", "hoverboard", "exit"];

impl Command {
    /// Every command, in vocabulary order.
    pub const ALL: [Command; 6] = [
        Command::Left,
        Command::Right,
        Command::Jump,
        Command::Roll,
        Command::Hoverboard,
        Command::Exit,
    ];

    /// Canonical lowercase name, as used in the key table and the grammar.
    pub fn as_str(&self) -> &'static str {
        match self {
            Command::Left => "left",
            Command::Right => "right",
            Command::Jump => "jump",
            Command::Roll => "roll",
            Command::Hoverboard => "hoverboard",
            Command::Exit => "exit",
        }
    }

    /// On-screen feedback text, e.g. `"Command: LEFT"`.
    pub fn label(&self) -> String {
        format!("Command: {}", self.as_str().to_uppercase())
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown command name: {0:?}")]
pub struct UnknownCommandName(pub String);

impl FromStr for Command {
    type Err = UnknownCommandName;

    /// Parses a canonical name or the `write` alias.  Case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "left" => Ok(Command::Left),
            "right" | "write" => Ok(Command::Right),
            "jump" => Ok(Command::Jump),
            "roll" => Ok(Command::Roll),
            "hoverboard" => Ok(Command::Hoverboard),
            "exit" => Ok(Command::Exit),
            _ => Err(UnknownCommandName(s.to_string())),
        }
    }
}

/// The grammar as a JSON array string, the form phrase-list speech engines
/// accept (e.g. `["left","right",...]`).
pub fn grammar_json() -> String {
    serde_json::to_string(&GRAMMAR).unwrap_or_else(|_| String::from("[]"))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_is_an_alias_of_right() {
        assert_eq!("write".parse::<Command>(), Ok(Command::Right));
        assert_eq!("Right".parse::<Command>(), Ok(Command::Right));
    }

    #[test]
    fn unknown_name_is_rejected() {
        let err = "banana".parse::<Command>().unwrap_err();
        assert!(err.to_string().contains("banana"));
    }

    #[test]
    fn every_command_round_trips_through_its_name() {
        for cmd in Command::ALL {
            assert_eq!(cmd.as_str().parse::<Command>(), Ok(cmd));
        }
    }

    #[test]
    fn label_is_uppercase() {
        assert_eq!(Command::Hoverboard.label(), "Command: HOVERBOARD");
    }

    #[test]
    fn grammar_matches_vocabulary_order() {
        let names: Vec<&str> = Command::ALL.iter().map(Command::as_str).collect();
        assert_eq!(names, GRAMMAR);
        assert_eq!(
            grammar_json(),
            r#"["left","right","jump","roll","hoverboard","exit"]"#
        );
    }

    #[test]
    fn serde_uses_lowercase_names() {
        let json = serde_json::to_string(&Command::Jump).unwrap();
        assert_eq!(json, "\"jump\"");
    }
}
