//! Transcript → command resolution via an ordered synonym rule table.
//!
//! # Priority
//!
//! | # | Group    | Patterns (substring match)                                  | Command |
//! |---|----------|-------------------------------------------------------------|---------|
//! | 0 | stop     | transcript is exactly `exit`                                | stop    |
//! | 1 | roll     | roll, role, down, downward, downwards                       | Roll    |
//! | 2 | right    | right, write, rite, correct, right side, light, turn right  | Right   |
//! | 3 | generic  | left, right, write, jump, roll, hoverboard, exit            | per word|
//!
//! Groups are evaluated top to bottom and the first matching pattern wins.
//! "roll"/"down" and "right"/"write" are easily confused by the recognizer,
//! so their synonym groups run before the generic vocabulary scan.

use crate::command::Command;

// ---------------------------------------------------------------------------
// Rule table
// ---------------------------------------------------------------------------

/// Substring patterns that all resolve to one command.
#[derive(Debug, Clone, Copy)]
pub struct SynonymRule {
    pub patterns: &'static [&'static str],
    pub command: Command,
}

/// A named, ordered list of rules.
#[derive(Debug, Clone, Copy)]
pub struct RuleGroup {
    pub name: &'static str,
    pub rules: &'static [SynonymRule],
}

/// Transcript that stops the voice loop.  Compared for equality, not
/// containment.
pub const STOP_WORD: &str = "exit";

pub const ROLL_SYNONYMS: &[&str] = &["roll", "role", "down", "downward", "downwards"];

pub const RIGHT_SYNONYMS: &[&str] = &[
    "right",
    "write",
    "rite",
    "correct",
    "right side",
    "light",
    "turn right",
];

/// Rule groups in evaluation order.
pub const RULE_GROUPS: [RuleGroup; 3] = [
    RuleGroup {
        name: "roll synonyms",
        rules: &[SynonymRule {
            patterns: ROLL_SYNONYMS,
            command: Command::Roll,
        }],
    },
    RuleGroup {
        name: "right synonyms",
        rules: &[SynonymRule {
            patterns: RIGHT_SYNONYMS,
            command: Command::Right,
        }],
    },
    RuleGroup {
        name: "vocabulary",
        rules: &[
            SynonymRule { patterns: &["left"], command: Command::Left },
            SynonymRule { patterns: &["right"], command: Command::Right },
            SynonymRule { patterns: &["write"], command: Command::Right },
            SynonymRule { patterns: &["jump"], command: Command::Jump },
            SynonymRule { patterns: &["roll"], command: Command::Roll },
            SynonymRule { patterns: &["hoverboard"], command: Command::Hoverboard },
            SynonymRule { patterns: &["exit"], command: Command::Exit },
        ],
    },
];

// ---------------------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------------------

/// Outcome of [`resolve`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Resolution {
    pub command: Option<Command>,
    /// The transcript asked the voice loop to stop.
    pub stop: bool,
}

impl Resolution {
    pub const NONE: Resolution = Resolution {
        command: None,
        stop: false,
    };

    pub const STOP: Resolution = Resolution {
        command: None,
        stop: true,
    };

    pub fn command(command: Command) -> Self {
        Self {
            command: Some(command),
            stop: false,
        }
    }
}

/// Map a finalized transcript onto the command vocabulary.
///
/// Deterministic and total: every input yields a [`Resolution`].
pub fn resolve(transcript: &str) -> Resolution {
    let text = transcript.trim().to_lowercase();

    if text == STOP_WORD {
        return Resolution::STOP;
    }
    if text.is_empty() {
        return Resolution::NONE;
    }

    match match_rules(&text, &RULE_GROUPS) {
        Some((_, command)) => Resolution::command(command),
        None => Resolution::NONE,
    }
}

/// First `(group name, command)` whose pattern occurs in `text`.
pub fn match_rules(text: &str, groups: &[RuleGroup]) -> Option<(&'static str, Command)> {
    groups.iter().find_map(|group| {
        group
            .rules
            .iter()
            .find(|rule| rule.patterns.iter().any(|p| text.contains(p)))
            .map(|rule| (group.name, rule.command))
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roll_phrase() {
        assert_eq!(resolve("please roll now"), Resolution::command(Command::Roll));
    }

    #[test]
    fn turn_right_phrase() {
        assert_eq!(resolve("turn right please"), Resolution::command(Command::Right));
    }

    #[test]
    fn exact_exit_stops() {
        assert_eq!(resolve("exit"), Resolution::STOP);
        assert_eq!(resolve("  exit \n"), Resolution::STOP);
    }

    #[test]
    fn unrelated_word_resolves_to_nothing() {
        assert_eq!(resolve("banana"), Resolution::NONE);
        assert_eq!(resolve(""), Resolution::NONE);
    }

    #[test]
    fn exit_inside_a_phrase_is_a_command_not_a_stop() {
        assert_eq!(resolve("exit now"), Resolution::command(Command::Exit));
    }

    #[test]
    fn roll_group_beats_everything() {
        // "down" (group 1) wins over "left" (group 3) and "right" (group 2).
        assert_eq!(resolve("left right down"), Resolution::command(Command::Roll));
        assert_eq!(resolve("downwards"), Resolution::command(Command::Roll));
        assert_eq!(resolve("role"), Resolution::command(Command::Roll));
    }

    #[test]
    fn right_synonyms_resolve_to_right() {
        for phrase in ["write", "rite", "that is correct", "light", "right side"] {
            assert_eq!(resolve(phrase), Resolution::command(Command::Right), "{phrase}");
        }
    }

    #[test]
    fn right_group_beats_generic_left() {
        assert_eq!(resolve("left or right"), Resolution::command(Command::Right));
    }

    #[test]
    fn generic_vocabulary() {
        assert_eq!(resolve("left"), Resolution::command(Command::Left));
        assert_eq!(resolve("jump"), Resolution::command(Command::Jump));
        assert_eq!(resolve("hoverboard"), Resolution::command(Command::Hoverboard));
    }

    #[test]
    fn generic_scan_follows_vocabulary_order() {
        // Both "left" and "jump" appear; "left" comes first in the vocabulary.
        assert_eq!(resolve("jump left"), Resolution::command(Command::Left));
    }

    #[test]
    fn matching_is_substring_based() {
        // "slight" contains "light".
        assert_eq!(resolve("slight"), Resolution::command(Command::Right));
        // "jumping" contains "jump".
        assert_eq!(resolve("jumping"), Resolution::command(Command::Jump));
    }

    #[test]
    fn uppercase_input_is_normalised() {
        assert_eq!(resolve("JUMP"), Resolution::command(Command::Jump));
        assert_eq!(resolve("EXIT"), Resolution::STOP);
    }

    #[test]
    fn match_rules_reports_the_winning_group() {
        assert_eq!(
            match_rules("downward", &RULE_GROUPS),
            Some(("roll synonyms", Command::Roll))
        );
        assert_eq!(
            match_rules("hoverboard", &RULE_GROUPS),
            Some(("vocabulary", Command::Hoverboard))
        );
        assert_eq!(match_rules("banana", &RULE_GROUPS), None);
    }

    #[test]
    fn custom_table_is_evaluated_independently() {
        const GROUPS: [RuleGroup; 1] = [RuleGroup {
            name: "only jump",
            rules: &[SynonymRule { patterns: &["hop"], command: Command::Jump }],
        }];
        assert_eq!(match_rules("hop hop", &GROUPS), Some(("only jump", Command::Jump)));
        assert_eq!(match_rules("roll", &GROUPS), None);
    }
}
