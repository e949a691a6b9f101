//! [`KeyboardSink`]: commands become focused key presses.

use std::collections::{BTreeMap, HashMap};
use std::str::FromStr;

use crate::command::Command;

use super::focus::WindowFocuser;
use super::keyboard::{parse_key_name, EnigoKeys, KeyCode, KeyPresser};
use super::{CommandSink, DispatchError};

// ---------------------------------------------------------------------------
// KeyBindings
// ---------------------------------------------------------------------------

/// Command → key lookup built from the `[keys]` config table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeyBindings {
    map: HashMap<Command, KeyCode>,
}

impl KeyBindings {
    /// Unknown command or key names are skipped with a warning.  An alias
    /// (`write`) never overrides the binding of its canonical name (`right`).
    pub fn from_names(table: &BTreeMap<String, String>) -> Self {
        let mut map = HashMap::new();
        let mut aliases = Vec::new();

        for (name, key_name) in table {
            let Ok(command) = Command::from_str(name) else {
                log::warn!("dispatch: ignoring binding for unknown command {name:?}");
                continue;
            };
            let Some(key) = parse_key_name(key_name) else {
                log::warn!("dispatch: ignoring unknown key {key_name:?} for {name:?}");
                continue;
            };
            if name.eq_ignore_ascii_case(command.as_str()) {
                map.insert(command, key);
            } else {
                aliases.push((command, key));
            }
        }
        for (command, key) in aliases {
            map.entry(command).or_insert(key);
        }

        Self { map }
    }

    pub fn get(&self, command: Command) -> Option<KeyCode> {
        self.map.get(&command).copied()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

// ---------------------------------------------------------------------------
// KeyboardSink
// ---------------------------------------------------------------------------

pub struct KeyboardSink {
    bindings: KeyBindings,
    focuser: WindowFocuser,
    keys: Box<dyn KeyPresser>,
}

impl KeyboardSink {
    pub fn new(bindings: KeyBindings, focuser: WindowFocuser) -> Self {
        Self::with_presser(bindings, focuser, Box::new(EnigoKeys))
    }

    pub fn with_presser(bindings: KeyBindings, focuser: WindowFocuser, keys: Box<dyn KeyPresser>) -> Self {
        Self {
            bindings,
            focuser,
            keys,
        }
    }
}

impl CommandSink for KeyboardSink {
    fn dispatch(&self, command: Command) -> Result<(), DispatchError> {
        let key = self
            .bindings
            .get(command)
            .ok_or(DispatchError::UnknownCommand(command))?;

        if let Err(e) = self.focuser.focus() {
            log::warn!("dispatch: {e}");
        }

        match self.keys.click(key) {
            Ok(()) => log::debug!("dispatch: {command} -> {key:?}"),
            Err(e) => log::warn!("dispatch: {command}: {e}"),
        }
        Ok(())
    }
}
