//! Console command table and line tokenisation.

use std::{collections::BTreeMap, fmt};

use money_tweaks_core::{CommandDefinition, CommandHandler, RegistrationError};

pub(crate) struct RegisteredCommand {
    pub(crate) definition: CommandDefinition,
    pub(crate) handler: CommandHandler,
}

/// Registered console commands keyed by name.
#[derive(Default)]
pub(crate) struct CommandTable {
    entries: BTreeMap<String, RegisteredCommand>,
}

impl CommandTable {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(
        &mut self,
        definition: CommandDefinition,
        handler: CommandHandler,
    ) -> Result<(), RegistrationError> {
        let name = definition.name.clone();
        if name.is_empty() || name.chars().any(char::is_whitespace) {
            return Err(RegistrationError::InvalidName(name));
        }
        if self.entries.contains_key(&name) {
            return Err(RegistrationError::DuplicateCommand(name));
        }
        let _ = self
            .entries
            .insert(name, RegisteredCommand { definition, handler });
        Ok(())
    }

    pub(crate) fn remove(&mut self, name: &str) -> bool {
        self.entries.remove(name).is_some()
    }

    pub(crate) fn get_mut(&mut self, name: &str) -> Option<&mut RegisteredCommand> {
        self.entries.get_mut(name)
    }

    pub(crate) fn definition(&self, name: &str) -> Option<&CommandDefinition> {
        self.entries.get(name).map(|entry| &entry.definition)
    }

    pub(crate) fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

impl fmt::Debug for CommandTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.entries.keys()).finish()
    }
}

/// Splits a console line on whitespace, keeping double-quoted runs together.
pub fn tokenize(line: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut quoted = false;
    let mut pending = false;

    for ch in line.chars() {
        match ch {
            '"' => {
                quoted = !quoted;
                pending = true;
            }
            c if c.is_whitespace() && !quoted => {
                if pending {
                    tokens.push(std::mem::take(&mut current));
                    pending = false;
                }
            }
            c => {
                current.push(c);
                pending = true;
            }
        }
    }
    if pending {
        tokens.push(current);
    }
    tokens
}
