//! Label-keyed command table.

use indexmap::IndexMap;
use thiserror::Error;

use crate::command::CommandDescriptor;

/// Error returned when registering a label that is already taken.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("a command labelled `{0}` is already registered")]
pub struct DuplicateLabelError(pub String);

/// Registry of command descriptors, keyed by label.
///
/// Labels match case-insensitively. Registering a label twice is a
/// configuration error and leaves the first registration active; iteration
/// follows registration order.
pub struct CommandRegistry<E, R> {
    commands: IndexMap<String, CommandDescriptor<E, R>>,
}

impl<E, R> CommandRegistry<E, R> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            commands: IndexMap::new(),
        }
    }

    /// Register a command descriptor.
    pub fn register(
        &mut self,
        descriptor: CommandDescriptor<E, R>,
    ) -> Result<(), DuplicateLabelError> {
        let label = descriptor.label().to_string();

        if self.commands.contains_key(&label) {
            return Err(DuplicateLabelError(label));
        }

        self.commands.insert(label, descriptor);
        Ok(())
    }

    /// Look a command up by label, case-insensitively.
    pub fn lookup(&self, label: &str) -> Option<&CommandDescriptor<E, R>> {
        self.commands.get(&label.to_lowercase())
    }

    /// Check whether a label is registered.
    pub fn contains(&self, label: &str) -> bool {
        self.commands.contains_key(&label.to_lowercase())
    }

    /// Iterate over all descriptors in registration order.
    pub fn all(&self) -> impl Iterator<Item = &CommandDescriptor<E, R>> {
        self.commands.values()
    }

    /// The number of registered commands.
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Whether no command is registered.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

impl<E, R> Default for CommandRegistry<E, R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E, R> std::fmt::Debug for CommandRegistry<E, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandRegistry")
            .field("commands", &self.commands.keys().collect::<Vec<_>>())
            .finish()
    }
}
