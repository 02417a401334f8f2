//! Command registry.
//!
//! Commands are declared at startup in two steps:
//!
//! 1. [`CommandRegistry::describe_argument`] attaches argument descriptors to a
//!    handler that has not been named yet. Descriptors accumulate in call order.
//! 2. [`CommandRegistry::register_command`] names the handler, moving its
//!    pending descriptors into the finished [`Command`].
//!
//! ```
//! use context_server::registry::{from_fn, Arguments, CommandRegistry};
//!
//! let mut registry = CommandRegistry::new();
//!
//! let echo = from_fn(|args: Arguments| async move {
//!     Ok(format!("Echo: {}", args.get_str("message")?))
//! });
//! registry.describe_argument(&echo, "message", "str", "Message to echo");
//! registry.register_command("echo", echo, "Echo command");
//!
//! assert_eq!(registry.get("echo").unwrap().arguments().len(), 1);
//! ```
//!
//! Pending descriptors are keyed by the handler's concrete type, so two
//! handlers of the same type share one pending list until the next
//! registration claims it.

mod arguments;
mod handler;

pub use arguments::Arguments;
pub use handler::{from_fn, CommandHandler, FnHandler};

use std::any::TypeId;
use std::collections::HashMap;
use std::fmt;

use indexmap::IndexMap;

use crate::error::CommandError;

/// Describes one parameter of a [`Command`].
///
/// The type label is informational only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgumentDescriptor {
    /// Parameter name as passed by callers.
    pub name: String,
    /// Declared type, e.g. "str" or "int".
    pub type_label: String,
    /// Help text shown during discovery.
    pub description: String,
}

impl ArgumentDescriptor {
    /// Creates a new descriptor.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        type_label: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            type_label: type_label.into(),
            description: description.into(),
        }
    }
}

/// A registered command: name, help text, argument schema and handler.
pub struct Command {
    name: String,
    description: String,
    arguments: Vec<ArgumentDescriptor>,
    handler: Box<dyn CommandHandler>,
}

impl Command {
    /// The registry key.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Free-text description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Argument descriptors in declaration order.
    #[must_use]
    pub fn arguments(&self) -> &[ArgumentDescriptor] {
        &self.arguments
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("arguments", &self.arguments)
            .finish_non_exhaustive()
    }
}

/// Mapping from command name to [`Command`], in registration order.
#[derive(Debug, Default)]
pub struct CommandRegistry {
    commands: IndexMap<String, Command>,
    pending: HashMap<TypeId, Vec<ArgumentDescriptor>>,
}

impl CommandRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an argument descriptor to `handler`'s pending schema.
    pub fn describe_argument<H: CommandHandler + 'static>(
        &mut self,
        _handler: &H,
        name: impl Into<String>,
        type_label: impl Into<String>,
        description: impl Into<String>,
    ) -> &mut Self {
        self.pending
            .entry(TypeId::of::<H>())
            .or_default()
            .push(ArgumentDescriptor::new(name, type_label, description));
        self
    }

    /// Registers `handler` under `name`, claiming its pending descriptors.
    ///
    /// An existing command with the same name is replaced. It keeps its
    /// position in [`list`](Self::list).
    pub fn register_command<H: CommandHandler + 'static>(
        &mut self,
        name: impl Into<String>,
        handler: H,
        description: impl Into<String>,
    ) -> &mut Self {
        let name = name.into();
        let arguments = self.pending.remove(&TypeId::of::<H>()).unwrap_or_default();

        tracing::debug!(
            command = %name,
            arguments = arguments.len(),
            "Registered command"
        );

        let command = Command {
            name: name.clone(),
            description: description.into(),
            arguments,
            handler: Box::new(handler),
        };

        if let Some(previous) = self.commands.insert(name, command) {
            tracing::debug!(command = %previous.name, "Replaced existing command");
        }

        self
    }

    /// Drops descriptors that no registration claimed.
    ///
    /// Returns how many descriptors were discarded.
    pub fn discard_pending(&mut self) -> usize {
        let mut discarded = 0;
        for (_, descriptors) in self.pending.drain() {
            for descriptor in &descriptors {
                tracing::warn!(
                    argument = %descriptor.name,
                    "Argument was described but never attached to a command"
                );
            }
            discarded += descriptors.len();
        }
        discarded
    }

    /// Looks up a command by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Command> {
        self.commands.get(name)
    }

    /// Iterates over all commands in registration order.
    pub fn list(&self) -> impl Iterator<Item = &Command> {
        self.commands.values()
    }

    /// Number of registered commands.
    #[must_use]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Whether no commands are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Runs the command `name` with `arguments`.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::NotFound`] if no such command exists, otherwise
    /// whatever the handler returns.
    pub async fn invoke(&self, name: &str, arguments: Arguments) -> Result<String, CommandError> {
        let command = self.get(name).ok_or_else(|| CommandError::NotFound {
            name: name.to_string(),
        })?;

        command.handler.call(arguments).await
    }
}
