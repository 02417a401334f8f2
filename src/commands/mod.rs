//! Built-in commands shipped with the server binary.

mod rot13;

pub use rot13::Rot13;

use crate::registry::CommandRegistry;

/// Registers every built-in command.
pub fn register_builtin(registry: &mut CommandRegistry) {
    registry.describe_argument(&Rot13, "input", "str", "String to rot13");
    registry.register_command("rot13", Rot13, "Perform a rot13 transformation");
}
