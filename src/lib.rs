//! context-server: expose slash-commands as prompts over line-delimited JSON-RPC
//!
//! A host application (an editor, an assistant) launches the server and talks
//! to it over stdin/stdout. It can discover the available commands and their
//! arguments, and run a command by name to get back a text result.
//!
//! # Usage
//!
//! ```no_run
//! use context_server::mcp::{ContextServer, ServerInfo};
//! use context_server::registry::{from_fn, Arguments, CommandRegistry};
//!
//! # async fn serve() -> std::io::Result<()> {
//! let mut registry = CommandRegistry::new();
//!
//! let greet = from_fn(|args: Arguments| async move {
//!     Ok(format!("Hello, {}!", args.get_str("name")?))
//! });
//! registry.describe_argument(&greet, "name", "str", "Who to greet");
//! registry.register_command("greet", greet, "Say hello");
//!
//! ContextServer::new(registry, ServerInfo::default()).run().await
//! # }
//! ```
//!
//! # Modules
//!
//! - [`registry`]: Commands, argument descriptors and the registry
//! - [`mcp`]: JSON-RPC protocol, dispatcher and the stdio server loop
//! - [`commands`]: Built-in commands (`rot13`)
//! - [`config`]: Configuration loading and validation
//! - [`error`]: Error types

pub mod commands;
pub mod config;
pub mod error;
pub mod mcp;
pub mod registry;
