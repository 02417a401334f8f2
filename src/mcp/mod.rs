//! JSON-RPC prompts server.
//!
//! Exposes the command registry to a host application over stdio using
//! newline-delimited JSON-RPC 2.0 messages.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       Context Server                        │
//! │                                                             │
//! │   ┌─────────────┐    ┌─────────────┐    ┌─────────────┐    │
//! │   │  Transport  │───▶│ Dispatcher  │───▶│  Registry   │    │
//! │   │   (stdio)   │    │  (routing)  │    │ (commands)  │    │
//! │   └─────────────┘    └─────────────┘    └─────────────┘    │
//! │          │                  │                              │
//! │          ▼                  ▼                              │
//! │   ┌─────────────────────────────────────────────────┐      │
//! │   │              JSON-RPC Messages                  │      │
//! │   └─────────────────────────────────────────────────┘      │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Methods
//!
//! - `initialize`: capabilities and server info
//! - `prompts/list`: registered commands and their arguments
//! - `prompts/get`: run a command, returning its text output

pub mod dispatcher;
pub mod protocol;
pub mod server;
pub mod transport;

pub use dispatcher::{Dispatcher, ServerInfo};
pub use protocol::{JsonRpcError, JsonRpcRequest, JsonRpcResponse, PROTOCOL_VERSION};
pub use server::ContextServer;
pub use transport::{LineTransport, StdioTransport};
