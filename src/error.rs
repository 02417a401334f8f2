//! Error types for context-server.
//!
//! Every failure that can happen while serving a request ends up as one of
//! [`CommandError`] or [`HandlerError`], both of which render to the message
//! surfaced in the JSON-RPC error envelope. Their `Display` text is therefore
//! part of the wire contract.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur during configuration operations.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Configuration file could not be read.
    #[error("failed to read configuration file: {path}")]
    ReadError {
        /// Path to the configuration file.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// Configuration file could not be parsed.
    #[error("failed to parse configuration file: {path}")]
    ParseError {
        /// Path to the configuration file.
        path: PathBuf,
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// Configuration file not found.
    #[error("configuration file not found: {path}")]
    NotFound {
        /// Path where the configuration file was expected.
        path: PathBuf,
    },

    /// Configuration validation failed.
    #[error("configuration validation failed: {message}")]
    ValidationError {
        /// Description of the validation failure.
        message: String,
    },
}

/// Errors raised while looking up or running a registered command.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// No command is registered under the requested name.
    #[error("Command '{name}' not found")]
    NotFound {
        /// The name that was looked up.
        name: String,
    },

    /// A handler asked for an argument the caller did not supply.
    #[error("missing required argument '{name}'")]
    MissingArgument {
        /// Argument name.
        name: String,
    },

    /// A handler could not interpret a supplied argument.
    #[error("argument '{name}' must be {expected}")]
    InvalidArgument {
        /// Argument name.
        name: String,
        /// What the handler expected, e.g. "a string".
        expected: String,
    },

    /// The handler itself failed. The message is surfaced verbatim.
    #[error("{0}")]
    Failed(String),
}

impl CommandError {
    /// Creates a handler failure with the given message.
    #[must_use]
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }
}

/// Errors raised by a dispatcher method handler.
///
/// All variants map to the `-32000` execution error code.
#[derive(Error, Debug)]
pub enum HandlerError {
    /// The invoked command failed or does not exist.
    #[error(transparent)]
    Command(#[from] CommandError),

    /// The request parameters could not be interpreted.
    #[error("invalid params: {0}")]
    InvalidParams(String),

    /// The handler result could not be serialised.
    #[error("failed to serialise result: {0}")]
    Serialise(#[from] serde_json::Error),
}
