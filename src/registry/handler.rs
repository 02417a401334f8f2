//! The calling convention shared by every command implementation.

use std::future::Future;

use async_trait::async_trait;

use crate::error::CommandError;
use crate::registry::Arguments;

/// Implementation behind a registered command.
///
/// Handlers receive the caller's keyword arguments as an [`Arguments`] bag
/// and return the text that becomes the `prompt` of the response. They may
/// await arbitrary work; the server waits for completion before reading the
/// next request.
#[async_trait]
pub trait CommandHandler: Send + Sync {
    /// Runs the command.
    ///
    /// # Errors
    ///
    /// Any error is reported to the caller as an execution failure carrying
    /// the error's message.
    async fn call(&self, arguments: Arguments) -> Result<String, CommandError>;
}

/// Adapts an async closure into a [`CommandHandler`].
///
/// Built with [`from_fn`].
pub struct FnHandler<F> {
    f: F,
}

/// Wraps `f` so it can be registered as a command.
///
/// ```
/// use context_server::registry::{from_fn, Arguments};
///
/// let echo = from_fn(|args: Arguments| async move {
///     Ok(format!("Echo: {}", args.get_str("message")?))
/// });
/// # let _ = echo;
/// ```
#[must_use]
pub const fn from_fn<F, Fut>(f: F) -> FnHandler<F>
where
    F: Fn(Arguments) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<String, CommandError>> + Send + 'static,
{
    FnHandler { f }
}

#[async_trait]
impl<F, Fut> CommandHandler for FnHandler<F>
where
    F: Fn(Arguments) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<String, CommandError>> + Send + 'static,
{
    async fn call(&self, arguments: Arguments) -> Result<String, CommandError> {
        (self.f)(arguments).await
    }
}
