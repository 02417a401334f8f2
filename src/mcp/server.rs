//! The read-dispatch-write loop.
//!
//! The server owns the command registry. Once a [`ContextServer`] is built
//! the registry can no longer change, so every request sees the same set of
//! commands.
//!
//! Requests are handled strictly one at a time: a line is read, dispatched,
//! and its response written and flushed before the next line is read.
//! Shutdown signals are only acted on between requests; a running command is
//! never cancelled.

use std::future::Future;

use tokio::io::{AsyncBufRead, AsyncWrite};

use crate::mcp::dispatcher::{Dispatcher, ServerInfo};
use crate::mcp::protocol::parse_request;
use crate::mcp::transport::{LineTransport, StdioTransport};
use crate::registry::CommandRegistry;

/// A JSON-RPC server exposing registered commands as prompts.
#[derive(Debug)]
pub struct ContextServer {
    /// Frozen command registry.
    registry: CommandRegistry,
    /// Reported by `initialize`.
    server_info: ServerInfo,
}

impl ContextServer {
    /// Creates a server that takes ownership of `registry`.
    ///
    /// Argument descriptors that were never attached to a command are
    /// discarded here.
    #[must_use]
    pub fn new(mut registry: CommandRegistry, server_info: ServerInfo) -> Self {
        let discarded = registry.discard_pending();
        if discarded > 0 {
            tracing::warn!(discarded, "Discarded unattached argument descriptors");
        }

        tracing::info!(commands = registry.len(), "Command registry frozen");

        Self {
            registry,
            server_info,
        }
    }

    /// The registry being served.
    #[must_use]
    pub const fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    /// The server information reported by `initialize`.
    #[must_use]
    pub const fn server_info(&self) -> &ServerInfo {
        &self.server_info
    }

    /// Returns a dispatcher over this server's registry.
    #[must_use]
    pub const fn dispatcher(&self) -> Dispatcher<'_> {
        Dispatcher::new(&self.registry, &self.server_info)
    }

    /// Serves stdin/stdout until end of input or a shutdown signal.
    ///
    /// # Errors
    ///
    /// Returns an error if transport I/O fails.
    pub async fn run(&self) -> std::io::Result<()> {
        let mut transport = StdioTransport::stdio();
        self.run_with_shutdown(&mut transport).await
    }

    /// Serves `transport` until end of input.
    ///
    /// # Errors
    ///
    /// Returns an error if transport I/O fails.
    pub async fn serve<R, W>(&self, transport: &mut LineTransport<R, W>) -> std::io::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        self.serve_until(transport, std::future::pending()).await
    }

    /// Serves `transport` until end of input or until `shutdown` completes.
    ///
    /// `shutdown` is only raced against reading the next line. A request
    /// that has been read is always dispatched and answered first.
    ///
    /// # Errors
    ///
    /// Returns an error if transport I/O fails.
    pub async fn serve_until<R, W, F>(
        &self,
        transport: &mut LineTransport<R, W>,
        shutdown: F,
    ) -> std::io::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                biased;

                () = &mut shutdown => {
                    tracing::info!("Shutdown requested, stopping");
                    return Ok(());
                }

                line_result = transport.read_line() => {
                    let Some(line) = line_result? else {
                        tracing::info!("End of input, stopping");
                        return Ok(());
                    };

                    self.handle_line(&line, transport).await?;
                }
            }
        }
    }

    /// Runs the main loop and handles shutdown.
    #[cfg(unix)]
    async fn run_with_shutdown(&self, transport: &mut StdioTransport) -> std::io::Result<()> {
        use tokio::signal::unix::{signal, SignalKind};

        let mut sigint = signal(SignalKind::interrupt()).map_err(std::io::Error::other)?;
        let mut sigterm = signal(SignalKind::terminate()).map_err(std::io::Error::other)?;

        let shutdown = async move {
            tokio::select! {
                _ = sigint.recv() => {
                    tracing::info!("Received SIGINT, initiating graceful shutdown");
                }

                _ = sigterm.recv() => {
                    tracing::info!("Received SIGTERM, initiating graceful shutdown");
                }
            }
        };

        self.serve_until(transport, shutdown).await
    }

    /// Runs the main loop and handles shutdown.
    #[cfg(windows)]
    async fn run_with_shutdown(&self, transport: &mut StdioTransport) -> std::io::Result<()> {
        let shutdown = async {
            match tokio::signal::ctrl_c().await {
                Ok(()) => tracing::info!("Received Ctrl+C, initiating graceful shutdown"),
                Err(e) => {
                    tracing::warn!(error = %e, "Cannot listen for Ctrl+C");
                    std::future::pending::<()>().await;
                }
            }
        };

        self.serve_until(transport, shutdown).await
    }

    /// Handles a single line of input.
    async fn handle_line<R, W>(
        &self,
        line: &[u8],
        transport: &mut LineTransport<R, W>,
    ) -> std::io::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let request = match parse_request(line) {
            Ok(request) => request,
            Err(error) => {
                tracing::warn!(code = error.error.code, "Rejected malformed input line");
                return transport.write_error(&error).await;
            }
        };

        match self.dispatcher().dispatch(&request).await {
            Ok(response) => transport.write_response(&response).await,
            Err(error) => transport.write_error(&error).await,
        }
    }
}
