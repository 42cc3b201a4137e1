//! Terminal client errors.

use std::io;

use bluff_client::transport::TransportError;
use thiserror::Error;

/// Errors raised by the terminal driver.
#[derive(Debug, Error)]
pub enum CliError {
    /// Writing the view to the terminal failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Connecting to the server failed.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// A frame was sent with no connection.
    #[error("not connected")]
    NotConnected,
}
