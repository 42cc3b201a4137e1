//! Client error types.

use bluff_core::ActionError;
use bluff_proto::ProtocolError;
use thiserror::Error;

/// Errors from [`crate::Client::handle`].
///
/// None of these are fatal. The view is left in its last consistent state and
/// the caller may keep feeding events.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    /// A local action was rejected before anything was sent.
    #[error(transparent)]
    Action(#[from] ActionError),

    /// An inbound frame could not be decoded, or an intent not encoded.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),
}
