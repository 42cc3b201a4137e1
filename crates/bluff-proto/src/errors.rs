//! Protocol error types.

use thiserror::Error;

use crate::{Direction, EventName};

/// Result alias for protocol operations.
pub type Result<T> = std::result::Result<T, ProtocolError>;

/// Errors raised while encoding or decoding frames and payloads.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// CBOR serialization failed.
    #[error("CBOR encode error: {0}")]
    CborEncode(String),

    /// CBOR deserialization failed.
    #[error("CBOR decode error: {0}")]
    CborDecode(String),

    /// Event name is not part of the vocabulary.
    #[error("unknown event name: {0:?}")]
    UnknownEvent(String),

    /// Event name is known but travels in the other direction.
    #[error("event {name} is not a {expected:?} event")]
    WrongDirection {
        /// Name carried by the frame.
        name: EventName,
        /// Direction the decoder expected.
        expected: Direction,
    },

    /// Frame exceeds [`crate::Frame::MAX_SIZE`].
    #[error("frame too large: {size} bytes (max {max})")]
    FrameTooLarge {
        /// Actual size in bytes.
        size: usize,
        /// Maximum allowed size.
        max: usize,
    },

    /// Fewer bytes than the length prefix claims.
    #[error("frame truncated: expected {expected} bytes, got {actual}")]
    FrameTruncated {
        /// Bytes the frame claims to carry.
        expected: usize,
        /// Bytes actually available.
        actual: usize,
    },

    /// Event name bytes are not valid UTF-8.
    #[error("event name is not valid UTF-8")]
    InvalidName,
}
