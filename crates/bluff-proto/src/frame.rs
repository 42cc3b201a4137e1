//! Frame type pairing an event name with its encoded payload.
//!
//! Layout on a byte stream:
//! `[length: u32 BE] [name_len: u8] [name: UTF-8] [payload: CBOR]`
//! where `length` counts every byte after the prefix.
//!
//! This is a pure data holder. For typed access, see
//! [`crate::ServerEvent::from_frame`] and [`crate::ClientIntent::into_frame`].

use bytes::{BufMut, Bytes};

use crate::{
    EventName,
    errors::{ProtocolError, Result},
};

/// Named protocol frame.
///
/// # Invariants
///
/// - The encoded frame (excluding the length prefix) never exceeds
///   [`Frame::MAX_SIZE`]; oversized frames are rejected on encode and decode.
/// - The payload is opaque here; it is only interpreted by the event decoders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Event name, the routing key.
    pub name: EventName,
    /// CBOR-encoded payload (may be empty).
    pub payload: Bytes,
}

impl Frame {
    /// Size of the length prefix in bytes.
    pub const PREFIX_SIZE: usize = 4;

    /// Maximum frame size after the prefix (1 MiB).
    pub const MAX_SIZE: usize = 1 << 20;

    /// Create a frame.
    #[must_use]
    pub fn new(name: EventName, payload: impl Into<Bytes>) -> Self {
        Self { name, payload: payload.into() }
    }

    /// Bytes following the length prefix.
    pub fn body_len(&self) -> usize {
        1 + self.name.as_str().len() + self.payload.len()
    }

    /// Encode with length prefix.
    ///
    /// # Errors
    ///
    /// - `ProtocolError::FrameTooLarge` if the body exceeds [`Frame::MAX_SIZE`]
    pub fn encode(&self, dst: &mut impl BufMut) -> Result<()> {
        let body_len = self.body_len();
        if body_len > Self::MAX_SIZE {
            return Err(ProtocolError::FrameTooLarge { size: body_len, max: Self::MAX_SIZE });
        }

        let name = self.name.as_str();
        dst.put_u32(body_len as u32);
        dst.put_u8(name.len() as u8);
        dst.put_slice(name.as_bytes());
        dst.put_slice(&self.payload);

        Ok(())
    }

    /// Validate a length prefix read from a stream and return the body size.
    ///
    /// Lets stream readers reject oversized frames before allocating.
    pub fn body_len_from_prefix(prefix: [u8; Self::PREFIX_SIZE]) -> Result<usize> {
        let len = u32::from_be_bytes(prefix) as usize;
        if len > Self::MAX_SIZE {
            return Err(ProtocolError::FrameTooLarge { size: len, max: Self::MAX_SIZE });
        }
        Ok(len)
    }

    /// Decode a frame including its length prefix.
    ///
    /// Trailing bytes beyond the declared length are ignored.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let prefix: [u8; Self::PREFIX_SIZE] = bytes
            .get(..Self::PREFIX_SIZE)
            .and_then(|p| p.try_into().ok())
            .ok_or(ProtocolError::FrameTruncated {
                expected: Self::PREFIX_SIZE,
                actual: bytes.len(),
            })?;

        let body_len = Self::body_len_from_prefix(prefix)?;
        let body = bytes.get(Self::PREFIX_SIZE..Self::PREFIX_SIZE + body_len).ok_or(
            ProtocolError::FrameTruncated {
                expected: body_len,
                actual: bytes.len().saturating_sub(Self::PREFIX_SIZE),
            },
        )?;

        Self::decode_body(body)
    }

    /// Decode the bytes that follow the length prefix.
    pub fn decode_body(body: &[u8]) -> Result<Self> {
        if body.len() > Self::MAX_SIZE {
            return Err(ProtocolError::FrameTooLarge { size: body.len(), max: Self::MAX_SIZE });
        }

        let (&name_len, rest) =
            body.split_first().ok_or(ProtocolError::FrameTruncated { expected: 1, actual: 0 })?;
        let name_len = usize::from(name_len);

        let name_bytes = rest
            .get(..name_len)
            .ok_or(ProtocolError::FrameTruncated { expected: name_len, actual: rest.len() })?;
        let name = std::str::from_utf8(name_bytes).map_err(|_| ProtocolError::InvalidName)?;
        let name =
            EventName::from_wire(name).ok_or_else(|| ProtocolError::UnknownEvent(name.into()))?;

        let payload = Bytes::copy_from_slice(&rest[name_len..]);
        Ok(Self { name, payload })
    }
}
