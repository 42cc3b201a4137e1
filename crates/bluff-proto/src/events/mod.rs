//! Protocol events in both directions.
//!
//! Inbound events ([`ServerEvent`]) and outbound intents ([`ClientIntent`])
//! are closed enums: adding an event is a compile error everywhere it is not
//! handled, instead of a silently ignored string key.
//!
//! # Invariants
//!
//! - Each variant maps to exactly one [`EventName`] (enforced by match
//!   exhaustiveness in `name()`, `encode()` and `decode()`).
//! - Payloads are encoded without a variant tag. The frame's name selects the
//!   decoder, so a payload can never be reinterpreted as another event.
//! - Decoding the encoding of a value yields the same value.

pub mod payloads;

use bytes::BufMut;
use serde::{Serialize, de::DeserializeOwned};

pub use self::payloads::{
    CardsPlayed, GameOver, GameStarted, Hands, JoinRoom, PlayCards, RoomRef, SetName,
};
use crate::{
    Card, Direction, EventName, Frame, Player, PlayerId,
    errors::{ProtocolError, Result},
};

/// Events pushed by the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerEvent {
    /// Session established. Carries the session identifier the transport
    /// assigned to this client.
    Connected(PlayerId),
    /// Current seating.
    RoomState(Vec<Player>),
    /// A new game was dealt.
    GameStarted(GameStarted),
    /// Legacy deal carrying only this client's hand.
    DealCards(Vec<Card>),
    /// Whose turn it is.
    Turn(PlayerId),
    /// A throw was accepted.
    CardsPlayed(CardsPlayed),
    /// Authoritative hands after a throw or a bluff call.
    UpdateHands(Hands),
    /// The round resolved and the pile is gone.
    TableCleared,
    /// Cards shown face up for a short window.
    RevealCards(Vec<Card>),
    /// Transient status text.
    Message(String),
    /// Server-side rejection, shown as a blocking notice.
    ErrorMessage(String),
    /// The game ended.
    GameOver(GameOver),
}

impl ServerEvent {
    /// Wire name of this event.
    #[must_use]
    pub const fn name(&self) -> EventName {
        match self {
            Self::Connected(_) => EventName::Connected,
            Self::RoomState(_) => EventName::RoomState,
            Self::GameStarted(_) => EventName::GameStarted,
            Self::DealCards(_) => EventName::DealCards,
            Self::Turn(_) => EventName::Turn,
            Self::CardsPlayed(_) => EventName::CardsPlayed,
            Self::UpdateHands(_) => EventName::UpdateHands,
            Self::TableCleared => EventName::TableCleared,
            Self::RevealCards(_) => EventName::RevealCards,
            Self::Message(_) => EventName::Message,
            Self::ErrorMessage(_) => EventName::ErrorMessage,
            Self::GameOver(_) => EventName::GameOver,
        }
    }

    /// Encode the payload (no variant tag).
    ///
    /// # Errors
    ///
    /// - `ProtocolError::CborEncode` if serialization fails
    pub fn encode(&self, dst: &mut impl BufMut) -> Result<()> {
        match self {
            Self::Connected(inner) | Self::Turn(inner) => write_cbor(inner, dst),
            Self::RoomState(inner) => write_cbor(inner, dst),
            Self::GameStarted(inner) => write_cbor(inner, dst),
            Self::DealCards(inner) | Self::RevealCards(inner) => write_cbor(inner, dst),
            Self::CardsPlayed(inner) => write_cbor(inner, dst),
            Self::UpdateHands(inner) => write_cbor(inner, dst),
            Self::TableCleared => Ok(()),
            Self::Message(inner) | Self::ErrorMessage(inner) => write_cbor(inner, dst),
            Self::GameOver(inner) => write_cbor(inner, dst),
        }
    }

    /// Decode a payload given the event name that carried it.
    ///
    /// # Errors
    ///
    /// - `ProtocolError::WrongDirection` for outbound names
    /// - `ProtocolError::CborDecode` if the payload does not match the name
    pub fn decode(name: EventName, bytes: &[u8]) -> Result<Self> {
        let event = match name {
            EventName::Connected => Self::Connected(read_cbor(bytes)?),
            EventName::RoomState => Self::RoomState(read_cbor(bytes)?),
            EventName::GameStarted => Self::GameStarted(read_cbor(bytes)?),
            EventName::DealCards => Self::DealCards(read_cbor(bytes)?),
            EventName::Turn => Self::Turn(read_cbor(bytes)?),
            EventName::CardsPlayed => Self::CardsPlayed(read_cbor(bytes)?),
            EventName::UpdateHands => Self::UpdateHands(read_cbor(bytes)?),
            EventName::TableCleared => Self::TableCleared,
            EventName::RevealCards => Self::RevealCards(read_cbor(bytes)?),
            EventName::Message => Self::Message(read_cbor(bytes)?),
            EventName::ErrorMessage => Self::ErrorMessage(read_cbor(bytes)?),
            EventName::GameOver => Self::GameOver(read_cbor(bytes)?),
            EventName::JoinRoom
            | EventName::SetName
            | EventName::PlayCards
            | EventName::SkipTurn
            | EventName::CallBluff
            | EventName::RequestNewGame => {
                return Err(ProtocolError::WrongDirection { name, expected: Direction::Inbound });
            },
        };

        Ok(event)
    }

    /// Encode into a frame.
    pub fn into_frame(self) -> Result<Frame> {
        let mut buf = Vec::new();
        self.encode(&mut buf)?;
        Ok(Frame::new(self.name(), buf))
    }

    /// Decode from a frame.
    pub fn from_frame(frame: &Frame) -> Result<Self> {
        Self::decode(frame.name, &frame.payload)
    }
}

/// Intents the client sends to the server.
///
/// Fire-and-forget: the server answers, if at all, with [`ServerEvent`]s.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientIntent {
    /// Enter a room.
    JoinRoom(JoinRoom),
    /// Change display name.
    SetName(SetName),
    /// Throw cards face down.
    PlayCards(PlayCards),
    /// Pass the turn.
    SkipTurn(RoomRef),
    /// Challenge the last throw.
    CallBluff(RoomRef),
    /// Ask for a fresh deal.
    RequestNewGame(RoomRef),
}

impl ClientIntent {
    /// Wire name of this intent.
    #[must_use]
    pub const fn name(&self) -> EventName {
        match self {
            Self::JoinRoom(_) => EventName::JoinRoom,
            Self::SetName(_) => EventName::SetName,
            Self::PlayCards(_) => EventName::PlayCards,
            Self::SkipTurn(_) => EventName::SkipTurn,
            Self::CallBluff(_) => EventName::CallBluff,
            Self::RequestNewGame(_) => EventName::RequestNewGame,
        }
    }

    /// Encode the payload (no variant tag).
    pub fn encode(&self, dst: &mut impl BufMut) -> Result<()> {
        match self {
            Self::JoinRoom(inner) => write_cbor(inner, dst),
            Self::SetName(inner) => write_cbor(inner, dst),
            Self::PlayCards(inner) => write_cbor(inner, dst),
            Self::SkipTurn(inner) | Self::CallBluff(inner) | Self::RequestNewGame(inner) => {
                write_cbor(inner, dst)
            },
        }
    }

    /// Decode a payload given the event name that carried it.
    ///
    /// # Errors
    ///
    /// - `ProtocolError::WrongDirection` for inbound names
    /// - `ProtocolError::CborDecode` if the payload does not match the name
    pub fn decode(name: EventName, bytes: &[u8]) -> Result<Self> {
        let intent = match name {
            EventName::JoinRoom => Self::JoinRoom(read_cbor(bytes)?),
            EventName::SetName => Self::SetName(read_cbor(bytes)?),
            EventName::PlayCards => Self::PlayCards(read_cbor(bytes)?),
            EventName::SkipTurn => Self::SkipTurn(read_cbor(bytes)?),
            EventName::CallBluff => Self::CallBluff(read_cbor(bytes)?),
            EventName::RequestNewGame => Self::RequestNewGame(read_cbor(bytes)?),
            EventName::Connected
            | EventName::RoomState
            | EventName::GameStarted
            | EventName::DealCards
            | EventName::Turn
            | EventName::CardsPlayed
            | EventName::UpdateHands
            | EventName::TableCleared
            | EventName::RevealCards
            | EventName::Message
            | EventName::ErrorMessage
            | EventName::GameOver => {
                return Err(ProtocolError::WrongDirection { name, expected: Direction::Outbound });
            },
        };

        Ok(intent)
    }

    /// Encode into a frame.
    pub fn into_frame(self) -> Result<Frame> {
        let mut buf = Vec::new();
        self.encode(&mut buf)?;
        Ok(Frame::new(self.name(), buf))
    }

    /// Decode from a frame.
    pub fn from_frame(frame: &Frame) -> Result<Self> {
        Self::decode(frame.name, &frame.payload)
    }
}

fn write_cbor<T: Serialize>(value: &T, dst: &mut impl BufMut) -> Result<()> {
    ciborium::ser::into_writer(value, dst.writer())
        .map_err(|e| ProtocolError::CborEncode(e.to_string()))
}

fn read_cbor<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    ciborium::de::from_reader(bytes).map_err(|e| ProtocolError::CborDecode(e.to_string()))
}
