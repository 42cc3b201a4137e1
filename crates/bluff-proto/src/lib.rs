//! Bluff protocol vocabulary.
//!
//! Everything that crosses the boundary between the game server and a client:
//! card labels, player identities, the named events in both directions, and
//! the frame codec that carries them.
//!
//! # Components
//!
//! - [`Card`], [`Rank`]: opaque card labels and the closed rank set
//! - [`PlayerId`], [`Player`]: server-assigned identities
//! - [`ServerEvent`]: inbound events (server to client)
//! - [`ClientIntent`]: outbound intents (client to server)
//! - [`EventName`]: the wire name of every event, one per variant
//! - [`Frame`]: `{name, payload}` pair with a length-prefixed byte encoding
//!
//! Event names are the only routing key. Payloads are CBOR without a variant
//! tag, so a frame whose name and payload disagree fails to decode instead of
//! being misinterpreted.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod card;
pub mod errors;
mod event_name;
pub mod events;
mod frame;
mod player;

pub use card::{Card, Rank, UnknownRank};
pub use errors::{ProtocolError, Result};
pub use event_name::{Direction, EventName};
pub use events::{ClientIntent, ServerEvent};
pub use frame::Frame;
pub use player::{Player, PlayerId};
