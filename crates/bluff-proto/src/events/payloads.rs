//! Structured payloads for events that carry more than one field.
//!
//! Field names follow the server's camelCase vocabulary (`playerId`,
//! `declaredRank`, ...) so the CBOR maps are self-describing in the same terms
//! the server uses.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{Card, Player, PlayerId};

/// Hands keyed by owner.
pub type Hands = BTreeMap<PlayerId, Vec<Card>>;

/// `game started`: a fresh deal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameStarted {
    /// Every player's hand.
    pub hands: Hands,
    /// Player who moves first.
    pub turn: PlayerId,
    /// Seated players.
    pub players: Vec<Player>,
}

/// `cards played`: the server acknowledged a throw.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardsPlayed {
    /// Who threw.
    pub player_id: PlayerId,
    /// Cards thrown face down.
    pub played_cards: Vec<Card>,
    /// Rank claimed for the round.
    pub declared_rank: String,
}

/// `game over`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameOver {
    /// Display name of the winner.
    pub winner_name: String,
}

/// `join room`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinRoom {
    /// Room to enter.
    pub room_id: String,
    /// Name to announce. May be empty.
    pub player_name: String,
}

/// `set name`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetName {
    /// Room the player is in.
    pub room_id: String,
    /// New display name.
    pub name: String,
}

/// `play cards`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayCards {
    /// Room the player is in.
    pub room_id: String,
    /// Cards to throw.
    pub played_cards: Vec<Card>,
    /// Rank claimed for the round.
    pub declared_rank: String,
}

/// Payload of intents that only name the room (`skip turn`, `call bluff`,
/// `request new game`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomRef {
    /// Room the player is in.
    pub room_id: String,
}

impl RoomRef {
    /// Reference a room.
    pub fn new(room_id: impl Into<String>) -> Self {
        Self { room_id: room_id.into() }
    }
}
