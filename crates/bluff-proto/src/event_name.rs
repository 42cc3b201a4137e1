//! Wire names of protocol events.

use std::fmt;

/// Which way an event travels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Server to client.
    Inbound,
    /// Client to server.
    Outbound,
}

/// Name of every protocol event.
///
/// Plays the role of an opcode: the name alone selects how the payload bytes
/// are decoded. Each [`crate::ServerEvent`] and [`crate::ClientIntent`]
/// variant maps to exactly one name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventName {
    // Inbound
    /// `connected`
    Connected,
    /// `room state`
    RoomState,
    /// `game started`
    GameStarted,
    /// `deal cards` (legacy single-hand deal)
    DealCards,
    /// `turn`
    Turn,
    /// `cards played`
    CardsPlayed,
    /// `update hands`
    UpdateHands,
    /// `table cleared`
    TableCleared,
    /// `reveal cards`
    RevealCards,
    /// `message`
    Message,
    /// `error message`
    ErrorMessage,
    /// `game over`
    GameOver,

    // Outbound
    /// `join room`
    JoinRoom,
    /// `set name`
    SetName,
    /// `play cards`
    PlayCards,
    /// `skip turn`
    SkipTurn,
    /// `call bluff`
    CallBluff,
    /// `request new game`
    RequestNewGame,
}

impl EventName {
    /// Every event name.
    pub const ALL: [Self; 18] = [
        Self::Connected,
        Self::RoomState,
        Self::GameStarted,
        Self::DealCards,
        Self::Turn,
        Self::CardsPlayed,
        Self::UpdateHands,
        Self::TableCleared,
        Self::RevealCards,
        Self::Message,
        Self::ErrorMessage,
        Self::GameOver,
        Self::JoinRoom,
        Self::SetName,
        Self::PlayCards,
        Self::SkipTurn,
        Self::CallBluff,
        Self::RequestNewGame,
    ];

    /// Exact wire string.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Connected => "connected",
            Self::RoomState => "room state",
            Self::GameStarted => "game started",
            Self::DealCards => "deal cards",
            Self::Turn => "turn",
            Self::CardsPlayed => "cards played",
            Self::UpdateHands => "update hands",
            Self::TableCleared => "table cleared",
            Self::RevealCards => "reveal cards",
            Self::Message => "message",
            Self::ErrorMessage => "error message",
            Self::GameOver => "game over",
            Self::JoinRoom => "join room",
            Self::SetName => "set name",
            Self::PlayCards => "play cards",
            Self::SkipTurn => "skip turn",
            Self::CallBluff => "call bluff",
            Self::RequestNewGame => "request new game",
        }
    }

    /// Look up a wire string. `None` for names outside the vocabulary.
    pub fn from_wire(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|n| n.as_str() == name)
    }

    /// Direction this event travels.
    pub const fn direction(self) -> Direction {
        match self {
            Self::Connected
            | Self::RoomState
            | Self::GameStarted
            | Self::DealCards
            | Self::Turn
            | Self::CardsPlayed
            | Self::UpdateHands
            | Self::TableCleared
            | Self::RevealCards
            | Self::Message
            | Self::ErrorMessage
            | Self::GameOver => Direction::Inbound,
            Self::JoinRoom
            | Self::SetName
            | Self::PlayCards
            | Self::SkipTurn
            | Self::CallBluff
            | Self::RequestNewGame => Direction::Outbound,
        }
    }
}

impl fmt::Display for EventName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn wire_names_are_unique() {
        let names: HashSet<_> = EventName::ALL.iter().map(|n| n.as_str()).collect();
        assert_eq!(names.len(), EventName::ALL.len());
    }

    #[test]
    fn from_wire_inverts_as_str() {
        for name in EventName::ALL {
            assert_eq!(EventName::from_wire(name.as_str()), Some(name));
        }
        assert_eq!(EventName::from_wire("deal"), None);
        assert_eq!(EventName::from_wire("Room State"), None);
    }

    #[test]
    fn directions_split_vocabulary() {
        assert_eq!(EventName::CardsPlayed.direction(), Direction::Inbound);
        assert_eq!(EventName::PlayCards.direction(), Direction::Outbound);
        let outbound = EventName::ALL.iter().filter(|n| n.direction() == Direction::Outbound);
        assert_eq!(outbound.count(), 6);
    }
}
