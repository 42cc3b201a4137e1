//! Client events and actions.

use bluff_proto::{Card, Frame};

/// Events the caller feeds into the client.
///
/// The caller is responsible for:
/// - Receiving frames from the network
/// - Driving time forward via ticks
/// - Forwarding user intents (select cards, play, skip, ...)
///
/// Generic over `I` (Instant type) to support both production
/// (`std::time::Instant`) and simulation environments.
#[derive(Debug, Clone)]
pub enum ClientEvent<I = std::time::Instant> {
    /// Frame received from server.
    FrameReceived(Frame),

    /// Time tick for expiry processing.
    Tick {
        /// Current time from the environment.
        now: I,
    },

    /// Transport re-established; the snapshot from the old session is void.
    Reconnected,

    /// Ask to join the configured room.
    JoinRoom,

    /// Change display name.
    SetName {
        /// Requested name.
        name: String,
    },

    /// Toggle one card in the selection.
    ToggleCard(Card),

    /// Replace the selection.
    SelectCards(Vec<Card>),

    /// Deselect everything.
    ClearSelection,

    /// Play the current selection. May answer with
    /// [`ClientAction::PromptDeclaration`].
    BeginPlay,

    /// Complete a play with the rank the user declared.
    ConfirmPlay {
        /// Raw user input, normalized by the client.
        rank: String,
    },

    /// Abandon a play awaiting declaration.
    CancelPlay,

    /// Pass the turn.
    SkipTurn,

    /// Challenge the last play.
    CallBluff,

    /// Ask the server for a new deal.
    RequestNewGame,
}

/// Actions the client produces for the caller to execute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientAction {
    /// Send a frame to the server. Fire-and-forget.
    Send(Frame),

    /// The round has no rank yet; ask the user for one and answer with
    /// [`ClientEvent::ConfirmPlay`] or [`ClientEvent::CancelPlay`].
    PromptDeclaration,

    /// Server rejected something; show it and wait for acknowledgement.
    Notice(String),

    /// The view changed and should be redrawn.
    Redraw,
}
