//! Application side-effects and intents.
//!
//! This module defines the [`AppAction`] enum, which represents instructions
//! produced by the [`crate::App`] state machine for the runtime to execute.

use crate::input::CardRef;

/// Actions produced by the App state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppAction {
    /// Render the UI.
    Render,

    /// Quit the application.
    Quit,

    /// Connect (or reconnect) to the server.
    Connect {
        /// Server address (host:port).
        server_addr: String,
    },

    /// Join the configured room.
    JoinRoom,

    /// Change display name.
    SetName(String),

    /// Replace the selection.
    Select(Vec<CardRef>),

    /// Toggle cards in the selection.
    Toggle(Vec<CardRef>),

    /// Deselect everything.
    ClearSelection,

    /// Play the selection.
    Play {
        /// Rank to declare if the round has none yet.
        rank: Option<String>,
    },

    /// Answer a pending declaration.
    Declare(String),

    /// Abandon a pending declaration.
    CancelPlay,

    /// Pass the turn.
    SkipTurn,

    /// Challenge the last play.
    CallBluff,

    /// Ask for a new deal.
    RequestNewGame,
}
