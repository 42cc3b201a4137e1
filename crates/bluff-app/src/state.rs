//! Observable application state types.
//!
//! The game itself lives in [`bluff_core::GameView`]; these types only cover
//! what the UI layer adds on top: connection progress and which question the
//! input line is currently answering.

/// Connection state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionState {
    /// Not connected to server.
    Disconnected,
    /// Connection in progress.
    Connecting,
    /// Transport is up.
    Connected,
}

/// What the next input line means.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prompt {
    /// A command.
    Command,
    /// The rank to declare for a pending play.
    DeclareRank,
}
