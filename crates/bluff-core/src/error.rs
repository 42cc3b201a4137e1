//! Error taxonomy for local player actions.
//!
//! Both kinds are recoverable: the action is not sent, the snapshot is left
//! untouched, and the user is asked again. Server-pushed `error message`
//! notices are not errors at this layer; they travel as events.

use bluff_proto::Card;
use thiserror::Error;

/// Malformed or missing user input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// No cards selected.
    #[error("select at least one card to play")]
    EmptySelection,

    /// Declared rank is blank after trimming.
    #[error("declare the rank of your played cards")]
    EmptyRank,

    /// Declared rank is not one of 2-10, J, Q, K, A.
    #[error("{0:?} is not a rank (use 2-10, J, Q, K or A)")]
    UnknownRank(String),

    /// Selection references a card the player does not hold.
    #[error("card {0} is not in your hand")]
    CardNotInHand(Card),

    /// Display name is blank after trimming.
    #[error("name must not be empty")]
    EmptyName,
}

/// Action attempted outside the state in which it is legal.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum IllegalAction {
    /// No session identifier yet.
    #[error("not connected")]
    NotConnected,

    /// Someone else holds the turn.
    #[error("it's not your turn")]
    NotYourTurn,

    /// Skip attempted before the round's rank was declared.
    #[error("the first player of a round must play, not skip")]
    NothingDeclared,

    /// Bluff call with an empty table.
    #[error("there is no play to challenge")]
    NoPlayToChallenge,

    /// Bluff call against the caller's own throw.
    #[error("you cannot call bluff on your own play")]
    OwnPlay,

    /// The game has a winner.
    #[error("the game is over")]
    GameOver,
}

/// Either error kind, as returned by the action gate.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ActionError {
    /// Input problem; re-prompt.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// State problem; the action is not available right now.
    #[error(transparent)]
    Illegal(#[from] IllegalAction),
}

impl ActionError {
    /// Returns true if asking the user again may fix the problem.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}
