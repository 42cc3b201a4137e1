//! Action legality and outbound intent construction.
//!
//! The gate reads a [`GameView`] and answers two questions: which actions are
//! available right now, and what intent a given user input turns into. It
//! never mutates the view; the play is only reflected locally once the server
//! echoes it as `cards played`.
//!
//! Playing is a two-step flow. The first play of a round must name the rank
//! for everyone to follow, later plays inherit it:
//!
//! ```text
//! begin_play() ──► Ready(intent)                       (rank already declared)
//!              └─► NeedsDeclaration ──► confirm_play(rank) ──► intent
//! ```

use bluff_proto::{
    Card, ClientIntent, Rank,
    events::{JoinRoom, PlayCards, RoomRef, SetName},
};

use crate::{
    error::{ActionError, IllegalAction, ValidationError},
    view::GameView,
};

/// Where the round stands from the local player's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RoundPhase {
    /// No hands dealt yet.
    #[default]
    Lobby,
    /// Round open, nobody has declared a rank.
    AwaitingDeclare,
    /// A rank is declared; plays must follow it.
    Declared,
    /// The game has a winner.
    GameOver,
}

/// Outcome of starting a play.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayStep {
    /// The round has no rank yet. Ask the user and call
    /// [`ActionGate::confirm_play`].
    NeedsDeclaration,
    /// Ready to send.
    Ready(ClientIntent),
}

/// Read-only legality checks over a view.
#[derive(Debug, Clone, Copy)]
pub struct ActionGate<'a> {
    view: &'a GameView,
    room_id: &'a str,
}

impl<'a> ActionGate<'a> {
    /// Gate actions in `room_id` against `view`.
    pub fn new(view: &'a GameView, room_id: &'a str) -> Self {
        Self { view, room_id }
    }

    /// Current round phase.
    pub fn phase(&self) -> RoundPhase {
        if self.view.is_game_over() {
            RoundPhase::GameOver
        } else if self.view.hands().is_empty() {
            RoundPhase::Lobby
        } else if self.view.declared_rank().is_some() {
            RoundPhase::Declared
        } else {
            RoundPhase::AwaitingDeclare
        }
    }

    /// True iff the local player holds the turn and has cards selected.
    pub fn can_play(&self) -> bool {
        self.check_turn().is_ok() && !self.view.selection().is_empty()
    }

    /// True iff the local player may pass.
    pub fn can_skip(&self) -> bool {
        self.check_skip().is_ok()
    }

    /// True iff the local player may challenge the last throw.
    pub fn can_call_bluff(&self) -> bool {
        self.check_call_bluff().is_ok()
    }

    /// Build a `play cards` intent.
    ///
    /// `declared_rank` is used only when the round has no rank yet; otherwise
    /// the round's rank is sent regardless of input.
    ///
    /// # Errors
    ///
    /// - `ValidationError::EmptySelection` for an empty selection
    /// - `IllegalAction` when it is not the local player's turn
    /// - `ValidationError::CardNotInHand` for a card the player does not hold
    /// - `ValidationError::EmptyRank` / `UnknownRank` for a missing or bad
    ///   declaration on the first play of a round
    pub fn submit_play(
        &self,
        selection: &[Card],
        declared_rank: Option<&str>,
    ) -> Result<ClientIntent, ActionError> {
        if selection.is_empty() {
            return Err(ValidationError::EmptySelection.into());
        }
        self.check_turn()?;

        let hand = self.view.local_hand();
        if let Some(card) = selection.iter().find(|card| !hand.contains(card)) {
            return Err(ValidationError::CardNotInHand(card.clone()).into());
        }

        let rank = match self.view.declared_rank() {
            Some(rank) => rank.to_string(),
            None => normalize_rank(declared_rank.unwrap_or_default())?,
        };

        Ok(ClientIntent::PlayCards(PlayCards {
            room_id: self.room_id.to_string(),
            played_cards: selection.to_vec(),
            declared_rank: rank,
        }))
    }

    /// Start playing the current selection.
    pub fn begin_play(&self) -> Result<PlayStep, ActionError> {
        let selection = self.view.selection();
        if selection.is_empty() {
            return Err(ValidationError::EmptySelection.into());
        }
        self.check_turn()?;

        if self.view.declared_rank().is_none() {
            return Ok(PlayStep::NeedsDeclaration);
        }
        self.submit_play(selection, None).map(PlayStep::Ready)
    }

    /// Finish a play that needed a declaration.
    pub fn confirm_play(&self, rank: &str) -> Result<ClientIntent, ActionError> {
        self.submit_play(self.view.selection(), Some(rank))
    }

    /// Build a `skip turn` intent.
    pub fn submit_skip(&self) -> Result<ClientIntent, ActionError> {
        self.check_skip()?;
        Ok(ClientIntent::SkipTurn(self.room()))
    }

    /// Build a `call bluff` intent.
    pub fn submit_call_bluff(&self) -> Result<ClientIntent, ActionError> {
        self.check_call_bluff()?;
        Ok(ClientIntent::CallBluff(self.room()))
    }

    /// Build a `set name` intent.
    pub fn submit_set_name(&self, name: &str) -> Result<ClientIntent, ActionError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyName.into());
        }
        Ok(ClientIntent::SetName(SetName {
            room_id: self.room_id.to_string(),
            name: name.to_string(),
        }))
    }

    /// Build a `join room` intent. Always available; the name may be empty.
    pub fn join_room(&self, name: &str) -> ClientIntent {
        ClientIntent::JoinRoom(JoinRoom {
            room_id: self.room_id.to_string(),
            player_name: name.trim().to_string(),
        })
    }

    /// Build a `request new game` intent. Always available.
    pub fn request_new_game(&self) -> ClientIntent {
        ClientIntent::RequestNewGame(self.room())
    }

    fn room(&self) -> RoomRef {
        RoomRef::new(self.room_id)
    }

    fn check_turn(&self) -> Result<(), IllegalAction> {
        if self.view.is_game_over() {
            return Err(IllegalAction::GameOver);
        }
        if self.view.local_id().is_none() {
            return Err(IllegalAction::NotConnected);
        }
        if !self.view.is_my_turn() {
            return Err(IllegalAction::NotYourTurn);
        }
        Ok(())
    }

    fn check_skip(&self) -> Result<(), IllegalAction> {
        self.check_turn()?;
        if self.view.declared_rank().is_none() {
            return Err(IllegalAction::NothingDeclared);
        }
        Ok(())
    }

    fn check_call_bluff(&self) -> Result<(), IllegalAction> {
        self.check_turn()?;
        let play = self.view.current_play().ok_or(IllegalAction::NoPlayToChallenge)?;
        if self.view.is_local(&play.player_id) {
            return Err(IllegalAction::OwnPlay);
        }
        Ok(())
    }
}

/// Canonical wire token for user rank input (`" j "` becomes `"J"`).
pub fn normalize_rank(input: &str) -> Result<String, ValidationError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyRank);
    }
    trimmed
        .parse::<Rank>()
        .map(|rank| rank.token().to_string())
        .map_err(|_| ValidationError::UnknownRank(trimmed.to_string()))
}
