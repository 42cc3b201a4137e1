//! Observable state snapshots for invariant checking.
//!
//! Snapshots capture what a client shows at a point in time, including the
//! gate's verdicts. Invariants operate on snapshots rather than live state to
//! ensure consistent, atomic checks.

use std::collections::BTreeMap;

use bluff_core::{ActionGate, GameView, Play, RoundPhase};
use bluff_proto::{Card, PlayerId};

/// Snapshot of the entire system state.
#[derive(Debug, Clone, Default)]
pub struct SystemSnapshot {
    /// Per-client state snapshots.
    pub clients: Vec<ClientSnapshot>,
}

impl SystemSnapshot {
    /// Create an empty snapshot (no clients).
    pub fn empty() -> Self {
        Self::default()
    }

    /// Create a snapshot with a single client.
    pub fn single(client: ClientSnapshot) -> Self {
        Self { clients: vec![client] }
    }

    /// Add a client snapshot.
    pub fn add_client(&mut self, client: ClientSnapshot) {
        self.clients.push(client);
    }
}

/// Snapshot of a single client's observable state.
#[derive(Debug, Clone, Default)]
pub struct ClientSnapshot {
    /// Server-assigned id. `None` before `connected`.
    pub id: Option<PlayerId>,
    /// Hands by player.
    pub hands: BTreeMap<PlayerId, Vec<Card>>,
    /// Cards the local player has selected.
    pub selection: Vec<Card>,
    /// Plays of the current round.
    pub pile: Vec<Play>,
    /// Rank claimed for the current round.
    pub declared_rank: Option<String>,
    /// Cards exposed by the last challenge.
    pub revealed: Vec<Card>,
    /// Whose turn it is.
    pub current_turn: Option<PlayerId>,
    /// Winner, once the game is over.
    pub winner: Option<String>,
    /// Round phase as the gate sees it.
    pub phase: RoundPhase,
    /// Gate verdict for "play".
    pub can_play: bool,
    /// Gate verdict for "skip".
    pub can_skip: bool,
    /// Gate verdict for "call bluff".
    pub can_call_bluff: bool,
    /// Every generation observed so far, oldest first.
    pub generation_history: Vec<u64>,
}

impl ClientSnapshot {
    /// Capture a view and the gate's verdicts over it.
    pub fn from_view(view: &GameView, room_id: &str) -> Self {
        let gate = ActionGate::new(view, room_id);
        Self {
            id: view.local_id().cloned(),
            hands: view.hands().clone(),
            selection: view.selection().to_vec(),
            pile: view.pile().to_vec(),
            declared_rank: view.declared_rank().map(str::to_string),
            revealed: view.revealed().to_vec(),
            current_turn: view.current_turn().cloned(),
            winner: view.winner().map(str::to_string),
            phase: gate.phase(),
            can_play: gate.can_play(),
            can_skip: gate.can_skip(),
            can_call_bluff: gate.can_call_bluff(),
            generation_history: vec![view.generation()],
        }
    }

    /// Replace the generation history.
    #[must_use]
    pub fn with_generation_history(mut self, history: Vec<u64>) -> Self {
        self.generation_history = history;
        self
    }

    /// The local player's hand. Empty before `connected`.
    pub fn local_hand(&self) -> &[Card] {
        self.id.as_ref().and_then(|id| self.hands.get(id)).map_or(&[], Vec::as_slice)
    }
}
