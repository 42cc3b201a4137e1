//! Client-side game snapshot.
//!
//! [`GameView`] is the single owner of everything the client knows about the
//! table: session identity, roster, hands, turn, the round's pile, transient
//! reveal and message state, and the local card selection. Server events are
//! applied through one reducer per event kind. Reducers never fail: events
//! that look out of place are applied anyway, because the server is
//! authoritative.
//!
//! # Lifecycle
//!
//! - Session scope: local id, local name, joined flag. Kept for the lifetime
//!   of the connection.
//! - Game scope: hands, turn, winner. Replaced by `game started`.
//! - Round scope: pile, current play, declared rank, revealed cards. Cleared
//!   by `table cleared` and by a new game.
//!
//! Every game reset bumps the [`generation`](GameView::generation). Timer
//! deadlines carry the generation they were armed in, so expiries that
//! outlive a reset are recognized as stale.

use std::collections::BTreeMap;

use bluff_proto::{
    Card, Player, PlayerId, Rank,
    events::{CardsPlayed, GameStarted, Hands},
};

use crate::organizer::organize;

/// Name shown for a player whose roster entry has no name.
pub const FALLBACK_NAME: &str = "Player";

/// Round rank recorded when the server omits one.
const UNDECLARED_RANK: &str = "?";

/// One acknowledged throw on the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Play {
    /// Who threw.
    pub player_id: PlayerId,
    /// Cards thrown face down.
    pub cards: Vec<Card>,
    /// Rank claimed with the throw.
    pub declared_rank: String,
}

/// Opponent summary for display. Hands of other players are never shown,
/// only their size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Opponent {
    /// Session identifier.
    pub id: PlayerId,
    /// Display name, with the fallback applied.
    pub name: String,
    /// Cards left in hand.
    pub card_count: usize,
}

/// Authoritative client-side snapshot of the game.
///
/// # Invariants
///
/// - Every selected card is in the local hand.
/// - The declared rank is set iff the pile holds at least one play.
/// - Every revealed card appears in some play of the pile.
/// - Each player id keys at most one hand.
#[derive(Debug, Clone, Default)]
pub struct GameView {
    local_id: Option<PlayerId>,
    local_name: String,
    joined: bool,

    players: Vec<Player>,
    hands: BTreeMap<PlayerId, Vec<Card>>,
    current_turn: Option<PlayerId>,
    winner: Option<String>,

    pile: Vec<Play>,
    declared_rank: Option<String>,
    revealed: Vec<Card>,

    message: Option<String>,
    selection: Vec<Card>,

    generation: u64,
}

impl GameView {
    /// Empty snapshot, as before the first server event.
    pub fn new() -> Self {
        Self::default()
    }

    // ---- reducers --------------------------------------------------------

    /// `connected`: record the session identifier.
    pub fn apply_connected(&mut self, id: PlayerId) {
        tracing::debug!(%id, "session identifier assigned");
        self.local_id = Some(id);
        self.prune_selection();
    }

    /// `room state`: replace the roster.
    ///
    /// Seeing ourselves in the roster marks the room as joined and adopts the
    /// name the server holds for us.
    pub fn apply_room_state(&mut self, players: Vec<Player>) {
        if let Some(me) = self.local_id.as_ref().and_then(|id| players.iter().find(|p| &p.id == id))
        {
            self.joined = true;
            if !me.name.is_empty() {
                self.local_name.clone_from(&me.name);
            }
        }
        self.players = players;
    }

    /// `game started`: replace hands, roster and turn, reset round and
    /// game-over state.
    pub fn apply_game_started(&mut self, started: GameStarted) {
        let GameStarted { hands, turn, players } = started;
        self.reset_game();
        self.set_hands(hands);
        self.players = players;
        self.current_turn = Some(turn);
        tracing::info!(generation = self.generation, "new game");
    }

    /// Legacy `deal cards`: replace the local hand and reset the game.
    pub fn apply_deal_cards(&mut self, cards: Vec<Card>) {
        self.reset_game();
        match self.local_id.clone() {
            Some(id) => {
                self.hands.insert(id, organize(&cards));
            },
            None => tracing::warn!(count = cards.len(), "dealt cards before session id, dropped"),
        }
    }

    /// `turn`: move the turn and clear the transient message.
    pub fn apply_turn(&mut self, id: PlayerId) {
        self.current_turn = Some(id);
        self.message = None;
    }

    /// `cards played`: push the throw onto the pile and adopt its rank.
    ///
    /// If the local player threw, the selection is cleared.
    pub fn apply_cards_played(&mut self, played: CardsPlayed) {
        let CardsPlayed { player_id, played_cards, declared_rank } = played;

        if self.is_local(&player_id) {
            self.selection.clear();
        }

        match declared_rank.trim() {
            "" => {
                tracing::warn!(%player_id, "play without declared rank");
                self.declared_rank.get_or_insert_with(|| UNDECLARED_RANK.to_string());
            },
            token => self.declared_rank = Some(token.to_string()),
        }

        self.pile.push(Play { player_id, cards: played_cards, declared_rank });
    }

    /// `update hands`: replace every hand and prune the selection.
    pub fn apply_update_hands(&mut self, hands: Hands) {
        self.set_hands(hands);
        self.prune_selection();
    }

    /// `table cleared`: end the round.
    pub fn apply_table_cleared(&mut self) {
        self.pile.clear();
        self.declared_rank = None;
        self.revealed.clear();
    }

    /// `reveal cards`: expose challenged cards.
    ///
    /// Cards that are not on the pile are ignored. Returns the number of
    /// cards newly revealed.
    pub fn apply_reveal_cards(&mut self, cards: Vec<Card>) -> usize {
        let mut added = 0;
        for card in cards {
            if self.revealed.contains(&card) {
                continue;
            }
            if !self.pile_contains(&card) {
                tracing::debug!(%card, "reveal of card not on the pile ignored");
                continue;
            }
            self.revealed.push(card);
            added += 1;
        }
        added
    }

    /// `message`: show a transient notice.
    pub fn apply_message(&mut self, text: String) {
        self.message = Some(text);
    }

    /// `game over`: record the winner.
    pub fn apply_game_over(&mut self, winner_name: String) {
        tracing::info!(winner = %winner_name, "game over");
        self.winner = Some(winner_name);
    }

    /// Reveal window elapsed.
    pub fn expire_reveal(&mut self) {
        self.revealed.clear();
    }

    /// Message window elapsed.
    pub fn expire_message(&mut self) {
        self.message = None;
    }

    /// Forget everything learned from the previous connection.
    ///
    /// The local display name is the only thing kept, so it can be announced
    /// again when rejoining.
    pub fn reset_for_reconnect(&mut self) {
        let name = std::mem::take(&mut self.local_name);
        let generation = self.generation + 1;
        *self = Self { local_name: name, generation, ..Self::default() };
    }

    /// Remember the name the user asked for.
    pub fn set_local_name(&mut self, name: impl Into<String>) {
        self.local_name = name.into();
    }

    // ---- selection -------------------------------------------------------

    /// Toggle a card in the selection. Returns whether it is now selected.
    ///
    /// Cards outside the local hand are never selected.
    pub fn toggle_selected(&mut self, card: &Card) -> bool {
        if let Some(pos) = self.selection.iter().position(|c| c == card) {
            self.selection.remove(pos);
            return false;
        }
        if !self.local_hand().contains(card) {
            return false;
        }
        self.selection.push(card.clone());
        true
    }

    /// Replace the selection, keeping only cards from the local hand.
    ///
    /// Returns the cards that were dropped.
    pub fn set_selection(&mut self, cards: Vec<Card>) -> Vec<Card> {
        let hand = self.local_hand();
        let mut kept: Vec<Card> = Vec::new();
        let mut dropped = Vec::new();
        for card in cards {
            if !hand.contains(&card) {
                dropped.push(card);
            } else if !kept.contains(&card) {
                kept.push(card);
            }
        }
        self.selection = kept;
        dropped
    }

    /// Deselect everything.
    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    // ---- read model ------------------------------------------------------

    /// Session identifier, once `connected` arrived.
    pub fn local_id(&self) -> Option<&PlayerId> {
        self.local_id.as_ref()
    }

    /// Name the local player goes by.
    pub fn local_name(&self) -> &str {
        &self.local_name
    }

    /// True once the roster included the local player.
    pub fn is_joined(&self) -> bool {
        self.joined
    }

    /// Roster in server order.
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    /// All hands by owner.
    pub fn hands(&self) -> &BTreeMap<PlayerId, Vec<Card>> {
        &self.hands
    }

    /// Hand of one player, organized.
    pub fn hand_of(&self, id: &PlayerId) -> &[Card] {
        self.hands.get(id).map_or(&[], Vec::as_slice)
    }

    /// The local player's hand, organized.
    pub fn local_hand(&self) -> &[Card] {
        self.local_id.as_ref().map_or(&[], |id| self.hand_of(id))
    }

    /// Player whose turn it is.
    pub fn current_turn(&self) -> Option<&PlayerId> {
        self.current_turn.as_ref()
    }

    /// True iff the turn belongs to the local player.
    pub fn is_my_turn(&self) -> bool {
        self.local_id.is_some() && self.local_id == self.current_turn
    }

    /// Winner's name, once the game ended.
    pub fn winner(&self) -> Option<&str> {
        self.winner.as_deref()
    }

    /// True between `game over` and the next `game started`.
    pub fn is_game_over(&self) -> bool {
        self.winner.is_some()
    }

    /// Plays of the current round, oldest first.
    pub fn pile(&self) -> &[Play] {
        &self.pile
    }

    /// Most recent play of the round.
    pub fn current_play(&self) -> Option<&Play> {
        self.pile.last()
    }

    /// Rank claimed for the round.
    pub fn declared_rank(&self) -> Option<&str> {
        self.declared_rank.as_deref()
    }

    /// Cards exposed by the latest challenge.
    pub fn revealed(&self) -> &[Card] {
        &self.revealed
    }

    /// Transient server notice.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Cards chosen for the next play, in selection order.
    pub fn selection(&self) -> &[Card] {
        &self.selection
    }

    /// Reset counter. Bumped by every new game and reconnect.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// True if `id` is the local player.
    pub fn is_local(&self, id: &PlayerId) -> bool {
        self.local_id.as_ref() == Some(id)
    }

    /// Display name for a player, falling back to [`FALLBACK_NAME`].
    pub fn name_of(&self, id: &PlayerId) -> &str {
        self.players
            .iter()
            .find(|p| &p.id == id)
            .map(|p| p.name.as_str())
            .filter(|name| !name.is_empty())
            .unwrap_or(FALLBACK_NAME)
    }

    /// Other seated players with their hand sizes, in roster order.
    ///
    /// Hands keyed by ids missing from the roster are not listed.
    pub fn opponents(&self) -> Vec<Opponent> {
        self.players
            .iter()
            .filter(|p| !self.is_local(&p.id))
            .map(|p| Opponent {
                id: p.id.clone(),
                name: self.name_of(&p.id).to_string(),
                card_count: self.hand_of(&p.id).len(),
            })
            .collect()
    }

    /// Claim made by the current play, e.g. `"2 Tens"`.
    ///
    /// Ranks outside the closed set are shown as sent.
    pub fn claim_text(&self) -> Option<String> {
        let play = self.current_play()?;
        let count = play.cards.len();
        let text = match play.declared_rank.parse::<Rank>() {
            Ok(rank) => rank.quantity(count),
            Err(_) => format!("{count} {}", play.declared_rank.trim()),
        };
        Some(text)
    }

    // ---- internals -------------------------------------------------------

    fn set_hands(&mut self, hands: Hands) {
        self.hands = hands.into_iter().map(|(id, cards)| (id, organize(&cards))).collect();
    }

    fn reset_game(&mut self) {
        self.apply_table_cleared();
        self.winner = None;
        self.message = None;
        self.selection.clear();
        self.generation += 1;
    }

    fn prune_selection(&mut self) {
        let hand = self.local_hand().to_vec();
        self.selection.retain(|card| hand.contains(card));
    }

    fn pile_contains(&self, card: &Card) -> bool {
        self.pile.iter().any(|play| play.cards.contains(card))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cards(labels: &[&str]) -> Vec<Card> {
        labels.iter().copied().map(Card::from).collect()
    }

    fn started(me: &str, hand: &[&str], turn: &str) -> GameStarted {
        let mut hands = Hands::new();
        hands.insert(PlayerId::from(me), cards(hand));
        hands.insert(PlayerId::from("p2"), cards(&["2♣", "3♣"]));
        GameStarted {
            hands,
            turn: PlayerId::from(turn),
            players: vec![Player::new(me, "Alice"), Player::new("p2", "Bob")],
        }
    }

    fn view_in_game() -> GameView {
        let mut view = GameView::new();
        view.apply_connected(PlayerId::from("p1"));
        view.apply_game_started(started("p1", &["A♣", "10♥", "K♦", "10♠"], "p1"));
        view
    }

    fn played(player: &str, labels: &[&str], rank: &str) -> CardsPlayed {
        CardsPlayed {
            player_id: PlayerId::from(player),
            played_cards: cards(labels),
            declared_rank: rank.to_string(),
        }
    }

    #[test]
    fn game_started_organizes_hands() {
        let view = view_in_game();
        assert_eq!(view.local_hand(), cards(&["10♥", "10♠", "A♣", "K♦"]));
        assert!(view.is_my_turn());
        assert_eq!(view.generation(), 1);
    }

    #[test]
    fn room_state_marks_joined_and_adopts_name() {
        let mut view = GameView::new();
        view.apply_connected(PlayerId::from("p1"));
        view.apply_room_state(vec![Player::new("p2", "Bob")]);
        assert!(!view.is_joined());

        view.apply_room_state(vec![Player::new("p1", "Alice"), Player::new("p2", "Bob")]);
        assert!(view.is_joined());
        assert_eq!(view.local_name(), "Alice");
    }

    #[test]
    fn cards_played_sets_rank_and_clears_own_selection() {
        let mut view = view_in_game();
        view.set_selection(cards(&["10♥"]));
        view.apply_cards_played(played("p1", &["10♥"], "10"));

        assert_eq!(view.declared_rank(), Some("10"));
        assert!(view.selection().is_empty());
        assert_eq!(view.claim_text().as_deref(), Some("1 Ten"));
    }

    #[test]
    fn opponent_play_keeps_selection() {
        let mut view = view_in_game();
        view.set_selection(cards(&["A♣"]));
        view.apply_cards_played(played("p2", &["2♣", "3♣"], "6"));

        assert_eq!(view.selection(), cards(&["A♣"]));
        assert_eq!(view.claim_text().as_deref(), Some("2 Sixes"));
    }

    #[test]
    fn table_cleared_resets_round() {
        let mut view = view_in_game();
        view.apply_cards_played(played("p1", &["10♥"], "10"));
        view.apply_reveal_cards(cards(&["10♥"]));
        view.apply_table_cleared();

        assert!(view.pile().is_empty());
        assert!(view.current_play().is_none());
        assert!(view.declared_rank().is_none());
        assert!(view.revealed().is_empty());
    }

    #[test]
    fn reveal_only_accepts_pile_cards() {
        let mut view = view_in_game();
        assert_eq!(view.apply_reveal_cards(cards(&["10♥"])), 0);

        view.apply_cards_played(played("p1", &["10♥", "10♠"], "10"));
        assert_eq!(view.apply_reveal_cards(cards(&["10♥", "Q♦"])), 1);
        assert_eq!(view.apply_reveal_cards(cards(&["10♥", "10♠"])), 1);
        assert_eq!(view.revealed(), cards(&["10♥", "10♠"]));
    }

    #[test]
    fn update_hands_prunes_selection() {
        let mut view = view_in_game();
        view.set_selection(cards(&["A♣", "K♦"]));

        let mut hands = Hands::new();
        hands.insert(PlayerId::from("p1"), cards(&["A♣", "5♦"]));
        view.apply_update_hands(hands);

        assert_eq!(view.selection(), cards(&["A♣"]));
    }

    #[test]
    fn selection_rejects_foreign_cards() {
        let mut view = view_in_game();
        assert!(!view.toggle_selected(&Card::from("Q♦")));
        assert!(view.toggle_selected(&Card::from("A♣")));
        assert!(!view.toggle_selected(&Card::from("A♣")));

        let dropped = view.set_selection(cards(&["K♦", "2♣"]));
        assert_eq!(dropped, cards(&["2♣"]));
        assert_eq!(view.selection(), cards(&["K♦"]));
    }

    #[test]
    fn turn_clears_message() {
        let mut view = view_in_game();
        view.apply_message("Bob called bluff!".into());
        view.apply_turn(PlayerId::from("p2"));
        assert!(view.message().is_none());
        assert!(!view.is_my_turn());
    }

    #[test]
    fn game_started_clears_game_over() {
        let mut view = view_in_game();
        view.apply_game_over("Alice".into());
        assert!(view.is_game_over());

        view.apply_game_started(started("p1", &["2♥"], "p2"));
        assert!(!view.is_game_over());
        assert_eq!(view.generation(), 2);
    }

    #[test]
    fn names_fall_back() {
        let mut view = view_in_game();
        view.apply_room_state(vec![Player::new("p1", "Alice"), Player::new("p2", "")]);
        assert_eq!(view.name_of(&PlayerId::from("p2")), FALLBACK_NAME);
        assert_eq!(view.name_of(&PlayerId::from("ghost")), FALLBACK_NAME);

        let opponents = view.opponents();
        assert_eq!(opponents.len(), 1);
        assert_eq!(opponents[0].card_count, 2);
    }

    #[test]
    fn unknown_hand_owner_not_listed() {
        let mut view = view_in_game();
        let mut hands = Hands::new();
        hands.insert(PlayerId::from("ghost"), cards(&["5♠"]));
        view.apply_update_hands(hands);

        assert_eq!(view.hand_of(&PlayerId::from("ghost")), cards(&["5♠"]));
        assert!(view.opponents().iter().all(|o| o.id.as_str() != "ghost"));
    }

    #[test]
    fn reconnect_keeps_name_only() {
        let mut view = view_in_game();
        view.set_local_name("Alice");
        let generation = view.generation();
        view.reset_for_reconnect();

        assert_eq!(view.local_name(), "Alice");
        assert!(view.local_id().is_none());
        assert!(view.hands().is_empty());
        assert!(view.generation() > generation);
    }

    #[test]
    fn deal_cards_replaces_local_hand() {
        let mut view = view_in_game();
        view.apply_cards_played(played("p2", &["2♣"], "4"));
        view.apply_deal_cards(cards(&["4♠", "Q♥", "4♦"]));

        assert_eq!(view.local_hand(), cards(&["4♠", "4♦", "Q♥"]));
        assert!(view.pile().is_empty());
    }
}
