//! Scripted game table.
//!
//! [`ScriptedTable`] is a small, seeded stand-in for the authoritative
//! server. It deals, rotates turns, adjudicates challenges, and answers
//! client intents with the same [`ServerEvent`] sequences a real table
//! would broadcast. The rules are deliberately plain: the point is a
//! self-consistent event stream for simulation, not a rules reference.
//!
//! # Round flow
//!
//! - A play removes cards from the thrower's hand and fixes the round rank.
//! - A skip passes the turn. When every other player has skipped since the
//!   last play, the round ends and the last thrower leads.
//! - A challenge reveals the last play, the loser picks up the pile, and the
//!   table is cleared on the next broadcast so the reveal stays visible.
//! - The first player to empty their hand wins.

use rand::{Rng, SeedableRng, seq::SliceRandom};
use rand_chacha::ChaCha8Rng;

use bluff_proto::{
    Card, ClientIntent, Player, PlayerId, Rank, ServerEvent,
    events::{CardsPlayed, GameOver, GameStarted, Hands},
};

const SUITS: [char; 4] = ['♠', '♥', '♦', '♣'];

/// A full 52-card deck in rank order.
pub fn standard_deck() -> Vec<Card> {
    Rank::ALL
        .into_iter()
        .flat_map(|rank| SUITS.iter().map(move |suit| Card::new(format!("{}{suit}", rank.token()))))
        .collect()
}

/// Seeded model of one table.
#[derive(Debug, Clone)]
pub struct ScriptedTable {
    rng: ChaCha8Rng,
    players: Vec<Player>,
    hands: Hands,
    turn: usize,
    pile: Vec<CardsPlayed>,
    declared: Option<String>,
    skips: usize,
    clear_pending: bool,
    discarded: Vec<Card>,
    winner: Option<String>,
}

impl ScriptedTable {
    /// Seat `players` at a table whose shuffles derive from `seed`.
    pub fn new(seed: u64, players: Vec<Player>) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            players,
            hands: Hands::new(),
            turn: 0,
            pile: Vec::new(),
            declared: None,
            skips: 0,
            clear_pending: false,
            discarded: Vec::new(),
            winner: None,
        }
    }

    /// Seated players.
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    /// Current hands.
    pub fn hands(&self) -> &Hands {
        &self.hands
    }

    /// Hand of one player.
    pub fn hand(&self, id: &PlayerId) -> &[Card] {
        self.hands.get(id).map_or(&[], Vec::as_slice)
    }

    /// Who must act. `None` before the first deal.
    pub fn current_turn(&self) -> Option<&PlayerId> {
        if self.hands.is_empty() {
            return None;
        }
        self.players.get(self.turn).map(|p| &p.id)
    }

    /// Rank claimed for the current round.
    pub fn declared_rank(&self) -> Option<&str> {
        self.declared.as_deref()
    }

    /// Events a freshly connected session receives.
    pub fn greet(&self, id: &PlayerId) -> Vec<ServerEvent> {
        vec![ServerEvent::Connected(id.clone()), ServerEvent::RoomState(self.players.clone())]
    }

    /// Shuffle, deal round-robin, and hand the first turn to a random seat.
    pub fn deal(&mut self) -> Vec<ServerEvent> {
        if self.players.is_empty() {
            return Vec::new();
        }
        let mut deck = standard_deck();
        deck.shuffle(&mut self.rng);

        self.hands = self.players.iter().map(|p| (p.id.clone(), Vec::new())).collect();
        for (i, card) in deck.into_iter().enumerate() {
            let seat = &self.players[i % self.players.len()].id;
            if let Some(hand) = self.hands.get_mut(seat) {
                hand.push(card);
            }
        }

        self.turn = self.rng.gen_range(0..self.players.len());
        self.pile.clear();
        self.declared = None;
        self.skips = 0;
        self.clear_pending = false;
        self.discarded.clear();
        self.winner = None;

        tracing::debug!(turn = %self.players[self.turn].id, "dealt");
        vec![ServerEvent::GameStarted(GameStarted {
            hands: self.hands.clone(),
            turn: self.players[self.turn].id.clone(),
            players: self.players.clone(),
        })]
    }

    /// Answer an intent sent by `from`.
    pub fn apply(&mut self, from: &PlayerId, intent: &ClientIntent) -> Vec<ServerEvent> {
        let mut events = self.flush_clear();

        match intent {
            ClientIntent::JoinRoom(join) => {
                self.rename(from, &join.player_name);
                events.push(ServerEvent::RoomState(self.players.clone()));
            },
            ClientIntent::SetName(set) => {
                self.rename(from, &set.name);
                events.push(ServerEvent::RoomState(self.players.clone()));
            },
            ClientIntent::RequestNewGame(_) => events.extend(self.deal()),
            ClientIntent::PlayCards(play) => {
                events.extend(self.play(from, &play.played_cards, &play.declared_rank));
            },
            ClientIntent::SkipTurn(_) => events.extend(self.skip(from)),
            ClientIntent::CallBluff(_) => events.extend(self.call_bluff(from)),
        }
        events
    }

    /// Let the seat holding the turn make a random legal move.
    pub fn random_move(&mut self) -> Vec<ServerEvent> {
        let Some(id) = self.current_turn().cloned() else {
            return self.deal();
        };
        if self.winner.is_some() {
            return self.deal();
        }

        let challengeable = self.pile.last().is_some_and(|last| last.player_id != id);
        if challengeable && self.rng.gen_bool(0.2) {
            return self.call_bluff(&id);
        }
        if self.declared.is_some() && self.rng.gen_bool(0.25) {
            return self.skip(&id);
        }

        let hand = self.hand(&id).to_vec();
        let count = self.rng.gen_range(1..=hand.len().clamp(1, 3));
        let cards: Vec<Card> = hand.choose_multiple(&mut self.rng, count).cloned().collect();
        let rank = match &self.declared {
            Some(rank) => rank.clone(),
            None => cards.first().map(|c| c.rank_token().to_string()).unwrap_or_default(),
        };
        self.play(&id, &cards, &rank)
    }

    fn play(&mut self, from: &PlayerId, cards: &[Card], declared: &str) -> Vec<ServerEvent> {
        let mut events = self.flush_clear();
        if let Some(rejection) = self.reject_out_of_turn(from) {
            events.push(rejection);
            return events;
        }
        if cards.is_empty() || !cards.iter().all(|c| self.hand(from).contains(c)) {
            events.push(ServerEvent::ErrorMessage("You don't have those cards".into()));
            return events;
        }
        if let Some(rank) = &self.declared
            && rank != declared
        {
            events.push(ServerEvent::ErrorMessage(format!("This round is {rank}")));
            return events;
        }

        if let Some(hand) = self.hands.get_mut(from) {
            hand.retain(|c| !cards.contains(c));
        }
        let play = CardsPlayed {
            player_id: from.clone(),
            played_cards: cards.to_vec(),
            declared_rank: declared.to_string(),
        };
        self.declared = Some(declared.to_string());
        self.pile.push(play.clone());
        self.skips = 0;

        events.push(ServerEvent::CardsPlayed(play));
        events.push(ServerEvent::UpdateHands(self.hands.clone()));

        if self.hand(from).is_empty() {
            let winner_name = self.name_of(from);
            self.winner = Some(winner_name.clone());
            events.push(ServerEvent::GameOver(GameOver { winner_name }));
            return events;
        }

        self.advance_turn();
        events.push(self.turn_event());
        events
    }

    fn skip(&mut self, from: &PlayerId) -> Vec<ServerEvent> {
        let mut events = self.flush_clear();
        if let Some(rejection) = self.reject_out_of_turn(from) {
            events.push(rejection);
            return events;
        }
        if self.declared.is_none() {
            events.push(ServerEvent::ErrorMessage("Nothing to skip".into()));
            return events;
        }

        self.skips += 1;
        if self.skips + 1 >= self.players.len() {
            // Everyone passed: the last thrower leads the next round.
            let leader = self.pile.last().map(|p| p.player_id.clone());
            self.discarded.extend(self.pile.drain(..).flat_map(|p| p.played_cards));
            self.declared = None;
            self.skips = 0;
            events.push(ServerEvent::TableCleared);
            if let Some(seat) = leader.and_then(|id| self.seat_of(&id)) {
                self.turn = seat;
            }
        } else {
            self.advance_turn();
        }
        events.push(self.turn_event());
        events
    }

    fn call_bluff(&mut self, from: &PlayerId) -> Vec<ServerEvent> {
        let mut events = self.flush_clear();
        if let Some(rejection) = self.reject_out_of_turn(from) {
            events.push(rejection);
            return events;
        }
        let Some(last) = self.pile.last().cloned() else {
            events.push(ServerEvent::ErrorMessage("Nothing to challenge".into()));
            return events;
        };
        if &last.player_id == from {
            events.push(ServerEvent::ErrorMessage("You can't challenge yourself".into()));
            return events;
        }

        let truthful = last.played_cards.iter().all(|c| c.rank_token() == last.declared_rank);
        let (loser, text) = if truthful {
            (from.clone(), format!("{} told the truth!", self.name_of(&last.player_id)))
        } else {
            (last.player_id.clone(), format!("{} was bluffing!", self.name_of(&last.player_id)))
        };

        let picked_up: Vec<Card> = self.pile.drain(..).flat_map(|p| p.played_cards).collect();
        if let Some(hand) = self.hands.get_mut(&loser) {
            hand.extend(picked_up);
        }
        self.declared = None;
        self.skips = 0;
        self.clear_pending = true;
        if let Some(seat) = self.seat_of(&loser) {
            self.turn = seat;
        }

        events.push(ServerEvent::RevealCards(last.played_cards));
        events.push(ServerEvent::UpdateHands(self.hands.clone()));
        events.push(self.turn_event());
        // After the turn, which would clear it.
        events.push(ServerEvent::Message(text));
        events
    }

    /// `table cleared` owed from the last challenge.
    fn flush_clear(&mut self) -> Vec<ServerEvent> {
        if std::mem::take(&mut self.clear_pending) {
            vec![ServerEvent::TableCleared]
        } else {
            Vec::new()
        }
    }

    fn reject_out_of_turn(&self, from: &PlayerId) -> Option<ServerEvent> {
        if self.winner.is_some() {
            return Some(ServerEvent::ErrorMessage("The game is over".into()));
        }
        (self.current_turn() != Some(from)).then(|| ServerEvent::ErrorMessage("Not your turn".into()))
    }

    fn advance_turn(&mut self) {
        self.turn = (self.turn + 1) % self.players.len();
    }

    fn turn_event(&self) -> ServerEvent {
        ServerEvent::Turn(self.players[self.turn].id.clone())
    }

    fn seat_of(&self, id: &PlayerId) -> Option<usize> {
        self.players.iter().position(|p| &p.id == id)
    }

    fn name_of(&self, id: &PlayerId) -> String {
        self.players
            .iter()
            .find(|p| &p.id == id)
            .map_or_else(|| id.to_string(), |p| p.name.clone())
    }

    fn rename(&mut self, id: &PlayerId, name: &str) {
        let name = name.trim();
        if name.is_empty() {
            return;
        }
        if let Some(player) = self.players.iter_mut().find(|p| &p.id == id) {
            player.name = name.to_string();
        }
    }
}
