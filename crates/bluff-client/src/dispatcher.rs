//! Inbound event routing.
//!
//! The dispatcher owns the view and the expiry timers and is the only code
//! that mutates either in response to the server. Each [`ServerEvent`] is
//! routed to its reducer and, where the event starts or ends a transient
//! window, to the timer table.

use std::time::Duration;

use bluff_core::{GameView, TimerKind, TimerManager};
use bluff_proto::ServerEvent;

use crate::event::ClientAction;

/// Routes server events into the view and drives expiry.
#[derive(Debug, Clone)]
pub struct Dispatcher<I> {
    view: GameView,
    timers: TimerManager<I>,
}

impl<I> Dispatcher<I>
where
    I: Copy + Ord + std::ops::Sub<Output = Duration> + std::fmt::Debug,
{
    /// Create a dispatcher with an empty view.
    pub fn new(reveal_window: Duration, message_window: Duration) -> Self {
        Self { view: GameView::new(), timers: TimerManager::new(reveal_window, message_window) }
    }

    /// Current snapshot.
    pub fn view(&self) -> &GameView {
        &self.view
    }

    /// Snapshot for local selection edits.
    pub fn view_mut(&mut self) -> &mut GameView {
        &mut self.view
    }

    /// Pending expiries.
    pub fn timers(&self) -> &TimerManager<I> {
        &self.timers
    }

    /// Apply one server event received at `now`.
    pub fn dispatch(&mut self, event: ServerEvent, now: I) -> Vec<ClientAction> {
        tracing::debug!(event = %event.name(), "dispatch");

        match event {
            ServerEvent::Connected(id) => self.view.apply_connected(id),
            ServerEvent::RoomState(players) => self.view.apply_room_state(players),
            ServerEvent::GameStarted(started) => {
                self.timers.cancel_all();
                self.view.apply_game_started(started);
            },
            ServerEvent::DealCards(cards) => {
                self.timers.cancel_all();
                self.view.apply_deal_cards(cards);
            },
            ServerEvent::Turn(id) => {
                self.view.apply_turn(id);
                self.timers.cancel(TimerKind::Message);
            },
            ServerEvent::CardsPlayed(played) => self.view.apply_cards_played(played),
            ServerEvent::UpdateHands(hands) => self.view.apply_update_hands(hands),
            ServerEvent::TableCleared => {
                self.view.apply_table_cleared();
                self.timers.cancel(TimerKind::Reveal);
            },
            ServerEvent::RevealCards(cards) => {
                self.view.apply_reveal_cards(cards);
                if !self.view.revealed().is_empty() {
                    self.timers.arm(TimerKind::Reveal, now, self.view.generation());
                }
            },
            ServerEvent::Message(text) => {
                self.view.apply_message(text);
                self.timers.arm(TimerKind::Message, now, self.view.generation());
            },
            ServerEvent::ErrorMessage(text) => {
                tracing::warn!(notice = %text, "server rejected action");
                return vec![ClientAction::Notice(text)];
            },
            ServerEvent::GameOver(over) => self.view.apply_game_over(over.winner_name),
        }

        vec![ClientAction::Redraw]
    }

    /// Apply every expiry due at `now`.
    ///
    /// Expiries armed under an earlier generation are dropped.
    pub fn tick(&mut self, now: I) -> Vec<ClientAction> {
        let generation = self.view.generation();
        let mut changed = false;

        for expiry in self.timers.poll_expired(now) {
            if expiry.generation != generation {
                tracing::warn!(
                    kind = ?expiry.kind,
                    armed = expiry.generation,
                    current = generation,
                    "stale timer ignored"
                );
                continue;
            }
            match expiry.kind {
                TimerKind::Reveal => self.view.expire_reveal(),
                TimerKind::Message => self.view.expire_message(),
            }
            changed = true;
        }

        if changed { vec![ClientAction::Redraw] } else { Vec::new() }
    }

    /// Drop the old session's snapshot and pending expiries.
    pub fn reset(&mut self) {
        self.timers.cancel_all();
        self.view.reset_for_reconnect();
    }
}
