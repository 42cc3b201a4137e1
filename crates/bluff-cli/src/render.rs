//! Plain text rendering of the game view.
//!
//! One block of lines per render: connection header, opponents, turn,
//! pile, reveal, hand and the actions currently allowed, ending with the
//! input prompt. Hand positions are 1-based and match what `select` and
//! `toggle` accept.

use std::fmt;

use bluff_app::{App, ConnectionState, Prompt};
use bluff_core::{ActionGate, GameView, RoundPhase};

/// Renderable snapshot of the app and game.
pub struct Screen<'a> {
    app: &'a App,
    view: &'a GameView,
    room_id: &'a str,
}

impl<'a> Screen<'a> {
    /// Screen for the given state.
    pub fn new(app: &'a App, view: &'a GameView, room_id: &'a str) -> Self {
        Self { app, view, room_id }
    }

    fn write_table(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let view = self.view;

        let opponents = view.opponents();
        if !opponents.is_empty() {
            let list: Vec<String> =
                opponents.iter().map(|o| format!("{} ({})", o.name, o.card_count)).collect();
            writeln!(f, "opponents: {}", list.join(", "))?;
        }

        if let Some(winner) = view.winner() {
            writeln!(f, "game over: {winner} wins")?;
        } else if let Some(turn) = view.current_turn() {
            if view.is_my_turn() {
                writeln!(f, "turn: you")?;
            } else {
                writeln!(f, "turn: {}", view.name_of(turn))?;
            }
        }

        match ActionGate::new(view, self.room_id).phase() {
            RoundPhase::Declared => {
                if let (Some(play), Some(claim)) = (view.current_play(), view.claim_text()) {
                    let who = if view.is_local(&play.player_id) {
                        "you"
                    } else {
                        view.name_of(&play.player_id)
                    };
                    writeln!(f, "pile: {} played, {who} claims {claim}", view.pile().len())?;
                }
            },
            RoundPhase::AwaitingDeclare => writeln!(f, "pile: empty, next play names the rank")?,
            RoundPhase::Lobby | RoundPhase::GameOver => {},
        }

        if !view.revealed().is_empty() {
            writeln!(f, "revealed: {}", labels(view.revealed()))?;
        }
        if let Some(message) = view.message() {
            writeln!(f, ">> {message}")?;
        }
        Ok(())
    }

    fn write_hand(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let view = self.view;
        if view.local_id().is_none() {
            return Ok(());
        }

        let hand: Vec<String> = view
            .local_hand()
            .iter()
            .enumerate()
            .map(|(i, card)| {
                if view.selection().contains(card) {
                    format!("{}:[{card}]", i + 1)
                } else {
                    format!("{}:{card}", i + 1)
                }
            })
            .collect();
        writeln!(f, "hand: {}", hand.join(" "))?;

        let gate = ActionGate::new(view, self.room_id);
        let allowed: Vec<&str> = [
            (gate.can_play(), "play"),
            (gate.can_skip(), "skip"),
            (gate.can_call_bluff(), "bluff"),
        ]
        .into_iter()
        .filter_map(|(ok, name)| ok.then_some(name))
        .collect();
        if !allowed.is_empty() {
            writeln!(f, "you may: {}", allowed.join(", "))?;
        }
        Ok(())
    }
}

impl fmt::Display for Screen<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match self.app.connection_state() {
            ConnectionState::Disconnected => "disconnected",
            ConnectionState::Connecting => "connecting",
            ConnectionState::Connected => "connected",
        };
        writeln!(f, "-- bluff {} ({state}) room {} --", self.app.server_addr(), self.room_id)?;

        self.write_table(f)?;
        self.write_hand(f)?;

        if let Some(status) = self.app.status_message() {
            writeln!(f, "{status}")?;
        }
        if let Some(notice) = self.app.notice() {
            writeln!(f, "! {notice} (press enter)")?;
        }

        match self.app.prompt() {
            Prompt::Command => write!(f, "> "),
            Prompt::DeclareRank => write!(f, "rank> "),
        }
    }
}

fn labels(cards: &[bluff_proto::Card]) -> String {
    cards.iter().map(bluff_proto::Card::as_str).collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use bluff_app::AppEvent;
    use bluff_proto::{
        Card, Player, PlayerId,
        events::{CardsPlayed, GameStarted, Hands},
    };

    use super::*;

    const ROOM: &str = "room-abc";

    fn cards(labels: &[&str]) -> Vec<Card> {
        labels.iter().copied().map(Card::from).collect()
    }

    fn connected_app() -> App {
        let mut app = App::new("127.0.0.1:3001".into());
        let _ = app.handle(AppEvent::Connected);
        app
    }

    fn view_in_game(turn: &str) -> GameView {
        let mut view = GameView::new();
        view.apply_connected(PlayerId::from("p1"));
        let mut hands = Hands::new();
        hands.insert(PlayerId::from("p1"), cards(&["K♦", "10♥", "10♠"]));
        hands.insert(PlayerId::from("p2"), cards(&["2♣", "3♣"]));
        view.apply_game_started(GameStarted {
            hands,
            turn: PlayerId::from(turn),
            players: vec![Player::new("p1", "Alice"), Player::new("p2", "Bob")],
        });
        view
    }

    #[test]
    fn fresh_screen_has_header_and_prompt() {
        let app = App::new("127.0.0.1:3001".into());
        let view = GameView::new();
        let text = Screen::new(&app, &view, ROOM).to_string();

        assert_eq!(text, "-- bluff 127.0.0.1:3001 (disconnected) room room-abc --\n> ");
    }

    #[test]
    fn hand_is_numbered_and_marks_selection() {
        let app = connected_app();
        let mut view = view_in_game("p1");
        let _ = view.toggle_selected(&Card::from("10♠"));
        let text = Screen::new(&app, &view, ROOM).to_string();

        assert!(text.contains("opponents: Bob (2)\n"));
        assert!(text.contains("turn: you\n"));
        assert!(text.contains("pile: empty, next play names the rank\n"));
        assert!(text.contains("hand: 1:10♥ 2:[10♠] 3:K♦\n"));
        assert!(text.contains("you may: play\n"));
    }

    #[test]
    fn claim_and_reveal_are_shown() {
        let app = connected_app();
        let mut view = view_in_game("p1");
        view.apply_cards_played(CardsPlayed {
            player_id: PlayerId::from("p2"),
            played_cards: cards(&["2♣", "3♣"]),
            declared_rank: "Q".into(),
        });
        let _ = view.apply_reveal_cards(cards(&["2♣"]));
        let text = Screen::new(&app, &view, ROOM).to_string();

        assert!(text.contains("pile: 1 played, Bob claims 2 Queens\n"));
        assert!(text.contains("revealed: 2♣\n"));
        assert!(text.contains("you may: skip, bluff\n"));
    }

    #[test]
    fn notice_and_rank_prompt() {
        let mut app = connected_app();
        let _ = app.handle(AppEvent::PromptDeclaration);
        let _ = app.handle(AppEvent::Notice("Room is full".into()));
        let view = GameView::new();
        let text = Screen::new(&app, &view, ROOM).to_string();

        assert!(text.contains("! Room is full (press enter)\n"));
        assert!(text.ends_with("rank> "));
    }

    #[test]
    fn winner_replaces_turn() {
        let app = connected_app();
        let mut view = view_in_game("p2");
        view.apply_game_over("Bob".into());
        let text = Screen::new(&app, &view, ROOM).to_string();

        assert!(text.contains("game over: Bob wins\n"));
        assert!(!text.contains("turn:"));
        assert!(!text.contains("pile:"));
        assert!(!text.contains("you may:"));
    }
}
