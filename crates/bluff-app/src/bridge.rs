//! Protocol-to-Application translation layer.
//!
//! The [`Bridge`] wraps the low-level [`bluff_client::Client`] and adapts it
//! to the high-level application lifecycle.
//!
//! # Responsibilities
//!
//! - Converts high-level [`crate::AppAction`] into client events, resolving
//!   card positions against the displayed hand.
//! - Accumulates outgoing [`bluff_proto::Frame`] to be sent by the driver in
//!   the next I/O cycle.
//! - Interprets results from the client and converts them back into
//!   [`crate::AppEvent`]s to update the UI.
//! - Manages time ticks generically to support both real-time execution and
//!   deterministic simulation.

use bluff_client::{Client, ClientAction, ClientConfig, ClientError, ClientEvent, Environment};
use bluff_core::GameView;
use bluff_proto::{Card, Frame};

use crate::{AppAction, AppEvent, input::CardRef};

/// Bridge between App and Client protocol logic.
///
/// Generic over Environment to support both production and simulation.
/// The Instant type is determined by the Environment's associated type.
pub struct Bridge<E: Environment> {
    client: Client<E>,
    outgoing: Vec<Frame>,
}

impl<E: Environment> Bridge<E> {
    /// Create a new Bridge with the given environment and configuration.
    pub fn new(env: E, config: ClientConfig) -> Self {
        Self { client: Client::new(env, config), outgoing: Vec::new() }
    }

    /// Current game snapshot.
    pub fn view(&self) -> &GameView {
        self.client.view()
    }

    /// Underlying client.
    pub fn client(&self) -> &Client<E> {
        &self.client
    }

    /// Process an App action and return resulting App events.
    pub fn process_app_action(&mut self, action: AppAction) -> Vec<AppEvent> {
        match action {
            AppAction::JoinRoom => self.handle_client(ClientEvent::JoinRoom),
            AppAction::SetName(name) => self.handle_client(ClientEvent::SetName { name }),
            AppAction::Select(refs) => match self.resolve(&refs) {
                Ok(cards) => self.handle_client(ClientEvent::SelectCards(cards)),
                Err(message) => vec![AppEvent::Rejected { message }],
            },
            AppAction::Toggle(refs) => match self.resolve(&refs) {
                Ok(cards) => cards
                    .into_iter()
                    .flat_map(|card| self.handle_client(ClientEvent::ToggleCard(card)))
                    .collect(),
                Err(message) => vec![AppEvent::Rejected { message }],
            },
            AppAction::ClearSelection => self.handle_client(ClientEvent::ClearSelection),
            AppAction::Play { rank } => {
                let mut events = self.handle_client(ClientEvent::BeginPlay);
                if let Some(rank) = rank
                    && events.contains(&AppEvent::PromptDeclaration)
                {
                    events.extend(self.handle_client(ClientEvent::ConfirmPlay { rank }));
                }
                events
            },
            AppAction::Declare(rank) => self.handle_client(ClientEvent::ConfirmPlay { rank }),
            AppAction::CancelPlay => self.handle_client(ClientEvent::CancelPlay),
            AppAction::SkipTurn => self.handle_client(ClientEvent::SkipTurn),
            AppAction::CallBluff => self.handle_client(ClientEvent::CallBluff),
            AppAction::RequestNewGame => self.handle_client(ClientEvent::RequestNewGame),
            AppAction::Render | AppAction::Quit | AppAction::Connect { .. } => vec![],
        }
    }

    /// Handle a frame from the server.
    pub fn handle_frame(&mut self, frame: Frame) -> Vec<AppEvent> {
        self.handle_client(ClientEvent::FrameReceived(frame))
    }

    /// Process a time tick.
    pub fn handle_tick(&mut self, now: E::Instant) -> Vec<AppEvent> {
        self.handle_client(ClientEvent::Tick { now })
    }

    /// Discard the previous session after the transport came back.
    pub fn handle_reconnected(&mut self) -> Vec<AppEvent> {
        self.outgoing.clear();
        self.handle_client(ClientEvent::Reconnected)
    }

    /// Take pending outgoing frames.
    pub fn take_outgoing(&mut self) -> Vec<Frame> {
        std::mem::take(&mut self.outgoing)
    }

    fn handle_client(&mut self, event: ClientEvent<E::Instant>) -> Vec<AppEvent> {
        let was_awaiting = self.client.is_awaiting_declaration();
        let result = self.client.handle(event);
        let mut events = self.handle_client_result(result);

        if was_awaiting && !self.client.is_awaiting_declaration() {
            events.push(AppEvent::PromptClosed);
        }
        events
    }

    fn handle_client_result(
        &mut self,
        result: Result<Vec<ClientAction>, ClientError>,
    ) -> Vec<AppEvent> {
        match result {
            Ok(actions) => self.process_client_actions(actions),
            Err(ClientError::Action(e)) => vec![AppEvent::Rejected { message: e.to_string() }],
            // Already logged by the client; nothing the user can act on
            Err(ClientError::Protocol(_)) => vec![],
        }
    }

    fn process_client_actions(&mut self, actions: Vec<ClientAction>) -> Vec<AppEvent> {
        let mut events = Vec::new();

        for action in actions {
            match action {
                ClientAction::Send(frame) => self.outgoing.push(frame),
                ClientAction::PromptDeclaration => events.push(AppEvent::PromptDeclaration),
                ClientAction::Notice(text) => events.push(AppEvent::Notice(text)),
                ClientAction::Redraw => {
                    if !events.contains(&AppEvent::ViewChanged) {
                        events.push(AppEvent::ViewChanged);
                    }
                },
            }
        }

        events
    }

    fn resolve(&self, refs: &[CardRef]) -> Result<Vec<Card>, String> {
        let hand = self.client.view().local_hand();
        refs.iter()
            .map(|r| match r {
                CardRef::Index(position) => position
                    .checked_sub(1)
                    .and_then(|i| hand.get(i))
                    .cloned()
                    .ok_or_else(|| format!("no card at position {position}")),
                CardRef::Label(card) if hand.contains(card) => Ok(card.clone()),
                CardRef::Label(card) => Err(format!("card {card} is not in your hand")),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::{
        future::Future,
        pin::Pin,
        task::{Context, Poll},
        time::Duration,
    };

    use bluff_proto::{
        ClientIntent, EventName, Player, PlayerId, ServerEvent,
        events::{GameStarted, Hands},
    };

    use super::*;

    struct ImmediateFuture;

    impl Future for ImmediateFuture {
        type Output = ();

        fn poll(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<Self::Output> {
            Poll::Ready(())
        }
    }

    #[derive(Clone)]
    struct TestEnv;

    impl Environment for TestEnv {
        type Instant = std::time::Instant;

        #[allow(clippy::disallowed_methods)]
        fn now(&self) -> std::time::Instant {
            std::time::Instant::now()
        }

        fn sleep(&self, _duration: Duration) -> impl Future<Output = ()> + Send {
            ImmediateFuture
        }
    }

    fn frame(event: ServerEvent) -> Frame {
        event.into_frame().unwrap()
    }

    fn bridge_in_game(turn: &str) -> Bridge<TestEnv> {
        let mut bridge = Bridge::new(TestEnv, ClientConfig::default().with_name("Alice"));
        let mut hands = Hands::new();
        hands.insert(PlayerId::from("p1"), vec![Card::from("K♦"), Card::from("10♥")]);
        hands.insert(PlayerId::from("p2"), vec![Card::from("2♣")]);

        let _ = bridge.handle_frame(frame(ServerEvent::Connected(PlayerId::from("p1"))));
        let _ = bridge.handle_frame(frame(ServerEvent::GameStarted(GameStarted {
            hands,
            turn: PlayerId::from(turn),
            players: vec![Player::new("p1", "Alice"), Player::new("p2", "Bob")],
        })));
        let _ = bridge.take_outgoing();
        bridge
    }

    fn sent(bridge: &mut Bridge<TestEnv>) -> Vec<ClientIntent> {
        bridge.take_outgoing().iter().map(|f| ClientIntent::from_frame(f).unwrap()).collect()
    }

    #[test]
    fn connected_joins_room_with_name() {
        let mut bridge = Bridge::new(TestEnv, ClientConfig::default().with_name("Alice"));
        let _ = bridge.handle_frame(frame(ServerEvent::Connected(PlayerId::from("p1"))));

        let frames = bridge.take_outgoing();
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].name, EventName::JoinRoom);
    }

    #[test]
    fn select_by_position_uses_organized_hand() {
        let mut bridge = bridge_in_game("p1");
        let _ = bridge.process_app_action(AppAction::Select(vec![CardRef::Index(1)]));

        // Singles sort by precedence: K before 10
        assert_eq!(bridge.view().selection(), &[Card::from("K♦")]);
    }

    #[test]
    fn select_rejects_foreign_label() {
        let mut bridge = bridge_in_game("p1");
        let events = bridge
            .process_app_action(AppAction::Select(vec![CardRef::Label(Card::from("A♠"))]));

        assert!(matches!(events.as_slice(), [AppEvent::Rejected { .. }]));
        assert!(bridge.view().selection().is_empty());
    }

    #[test]
    fn play_with_rank_completes_declaration() {
        let mut bridge = bridge_in_game("p1");
        let _ = bridge.process_app_action(AppAction::Select(vec![CardRef::Index(2)]));
        let events = bridge.process_app_action(AppAction::Play { rank: Some("q".into()) });

        assert!(events.contains(&AppEvent::PromptDeclaration));
        assert!(events.contains(&AppEvent::PromptClosed));
        let intents = sent(&mut bridge);
        assert!(matches!(
            intents.as_slice(),
            [ClientIntent::PlayCards(p)] if p.declared_rank == "Q"
        ));
    }

    #[test]
    fn play_without_rank_prompts() {
        let mut bridge = bridge_in_game("p1");
        let _ = bridge.process_app_action(AppAction::Select(vec![CardRef::Index(1)]));
        let events = bridge.process_app_action(AppAction::Play { rank: None });

        assert_eq!(events, vec![AppEvent::PromptDeclaration]);
        assert!(bridge.take_outgoing().is_empty());

        let events = bridge.process_app_action(AppAction::Declare("nine".into()));
        assert!(matches!(events.as_slice(), [AppEvent::Rejected { .. }]));

        let events = bridge.process_app_action(AppAction::Declare("9".into()));
        assert_eq!(events, vec![AppEvent::PromptClosed]);
        assert_eq!(sent(&mut bridge).len(), 1);
    }

    #[test]
    fn new_game_closes_declaration_prompt() {
        let mut bridge = bridge_in_game("p1");
        let _ = bridge.process_app_action(AppAction::Select(vec![CardRef::Index(1)]));
        let events = bridge.process_app_action(AppAction::Play { rank: None });
        assert_eq!(events, vec![AppEvent::PromptDeclaration]);

        let mut hands = Hands::new();
        hands.insert(PlayerId::from("p1"), vec![Card::from("5♦")]);
        let events = bridge.handle_frame(frame(ServerEvent::GameStarted(GameStarted {
            hands,
            turn: PlayerId::from("p1"),
            players: vec![Player::new("p1", "Alice")],
        })));

        assert!(events.contains(&AppEvent::PromptClosed));
        assert!(!bridge.client().is_awaiting_declaration());
    }

    #[test]
    fn out_of_turn_skip_is_rejected() {
        let mut bridge = bridge_in_game("p2");
        let events = bridge.process_app_action(AppAction::SkipTurn);

        assert!(matches!(events.as_slice(), [AppEvent::Rejected { .. }]));
        assert!(bridge.take_outgoing().is_empty());
    }

    #[test]
    fn server_error_becomes_notice() {
        let mut bridge = bridge_in_game("p1");
        let events = bridge.handle_frame(frame(ServerEvent::ErrorMessage("Room full".into())));
        assert_eq!(events, vec![AppEvent::Notice("Room full".into())]);
    }
}
