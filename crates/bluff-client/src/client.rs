//! Client state machine.
//!
//! The `Client` is the top-level state machine for one connected session. It
//! decodes inbound frames for the [`Dispatcher`], answers user intents through
//! the [`ActionGate`], and tracks the one piece of interaction state the view
//! does not: whether a play is waiting for a rank declaration.

use std::time::Duration;

use bluff_core::{ActionError, ActionGate, Environment, GameView, PlayStep};
use bluff_proto::{ClientIntent, Frame, ServerEvent};

use crate::{
    config::ClientConfig,
    dispatcher::Dispatcher,
    error::ClientError,
    event::{ClientAction, ClientEvent},
};

/// Client for one Bluff table.
pub struct Client<E: Environment> {
    /// Environment for timing.
    env: E,

    /// Static settings.
    config: ClientConfig,

    /// View and expiry timers.
    dispatcher: Dispatcher<E::Instant>,

    /// A play was started and the user owes a rank declaration.
    awaiting_declaration: bool,
}

impl<E: Environment> Client<E> {
    /// Create a client for the configured room.
    pub fn new(env: E, config: ClientConfig) -> Self {
        let mut dispatcher = Dispatcher::new(config.reveal_window, config.message_window);
        dispatcher.view_mut().set_local_name(config.player_name.trim());
        Self { env, config, dispatcher, awaiting_declaration: false }
    }

    /// Current snapshot.
    pub fn view(&self) -> &GameView {
        self.dispatcher.view()
    }

    /// Static settings.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Legality checks over the current snapshot.
    pub fn gate(&self) -> ActionGate<'_> {
        ActionGate::new(self.dispatcher.view(), &self.config.room_id)
    }

    /// True between [`ClientAction::PromptDeclaration`] and the matching
    /// confirm or cancel.
    pub fn is_awaiting_declaration(&self) -> bool {
        self.awaiting_declaration
    }

    /// Time until the next reveal or message expiry, if any is pending.
    pub fn time_until_next_expiry(&self) -> Option<Duration> {
        self.dispatcher.timers().time_until_next(self.env.now())
    }

    /// Process an event and return actions for the caller to execute.
    ///
    /// # Errors
    ///
    /// - `ClientError::Action` if a user intent is not legal or not valid
    ///   right now; nothing is sent and the view is unchanged
    /// - `ClientError::Protocol` if a frame cannot be decoded; the frame is
    ///   dropped
    pub fn handle(
        &mut self,
        event: ClientEvent<E::Instant>,
    ) -> Result<Vec<ClientAction>, ClientError> {
        let result = match event {
            ClientEvent::FrameReceived(frame) => self.handle_frame(&frame),
            ClientEvent::Tick { now } => Ok(Outcome::Actions(self.dispatcher.tick(now))),
            ClientEvent::Reconnected => Ok(self.handle_reconnected()),
            ClientEvent::JoinRoom => Ok(Outcome::Send(self.join_intent())),
            ClientEvent::SetName { name } => self.handle_set_name(&name),
            ClientEvent::ToggleCard(card) => {
                self.dispatcher.view_mut().toggle_selected(&card);
                Ok(Outcome::redraw())
            },
            ClientEvent::SelectCards(cards) => {
                let dropped = self.dispatcher.view_mut().set_selection(cards);
                if !dropped.is_empty() {
                    tracing::debug!(?dropped, "ignored cards outside hand");
                }
                Ok(Outcome::redraw())
            },
            ClientEvent::ClearSelection => {
                self.dispatcher.view_mut().clear_selection();
                Ok(Outcome::redraw())
            },
            ClientEvent::BeginPlay => self.handle_begin_play(),
            ClientEvent::ConfirmPlay { rank } => self.handle_confirm_play(&rank),
            ClientEvent::CancelPlay => {
                self.awaiting_declaration = false;
                Ok(Outcome::redraw())
            },
            ClientEvent::SkipTurn => Outcome::from_gate(self.gate().submit_skip()),
            ClientEvent::CallBluff => Outcome::from_gate(self.gate().submit_call_bluff()),
            ClientEvent::RequestNewGame => Ok(Outcome::Send(self.gate().request_new_game())),
        }
        .and_then(Outcome::into_actions);

        if let Err(error) = &result {
            tracing::warn!(%error, "event rejected");
        }
        result
    }

    fn handle_frame(&mut self, frame: &Frame) -> Result<Outcome, ClientError> {
        let event = ServerEvent::from_frame(frame)?;
        let connected = matches!(event, ServerEvent::Connected(_));
        let generation = self.dispatcher.view().generation();

        let mut actions = self.dispatcher.dispatch(event, self.env.now());

        // A pending declaration belongs to the game it was started in
        if self.awaiting_declaration && self.dispatcher.view().generation() != generation {
            tracing::debug!("new game abandoned pending declaration");
            self.awaiting_declaration = false;
        }

        // The server seats nobody until asked
        if connected {
            actions.push(ClientAction::Send(self.join_intent().into_frame()?));
        }
        Ok(Outcome::Actions(actions))
    }

    fn handle_reconnected(&mut self) -> Outcome {
        tracing::info!("reconnected, discarding snapshot");
        self.dispatcher.reset();
        self.awaiting_declaration = false;
        Outcome::redraw()
    }

    fn handle_set_name(&mut self, name: &str) -> Result<Outcome, ClientError> {
        let intent = self.gate().submit_set_name(name)?;
        self.dispatcher.view_mut().set_local_name(name.trim());
        Ok(Outcome::Send(intent))
    }

    fn handle_begin_play(&mut self) -> Result<Outcome, ClientError> {
        match self.gate().begin_play()? {
            PlayStep::NeedsDeclaration => {
                self.awaiting_declaration = true;
                Ok(Outcome::Actions(vec![ClientAction::PromptDeclaration]))
            },
            PlayStep::Ready(intent) => Ok(Outcome::Send(intent)),
        }
    }

    fn handle_confirm_play(&mut self, rank: &str) -> Result<Outcome, ClientError> {
        if !self.awaiting_declaration {
            tracing::debug!(rank, "declaration without pending play ignored");
            return Ok(Outcome::Actions(Vec::new()));
        }

        match self.gate().confirm_play(rank) {
            Ok(intent) => {
                self.awaiting_declaration = false;
                Ok(Outcome::Send(intent))
            },
            // Bad input keeps the prompt open
            Err(error) if error.is_validation() => Err(error.into()),
            Err(error) => {
                self.awaiting_declaration = false;
                Err(error.into())
            },
        }
    }

    fn join_intent(&self) -> ClientIntent {
        self.gate().join_room(self.dispatcher.view().local_name())
    }
}

/// Result of one handler before intents are framed.
enum Outcome {
    Actions(Vec<ClientAction>),
    Send(ClientIntent),
}

impl Outcome {
    fn redraw() -> Self {
        Self::Actions(vec![ClientAction::Redraw])
    }

    fn from_gate(result: Result<ClientIntent, ActionError>) -> Result<Self, ClientError> {
        result.map(Self::Send).map_err(ClientError::from)
    }

    fn into_actions(self) -> Result<Vec<ClientAction>, ClientError> {
        match self {
            Self::Actions(actions) => Ok(actions),
            Self::Send(intent) => {
                tracing::debug!(intent = %intent.name(), "send");
                Ok(vec![ClientAction::Send(intent.into_frame()?)])
            },
        }
    }
}
