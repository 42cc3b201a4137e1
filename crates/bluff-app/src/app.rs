//! Application state machine.
//!
//! This module defines the [`App`] state machine, which manages the interactive
//! state of the application completely decoupled from I/O and protocol
//! mechanics.
//!
//! This is a pure state machine: it consumes [`crate::AppEvent`] inputs and
//! produces [`crate::AppAction`] instructions for the runtime to execute.
//!
//! # Responsibilities
//!
//! - Interprets input lines as commands, or as a rank while a play awaits its
//!   declaration.
//! - Holds server notices until the user acknowledges them.
//! - Tracks high-level connection state for UI feedback.

use crate::{
    AppAction, AppEvent, ConnectionState, Prompt,
    input::{Command, HELP},
};

/// Application state machine.
///
/// Pure state machine that processes events and produces actions.
/// No I/O dependencies - fully testable in simulation.
#[derive(Debug, Clone)]
pub struct App {
    /// Connection state.
    state: ConnectionState,
    /// Server address for connection.
    server_addr: String,
    /// Meaning of the next input line.
    prompt: Prompt,
    /// Blocking server notice. Input is swallowed until it is acknowledged.
    notice: Option<String>,
    /// Transient status line. `None` if no message.
    status_message: Option<String>,
}

impl App {
    /// Create a new App with the given server address.
    pub fn new(server_addr: String) -> Self {
        Self {
            state: ConnectionState::Disconnected,
            server_addr,
            prompt: Prompt::Command,
            notice: None,
            status_message: None,
        }
    }

    /// Process an event and return actions.
    pub fn handle(&mut self, event: AppEvent) -> Vec<AppAction> {
        match event {
            AppEvent::Line(line) => self.handle_line(&line),
            AppEvent::InputClosed => self.quit(),
            AppEvent::Connecting => {
                self.state = ConnectionState::Connecting;
                vec![AppAction::Render]
            },
            AppEvent::Connected => {
                self.state = ConnectionState::Connected;
                vec![AppAction::Render]
            },
            AppEvent::Disconnected => {
                self.state = ConnectionState::Disconnected;
                self.prompt = Prompt::Command;
                self.status_message = Some("Disconnected. Type 'reconnect' to try again.".into());
                vec![AppAction::Render]
            },
            AppEvent::ViewChanged => vec![AppAction::Render],
            AppEvent::PromptDeclaration => {
                self.prompt = Prompt::DeclareRank;
                self.status_message =
                    Some("Declare a rank for this round (2-10, J, Q, K, A), or 'cancel'.".into());
                vec![AppAction::Render]
            },
            AppEvent::PromptClosed => {
                self.prompt = Prompt::Command;
                vec![AppAction::Render]
            },
            AppEvent::Notice(text) => {
                self.notice = Some(text);
                vec![AppAction::Render]
            },
            AppEvent::Rejected { message } => {
                self.status_message = Some(message);
                vec![AppAction::Render]
            },
        }
    }

    fn handle_line(&mut self, line: &str) -> Vec<AppAction> {
        if self.notice.take().is_some() {
            return vec![AppAction::Render];
        }
        self.status_message = None;

        match self.prompt {
            Prompt::DeclareRank => self.handle_declaration(line),
            Prompt::Command => match Command::parse(line) {
                Ok(command) => self.handle_command(command),
                Err(e) => {
                    self.status_message = Some(e.to_string());
                    vec![AppAction::Render]
                },
            },
        }
    }

    fn handle_declaration(&mut self, line: &str) -> Vec<AppAction> {
        let answer = line.trim();
        if answer.eq_ignore_ascii_case("cancel") {
            self.prompt = Prompt::Command;
            return vec![AppAction::CancelPlay, AppAction::Render];
        }
        vec![AppAction::Declare(answer.to_string()), AppAction::Render]
    }

    fn handle_command(&mut self, command: Command) -> Vec<AppAction> {
        match command {
            Command::Help => {
                self.status_message = Some(HELP.to_string());
                vec![AppAction::Render]
            },
            Command::Join => self.join_room(),
            Command::Name(name) => vec![AppAction::SetName(name), AppAction::Render],
            Command::Select(cards) => vec![AppAction::Select(cards), AppAction::Render],
            Command::Toggle(cards) => vec![AppAction::Toggle(cards), AppAction::Render],
            Command::Clear => vec![AppAction::ClearSelection, AppAction::Render],
            Command::Play(rank) => vec![AppAction::Play { rank }, AppAction::Render],
            Command::Skip => vec![AppAction::SkipTurn, AppAction::Render],
            Command::Bluff => vec![AppAction::CallBluff, AppAction::Render],
            Command::NewGame => vec![AppAction::RequestNewGame, AppAction::Render],
            Command::Reconnect => self.connect(),
            Command::Quit => self.quit(),
        }
    }

    /// Set a status message to display to the user.
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    /// Initiate connection to the server.
    pub fn connect(&mut self) -> Vec<AppAction> {
        self.state = ConnectionState::Connecting;
        vec![AppAction::Connect { server_addr: self.server_addr.clone() }, AppAction::Render]
    }

    /// Join the configured room.
    pub fn join_room(&self) -> Vec<AppAction> {
        vec![AppAction::JoinRoom, AppAction::Render]
    }

    /// Quit the application.
    pub fn quit(&self) -> Vec<AppAction> {
        vec![AppAction::Quit]
    }

    /// Current connection state.
    pub fn connection_state(&self) -> &ConnectionState {
        &self.state
    }

    /// Server address (host:port).
    pub fn server_addr(&self) -> &str {
        &self.server_addr
    }

    /// Meaning of the next input line.
    pub fn prompt(&self) -> Prompt {
        self.prompt
    }

    /// Unacknowledged server notice.
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    /// Transient status message. `None` if no message.
    pub fn status_message(&self) -> Option<&str> {
        self.status_message.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use bluff_proto::Card;

    use super::*;
    use crate::input::CardRef;

    fn connected_app() -> App {
        let mut app = App::new("localhost:3001".into());
        app.state = ConnectionState::Connected;
        app
    }

    fn line(app: &mut App, text: &str) -> Vec<AppAction> {
        app.handle(AppEvent::Line(text.into()))
    }

    #[test]
    fn commands_map_to_actions() {
        let mut app = connected_app();

        assert!(matches!(line(&mut app, "skip").as_slice(), [
            AppAction::SkipTurn,
            AppAction::Render
        ]));
        assert!(matches!(line(&mut app, "bluff").as_slice(), [
            AppAction::CallBluff,
            AppAction::Render
        ]));
        assert_eq!(line(&mut app, "t 10♥"), vec![
            AppAction::Toggle(vec![CardRef::Label(Card::from("10♥"))]),
            AppAction::Render
        ]);
    }

    #[test]
    fn declaration_prompt_takes_next_line() {
        let mut app = connected_app();
        let _ = app.handle(AppEvent::PromptDeclaration);
        assert_eq!(app.prompt(), Prompt::DeclareRank);

        // "skip" is a rank answer here, not a command
        assert_eq!(line(&mut app, " skip "), vec![
            AppAction::Declare("skip".into()),
            AppAction::Render
        ]);
        assert_eq!(app.prompt(), Prompt::DeclareRank);

        let _ = app.handle(AppEvent::PromptClosed);
        assert_eq!(app.prompt(), Prompt::Command);
    }

    #[test]
    fn cancel_leaves_prompt() {
        let mut app = connected_app();
        let _ = app.handle(AppEvent::PromptDeclaration);

        assert_eq!(line(&mut app, "Cancel"), vec![AppAction::CancelPlay, AppAction::Render]);
        assert_eq!(app.prompt(), Prompt::Command);
    }

    #[test]
    fn notice_swallows_one_line() {
        let mut app = connected_app();
        let _ = app.handle(AppEvent::Notice("Not your turn".into()));
        assert_eq!(app.notice(), Some("Not your turn"));

        assert_eq!(line(&mut app, "skip"), vec![AppAction::Render]);
        assert!(app.notice().is_none());
        assert!(matches!(line(&mut app, "skip").as_slice(), [AppAction::SkipTurn, ..]));
    }

    #[test]
    fn parse_error_sets_status() {
        let mut app = connected_app();
        assert_eq!(line(&mut app, "dance"), vec![AppAction::Render]);
        assert!(app.status_message().is_some_and(|s| s.contains("dance")));
    }

    #[test]
    fn reconnect_and_quit() {
        let mut app = connected_app();
        assert!(matches!(line(&mut app, "reconnect").as_slice(), [
            AppAction::Connect { .. },
            AppAction::Render
        ]));
        assert_eq!(app.connection_state(), &ConnectionState::Connecting);
        assert_eq!(app.handle(AppEvent::InputClosed), vec![AppAction::Quit]);
    }

    #[test]
    fn disconnect_resets_prompt() {
        let mut app = connected_app();
        let _ = app.handle(AppEvent::PromptDeclaration);
        let _ = app.handle(AppEvent::Disconnected);
        assert_eq!(app.prompt(), Prompt::Command);
    }
}
