//! Generic runtime for application orchestration.
//!
//! The Runtime drives the application event loop, coordinating between:
//! - [`App`]: UI state machine
//! - [`Bridge`]: Protocol bridge to Client
//! - [`Driver`]: Platform-specific I/O
//!
//! It is the single consumer of every input: user events, server frames and
//! ticks are handled one at a time in arrival order.

use bluff_client::{ClientConfig, Environment};

use crate::{App, AppAction, AppEvent, Bridge, ConnectionState, Driver};

/// Generic runtime that orchestrates App, Bridge, and Driver.
///
/// # Type Parameters
///
/// - `D`: Platform-specific I/O driver
/// - `E`: Environment for timing
pub struct Runtime<D, E>
where
    D: Driver,
    E: Environment,
{
    driver: D,
    app: App,
    bridge: Bridge<E>,
    server_addr: String,
    /// Set after the first successful connect; later connects are reconnects.
    has_connected: bool,
}

impl<D, E> Runtime<D, E>
where
    D: Driver<Instant = E::Instant>,
    E: Environment,
{
    /// Create a new runtime with the given driver, environment and config.
    pub fn new(driver: D, env: E, config: ClientConfig, server_addr: String) -> Self {
        let app = App::new(server_addr.clone());
        let bridge = Bridge::new(env, config);
        Self { driver, app, bridge, server_addr, has_connected: false }
    }

    /// Run the main event loop.
    ///
    /// This is the core orchestration loop that:
    /// 1. Polls for input events from the driver
    /// 2. Receives frames from the server
    /// 3. Processes actions and events between App and Bridge
    /// 4. Sends outgoing frames through the driver
    /// 5. Delivers a tick so reveal and message windows expire
    ///
    /// # Errors
    ///
    /// Returns an error if the first connection fails or the driver
    /// encounters an I/O error.
    pub async fn run(mut self) -> Result<(), D::Error> {
        self.render()?;
        self.connect().await?;

        loop {
            let should_quit = self.process_cycle().await?;
            if should_quit {
                break;
            }
        }

        self.driver.stop();
        Ok(())
    }

    /// Process one cycle of the event loop.
    ///
    /// Returns `true` if the application should quit.
    pub async fn process_cycle(&mut self) -> Result<bool, D::Error> {
        if let Some(event) = self.driver.poll_event().await? {
            let actions = self.app.handle(event);
            if self.process_actions(actions).await? {
                return Ok(true);
            }
        }

        if self.driver.is_connected() {
            if let Some(frame) = self.driver.recv_frame().await {
                let events = self.bridge.handle_frame(frame);
                self.send_outgoing_frames().await?;
                if self.process_bridge_events(events).await? {
                    return Ok(true);
                }
            }
        } else if self.app.connection_state() == &ConnectionState::Connected {
            tracing::warn!("connection lost");
            let actions = self.app.handle(AppEvent::Disconnected);
            if self.process_actions(actions).await? {
                return Ok(true);
            }
        }

        let now = self.driver.now();
        let events = self.bridge.handle_tick(now);
        if self.process_bridge_events(events).await? {
            return Ok(true);
        }

        Ok(false)
    }

    /// Process actions returned by the App.
    ///
    /// Returns `true` if should quit.
    async fn process_actions(&mut self, initial_actions: Vec<AppAction>) -> Result<bool, D::Error> {
        let mut pending_actions = initial_actions;

        while !pending_actions.is_empty() {
            let actions = std::mem::take(&mut pending_actions);

            for action in actions {
                match action {
                    AppAction::Render => self.render()?,
                    AppAction::Quit => return Ok(true),
                    AppAction::Connect { server_addr: _ } => {
                        if let Err(e) = self.connect().await {
                            tracing::warn!(error = %e, "reconnect failed");
                            let actions = self.app.handle(AppEvent::Disconnected);
                            self.app.set_status(format!("Reconnect failed: {e}"));
                            pending_actions.extend(actions);
                        }
                    },

                    // Game operations go through the bridge
                    AppAction::JoinRoom
                    | AppAction::SetName(_)
                    | AppAction::Select(_)
                    | AppAction::Toggle(_)
                    | AppAction::ClearSelection
                    | AppAction::Play { .. }
                    | AppAction::Declare(_)
                    | AppAction::CancelPlay
                    | AppAction::SkipTurn
                    | AppAction::CallBluff
                    | AppAction::RequestNewGame => {
                        let events = self.bridge.process_app_action(action);
                        for event in events {
                            let new_actions = self.app.handle(event);
                            pending_actions.extend(new_actions);
                        }
                        self.send_outgoing_frames().await?;
                    },
                }
            }
        }
        Ok(false)
    }

    /// Process events from Bridge back to App.
    async fn process_bridge_events(&mut self, events: Vec<AppEvent>) -> Result<bool, D::Error> {
        for event in events {
            let actions = self.app.handle(event);
            if self.process_actions(actions).await? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Process actions synchronously (for use in sync contexts).
    fn process_actions_sync(&mut self, actions: Vec<AppAction>) {
        for action in actions {
            match action {
                AppAction::Render => {
                    if let Err(e) = self.render() {
                        tracing::warn!("Failed to render: {:?}", e);
                    }
                },
                other => {
                    tracing::warn!("Unexpected action in sync context: {:?}", other);
                },
            }
        }
    }

    /// Connect to the server.
    ///
    /// A reconnect discards the previous session's snapshot; the server
    /// re-sends whatever is current.
    async fn connect(&mut self) -> Result<(), D::Error> {
        let actions = self.app.handle(AppEvent::Connecting);
        self.process_actions_sync(actions);

        self.driver.connect(&self.server_addr).await?;

        if self.has_connected {
            let events = self.bridge.handle_reconnected();
            for event in events {
                let actions = self.app.handle(event);
                self.process_actions_sync(actions);
            }
        }
        self.has_connected = true;

        let actions = self.app.handle(AppEvent::Connected);
        self.process_actions_sync(actions);
        Ok(())
    }

    /// Send all pending outgoing frames to the server.
    ///
    /// Frames produced while disconnected are dropped.
    async fn send_outgoing_frames(&mut self) -> Result<(), D::Error> {
        let frames = self.bridge.take_outgoing();
        if !self.driver.is_connected() {
            if !frames.is_empty() {
                tracing::warn!(count = frames.len(), "dropping frames while disconnected");
            }
            return Ok(());
        }
        for frame in frames {
            self.driver.send_frame(frame).await?;
        }
        Ok(())
    }

    fn render(&mut self) -> Result<(), D::Error> {
        self.driver.render(&self.app, self.bridge.view())
    }

    /// Get a reference to the App
    pub fn app(&self) -> &App {
        &self.app
    }

    /// Get a mutable reference to the App
    pub fn app_mut(&mut self) -> &mut App {
        &mut self.app
    }

    /// Get a reference to the Bridge
    pub fn bridge(&self) -> &Bridge<E> {
        &self.bridge
    }

    /// Get a reference to the Driver
    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// Connect without entering the loop. Tests drive
    /// [`process_cycle`](Self::process_cycle) themselves.
    pub async fn start(&mut self) -> Result<(), D::Error> {
        self.connect().await
    }
}
