//! Simulation driver implementing the Driver trait.
//!
//! `SimDriver` provides the same interface as the terminal driver but for
//! deterministic testing. It implements [`Driver`] so the same
//! [`bluff_app::Runtime`] orchestration code runs in both production and
//! simulation. Time comes from a shared [`SimEnv`], so timer expiry is
//! driven by [`SimEnv::advance`] rather than the wall clock.

#![allow(clippy::disallowed_types, reason = "Synchronous locking operations only")]

use std::{
    collections::VecDeque,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use bluff_app::{App, AppEvent, Driver};
use bluff_core::{Environment, GameView};
use bluff_proto::{ClientIntent, Frame, ServerEvent};

use crate::{
    SimEnv, SimInstant,
    invariants::{ClientSnapshot, InvariantRegistry, SystemSnapshot},
};

/// Error type for simulation driver.
#[derive(Debug, Clone)]
pub struct SimDriverError(pub String);

impl std::fmt::Display for SimDriverError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SimDriverError: {}", self.0)
    }
}

impl std::error::Error for SimDriverError {}

/// Shared state for event injection.
///
/// This allows injection from outside async contexts.
#[derive(Default)]
struct SharedState {
    pending_events: VecDeque<AppEvent>,
    incoming_frames: VecDeque<Frame>,
    outgoing_frames: Vec<Frame>,
    connected: bool,
    connects: usize,
    refuse_connects: usize,
    renders: usize,
    generation_history: Vec<u64>,
}

/// Simulation driver for deterministic testing.
///
/// Clones share the same queues, so a test can keep a handle for injection
/// after moving the driver into a [`bluff_app::Runtime`].
#[derive(Clone)]
pub struct SimDriver {
    state: Arc<Mutex<SharedState>>,
    env: SimEnv,
    room_id: String,
    invariants: Option<Arc<InvariantRegistry>>,
}

impl SimDriver {
    /// Create a driver reading time from `env`.
    pub fn new(env: SimEnv) -> Self {
        Self {
            state: Arc::new(Mutex::new(SharedState::default())),
            env,
            room_id: bluff_client::DEFAULT_ROOM.to_string(),
            invariants: None,
        }
    }

    /// Enable invariant checking on every render.
    #[must_use]
    pub fn with_invariants(mut self, registry: InvariantRegistry) -> Self {
        self.invariants = Some(Arc::new(registry));
        self
    }

    /// Room used when evaluating gate verdicts for snapshots.
    #[must_use]
    pub fn with_room(mut self, room_id: impl Into<String>) -> Self {
        self.room_id = room_id.into();
        self
    }

    fn lock(&self) -> MutexGuard<'_, SharedState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Inject an `AppEvent` for processing.
    pub fn inject_event(&self, event: AppEvent) {
        self.lock().pending_events.push_back(event);
    }

    /// Inject one line of user input.
    pub fn inject_line(&self, line: impl Into<String>) {
        self.inject_event(AppEvent::Line(line.into()));
    }

    /// Inject a frame from the server.
    pub fn inject_frame(&self, frame: Frame) {
        self.lock().incoming_frames.push_back(frame);
    }

    /// Encode and inject a server event.
    pub fn inject_server_event(&self, event: ServerEvent) -> Result<(), SimDriverError> {
        let frame = event.into_frame().map_err(|e| SimDriverError(e.to_string()))?;
        self.inject_frame(frame);
        Ok(())
    }

    /// Take all captured outgoing frames.
    pub fn take_outgoing(&self) -> Vec<Frame> {
        std::mem::take(&mut self.lock().outgoing_frames)
    }

    /// Take captured outgoing frames decoded as intents.
    pub fn take_intents(&self) -> Result<Vec<ClientIntent>, SimDriverError> {
        self.take_outgoing()
            .iter()
            .map(|frame| ClientIntent::from_frame(frame).map_err(|e| SimDriverError(e.to_string())))
            .collect()
    }

    /// Check if there are pending events to process.
    pub fn has_pending(&self) -> bool {
        let state = self.lock();
        !state.pending_events.is_empty() || !state.incoming_frames.is_empty()
    }

    /// Drop the simulated connection.
    pub fn disconnect(&self) {
        self.lock().connected = false;
    }

    /// Refuse the next `count` connection attempts.
    pub fn refuse_connects(&self, count: usize) {
        self.lock().refuse_connects = count;
    }

    /// Successful connection attempts so far.
    pub fn connects(&self) -> usize {
        self.lock().connects
    }

    /// Renders so far.
    pub fn renders(&self) -> usize {
        self.lock().renders
    }

    /// Check invariants against a view, recording its generation.
    pub fn check_invariants(&self, view: &GameView, context: &str) {
        let history = {
            let mut state = self.lock();
            state.generation_history.push(view.generation());
            state.generation_history.clone()
        };

        if let Some(registry) = &self.invariants {
            let snapshot = ClientSnapshot::from_view(view, &self.room_id)
                .with_generation_history(history);
            registry.assert_all(&SystemSnapshot::single(snapshot), context);
        }
    }
}

impl Driver for SimDriver {
    type Error = SimDriverError;
    type Instant = SimInstant;

    async fn poll_event(&mut self) -> Result<Option<AppEvent>, Self::Error> {
        Ok(self.lock().pending_events.pop_front())
    }

    async fn send_frame(&mut self, frame: Frame) -> Result<(), Self::Error> {
        let mut state = self.lock();
        if !state.connected {
            return Err(SimDriverError("not connected".into()));
        }
        state.outgoing_frames.push(frame);
        Ok(())
    }

    async fn recv_frame(&mut self) -> Option<Frame> {
        let mut state = self.lock();
        if !state.connected {
            return None;
        }
        state.incoming_frames.pop_front()
    }

    async fn connect(&mut self, addr: &str) -> Result<(), Self::Error> {
        let mut state = self.lock();
        if state.refuse_connects > 0 {
            state.refuse_connects -= 1;
            return Err(SimDriverError(format!("connection to {addr} refused")));
        }
        state.connected = true;
        state.connects += 1;
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.lock().connected
    }

    fn now(&self) -> Self::Instant {
        self.env.now()
    }

    fn render(&mut self, _app: &App, view: &GameView) -> Result<(), Self::Error> {
        self.lock().renders += 1;
        self.check_invariants(view, "on render");
        Ok(())
    }

    fn stop(&mut self) {
        self.lock().connected = false;
    }
}
