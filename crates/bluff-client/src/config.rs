//! Client configuration.

use std::time::Duration;

use bluff_core::timers::{DEFAULT_MESSAGE_WINDOW, DEFAULT_REVEAL_WINDOW};

/// Room joined when none is configured.
pub const DEFAULT_ROOM: &str = "room-abc";

/// Static client settings, fixed for the lifetime of a [`crate::Client`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Room every intent targets.
    pub room_id: String,
    /// Name announced when joining. May be empty.
    pub player_name: String,
    /// How long revealed cards stay visible.
    pub reveal_window: Duration,
    /// How long a server notice stays visible.
    pub message_window: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            room_id: DEFAULT_ROOM.to_string(),
            player_name: String::new(),
            reveal_window: DEFAULT_REVEAL_WINDOW,
            message_window: DEFAULT_MESSAGE_WINDOW,
        }
    }
}

impl ClientConfig {
    /// Config for `room_id` with default windows.
    pub fn for_room(room_id: impl Into<String>) -> Self {
        Self { room_id: room_id.into(), ..Self::default() }
    }

    /// Set the name announced when joining.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.player_name = name.into();
        self
    }
}
