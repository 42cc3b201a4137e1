//! Player identities.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque session identifier assigned by the server.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(String);

impl PlayerId {
    /// Wrap a session identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The identifier as sent on the wire.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PlayerId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for PlayerId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// A seated player as listed by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    /// Session identifier.
    pub id: PlayerId,
    /// Display name. Empty until the player has set one.
    #[serde(default)]
    pub name: String,
}

impl Player {
    /// Create a player entry.
    pub fn new(id: impl Into<PlayerId>, name: impl Into<String>) -> Self {
        Self { id: id.into(), name: name.into() }
    }
}
