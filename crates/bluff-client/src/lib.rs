//! Client
//!
//! Action-based client state machine for the Bluff card game. Keeps the local
//! snapshot of one table in sync with the server and turns user intents into
//! outbound events.
//!
//! # Architecture
//!
//! The client follows the same Sans-IO and Action-Based patterns as
//! [`bluff_core`]. It receives events ([`ClientEvent`]), processes them
//! through pure state machine logic, and returns actions ([`ClientAction`]) for
//! the caller to execute.
//!
//! # Components
//!
//! - [`Client`]: Top-level state machine for one session
//! - [`Dispatcher`]: Routes server events into the view and timers
//! - [`ClientEvent`]: Events fed into the client
//! - [`ClientAction`]: Actions produced by the client
//!
//! # Transport (optional)
//!
//! With the `transport` feature enabled, this crate also provides:
//! - [`transport::ConnectedClient`]: Frame channels over a TCP stream
//! - [`transport::connect`]: Connect to a server

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod client;
mod config;
mod dispatcher;
mod error;
mod event;

#[cfg(feature = "transport")]
pub mod transport;

pub use bluff_core::{Environment, GameView};
pub use client::Client;
pub use config::{ClientConfig, DEFAULT_ROOM};
pub use dispatcher::Dispatcher;
pub use error::ClientError;
pub use event::{ClientAction, ClientEvent};
