//! Core
//!
//! Pure game-state logic for the Bluff client. Nothing in this crate performs
//! I/O or reads the clock; time arrives as an argument and outbound traffic
//! leaves as [`bluff_proto::ClientIntent`] values for the caller to send.
//!
//! # Components
//!
//! - [`organizer::organize`]: display ordering of a hand
//! - [`GameView`]: authoritative client-side snapshot, one reducer per event
//! - [`TimerManager`]: reveal and message expiry
//! - [`ActionGate`]: action legality and intent construction
//! - [`Environment`]: time abstraction shared with the runtime

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod env;
pub mod error;
pub mod gate;
pub mod organizer;
pub mod timers;
pub mod view;

pub use env::Environment;
pub use error::{ActionError, IllegalAction, ValidationError};
pub use gate::{ActionGate, PlayStep, RoundPhase, normalize_rank};
pub use organizer::organize;
pub use timers::{Expiry, TimerKind, TimerManager};
pub use view::{GameView, Opponent, Play};
