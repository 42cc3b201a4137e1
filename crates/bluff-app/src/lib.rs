//! Application layer for the Bluff client
//!
//! Pure state machines and generic runtime for UI and protocol orchestration,
//! enabling deterministic simulation testing with the same code that runs in
//! production.
//!
//! # Components
//!
//! - [`App`]: UI state machine (command input, rank prompt, notices)
//! - [`Bridge`]: Protocol bridge (translates App actions to Client events)
//! - [`Driver`]: Trait for platform-specific I/O abstraction
//! - [`Runtime`]: Generic orchestration loop using Driver

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod action;
mod app;
mod bridge;
mod driver;
mod event;
pub mod input;
mod runtime;
mod state;

pub use action::AppAction;
pub use app::App;
pub use bridge::Bridge;
pub use driver::Driver;
pub use event::AppEvent;
pub use input::{CardRef, Command, CommandError};
pub use runtime::Runtime;
pub use state::{ConnectionState, Prompt};
