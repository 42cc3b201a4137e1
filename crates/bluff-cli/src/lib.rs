//! Line-oriented terminal client for the Bluff card game.
//!
//! Wires the generic [`bluff_app::Runtime`] to a [`TerminalDriver`]: commands
//! are read one line at a time from stdin, frames travel over TCP, and every
//! change of the view is printed as a plain text [`Screen`].

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod render;
mod system_env;
mod terminal;

pub use error::CliError;
pub use render::Screen;
pub use system_env::SystemEnv;
pub use terminal::{TerminalDriver, stdin_lines};
