//! Application input events.
//!
//! This module defines [`AppEvent`], the set of inputs that drive the
//! [`crate::App`] state machine.
//!
//! Events originate from two distinct sources:
//! - User input lines and end of input.
//! - Protocol notifications translated from the underlying client.

/// Events processed by the App state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// One line of user input.
    Line(String),

    /// User input reached end of file.
    InputClosed,

    /// Connection in progress.
    Connecting,

    /// Transport is up.
    Connected,

    /// Transport dropped.
    Disconnected,

    /// The game view changed.
    ViewChanged,

    /// A play needs a rank declaration.
    PromptDeclaration,

    /// The pending declaration was answered or abandoned.
    PromptClosed,

    /// Server-side rejection to show until acknowledged.
    Notice(String),

    /// A local action was refused.
    Rejected {
        /// What went wrong.
        message: String,
    },
}
