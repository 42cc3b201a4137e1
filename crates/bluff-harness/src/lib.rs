//! Deterministic simulation harness for the Bluff client.
//!
//! Virtual-clock and in-memory implementations of the Environment and Driver
//! traits for deterministic, reproducible testing, plus a scripted table that
//! produces self-consistent server event streams.
//!
//! # Invariant Testing
//!
//! The `invariants` module provides behavioral testing through invariant
//! checks. Invariants verify WHAT must be true across all event streams, not
//! specific scenarios. Use [`InvariantRegistry::standard()`] for the view
//! invariants.
//!
//! # Network Simulation
//!
//! [`SimServer`] serves a [`ScriptedTable`] over turmoil TCP, so the real
//! client transport runs under simulated networking.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod invariants;
pub mod sim_driver;
pub mod sim_env;
pub mod sim_server;
pub mod table;

pub use invariants::{
    ClientSnapshot, DeclaredRankTracksPile, GateMatchesRound, GenerationMonotonicity, Invariant,
    InvariantRegistry, InvariantResult, RevealedOnPile, SelectionInHand, SystemSnapshot,
    Violation,
};
pub use sim_driver::{SimDriver, SimDriverError};
pub use sim_env::{SimEnv, SimInstant};
pub use sim_server::SimServer;
pub use table::{ScriptedTable, standard_deck};
