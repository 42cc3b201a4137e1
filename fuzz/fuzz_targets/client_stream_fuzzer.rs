//! Fuzz target for the client state machine
//!
//! Interleaves raw server frames with local intents and clock advances:
//! - Frames with arbitrary payloads under every event name
//! - Selections and toggles of cards the player may not hold
//! - Declarations of arbitrary text, reconnects mid-play
//!
//! # Invariants
//!
//! - `Client::handle` never panics
//! - Frame handling only fails for undecodable frames
//! - The view invariants hold after every event

#![no_main]

use std::time::Duration;

use arbitrary::Arbitrary;
use bluff_client::{Client, ClientConfig, ClientError, ClientEvent, DEFAULT_ROOM, Environment};
use bluff_harness::{ClientSnapshot, InvariantRegistry, SimEnv, SystemSnapshot};
use bluff_proto::{Card, EventName, Frame};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Clone, Arbitrary)]
enum Step {
    Frame { name: u8, payload: Vec<u8> },
    Toggle(String),
    Select(Vec<String>),
    Clear,
    BeginPlay,
    Confirm(String),
    Cancel,
    Skip,
    Bluff,
    NewGame,
    SetName(String),
    Advance(u16),
    Reconnect,
}

fuzz_target!(|steps: Vec<Step>| {
    let env = SimEnv::new();
    let mut client = Client::new(env.clone(), ClientConfig::default());
    let registry = InvariantRegistry::standard();
    let mut generations = Vec::new();

    for step in steps {
        let is_frame = matches!(step, Step::Frame { .. });
        let event = match step {
            Step::Frame { name, payload } => {
                let name = EventName::ALL[usize::from(name) % EventName::ALL.len()];
                ClientEvent::FrameReceived(Frame::new(name, payload))
            },
            Step::Toggle(label) => ClientEvent::ToggleCard(Card::new(label)),
            Step::Select(labels) => ClientEvent::SelectCards(labels.into_iter().map(Card::new).collect()),
            Step::Clear => ClientEvent::ClearSelection,
            Step::BeginPlay => ClientEvent::BeginPlay,
            Step::Confirm(rank) => ClientEvent::ConfirmPlay { rank },
            Step::Cancel => ClientEvent::CancelPlay,
            Step::Skip => ClientEvent::SkipTurn,
            Step::Bluff => ClientEvent::CallBluff,
            Step::NewGame => ClientEvent::RequestNewGame,
            Step::SetName(name) => ClientEvent::SetName { name },
            Step::Advance(ms) => {
                env.advance(Duration::from_millis(u64::from(ms)));
                ClientEvent::Tick { now: env.now() }
            },
            Step::Reconnect => ClientEvent::Reconnected,
        };

        let result = client.handle(event);
        if is_frame {
            assert!(
                !matches!(result, Err(ClientError::Action(_))),
                "server frames never produce action errors: {result:?}"
            );
        }

        generations.push(client.view().generation());
        let snapshot = ClientSnapshot::from_view(client.view(), DEFAULT_ROOM)
            .with_generation_history(generations.clone());
        if let Err(violation) = registry.check_all(&SystemSnapshot::single(snapshot)) {
            panic!("invariant violated: {violation:?}");
        }
    }
});
