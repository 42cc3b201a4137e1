//! Property-based tests for frames carried on a byte stream.
//!
//! A transport reads frames back to back from one stream. These tests verify
//! that a sequence of events written to a buffer comes back in the same order
//! with nothing dropped, for arbitrary event sequences.

use std::collections::BTreeMap;

use bluff_proto::{
    Card, Frame, Player, PlayerId, ServerEvent,
    events::{CardsPlayed, GameOver, GameStarted},
};
use proptest::prelude::*;

fn card_strategy() -> impl Strategy<Value = Card> {
    let ranks = prop::sample::select(vec![
        "2", "3", "4", "5", "6", "7", "8", "9", "10", "J", "Q", "K", "A",
    ]);
    let suits = prop::sample::select(vec!['♠', '♥', '♦', '♣']);
    (ranks, suits).prop_map(|(rank, suit)| Card::new(format!("{rank}{suit}")))
}

fn player_id_strategy() -> impl Strategy<Value = PlayerId> {
    "[a-z0-9]{1,8}".prop_map(PlayerId::new)
}

fn event_strategy() -> impl Strategy<Value = ServerEvent> {
    prop_oneof![
        player_id_strategy().prop_map(ServerEvent::Connected),
        prop::collection::vec((player_id_strategy(), "[A-Za-z ]{0,10}"), 0..4).prop_map(|ps| {
            ServerEvent::RoomState(ps.into_iter().map(|(id, name)| Player::new(id, name)).collect())
        }),
        (player_id_strategy(), prop::collection::vec(card_strategy(), 0..6)).prop_map(
            |(turn, hand)| {
                let mut hands = BTreeMap::new();
                hands.insert(turn.clone(), hand);
                ServerEvent::GameStarted(GameStarted {
                    hands,
                    turn: turn.clone(),
                    players: vec![Player::new(turn, "host")],
                })
            }
        ),
        player_id_strategy().prop_map(ServerEvent::Turn),
        (player_id_strategy(), prop::collection::vec(card_strategy(), 1..4), "[2-9JQKA]").prop_map(
            |(player_id, played_cards, declared_rank)| {
                ServerEvent::CardsPlayed(CardsPlayed { player_id, played_cards, declared_rank })
            }
        ),
        Just(ServerEvent::TableCleared),
        prop::collection::vec(card_strategy(), 0..4).prop_map(ServerEvent::RevealCards),
        ".{0,20}".prop_map(ServerEvent::Message),
        ".{0,20}".prop_map(ServerEvent::ErrorMessage),
        "[A-Za-z]{1,10}".prop_map(|winner_name| ServerEvent::GameOver(GameOver { winner_name })),
    ]
}

proptest! {
    #[test]
    fn prop_stream_preserves_event_order(events in prop::collection::vec(event_strategy(), 0..20)) {
        let mut wire = Vec::new();
        for event in &events {
            let frame = event.clone().into_frame().expect("should encode");
            frame.encode(&mut wire).expect("should fit");
        }

        let mut decoded = Vec::new();
        let mut rest = &wire[..];
        while !rest.is_empty() {
            let frame = Frame::decode(rest).expect("should decode");
            rest = &rest[Frame::PREFIX_SIZE + frame.body_len()..];
            decoded.push(ServerEvent::from_frame(&frame).expect("should parse"));
        }

        prop_assert_eq!(decoded, events);
    }

    #[test]
    fn prop_garbage_payload_never_panics(
        name in prop::sample::select(bluff_proto::EventName::ALL.to_vec()),
        payload in prop::collection::vec(any::<u8>(), 0..128),
    ) {
        let frame = Frame::new(name, payload);
        let _ = ServerEvent::from_frame(&frame);
        let _ = bluff_proto::ClientIntent::from_frame(&frame);
    }
}
