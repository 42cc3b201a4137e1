//! Property tests for hand organization.
//!
//! These tests verify:
//! - Output is a permutation of the input
//! - Organizing twice equals organizing once
//! - Every multi-card rank comes before every single-card rank
//! - Cards of one rank keep their relative input order

use std::collections::HashMap;

use bluff_core::organize;
use bluff_proto::Card;
use proptest::prelude::*;

fn card_strategy() -> impl Strategy<Value = Card> {
    let ranks = prop::sample::select(vec![
        "2", "3", "4", "5", "6", "7", "8", "9", "10", "J", "Q", "K", "A", "X", "q", "k",
    ]);
    let suits = prop::sample::select(vec!['♠', '♥', '♦', '♣']);
    (ranks, suits).prop_map(|(rank, suit)| Card::new(format!("{rank}{suit}")))
}

fn hand_strategy() -> impl Strategy<Value = Vec<Card>> {
    prop::collection::vec(card_strategy(), 0..20)
}

/// Known ranks match regardless of case.
fn rank_key(card: &Card) -> String {
    card.rank_token().to_ascii_uppercase()
}

fn rank_counts(hand: &[Card]) -> HashMap<String, usize> {
    let mut counts = HashMap::new();
    for card in hand {
        *counts.entry(rank_key(card)).or_insert(0) += 1;
    }
    counts
}

proptest! {
    #[test]
    fn prop_is_permutation(hand in hand_strategy()) {
        let mut input = hand.clone();
        let mut output = organize(&hand);
        input.sort();
        output.sort();
        prop_assert_eq!(input, output);
    }

    #[test]
    fn prop_idempotent(hand in hand_strategy()) {
        let once = organize(&hand);
        prop_assert_eq!(organize(&once), once);
    }

    #[test]
    fn prop_multi_before_single(hand in hand_strategy()) {
        let counts = rank_counts(&hand);
        let organized = organize(&hand);

        let first_single = organized.iter().position(|c| counts[&rank_key(c)] == 1);
        let last_multi = organized.iter().rposition(|c| counts[&rank_key(c)] >= 2);

        if let (Some(single), Some(multi)) = (first_single, last_multi) {
            prop_assert!(multi < single, "multi-card rank after a single in {:?}", organized);
        }
    }

    #[test]
    fn prop_rank_order_is_stable(hand in hand_strategy()) {
        let organized = organize(&hand);
        for token in rank_counts(&hand).keys() {
            let before: Vec<_> = hand.iter().filter(|c| rank_key(c) == *token).collect();
            let after: Vec<_> = organized.iter().filter(|c| rank_key(c) == *token).collect();
            prop_assert_eq!(before, after);
        }
    }
}
