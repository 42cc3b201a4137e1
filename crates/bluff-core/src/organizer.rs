//! Card organizer.
//!
//! Orders a hand for display so pairs and sets, the raw material for a
//! convincing bluff, sit at the front.

use bluff_proto::{Card, Rank};

/// What cards are grouped by: the parsed rank, or the raw token when the
/// rank is unknown.
#[derive(PartialEq, Eq)]
enum GroupKey<'a> {
    Known(Rank),
    Unknown(&'a str),
}

impl<'a> GroupKey<'a> {
    fn of(card: &'a Card) -> Self {
        card.rank().map_or_else(|| Self::Unknown(card.rank_token()), Self::Known)
    }

    fn rank(&self) -> Option<Rank> {
        match self {
            Self::Known(rank) => Some(*rank),
            Self::Unknown(_) => None,
        }
    }
}

/// Cards sharing one rank, in original relative order.
struct Group<'a> {
    key: GroupKey<'a>,
    cards: Vec<&'a Card>,
}

impl Group<'_> {
    fn is_multi(&self) -> bool {
        self.cards.len() >= 2
    }
}

/// Group and sort a hand for display.
///
/// - Ranks held two or more times come before ranks held once.
/// - Within each bucket, ranks are ordered by precedence, Ace first.
/// - Cards of one rank keep their original relative order.
/// - Rank tokens are matched case-insensitively, so `q♣` groups with `Q♥`.
/// - Labels with an unparseable rank sort after every known rank of their
///   bucket, grouped by raw token in first-appearance order.
///
/// Pure and idempotent: the output is a permutation of the input, and
/// organizing an organized hand changes nothing.
pub fn organize(hand: &[Card]) -> Vec<Card> {
    let mut groups: Vec<Group<'_>> = Vec::new();

    for card in hand {
        let key = GroupKey::of(card);
        match groups.iter_mut().find(|g| g.key == key) {
            Some(group) => group.cards.push(card),
            None => groups.push(Group { key, cards: vec![card] }),
        }
    }

    // Stable: equal keys keep first-appearance order
    groups.sort_by(|a, b| b.is_multi().cmp(&a.is_multi()).then_with(|| b.key.rank().cmp(&a.key.rank())));

    groups.into_iter().flat_map(|g| g.cards).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hand(labels: &[&str]) -> Vec<Card> {
        labels.iter().copied().map(Card::from).collect()
    }

    #[test]
    fn single_pair_is_unchanged() {
        let h = hand(&["10♥", "10♠"]);
        assert_eq!(organize(&h), h);
    }

    #[test]
    fn multi_groups_before_singles() {
        let h = hand(&["A♣", "3♥", "K♦", "3♠"]);
        assert_eq!(organize(&h), hand(&["3♥", "3♠", "A♣", "K♦"]));
    }

    #[test]
    fn groups_ordered_by_precedence() {
        let h = hand(&["2♣", "J♥", "2♦", "J♠", "Q♣", "10♦", "Q♥"]);
        assert_eq!(organize(&h), hand(&["Q♣", "Q♥", "J♥", "J♠", "2♣", "2♦", "10♦"]));
    }

    #[test]
    fn unknown_ranks_sort_last_in_bucket() {
        let h = hand(&["Z♣", "2♦", "Y♥", "Z♠"]);
        assert_eq!(organize(&h), hand(&["Z♣", "Z♠", "2♦", "Y♥"]));
    }

    #[test]
    fn rank_case_does_not_split_groups() {
        let h = hand(&["Q♥", "K♠", "q♣"]);
        assert_eq!(organize(&h), hand(&["Q♥", "q♣", "K♠"]));
    }

    #[test]
    fn empty_hand() {
        assert!(organize(&[]).is_empty());
    }
}
