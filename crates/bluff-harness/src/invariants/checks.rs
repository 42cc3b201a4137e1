//! Standard invariant checks.
//!
//! These invariants capture behavioral properties that must always hold.
//! They verify WHAT must be true, not specific test scenarios.

use bluff_core::RoundPhase;

use super::{Invariant, InvariantResult, SystemSnapshot, Violation};

/// Every selected card is in the local hand.
///
/// `update hands` and `cards played` prune the selection; a selected card
/// that left the hand would let the gate submit a card the player no longer
/// holds.
pub struct SelectionInHand;

impl Invariant for SelectionInHand {
    fn name(&self) -> &'static str {
        "selection_in_hand"
    }

    fn check(&self, state: &SystemSnapshot) -> InvariantResult {
        for client in &state.clients {
            let hand = client.local_hand();
            if let Some(card) = client.selection.iter().find(|card| !hand.contains(card)) {
                return Err(Violation {
                    invariant: self.name(),
                    message: format!(
                        "client {:?}: selected {card} not in hand {:?}",
                        client.id, hand
                    ),
                });
            }
        }
        Ok(())
    }
}

/// The declared rank is set exactly when the pile holds a play.
pub struct DeclaredRankTracksPile;

impl Invariant for DeclaredRankTracksPile {
    fn name(&self) -> &'static str {
        "declared_rank_tracks_pile"
    }

    fn check(&self, state: &SystemSnapshot) -> InvariantResult {
        for client in &state.clients {
            if client.declared_rank.is_some() == client.pile.is_empty() {
                return Err(Violation {
                    invariant: self.name(),
                    message: format!(
                        "client {:?}: declared {:?} with {} plays on the pile",
                        client.id,
                        client.declared_rank,
                        client.pile.len()
                    ),
                });
            }
        }
        Ok(())
    }
}

/// Revealed cards come from the pile.
pub struct RevealedOnPile;

impl Invariant for RevealedOnPile {
    fn name(&self) -> &'static str {
        "revealed_on_pile"
    }

    fn check(&self, state: &SystemSnapshot) -> InvariantResult {
        for client in &state.clients {
            for card in &client.revealed {
                if !client.pile.iter().any(|play| play.cards.contains(card)) {
                    return Err(Violation {
                        invariant: self.name(),
                        message: format!("client {:?}: revealed {card} is not on the pile", client.id),
                    });
                }
            }
        }
        Ok(())
    }
}

/// Gate verdicts agree with the round state.
///
/// - The phase is game over exactly when there is a winner.
/// - Nothing is enabled once the game is over.
/// - Skip and call bluff stay off while the round awaits its first claim.
/// - Skip needs a declared rank.
/// - Call bluff needs a play that is not the local player's.
/// - Play needs a selection.
pub struct GateMatchesRound;

impl Invariant for GateMatchesRound {
    fn name(&self) -> &'static str {
        "gate_matches_round"
    }

    fn check(&self, state: &SystemSnapshot) -> InvariantResult {
        for client in &state.clients {
            let fail = |message: String| Err(Violation { invariant: self.name(), message });

            if (client.phase == RoundPhase::GameOver) != client.winner.is_some() {
                return fail(format!(
                    "client {:?}: phase {:?} with winner {:?}",
                    client.id, client.phase, client.winner
                ));
            }
            match client.phase {
                RoundPhase::AwaitingDeclare if client.can_skip || client.can_call_bluff => {
                    return fail(format!("client {:?}: reply enabled before any claim", client.id));
                },
                RoundPhase::Declared if client.declared_rank.is_none() => {
                    return fail(format!("client {:?}: declared phase without a rank", client.id));
                },
                _ => {},
            }

            if client.winner.is_some() && (client.can_play || client.can_skip || client.can_call_bluff)
            {
                return fail(format!("client {:?}: action enabled after game over", client.id));
            }
            if client.can_skip && client.declared_rank.is_none() {
                return fail(format!("client {:?}: skip enabled with no declared rank", client.id));
            }
            if client.can_play && client.selection.is_empty() {
                return fail(format!("client {:?}: play enabled with empty selection", client.id));
            }
            if client.can_call_bluff {
                let last = client.pile.last().map(|play| &play.player_id);
                if last.is_none() || last == client.id.as_ref() {
                    return fail(format!(
                        "client {:?}: call bluff enabled against {last:?}",
                        client.id
                    ));
                }
            }
        }
        Ok(())
    }
}

/// Generations never decrease.
///
/// Expiry timers are tagged with the generation they were armed in; a
/// generation that went backwards could revive a stale expiry.
pub struct GenerationMonotonicity;

impl Invariant for GenerationMonotonicity {
    fn name(&self) -> &'static str {
        "generation_monotonicity"
    }

    fn check(&self, state: &SystemSnapshot) -> InvariantResult {
        for client in &state.clients {
            for window in client.generation_history.windows(2) {
                if window[1] < window[0] {
                    return Err(Violation {
                        invariant: self.name(),
                        message: format!(
                            "client {:?}: generation decreased {} → {}",
                            client.id, window[0], window[1]
                        ),
                    });
                }
            }
        }
        Ok(())
    }
}
