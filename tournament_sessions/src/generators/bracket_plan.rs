//! Shared single-elimination scheduling used by the knockout and
//! group+knockout generators.

use super::{BRONZE_MATCH_NUMBER, GenerationContext, MatchDescriptor};
use crate::algorithms::knockout_rounds;
use crate::tournament::{TournamentPhase, UserId};
use crate::venue::FieldPool;

/// One entrant position in a bracket
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BracketSlot {
    /// Placeholder text, e.g. "Seed 3", "A1" or "Winner of R1 M2"
    pub label: String,
    /// Known player, if any
    pub player: Option<UserId>,
}

impl BracketSlot {
    pub fn seeded(label: impl Into<String>, player: UserId) -> Self {
        Self {
            label: label.into(),
            player: Some(player),
        }
    }

    pub fn placeholder(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            player: None,
        }
    }
}

/// First-round pairing; `None` marks an empty position (bye for the other side)
pub type SlotPair = (Option<BracketSlot>, Option<BracketSlot>);

/// Bracket position order for a power-of-two `size`, as 1-based seeds
///
/// Adjacent entries meet in round one and seed `i` always faces `size + 1 - i`,
/// so the top two seeds can only meet in the final.
pub fn seed_order(size: usize) -> Vec<usize> {
    let size = size.max(1).next_power_of_two();
    let mut order = vec![1];
    while order.len() < size {
        let n = order.len() * 2;
        order = order.iter().flat_map(|&seed| [seed, n + 1 - seed]).collect();
    }
    order
}

/// Pair seed-ordered `entrants` on a bracket of `size` positions
pub fn seeded_pairs(entrants: &[BracketSlot], size: usize) -> Vec<SlotPair> {
    seed_order(size)
        .chunks(2)
        .map(|pair| {
            let high = entrants.get(pair[0] - 1).cloned();
            let low = pair.get(1).and_then(|seed| entrants.get(seed - 1)).cloned();
            (high, low)
        })
        .collect()
}

/// Book every round of a bracket plus the optional third-place match
///
/// Pairs with an empty side are byes: no session is created and the present
/// entrant advances as a placeholder. Participants are only filled in for the
/// first round. A round barrier separates consecutive rounds.
pub(crate) fn schedule_bracket(
    ctx: &GenerationContext<'_>,
    pool: &mut FieldPool,
    first_round_pairs: Vec<SlotPair>,
    first_round_number: u32,
    with_bronze: bool,
) -> Vec<MatchDescriptor> {
    let size = (first_round_pairs.len() * 2).max(2);
    let rounds = knockout_rounds(size);
    let mut sessions = Vec::new();
    let mut current = first_round_pairs;
    let mut semi_final_losers = Vec::new();
    let mut final_round_number = first_round_number;

    for round_index in 0..rounds {
        let round_number = first_round_number + round_index as u32;
        let name = ctx.round_name(size >> round_index);
        let mut advancing = Vec::with_capacity(current.len());
        let mut losers = Vec::new();
        let mut match_number = 0;

        for pair in current {
            match pair {
                (Some(a), Some(b)) => {
                    match_number += 1;
                    let mut session = ctx.book(
                        pool,
                        TournamentPhase::Knockout,
                        round_number,
                        match_number,
                        format!("{name} - Match {match_number}"),
                    );
                    if round_index == 0 {
                        if let (Some(pa), Some(pb)) = (a.player, b.player) {
                            session.participants = Some(vec![pa, pb]);
                        }
                    }
                    session.description = format!("{} vs {}", a.label, b.label);
                    session.metadata.seeding = Some(session.description.clone());
                    session.metadata.round_name = Some(name.clone());
                    session.metadata.expected_participants = Some(2);

                    let tag = format!("R{round_number} M{match_number}");
                    losers.push(format!("Loser of {tag}"));
                    advancing.push(Some(BracketSlot::placeholder(format!("Winner of {tag}"))));
                    sessions.push(session);
                }
                (Some(only), None) | (None, Some(only)) => {
                    advancing.push(Some(BracketSlot::placeholder(only.label)));
                }
                (None, None) => advancing.push(None),
            }
        }

        if round_index + 2 == rounds {
            semi_final_losers = losers;
        }
        final_round_number = round_number;
        pool.round_barrier();

        current = advancing
            .chunks(2)
            .map(|pair| (pair[0].clone(), pair.get(1).cloned().flatten()))
            .collect();
    }

    if with_bronze && rounds >= 2 && semi_final_losers.len() == 2 {
        let mut bronze = ctx.book(
            pool,
            TournamentPhase::Knockout,
            final_round_number,
            BRONZE_MATCH_NUMBER,
            "Third Place Match".to_string(),
        );
        bronze.description = semi_final_losers.join(" vs ");
        bronze.metadata.seeding = Some(bronze.description.clone());
        bronze.metadata.round_name = Some("Third Place".to_string());
        bronze.metadata.expected_participants = Some(2);
        sessions.push(bronze);
    }

    sessions
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_order_keeps_top_seeds_apart() {
        assert_eq!(seed_order(2), vec![1, 2]);
        assert_eq!(seed_order(4), vec![1, 4, 2, 3]);
        assert_eq!(seed_order(8), vec![1, 8, 4, 5, 2, 7, 3, 6]);
    }

    #[test]
    fn test_seed_order_pairs_sum_to_size_plus_one() {
        for size in [2usize, 4, 8, 16, 32] {
            for pair in seed_order(size).chunks(2) {
                assert_eq!(pair[0] + pair[1], size + 1);
            }
        }
    }

    #[test]
    fn test_seeded_pairs_leave_byes_for_top_seeds() {
        let entrants: Vec<_> = (1..=5)
            .map(|i| BracketSlot::seeded(format!("Seed {i}"), i as UserId))
            .collect();
        let pairs = seeded_pairs(&entrants, 8);
        let byes: Vec<_> = pairs
            .iter()
            .filter(|(a, b)| a.is_none() || b.is_none())
            .filter_map(|(a, _)| a.as_ref().map(|slot| slot.label.clone()))
            .collect();
        assert_eq!(byes, vec!["Seed 1", "Seed 2", "Seed 3"]);
    }
}
