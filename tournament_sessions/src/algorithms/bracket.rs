//! Knockout bracket sizing for a qualifier count.

use serde::{Deserialize, Serialize};

/// Shape of a knockout bracket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BracketStructure {
    /// Preliminary matches played by the lower seeds
    pub play_in_matches: usize,
    /// Seeds that skip the play-in round
    pub byes: usize,
    /// Nominal bracket size (always a power of two)
    pub bracket_size: usize,
    /// Whether a third-place match is played
    pub has_bronze: bool,
}

/// Hand-tuned layouts for common qualifier counts. These intentionally differ
/// from the formula for 6, 10 and 12 qualifiers.
const SPECIAL_CASES: [(usize, BracketStructure); 5] = [
    (4, BracketStructure { play_in_matches: 0, byes: 0, bracket_size: 4, has_bronze: true }),
    (6, BracketStructure { play_in_matches: 2, byes: 2, bracket_size: 4, has_bronze: true }),
    (8, BracketStructure { play_in_matches: 0, byes: 0, bracket_size: 8, has_bronze: true }),
    (10, BracketStructure { play_in_matches: 3, byes: 4, bracket_size: 8, has_bronze: true }),
    (12, BracketStructure { play_in_matches: 4, byes: 4, bracket_size: 8, has_bronze: true }),
];

/// Bracket layout for `qualifiers` players
pub fn bracket_structure(qualifiers: usize) -> BracketStructure {
    if let Some((_, structure)) = SPECIAL_CASES.iter().find(|(q, _)| *q == qualifiers) {
        return *structure;
    }

    let bracket_size = qualifiers.max(1).next_power_of_two();
    let byes = bracket_size - qualifiers.max(1);
    BracketStructure {
        play_in_matches: (qualifiers.saturating_sub(byes)) / 2,
        byes,
        bracket_size,
        has_bronze: bracket_size >= 8,
    }
}

impl BracketStructure {
    /// Entrants of the main bracket once the play-in round is decided
    pub fn main_bracket_entrants(&self, qualifiers: usize) -> usize {
        if self.play_in_matches == 0 {
            qualifiers
        } else {
            self.byes + self.play_in_matches
        }
    }

    /// Power-of-two size of the main bracket (1 when the play-in round is the final)
    pub fn main_bracket_size(&self, qualifiers: usize) -> usize {
        if self.play_in_matches == 0 {
            self.bracket_size
        } else {
            self.main_bracket_entrants(qualifiers).next_power_of_two()
        }
    }
}

/// Play-in pairings as 1-indexed seeds: the top `byes` seeds skip the round and
/// the rest pair highest-remaining against lowest-remaining
pub fn play_in_pairings(structure: &BracketStructure, qualifiers: usize) -> Vec<(usize, usize)> {
    let mut high = structure.byes + 1;
    let mut low = qualifiers;
    let mut out = Vec::with_capacity(structure.play_in_matches);
    while out.len() < structure.play_in_matches && high < low {
        out.push((high, low));
        high += 1;
        low -= 1;
    }
    out
}

/// Standard bracket order: slot i meets slot `size - 1 - i`
///
/// Returns index pairs into a slot list of length `size`.
pub fn standard_pairings(size: usize) -> Vec<(usize, usize)> {
    (0..size / 2).map(|i| (i, size - 1 - i)).collect()
}

/// Number of knockout rounds needed for `players` entrants
pub fn knockout_rounds(players: usize) -> usize {
    players.max(1).next_power_of_two().trailing_zeros() as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_special_cases_are_preserved() {
        assert_eq!(
            bracket_structure(6),
            BracketStructure { play_in_matches: 2, byes: 2, bracket_size: 4, has_bronze: true }
        );
        assert_eq!(
            bracket_structure(8),
            BracketStructure { play_in_matches: 0, byes: 0, bracket_size: 8, has_bronze: true }
        );
        assert_eq!(bracket_structure(10).play_in_matches, 3);
        assert_eq!(bracket_structure(10).byes, 4);
        assert_eq!(bracket_structure(12).bracket_size, 8);
    }

    #[test]
    fn test_formula_branch() {
        let s = bracket_structure(5);
        assert_eq!(s.bracket_size, 8);
        assert_eq!(s.byes, 3);
        assert_eq!(s.play_in_matches, 1);
        assert!(s.has_bronze);

        let s = bracket_structure(3);
        assert_eq!(s.bracket_size, 4);
        assert_eq!(s.byes, 1);
        assert_eq!(s.play_in_matches, 1);
        assert!(!s.has_bronze);

        let s = bracket_structure(16);
        assert_eq!(s.byes, 0);
        assert_eq!(s.play_in_matches, 8);
    }

    #[test]
    fn test_main_bracket_size() {
        assert_eq!(bracket_structure(6).main_bracket_size(6), 4);
        assert_eq!(bracket_structure(10).main_bracket_size(10), 8);
        assert_eq!(bracket_structure(10).main_bracket_entrants(10), 7);
        assert_eq!(bracket_structure(4).main_bracket_size(4), 4);
        assert_eq!(bracket_structure(5).main_bracket_size(5), 4);
        // Two qualifiers: the play-in match is the final
        assert_eq!(bracket_structure(2).main_bracket_size(2), 1);
    }

    #[test]
    fn test_play_in_pairings() {
        assert_eq!(play_in_pairings(&bracket_structure(6), 6), vec![(3, 6), (4, 5)]);
        assert_eq!(
            play_in_pairings(&bracket_structure(10), 10),
            vec![(5, 10), (6, 9), (7, 8)]
        );
        assert!(play_in_pairings(&bracket_structure(8), 8).is_empty());
    }

    #[test]
    fn test_standard_pairings() {
        assert_eq!(standard_pairings(4), vec![(0, 3), (1, 2)]);
        assert!(standard_pairings(1).is_empty());
    }

    #[test]
    fn test_knockout_rounds() {
        assert_eq!(knockout_rounds(2), 1);
        assert_eq!(knockout_rounds(8), 3);
        assert_eq!(knockout_rounds(9), 4);
        assert_eq!(knockout_rounds(1), 0);
    }

    #[test]
    fn test_structure_is_deterministic() {
        for q in 0..100 {
            assert_eq!(bracket_structure(q), bracket_structure(q));
        }
    }
}
