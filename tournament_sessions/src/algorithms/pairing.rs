//! Round-robin pairing using the circle method.

/// Number of rounds needed for every pair of `player_count` players to meet once
pub fn rounds_needed(player_count: usize) -> usize {
    match player_count {
        0 | 1 => 0,
        n if n % 2 == 1 => n,
        n => n - 1,
    }
}

/// Pairings for one round (1-indexed) of a single round-robin
///
/// The first player stays fixed while the others rotate by `round_number - 1`
/// positions. With an odd player count a bye slot is added, and whoever is paired
/// with it sits the round out.
pub fn pairings<T: Copy>(players: &[T], round_number: usize) -> Vec<(T, T)> {
    let mut slots: Vec<Option<T>> = players.iter().copied().map(Some).collect();
    if slots.len() % 2 == 1 {
        slots.push(None);
    }
    if slots.len() < 2 {
        return Vec::new();
    }

    let mut rotating = slots.split_off(1);
    let shift = round_number.saturating_sub(1) % rotating.len();
    rotating.rotate_right(shift);
    slots.extend(rotating);

    let n = slots.len();
    (0..n / 2)
        .filter_map(|i| match (slots[i], slots[n - 1 - i]) {
            (Some(a), Some(b)) => Some((a, b)),
            _ => None,
        })
        .collect()
}

/// All rounds of a single round-robin, in order
pub fn round_robin<T: Copy>(players: &[T]) -> Vec<Vec<(T, T)>> {
    (1..=rounds_needed(players.len()))
        .map(|round| pairings(players, round))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn assert_complete(n: usize) {
        let players: Vec<usize> = (0..n).collect();
        let rounds = round_robin(&players);
        assert_eq!(rounds.len(), rounds_needed(n));

        let mut seen = HashSet::new();
        for round in &rounds {
            let mut busy = HashSet::new();
            for &(a, b) in round {
                assert!(busy.insert(a), "player {a} plays twice in a round");
                assert!(busy.insert(b), "player {b} plays twice in a round");
                let key = (a.min(b), a.max(b));
                assert!(seen.insert(key), "pair {key:?} met twice");
            }
        }
        assert_eq!(seen.len(), n * n.saturating_sub(1) / 2);
    }

    #[test]
    fn test_rounds_needed() {
        assert_eq!(rounds_needed(0), 0);
        assert_eq!(rounds_needed(1), 0);
        assert_eq!(rounds_needed(2), 1);
        assert_eq!(rounds_needed(5), 5);
        assert_eq!(rounds_needed(8), 7);
    }

    #[test]
    fn test_first_round_pairs_first_with_last() {
        let players = [1, 2, 3, 4];
        assert_eq!(pairings(&players, 1), vec![(1, 4), (2, 3)]);
    }

    #[test]
    fn test_rotation_keeps_first_player_fixed() {
        let players = [1, 2, 3, 4];
        assert_eq!(pairings(&players, 2), vec![(1, 3), (4, 2)]);
        assert_eq!(pairings(&players, 3), vec![(1, 2), (3, 4)]);
    }

    #[test]
    fn test_odd_count_drops_bye_pairing() {
        let players = [1, 2, 3];
        let round = pairings(&players, 1);
        // [1, 2, 3, bye] -> (1, bye) dropped
        assert_eq!(round, vec![(2, 3)]);
    }

    #[test]
    fn test_every_pair_meets_exactly_once() {
        for n in 2..=17 {
            assert_complete(n);
        }
    }

    #[test]
    fn test_degenerate_inputs() {
        assert!(pairings::<u8>(&[], 1).is_empty());
        assert!(pairings(&[7], 1).is_empty());
        assert!(round_robin(&[7]).is_empty());
    }
}
