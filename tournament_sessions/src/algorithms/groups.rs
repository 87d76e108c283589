//! Group-stage sizing.

use serde::{Deserialize, Serialize};

use super::pairing::rounds_needed;

/// Smallest allowed group
pub const MIN_GROUP_SIZE: usize = 3;

/// Largest allowed group
pub const MAX_GROUP_SIZE: usize = 5;

/// Preferred group size used by the balance score
pub const IDEAL_GROUP_SIZE: usize = 4;

/// Default number of players advancing from each group
pub const DEFAULT_QUALIFIERS_PER_GROUP: usize = 2;

/// Below this many players everyone plays in one group
const SINGLE_GROUP_THRESHOLD: usize = 6;

/// How a player field is split into groups
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupDistribution {
    /// Number of groups
    pub group_count: usize,
    /// Size of each group, largest first
    pub group_sizes: Vec<usize>,
    /// Players advancing from each group
    pub qualifiers_per_group: usize,
    /// Round-robin rounds needed by the largest group
    pub group_rounds: usize,
}

impl GroupDistribution {
    fn from_sizes(group_sizes: Vec<usize>, qualifiers_per_group: usize) -> Self {
        let largest = group_sizes.iter().copied().max().unwrap_or(0);
        Self {
            group_count: group_sizes.len(),
            group_sizes,
            qualifiers_per_group,
            group_rounds: rounds_needed(largest),
        }
    }

    /// Total players advancing to the knockout phase
    pub fn qualifier_count(&self) -> usize {
        self.group_count * self.qualifiers_per_group
    }

    /// Total players across all groups
    pub fn player_count(&self) -> usize {
        self.group_sizes.iter().sum()
    }

    /// Split `player_count` into exactly `groups` groups as evenly as possible
    ///
    /// Used for explicit layouts. Returns `None` when a group would have fewer
    /// than two players or fewer players than qualifiers.
    pub fn with_group_count(
        player_count: usize,
        groups: usize,
        qualifiers_per_group: usize,
    ) -> Option<Self> {
        if groups == 0 || qualifiers_per_group == 0 {
            return None;
        }
        let sizes = even_split(player_count, groups);
        let smallest = sizes.iter().copied().min().unwrap_or(0);
        if smallest < 2 || smallest < qualifiers_per_group {
            return None;
        }
        Some(Self::from_sizes(sizes, qualifiers_per_group))
    }
}

/// Split `total` into `parts` sizes differing by at most one, larger parts first
pub fn even_split(total: usize, parts: usize) -> Vec<usize> {
    if parts == 0 {
        return Vec::new();
    }
    let base = total / parts;
    let remainder = total % parts;
    (0..parts)
        .map(|i| if i < remainder { base + 1 } else { base })
        .collect()
}

/// Most balanced grouping for `player_count` players
///
/// Group sizes stay within [3, 5]. Among the valid group counts, the one with the
/// lowest `variance + 0.1 * sum(|size - 4|)` wins; the first candidate wins ties.
/// Fewer than six players share one group.
pub fn optimal_groups(player_count: usize) -> Option<GroupDistribution> {
    if player_count < 2 {
        return None;
    }
    if player_count < SINGLE_GROUP_THRESHOLD {
        let qualifiers = DEFAULT_QUALIFIERS_PER_GROUP.min(player_count - 1);
        return Some(GroupDistribution::from_sizes(vec![player_count], qualifiers));
    }

    let mut best: Option<(f64, Vec<usize>)> = None;
    for groups in 2..=(player_count / MIN_GROUP_SIZE + 1) {
        let base = player_count / groups;
        let remainder = player_count % groups;
        if !(MIN_GROUP_SIZE..=MAX_GROUP_SIZE).contains(&base) {
            continue;
        }
        if remainder > 0 && base + 1 > MAX_GROUP_SIZE {
            continue;
        }

        let sizes = even_split(player_count, groups);
        let score = balance_score(&sizes);
        let better = match &best {
            Some((best_score, _)) => score < *best_score,
            None => true,
        };
        if better {
            best = Some((score, sizes));
        }
    }

    best.map(|(_, sizes)| GroupDistribution::from_sizes(sizes, DEFAULT_QUALIFIERS_PER_GROUP))
}

fn balance_score(sizes: &[usize]) -> f64 {
    let count = sizes.len() as f64;
    let mean = sizes.iter().sum::<usize>() as f64 / count;
    let variance = sizes
        .iter()
        .map(|&s| {
            let d = s as f64 - mean;
            d * d
        })
        .sum::<f64>()
        / count;
    let deviation: f64 = sizes
        .iter()
        .map(|&s| (s as f64 - IDEAL_GROUP_SIZE as f64).abs())
        .sum();
    variance + 0.1 * deviation
}

/// Letter label for a zero-based group index ("A", "B", ..., "Z", "AA", ...)
pub fn group_label(index: usize) -> String {
    let mut label = Vec::new();
    let mut n = index + 1;
    while n > 0 {
        let rem = (n - 1) % 26;
        label.push(b'A' + rem as u8);
        n = (n - 1) / 26;
    }
    label.reverse();
    String::from_utf8(label).unwrap_or_default()
}
