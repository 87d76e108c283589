//! Seeding pool resolution.

use crate::tournament::{ApprovalState, SeedEntry, UserId};

/// Players used to build the bracket, in seed order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedingPool {
    pub players: Vec<UserId>,
    /// Whether the pool was built from check-ins rather than approvals
    pub from_check_in: bool,
}

impl SeedingPool {
    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// Whether the pool disagrees with an independently read checked-in count
    ///
    /// A check-in pool must match the count exactly. An approval pool implies
    /// nobody had checked in, so any non-zero count is also a divergence.
    pub fn diverges_from(&self, checked_in_count: usize) -> bool {
        if self.from_check_in {
            self.players.len() != checked_in_count
        } else {
            checked_in_count != 0
        }
    }
}

/// Build the seeding pool from enrollment entries
///
/// If any active entry has checked in, only checked-in active entries are
/// seeded. Otherwise every active, approved entry is. Entry order is kept.
pub fn resolve_seeding_pool(entries: &[SeedEntry]) -> SeedingPool {
    let checked_in: Vec<UserId> = entries
        .iter()
        .filter(|e| e.is_active && e.checked_in_at.is_some())
        .map(|e| e.user_id)
        .collect();

    if !checked_in.is_empty() {
        return SeedingPool {
            players: checked_in,
            from_check_in: true,
        };
    }

    SeedingPool {
        players: entries
            .iter()
            .filter(|e| e.is_active && e.approval == ApprovalState::Approved)
            .map(|e| e.user_id)
            .collect(),
        from_check_in: false,
    }
}
