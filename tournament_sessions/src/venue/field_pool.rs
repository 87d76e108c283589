//! Parallel-field time cursors for one venue.

use chrono::{DateTime, Duration, Utc};

use super::resolver::ResolvedVenue;
use crate::tournament::VenueId;

/// Time slot handed out by a [`FieldPool`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSlot {
    /// 1-based field number within the venue
    pub field_number: u32,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Round-robin field scheduler
///
/// Each field keeps its own "next free" cursor. [`FieldPool::assign`] takes the
/// field at the rotating index, books `duration` at its cursor and moves the
/// cursor by `duration + break`.
#[derive(Debug, Clone)]
pub struct FieldPool {
    venue_id: Option<VenueId>,
    label: Option<String>,
    duration: Duration,
    gap: Duration,
    cursors: Vec<DateTime<Utc>>,
    loads: Vec<usize>,
    next: usize,
    last_end: Option<DateTime<Utc>>,
}

impl FieldPool {
    /// Pool for a resolved venue with every cursor at `start`
    ///
    /// A field count of zero is treated as one.
    pub fn new(start: DateTime<Utc>, venue: &ResolvedVenue) -> Self {
        let fields = venue.parallel_fields.max(1) as usize;
        Self {
            venue_id: venue.venue_id,
            label: venue.label.clone(),
            duration: Duration::minutes(i64::from(venue.match_duration_minutes)),
            gap: Duration::minutes(i64::from(venue.break_duration_minutes)),
            cursors: vec![start; fields],
            loads: vec![0; fields],
            next: 0,
            last_end: None,
        }
    }

    /// Book the next slot
    pub fn assign(&mut self) -> FieldSlot {
        let index = self.next;
        let start = self.cursors[index];
        let end = start + self.duration;

        self.cursors[index] = end + self.gap;
        self.loads[index] += 1;
        self.next = (index + 1) % self.cursors.len();
        self.last_end = Some(self.last_end.map_or(end, |last| last.max(end)));

        FieldSlot {
            field_number: index as u32 + 1,
            start,
            end,
        }
    }

    /// Hold every field until the busiest one is free
    ///
    /// Only used where the next round's participants come from the previous
    /// round's results (knockout and Swiss rounds). League and group stages
    /// book straight through. The rotation index is kept.
    pub fn round_barrier(&mut self) {
        if let Some(latest) = self.cursors.iter().max().copied() {
            self.cursors.iter_mut().for_each(|cursor| *cursor = latest);
        }
    }

    /// End of the latest booked slot
    pub fn last_end(&self) -> Option<DateTime<Utc>> {
        self.last_end
    }

    /// Matches booked per field
    pub fn loads(&self) -> &[usize] {
        &self.loads
    }

    pub fn field_count(&self) -> usize {
        self.cursors.len()
    }

    pub fn venue_id(&self) -> Option<VenueId> {
        self.venue_id
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn break_duration(&self) -> Duration {
        self.gap
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn venue(fields: u32) -> ResolvedVenue {
        ResolvedVenue {
            venue_id: Some(3),
            match_duration_minutes: 60,
            break_duration_minutes: 10,
            parallel_fields: fields,
            label: Some("Court".to_string()),
        }
    }

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).unwrap()
    }

    #[test]
    fn test_single_field_is_sequential() {
        let mut pool = FieldPool::new(start(), &venue(1));
        let a = pool.assign();
        let b = pool.assign();
        assert_eq!(a.field_number, 1);
        assert_eq!(b.start, a.end + Duration::minutes(10));
        assert_eq!(pool.last_end(), Some(b.end));
    }

    #[test]
    fn test_parallel_fields_start_together() {
        let mut pool = FieldPool::new(start(), &venue(3));
        let slots: Vec<_> = (0..4).map(|_| pool.assign()).collect();
        assert!(slots[..3].iter().all(|s| s.start == start()));
        assert_eq!(
            slots.iter().map(|s| s.field_number).collect::<Vec<_>>(),
            vec![1, 2, 3, 1]
        );
        assert_eq!(slots[3].start, start() + Duration::minutes(70));
    }

    #[test]
    fn test_barrier_aligns_cursors() {
        let mut pool = FieldPool::new(start(), &venue(2));
        pool.assign();
        pool.assign();
        pool.assign();
        pool.round_barrier();
        let next = pool.assign();
        assert_eq!(next.field_number, 2);
        assert_eq!(next.start, start() + Duration::minutes(140));
    }

    #[test]
    fn test_zero_fields_clamped_to_one() {
        let pool = FieldPool::new(start(), &venue(0));
        assert_eq!(pool.field_count(), 1);
    }

    #[test]
    fn test_loads_stay_balanced() {
        let mut pool = FieldPool::new(start(), &venue(4));
        for i in 0..23 {
            pool.assign();
            if i % 5 == 4 {
                pool.round_barrier();
            }
        }
        let max = pool.loads().iter().max().unwrap();
        let min = pool.loads().iter().min().unwrap();
        assert!(max - min <= 1);
    }
}
