//! Effective schedule parameters per venue.

use serde::{Deserialize, Serialize};

use crate::db::{RepositoryResult, VenueScheduleRepository};
use crate::tournament::{Tournament, TournamentId, VenueId};

/// Caller-supplied defaults, lowest precedence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleDefaults {
    pub match_duration_minutes: u32,
    pub break_duration_minutes: u32,
    pub parallel_fields: u32,
}

impl ScheduleDefaults {
    /// Tournament-wide values where set, otherwise `self`
    pub fn overlay_tournament(self, tournament: &Tournament) -> Self {
        Self {
            match_duration_minutes: tournament
                .match_duration_minutes
                .unwrap_or(self.match_duration_minutes),
            break_duration_minutes: tournament
                .break_duration_minutes
                .unwrap_or(self.break_duration_minutes),
            parallel_fields: tournament.parallel_fields.unwrap_or(self.parallel_fields),
        }
    }
}

/// Schedule parameters in effect for one venue
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedVenue {
    /// Venue the values belong to (None for the venue-less default)
    pub venue_id: Option<VenueId>,
    pub match_duration_minutes: u32,
    pub break_duration_minutes: u32,
    pub parallel_fields: u32,
    /// Display label written into each session's location
    pub label: Option<String>,
}

impl ResolvedVenue {
    /// Values taken straight from the defaults
    pub fn from_defaults(
        venue_id: Option<VenueId>,
        defaults: ScheduleDefaults,
        label: Option<String>,
    ) -> Self {
        Self {
            venue_id,
            match_duration_minutes: defaults.match_duration_minutes,
            break_duration_minutes: defaults.break_duration_minutes,
            parallel_fields: defaults.parallel_fields,
            label,
        }
    }
}

/// Resolves venue overrides against defaults
pub struct VenueResolver<'a, R: ?Sized> {
    repository: &'a R,
}

impl<'a, R> VenueResolver<'a, R>
where
    R: VenueScheduleRepository + ?Sized,
{
    pub fn new(repository: &'a R) -> Self {
        Self { repository }
    }

    /// Resolve the schedule for one venue
    ///
    /// An active override row wins field by field; missing fields, inactive rows
    /// and absent rows fall back to `defaults`. With no `venue_id` nothing is read.
    ///
    /// # Arguments
    ///
    /// * `tournament_id` - Tournament ID
    /// * `venue_id` - Venue to resolve, if any
    /// * `defaults` - Global values
    /// * `fallback_label` - Location used when the override has no label
    ///
    /// # Returns
    ///
    /// * `RepositoryResult<ResolvedVenue>` - Effective values or storage error
    pub async fn resolve(
        &self,
        tournament_id: TournamentId,
        venue_id: Option<VenueId>,
        defaults: ScheduleDefaults,
        fallback_label: Option<&str>,
    ) -> RepositoryResult<ResolvedVenue> {
        let fallback_label = fallback_label.map(str::to_string);

        let Some(venue_id) = venue_id else {
            return Ok(ResolvedVenue::from_defaults(None, defaults, fallback_label));
        };

        let row = self
            .repository
            .find_schedule(tournament_id, venue_id)
            .await?
            .filter(|row| row.is_active);

        Ok(match row {
            Some(row) => ResolvedVenue {
                venue_id: Some(venue_id),
                match_duration_minutes: row
                    .match_duration_minutes
                    .unwrap_or(defaults.match_duration_minutes),
                break_duration_minutes: row
                    .break_duration_minutes
                    .unwrap_or(defaults.break_duration_minutes),
                parallel_fields: row.parallel_fields.unwrap_or(defaults.parallel_fields),
                label: row.venue_label.or(fallback_label),
            },
            None => ResolvedVenue::from_defaults(Some(venue_id), defaults, fallback_label),
        })
    }

    /// Resolve every venue independently, in the given order
    pub async fn resolve_all(
        &self,
        tournament_id: TournamentId,
        venue_ids: &[VenueId],
        defaults: ScheduleDefaults,
        fallback_label: Option<&str>,
    ) -> RepositoryResult<Vec<ResolvedVenue>> {
        let mut resolved = Vec::with_capacity(venue_ids.len());
        for venue_id in venue_ids {
            resolved.push(
                self.resolve(tournament_id, Some(*venue_id), defaults, fallback_label)
                    .await?,
            );
        }
        Ok(resolved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::InMemoryStore;
    use crate::tournament::VenueScheduleConfig;

    const DEFAULTS: ScheduleDefaults = ScheduleDefaults {
        match_duration_minutes: 90,
        break_duration_minutes: 15,
        parallel_fields: 1,
    };

    fn row(active: bool) -> VenueScheduleConfig {
        VenueScheduleConfig {
            tournament_id: 1,
            venue_id: 7,
            match_duration_minutes: Some(30),
            break_duration_minutes: None,
            parallel_fields: Some(3),
            venue_label: Some("North Hall".to_string()),
            is_active: active,
        }
    }

    #[tokio::test]
    async fn test_no_venue_skips_storage() {
        let store = InMemoryStore::new();
        let resolved = VenueResolver::new(&store)
            .resolve(1, None, DEFAULTS, Some("Main Park"))
            .await
            .unwrap();
        assert_eq!(resolved, ResolvedVenue::from_defaults(None, DEFAULTS, Some("Main Park".into())));
        assert_eq!(store.venue_reads(), 0);
    }

    #[tokio::test]
    async fn test_active_override_wins_per_field() {
        let store = InMemoryStore::new();
        store.insert_venue_schedule(row(true));
        let resolved = VenueResolver::new(&store)
            .resolve(1, Some(7), DEFAULTS, None)
            .await
            .unwrap();
        assert_eq!(resolved.match_duration_minutes, 30);
        assert_eq!(resolved.break_duration_minutes, 15);
        assert_eq!(resolved.parallel_fields, 3);
        assert_eq!(resolved.label.as_deref(), Some("North Hall"));
        assert_eq!(store.venue_reads(), 1);
    }

    #[tokio::test]
    async fn test_inactive_override_is_ignored() {
        let store = InMemoryStore::new();
        store.insert_venue_schedule(row(false));
        let resolved = VenueResolver::new(&store)
            .resolve(1, Some(7), DEFAULTS, Some("Main Park"))
            .await
            .unwrap();
        assert_eq!(resolved.venue_id, Some(7));
        assert_eq!(resolved.match_duration_minutes, 90);
        assert_eq!(resolved.label.as_deref(), Some("Main Park"));
    }

    #[test]
    fn test_tournament_values_overlay_defaults() {
        let mut tournament = crate::tournament::Tournament::new(
            1,
            "Cup",
            crate::tournament::TournamentFormat::League,
            crate::tournament::MatchStyle::HeadToHead,
            chrono::Utc::now(),
        );
        tournament.break_duration_minutes = Some(5);
        let merged = DEFAULTS.overlay_tournament(&tournament);
        assert_eq!(merged.break_duration_minutes, 5);
        assert_eq!(merged.match_duration_minutes, 90);
    }
}
