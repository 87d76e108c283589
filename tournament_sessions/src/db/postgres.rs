//! PostgreSQL implementation of the repository traits.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder, Row, postgres::PgRow};
use std::collections::BTreeMap;

use super::errors::{RepositoryError, RepositoryResult};
use super::repository::{
    EnrollmentRepository, LifecycleRepository, SessionRepository, TournamentRepository,
    VenueScheduleRepository,
};
use super::timeouts::{BULK_WRITE_TIMEOUT, with_default_timeout, with_timeout};
use crate::generators::MatchDescriptor;
use crate::lifecycle::{StatusHistoryEntry, TournamentStatus};
use crate::tournament::{
    BracketTypeConfig, GroupOverride, SeedEntry, SessionId, Tournament, TournamentId, VenueId,
    VenueScheduleConfig,
};

/// Rows per INSERT statement (14 binds each, well under the 65535 limit)
const INSERT_BATCH_SIZE: usize = 1000;

/// Repository store over a PostgreSQL pool
#[derive(Clone)]
pub struct PgTournamentStore {
    pool: PgPool,
}

impl PgTournamentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Outcome of the guarded write inside a transaction
enum Guarded<T> {
    Missing,
    Stale,
    Done(T),
}

fn to_u32(value: Option<i32>) -> Option<u32> {
    value.and_then(|v| u32::try_from(v).ok())
}

fn to_usize(value: Option<i32>) -> Option<usize> {
    value.and_then(|v| usize::try_from(v).ok())
}

fn utc(value: Option<NaiveDateTime>) -> Option<DateTime<Utc>> {
    value.map(|dt| dt.and_utc())
}

fn parse_status(value: Option<String>) -> RepositoryResult<Option<TournamentStatus>> {
    Ok(value.map(|s| s.parse()).transpose()?)
}

fn bracket_type_from_row(row: &PgRow) -> RepositoryResult<Option<BracketTypeConfig>> {
    let Some(code) = row.try_get::<Option<String>, _>("bt_code")? else {
        return Ok(None);
    };

    let round_names: BTreeMap<String, String> = row
        .try_get::<Option<serde_json::Value>, _>("bt_round_names")?
        .map(serde_json::from_value)
        .transpose()?
        .unwrap_or_default();
    let group_configuration: BTreeMap<String, GroupOverride> = row
        .try_get::<Option<serde_json::Value>, _>("bt_group_configuration")?
        .map(serde_json::from_value)
        .transpose()?
        .unwrap_or_default();

    Ok(Some(BracketTypeConfig {
        display_name: row
            .try_get::<Option<String>, _>("bt_display_name")?
            .unwrap_or_else(|| code.clone()),
        code,
        min_players: to_usize(row.try_get("bt_min_players")?).unwrap_or(2),
        max_players: to_usize(row.try_get("bt_max_players")?),
        requires_power_of_two: row
            .try_get::<Option<bool>, _>("bt_requires_power_of_two")?
            .unwrap_or(false),
        round_names,
        third_place_playoff: row
            .try_get::<Option<bool>, _>("bt_third_place_playoff")?
            .unwrap_or(false),
        group_configuration,
        pod_size: to_usize(row.try_get("bt_pod_size")?),
        ranking_rounds: to_u32(row.try_get("bt_ranking_rounds")?),
        swiss_rounds: to_u32(row.try_get("bt_swiss_rounds")?),
    }))
}

fn tournament_from_row(row: &PgRow) -> RepositoryResult<Tournament> {
    Ok(Tournament {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        format: row.try_get::<String, _>("format")?.parse()?,
        match_style: row.try_get::<String, _>("match_style")?.parse()?,
        scoring_type: row.try_get::<String, _>("scoring_type")?.parse()?,
        start_time: row.try_get::<NaiveDateTime, _>("start_time")?.and_utc(),
        end_time: utc(row.try_get("end_time")?),
        venue_id: row.try_get("venue_id")?,
        location: row.try_get("location")?,
        max_participants: to_u32(row.try_get("max_participants")?),
        status: parse_status(row.try_get("status")?)?,
        instructor_id: row.try_get("instructor_id")?,
        match_duration_minutes: to_u32(row.try_get("match_duration_minutes")?),
        break_duration_minutes: to_u32(row.try_get("break_duration_minutes")?),
        parallel_fields: to_u32(row.try_get("parallel_fields")?),
        sessions_generated: row.try_get("sessions_generated")?,
        sessions_generated_at: utc(row.try_get("sessions_generated_at")?),
        bracket_type: bracket_type_from_row(row)?,
    })
}

#[async_trait]
impl TournamentRepository for PgTournamentStore {
    async fn find_tournament(
        &self,
        tournament_id: TournamentId,
    ) -> RepositoryResult<Option<Tournament>> {
        let row = with_default_timeout(
            sqlx::query(
                r#"
                SELECT t.id, t.name, t.format, t.match_style, t.scoring_type,
                       t.start_time, t.end_time, t.venue_id, t.location, t.max_participants,
                       t.status, t.instructor_id, t.match_duration_minutes,
                       t.break_duration_minutes, t.parallel_fields,
                       t.sessions_generated, t.sessions_generated_at,
                       bt.code AS bt_code, bt.display_name AS bt_display_name,
                       bt.min_players AS bt_min_players, bt.max_players AS bt_max_players,
                       bt.requires_power_of_two AS bt_requires_power_of_two,
                       bt.round_names AS bt_round_names,
                       bt.third_place_playoff AS bt_third_place_playoff,
                       bt.group_configuration AS bt_group_configuration,
                       bt.pod_size AS bt_pod_size, bt.ranking_rounds AS bt_ranking_rounds,
                       bt.swiss_rounds AS bt_swiss_rounds
                FROM tournaments t
                LEFT JOIN bracket_types bt ON bt.id = t.bracket_type_id
                WHERE t.id = $1
                "#,
            )
            .bind(tournament_id)
            .fetch_optional(&self.pool),
        )
        .await?;

        row.as_ref().map(tournament_from_row).transpose()
    }
}

#[async_trait]
impl EnrollmentRepository for PgTournamentStore {
    async fn seed_entries(&self, tournament_id: TournamentId) -> RepositoryResult<Vec<SeedEntry>> {
        let rows = with_default_timeout(
            sqlx::query(
                r#"
                SELECT user_id, is_active, approval_status, checked_in_at
                FROM tournament_enrollments
                WHERE tournament_id = $1
                ORDER BY seed_position NULLS LAST, enrolled_at, id
                "#,
            )
            .bind(tournament_id)
            .fetch_all(&self.pool),
        )
        .await?;

        rows.iter()
            .map(|row| -> RepositoryResult<SeedEntry> {
                Ok(SeedEntry {
                    user_id: row.try_get("user_id")?,
                    is_active: row.try_get("is_active")?,
                    approval: row.try_get::<String, _>("approval_status")?.parse()?,
                    checked_in_at: utc(row.try_get("checked_in_at")?),
                })
            })
            .collect()
    }

    async fn checked_in_count(&self, tournament_id: TournamentId) -> RepositoryResult<usize> {
        let count: i64 = with_default_timeout(
            sqlx::query_scalar(
                r#"
                SELECT COUNT(*) FROM tournament_enrollments
                WHERE tournament_id = $1 AND is_active AND checked_in_at IS NOT NULL
                "#,
            )
            .bind(tournament_id)
            .fetch_one(&self.pool),
        )
        .await?;
        Ok(count.max(0) as usize)
    }

    async fn active_enrollment_count(
        &self,
        tournament_id: TournamentId,
    ) -> RepositoryResult<usize> {
        let count: i64 = with_default_timeout(
            sqlx::query_scalar(
                r#"
                SELECT COUNT(*) FROM tournament_enrollments
                WHERE tournament_id = $1 AND is_active AND approval_status = 'APPROVED'
                "#,
            )
            .bind(tournament_id)
            .fetch_one(&self.pool),
        )
        .await?;
        Ok(count.max(0) as usize)
    }
}

#[async_trait]
impl VenueScheduleRepository for PgTournamentStore {
    async fn find_schedule(
        &self,
        tournament_id: TournamentId,
        venue_id: VenueId,
    ) -> RepositoryResult<Option<VenueScheduleConfig>> {
        let row = with_default_timeout(
            sqlx::query(
                r#"
                SELECT match_duration_minutes, break_duration_minutes, parallel_fields,
                       venue_label, is_active
                FROM tournament_venue_schedules
                WHERE tournament_id = $1 AND venue_id = $2
                "#,
            )
            .bind(tournament_id)
            .bind(venue_id)
            .fetch_optional(&self.pool),
        )
        .await?;

        row.map(|r| -> RepositoryResult<VenueScheduleConfig> {
            Ok(VenueScheduleConfig {
                tournament_id,
                venue_id,
                match_duration_minutes: to_u32(r.try_get("match_duration_minutes")?),
                break_duration_minutes: to_u32(r.try_get("break_duration_minutes")?),
                parallel_fields: to_u32(r.try_get("parallel_fields")?),
                venue_label: r.try_get("venue_label")?,
                is_active: r.try_get("is_active")?,
            })
        })
        .transpose()
    }
}

#[async_trait]
impl SessionRepository for PgTournamentStore {
    async fn commit_generation(
        &self,
        tournament_id: TournamentId,
        sessions: &[MatchDescriptor],
        generated_at: DateTime<Utc>,
    ) -> RepositoryResult<Vec<SessionId>> {
        let rows: Vec<(&MatchDescriptor, serde_json::Value)> = sessions
            .iter()
            .map(|s| serde_json::to_value(&s.metadata).map(|metadata| (s, metadata)))
            .collect::<Result<_, serde_json::Error>>()?;

        let outcome = with_timeout(BULK_WRITE_TIMEOUT, async {
            let mut tx = self.pool.begin().await?;

            let generated: Option<bool> = sqlx::query_scalar(
                "SELECT sessions_generated FROM tournaments WHERE id = $1 FOR UPDATE",
            )
            .bind(tournament_id)
            .fetch_optional(&mut *tx)
            .await?;
            match generated {
                None => return Ok::<_, sqlx::Error>(Guarded::Missing),
                Some(true) => return Ok::<_, sqlx::Error>(Guarded::Stale),
                Some(false) => {}
            }

            let mut ids = Vec::with_capacity(rows.len());
            for chunk in rows.chunks(INSERT_BATCH_SIZE) {
                let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(
                    "INSERT INTO sessions (tournament_id, title, description, start_time, \
                     end_time, phase, round_number, match_number, location, participant_ids, \
                     match_format, scoring_type, metadata, is_generated) ",
                );
                builder.push_values(chunk, |mut b, (session, metadata)| {
                    b.push_bind(tournament_id)
                        .push_bind(session.title.clone())
                        .push_bind(session.description.clone())
                        .push_bind(session.start_time.naive_utc())
                        .push_bind(session.end_time.naive_utc())
                        .push_bind(session.phase.as_str())
                        .push_bind(session.round_number as i32)
                        .push_bind(session.match_number as i32)
                        .push_bind(session.location.clone())
                        .push_bind(session.participants.clone())
                        .push_bind(session.match_format.as_str())
                        .push_bind(session.scoring_type.as_str())
                        .push_bind(metadata.clone())
                        .push_bind(true);
                });
                builder.push(" RETURNING id");

                let inserted = builder.build().fetch_all(&mut *tx).await?;
                for row in &inserted {
                    ids.push(row.try_get::<i64, _>("id")?);
                }
            }

            sqlx::query(
                r#"
                UPDATE tournaments
                SET sessions_generated = TRUE, sessions_generated_at = $2
                WHERE id = $1
                "#,
            )
            .bind(tournament_id)
            .bind(generated_at.naive_utc())
            .execute(&mut *tx)
            .await?;

            tx.commit().await?;
            Ok::<_, sqlx::Error>(Guarded::Done(ids))
        })
        .await?;

        match outcome {
            Guarded::Done(ids) => Ok(ids),
            Guarded::Missing => Err(RepositoryError::TournamentNotFound(tournament_id)),
            Guarded::Stale => Err(RepositoryError::Conflict(tournament_id)),
        }
    }

    async fn delete_generated_sessions(&self, tournament_id: TournamentId) -> RepositoryResult<u64> {
        let outcome = with_timeout(BULK_WRITE_TIMEOUT, async {
            let mut tx = self.pool.begin().await?;

            let deleted = sqlx::query("DELETE FROM sessions WHERE tournament_id = $1 AND is_generated")
                .bind(tournament_id)
                .execute(&mut *tx)
                .await?
                .rows_affected();

            let updated = sqlx::query(
                r#"
                UPDATE tournaments
                SET sessions_generated = FALSE, sessions_generated_at = NULL
                WHERE id = $1
                "#,
            )
            .bind(tournament_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();
            if updated == 0 {
                return Ok::<_, sqlx::Error>(Guarded::Missing);
            }

            tx.commit().await?;
            Ok::<_, sqlx::Error>(Guarded::Done(deleted))
        })
        .await?;

        match outcome {
            Guarded::Done(deleted) => Ok(deleted),
            Guarded::Missing | Guarded::Stale => {
                Err(RepositoryError::TournamentNotFound(tournament_id))
            }
        }
    }

    async fn session_count(&self, tournament_id: TournamentId) -> RepositoryResult<usize> {
        let count: i64 = with_default_timeout(
            sqlx::query_scalar("SELECT COUNT(*) FROM sessions WHERE tournament_id = $1")
                .bind(tournament_id)
                .fetch_one(&self.pool),
        )
        .await?;
        Ok(count.max(0) as usize)
    }
}

#[async_trait]
impl LifecycleRepository for PgTournamentStore {
    async fn apply_transition(
        &self,
        tournament_id: TournamentId,
        expected: Option<TournamentStatus>,
        entry: &StatusHistoryEntry,
    ) -> RepositoryResult<()> {
        let outcome = with_default_timeout(async {
            let mut tx = self.pool.begin().await?;

            let current: Option<Option<String>> = sqlx::query_scalar(
                "SELECT status FROM tournaments WHERE id = $1 FOR UPDATE",
            )
            .bind(tournament_id)
            .fetch_optional(&mut *tx)
            .await?;
            let Some(current) = current else {
                return Ok::<_, sqlx::Error>(Guarded::Missing);
            };
            if current.as_deref() != expected.map(|s| s.as_str()) {
                return Ok::<_, sqlx::Error>(Guarded::Stale);
            }

            sqlx::query("UPDATE tournaments SET status = $2, updated_at = NOW() WHERE id = $1")
                .bind(tournament_id)
                .bind(entry.to.as_str())
                .execute(&mut *tx)
                .await?;

            sqlx::query(
                r#"
                INSERT INTO tournament_status_history
                    (tournament_id, from_status, to_status, changed_at, reason)
                VALUES ($1, $2, $3, $4, $5)
                "#,
            )
            .bind(tournament_id)
            .bind(entry.from.map(|s| s.as_str()))
            .bind(entry.to.as_str())
            .bind(entry.changed_at.naive_utc())
            .bind(entry.reason.as_deref())
            .execute(&mut *tx)
            .await?;

            tx.commit().await?;
            Ok::<_, sqlx::Error>(Guarded::Done(()))
        })
        .await?;

        match outcome {
            Guarded::Done(()) => Ok(()),
            Guarded::Missing => Err(RepositoryError::TournamentNotFound(tournament_id)),
            Guarded::Stale => Err(RepositoryError::Conflict(tournament_id)),
        }
    }

    async fn status_history(
        &self,
        tournament_id: TournamentId,
    ) -> RepositoryResult<Vec<StatusHistoryEntry>> {
        let rows = with_default_timeout(
            sqlx::query(
                r#"
                SELECT from_status, to_status, changed_at, reason
                FROM tournament_status_history
                WHERE tournament_id = $1
                ORDER BY changed_at, id
                "#,
            )
            .bind(tournament_id)
            .fetch_all(&self.pool),
        )
        .await?;

        rows.iter()
            .map(|row| -> RepositoryResult<StatusHistoryEntry> {
                Ok(StatusHistoryEntry {
                    from: parse_status(row.try_get("from_status")?)?,
                    to: row.try_get::<String, _>("to_status")?.parse()?,
                    changed_at: row.try_get::<NaiveDateTime, _>("changed_at")?.and_utc(),
                    reason: row.try_get("reason")?,
                })
            })
            .collect()
    }
}
