use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime, Weekday};
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Row};
use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;
use uuid::Uuid;

use crate::core::distance::calculate_bounding_box;
use crate::models::{AvailabilitySlot, CandidateQuery, Coordinates, Provider, SlotDay, SlotKind, TimeRange};
use crate::services::{AvailabilityStore, LookupError, ProviderDirectory, WorkloadCounter};

/// Errors that can occur when interacting with PostgreSQL
#[derive(Debug, Error)]
pub enum PostgresError {
    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),
}

/// PostgreSQL-backed provider directory, availability store and workload
/// counter.
///
/// Reads the marketplace's existing `cleaners`, `availability_slots` and
/// `bookings` tables. Every lookup is a single query regardless of how many
/// candidates are involved.
pub struct PostgresClient {
    pool: PgPool,
}

impl PostgresClient {
    /// Create a new PostgreSQL client from a connection string
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
        acquire_timeout: Duration,
        idle_timeout: Duration,
    ) -> Result<Self, PostgresError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(acquire_timeout)
            .idle_timeout(idle_timeout)
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        Ok(Self { pool })
    }

    /// Create a new PostgreSQL client from settings
    pub async fn from_settings(
        url: &str,
        max_connections: Option<u32>,
        min_connections: Option<u32>,
        acquire_timeout_secs: Option<u64>,
        idle_timeout_secs: Option<u64>,
    ) -> Result<Self, PostgresError> {
        tracing::info!("Connecting to PostgreSQL");

        Self::new(
            url,
            max_connections.unwrap_or(10),
            min_connections.unwrap_or(1),
            Duration::from_secs(acquire_timeout_secs.unwrap_or(5)),
            Duration::from_secs(idle_timeout_secs.unwrap_or(600)),
        )
        .await
    }

    /// Fetch active, approved cleaners in the booking city, plus those whose
    /// home coordinates fall inside the search radius bounding box.
    ///
    /// With a centre the rows come back nearest first, so a hit on `limit`
    /// drops the farthest cleaners rather than arbitrary ones.
    pub async fn find_providers(&self, query: &CandidateQuery) -> Result<Vec<Provider>, PostgresError> {
        let rows = match query.center {
            Some(center) => {
                let bbox = calculate_bounding_box(center.latitude, center.longitude, query.radius_km);
                let sql = r#"
                    SELECT id, city, latitude, longitude, specializations,
                           average_rating, total_jobs, is_approved, is_active
                    FROM cleaners
                    WHERE is_active AND is_approved
                      AND (LOWER(TRIM(city)) = LOWER(TRIM($1))
                           OR (latitude BETWEEN $2 AND $3 AND longitude BETWEEN $4 AND $5))
                    ORDER BY (latitude - $7) ^ 2 + (longitude - $8) ^ 2 NULLS LAST, id
                    LIMIT $6
                "#;

                sqlx::query(sql)
                    .bind(&query.city)
                    .bind(bbox.min_lat)
                    .bind(bbox.max_lat)
                    .bind(bbox.min_lon)
                    .bind(bbox.max_lon)
                    .bind(query.limit as i64)
                    .bind(center.latitude)
                    .bind(center.longitude)
                    .fetch_all(&self.pool)
                    .await?
            }
            None => {
                let sql = r#"
                    SELECT id, city, latitude, longitude, specializations,
                           average_rating, total_jobs, is_approved, is_active
                    FROM cleaners
                    WHERE is_active AND is_approved
                      AND LOWER(TRIM(city)) = LOWER(TRIM($1))
                    ORDER BY id
                    LIMIT $2
                "#;

                sqlx::query(sql)
                    .bind(&query.city)
                    .bind(query.limit as i64)
                    .fetch_all(&self.pool)
                    .await?
            }
        };

        let providers = rows
            .iter()
            .map(provider_from_row)
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!("Directory returned {} providers for {}", providers.len(), query.city);

        if hit_candidate_limit(providers.len(), query.limit) {
            tracing::warn!(
                city = %query.city,
                limit = query.limit,
                "Candidate limit reached, farther cleaners were not ranked"
            );
        }

        Ok(providers)
    }

    /// All availability slots for the given cleaners, grouped by cleaner
    pub async fn fetch_slots(
        &self,
        provider_ids: &[Uuid],
    ) -> Result<HashMap<Uuid, Vec<AvailabilitySlot>>, PostgresError> {
        let query = r#"
            SELECT cleaner_id, kind, day_of_week, slot_date, start_time, end_time
            FROM availability_slots
            WHERE cleaner_id = ANY($1)
        "#;

        let rows = sqlx::query(query)
            .bind(provider_ids)
            .fetch_all(&self.pool)
            .await?;

        let decoded = rows
            .iter()
            .map(slot_from_row)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(group_slots(decoded))
    }

    /// Count pending, confirmed and in-progress bookings per cleaner.
    /// Cleaners with none are absent from the result.
    pub async fn count_active_bookings(
        &self,
        provider_ids: &[Uuid],
    ) -> Result<HashMap<Uuid, u32>, PostgresError> {
        let query = r#"
            SELECT cleaner_id, COUNT(*) AS active
            FROM bookings
            WHERE cleaner_id = ANY($1)
              AND status IN ('PENDING', 'CONFIRMED', 'IN_PROGRESS')
            GROUP BY cleaner_id
        "#;

        let rows = sqlx::query(query)
            .bind(provider_ids)
            .fetch_all(&self.pool)
            .await?;

        rows.iter()
            .map(|row| -> Result<(Uuid, u32), PostgresError> {
                let id: Uuid = row.try_get("cleaner_id")?;
                let active: i64 = row.try_get("active")?;
                Ok((id, u32::try_from(active).unwrap_or(u32::MAX)))
            })
            .collect()
    }

    /// Health check for the database connection
    pub async fn health_check(&self) -> Result<bool, PostgresError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
            .map_err(Into::into)
    }
}

#[async_trait]
impl ProviderDirectory for PostgresClient {
    async fn find_candidates(&self, query: &CandidateQuery) -> Result<Vec<Provider>, LookupError> {
        Ok(self.find_providers(query).await?)
    }
}

#[async_trait]
impl AvailabilityStore for PostgresClient {
    async fn slots_for(
        &self,
        provider_ids: &[Uuid],
    ) -> Result<HashMap<Uuid, Vec<AvailabilitySlot>>, LookupError> {
        Ok(self.fetch_slots(provider_ids).await?)
    }
}

#[async_trait]
impl WorkloadCounter for PostgresClient {
    async fn active_counts(&self, provider_ids: &[Uuid]) -> Result<HashMap<Uuid, u32>, LookupError> {
        Ok(self.count_active_bookings(provider_ids).await?)
    }
}

fn provider_from_row(row: &PgRow) -> Result<Provider, PostgresError> {
    let latitude: Option<f64> = row.try_get("latitude")?;
    let longitude: Option<f64> = row.try_get("longitude")?;
    let specializations: Option<Vec<String>> = row.try_get("specializations")?;
    let total_jobs: i32 = row.try_get("total_jobs")?;

    Ok(Provider {
        id: row.try_get("id")?,
        city: row.try_get("city")?,
        coordinates: latitude.zip(longitude).map(|(lat, lon)| Coordinates::new(lat, lon)),
        specializations: specializations.unwrap_or_default().into_iter().collect(),
        average_rating: row.try_get("average_rating")?,
        total_jobs: u32::try_from(total_jobs).unwrap_or(0),
        is_approved: row.try_get("is_approved")?,
        is_active: row.try_get("is_active")?,
    })
}

/// A result as long as the limit means the directory may have cut rows
fn hit_candidate_limit(returned: usize, limit: usize) -> bool {
    limit > 0 && returned >= limit
}

/// Group decoded rows by cleaner. A cleaner whose rows were all skipped
/// still gets an (empty) entry: they configured a schedule, so an
/// unmatched request scores as no match instead of unconfigured.
fn group_slots(
    decoded: impl IntoIterator<Item = (Uuid, Option<AvailabilitySlot>)>,
) -> HashMap<Uuid, Vec<AvailabilitySlot>> {
    let mut slots: HashMap<Uuid, Vec<AvailabilitySlot>> = HashMap::new();
    for (provider_id, slot) in decoded {
        let entry = slots.entry(provider_id).or_default();
        entry.extend(slot);
    }
    slots
}

/// Decode one slot row. Rows with an unknown kind or missing day are
/// skipped rather than failing the whole lookup.
fn slot_from_row(row: &PgRow) -> Result<(Uuid, Option<AvailabilitySlot>), PostgresError> {
    let provider_id: Uuid = row.try_get("cleaner_id")?;
    let kind: String = row.try_get("kind")?;
    let day_of_week: Option<i16> = row.try_get("day_of_week")?;
    let slot_date: Option<NaiveDate> = row.try_get("slot_date")?;
    let start: NaiveTime = row.try_get("start_time")?;
    let end: NaiveTime = row.try_get("end_time")?;

    let Some(kind) = parse_slot_kind(&kind) else {
        tracing::warn!(provider_id = %provider_id, kind = %kind, "Skipping slot with unknown kind");
        return Ok((provider_id, None));
    };

    let Some(day) = slot_day(kind, day_of_week, slot_date) else {
        tracing::warn!(
            provider_id = %provider_id,
            ?kind,
            ?day_of_week,
            ?slot_date,
            "Skipping slot without a usable day"
        );
        return Ok((provider_id, None));
    };

    let slot = AvailabilitySlot {
        provider_id,
        kind,
        day,
        window: TimeRange::new(start, end),
    };
    Ok((provider_id, Some(slot)))
}

fn parse_slot_kind(value: &str) -> Option<SlotKind> {
    match value.trim().to_ascii_uppercase().as_str() {
        "RECURRING" => Some(SlotKind::Recurring),
        "ONE_TIME" => Some(SlotKind::OneTime),
        "BLOCKED" => Some(SlotKind::Blocked),
        _ => None,
    }
}

/// Weekdays are stored as 0 = Sunday .. 6 = Saturday
fn weekday_from_number(value: i16) -> Option<Weekday> {
    match value {
        0 => Some(Weekday::Sun),
        1 => Some(Weekday::Mon),
        2 => Some(Weekday::Tue),
        3 => Some(Weekday::Wed),
        4 => Some(Weekday::Thu),
        5 => Some(Weekday::Fri),
        6 => Some(Weekday::Sat),
        _ => None,
    }
}

/// Recurring slots need a weekday, one-time slots a date; blocks take a
/// date when present and fall back to a weekday
fn slot_day(kind: SlotKind, day_of_week: Option<i16>, slot_date: Option<NaiveDate>) -> Option<SlotDay> {
    let weekly = day_of_week.and_then(weekday_from_number).map(SlotDay::Weekly);
    let dated = slot_date.map(SlotDay::Date);

    match kind {
        SlotKind::Recurring => weekly,
        SlotKind::OneTime => dated,
        SlotKind::Blocked => dated.or(weekly),
    }
}
