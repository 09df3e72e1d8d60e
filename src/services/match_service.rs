use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use uuid::Uuid;

use crate::core::{CandidateLookups, Matcher};
use crate::models::{Booking, CandidateQuery, RankOptions, Ranking};
use crate::services::{AvailabilityStore, Geocoder, LookupError, ProviderDirectory, WorkloadCounter};

/// Hard failures that abort a whole match
#[derive(Debug, Error)]
pub enum MatchError {
    #[error("Provider directory unavailable: {0}")]
    Directory(#[source] LookupError),

    #[error("Provider directory timed out after {0:?}")]
    DirectoryTimeout(Duration),
}

impl From<LookupError> for MatchError {
    fn from(err: LookupError) -> Self {
        match err {
            LookupError::Timeout(after) => MatchError::DirectoryTimeout(after),
            other => MatchError::Directory(other),
        }
    }
}

/// Lookup tuning for one match request
#[derive(Debug, Clone, Copy)]
pub struct LookupLimits {
    /// Upper bound on every single collaborator call
    pub timeout: Duration,
    /// Radius around the booking used to pre-filter the directory
    pub search_radius_km: f64,
    /// Maximum providers requested from the directory
    pub max_candidates: usize,
}

impl Default for LookupLimits {
    fn default() -> Self {
        Self {
            timeout: Duration::from_millis(2000),
            search_radius_km: 40.0,
            max_candidates: 500,
        }
    }
}

/// Fetches everything a match needs from the collaborators, then hands it
/// to the pure [`Matcher`].
///
/// I/O per booking is at most four calls: geocode (only when the booking
/// has no coordinates), directory, and the two batched lookups which run
/// concurrently. Every call is time-boxed and a timeout counts as a failed
/// call.
#[derive(Clone)]
pub struct MatchService {
    directory: Arc<dyn ProviderDirectory>,
    availability: Arc<dyn AvailabilityStore>,
    workload: Arc<dyn WorkloadCounter>,
    geocoder: Arc<dyn Geocoder>,
    matcher: Matcher,
    limits: LookupLimits,
}

impl MatchService {
    pub fn new(
        directory: Arc<dyn ProviderDirectory>,
        availability: Arc<dyn AvailabilityStore>,
        workload: Arc<dyn WorkloadCounter>,
        geocoder: Arc<dyn Geocoder>,
        matcher: Matcher,
        limits: LookupLimits,
    ) -> Self {
        Self {
            directory,
            availability,
            workload,
            geocoder,
            matcher,
            limits,
        }
    }

    /// Rank every eligible provider for a booking
    ///
    /// Only a directory failure is an error; every other collaborator
    /// failure degrades the affected sub-score to its fallback.
    pub async fn rank_candidates(
        &self,
        booking: &Booking,
        options: RankOptions,
    ) -> Result<Ranking, MatchError> {
        let mut booking = booking.clone();
        if booking.address.coordinates.is_none() {
            booking.address.coordinates = self.resolve_coordinates(&booking).await;
        }

        let query = CandidateQuery {
            city: booking.address.city.clone(),
            center: booking.address.coordinates,
            radius_km: self.limits.search_radius_km,
            limit: self.limits.max_candidates,
        };

        let candidates = self
            .time_boxed(self.directory.find_candidates(&query))
            .await
            .map_err(|e| {
                tracing::error!(booking_id = %booking.id, error = %e, "Failed to fetch candidates");
                MatchError::from(e)
            })?;

        tracing::debug!(booking_id = %booking.id, "Found {} candidates", candidates.len());

        let ids: Vec<Uuid> = candidates.iter().map(|p| p.id).collect();
        let lookups = if ids.is_empty() {
            CandidateLookups::empty()
        } else {
            let (slots, active_counts) = tokio::join!(
                self.time_boxed(self.availability.slots_for(&ids)),
                self.time_boxed(self.workload.active_counts(&ids)),
            );
            CandidateLookups {
                slots: slots.map_err(|e| e.to_string()),
                active_counts: active_counts.map_err(|e| e.to_string()),
            }
        };

        let ranking = self.matcher.rank_candidates(&booking, candidates, &lookups, options);

        tracing::info!(
            booking_id = %booking.id,
            ranked = ranking.candidates.len(),
            excluded = ranking.excluded.len(),
            total = ranking.total_candidates,
            "Ranked candidates"
        );

        Ok(ranking)
    }

    /// Geocode the booking address; any failure means the distance scorer
    /// falls back to city names
    async fn resolve_coordinates(&self, booking: &Booking) -> Option<crate::models::Coordinates> {
        let query = booking.address.geocode_query();
        match self.time_boxed(self.geocoder.geocode(&query)).await {
            Ok(Some(coords)) => Some(coords),
            Ok(None) => {
                tracing::warn!(
                    booking_id = %booking.id,
                    scorer = "distance",
                    "Address not resolved, falling back to city match"
                );
                None
            }
            Err(e) => {
                tracing::warn!(
                    booking_id = %booking.id,
                    scorer = "distance",
                    error = %e,
                    "Geocoder unavailable, falling back to city match"
                );
                None
            }
        }
    }

    async fn time_boxed<T, F>(&self, call: F) -> Result<T, LookupError>
    where
        F: Future<Output = Result<T, LookupError>>,
    {
        match tokio::time::timeout(self.limits.timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(LookupError::Timeout(self.limits.timeout)),
        }
    }
}
