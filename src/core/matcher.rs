use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

use crate::models::{
    AvailabilitySlot, Booking, Exclusion, ExclusionReason, Provider, RankOptions, RankedCandidate,
    Ranking,
};
use crate::models::scores::to_tenths;
use crate::core::scoring::{evaluate_candidate, CandidateEvaluation};

/// Side data fetched in batch for all candidates of one booking.
///
/// Each lookup is either the batch result or the reason the batch query
/// failed. A provider missing from a successful map has no slots / no
/// active assignments.
#[derive(Debug, Clone)]
pub struct CandidateLookups {
    pub slots: Result<HashMap<Uuid, Vec<AvailabilitySlot>>, String>,
    pub active_counts: Result<HashMap<Uuid, u32>, String>,
}

impl CandidateLookups {
    /// Both lookups succeeded with no data
    pub fn empty() -> Self {
        Self {
            slots: Ok(HashMap::new()),
            active_counts: Ok(HashMap::new()),
        }
    }
}

/// Deterministic candidate ordering.
///
/// Higher total first, then higher distance sub-score, then higher
/// performance sub-score, then lower provider id. Compared in integer
/// tenths so float noise never decides.
pub fn compare_candidates(a: &RankedCandidate, b: &RankedCandidate) -> Ordering {
    to_tenths(b.total_score)
        .cmp(&to_tenths(a.total_score))
        .then_with(|| to_tenths(b.sub_scores.distance).cmp(&to_tenths(a.sub_scores.distance)))
        .then_with(|| to_tenths(b.sub_scores.performance).cmp(&to_tenths(a.sub_scores.performance)))
        .then_with(|| a.provider_id.cmp(&b.provider_id))
}

/// Ranking orchestrator - pure and synchronous over already-fetched inputs
///
/// # Pipeline Stages
/// 1. Eligibility guard (approved + active)
/// 2. Availability, dropping BLOCKED providers
/// 3. Distance, skill, performance and workload scoring
/// 4. Sort with tie-break, optional top-K truncation
#[derive(Debug, Clone)]
pub struct Matcher {
    max_top_k: usize,
}

impl Matcher {
    pub fn new(max_top_k: usize) -> Self {
        Self { max_top_k: max_top_k.max(1) }
    }

    pub fn with_default_limits() -> Self {
        Self::new(100)
    }

    pub fn max_top_k(&self) -> usize {
        self.max_top_k
    }

    /// Rank every candidate provider for a booking
    ///
    /// # Arguments
    /// * `booking` - The booking being matched
    /// * `candidates` - Providers returned by the directory
    /// * `lookups` - Batched availability slots and active assignment counts
    /// * `options` - Optional top-K truncation, capped at `max_top_k`
    ///
    /// # Returns
    /// Ranking with the ordered candidates and the excluded providers
    pub fn rank_candidates(
        &self,
        booking: &Booking,
        candidates: Vec<Provider>,
        lookups: &CandidateLookups,
        options: RankOptions,
    ) -> Ranking {
        let total_candidates = candidates.len();

        if let Err(reason) = &lookups.slots {
            tracing::warn!(
                booking_id = %booking.id,
                scorer = "availability",
                %reason,
                "Availability lookup failed, scoring all candidates as unconfigured"
            );
        }
        if let Err(reason) = &lookups.active_counts {
            tracing::warn!(
                booking_id = %booking.id,
                scorer = "workload",
                %reason,
                "Workload lookup failed, using job-count heuristic"
            );
        }

        let mut seen = HashSet::with_capacity(total_candidates);
        let mut ranked = Vec::with_capacity(total_candidates);
        let mut excluded = Vec::new();

        for provider in candidates {
            if !seen.insert(provider.id) {
                tracing::debug!(provider_id = %provider.id, "Skipping duplicate candidate");
                continue;
            }

            if !provider.is_eligible() {
                excluded.push(Exclusion {
                    provider_id: provider.id,
                    reason: ExclusionReason::Ineligible,
                });
                continue;
            }

            let slots: &[AvailabilitySlot] = match &lookups.slots {
                Ok(by_provider) => by_provider.get(&provider.id).map(Vec::as_slice).unwrap_or(&[]),
                Err(_) => &[],
            };
            let active = match &lookups.active_counts {
                Ok(counts) => Ok(counts.get(&provider.id).copied().unwrap_or(0)),
                Err(reason) => Err(reason.as_str()),
            };

            match evaluate_candidate(&provider, booking, slots, active) {
                CandidateEvaluation::Scored(candidate) => {
                    if lookups.slots.is_err() {
                        tracing::warn!(
                            booking_id = %booking.id,
                            provider_id = %provider.id,
                            scorer = "availability",
                            points = candidate.sub_scores.availability,
                            "Availability scored in degraded mode"
                        );
                    }
                    if lookups.active_counts.is_err() {
                        tracing::warn!(
                            booking_id = %booking.id,
                            provider_id = %provider.id,
                            scorer = "workload",
                            points = candidate.sub_scores.workload,
                            "Workload scored in degraded mode"
                        );
                    }
                    ranked.push(candidate);
                }
                CandidateEvaluation::Excluded(exclusion) => {
                    tracing::debug!(
                        booking_id = %booking.id,
                        provider_id = %provider.id,
                        "Provider blocked for requested slot"
                    );
                    excluded.push(exclusion);
                }
            }
        }

        ranked.sort_by(compare_candidates);

        if let Some(k) = options.top_k {
            ranked.truncate(k.min(self.max_top_k));
        }

        Ranking {
            booking_id: booking.id,
            candidates: ranked,
            excluded,
            total_candidates,
        }
    }
}

impl Default for Matcher {
    fn default() -> Self {
        Self::with_default_limits()
    }
}
