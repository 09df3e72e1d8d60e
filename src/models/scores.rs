use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::domain::TimeRange;

/// Convert a point value to integer tenths.
///
/// Every sub-score is a multiple of 0.1, so sums and comparisons done in
/// tenths are exact and reproducible.
#[inline]
pub fn to_tenths(points: f64) -> i64 {
    (points * 10.0).round() as i64
}

/// How the distance sub-score was obtained
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "camelCase")]
pub enum DistanceBasis {
    /// Haversine distance between provider and booking coordinates
    Geo {
        #[serde(rename = "distanceKm")]
        distance_km: f64,
    },
    /// Coordinates missing on either side, compared city names instead
    City { matched: bool },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DistanceScore {
    pub points: f64,
    pub basis: DistanceBasis,
}

/// Which availability rule decided the sub-score
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "camelCase")]
pub enum AvailabilityOutcome {
    Blocked { window: TimeRange },
    Recurring,
    OneTime,
    Unconfigured,
    NoMatch,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AvailabilityScore {
    pub points: f64,
    pub outcome: AvailabilityOutcome,
}

impl AvailabilityScore {
    pub fn is_excluded(&self) -> bool {
        matches!(self.outcome, AvailabilityOutcome::Blocked { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PerformanceScore {
    #[serde(rename = "ratingPart")]
    pub rating_part: f64,
    #[serde(rename = "experiencePart")]
    pub experience_part: f64,
    pub points: f64,
}

/// How the workload sub-score was obtained
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "camelCase")]
pub enum WorkloadBasis {
    /// Live count of non-terminal assignments
    Live { active: u32 },
    /// Count unavailable, scored from historical job count only
    Heuristic { reason: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkloadScore {
    pub points: f64,
    pub basis: WorkloadBasis,
}

/// The five component scores of one (booking, provider) pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SubScores {
    pub distance: f64,
    pub availability: f64,
    pub skill: f64,
    pub performance: f64,
    pub workload: f64,
}

impl SubScores {
    /// Plain sum of the five sub-scores, no further weighting
    pub fn total(&self) -> f64 {
        let tenths = to_tenths(self.distance)
            + to_tenths(self.availability)
            + to_tenths(self.skill)
            + to_tenths(self.performance)
            + to_tenths(self.workload);
        tenths as f64 / 10.0
    }
}

/// Scored candidate with its breakdown attached
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedCandidate {
    #[serde(rename = "providerId")]
    pub provider_id: Uuid,
    #[serde(rename = "totalScore")]
    pub total_score: f64,
    #[serde(rename = "subScores")]
    pub sub_scores: SubScores,
    pub excluded: bool,
    #[serde(rename = "distanceBasis")]
    pub distance_basis: DistanceBasis,
    #[serde(rename = "availabilityRule")]
    pub availability_outcome: AvailabilityOutcome,
    #[serde(rename = "workloadBasis")]
    pub workload_basis: WorkloadBasis,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ExclusionReason {
    /// A BLOCKED slot covers the requested date and time
    Blocked { window: TimeRange },
    /// Not approved or not active
    Ineligible,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Exclusion {
    #[serde(rename = "providerId")]
    pub provider_id: Uuid,
    pub reason: ExclusionReason,
}

/// Ordered outcome of ranking one booking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ranking {
    #[serde(rename = "bookingId")]
    pub booking_id: Uuid,
    pub candidates: Vec<RankedCandidate>,
    pub excluded: Vec<Exclusion>,
    #[serde(rename = "totalCandidates")]
    pub total_candidates: usize,
}

impl Ranking {
    /// Head of the ranking, used for auto-assignment
    pub fn best(&self) -> Option<&RankedCandidate> {
        self.candidates.first()
    }
}

/// Caller-chosen presentation policy
#[derive(Debug, Clone, Copy, Default)]
pub struct RankOptions {
    pub top_k: Option<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_is_exact_in_tenths() {
        let scores = SubScores {
            distance: 30.0,
            availability: 25.0,
            skill: 20.0,
            performance: 9.6 + 3.0,
            workload: 9.0,
        };
        assert_eq!(scores.total(), 96.6);
    }

    #[test]
    fn test_to_tenths_rounds() {
        assert_eq!(to_tenths(9.6), 96);
        assert_eq!(to_tenths(0.5), 5);
        assert_eq!(to_tenths(12.599999999), 126);
    }

    #[test]
    fn test_empty_ranking_has_no_best() {
        let ranking = Ranking {
            booking_id: Uuid::nil(),
            candidates: vec![],
            excluded: vec![],
            total_candidates: 0,
        };
        assert!(ranking.best().is_none());
    }

    #[test]
    fn test_basis_serializes_with_method_tag() {
        let json = serde_json::to_value(DistanceBasis::City { matched: true }).unwrap();
        assert_eq!(json["method"], "city");
        assert_eq!(json["matched"], true);

        let json = serde_json::to_value(WorkloadBasis::Live { active: 2 }).unwrap();
        assert_eq!(json["method"], "live");
        assert_eq!(json["active"], 2);
    }
}
