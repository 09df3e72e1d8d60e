// Model exports
pub mod domain;
pub mod requests;
pub mod responses;
pub mod scores;

pub use domain::{Address, Addons, AvailabilitySlot, Booking, BoundingBox, CandidateQuery, Coordinates, Provider, ServiceType, SlotDay, SlotKind, TimeRange};
pub use requests::RankCandidatesRequest;
pub use responses::{RankCandidatesResponse, HealthResponse, ErrorResponse};
pub use scores::{
    AvailabilityOutcome, AvailabilityScore, DistanceBasis, DistanceScore, Exclusion, ExclusionReason,
    PerformanceScore, RankOptions, RankedCandidate, Ranking, SubScores, WorkloadBasis, WorkloadScore,
};
