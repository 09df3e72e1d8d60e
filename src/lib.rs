//! Cleaner Match - deterministic cleaner-to-booking ranking engine
//!
//! Scores every eligible cleaner against a booking on distance,
//! availability, skill fit, performance and current workload, and returns
//! an ordered candidate list with the per-factor breakdown attached.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use core::{Matcher, CandidateLookups, distance::{haversine_distance, calculate_bounding_box}};
pub use models::{Booking, Provider, AvailabilitySlot, RankedCandidate, Ranking, RankOptions, SubScores};
pub use services::{MatchService, MatchError};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        let bbox = calculate_bounding_box(53.8008, -1.5491, 10.0);
        assert!(bbox.min_lat < 53.8008);
        assert_eq!(Matcher::default().max_top_k(), 100);
    }
}
