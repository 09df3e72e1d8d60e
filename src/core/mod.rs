// Core algorithm exports
pub mod availability;
pub mod distance;
pub mod matcher;
pub mod performance;
pub mod scoring;
pub mod skill;
pub mod workload;

pub use availability::score_availability;
pub use distance::{haversine_distance, calculate_bounding_box, score_distance};
pub use matcher::{Matcher, CandidateLookups, compare_candidates};
pub use performance::score_performance;
pub use scoring::{evaluate_candidate, CandidateEvaluation};
pub use skill::score_skill;
pub use workload::score_workload;
