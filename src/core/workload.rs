use crate::models::{WorkloadBasis, WorkloadScore};

const IDLE_EXPERIENCED_POINTS: f64 = 10.0;
const IDLE_NEWCOMER_POINTS: f64 = 8.0;
/// Points for 1, 2, 3 and 4 active assignments
const BUSY_POINTS: [f64; 4] = [9.0, 7.0, 5.0, 3.0];
/// Floor for 5+ active assignments; overloaded providers stay rankable
const OVERLOADED_POINTS: f64 = 1.0;

/// `(minimum historical jobs, points)` used when the live count is unavailable
const HEURISTIC_BANDS: [(u32, f64); 3] = [(50, 5.0), (10, 7.0), (1, 10.0)];
const HEURISTIC_NEWCOMER_POINTS: f64 = 8.0;

/// Points from the live count of non-terminal assignments
pub fn live_workload_points(active_assignments: u32, experienced: bool) -> f64 {
    match active_assignments {
        0 if experienced => IDLE_EXPERIENCED_POINTS,
        0 => IDLE_NEWCOMER_POINTS,
        n => BUSY_POINTS
            .get(n as usize - 1)
            .copied()
            .unwrap_or(OVERLOADED_POINTS),
    }
}

/// Degraded-mode points keyed only on historical job count
pub fn heuristic_workload_points(total_jobs: u32) -> f64 {
    HEURISTIC_BANDS
        .iter()
        .find(|(min_jobs, _)| total_jobs >= *min_jobs)
        .map(|(_, points)| *points)
        .unwrap_or(HEURISTIC_NEWCOMER_POINTS)
}

/// Score current workload.
///
/// `active_assignments` is the live count, or the reason it could not be
/// obtained. The returned basis records which path was taken.
pub fn score_workload(active_assignments: Result<u32, &str>, total_jobs: u32) -> WorkloadScore {
    match active_assignments {
        Ok(active) => WorkloadScore {
            points: live_workload_points(active, total_jobs >= 1),
            basis: WorkloadBasis::Live { active },
        },
        Err(reason) => WorkloadScore {
            points: heuristic_workload_points(total_jobs),
            basis: WorkloadBasis::Heuristic { reason: reason.to_string() },
        },
    }
}
