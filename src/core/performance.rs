use crate::models::PerformanceScore;

/// Neutral rating part for providers without a rating yet
pub const NEUTRAL_RATING_POINTS: f64 = 5.0;
pub const MAX_PERFORMANCE_POINTS: f64 = 15.0;

/// `(minimum completed jobs, points)`, checked top-down
const EXPERIENCE_BANDS: [(u32, f64); 5] = [
    (100, 5.0),
    (50, 4.0),
    (20, 3.0),
    (10, 2.0),
    (5, 1.0),
];
const NOVICE_POINTS: f64 = 0.5;

#[inline]
fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Rating part (0-10): rating scaled to 10 and rounded to one decimal
#[inline]
pub fn rating_points(average_rating: Option<f64>) -> f64 {
    match average_rating {
        Some(rating) if rating.is_finite() => round_one_decimal(rating.clamp(0.0, 5.0) / 5.0 * 10.0),
        _ => NEUTRAL_RATING_POINTS,
    }
}

/// Experience part (0.5-5) from the completed job count
#[inline]
pub fn experience_points(total_jobs: u32) -> f64 {
    EXPERIENCE_BANDS
        .iter()
        .find(|(min_jobs, _)| total_jobs >= *min_jobs)
        .map(|(_, points)| *points)
        .unwrap_or(NOVICE_POINTS)
}

pub fn score_performance(average_rating: Option<f64>, total_jobs: u32) -> PerformanceScore {
    let rating_part = rating_points(average_rating);
    let experience_part = experience_points(total_jobs);

    PerformanceScore {
        rating_part,
        experience_part,
        points: rating_part + experience_part,
    }
}
