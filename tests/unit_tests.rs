// Unit tests for the cleaner-match scorers

use cleaner_match::core::{
    availability::score_availability,
    distance::{distance_points, haversine_distance, score_distance},
    performance::{rating_points, score_performance},
    skill::score_skill,
    workload::{live_workload_points, score_workload},
};
use cleaner_match::models::{
    Addons, AvailabilitySlot, Coordinates, DistanceBasis, ServiceType, SlotDay, SlotKind, TimeRange,
    WorkloadBasis,
};
use chrono::{NaiveDate, NaiveTime, Weekday};
use std::collections::BTreeSet;
use uuid::Uuid;

const LEEDS: Coordinates = Coordinates { latitude: 53.8008, longitude: -1.5491 };

fn north_of_leeds(km: f64) -> Coordinates {
    Coordinates::new(LEEDS.latitude + km / 111.195, LEEDS.longitude)
}

fn monday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 3).unwrap()
}

fn at(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

#[test]
fn test_haversine_distance_zero() {
    let distance = haversine_distance(LEEDS.latitude, LEEDS.longitude, LEEDS.latitude, LEEDS.longitude);
    assert!(distance < 0.01);
}

#[test]
fn test_haversine_leeds_to_york() {
    // Leeds to York is roughly 35 km as the crow flies
    let distance = haversine_distance(53.8008, -1.5491, 53.9600, -1.0873);
    assert!(distance > 30.0 && distance < 40.0, "got {}", distance);
}

#[test]
fn test_distance_scores_come_from_step_table() {
    let allowed = [30.0, 25.0, 20.0, 15.0, 10.0, 5.0, 2.0];
    let mut previous = f64::MAX;
    for km in [0.0, 3.0, 7.5, 12.0, 17.0, 25.0, 35.0, 45.0, 300.0] {
        let score = score_distance(Some(north_of_leeds(km)), Some(LEEDS), "Leeds", "Leeds");
        assert!(allowed.contains(&score.points), "{} km scored {}", km, score.points);
        assert!(score.points <= previous);
        assert!(matches!(score.basis, DistanceBasis::Geo { .. }));
        previous = score.points;
    }
}

#[test]
fn test_distance_city_fallback_values() {
    for (provider_coords, booking_coords) in [(None, Some(LEEDS)), (Some(LEEDS), None), (None, None)] {
        let same = score_distance(provider_coords, booking_coords, "Leeds", "leeds");
        let other = score_distance(provider_coords, booking_coords, "Leeds", "Bradford");
        assert_eq!(same.points, 25.0);
        assert_eq!(other.points, 5.0);
    }
}

#[test]
fn test_exactly_five_km_is_not_top_band() {
    assert_eq!(distance_points(5.0), 25.0);
}

#[test]
fn test_rating_part_formula() {
    for tenth in 0..=50 {
        let rating = tenth as f64 / 10.0;
        let expected = (rating / 5.0 * 10.0 * 10.0).round() / 10.0;
        assert_eq!(rating_points(Some(rating)), expected);
    }
    assert_eq!(rating_points(None), 5.0);
}

#[test]
fn test_performance_never_exceeds_fifteen() {
    for jobs in [0, 4, 5, 10, 20, 50, 100, 10_000] {
        for rating in [None, Some(0.0), Some(2.5), Some(5.0)] {
            let score = score_performance(rating, jobs);
            assert!(score.points <= 15.0);
            assert_eq!(score.points, score.rating_part + score.experience_part);
        }
    }
}

#[test]
fn test_skill_bounds_under_bonus_stacking() {
    let tag_sets: Vec<BTreeSet<String>> = vec![
        BTreeSet::new(),
        ["window_cleaning"].iter().map(|s| s.to_string()).collect(),
        ["move_in_out", "office_cleaning", "window_cleaning", "post_construction"]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        ["deep_cleaning", "window_cleaning", "regular_cleaning"].iter().map(|s| s.to_string()).collect(),
    ];
    let addons = [Addons::default(), Addons { window_cleaning: true, ..Addons::default() }];

    for tags in &tag_sets {
        for addon in &addons {
            for service in [ServiceType::DeepCleaning, ServiceType::WindowCleaning, ServiceType::OfficeCleaning] {
                let points = score_skill(tags, service, addon);
                assert!((10.0..=20.0).contains(&points), "{:?} {:?} -> {}", tags, service, points);
            }
        }
    }
}

#[test]
fn test_blocked_slot_always_excludes() {
    let blocked = AvailabilitySlot {
        provider_id: Uuid::nil(),
        kind: SlotKind::Blocked,
        day: SlotDay::Date(monday()),
        window: TimeRange::new(at(9, 0), at(12, 0)),
    };
    let recurring = AvailabilitySlot {
        kind: SlotKind::Recurring,
        day: SlotDay::Weekly(Weekday::Mon),
        window: TimeRange::new(at(0, 0), at(23, 59)),
        ..blocked
    };

    for slots in [vec![blocked], vec![recurring, blocked], vec![blocked, recurring]] {
        assert!(score_availability(&slots, monday(), at(10, 30)).is_excluded());
    }
}

#[test]
fn test_workload_zero_split_and_floor() {
    assert_eq!(live_workload_points(0, true), 10.0);
    assert_eq!(live_workload_points(0, false), 8.0);
    for active in 5..50 {
        let points = live_workload_points(active, true);
        assert_eq!(points, 1.0);
        assert!(points < live_workload_points(0, false));
    }
}

#[test]
fn test_workload_fallback_path_is_visible() {
    let score = score_workload(Err("statement timeout"), 0);
    assert_eq!(score.points, 8.0);
    assert!(matches!(score.basis, WorkloadBasis::Heuristic { .. }));
}
