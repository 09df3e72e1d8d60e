use std::collections::BTreeSet;
use crate::models::{Addons, ServiceType};

pub const BASE_POINTS: f64 = 10.0;
pub const EXACT_MATCH_BONUS: f64 = 10.0;
pub const WINDOW_BONUS: f64 = 2.0;
pub const VERSATILITY_BONUS: f64 = 2.0;
pub const VERSATILITY_MIN_TAGS: usize = 3;
pub const MAX_SKILL_POINTS: f64 = 20.0;

pub const WINDOW_CLEANING_TAG: &str = "window_cleaning";

#[inline]
fn normalize(tag: &str) -> String {
    tag.trim().to_lowercase()
}

/// Case-insensitive membership test
pub fn has_specialization(specializations: &BTreeSet<String>, tag: &str) -> bool {
    let wanted = normalize(tag);
    specializations.iter().any(|s| normalize(s) == wanted)
}

/// Distinct tags after normalization, ignoring blanks
pub fn distinct_specializations(specializations: &BTreeSet<String>) -> usize {
    specializations
        .iter()
        .map(|s| normalize(s))
        .filter(|s| !s.is_empty())
        .collect::<BTreeSet<_>>()
        .len()
}

/// Score how well a provider's specializations fit the booking.
///
/// `min(20, 10 + exact + window + versatility)`: exact match on the
/// service type's required tag adds 10, a requested window add-on covered
/// by the provider adds 2, and breadth (3+ tags) adds 2 only when there
/// was no exact match.
pub fn score_skill(
    specializations: &BTreeSet<String>,
    service_type: ServiceType,
    addons: &Addons,
) -> f64 {
    let exact = has_specialization(specializations, service_type.required_specialization());

    let mut points = BASE_POINTS;
    if exact {
        points += EXACT_MATCH_BONUS;
    }
    if addons.window_cleaning && has_specialization(specializations, WINDOW_CLEANING_TAG) {
        points += WINDOW_BONUS;
    }
    if !exact && distinct_specializations(specializations) >= VERSATILITY_MIN_TAGS {
        points += VERSATILITY_BONUS;
    }

    points.min(MAX_SKILL_POINTS)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(list: &[&str]) -> BTreeSet<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn window_addon() -> Addons {
        Addons { window_cleaning: true, ..Addons::default() }
    }

    #[test]
    fn test_base_only() {
        assert_eq!(score_skill(&tags(&[]), ServiceType::DeepCleaning, &Addons::default()), 10.0);
    }

    #[test]
    fn test_exact_match() {
        let specs = tags(&["deep_cleaning"]);
        assert_eq!(score_skill(&specs, ServiceType::DeepCleaning, &Addons::default()), 20.0);
    }

    #[test]
    fn test_exact_match_is_case_insensitive() {
        let specs = tags(&["Deep_Cleaning"]);
        assert_eq!(score_skill(&specs, ServiceType::DeepCleaning, &Addons::default()), 20.0);
    }

    #[test]
    fn test_window_bonus_saturates_at_cap() {
        let specs = tags(&["deep_cleaning", "window_cleaning"]);
        assert_eq!(score_skill(&specs, ServiceType::DeepCleaning, &window_addon()), 20.0);
    }

    #[test]
    fn test_window_bonus_without_exact_match() {
        let specs = tags(&["window_cleaning"]);
        assert_eq!(score_skill(&specs, ServiceType::OfficeCleaning, &window_addon()), 12.0);
    }

    #[test]
    fn test_window_bonus_needs_addon() {
        let specs = tags(&["window_cleaning"]);
        assert_eq!(score_skill(&specs, ServiceType::OfficeCleaning, &Addons::default()), 10.0);
    }

    #[test]
    fn test_versatility_bonus() {
        let specs = tags(&["regular_cleaning", "move_in_out", "office_cleaning"]);
        assert_eq!(score_skill(&specs, ServiceType::DeepCleaning, &Addons::default()), 12.0);
    }

    #[test]
    fn test_versatility_counts_distinct_tags() {
        let specs = tags(&["office_cleaning", "Office_Cleaning", "move_in_out"]);
        assert_eq!(score_skill(&specs, ServiceType::DeepCleaning, &Addons::default()), 10.0);
    }

    #[test]
    fn test_versatility_and_window_stack() {
        let specs = tags(&["regular_cleaning", "move_in_out", "window_cleaning"]);
        assert_eq!(score_skill(&specs, ServiceType::DeepCleaning, &window_addon()), 14.0);
    }

    #[test]
    fn test_score_stays_in_range() {
        let all = tags(&[
            "regular_cleaning",
            "deep_cleaning",
            "move_in_out",
            "office_cleaning",
            "post_construction",
            "window_cleaning",
        ]);
        for service in [
            ServiceType::RegularCleaning,
            ServiceType::DeepCleaning,
            ServiceType::MoveInOut,
            ServiceType::OfficeCleaning,
            ServiceType::PostConstruction,
            ServiceType::WindowCleaning,
        ] {
            for addons in [Addons::default(), window_addon()] {
                for specs in [tags(&[]), all.clone()] {
                    let points = score_skill(&specs, service, &addons);
                    assert!((10.0..=20.0).contains(&points));
                }
            }
        }
    }
}
