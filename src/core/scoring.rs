use crate::models::{
    AvailabilitySlot, Booking, Exclusion, ExclusionReason, AvailabilityOutcome, Provider,
    RankedCandidate, SubScores,
};
use crate::core::{
    availability::score_availability,
    distance::score_distance,
    performance::score_performance,
    skill::score_skill,
    workload::score_workload,
};

/// Outcome of scoring a single candidate against a booking
#[derive(Debug, Clone, PartialEq)]
pub enum CandidateEvaluation {
    Scored(RankedCandidate),
    Excluded(Exclusion),
}

/// Score one provider for one booking.
///
/// Availability runs first; a covering BLOCKED slot short-circuits and no
/// other scorer runs. Otherwise the five sub-scores are summed into the
/// total:
///
/// total = distance (≤30) + availability (≤25) + skill (≤20)
///       + performance (≤15) + workload (≤10)
pub fn evaluate_candidate(
    provider: &Provider,
    booking: &Booking,
    slots: &[AvailabilitySlot],
    active_assignments: Result<u32, &str>,
) -> CandidateEvaluation {
    let availability = score_availability(slots, booking.scheduled_date, booking.scheduled_time);
    if let AvailabilityOutcome::Blocked { window } = availability.outcome {
        return CandidateEvaluation::Excluded(Exclusion {
            provider_id: provider.id,
            reason: ExclusionReason::Blocked { window },
        });
    }

    let distance = score_distance(
        provider.coordinates,
        booking.address.coordinates,
        &provider.city,
        &booking.address.city,
    );
    let skill = score_skill(&provider.specializations, booking.service_type, &booking.addons);
    let performance = score_performance(provider.average_rating, provider.total_jobs);
    let workload = score_workload(active_assignments, provider.total_jobs);

    let sub_scores = SubScores {
        distance: distance.points,
        availability: availability.points,
        skill,
        performance: performance.points,
        workload: workload.points,
    };

    CandidateEvaluation::Scored(RankedCandidate {
        provider_id: provider.id,
        total_score: sub_scores.total(),
        sub_scores,
        excluded: false,
        distance_basis: distance.basis,
        availability_outcome: availability.outcome,
        workload_basis: workload.basis,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Address, Addons, Coordinates, DistanceBasis, ServiceType, SlotDay, SlotKind, TimeRange, WorkloadBasis};
    use chrono::{NaiveDate, NaiveTime, Weekday};
    use std::collections::BTreeSet;
    use uuid::Uuid;

    fn create_test_booking() -> Booking {
        Booking {
            id: Uuid::from_u128(1),
            // Monday
            scheduled_date: NaiveDate::from_ymd_opt(2024, 6, 3).unwrap(),
            scheduled_time: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            service_type: ServiceType::DeepCleaning,
            addons: Addons::default(),
            address: Address {
                street: "1 Park Row".to_string(),
                city: "Leeds".to_string(),
                coordinates: Some(Coordinates::new(53.8008, -1.5491)),
            },
        }
    }

    fn create_test_provider() -> Provider {
        Provider {
            id: Uuid::from_u128(42),
            city: "Leeds".to_string(),
            coordinates: Some(Coordinates::new(53.8008, -1.5491)),
            specializations: ["deep_cleaning".to_string()].into_iter().collect::<BTreeSet<_>>(),
            average_rating: Some(4.8),
            total_jobs: 45,
            is_approved: true,
            is_active: true,
        }
    }

    fn slot(kind: SlotKind, day: SlotDay) -> AvailabilitySlot {
        AvailabilitySlot {
            provider_id: Uuid::from_u128(42),
            kind,
            day,
            window: TimeRange::new(
                NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
                NaiveTime::from_hms_opt(12, 0, 0).unwrap(),
            ),
        }
    }

    #[test]
    fn test_full_score_breakdown() {
        let slots = vec![slot(SlotKind::Recurring, SlotDay::Weekly(Weekday::Mon))];
        let evaluation = evaluate_candidate(&create_test_provider(), &create_test_booking(), &slots, Ok(1));

        let CandidateEvaluation::Scored(candidate) = evaluation else {
            panic!("candidate should be scored");
        };
        assert_eq!(candidate.sub_scores.distance, 30.0);
        assert_eq!(candidate.sub_scores.availability, 25.0);
        assert_eq!(candidate.sub_scores.skill, 20.0);
        assert_eq!(candidate.sub_scores.workload, 9.0);
        assert_eq!(candidate.total_score, 96.6);
        assert!(!candidate.excluded);
        assert!(matches!(candidate.distance_basis, DistanceBasis::Geo { .. }));
        assert_eq!(candidate.workload_basis, WorkloadBasis::Live { active: 1 });
    }

    #[test]
    fn test_blocked_candidate_is_excluded() {
        let booking = create_test_booking();
        let slots = vec![
            slot(SlotKind::Recurring, SlotDay::Weekly(Weekday::Mon)),
            slot(SlotKind::Blocked, SlotDay::Date(booking.scheduled_date)),
        ];
        let evaluation = evaluate_candidate(&create_test_provider(), &booking, &slots, Ok(0));

        match evaluation {
            CandidateEvaluation::Excluded(exclusion) => {
                assert_eq!(exclusion.provider_id, Uuid::from_u128(42));
                assert!(matches!(exclusion.reason, ExclusionReason::Blocked { .. }));
            }
            CandidateEvaluation::Scored(_) => panic!("blocked provider must not be scored"),
        }
    }

    #[test]
    fn test_total_never_exceeds_one_hundred() {
        let mut provider = create_test_provider();
        provider.average_rating = Some(5.0);
        provider.total_jobs = 500;
        let slots = vec![slot(SlotKind::Recurring, SlotDay::Weekly(Weekday::Mon))];

        let CandidateEvaluation::Scored(candidate) =
            evaluate_candidate(&provider, &create_test_booking(), &slots, Ok(0))
        else {
            panic!("candidate should be scored");
        };
        assert_eq!(candidate.total_score, 100.0);
    }
}
