use chrono::{NaiveDate, NaiveTime};
use crate::models::{AvailabilityOutcome, AvailabilityScore, AvailabilitySlot, SlotKind};

pub const RECURRING_MATCH_POINTS: f64 = 25.0;
pub const ONE_TIME_MATCH_POINTS: f64 = 20.0;
/// Benefit of the doubt for providers who never configured a schedule
pub const UNCONFIGURED_POINTS: f64 = 15.0;
pub const NO_MATCH_POINTS: f64 = 0.0;

/// Score how well a provider's schedule fits the requested date and time.
///
/// Rules in precedence order:
/// 1. a BLOCKED slot covering the request excludes the provider
/// 2. a matching RECURRING slot scores 25
/// 3. a matching ONE_TIME slot scores 20
/// 4. no slots at all scores 15
/// 5. otherwise 0, still rankable
pub fn score_availability(
    slots: &[AvailabilitySlot],
    date: NaiveDate,
    time: NaiveTime,
) -> AvailabilityScore {
    let covering = |kind: SlotKind| {
        slots
            .iter()
            .find(|slot| slot.kind == kind && slot.covers(date, time))
    };

    if let Some(blocked) = covering(SlotKind::Blocked) {
        return AvailabilityScore {
            points: NO_MATCH_POINTS,
            outcome: AvailabilityOutcome::Blocked { window: blocked.window },
        };
    }

    let (points, outcome) = if covering(SlotKind::Recurring).is_some() {
        (RECURRING_MATCH_POINTS, AvailabilityOutcome::Recurring)
    } else if covering(SlotKind::OneTime).is_some() {
        (ONE_TIME_MATCH_POINTS, AvailabilityOutcome::OneTime)
    } else if slots.is_empty() {
        (UNCONFIGURED_POINTS, AvailabilityOutcome::Unconfigured)
    } else {
        (NO_MATCH_POINTS, AvailabilityOutcome::NoMatch)
    };

    AvailabilityScore { points, outcome }
}
