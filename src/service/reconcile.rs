use chrono::{DateTime, Duration, Utc};

use crate::model::employee::ContractWindow;
use crate::model::work_record::Annotation;
use crate::service::clock::{LocalClock, duration_hours, round_to_half_hour};

/// Leaving up to this much before the shift end still pays the full shift.
const EARLY_GRACE: i64 = 5;
/// Staying at least this long past the shift end flags the record as overage.
const OVERAGE: i64 = 30;

/// Billable outcome of one closed shift.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShiftOutcome {
    pub total_hours: f64,
    pub annotation: Annotation,
    /// Set when the clock-out preceded the shift base and the raw duration
    /// was clamped to zero. Informational; never an error.
    pub clamped: bool,
}

impl ShiftOutcome {
    fn full(contract_hours: f64, annotation: Annotation) -> Self {
        Self {
            total_hours: contract_hours,
            annotation,
            clamped: false,
        }
    }
}

/// Reconciles an observed clock-in/clock-out pair against the contract
/// window on the clock-in's local calendar date.
///
/// The cases are ordered; the first matching row wins. Every case except the
/// final early-departure fallback pays the full contracted duration, so minor
/// early departure (within grace) and any amount of overstay never reduce
/// pay. Only a materially early departure bills actual worked time, rounded
/// to the half hour.
pub fn reconcile_shift(
    clock: &LocalClock,
    clock_in: DateTime<Utc>,
    clock_out: DateTime<Utc>,
    window: &ContractWindow,
) -> ShiftOutcome {
    let date = clock.local_date(clock_in);
    let contract_start = clock.instant_at(date, window.start);
    let contract_end = clock.instant_at(date, window.end);

    let contract = contract_end - contract_start;
    let contract_hours = duration_hours(contract).max(0.0);

    let late = clock_in > contract_start;
    // Contractual duration measured from the actual arrival, used when late.
    let expected_end = clock_in + contract;

    let grace = Duration::minutes(EARLY_GRACE);
    let overage = Duration::minutes(OVERAGE);

    if !late {
        if clock_out >= contract_end + overage {
            return ShiftOutcome::full(contract_hours, Annotation::OnTimeOverage);
        }
        if clock_out >= contract_end {
            return ShiftOutcome::full(contract_hours, Annotation::OnTime);
        }
        if clock_out >= contract_end - grace {
            return ShiftOutcome::full(contract_hours, Annotation::EarlyGrace);
        }
    } else {
        if clock_out >= expected_end + overage {
            return ShiftOutcome::full(contract_hours, Annotation::LateOverage);
        }
        if clock_out >= expected_end {
            return ShiftOutcome::full(contract_hours, Annotation::Late);
        }
        if clock_out >= expected_end - grace {
            return ShiftOutcome::full(contract_hours, Annotation::EarlyGrace);
        }
    }

    // Genuinely early departure: bill actual time from the later of arrival
    // and contract start, clamping a negative duration to zero instead of
    // failing the clock-out.
    let base = clock_in.max(contract_start);
    let raw_hours = duration_hours(clock_out - base);
    let clamped = raw_hours < 0.0;

    ShiftOutcome {
        total_hours: round_to_half_hour(raw_hours.max(0.0)),
        annotation: Annotation::EarlyDeparture,
        clamped,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};

    fn clock() -> LocalClock {
        LocalClock::from_east_hours(9).unwrap()
    }

    fn window() -> ContractWindow {
        ContractWindow {
            start: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            end: NaiveTime::from_hms_opt(17, 0, 0).unwrap(),
        }
    }

    /// Local wall-clock instant on the reference date (a Monday).
    fn at(hour: u32, min: u32) -> DateTime<Utc> {
        let date = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
        clock().instant_at(date, NaiveTime::from_hms_opt(hour, min, 0).unwrap())
    }

    fn reconcile(clock_in: DateTime<Utc>, clock_out: DateTime<Utc>) -> ShiftOutcome {
        reconcile_shift(&clock(), clock_in, clock_out, &window())
    }

    #[test]
    fn exact_contract_shift_is_on_time() {
        let outcome = reconcile(at(9, 0), at(17, 0));
        assert_eq!(outcome.total_hours, 8.0);
        assert_eq!(outcome.annotation, Annotation::OnTime);
    }

    #[test]
    fn early_arrival_with_small_overstay_is_on_time() {
        // 08:55 in, 17:10 out.
        let outcome = reconcile(at(8, 55), at(17, 10));
        assert_eq!(outcome.total_hours, 8.0);
        assert_eq!(outcome.annotation, Annotation::OnTime);
    }

    #[test]
    fn overstay_of_thirty_minutes_flags_overage() {
        let outcome = reconcile(at(9, 0), at(17, 30));
        assert_eq!(outcome.total_hours, 8.0);
        assert_eq!(outcome.annotation, Annotation::OnTimeOverage);

        // One minute short of the overage threshold stays plain on-time.
        let outcome = reconcile(at(9, 0), at(17, 29));
        assert_eq!(outcome.annotation, Annotation::OnTime);
    }

    #[test]
    fn late_arrival_served_in_full_is_late() {
        // 09:20 in shifts the expected end to 17:20.
        let outcome = reconcile(at(9, 20), at(17, 20));
        assert_eq!(outcome.total_hours, 8.0);
        assert_eq!(outcome.annotation, Annotation::Late);
    }

    #[test]
    fn late_arrival_with_long_overstay_is_late_overage() {
        // Expected end 17:20, overage threshold 17:50, out at 18:10.
        let outcome = reconcile(at(9, 20), at(18, 10));
        assert_eq!(outcome.total_hours, 8.0);
        assert_eq!(outcome.annotation, Annotation::LateOverage);
    }

    #[test]
    fn departure_within_grace_pays_in_full() {
        let outcome = reconcile(at(9, 0), at(16, 58));
        assert_eq!(outcome.total_hours, 8.0);
        assert_eq!(outcome.annotation, Annotation::EarlyGrace);

        // Grace is measured from the shifted end when the arrival was late.
        let outcome = reconcile(at(9, 20), at(17, 16));
        assert_eq!(outcome.total_hours, 8.0);
        assert_eq!(outcome.annotation, Annotation::EarlyGrace);
    }

    #[test]
    fn grace_lower_bound_is_inclusive() {
        let outcome = reconcile(at(9, 0), at(16, 55));
        assert_eq!(outcome.annotation, Annotation::EarlyGrace);

        let outcome = reconcile(at(9, 0), at(16, 54));
        assert_eq!(outcome.annotation, Annotation::EarlyDeparture);
    }

    #[test]
    fn material_early_departure_bills_worked_time() {
        // Two hours early: 6 raw hours, already on the half-hour grid.
        let outcome = reconcile(at(9, 0), at(15, 0));
        assert_eq!(outcome.total_hours, 6.0);
        assert_eq!(outcome.annotation, Annotation::EarlyDeparture);
        assert!(!outcome.clamped);
    }

    #[test]
    fn early_departure_counts_from_contract_start_when_early_in() {
        // Arrived 08:00 but the shift starts 09:00; only 09:00-12:10 bills.
        let outcome = reconcile(at(8, 0), at(12, 10));
        assert_eq!(outcome.total_hours, 3.0);
        assert_eq!(outcome.annotation, Annotation::EarlyDeparture);
    }

    #[test]
    fn early_departure_rounds_to_the_half_hour() {
        // 3h40m worked -> fraction 0.666.. -> 3.5.
        let outcome = reconcile(at(9, 0), at(12, 40));
        assert_eq!(outcome.total_hours, 3.5);
    }

    #[test]
    fn negative_duration_clamps_to_zero() {
        // Clocked out before the contract start.
        let outcome = reconcile(at(8, 0), at(8, 30));
        assert_eq!(outcome.total_hours, 0.0);
        assert_eq!(outcome.annotation, Annotation::EarlyDeparture);
        assert!(outcome.clamped);
    }

    #[test]
    fn total_hours_never_decrease_as_clock_out_grows() {
        let clock_in = at(9, 0);
        let mut previous = -1.0;
        for minutes in 0..=600 {
            let clock_out = clock_in + Duration::minutes(minutes);
            let outcome = reconcile(clock_in, clock_out);
            assert!(
                outcome.total_hours >= previous,
                "total dropped from {previous} at +{minutes}m"
            );
            previous = outcome.total_hours;
        }
    }
}
