mod common;

use budget_planner::domain::{next_occurrence, RecurrenceRule};
use budget_planner::PlannerError;
use chrono::Duration;
use common::{date, instant};

#[test]
fn next_occurrence_steps_in_whole_multiples_from_anchor() {
    let anchor = instant(2025, 1, 1);
    for (step, now) in [(7, instant(2025, 2, 20)), (14, instant(2025, 6, 1)), (30, instant(2025, 1, 5))] {
        let next = next_occurrence(anchor, step, now).unwrap();
        assert!(next > now, "step {} must land after now", step);
        assert_eq!((next - anchor).num_days() % step, 0);
        assert!(next - anchor >= Duration::days(step));
    }
}

#[test]
fn next_occurrence_immediately_after_anchor_is_one_step_out() {
    let anchor = instant(2025, 8, 1);
    let next = next_occurrence(anchor, 7, anchor).unwrap();
    assert_eq!(next, anchor + Duration::days(7));
}

#[test]
fn stale_anchor_beyond_catch_up_bound_is_degenerate() {
    let anchor = instant(1990, 1, 1);
    // Over 1000 weekly steps between anchor and now.
    let now = instant(2025, 8, 1);
    assert!(matches!(
        next_occurrence(anchor, 7, now),
        Err(PlannerError::DegenerateRecurrence(_))
    ));
}

#[test]
fn negative_step_is_degenerate() {
    let anchor = instant(2025, 1, 1);
    assert!(matches!(
        next_occurrence(anchor, -7, instant(2025, 1, 2)),
        Err(PlannerError::DegenerateRecurrence(_))
    ));
}

#[test]
fn fixed_day_steps_match_the_rule_table() {
    assert_eq!(RecurrenceRule::Weekly.step_days(), 7);
    assert_eq!(RecurrenceRule::Biweekly.step_days(), 14);
    assert_eq!(RecurrenceRule::Monthly.step_days(), 30);
}

#[test]
fn calendar_next_date_diverges_from_fixed_step_for_monthly() {
    // Jan 15 + 1 calendar month is Feb 15 (31 days), not Jan 15 + 30 days.
    let from = date(2025, 1, 15);
    assert_eq!(RecurrenceRule::Monthly.next_date(from), date(2025, 2, 15));
    assert_eq!(RecurrenceRule::Weekly.next_date(from), date(2025, 1, 22));
    assert_eq!(RecurrenceRule::Biweekly.next_date(from), date(2025, 1, 29));
}

#[test]
fn monthly_next_date_handles_month_end() {
    assert_eq!(
        RecurrenceRule::Monthly.next_date(date(2025, 3, 31)),
        date(2025, 4, 30)
    );
    assert_eq!(
        RecurrenceRule::Monthly.next_date(date(2024, 1, 31)),
        date(2024, 2, 29)
    );
}
