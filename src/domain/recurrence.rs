use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::PlannerError;

/// Upper bound on catch-up iterations when projecting an occurrence forward
/// from a stale anchor. Exceeding it signals a degenerate recurrence instead
/// of looping without bound.
const MAX_CATCH_UP_STEPS: u32 = 1000;

/// How often a recurring expense repeats or a budget cycle resets.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum RecurrenceRule {
    Weekly,
    Biweekly,
    Monthly,
}

impl RecurrenceRule {
    /// Fixed-day step used for budget cycle arithmetic. `Monthly` is a
    /// 30-day approximation here, not a calendar month.
    pub fn step_days(&self) -> i64 {
        match self {
            RecurrenceRule::Weekly => 7,
            RecurrenceRule::Biweekly => 14,
            RecurrenceRule::Monthly => 30,
        }
    }

    /// Calendar-correct successor date used when materializing recurring
    /// expenses. `Monthly` advances by one true calendar month, clamping the
    /// day to the end of shorter months.
    pub fn next_date(&self, from: NaiveDate) -> NaiveDate {
        match self {
            RecurrenceRule::Weekly => from + Duration::days(7),
            RecurrenceRule::Biweekly => from + Duration::days(14),
            RecurrenceRule::Monthly => shift_month(from, 1),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RecurrenceRule::Weekly => "Weekly",
            RecurrenceRule::Biweekly => "Biweekly",
            RecurrenceRule::Monthly => "Monthly",
        }
    }
}

/// Projects the first occurrence strictly after `now`, stepping forward from
/// `anchor` in whole multiples of `step_days`.
///
/// The returned timestamp is always at least `anchor + step`. A non-positive
/// step, or an anchor so stale that the catch-up loop would exceed its
/// iteration bound, yields [`PlannerError::DegenerateRecurrence`]; callers
/// fall back to "no next occurrence".
pub fn next_occurrence(
    anchor: DateTime<Utc>,
    step_days: i64,
    now: DateTime<Utc>,
) -> Result<DateTime<Utc>, PlannerError> {
    if step_days <= 0 {
        return Err(PlannerError::DegenerateRecurrence(format!(
            "step of {} days is not positive",
            step_days
        )));
    }
    let step = Duration::try_days(step_days).ok_or_else(|| {
        PlannerError::DegenerateRecurrence(format!(
            "step of {} days is not representable",
            step_days
        ))
    })?;
    let overflow = || {
        PlannerError::DegenerateRecurrence(format!(
            "stepping {} days past anchor {} overflows the timestamp range",
            step_days, anchor
        ))
    };
    let mut candidate = anchor.checked_add_signed(step).ok_or_else(overflow)?;
    let mut iterations = 0u32;
    while candidate <= now {
        candidate = candidate.checked_add_signed(step).ok_or_else(overflow)?;
        iterations += 1;
        if iterations >= MAX_CATCH_UP_STEPS {
            return Err(PlannerError::DegenerateRecurrence(format!(
                "anchor {} exceeded {} catch-up steps of {} days",
                anchor, MAX_CATCH_UP_STEPS, step_days
            )));
        }
    }
    Ok(candidate)
}

fn shift_month(date: NaiveDate, months: i32) -> NaiveDate {
    let mut year = date.year();
    let mut month = date.month() as i32 + months;
    let mut day = date.day();
    while month > 12 {
        month -= 12;
        year += 1;
    }
    while month < 1 {
        month += 12;
        year -= 1;
    }
    day = day.min(days_in_month(year, month as u32));
    NaiveDate::from_ymd_opt(year, month as u32, day).unwrap()
}

fn days_in_month(year: i32, month: u32) -> u32 {
    let next_month = if month == 12 { 1 } else { month + 1 };
    let next_year = if month == 12 { year + 1 } else { year };
    let first_next = NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .unwrap_or_else(|| NaiveDate::from_ymd_opt(year, month, 28).unwrap());
    let last_current = first_next - Duration::days(1);
    last_current.day()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn monthly_next_date_clamps_to_shorter_months() {
        let jan31 = NaiveDate::from_ymd_opt(2025, 1, 31).unwrap();
        assert_eq!(
            RecurrenceRule::Monthly.next_date(jan31),
            NaiveDate::from_ymd_opt(2025, 2, 28).unwrap()
        );
    }

    #[test]
    fn monthly_next_date_crosses_year_boundary() {
        let dec15 = NaiveDate::from_ymd_opt(2024, 12, 15).unwrap();
        assert_eq!(
            RecurrenceRule::Monthly.next_date(dec15),
            NaiveDate::from_ymd_opt(2025, 1, 15).unwrap()
        );
    }

    #[test]
    fn next_occurrence_is_strictly_after_now() {
        let anchor = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let now = Utc.with_ymd_and_hms(2025, 3, 10, 12, 0, 0).unwrap();
        let next = next_occurrence(anchor, 7, now).unwrap();
        assert!(next > now);
        assert_eq!((next - anchor).num_days() % 7, 0);
    }

    #[test]
    fn unrepresentable_step_is_degenerate_not_a_panic() {
        let anchor = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let now = Utc.with_ymd_and_hms(2025, 8, 1, 0, 0, 0).unwrap();
        assert!(matches!(
            next_occurrence(anchor, i64::MAX, now),
            Err(PlannerError::DegenerateRecurrence(_))
        ));
    }

    #[test]
    fn step_past_the_timestamp_range_is_degenerate() {
        let anchor = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        // Representable as a Duration, but anchor + step leaves chrono's
        // supported date range.
        let step_days = 200_000_000;
        assert!(matches!(
            next_occurrence(anchor, step_days, anchor),
            Err(PlannerError::DegenerateRecurrence(_))
        ));
    }

    #[test]
    fn non_positive_step_is_degenerate() {
        let anchor = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        assert!(matches!(
            next_occurrence(anchor, 0, anchor),
            Err(PlannerError::DegenerateRecurrence(_))
        ));
    }
}
