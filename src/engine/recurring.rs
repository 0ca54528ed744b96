//! Recurring expense expansion: materializes the next due instance of a
//! recurring expense, one step per pass.

use chrono::NaiveDate;

use crate::domain::Expense;

/// Decides whether `source` is due for another materialized instance and
/// returns it if so.
///
/// The candidate date is one calendar-correct rule step past `source.date`
/// (true month increments for `Monthly`). Only one step is taken per pass;
/// a source several periods behind catches up across successive passes,
/// bounding work per run.
///
/// Deduplication checks `all_expenses` for a record with the same
/// description, date, and amount. That triple is a best-effort idempotence
/// guard, not a strong key: two legitimately distinct expenses that coincide
/// on all three fields will collide.
pub fn materialize_next(
    source: &Expense,
    all_expenses: &[Expense],
    today: NaiveDate,
) -> Option<Expense> {
    let rule = source.recurrence?;
    let next_date = rule.next_date(source.date);
    if next_date > today {
        return None;
    }
    let duplicate = all_expenses.iter().any(|existing| {
        existing.description == source.description
            && existing.date == next_date
            && existing.amount == source.amount
    });
    if duplicate {
        return None;
    }
    Some(source.materialize(next_date))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RecurrenceRule;

    fn monthly_rent() -> Expense {
        Expense::new(
            "Rent",
            1500.0,
            NaiveDate::from_ymd_opt(2025, 1, 15).unwrap(),
            "Housing",
        )
        .with_recurrence(RecurrenceRule::Monthly)
    }

    #[test]
    fn due_monthly_expense_materializes_one_calendar_month_later() {
        let source = monthly_rent();
        let today = NaiveDate::from_ymd_opt(2025, 2, 16).unwrap();
        let instance = materialize_next(&source, &[source.clone()], today).unwrap();
        assert_eq!(instance.date, NaiveDate::from_ymd_opt(2025, 2, 15).unwrap());
        assert_eq!(instance.description, "Rent");
        assert_eq!(instance.amount, 1500.0);
        assert_eq!(instance.recurrence, Some(RecurrenceRule::Monthly));
        assert_ne!(instance.id, source.id);
    }

    #[test]
    fn existing_instance_suppresses_rematerialization() {
        let source = monthly_rent();
        let today = NaiveDate::from_ymd_opt(2025, 2, 16).unwrap();
        let first = materialize_next(&source, &[source.clone()], today).unwrap();
        let all = vec![source.clone(), first];
        assert!(materialize_next(&source, &all, today).is_none());
    }

    #[test]
    fn not_yet_due_expense_is_skipped() {
        let source = monthly_rent();
        let today = NaiveDate::from_ymd_opt(2025, 2, 14).unwrap();
        assert!(materialize_next(&source, &[source.clone()], today).is_none());
    }

    #[test]
    fn standalone_expense_never_expands() {
        let source = Expense::new(
            "One-off",
            20.0,
            NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            "Misc",
        );
        let today = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        assert!(materialize_next(&source, &[source.clone()], today).is_none());
    }

    #[test]
    fn only_one_step_per_pass_even_when_far_behind() {
        let source = Expense::new(
            "Gym",
            40.0,
            NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            "Health",
        )
        .with_recurrence(RecurrenceRule::Weekly);
        let today = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        let instance = materialize_next(&source, &[source.clone()], today).unwrap();
        // One week past the origin, not caught all the way up to today.
        assert_eq!(instance.date, NaiveDate::from_ymd_opt(2025, 1, 8).unwrap());
    }
}
