#![allow(dead_code)]

use chrono::{DateTime, NaiveDate, TimeZone, Utc};

use budget_planner::{BudgetLimit, Clock, Expense, RecurrenceRule};

/// Deterministic clock pinned to a fixed instant.
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

pub fn instant(y: i32, m: u32, d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn weekly_limit(category: &str, spent: f64, last_reset: DateTime<Utc>) -> BudgetLimit {
    let mut limit = BudgetLimit::new(category, date(2025, 8, 1), 100.0);
    limit.recurrence_days = Some(7);
    limit.last_reset = Some(last_reset);
    limit.amount_spent = spent;
    limit
}

pub fn monthly_expense(description: &str, amount: f64, start: NaiveDate) -> Expense {
    Expense::new(description, amount, start, "Recurring")
        .with_recurrence(RecurrenceRule::Monthly)
}
