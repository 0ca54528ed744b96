use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::recurrence::RecurrenceRule;

/// A per-category spending guardrail for one calendar month.
///
/// The natural key is (`category`, `month_year`); writes go through upsert so
/// at most one record exists per pair. `amount_spent` accumulates within the
/// current cycle and `used_percentage` is a derived read cache, recomputed
/// from `amount_spent` and `limit_amount` on every reconciliation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BudgetLimit {
    pub id: Uuid,
    pub category: String,
    /// Calendar month this limit applies to, truncated to the first.
    pub month_year: NaiveDate,
    pub limit_amount: f64,
    /// Legacy reset cadence, superseded by `recurrence_days` when that is
    /// set to a positive value.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub reset_frequency: Option<RecurrenceRule>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub recurrence_days: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub last_reset: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub next_reset: Option<DateTime<Utc>>,
    #[serde(default)]
    pub amount_spent: f64,
    #[serde(default)]
    pub used_percentage: f64,
}

impl BudgetLimit {
    pub fn new(category: impl Into<String>, month_year: NaiveDate, limit_amount: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            category: category.into(),
            month_year: truncate_to_month(month_year),
            limit_amount,
            reset_frequency: None,
            recurrence_days: None,
            last_reset: None,
            next_reset: None,
            amount_spent: 0.0,
            used_percentage: 0.0,
        }
    }

    /// Resolves the reset step in days: explicit `recurrence_days` when
    /// positive, otherwise the legacy frequency, otherwise no reset ever.
    pub fn reset_step_days(&self) -> Option<i64> {
        match self.recurrence_days {
            Some(days) if days > 0 => Some(days),
            _ => self.reset_frequency.map(|rule| rule.step_days()),
        }
    }

    /// Recomputes the usage cache from the accumulator and the limit. A zero
    /// limit always reads as 0% used.
    pub fn recompute_usage(&mut self) {
        self.used_percentage = if self.limit_amount > 0.0 {
            self.amount_spent / self.limit_amount * 100.0
        } else {
            0.0
        };
    }

    /// True when this limit covers the same calendar month as `month`.
    pub fn covers_month(&self, month: NaiveDate) -> bool {
        self.month_year == truncate_to_month(month)
    }
}

/// Truncates a date to the first of its calendar month.
pub fn truncate_to_month(date: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(date.year(), date.month(), 1).unwrap_or(date)
}
