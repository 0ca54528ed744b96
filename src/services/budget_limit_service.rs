use chrono::NaiveDate;
use uuid::Uuid;

use crate::{
    domain::{BudgetLimit, RecurrenceRule},
    engine::budget_cycle,
    errors::PlannerError,
    storage::Storage,
    time::Clock,
};

use super::ServiceResult;

/// Largest accepted custom reset cadence, in days (ten years).
const MAX_RECURRENCE_DAYS: i64 = 3650;

/// User input for creating or replacing a category's limit for one month.
#[derive(Debug, Clone)]
pub struct SetLimitRequest {
    pub category: String,
    /// Month specifier, `YYYY-MM`.
    pub month: String,
    pub limit_amount: f64,
    pub reset_frequency: Option<RecurrenceRule>,
    pub recurrence_days: Option<i64>,
}

pub struct BudgetLimitService;

impl BudgetLimitService {
    /// Creates or updates the limit for (`category`, month): upsert on the
    /// natural key. An existing record keeps its accumulator fields
    /// (`amount_spent`, `used_percentage`, `last_reset`); only the
    /// user-settable fields are replaced. A never-observed limit anchors its
    /// cycle at the current instant.
    pub fn set_limit(
        storage: &dyn Storage,
        clock: &dyn Clock,
        request: &SetLimitRequest,
    ) -> ServiceResult<BudgetLimit> {
        let category = request.category.trim();
        if category.is_empty() {
            return Err(PlannerError::Validation("category is required".into()));
        }
        if !request.limit_amount.is_finite() || request.limit_amount < 0.0 {
            return Err(PlannerError::Validation(
                "limit amount must be a non-negative number".into(),
            ));
        }
        if let Some(days) = request.recurrence_days {
            if !(1..=MAX_RECURRENCE_DAYS).contains(&days) {
                return Err(PlannerError::Validation(format!(
                    "reset cadence must be between 1 and {} days",
                    MAX_RECURRENCE_DAYS
                )));
            }
        }
        let month = parse_month(&request.month)?;
        let now = clock.now();

        let mut limit = BudgetLimit::new(category, month, request.limit_amount);
        limit.reset_frequency = request.reset_frequency;
        limit.recurrence_days = request.recurrence_days;

        let existing = storage
            .list_budget_limits(Some(month))?
            .into_iter()
            .find(|l| l.category == category);
        if let Some(existing) = existing {
            limit.id = existing.id;
            limit.amount_spent = existing.amount_spent;
            limit.used_percentage = existing.used_percentage;
            limit.last_reset = existing.last_reset;
        }
        if limit.last_reset.is_none() {
            limit.last_reset = Some(now);
        }
        limit.recompute_usage();
        limit.next_reset = budget_cycle::project_next_reset(&limit, now);

        Ok(storage.upsert_budget_limit(&limit)?)
    }

    /// Returns the limits covering one month with `next_reset` computed on
    /// the fly for display; nothing is persisted.
    pub fn limits_for_month(
        storage: &dyn Storage,
        clock: &dyn Clock,
        month: &str,
    ) -> ServiceResult<Vec<BudgetLimit>> {
        let month = parse_month(month)?;
        let now = clock.now();
        let mut limits = storage.list_budget_limits(Some(month))?;
        for limit in &mut limits {
            limit.next_reset = budget_cycle::project_next_reset(limit, now);
        }
        Ok(limits)
    }

    pub fn delete(storage: &dyn Storage, id: Uuid) -> ServiceResult<()> {
        storage.delete_budget_limit(id)?;
        Ok(())
    }
}

/// Parses a `YYYY-MM` month specifier to the first of that month.
pub fn parse_month(spec: &str) -> ServiceResult<NaiveDate> {
    NaiveDate::parse_from_str(&format!("{}-01", spec.trim()), "%Y-%m-%d").map_err(|_| {
        PlannerError::Validation(format!(
            "invalid month specifier `{}`, expected YYYY-MM",
            spec
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_month_accepts_year_dash_month() {
        assert_eq!(
            parse_month("2025-08").unwrap(),
            NaiveDate::from_ymd_opt(2025, 8, 1).unwrap()
        );
    }

    #[test]
    fn parse_month_rejects_garbage() {
        assert!(matches!(
            parse_month("August 2025"),
            Err(PlannerError::Validation(_))
        ));
        assert!(matches!(
            parse_month("2025-13"),
            Err(PlannerError::Validation(_))
        ));
    }
}
