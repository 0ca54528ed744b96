use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::{
    domain::{budget_limit::truncate_to_month, BudgetLimit, Expense},
    storage::Storage,
};

use super::ServiceResult;

/// Fraction of the limit at which the presentation layer starts warning.
const NEAR_LIMIT_RATIO: f64 = 0.9;

/// Aggregated spending for one category in one month, with its limit when
/// one is defined.
#[derive(Debug, Clone, PartialEq)]
pub struct CategorySpending {
    pub category: String,
    pub total: f64,
    pub limit_amount: Option<f64>,
    /// True when spending has reached 90% of the configured limit.
    pub near_limit: bool,
}

pub struct SummaryService;

impl SummaryService {
    /// Per-category totals for the given month, correlated with that month's
    /// limits by category name. Read-only over both aggregates.
    pub fn monthly_category_spending(
        storage: &dyn Storage,
        month: NaiveDate,
    ) -> ServiceResult<Vec<CategorySpending>> {
        let month = truncate_to_month(month);
        let expenses = storage.list_expenses()?;
        let limits = storage.list_budget_limits(Some(month))?;
        Ok(summarize(&expenses, &limits, month))
    }
}

fn summarize(
    expenses: &[Expense],
    limits: &[BudgetLimit],
    month: NaiveDate,
) -> Vec<CategorySpending> {
    let mut totals: BTreeMap<&str, f64> = BTreeMap::new();
    for expense in expenses {
        if truncate_to_month(expense.date) != month {
            continue;
        }
        *totals.entry(expense.category.as_str()).or_insert(0.0) += expense.amount;
    }

    let mut rows: Vec<CategorySpending> = totals
        .into_iter()
        .map(|(category, total)| {
            let limit_amount = limits
                .iter()
                .find(|l| l.category == category)
                .map(|l| l.limit_amount);
            let near_limit = matches!(limit_amount, Some(limit) if limit > 0.0 && total >= limit * NEAR_LIMIT_RATIO);
            CategorySpending {
                category: category.to_string(),
                total,
                limit_amount,
                near_limit,
            }
        })
        .collect();

    // Limits with no spending yet still show up at zero.
    for limit in limits {
        if rows.iter().all(|row| row.category != limit.category) {
            rows.push(CategorySpending {
                category: limit.category.clone(),
                total: 0.0,
                limit_amount: Some(limit.limit_amount),
                near_limit: false,
            });
        }
    }
    rows.sort_by(|a, b| a.category.cmp(&b.category));
    rows
}
