use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::recurrence::RecurrenceRule;

/// A single recorded expense. When `recurrence` is set the record doubles as
/// the origin of a recurring series; when absent it is a standalone record
/// that is never expanded.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Expense {
    pub id: Uuid,
    pub description: String,
    pub amount: f64,
    pub date: NaiveDate,
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub recurrence: Option<RecurrenceRule>,
}

impl Expense {
    pub fn new(
        description: impl Into<String>,
        amount: f64,
        date: NaiveDate,
        category: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            description: description.into(),
            amount,
            date,
            category: category.into(),
            recurrence: None,
        }
    }

    pub fn with_recurrence(mut self, rule: RecurrenceRule) -> Self {
        self.recurrence = Some(rule);
        self
    }

    pub fn is_recurring(&self) -> bool {
        self.recurrence.is_some()
    }

    /// Builds the materialized instance for one occurrence of this expense,
    /// carrying the same description, amount, category, and recurrence rule
    /// under a fresh id scheduled for `date`.
    pub fn materialize(&self, date: NaiveDate) -> Expense {
        Expense {
            id: Uuid::new_v4(),
            description: self.description.clone(),
            amount: self.amount,
            date,
            category: self.category.clone(),
            recurrence: self.recurrence,
        }
    }
}
