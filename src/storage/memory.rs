use std::sync::Mutex;

use chrono::NaiveDate;
use uuid::Uuid;

use crate::{
    domain::{budget_limit::truncate_to_month, BudgetLimit, Expense},
    errors::PlannerError,
};

use super::{Result, Storage};

/// In-memory backend for tests and embedding.
#[derive(Default)]
pub struct MemoryStorage {
    state: Mutex<State>,
}

#[derive(Default)]
struct State {
    expenses: Vec<Expense>,
    limits: Vec<BudgetLimit>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the store with initial records.
    pub fn with_records(expenses: Vec<Expense>, limits: Vec<BudgetLimit>) -> Self {
        Self {
            state: Mutex::new(State { expenses, limits }),
        }
    }
}

impl Storage for MemoryStorage {
    fn list_expenses(&self) -> Result<Vec<Expense>> {
        Ok(self.state.lock().unwrap().expenses.clone())
    }

    fn insert_expense(&self, expense: &Expense) -> Result<()> {
        self.state.lock().unwrap().expenses.push(expense.clone());
        Ok(())
    }

    fn update_expense(&self, expense: &Expense) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        match state.expenses.iter_mut().find(|e| e.id == expense.id) {
            Some(existing) => {
                *existing = expense.clone();
                Ok(())
            }
            None => Err(PlannerError::ExpenseNotFound(expense.id)),
        }
    }

    fn delete_expense(&self, id: Uuid) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        let before = state.expenses.len();
        state.expenses.retain(|e| e.id != id);
        if state.expenses.len() == before {
            return Err(PlannerError::ExpenseNotFound(id));
        }
        Ok(())
    }

    fn list_budget_limits(&self, month: Option<NaiveDate>) -> Result<Vec<BudgetLimit>> {
        let state = self.state.lock().unwrap();
        Ok(match month {
            Some(month) => {
                let key = truncate_to_month(month);
                state
                    .limits
                    .iter()
                    .filter(|l| l.month_year == key)
                    .cloned()
                    .collect()
            }
            None => state.limits.clone(),
        })
    }

    fn upsert_budget_limit(&self, limit: &BudgetLimit) -> Result<BudgetLimit> {
        let mut state = self.state.lock().unwrap();
        match state
            .limits
            .iter_mut()
            .find(|l| l.category == limit.category && l.month_year == limit.month_year)
        {
            Some(existing) => {
                let mut replacement = limit.clone();
                replacement.id = existing.id;
                *existing = replacement.clone();
                Ok(replacement)
            }
            None => {
                state.limits.push(limit.clone());
                Ok(limit.clone())
            }
        }
    }

    fn delete_budget_limit(&self, id: Uuid) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        let before = state.limits.len();
        state.limits.retain(|l| l.id != id);
        if state.limits.len() == before {
            return Err(PlannerError::LimitNotFound(id));
        }
        Ok(())
    }
}
