use chrono::NaiveDate;
use uuid::Uuid;

use crate::{
    domain::{Expense, RecurrenceRule},
    errors::PlannerError,
    storage::Storage,
};

use super::ServiceResult;

pub struct ExpenseService;

impl ExpenseService {
    /// Records a new expense after validating the user-supplied fields.
    pub fn add(
        storage: &dyn Storage,
        description: &str,
        amount: f64,
        date: NaiveDate,
        category: &str,
        recurrence: Option<RecurrenceRule>,
    ) -> ServiceResult<Expense> {
        validate_fields(description, amount, category)?;
        let mut expense = Expense::new(description.trim(), amount, date, category.trim());
        expense.recurrence = recurrence;
        storage.insert_expense(&expense)?;
        Ok(expense)
    }

    /// Explicit edit of an existing expense; the only mutation path besides
    /// materialization.
    pub fn update(storage: &dyn Storage, expense: &Expense) -> ServiceResult<()> {
        validate_fields(&expense.description, expense.amount, &expense.category)?;
        storage.update_expense(expense)?;
        Ok(())
    }

    pub fn delete(storage: &dyn Storage, id: Uuid) -> ServiceResult<()> {
        storage.delete_expense(id)?;
        Ok(())
    }

    pub fn list(storage: &dyn Storage) -> ServiceResult<Vec<Expense>> {
        Ok(storage.list_expenses()?)
    }
}

fn validate_fields(description: &str, amount: f64, category: &str) -> ServiceResult<()> {
    if description.trim().is_empty() {
        return Err(PlannerError::Validation("description is required".into()));
    }
    if category.trim().is_empty() {
        return Err(PlannerError::Validation("category is required".into()));
    }
    if !amount.is_finite() || amount < 0.0 {
        return Err(PlannerError::Validation(
            "amount must be a non-negative number".into(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    #[test]
    fn add_rejects_missing_category() {
        let storage = MemoryStorage::new();
        let result = ExpenseService::add(
            &storage,
            "Lunch",
            12.5,
            NaiveDate::from_ymd_opt(2025, 8, 1).unwrap(),
            "  ",
            None,
        );
        assert!(matches!(result, Err(PlannerError::Validation(_))));
    }

    #[test]
    fn add_rejects_negative_amount() {
        let storage = MemoryStorage::new();
        let result = ExpenseService::add(
            &storage,
            "Refund",
            -3.0,
            NaiveDate::from_ymd_opt(2025, 8, 1).unwrap(),
            "Misc",
            None,
        );
        assert!(matches!(result, Err(PlannerError::Validation(_))));
    }

    #[test]
    fn add_persists_trimmed_record() {
        let storage = MemoryStorage::new();
        let expense = ExpenseService::add(
            &storage,
            " Lunch ",
            12.5,
            NaiveDate::from_ymd_opt(2025, 8, 1).unwrap(),
            " Dining ",
            Some(RecurrenceRule::Weekly),
        )
        .unwrap();
        assert_eq!(expense.description, "Lunch");
        assert_eq!(expense.category, "Dining");
        assert!(expense.is_recurring());
        assert_eq!(ExpenseService::list(&storage).unwrap().len(), 1);
    }
}
