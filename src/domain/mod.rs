pub mod budget_limit;
pub mod expense;
pub mod recurrence;

pub use budget_limit::BudgetLimit;
pub use expense::Expense;
pub use recurrence::{next_occurrence, RecurrenceRule};
