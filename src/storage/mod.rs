pub mod json_backend;
pub mod memory;

use chrono::NaiveDate;
use uuid::Uuid;

use crate::{
    domain::{BudgetLimit, Expense},
    errors::PlannerError,
};

pub type Result<T> = std::result::Result<T, PlannerError>;

/// Abstraction over persistence backends holding the two aggregates.
///
/// `upsert_budget_limit` replaces any record sharing the natural key
/// (`category`, `month_year`), so at most one limit exists per pair. The
/// store's own write serialization is the only synchronization between the
/// background reconciliation loops and foreground callers; last writer wins
/// on a record.
pub trait Storage: Send + Sync {
    fn list_expenses(&self) -> Result<Vec<Expense>>;
    fn insert_expense(&self, expense: &Expense) -> Result<()>;
    fn update_expense(&self, expense: &Expense) -> Result<()>;
    fn delete_expense(&self, id: Uuid) -> Result<()>;

    /// Lists budget limits, optionally filtered to one calendar month.
    fn list_budget_limits(&self, month: Option<NaiveDate>) -> Result<Vec<BudgetLimit>>;
    fn upsert_budget_limit(&self, limit: &BudgetLimit) -> Result<BudgetLimit>;
    fn delete_budget_limit(&self, id: Uuid) -> Result<()>;
}

pub use json_backend::JsonStorage;
pub use memory::MemoryStorage;
