//! Command/query boundary. Validation lives here; the engines assume
//! pre-validated input.

pub mod budget_limit_service;
pub mod expense_service;
pub mod summary_service;

pub use budget_limit_service::{BudgetLimitService, SetLimitRequest};
pub use expense_service::ExpenseService;
pub use summary_service::{CategorySpending, SummaryService};

use crate::errors::PlannerError;

pub type ServiceResult<T> = Result<T, PlannerError>;
