use thiserror::Error;
use uuid::Uuid;

/// Error type that captures common planner failures.
#[derive(Debug, Error)]
pub enum PlannerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("Degenerate recurrence: {0}")]
    DegenerateRecurrence(String),
    #[error("Expense not found: {0}")]
    ExpenseNotFound(Uuid),
    #[error("Budget limit not found: {0}")]
    LimitNotFound(Uuid),
}
