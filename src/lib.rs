#![doc(test(attr(deny(warnings))))]

//! Budget Planner offers the core of a personal budget tracker: expense and
//! budget-limit records, a single recurrence model shared by every caller,
//! and the periodic reconciliation passes that roll spending cycles over and
//! materialize recurring expenses.

pub mod config;
pub mod domain;
pub mod engine;
pub mod errors;
pub mod reconciler;
pub mod services;
pub mod storage;
pub mod time;
pub mod utils;

use std::sync::Once;

pub use domain::{BudgetLimit, Expense, RecurrenceRule};
pub use errors::PlannerError;
pub use reconciler::{PeriodicReconciler, Scheduler, ThreadScheduler};
pub use storage::Storage;
pub use time::{Clock, SystemClock};

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Budget Planner tracing initialized.");
    });
}
