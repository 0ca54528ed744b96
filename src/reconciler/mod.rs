//! Periodic reconciliation: the two timer-driven passes that roll budget
//! cycles over and materialize recurring expenses.

pub mod scheduler;

use std::sync::Arc;

use crate::{
    config::Config,
    engine::{budget_cycle, recurring},
    errors::PlannerError,
    storage::Storage,
    time::Clock,
};

pub use scheduler::{Scheduler, ThreadScheduler};

/// Summary of one budget cycle pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CyclePassSummary {
    pub examined: usize,
    pub updated: usize,
    pub resets: usize,
}

/// Summary of one recurring expense expansion pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExpansionPassSummary {
    pub examined: usize,
    pub created: usize,
}

/// Drives the two reconciliation passes against a storage collaborator.
///
/// Both passes are also plain methods invokable on demand. Mutations are
/// persisted record by record, so a storage failure aborts the remainder of
/// a pass while everything already written stays reconciled; the failure is
/// logged by the scheduled wrapper and the loop resumes on its next tick.
pub struct PeriodicReconciler {
    storage: Arc<dyn Storage>,
    clock: Arc<dyn Clock>,
}

impl PeriodicReconciler {
    pub fn new(storage: Arc<dyn Storage>, clock: Arc<dyn Clock>) -> Self {
        Self { storage, clock }
    }

    /// Runs one budget cycle pass over every stored limit.
    pub fn reconcile_budget_cycles(&self) -> Result<CyclePassSummary, PlannerError> {
        let now = self.clock.now();
        let limits = self.storage.list_budget_limits(None)?;
        let mut summary = CyclePassSummary {
            examined: limits.len(),
            ..Default::default()
        };
        for limit in &limits {
            let outcome = budget_cycle::reconcile(limit, now);
            if !outcome.changed {
                continue;
            }
            self.storage.upsert_budget_limit(&outcome.limit)?;
            summary.updated += 1;
            if outcome.reset {
                summary.resets += 1;
                tracing::info!(
                    category = %outcome.limit.category,
                    month = %outcome.limit.month_year,
                    "budget cycle reset"
                );
            }
        }
        Ok(summary)
    }

    /// Runs one expansion pass over every recurring expense, materializing at
    /// most one new instance per source.
    pub fn expand_recurring_expenses(&self) -> Result<ExpansionPassSummary, PlannerError> {
        let today = self.clock.today();
        let expenses = self.storage.list_expenses()?;
        let mut summary = ExpansionPassSummary::default();
        let mut created: Vec<crate::domain::Expense> = Vec::new();

        for source in expenses.iter().filter(|e| e.is_recurring()) {
            summary.examined += 1;
            let Some(instance) = recurring::materialize_next(source, &expenses, today) else {
                continue;
            };
            // Two sources can be due for an identical (description, date,
            // amount) triple within the same pass; only the first survives.
            let batch_duplicate = created.iter().any(|e| {
                e.description == instance.description
                    && e.date == instance.date
                    && e.amount == instance.amount
            });
            if batch_duplicate {
                continue;
            }
            self.storage.insert_expense(&instance)?;
            tracing::info!(
                description = %instance.description,
                date = %instance.date,
                "materialized recurring expense"
            );
            created.push(instance);
        }

        summary.created = created.len();
        Ok(summary)
    }

    /// Registers both passes with the scheduler on their own cadences. Each
    /// wake's failures are logged and do not terminate the loop.
    pub fn spawn(self: &Arc<Self>, scheduler: &dyn Scheduler, config: &Config) {
        let worker = Arc::clone(self);
        scheduler.schedule(
            config.budget_cycle_interval(),
            Box::new(move || match worker.reconcile_budget_cycles() {
                Ok(summary) => tracing::info!(
                    examined = summary.examined,
                    updated = summary.updated,
                    resets = summary.resets,
                    "budget cycle pass finished"
                ),
                Err(err) => tracing::error!(error = %err, "budget cycle pass failed"),
            }),
        );

        let worker = Arc::clone(self);
        scheduler.schedule(
            config.expense_expansion_interval(),
            Box::new(move || match worker.expand_recurring_expenses() {
                Ok(summary) => tracing::info!(
                    examined = summary.examined,
                    created = summary.created,
                    "recurring expense pass finished"
                ),
                Err(err) => tracing::error!(error = %err, "recurring expense pass failed"),
            }),
        );
    }
}

/// Convenience for tests and admin tooling: run both passes once, back to
/// back, against the same storage.
pub fn run_once(reconciler: &PeriodicReconciler) -> Result<(), PlannerError> {
    reconciler.reconcile_budget_cycles()?;
    reconciler.expand_recurring_expenses()?;
    Ok(())
}
