//! Budget cycle reconciliation: decides when a limit's spending cycle rolls
//! over and keeps the usage cache honest.

use chrono::{DateTime, Utc};

use crate::domain::{next_occurrence, BudgetLimit};

/// Result of reconciling one budget limit at an instant.
#[derive(Debug, Clone)]
pub struct CycleOutcome {
    pub limit: BudgetLimit,
    /// True when the spending cycle rolled over this run.
    pub reset: bool,
    /// True when the record differs from its stored form and needs
    /// persistence.
    pub changed: bool,
}

/// Reconciles a budget limit against `now` without side effects; the caller
/// persists the returned record when `changed` is set.
///
/// An unset `last_reset` is initialized to `now` (first observation) without
/// triggering a reset. Once the elapsed time reaches the configured step the
/// accumulator zeroes and the anchor advances to `now`, which makes the
/// function idempotent within the same instant: a second call sees zero
/// elapsed time and changes nothing further.
pub fn reconcile(limit: &BudgetLimit, now: DateTime<Utc>) -> CycleOutcome {
    let mut updated = limit.clone();
    let mut reset = false;

    if let Some(step) = updated.reset_step_days() {
        match updated.last_reset {
            None => {
                updated.last_reset = Some(now);
            }
            Some(last) => {
                // Whole-day comparison; never builds a Duration from the
                // stored step, so an absurd `recurrence_days` cannot panic.
                if (now - last).num_days() >= step {
                    updated.amount_spent = 0.0;
                    updated.last_reset = Some(now);
                    reset = true;
                }
            }
        }
    }

    updated.recompute_usage();
    updated.next_reset = project_next_reset(&updated, now);

    let changed = updated != *limit;
    CycleOutcome {
        limit: updated,
        reset,
        changed,
    }
}

/// Read-only projection of the next reset timestamp for display. Returns
/// `None` when no cadence is configured, the limit has never been observed,
/// or the recurrence is degenerate (logged at warn).
pub fn project_next_reset(limit: &BudgetLimit, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let step = limit.reset_step_days()?;
    let anchor = limit.last_reset?;
    match next_occurrence(anchor, step, now) {
        Ok(ts) => Some(ts),
        Err(err) => {
            tracing::warn!(
                category = %limit.category,
                error = %err,
                "skipping next-reset projection"
            );
            None
        }
    }
}
