pub mod budget_cycle;
pub mod recurring;

pub use budget_cycle::{project_next_reset, reconcile, CycleOutcome};
pub use recurring::materialize_next;
