//! The store seam the planner reads from and writes to.

use berthplan_state::{AssignmentPlan, PlanWriteOptions, StateResult, StateStore, StoreSnapshot};

/// What a planner run needs from the application/berth store.
pub trait PlanStore {
    /// Applications, berths and leases as of one consistent read.
    fn snapshot(&self) -> StateResult<StoreSnapshot>;

    /// Replace the whole persisted plan atomically. Returns rows written.
    fn replace_plan(
        &self,
        rows: &[AssignmentPlan],
        options: PlanWriteOptions,
    ) -> StateResult<usize>;
}

impl PlanStore for StateStore {
    fn snapshot(&self) -> StateResult<StoreSnapshot> {
        StateStore::snapshot(self)
    }

    fn replace_plan(
        &self,
        rows: &[AssignmentPlan],
        options: PlanWriteOptions,
    ) -> StateResult<usize> {
        StateStore::replace_plan(self, rows, options)
    }
}

impl<T: PlanStore + ?Sized> PlanStore for &T {
    fn snapshot(&self) -> StateResult<StoreSnapshot> {
        (**self).snapshot()
    }

    fn replace_plan(
        &self,
        rows: &[AssignmentPlan],
        options: PlanWriteOptions,
    ) -> StateResult<usize> {
        (**self).replace_plan(rows, options)
    }
}
