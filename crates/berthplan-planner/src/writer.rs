//! Plan writer — replaces the persisted plan with a fresh matching.
//!
//! The previous plan is cleared and the new rows inserted inside one write
//! transaction owned by the store. Any failure leaves the previous plan as
//! it was.

use berthplan_state::{AssignmentPlan, PlanWriteOptions};
use tracing::debug;

use crate::error::PlannerResult;
use crate::matcher::MatchedPair;
use crate::store::PlanStore;

/// Persist `pairs` as the whole assignment plan, stamped with `created_at`.
///
/// Returns the number of rows written.
pub fn write_plan<S: PlanStore + ?Sized>(
    store: &S,
    pairs: &[MatchedPair],
    created_at: u64,
    options: PlanWriteOptions,
) -> PlannerResult<usize> {
    let rows: Vec<AssignmentPlan> = pairs
        .iter()
        .map(|pair| AssignmentPlan {
            application_id: pair.application_id.clone(),
            berth_id: pair.berth_id.clone(),
            created_at,
        })
        .collect();

    let written = store.replace_plan(&rows, options)?;
    debug!(written, "plan written");
    Ok(written)
}
