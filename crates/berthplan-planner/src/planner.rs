//! Planner — one end-to-end assignment run.
//!
//! `run` reads a snapshot, gathers candidates, builds the cost model,
//! solves it and replaces the persisted plan. Every stage error collapses
//! into a single [`AssignmentError`]; the previous plan is only touched by
//! the final write, which is atomic.

use std::time::{SystemTime, UNIX_EPOCH};

use berthplan_core::PlannerConfig;
use berthplan_state::PlanWriteOptions;
use tracing::{debug, error, info, warn};

use crate::cost::CostModel;
use crate::error::{AssignmentError, PlannerError, PlannerResult};
use crate::gather::gather_candidates;
use crate::matcher::{MatchedPair, match_candidates};
use crate::store::PlanStore;
use crate::writer::write_plan;

/// Outcome of a successful run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlanReport {
    /// Rows written to the plan.
    pub planned: usize,
    /// Applications that took part in matching (after the supply cap).
    pub eligible_applications: usize,
    /// Berths that were free at snapshot time.
    pub available_berths: usize,
    /// Objective value of the chosen matching.
    pub total_cost: i64,
    /// Pairs whose berth lies outside every harbor the applicant chose.
    pub unpreferred: usize,
    /// The pairs as written.
    pub pairs: Vec<MatchedPair>,
}

/// Runs the assignment pipeline against a [`PlanStore`].
pub struct Planner<S> {
    store: S,
    config: PlannerConfig,
}

impl<S: PlanStore> Planner<S> {
    pub fn new(store: S, config: PlannerConfig) -> Self {
        Self { store, config }
    }

    /// Compute and persist a fresh assignment plan.
    pub fn run(&self) -> Result<PlanReport, AssignmentError> {
        match self.try_run() {
            Ok(report) => {
                info!(
                    planned = report.planned,
                    eligible = report.eligible_applications,
                    available_berths = report.available_berths,
                    total_cost = report.total_cost,
                    "planned {} berth assignments",
                    report.planned
                );
                Ok(report)
            }
            Err(err) => {
                error!(error = %err, "assignment run failed");
                Err(AssignmentError::from(err))
            }
        }
    }

    fn try_run(&self) -> PlannerResult<PlanReport> {
        let snapshot = self.store.snapshot().map_err(PlannerError::DataAccess)?;
        debug!(
            applications = snapshot.applications.len(),
            berths = snapshot.berths.len(),
            leases = snapshot.leases.len(),
            "store snapshot read"
        );

        let pool = gather_candidates(&snapshot);
        let model = CostModel::build(&pool.rows, self.config.max_priority)?;
        if model.max_priority > self.config.max_priority {
            warn!(
                configured = self.config.max_priority,
                observed = model.max_priority,
                "priority above configured ceiling, widening cost scale"
            );
        }

        let matching = match_candidates(&model)?;
        let mut unpreferred = 0;
        for pair in &matching.pairs {
            if pair.is_unpreferred() {
                unpreferred += 1;
                warn!(
                    application = %pair.application_id,
                    berth = %pair.berth_id,
                    "berth outside every chosen harbor assigned"
                );
            } else {
                debug!(
                    application = %pair.application_id,
                    berth = %pair.berth_id,
                    cost = pair.cost,
                    "pair planned"
                );
            }
        }

        let options = PlanWriteOptions {
            revalidate_availability: self.config.revalidate_availability,
        };
        let planned = write_plan(&self.store, &matching.pairs, epoch_secs(), options)?;

        Ok(PlanReport {
            planned,
            eligible_applications: pool.rows.len(),
            available_berths: pool.available_berths,
            total_cost: matching.total_cost,
            unpreferred,
            pairs: matching.pairs,
        })
    }
}

fn epoch_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
