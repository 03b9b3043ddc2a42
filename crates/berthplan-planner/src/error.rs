//! Planner error types.

use berthplan_state::StateError;
use thiserror::Error;

/// Errors raised by a single planner stage.
#[derive(Debug, Error)]
pub enum PlannerError {
    /// Reading from (or talking to) the store failed.
    #[error("data access error: {0}")]
    DataAccess(StateError),

    /// The plan would break the one-application/one-berth rule or point at
    /// rows that no longer exist. The previous plan is untouched.
    #[error("constraint violation: {0}")]
    Constraint(String),

    /// The cost model handed to the solver is malformed.
    #[error("solver error: {0}")]
    Solver(String),
}

impl From<StateError> for PlannerError {
    fn from(err: StateError) -> Self {
        match err {
            StateError::Constraint(message) => PlannerError::Constraint(message),
            other => PlannerError::DataAccess(other),
        }
    }
}

pub type PlannerResult<T> = Result<T, PlannerError>;

/// The single fatal error a planner run surfaces.
#[derive(Debug, Error)]
#[error("assignment failed: {source}")]
pub struct AssignmentError {
    #[source]
    pub source: PlannerError,
}

impl From<PlannerError> for AssignmentError {
    fn from(source: PlannerError) -> Self {
        Self { source }
    }
}
