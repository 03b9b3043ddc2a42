//! berthplan-planner — optimal berth assignment planning.
//!
//! One run reads the store, decides which applications compete for which
//! free berths, solves the resulting assignment problem exactly and replaces
//! the persisted plan in a single transaction.
//!
//! # Components
//!
//! - **`gather`** — Candidate rows from a store snapshot (availability, eligibility, cap)
//! - **`cost`** — Dense cost matrix from ranked priorities
//! - **`matcher`** — Minimum-cost rectangular assignment (Kuhn–Munkres)
//! - **`writer`** — Whole-plan replacement through the store
//! - **`planner`** — The `run` pipeline tying the stages together
//!
//! ```text
//! Planner::run
//!   ├── PlanStore::snapshot        (read)
//!   ├── gather_candidates          (pure)
//!   ├── CostModel::build           (pure)
//!   ├── match_candidates           (pure)
//!   └── write_plan                 (one write transaction)
//! ```

pub mod cost;
pub mod error;
pub mod gather;
pub mod matcher;
pub mod planner;
pub mod store;
pub mod writer;

pub use cost::{CostMatrix, CostModel, scale_priority};
pub use error::{AssignmentError, PlannerError, PlannerResult};
pub use gather::{CandidatePool, CandidateRow, gather_candidates};
pub use matcher::{Assignment, MatchedPair, Matching, match_candidates, solve};
pub use planner::{PlanReport, Planner};
pub use store::PlanStore;
pub use writer::write_plan;
