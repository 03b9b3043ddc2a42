//! Domain types for the berthplan store.
//!
//! Applications, berths and leases are owned by the reservation backend and
//! mirrored here; the assignment plan is the only record the planner writes.
//! All types are serializable to/from JSON for storage in redb tables.

use serde::{Deserialize, Serialize};

/// Unique identifier for a berth application.
pub type ApplicationId = String;

/// Unique identifier for a berth.
pub type BerthId = String;

/// Unique identifier for a harbor (the grouping berths belong to).
pub type HarborId = String;

/// Unique identifier for a lease.
pub type LeaseId = String;

// ── Application ───────────────────────────────────────────────────

/// A pending request for a berth with ranked harbor preferences.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Application {
    pub id: ApplicationId,
    /// Unix timestamp (seconds) when the application was submitted.
    pub created_at: u64,
    /// Ranked harbor choices; priorities are unique within one application.
    #[serde(default)]
    pub choices: Vec<HarborChoice>,
}

/// One ranked harbor preference. Priority 1 is the most preferred.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HarborChoice {
    pub harbor_id: HarborId,
    pub priority: u16,
}

// ── Berth ─────────────────────────────────────────────────────────

/// A single berth inside a harbor.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Berth {
    pub id: BerthId,
    pub harbor_id: HarborId,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

// ── Lease ─────────────────────────────────────────────────────────

/// A lease binding a berth (and usually an application) together.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Lease {
    pub id: LeaseId,
    pub berth_id: BerthId,
    #[serde(default)]
    pub application_id: Option<ApplicationId>,
    pub status: LeaseStatus,
}

/// Lifecycle status of a lease.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaseStatus {
    Drafted,
    Offered,
    Refused,
    Expired,
    Error,
    Paid,
    Terminated,
}

impl LeaseStatus {
    /// Every status except `expired` keeps the berth occupied.
    pub fn is_active(self) -> bool {
        self != LeaseStatus::Expired
    }
}

impl Lease {
    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }
}

// ── Assignment plan ───────────────────────────────────────────────

/// One application → berth pairing produced by a planner run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AssignmentPlan {
    pub application_id: ApplicationId,
    pub berth_id: BerthId,
    /// Unix timestamp (seconds) of the run that produced this row.
    pub created_at: u64,
}

/// Options applied while replacing the persisted plan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlanWriteOptions {
    /// Reject the plan if a berth was leased or deactivated, or an
    /// application got a lease, since the candidates were read.
    pub revalidate_availability: bool,
}

// ── Snapshot ──────────────────────────────────────────────────────

/// Applications, berths and leases read from one read transaction.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct StoreSnapshot {
    #[serde(default)]
    pub applications: Vec<Application>,
    #[serde(default)]
    pub berths: Vec<Berth>,
    #[serde(default)]
    pub leases: Vec<Lease>,
}
