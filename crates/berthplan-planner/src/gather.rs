//! Candidate gathering — who competes for which free berth.
//!
//! Turns a [`StoreSnapshot`] into one [`CandidateRow`] per eligible
//! application. A berth is available when it is active and carries no
//! non-expired lease. An application is eligible when it holds no
//! non-expired lease and at least one of its harbors has an available berth.
//! Eligible applications are taken oldest first and capped at the number of
//! available berths; anything past the cap sits out this run.

use std::collections::{BTreeMap, HashSet};

use berthplan_state::{ApplicationId, BerthId, StoreSnapshot};
use tracing::debug;

/// Candidate berths of one application, parallel to their priorities.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateRow {
    pub application_id: ApplicationId,
    pub berth_ids: Vec<BerthId>,
    pub priorities: Vec<u16>,
}

impl CandidateRow {
    /// `(berth_id, priority)` pairs of this row.
    pub fn candidates(&self) -> impl Iterator<Item = (&str, u16)> + '_ {
        self.berth_ids
            .iter()
            .map(String::as_str)
            .zip(self.priorities.iter().copied())
    }
}

/// The problem instance handed to the cost model.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandidatePool {
    /// Rows in creation order, already capped.
    pub rows: Vec<CandidateRow>,
    /// Number of available berths in the whole store.
    pub available_berths: usize,
    /// Eligible applications before the cap was applied.
    pub eligible_before_cap: usize,
}

/// Build the candidate pool from a snapshot of the store.
pub fn gather_candidates(snapshot: &StoreSnapshot) -> CandidatePool {
    let mut leased_berths: HashSet<&str> = HashSet::new();
    let mut leased_applications: HashSet<&str> = HashSet::new();
    for lease in snapshot.leases.iter().filter(|lease| lease.is_active()) {
        leased_berths.insert(lease.berth_id.as_str());
        if let Some(application_id) = &lease.application_id {
            leased_applications.insert(application_id.as_str());
        }
    }

    // Harbor → available berth ids, both sorted for a stable row layout.
    let mut free_by_harbor: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    let mut available_berths = 0;
    for berth in &snapshot.berths {
        if berth.is_active && !leased_berths.contains(berth.id.as_str()) {
            free_by_harbor
                .entry(berth.harbor_id.as_str())
                .or_default()
                .push(berth.id.as_str());
            available_berths += 1;
        }
    }
    for berths in free_by_harbor.values_mut() {
        berths.sort_unstable();
    }

    let mut applications: Vec<_> = snapshot
        .applications
        .iter()
        .filter(|app| !leased_applications.contains(app.id.as_str()))
        .collect();
    applications.sort_by(|a, b| {
        a.created_at
            .cmp(&b.created_at)
            .then_with(|| a.id.cmp(&b.id))
    });

    let mut rows = Vec::new();
    for app in applications {
        let mut choices: Vec<_> = app.choices.iter().collect();
        choices.sort_by_key(|choice| choice.priority);

        let mut berth_ids = Vec::new();
        let mut priorities = Vec::new();
        for choice in choices {
            if let Some(berths) = free_by_harbor.get(choice.harbor_id.as_str()) {
                for berth_id in berths {
                    berth_ids.push(berth_id.to_string());
                    priorities.push(choice.priority);
                }
            }
        }

        if berth_ids.is_empty() {
            debug!(application = %app.id, "no available berth in any chosen harbor");
            continue;
        }
        rows.push(CandidateRow {
            application_id: app.id.clone(),
            berth_ids,
            priorities,
        });
    }

    let eligible_before_cap = rows.len();
    if rows.len() > available_berths {
        debug!(
            eligible = rows.len(),
            available_berths, "capping candidate pool to berth supply"
        );
        rows.truncate(available_berths);
    }

    CandidatePool {
        rows,
        available_berths,
        eligible_before_cap,
    }
}
