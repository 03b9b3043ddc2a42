//! StateStore — redb-backed persistence for the berth planner.
//!
//! Provides typed CRUD over applications, berths and leases, a consistent
//! snapshot read for the planner, and the all-or-nothing replacement of the
//! assignment plan. All values are JSON-serialized into redb's `&[u8]`
//! value columns. The store supports both on-disk and in-memory backends
//! (the latter for testing).

use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition, WriteTransaction};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::error::{StateError, StateResult};
use crate::tables::*;
use crate::types::*;

/// Convert any `Display` error into a `StateError` variant via a closure factory.
macro_rules! map_err {
    ($variant:ident) => {
        |e| StateError::$variant(e.to_string())
    };
}

/// Table holding JSON-encoded records keyed by id.
type JsonTable = TableDefinition<'static, &'static str, &'static [u8]>;

/// Thread-safe store backed by redb.
#[derive(Clone, Debug)]
pub struct StateStore {
    db: Arc<Database>,
}

impl StateStore {
    /// Open (or create) a persistent store at the given path.
    pub fn open(path: &Path) -> StateResult<Self> {
        let db = Database::create(path).map_err(map_err!(Storage))?;
        let store = Self { db: Arc::new(db) };
        store.ensure_tables()?;
        debug!(?path, "state store opened");
        Ok(store)
    }

    /// Create an ephemeral in-memory store (for testing).
    pub fn open_in_memory() -> StateResult<Self> {
        let backend = redb::backends::InMemoryBackend::new();
        let db = Database::builder()
            .create_with_backend(backend)
            .map_err(map_err!(Storage))?;
        let store = Self { db: Arc::new(db) };
        store.ensure_tables()?;
        debug!("in-memory state store opened");
        Ok(store)
    }

    /// Create all tables if they don't exist yet.
    fn ensure_tables(&self) -> StateResult<()> {
        let txn = self.db.begin_write().map_err(map_err!(Storage))?;
        // Opening a table in a write transaction creates it if absent.
        txn.open_table(APPLICATIONS).map_err(map_err!(Storage))?;
        txn.open_table(BERTHS).map_err(map_err!(Storage))?;
        txn.open_table(LEASES).map_err(map_err!(Storage))?;
        txn.open_table(ASSIGNMENT_PLANS).map_err(map_err!(Storage))?;
        txn.open_table(ASSIGNMENT_PLANS_BY_BERTH)
            .map_err(map_err!(Storage))?;
        txn.commit().map_err(map_err!(Storage))?;
        Ok(())
    }

    // ── Generic record access ──────────────────────────────────────

    fn put_record<T: Serialize>(&self, def: JsonTable, key: &str, record: &T) -> StateResult<()> {
        let value = serde_json::to_vec(record).map_err(map_err!(Codec))?;
        let txn = self.db.begin_write().map_err(map_err!(Storage))?;
        {
            let mut table = txn.open_table(def).map_err(map_err!(Storage))?;
            table
                .insert(key, value.as_slice())
                .map_err(map_err!(Write))?;
        }
        txn.commit().map_err(map_err!(Storage))?;
        Ok(())
    }

    fn get_record<T: DeserializeOwned>(&self, def: JsonTable, key: &str) -> StateResult<Option<T>> {
        let txn = self.db.begin_read().map_err(map_err!(Storage))?;
        let table = txn.open_table(def).map_err(map_err!(Storage))?;
        match table.get(key).map_err(map_err!(Read))? {
            Some(guard) => {
                let record: T =
                    serde_json::from_slice(guard.value()).map_err(map_err!(Codec))?;
                Ok(Some(record))
            }
            None => Ok(None),
        }
    }

    fn list_records<T: DeserializeOwned>(&self, def: JsonTable) -> StateResult<Vec<T>> {
        let txn = self.db.begin_read().map_err(map_err!(Storage))?;
        let table = txn.open_table(def).map_err(map_err!(Storage))?;
        decode_all(&table)
    }

    // ── Applications ───────────────────────────────────────────────

    /// Insert or update an application.
    ///
    /// Choice priorities must be positive and unique within the application.
    pub fn put_application(&self, application: &Application) -> StateResult<()> {
        check_choices(application)?;
        self.put_record(APPLICATIONS, &application.id, application)?;
        debug!(application = %application.id, "application stored");
        Ok(())
    }

    /// Get an application by ID.
    pub fn get_application(&self, id: &str) -> StateResult<Option<Application>> {
        self.get_record(APPLICATIONS, id)
    }

    /// List all applications.
    pub fn list_applications(&self) -> StateResult<Vec<Application>> {
        self.list_records(APPLICATIONS)
    }

    /// Delete an application and any plan row pointing at it.
    /// Returns true if the application existed.
    pub fn delete_application(&self, id: &str) -> StateResult<bool> {
        let txn = self.db.begin_write().map_err(map_err!(Storage))?;
        let existed;
        {
            let mut table = txn.open_table(APPLICATIONS).map_err(map_err!(Storage))?;
            existed = table.remove(id).map_err(map_err!(Write))?.is_some();

            let mut plans = txn.open_table(ASSIGNMENT_PLANS).map_err(map_err!(Storage))?;
            let planned_berth = match plans.remove(id).map_err(map_err!(Write))? {
                Some(guard) => {
                    let row: AssignmentPlan =
                        serde_json::from_slice(guard.value()).map_err(map_err!(Codec))?;
                    Some(row.berth_id)
                }
                None => None,
            };
            if let Some(berth_id) = planned_berth {
                let mut by_berth = txn
                    .open_table(ASSIGNMENT_PLANS_BY_BERTH)
                    .map_err(map_err!(Storage))?;
                by_berth.remove(berth_id.as_str()).map_err(map_err!(Write))?;
            }
        }
        txn.commit().map_err(map_err!(Storage))?;
        debug!(application = %id, existed, "application deleted");
        Ok(existed)
    }

    // ── Berths ─────────────────────────────────────────────────────

    /// Insert or update a berth.
    pub fn put_berth(&self, berth: &Berth) -> StateResult<()> {
        self.put_record(BERTHS, &berth.id, berth)?;
        debug!(berth = %berth.id, harbor = %berth.harbor_id, "berth stored");
        Ok(())
    }

    /// Get a berth by ID.
    pub fn get_berth(&self, id: &str) -> StateResult<Option<Berth>> {
        self.get_record(BERTHS, id)
    }

    /// List all berths.
    pub fn list_berths(&self) -> StateResult<Vec<Berth>> {
        self.list_records(BERTHS)
    }

    /// Delete a berth and any plan row pointing at it.
    /// Returns true if the berth existed.
    pub fn delete_berth(&self, id: &str) -> StateResult<bool> {
        let txn = self.db.begin_write().map_err(map_err!(Storage))?;
        let existed;
        {
            let mut table = txn.open_table(BERTHS).map_err(map_err!(Storage))?;
            existed = table.remove(id).map_err(map_err!(Write))?.is_some();

            let mut by_berth = txn
                .open_table(ASSIGNMENT_PLANS_BY_BERTH)
                .map_err(map_err!(Storage))?;
            let planned_application = by_berth
                .remove(id)
                .map_err(map_err!(Write))?
                .map(|guard| guard.value().to_string());
            if let Some(application_id) = planned_application {
                let mut plans = txn.open_table(ASSIGNMENT_PLANS).map_err(map_err!(Storage))?;
                plans
                    .remove(application_id.as_str())
                    .map_err(map_err!(Write))?;
            }
        }
        txn.commit().map_err(map_err!(Storage))?;
        debug!(berth = %id, existed, "berth deleted");
        Ok(existed)
    }

    // ── Leases ─────────────────────────────────────────────────────

    /// Insert or update a lease.
    pub fn put_lease(&self, lease: &Lease) -> StateResult<()> {
        self.put_record(LEASES, &lease.id, lease)?;
        debug!(lease = %lease.id, berth = %lease.berth_id, status = ?lease.status, "lease stored");
        Ok(())
    }

    /// List all leases.
    pub fn list_leases(&self) -> StateResult<Vec<Lease>> {
        self.list_records(LEASES)
    }

    /// Delete a lease by ID. Returns true if it existed.
    pub fn delete_lease(&self, id: &str) -> StateResult<bool> {
        let txn = self.db.begin_write().map_err(map_err!(Storage))?;
        let existed;
        {
            let mut table = txn.open_table(LEASES).map_err(map_err!(Storage))?;
            existed = table.remove(id).map_err(map_err!(Write))?.is_some();
        }
        txn.commit().map_err(map_err!(Storage))?;
        Ok(existed)
    }

    // ── Snapshot ───────────────────────────────────────────────────

    /// Read applications, berths and leases from a single read transaction.
    pub fn snapshot(&self) -> StateResult<StoreSnapshot> {
        let txn = self.db.begin_read().map_err(map_err!(Storage))?;
        let applications = txn.open_table(APPLICATIONS).map_err(map_err!(Storage))?;
        let berths = txn.open_table(BERTHS).map_err(map_err!(Storage))?;
        let leases = txn.open_table(LEASES).map_err(map_err!(Storage))?;
        Ok(StoreSnapshot {
            applications: decode_all(&applications)?,
            berths: decode_all(&berths)?,
            leases: decode_all(&leases)?,
        })
    }

    // ── Bulk import ────────────────────────────────────────────────

    /// Upsert every application, berth and lease of `snapshot` in one write
    /// transaction. Applications are checked up front; if any is rejected
    /// nothing is written.
    pub fn import(&self, snapshot: &StoreSnapshot) -> StateResult<()> {
        for application in &snapshot.applications {
            check_choices(application)?;
        }

        let txn = self.db.begin_write().map_err(map_err!(Storage))?;
        let written = insert_records(&txn, BERTHS, &snapshot.berths, |b| b.id.as_str())
            .and_then(|_| {
                insert_records(&txn, APPLICATIONS, &snapshot.applications, |a| a.id.as_str())
            })
            .and_then(|_| insert_records(&txn, LEASES, &snapshot.leases, |l| l.id.as_str()));
        match written {
            Ok(()) => {
                txn.commit().map_err(map_err!(Storage))?;
                debug!(
                    applications = snapshot.applications.len(),
                    berths = snapshot.berths.len(),
                    leases = snapshot.leases.len(),
                    "snapshot imported"
                );
                Ok(())
            }
            Err(err) => {
                if let Err(abort_err) = txn.abort() {
                    warn!(error = %abort_err, "failed to abort import transaction");
                }
                Err(err)
            }
        }
    }

    // ── Assignment plan ────────────────────────────────────────────

    /// List the persisted plan, ordered by application ID.
    pub fn list_plan(&self) -> StateResult<Vec<AssignmentPlan>> {
        self.list_records(ASSIGNMENT_PLANS)
    }

    /// Replace the whole plan with `rows` in one write transaction.
    ///
    /// Every previous row is removed and every new row inserted, or, on any
    /// violation, the transaction is aborted and the previous plan stays.
    /// Returns the number of rows written.
    pub fn replace_plan(
        &self,
        rows: &[AssignmentPlan],
        options: PlanWriteOptions,
    ) -> StateResult<usize> {
        let txn = self.db.begin_write().map_err(map_err!(Storage))?;
        match write_plan(&txn, rows, options) {
            Ok(removed) => {
                txn.commit().map_err(map_err!(Storage))?;
                debug!(removed, inserted = rows.len(), "assignment plan replaced");
                Ok(rows.len())
            }
            Err(err) => {
                if let Err(abort_err) = txn.abort() {
                    warn!(error = %abort_err, "failed to abort plan transaction");
                }
                Err(err)
            }
        }
    }
}

/// Choice priorities must be positive and unique within one application.
fn check_choices(application: &Application) -> StateResult<()> {
    let mut seen = HashSet::new();
    for choice in &application.choices {
        if choice.priority == 0 {
            return Err(StateError::Constraint(format!(
                "application {} has a choice with priority 0",
                application.id
            )));
        }
        if !seen.insert(choice.priority) {
            return Err(StateError::Constraint(format!(
                "application {} uses priority {} more than once",
                application.id, choice.priority
            )));
        }
    }
    Ok(())
}

/// JSON-encode `records` into `def` inside `txn`, keyed by `key`.
fn insert_records<T: Serialize>(
    txn: &WriteTransaction,
    def: JsonTable,
    records: &[T],
    key: impl Fn(&T) -> &str,
) -> StateResult<()> {
    let mut table = txn.open_table(def).map_err(map_err!(Storage))?;
    for record in records {
        let value = serde_json::to_vec(record).map_err(map_err!(Codec))?;
        table
            .insert(key(record), value.as_slice())
            .map_err(map_err!(Write))?;
    }
    Ok(())
}

/// Decode every JSON value of a table, in key order.
fn decode_all<T, Tbl>(table: &Tbl) -> StateResult<Vec<T>>
where
    T: DeserializeOwned,
    Tbl: ReadableTable<&'static str, &'static [u8]>,
{
    let mut results = Vec::new();
    for entry in table.iter().map_err(map_err!(Read))? {
        let (_, value) = entry.map_err(map_err!(Read))?;
        let record: T = serde_json::from_slice(value.value()).map_err(map_err!(Codec))?;
        results.push(record);
    }
    Ok(results)
}

/// Clear and rewrite both plan tables inside `txn`. Returns rows removed.
fn write_plan(
    txn: &WriteTransaction,
    rows: &[AssignmentPlan],
    options: PlanWriteOptions,
) -> StateResult<usize> {
    let applications = txn.open_table(APPLICATIONS).map_err(map_err!(Storage))?;
    let berths = txn.open_table(BERTHS).map_err(map_err!(Storage))?;

    // Leased berths and applications, only needed when re-validating.
    let mut leased_berths = HashSet::new();
    let mut leased_applications = HashSet::new();
    if options.revalidate_availability {
        let leases = txn.open_table(LEASES).map_err(map_err!(Storage))?;
        for lease in decode_all::<Lease, _>(&leases)? {
            if lease.is_active() {
                leased_berths.insert(lease.berth_id);
                if let Some(application_id) = lease.application_id {
                    leased_applications.insert(application_id);
                }
            }
        }
    }

    let mut plans = txn.open_table(ASSIGNMENT_PLANS).map_err(map_err!(Storage))?;
    let mut by_berth = txn
        .open_table(ASSIGNMENT_PLANS_BY_BERTH)
        .map_err(map_err!(Storage))?;

    // Full reset: collect keys first, then remove.
    let stale: Vec<String> = plans
        .iter()
        .map_err(map_err!(Read))?
        .map(|entry| entry.map(|(key, _)| key.value().to_string()))
        .collect::<Result<_, _>>()
        .map_err(map_err!(Read))?;
    for key in &stale {
        plans.remove(key.as_str()).map_err(map_err!(Write))?;
    }
    let stale_berths: Vec<String> = by_berth
        .iter()
        .map_err(map_err!(Read))?
        .map(|entry| entry.map(|(key, _)| key.value().to_string()))
        .collect::<Result<_, _>>()
        .map_err(map_err!(Read))?;
    for key in &stale_berths {
        by_berth.remove(key.as_str()).map_err(map_err!(Write))?;
    }

    for row in rows {
        let application_id = row.application_id.as_str();
        let berth_id = row.berth_id.as_str();

        if plans.get(application_id).map_err(map_err!(Read))?.is_some() {
            return Err(StateError::Constraint(format!(
                "application {application_id} is planned more than once"
            )));
        }
        if by_berth.get(berth_id).map_err(map_err!(Read))?.is_some() {
            return Err(StateError::Constraint(format!(
                "berth {berth_id} is planned more than once"
            )));
        }
        if applications
            .get(application_id)
            .map_err(map_err!(Read))?
            .is_none()
        {
            return Err(StateError::Constraint(format!(
                "application {application_id} does not exist"
            )));
        }
        let berth: Berth = match berths.get(berth_id).map_err(map_err!(Read))? {
            Some(guard) => serde_json::from_slice(guard.value()).map_err(map_err!(Codec))?,
            None => {
                return Err(StateError::Constraint(format!(
                    "berth {berth_id} does not exist"
                )));
            }
        };

        if options.revalidate_availability {
            if !berth.is_active || leased_berths.contains(berth_id) {
                return Err(StateError::Constraint(format!(
                    "berth {berth_id} is no longer available"
                )));
            }
            if leased_applications.contains(application_id) {
                return Err(StateError::Constraint(format!(
                    "application {application_id} already holds a lease"
                )));
            }
        }

        let value = serde_json::to_vec(row).map_err(map_err!(Codec))?;
        plans
            .insert(application_id, value.as_slice())
            .map_err(map_err!(Write))?;
        by_berth
            .insert(berth_id, application_id)
            .map_err(map_err!(Write))?;
    }

    Ok(stale.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_application(id: &str, created_at: u64, choices: &[(&str, u16)]) -> Application {
        Application {
            id: id.to_string(),
            created_at,
            choices: choices
                .iter()
                .map(|(harbor, priority)| HarborChoice {
                    harbor_id: harbor.to_string(),
                    priority: *priority,
                })
                .collect(),
        }
    }

    fn test_berth(id: &str, harbor: &str) -> Berth {
        Berth {
            id: id.to_string(),
            harbor_id: harbor.to_string(),
            is_active: true,
        }
    }

    fn test_lease(id: &str, berth: &str, application: Option<&str>, status: LeaseStatus) -> Lease {
        Lease {
            id: id.to_string(),
            berth_id: berth.to_string(),
            application_id: application.map(str::to_string),
            status,
        }
    }

    fn plan_row(application: &str, berth: &str) -> AssignmentPlan {
        AssignmentPlan {
            application_id: application.to_string(),
            berth_id: berth.to_string(),
            created_at: 1000,
        }
    }

    fn seeded_store() -> StateStore {
        let store = StateStore::open_in_memory().unwrap();
        store
            .put_application(&test_application("app-1", 100, &[("h1", 1)]))
            .unwrap();
        store
            .put_application(&test_application("app-2", 200, &[("h2", 1)]))
            .unwrap();
        store.put_berth(&test_berth("b1", "h1")).unwrap();
        store.put_berth(&test_berth("b2", "h2")).unwrap();
        store
    }

    // ── Application CRUD ───────────────────────────────────────────

    #[test]
    fn application_put_and_get() {
        let store = StateStore::open_in_memory().unwrap();
        let app = test_application("app-1", 100, &[("h1", 1), ("h2", 2)]);

        store.put_application(&app).unwrap();
        assert_eq!(store.get_application("app-1").unwrap(), Some(app));
        assert!(store.get_application("nope").unwrap().is_none());
    }

    #[test]
    fn application_rejects_duplicate_priority() {
        let store = StateStore::open_in_memory().unwrap();
        let app = test_application("app-1", 100, &[("h1", 1), ("h2", 1)]);

        let err = store.put_application(&app).unwrap_err();
        assert!(matches!(err, StateError::Constraint(_)));
        assert!(store.list_applications().unwrap().is_empty());
    }

    #[test]
    fn application_rejects_zero_priority() {
        let store = StateStore::open_in_memory().unwrap();
        let app = test_application("app-1", 100, &[("h1", 0)]);
        assert!(matches!(
            store.put_application(&app),
            Err(StateError::Constraint(_))
        ));
    }

    #[test]
    fn application_delete_cascades_to_plan() {
        let store = seeded_store();
        store
            .replace_plan(
                &[plan_row("app-1", "b1"), plan_row("app-2", "b2")],
                PlanWriteOptions::default(),
            )
            .unwrap();

        assert!(store.delete_application("app-1").unwrap());
        assert!(!store.delete_application("app-1").unwrap());

        let plan = store.list_plan().unwrap();
        assert_eq!(plan, vec![plan_row("app-2", "b2")]);

        // b1 is free again in the reverse index, so it can be planned anew.
        store
            .put_application(&test_application("app-3", 300, &[("h1", 1)]))
            .unwrap();
        store
            .replace_plan(
                &[plan_row("app-3", "b1"), plan_row("app-2", "b2")],
                PlanWriteOptions::default(),
            )
            .unwrap();
    }

    // ── Berth & lease CRUD ─────────────────────────────────────────

    #[test]
    fn berth_put_list_delete() {
        let store = StateStore::open_in_memory().unwrap();
        store.put_berth(&test_berth("b1", "h1")).unwrap();
        store.put_berth(&test_berth("b2", "h1")).unwrap();

        assert_eq!(store.list_berths().unwrap().len(), 2);
        assert!(store.delete_berth("b1").unwrap());
        assert!(store.get_berth("b1").unwrap().is_none());
        assert_eq!(store.list_berths().unwrap().len(), 1);
    }

    #[test]
    fn berth_delete_cascades_to_plan() {
        let store = seeded_store();
        store
            .replace_plan(
                &[plan_row("app-1", "b1"), plan_row("app-2", "b2")],
                PlanWriteOptions::default(),
            )
            .unwrap();

        assert!(store.delete_berth("b2").unwrap());
        assert_eq!(store.list_plan().unwrap(), vec![plan_row("app-1", "b1")]);
    }

    #[test]
    fn lease_put_list_delete() {
        let store = StateStore::open_in_memory().unwrap();
        store
            .put_lease(&test_lease("l1", "b1", Some("app-1"), LeaseStatus::Paid))
            .unwrap();

        let leases = store.list_leases().unwrap();
        assert_eq!(leases.len(), 1);
        assert_eq!(leases[0].status, LeaseStatus::Paid);

        assert!(store.delete_lease("l1").unwrap());
        assert!(!store.delete_lease("l1").unwrap());
    }

    #[test]
    fn snapshot_contains_all_records() {
        let store = seeded_store();
        store
            .put_lease(&test_lease("l1", "b1", None, LeaseStatus::Expired))
            .unwrap();

        let snapshot = store.snapshot().unwrap();
        assert_eq!(snapshot.applications.len(), 2);
        assert_eq!(snapshot.berths.len(), 2);
        assert_eq!(snapshot.leases.len(), 1);
    }

    // ── Plan replacement ───────────────────────────────────────────

    #[test]
    fn replace_plan_supersedes_previous_rows() {
        let store = seeded_store();
        store
            .replace_plan(&[plan_row("app-1", "b1")], PlanWriteOptions::default())
            .unwrap();

        let written = store
            .replace_plan(&[plan_row("app-2", "b1")], PlanWriteOptions::default())
            .unwrap();

        assert_eq!(written, 1);
        assert_eq!(store.list_plan().unwrap(), vec![plan_row("app-2", "b1")]);
    }

    #[test]
    fn replace_plan_reports_rows_written_not_removed() {
        let store = seeded_store();
        store
            .replace_plan(
                &[plan_row("app-1", "b1"), plan_row("app-2", "b2")],
                PlanWriteOptions::default(),
            )
            .unwrap();

        let written = store
            .replace_plan(&[plan_row("app-1", "b2")], PlanWriteOptions::default())
            .unwrap();

        assert_eq!(written, 1);
    }

    #[test]
    fn replace_plan_with_empty_rows_clears_plan() {
        let store = seeded_store();
        store
            .replace_plan(&[plan_row("app-1", "b1")], PlanWriteOptions::default())
            .unwrap();

        assert_eq!(
            store.replace_plan(&[], PlanWriteOptions::default()).unwrap(),
            0
        );
        assert!(store.list_plan().unwrap().is_empty());
    }

    #[test]
    fn duplicate_berth_rolls_back_whole_plan() {
        let store = seeded_store();
        let previous = vec![plan_row("app-1", "b1"), plan_row("app-2", "b2")];
        store
            .replace_plan(&previous, PlanWriteOptions::default())
            .unwrap();

        let err = store
            .replace_plan(
                &[plan_row("app-1", "b2"), plan_row("app-2", "b2")],
                PlanWriteOptions::default(),
            )
            .unwrap_err();

        assert!(matches!(err, StateError::Constraint(_)));
        assert_eq!(store.list_plan().unwrap(), previous);
    }

    #[test]
    fn duplicate_application_is_rejected() {
        let store = seeded_store();
        let err = store
            .replace_plan(
                &[plan_row("app-1", "b1"), plan_row("app-1", "b2")],
                PlanWriteOptions::default(),
            )
            .unwrap_err();
        assert!(err.to_string().contains("app-1"));
        assert!(store.list_plan().unwrap().is_empty());
    }

    #[test]
    fn dangling_references_are_rejected() {
        let store = seeded_store();
        assert!(matches!(
            store.replace_plan(&[plan_row("ghost", "b1")], PlanWriteOptions::default()),
            Err(StateError::Constraint(_))
        ));
        assert!(matches!(
            store.replace_plan(&[plan_row("app-1", "ghost")], PlanWriteOptions::default()),
            Err(StateError::Constraint(_))
        ));
    }

    #[test]
    fn revalidation_rejects_berth_leased_after_read() {
        let store = seeded_store();
        store
            .put_lease(&test_lease("l1", "b1", None, LeaseStatus::Offered))
            .unwrap();

        // Without re-validation the stale pair is written as-is.
        store
            .replace_plan(&[plan_row("app-1", "b1")], PlanWriteOptions::default())
            .unwrap();

        let strict = PlanWriteOptions {
            revalidate_availability: true,
        };
        let err = store
            .replace_plan(&[plan_row("app-2", "b1")], strict)
            .unwrap_err();
        assert!(err.to_string().contains("no longer available"));
        assert_eq!(store.list_plan().unwrap(), vec![plan_row("app-1", "b1")]);
    }

    #[test]
    fn revalidation_rejects_leased_application_and_inactive_berth() {
        let store = seeded_store();
        let strict = PlanWriteOptions {
            revalidate_availability: true,
        };

        store
            .put_lease(&test_lease("l1", "b9", Some("app-1"), LeaseStatus::Paid))
            .unwrap();
        assert!(store.replace_plan(&[plan_row("app-1", "b1")], strict).is_err());

        store
            .put_berth(&Berth {
                is_active: false,
                ..test_berth("b2", "h2")
            })
            .unwrap();
        assert!(store.replace_plan(&[plan_row("app-2", "b2")], strict).is_err());

        // Expired leases do not count.
        store
            .put_lease(&test_lease("l1", "b9", Some("app-1"), LeaseStatus::Expired))
            .unwrap();
        assert_eq!(
            store.replace_plan(&[plan_row("app-1", "b1")], strict).unwrap(),
            1
        );
    }

    // ── Bulk import ────────────────────────────────────────────────

    #[test]
    fn import_writes_all_records() {
        let store = StateStore::open_in_memory().unwrap();
        let snapshot = StoreSnapshot {
            applications: vec![test_application("app-1", 100, &[("h1", 1)])],
            berths: vec![test_berth("b1", "h1"), test_berth("b2", "h2")],
            leases: vec![test_lease("l1", "b2", None, LeaseStatus::Paid)],
        };

        store.import(&snapshot).unwrap();

        assert_eq!(store.snapshot().unwrap(), snapshot);
    }

    #[test]
    fn rejected_import_writes_nothing() {
        let store = StateStore::open_in_memory().unwrap();
        let snapshot = StoreSnapshot {
            applications: vec![
                test_application("ok", 100, &[("h1", 1)]),
                test_application("bad", 200, &[("h1", 1), ("h2", 1)]),
            ],
            berths: vec![test_berth("b1", "h1")],
            leases: vec![test_lease("l1", "b1", None, LeaseStatus::Drafted)],
        };

        let err = store.import(&snapshot).unwrap_err();

        assert!(matches!(err, StateError::Constraint(_)));
        assert!(err.to_string().contains("bad"));
        assert_eq!(store.snapshot().unwrap(), StoreSnapshot::default());
    }

    // ── Persistence (on-disk) ──────────────────────────────────────

    #[test]
    fn persistence_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("test.redb");

        {
            let store = StateStore::open(&db_path).unwrap();
            store.put_berth(&test_berth("b1", "h1")).unwrap();
            store
                .put_application(&test_application("app-1", 100, &[("h1", 1)]))
                .unwrap();
            store
                .replace_plan(&[plan_row("app-1", "b1")], PlanWriteOptions::default())
                .unwrap();
        }

        // Reopen the same database file.
        let store = StateStore::open(&db_path).unwrap();
        assert_eq!(store.list_plan().unwrap(), vec![plan_row("app-1", "b1")]);
    }

    #[test]
    fn empty_store_operations() {
        let store = StateStore::open_in_memory().unwrap();

        assert!(store.list_applications().unwrap().is_empty());
        assert!(store.list_berths().unwrap().is_empty());
        assert!(store.list_leases().unwrap().is_empty());
        assert!(store.list_plan().unwrap().is_empty());
        assert_eq!(store.snapshot().unwrap(), StoreSnapshot::default());
        assert!(!store.delete_application("nope").unwrap());
        assert!(!store.delete_berth("nope").unwrap());
    }
}
