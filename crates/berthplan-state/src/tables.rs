//! redb table definitions for the berthplan store.
//!
//! Record tables use `&str` keys and `&[u8]` values (JSON-serialized domain
//! types). The plan is stored twice: once keyed by application and once as a
//! berth → application index, which is what makes both sides unique.

use redb::TableDefinition;

/// Berth applications keyed by `{application_id}`.
pub const APPLICATIONS: TableDefinition<&str, &[u8]> = TableDefinition::new("applications");

/// Berths keyed by `{berth_id}`.
pub const BERTHS: TableDefinition<&str, &[u8]> = TableDefinition::new("berths");

/// Leases keyed by `{lease_id}`.
pub const LEASES: TableDefinition<&str, &[u8]> = TableDefinition::new("leases");

/// Assignment plan rows keyed by `{application_id}`.
pub const ASSIGNMENT_PLANS: TableDefinition<&str, &[u8]> =
    TableDefinition::new("assignment_plans");

/// Reverse index `{berth_id}` → `{application_id}` over the plan.
pub const ASSIGNMENT_PLANS_BY_BERTH: TableDefinition<&str, &str> =
    TableDefinition::new("assignment_plans_by_berth");
