//! berthplan-state — embedded store for the berth assignment planner.
//!
//! Backed by [redb](https://docs.rs/redb), holds the applications, berths and
//! leases the planner reads and the assignment plan it writes.
//!
//! # Architecture
//!
//! All domain types are JSON-serialized into redb's `&[u8]` value columns.
//! Reads used by the planner go through [`StateStore::snapshot`], a single
//! read transaction, and the plan is only ever replaced as a whole inside
//! one write transaction ([`StateStore::replace_plan`]).
//!
//! The `StateStore` is `Clone` + `Send` + `Sync` (backed by `Arc<Database>`).

pub mod error;
pub mod store;
pub mod tables;
pub mod types;

pub use error::{StateError, StateResult};
pub use store::StateStore;
pub use types::*;
