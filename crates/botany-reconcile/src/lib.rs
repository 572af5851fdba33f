//! # botany-reconcile
//!
//! Per-user repair and consistency auditing across the three plant stores:
//! the authoritative `*_plant.dat` file, the JSON mirror, and the shared
//! `garden` table.
//!
//! - [`ReconcileEngine`] drives the stores to converge for each user and
//!   folds the outcomes into a [`RunReport`].
//! - [`ConsistencyAuditor`] compares what a read path would show against the
//!   live plant without writing anything.
//!
//! Both are generic over the [`TableStore`](botany_core::table::TableStore)
//! capability, so a missing database is just `Option::None`.

pub mod auditor;
pub mod engine;

pub use auditor::{ConsistencyAuditor, PageProvider};
pub use engine::{ReconcileEngine, RunReport};
