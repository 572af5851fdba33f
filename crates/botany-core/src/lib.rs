//! # botany-core
//!
//! Core types shared across the botany reconcile workspace.
//!
//! This crate provides the foundational types every other crate builds on:
//! - The authoritative `Plant` entity and its load-time checks
//! - The JSON mirror document and relational table row projections
//! - The store failure taxonomy (`StoreError`, `FailureKind`)
//! - Reconciliation outcomes and the run-wide summary accumulator
//! - Audit projections, records, and report
//! - The `TableStore` capability with its null-object fallback
//! - Clock abstraction and safe username validation

pub mod audit;
pub mod clock;
pub mod entities;
pub mod errors;
pub mod options;
pub mod outcome;
pub mod table;
pub mod username;

pub use clock::{Clock, FixedClock, SystemClock};
pub use errors::{FailureKind, StoreError, UnsafeUsername};
pub use options::ReconcileOptions;
pub use username::Username;
