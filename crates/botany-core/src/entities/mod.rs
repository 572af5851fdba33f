//! Entities for the three persistence representations of a user's plant.
//!
//! - [`Plant`]: the authoritative record in the primary plant file
//! - [`MirrorDocument`]: the JSON mirror consumed by external read paths
//! - [`TableRow`]: the row in the shared relational `garden` table

mod mirror;
mod plant;
mod table_row;

pub use mirror::MirrorDocument;
pub use plant::{DEATH_AFTER_SECS, Plant, PlantSnapshot, SECONDS_PER_DAY, Transition};
pub use table_row::TableRow;
