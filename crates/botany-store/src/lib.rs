//! # botany-store
//!
//! Filesystem stores for a user's plant state under
//! `<home_prefix>/<user>/.botany/`:
//!
//! - [`PlantStore`]: the authoritative `*_plant.dat` file (locate, load, save)
//! - [`MirrorStore`]: the `<user>_plant_data.json` mirror (lenient read, atomic write)
//! - [`BackupService`]: timestamped copies taken before destructive replacement
//! - [`discovery`]: the sorted set of safe usernames that own a plant file

pub mod backup;
pub mod discovery;
pub mod layout;
pub mod mirror;
pub mod plant_store;

mod atomic;

pub use backup::BackupService;
pub use layout::HomeLayout;
pub use mirror::MirrorStore;
pub use plant_store::{LoadedPlant, PlantStore};
