use serde::{Deserialize, Serialize};

use super::plant::Plant;

/// One row of the shared `garden` table.
///
/// `plant_id` is the primary key; an owner accumulates one row per plant they
/// have ever had, and the row inserted last is the one readers trust.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRow {
    pub plant_id: String,
    pub owner: String,
    pub description: String,
    pub age: Option<String>,
    pub score: i64,
    pub is_dead: bool,
}

impl TableRow {
    #[must_use]
    pub fn from_plant(plant: &Plant, now: i64) -> Self {
        Self {
            plant_id: plant.plant_id.clone(),
            owner: plant.owner.clone(),
            description: plant.description(),
            age: Some(plant.age_formatted(now)),
            score: plant.score(),
            is_dead: plant.dead,
        }
    }
}
