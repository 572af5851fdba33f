use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::plant::Plant;

/// The per-user JSON mirror (`<user>_plant_data.json`).
///
/// Written by several generations of tooling, so readers accept `is_dead` as a
/// bool or an integer and `last_watered` as an integer or digit string.
/// Fields this crate does not know about are preserved on rewrite.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MirrorDocument(Map<String, Value>);

impl MirrorDocument {
    #[must_use]
    pub const fn from_map(map: Map<String, Value>) -> Self {
        Self(map)
    }

    /// Derive a fresh document from the authoritative plant.
    #[must_use]
    pub fn from_plant(plant: &Plant, now: i64) -> Self {
        let mut doc = Self::default();
        doc.apply_plant(plant, now);
        doc
    }

    /// Overwrite every plant-derived field, keeping unrelated fields as they are.
    pub fn apply_plant(&mut self, plant: &Plant, now: i64) {
        let fields = [
            ("owner", Value::from(plant.owner.clone())),
            ("description", Value::from(plant.description())),
            ("age", Value::from(plant.age_formatted(now))),
            ("score", Value::from(plant.score())),
            ("is_dead", Value::from(u8::from(plant.dead))),
            (
                "last_watered",
                plant.watered_timestamp.map_or(Value::Null, Value::from),
            ),
            (
                "file_name",
                Value::from(format!("{}_plant.dat", plant.owner)),
            ),
            ("stage", Value::from(plant.stage_name())),
            ("generation", Value::from(plant.generation)),
        ];
        for (key, value) in fields {
            self.0.insert(key.to_string(), value);
        }
    }

    /// `Some(true)` when the document marks the plant dead. A missing key
    /// counts as alive; an unparseable value is `None`.
    #[must_use]
    pub fn is_dead(&self) -> Option<bool> {
        match self.0.get("is_dead") {
            None | Some(Value::Null) => Some(false),
            Some(Value::Bool(dead)) => Some(*dead),
            Some(Value::Number(n)) => n
                .as_i64()
                .map(|v| v != 0)
                .or_else(|| n.as_f64().map(|v| v != 0.0)),
            Some(Value::String(s)) => s.trim().parse::<i64>().ok().map(|v| v != 0),
            Some(_) => None,
        }
    }

    pub fn set_is_dead(&mut self, dead: bool) {
        self.0
            .insert("is_dead".to_string(), Value::from(u8::from(dead)));
    }

    /// Last watering time in unix seconds.
    ///
    /// Only a non-negative integer or an all-digit string counts; anything
    /// else (negative, fractional, out of range) reads as absent.
    #[must_use]
    pub fn last_watered(&self) -> Option<i64> {
        match self.0.get("last_watered")? {
            Value::Number(n) => n.as_u64().and_then(|v| i64::try_from(v).ok()),
            Value::String(s) if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) => {
                s.parse().ok()
            }
            _ => None,
        }
    }

    #[must_use]
    pub fn age(&self) -> Option<String> {
        match self.0.get("age")? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    /// Score as an integer; a missing score reads as 0.
    #[must_use]
    pub fn score(&self) -> Option<i64> {
        match self.0.get("score") {
            None | Some(Value::Null) => Some(0),
            Some(Value::Number(n)) => n.as_i64().or_else(|| {
                #[allow(clippy::cast_possible_truncation)]
                n.as_f64().map(|v| v.trunc() as i64)
            }),
            Some(Value::String(s)) => s.trim().parse().ok(),
            Some(_) => None,
        }
    }

    #[must_use]
    pub const fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }
}
