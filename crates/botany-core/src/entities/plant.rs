use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Seconds in a day.
pub const SECONDS_PER_DAY: i64 = 86_400;

/// A plant left unwatered longer than this dies on its next load.
pub const DEATH_AFTER_SECS: i64 = 5 * SECONDS_PER_DAY;

/// Latest timestamp a plant may carry: the last second of year 9999.
pub const MAX_TIMESTAMP: i64 = 253_402_300_799;

/// Tick accrual per load is capped at one day of elapsed time.
const MAX_ACCRUAL_SECS: i64 = SECONDS_PER_DAY;

/// Tick thresholds for advancing to stages 1 through 5.
const LIFE_STAGES: [i64; 5] = [
    SECONDS_PER_DAY,
    2 * SECONDS_PER_DAY,
    10 * SECONDS_PER_DAY,
    20 * SECONDS_PER_DAY,
    30 * SECONDS_PER_DAY,
];

const STAGE_NAMES: [&str; 6] = [
    "seed",
    "seedling",
    "young",
    "mature",
    "flowering",
    "seed-bearing",
];

const SPECIES: [&str; 16] = [
    "poppy",
    "cactus",
    "aloe",
    "venus flytrap",
    "jade plant",
    "fern",
    "daffodil",
    "sunflower",
    "baobab",
    "lithops",
    "pansy",
    "iris",
    "agave",
    "ficus",
    "moss",
    "sage",
];

const fn default_generation() -> u32 {
    1
}

/// The authoritative per-user plant record, as stored in `<user>_plant.dat`.
///
/// Unknown fields are carried in `extra` and written back untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plant {
    pub plant_id: String,
    pub owner: String,
    #[serde(default)]
    pub species: String,
    #[serde(default)]
    pub stage: u8,
    #[serde(default = "default_generation")]
    pub generation: u32,
    #[serde(default)]
    pub dead: bool,
    #[serde(default)]
    pub watered_timestamp: Option<i64>,
    #[serde(default)]
    pub ticks: f64,
    pub start_time: i64,
    pub last_time: i64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The fields reconciliation compares before and after a pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PlantSnapshot {
    pub dead: bool,
    pub watered_timestamp: Option<i64>,
    pub ticks: f64,
}

impl PlantSnapshot {
    /// Human-readable delta, e.g. `dead 0→1, last_water 100→100, ticks 5→9`.
    #[must_use]
    pub fn describe_change(&self, after: &Self) -> String {
        format!(
            "dead {}→{}, last_water {}→{}, ticks {}→{}",
            u8::from(self.dead),
            u8::from(after.dead),
            self.watered_timestamp.unwrap_or(0),
            after.watered_timestamp.unwrap_or(0),
            self.ticks,
            after.ticks,
        )
    }
}

/// A state change applied by the plant's own load-time checks.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Transition {
    TicksAccrued { seconds: i64, ticks: f64 },
    StageAdvanced { from: u8, to: u8 },
    DiedOfNeglect { hours_since_watered: i64 },
}

impl Plant {
    /// A brand-new seed, as created when a corrupt plant is reinitialized.
    ///
    /// Starts just over a day past its last watering, like a freshly planted seed.
    #[must_use]
    pub fn fresh(owner: &str, plant_id: String, now: i64) -> Self {
        let species_index = u8::from_str_radix(plant_id.get(..2).unwrap_or("00"), 16)
            .map_or(0, usize::from)
            % SPECIES.len();
        Self {
            plant_id,
            owner: owner.to_string(),
            species: SPECIES[species_index].to_string(),
            stage: 0,
            generation: 1,
            dead: false,
            watered_timestamp: Some(now.saturating_sub(SECONDS_PER_DAY + 1)),
            ticks: 0.0,
            start_time: now,
            last_time: now,
            extra: Map::new(),
        }
    }

    #[must_use]
    pub const fn snapshot(&self) -> PlantSnapshot {
        PlantSnapshot {
            dead: self.dead,
            watered_timestamp: self.watered_timestamp,
            ticks: self.ticks,
        }
    }

    /// Structural checks a decoded plant must pass before it is trusted.
    ///
    /// # Errors
    ///
    /// Returns a description of the first violated expectation.
    pub fn validate(&self) -> Result<(), String> {
        if self.plant_id.trim().is_empty() {
            return Err("missing plant_id".into());
        }
        if self.owner.trim().is_empty() {
            return Err("missing owner".into());
        }
        if !self.ticks.is_finite() || self.ticks < 0.0 {
            return Err(format!("invalid ticks {}", self.ticks));
        }
        if self.generation == 0 {
            return Err("generation must be at least 1".into());
        }
        if usize::from(self.stage) >= STAGE_NAMES.len() {
            return Err(format!("invalid stage {}", self.stage));
        }
        let timestamps = [
            ("start_time", Some(self.start_time)),
            ("last_time", Some(self.last_time)),
            ("watered_timestamp", self.watered_timestamp),
        ];
        for (field, value) in timestamps {
            if let Some(ts) = value
                && !(1..=MAX_TIMESTAMP).contains(&ts)
            {
                return Err(format!("{field} out of range: {ts}"));
            }
        }
        Ok(())
    }

    /// Run the plant's own checks for the time elapsed since it was last loaded.
    ///
    /// Death by neglect is checked first; a dead plant accrues no ticks.
    pub fn apply_load_checks(&mut self, now: i64) -> Vec<Transition> {
        let mut transitions = Vec::new();

        if !self.dead
            && let Some(watered) = self.watered_timestamp
        {
            let since = now.saturating_sub(watered);
            if since > DEATH_AFTER_SECS {
                self.dead = true;
                transitions.push(Transition::DiedOfNeglect {
                    hours_since_watered: since / 3_600,
                });
            }
        }

        let elapsed = now.saturating_sub(self.last_time).clamp(0, MAX_ACCRUAL_SECS);
        if !self.dead && elapsed > 0 {
            #[allow(clippy::cast_precision_loss)]
            let added = elapsed as f64 * self.growth_multiplier();
            self.ticks += added;
            transitions.push(Transition::TicksAccrued {
                seconds: elapsed,
                ticks: added,
            });
        }
        self.last_time = self.last_time.max(now);

        let stage = self.stage_for_ticks();
        if stage > self.stage {
            transitions.push(Transition::StageAdvanced {
                from: self.stage,
                to: stage,
            });
            self.stage = stage;
        }

        transitions
    }

    fn growth_multiplier(&self) -> f64 {
        0.2f64.mul_add(f64::from(self.generation.saturating_sub(1)), 1.0)
    }

    fn stage_for_ticks(&self) -> u8 {
        #[allow(clippy::cast_precision_loss)]
        let reached = LIFE_STAGES
            .iter()
            .take_while(|threshold| self.ticks >= **threshold as f64)
            .count();
        u8::try_from(reached).unwrap_or(u8::MAX)
    }

    #[must_use]
    pub fn stage_name(&self) -> &'static str {
        STAGE_NAMES
            .get(usize::from(self.stage))
            .copied()
            .unwrap_or("unknown")
    }

    /// Short description used by the mirror and the table, e.g. `seedling fern`.
    #[must_use]
    pub fn description(&self) -> String {
        if self.dead {
            format!("dead {}", self.species)
        } else {
            format!("{} {}", self.stage_name(), self.species)
        }
    }

    /// Age formatted as `Dd:Hh:Mm:Ss`.
    #[must_use]
    pub fn age_formatted(&self, now: i64) -> String {
        let age = now.saturating_sub(self.start_time).max(0);
        let (days, rest) = (age / SECONDS_PER_DAY, age % SECONDS_PER_DAY);
        let (hours, rest) = (rest / 3_600, rest % 3_600);
        let (minutes, seconds) = (rest / 60, rest % 60);
        format!("{days}d:{hours}h:{minutes}m:{seconds}s")
    }

    /// Integer score published to the read paths.
    #[must_use]
    pub fn score(&self) -> i64 {
        #[allow(clippy::cast_possible_truncation)]
        let score = self.ticks.trunc() as i64;
        score
    }
}
