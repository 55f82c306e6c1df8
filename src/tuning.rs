//! Data-driven game balance
//!
//! Every gameplay constant lives here so a host page can override a subset
//! from JSON. `Tuning::default()` is the shipped balance.

use serde::{Deserialize, Serialize};

/// Game balance knobs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Session ===
    /// Good monsters spawned when a session starts
    pub initial_monsters: u32,
    /// Game ends once more than this many bad monsters are on the field
    pub max_bad_monsters: usize,

    // === Difficulty ===
    /// Points needed per difficulty level
    pub points_per_level: u32,
    /// Difficulty gained per level
    pub difficulty_step: f32,
    /// Difficulty ceiling (floor is always 1.0)
    pub max_difficulty: f32,

    // === Spawning ===
    /// Seconds between spawns at difficulty 1
    pub base_spawn_time: f32,
    /// Seconds between spawns at max difficulty
    pub min_spawn_time: f32,
    /// Bad monster chance at difficulty 1
    pub bad_chance_base: f32,
    /// Bad monster chance added per difficulty point
    pub bad_chance_step: f32,
    /// Bad monster chance ceiling
    pub bad_chance_max: f32,
    /// Spawn annulus around the scene origin
    pub spawn_radius_min: f32,
    pub spawn_radius_max: f32,

    // === Monster lifecycle ===
    /// Active lifetime at difficulty 1 (seconds, before jitter)
    pub base_lifespan: f32,
    /// Active lifetime at max difficulty (seconds, before jitter)
    pub min_lifespan: f32,
    /// Uniform jitter added on top of the lifespan (seconds)
    pub lifespan_jitter: f32,
    /// Scale gained per tick while appearing
    pub grow_per_tick: f32,
    /// Scale lost per tick while disappearing
    pub shrink_per_tick: f32,
    /// Scale a freshly spawned monster starts at
    pub spawn_scale: f32,
    pub bounce_height_min: f32,
    pub bounce_height_jitter: f32,
    pub bounce_speed_min: f32,
    pub bounce_speed_jitter: f32,

    // === Scoring ===
    /// Points lost when hitting a bad monster
    pub bad_penalty: u32,
    /// Confetti + cheer every N points
    pub milestone_every: u32,

    // === Camera ===
    /// Orbit speed at difficulty 1 (radians per tick)
    pub base_rotation_speed: f32,
    /// Orbit speed added per difficulty point
    pub rotation_speed_step: f32,

    // === Effects ===
    pub confetti_count: usize,
    /// Confetti lifetime in ticks
    pub confetti_life: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            initial_monsters: 3,
            max_bad_monsters: 5,

            points_per_level: 10,
            difficulty_step: 0.5,
            max_difficulty: 5.0,

            base_spawn_time: 2.5,
            min_spawn_time: 0.8,
            bad_chance_base: 0.05,
            bad_chance_step: 0.05,
            bad_chance_max: 0.3,
            spawn_radius_min: 4.0,
            spawn_radius_max: 7.0,

            base_lifespan: 5.0,
            min_lifespan: 1.5,
            lifespan_jitter: 1.0,
            grow_per_tick: 0.05,
            shrink_per_tick: 0.05,
            spawn_scale: 0.01,
            bounce_height_min: 1.5,
            bounce_height_jitter: 1.0,
            bounce_speed_min: 0.05,
            bounce_speed_jitter: 0.05,

            bad_penalty: 2,
            milestone_every: 10,

            base_rotation_speed: 0.002,
            rotation_speed_step: 0.002,

            confetti_count: 50,
            confetti_life: 100,
        }
    }
}

impl Tuning {
    /// Parse overrides from JSON; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let tuning: Tuning = serde_json::from_str(json)?;
        Ok(tuning.validated())
    }

    /// Serialize to pretty JSON; the headless demo logs the effective values
    /// so they can be saved as a `MONSTER_WHACK_TUNING` file
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Repair values that would break the difficulty curves
    pub fn validated(mut self) -> Self {
        if self.max_difficulty.is_nan() || self.max_difficulty < 1.0 {
            log::warn!("max_difficulty {} < 1, clamping", self.max_difficulty);
            self.max_difficulty = 1.0;
        }
        if self.points_per_level == 0 {
            log::warn!("points_per_level is 0, using 1");
            self.points_per_level = 1;
        }
        if self.milestone_every == 0 {
            log::warn!("milestone_every is 0, using 1");
            self.milestone_every = 1;
        }
        if self.min_spawn_time > self.base_spawn_time {
            log::warn!(
                "min_spawn_time {} > base_spawn_time {}, swapping",
                self.min_spawn_time,
                self.base_spawn_time
            );
            std::mem::swap(&mut self.min_spawn_time, &mut self.base_spawn_time);
        }
        if self.min_lifespan > self.base_lifespan {
            log::warn!(
                "min_lifespan {} > base_lifespan {}, swapping",
                self.min_lifespan,
                self.base_lifespan
            );
            std::mem::swap(&mut self.min_lifespan, &mut self.base_lifespan);
        }
        if self.spawn_radius_min > self.spawn_radius_max {
            std::mem::swap(&mut self.spawn_radius_min, &mut self.spawn_radius_max);
        }
        self.bad_chance_max = self.bad_chance_max.clamp(0.0, 1.0);
        self.grow_per_tick = self.grow_per_tick.max(f32::EPSILON);
        self.shrink_per_tick = self.shrink_per_tick.max(f32::EPSILON);
        self.spawn_scale = self.spawn_scale.clamp(0.0, 1.0);
        self
    }
}
