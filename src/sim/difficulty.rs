//! Difficulty curves
//!
//! Difficulty is derived from score alone and drives spawn rate, lifespan,
//! bad-monster odds and camera speed.

use crate::tuning::Tuning;

/// Difficulty for a score: `min(max, 1 + floor(score / level) * step)`
pub fn difficulty_for_score(tuning: &Tuning, score: u32) -> f32 {
    let levels = (score / tuning.points_per_level.max(1)) as f32;
    (1.0 + levels * tuning.difficulty_step).min(tuning.max_difficulty)
}

/// How far along the curve a difficulty is, 0 at difficulty 1 and 1 at the ceiling
pub fn progress(tuning: &Tuning, difficulty: f32) -> f32 {
    let span = tuning.max_difficulty - 1.0;
    if span <= 0.0 {
        return 0.0;
    }
    ((difficulty - 1.0) / span).clamp(0.0, 1.0)
}

/// Seconds until the next spawn
pub fn spawn_interval(tuning: &Tuning, difficulty: f32) -> f32 {
    let reduction = (tuning.base_spawn_time - tuning.min_spawn_time) * progress(tuning, difficulty);
    tuning.base_spawn_time - reduction
}

/// Active lifetime before jitter
pub fn base_lifespan(tuning: &Tuning, difficulty: f32) -> f32 {
    let reduction = (tuning.base_lifespan - tuning.min_lifespan) * progress(tuning, difficulty);
    tuning.base_lifespan - reduction
}

/// Probability that a scheduled spawn is a bad monster
pub fn bad_chance(tuning: &Tuning, difficulty: f32) -> f32 {
    let chance = tuning.bad_chance_base + (difficulty - 1.0).max(0.0) * tuning.bad_chance_step;
    chance.min(tuning.bad_chance_max)
}

/// Camera orbit speed (radians per tick)
pub fn camera_rotation_speed(tuning: &Tuning, difficulty: f32) -> f32 {
    tuning.base_rotation_speed + (difficulty - 1.0).max(0.0) * tuning.rotation_speed_step
}
