//! Spawn scheduler
//!
//! Counts down between spawns; every expiry rolls good/bad at the current
//! difficulty and rearms the timer with a shorter interval as difficulty rises.

use super::difficulty;
use super::monster::{Category, MonsterId};
use super::state::{GamePhase, GameState};

/// Advance the spawn timer by `dt`, spawning at most one monster
pub fn run_scheduler(state: &mut GameState, dt: f32) -> Option<MonsterId> {
    if state.phase != GamePhase::Playing {
        return None;
    }

    state.spawn_timer -= dt;
    if state.spawn_timer > 0.0 {
        return None;
    }

    let chance = difficulty::bad_chance(&state.tuning, state.difficulty);
    let category = if state.roll(chance) {
        Category::Bad
    } else {
        Category::Good
    };
    let id = state.spawn_monster(category);
    state.spawn_timer = difficulty::spawn_interval(&state.tuning, state.difficulty);
    id
}
