//! Fixed timestep simulation tick
//!
//! Core game loop that advances the session deterministically.

use rand::Rng;

use super::confetti;
use super::deferred::{DeferredAction, DeferredQueue, ticks_for};
use super::difficulty;
use super::lifecycle;
use super::monster::{Monster, MonsterState};
use super::spawn::run_scheduler;
use super::state::{GameEvent, GamePhase, GameState};
use crate::consts::BLINK_SECONDS;
use crate::tuning::Tuning;

/// Shared per-tick context for advancing a collection
struct StepContext<'a, R: Rng + ?Sized> {
    dt: f32,
    clock: f32,
    now: u64,
    tuning: &'a Tuning,
    rng: &'a mut R,
    deferred: &'a mut DeferredQueue,
    events: &'a mut Vec<GameEvent>,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, dt: f32) {
    state.time_ticks += 1;

    // Effects keep animating on the title and game-over screens
    confetti::update(&mut state.confetti);
    fire_deferred(state);

    if state.phase != GamePhase::Playing {
        return;
    }

    state.camera_angle += difficulty::camera_rotation_speed(&state.tuning, state.difficulty);

    run_scheduler(state, dt);

    let clock = state.clock();
    let mut ctx = StepContext {
        dt,
        clock,
        now: state.time_ticks,
        tuning: &state.tuning,
        rng: &mut state.rng,
        deferred: &mut state.deferred,
        events: &mut state.events,
    };
    advance_monsters(&mut state.good, &mut ctx);
    advance_monsters(&mut state.bad, &mut ctx);

    if state.bad.len() > state.tuning.max_bad_monsters {
        state.phase = GamePhase::GameOver;
        state.events.push(GameEvent::GameOver { score: state.score });
        state.events.push(GameEvent::AmbientStopped);
        log::info!(
            "Game over: {} bad monsters on the field, final score {}",
            state.bad.len(),
            state.score
        );
    }
}

/// Step every monster exactly once; Gone monsters leave the collection in the same pass
fn advance_monsters<R: Rng + ?Sized>(monsters: &mut Vec<Monster>, ctx: &mut StepContext<'_, R>) {
    monsters.retain_mut(|monster| {
        let outcome = lifecycle::step(monster, ctx.dt, ctx.clock, ctx.tuning, &mut *ctx.rng);
        if outcome.blinked {
            ctx.deferred.schedule(
                ctx.now,
                ticks_for(BLINK_SECONDS, ctx.dt),
                monster.id,
                DeferredAction::OpenEyes,
            );
        }
        if outcome.gone {
            ctx.events.push(GameEvent::MonsterRemoved { id: monster.id });
            return false;
        }
        true
    });
}

/// Apply due deferred effects to monsters that still exist
fn fire_deferred(state: &mut GameState) {
    for deferred in state.deferred.take_due(state.time_ticks) {
        match state.monster_mut(deferred.target) {
            Some(monster) if monster.state != MonsterState::Gone => match deferred.action {
                DeferredAction::OpenEyes => monster.eyes_closed = false,
            },
            _ => log::trace!(
                "Dropping {:?} for departed monster {}",
                deferred.action,
                deferred.target.0
            ),
        }
    }
}
