//! Per-tick monster state machine
//!
//! Appearing → Active → Disappearing → Gone. Growth and shrink are per tick,
//! the Active timer is in seconds.

use rand::Rng;

use super::monster::{Monster, MonsterState};
use crate::consts::*;
use crate::tuning::Tuning;

/// What happened to a monster during one step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepOutcome {
    /// Monster reached Gone and must leave its collection and the scene
    pub gone: bool,
    /// Eyes just closed; the caller schedules them to reopen
    pub blinked: bool,
}

/// Advance one monster by one tick
///
/// `clock` is the session time in seconds, used only for the idle sway.
pub fn step<R: Rng + ?Sized>(
    monster: &mut Monster,
    dt: f32,
    clock: f32,
    tuning: &Tuning,
    rng: &mut R,
) -> StepOutcome {
    let mut outcome = StepOutcome::default();
    monster.state_time += dt;

    match monster.state {
        MonsterState::Appearing => {
            monster.scale += tuning.grow_per_tick;
            if monster.scale >= 1.0 {
                monster.scale = 1.0;
                monster.transition(MonsterState::Active);
            }
        }

        MonsterState::Active => {
            if monster.state_time >= monster.lifespan {
                monster.transition(MonsterState::Disappearing);
            }

            if monster.is_bouncing {
                monster.bounce_factor += monster.bounce_speed;
                if monster.bounce_factor >= std::f32::consts::PI {
                    monster.bounce_factor = 0.0;
                    monster.is_bouncing = false;
                }
            }

            outcome.blinked = animate_face(monster, rng);
            monster.rotation_y += clock.sin() * IDLE_SWAY;
        }

        MonsterState::Disappearing => {
            monster.scale -= tuning.shrink_per_tick;
            if monster.scale <= 0.0 {
                monster.scale = 0.0;
                monster.transition(MonsterState::Gone);
                outcome.gone = true;
            }
        }

        // Never stored; removal happens in the same tick as the transition
        MonsterState::Gone => outcome.gone = true,
    }

    outcome
}

/// One pupil's random nudge, kept inside the unit circle
fn jitter_eyes<R: Rng + ?Sized>(monster: &mut Monster, rng: &mut R) {
    monster.eye_direction.x += (rng.random::<f32>() - 0.5) * 2.0 * EYE_JITTER;
    monster.eye_direction.y += (rng.random::<f32>() - 0.5) * 2.0 * EYE_JITTER;
    if monster.eye_direction.length() > 1.0 {
        monster.eye_direction = monster.eye_direction.normalize();
    }
}

/// Pupil jitter and blink countdown. Returns true when a blink starts.
fn animate_face<R: Rng + ?Sized>(monster: &mut Monster, rng: &mut R) -> bool {
    // Both pupils share one look direction but each nudges it
    for _ in 0..PUPILS {
        jitter_eyes(monster, rng);
    }

    monster.blink_timer -= BLINK_DRAIN_PER_TICK;
    if monster.blink_timer <= 0.0 {
        monster.blink_timer = 1.0 + rng.random::<f32>() * 3.0;
        monster.eyes_closed = true;
        return true;
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::monster::{Category, MonsterId};
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn fresh(rng: &mut Pcg32) -> Monster {
        Monster::spawn(MonsterId(1), Category::Good, 1.0, &Tuning::default(), rng)
    }

    #[test]
    fn test_scale_trajectory() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(1);
        let mut m = fresh(&mut rng);
        m.lifespan = 100.0;
        assert_eq!(m.scale, 0.01);

        let mut ticks = 0;
        while m.state == MonsterState::Appearing {
            let before = m.scale;
            step(&mut m, SIM_DT, 0.0, &tuning, &mut rng);
            ticks += 1;
            if m.state == MonsterState::Appearing {
                assert!((m.scale - before - 0.05).abs() < 1e-5);
            }
        }
        assert!(ticks <= 20, "took {ticks} ticks");
        assert_eq!(m.state, MonsterState::Active);
        assert_eq!(m.scale, 1.0);
        assert_eq!(m.state_time, 0.0);

        // Clamped while active
        for _ in 0..120 {
            step(&mut m, SIM_DT, 0.0, &tuning, &mut rng);
            assert_eq!(m.scale, 1.0);
        }
        assert_eq!(m.state, MonsterState::Active);
    }

    #[test]
    fn test_lifespan_expiry_then_gone() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(2);
        let mut m = fresh(&mut rng);
        m.transition(MonsterState::Active);
        m.scale = 1.0;
        m.lifespan = 0.5;

        let mut ticks = 0;
        while m.state == MonsterState::Active {
            step(&mut m, SIM_DT, 0.0, &tuning, &mut rng);
            ticks += 1;
        }
        // 0.5s at 60 Hz
        assert!((30..=31).contains(&ticks), "expired after {ticks} ticks");
        assert_eq!(m.state, MonsterState::Disappearing);

        let mut gone = false;
        for _ in 0..25 {
            if step(&mut m, SIM_DT, 0.0, &tuning, &mut rng).gone {
                gone = true;
                break;
            }
        }
        assert!(gone);
        assert_eq!(m.state, MonsterState::Gone);
        assert_eq!(m.scale, 0.0);
    }

    #[test]
    fn test_bounce_completes_at_pi() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(3);
        let mut m = fresh(&mut rng);
        m.transition(MonsterState::Active);
        m.scale = 1.0;
        m.lifespan = 100.0;
        m.bounce_speed = 0.1;
        m.start_bounce();

        let mut ticks = 0;
        while m.is_bouncing {
            step(&mut m, SIM_DT, 0.0, &tuning, &mut rng);
            assert!(m.bounce_factor <= std::f32::consts::PI);
            ticks += 1;
            assert!(ticks < 100);
        }
        assert_eq!(ticks, 32);
        assert_eq!(m.bounce_factor, 0.0);
    }

    #[test]
    fn test_eyes_stay_in_unit_circle() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(4);
        let mut m = fresh(&mut rng);
        m.transition(MonsterState::Active);
        m.lifespan = 1000.0;
        for _ in 0..5000 {
            step(&mut m, SIM_DT, 0.0, &tuning, &mut rng);
            assert!(m.eye_direction.length() <= 1.0 + 1e-5);
        }
    }

    #[test]
    fn test_blink_fires() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(5);
        let mut m = fresh(&mut rng);
        m.transition(MonsterState::Active);
        m.lifespan = 1000.0;
        m.blink_timer = 0.03;

        assert!(!step(&mut m, SIM_DT, 0.0, &tuning, &mut rng).blinked);
        assert!(step(&mut m, SIM_DT, 0.0, &tuning, &mut rng).blinked);
        assert!(m.eyes_closed);
        assert!((1.0..=4.0).contains(&m.blink_timer));
    }

    #[test]
    fn test_cosmetics_frozen_outside_active() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(6);
        let mut m = fresh(&mut rng);
        let eyes = m.eye_direction;
        step(&mut m, SIM_DT, 1.0, &tuning, &mut rng);
        assert_eq!(m.eye_direction, eyes);
        assert_eq!(m.rotation_y, 0.0);
    }

    #[test]
    fn test_eyes_jitter_once_per_pupil() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(21);
        let mut m = fresh(&mut rng);
        m.transition(MonsterState::Active);
        m.scale = 1.0;
        m.lifespan = 100.0;
        m.blink_timer = 10.0;

        let mut expected = m.clone();
        let mut replay = rng.clone();
        for _ in 0..PUPILS {
            jitter_eyes(&mut expected, &mut replay);
        }
        let mut single = m.clone();
        jitter_eyes(&mut single, &mut rng.clone());

        step(&mut m, SIM_DT, 0.0, &tuning, &mut rng);
        assert_eq!(m.eye_direction, expected.eye_direction);
        assert_ne!(m.eye_direction, single.eye_direction);
        // Both generators consumed the same draws
        assert_eq!(rng.random::<u32>(), replay.random::<u32>());
    }
}
