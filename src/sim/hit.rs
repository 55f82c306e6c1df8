//! Hit-testing and scoring
//!
//! A screen activation becomes a camera ray; good monsters are checked before
//! bad ones and the nearest Active monster in the first matching group wins.

use glam::{Mat3, Vec2, Vec3};

use super::camera::{Camera, Ray, Viewport};
use super::difficulty;
use super::monster::{Category, HitVolume, Monster, MonsterId, MonsterState};
use super::state::{Cue, GameEvent, GamePhase, GameState};
use crate::consts::{BOUNCE_VOICES, PALETTE};

/// Result of one activation
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HitOutcome {
    /// Good monster hit; score went up by one
    Good { id: MonsterId, score: u32 },
    /// Bad monster hit; score penalized
    Bad { id: MonsterId, score: u32 },
    /// A good monster was under the pointer but was already bouncing
    Ignored { id: MonsterId },
    /// Nothing hittable under the pointer
    Miss,
    /// Session not in play
    Inactive,
}

/// Ray parameter of the first intersection with a monster's hit volume
pub fn ray_hits_monster(ray: &Ray, monster: &Monster) -> Option<f32> {
    let pose = monster.pose();
    if pose.scale.min_element() <= f32::EPSILON {
        return None;
    }

    // Into the monster's local frame: undo translation, rotation, then scale.
    // Direction stays unnormalized so t is still a world distance.
    let unrotate = Mat3::from_rotation_y(-pose.rotation_y);
    let origin = unrotate * (ray.origin - pose.position) / pose.scale;
    let dir = unrotate * ray.dir / pose.scale;

    match monster.shape.hit_volume() {
        HitVolume::Sphere { radius } => ray_sphere(origin, dir, radius),
        HitVolume::Box { half_extent } => ray_box(origin, dir, half_extent),
    }
}

/// Ray vs origin-centered sphere
fn ray_sphere(origin: Vec3, dir: Vec3, radius: f32) -> Option<f32> {
    let a = dir.length_squared();
    if a <= f32::EPSILON {
        return None;
    }
    let b = 2.0 * origin.dot(dir);
    let c = origin.length_squared() - radius * radius;
    let disc = b * b - 4.0 * a * c;
    if disc < 0.0 {
        return None;
    }
    let sqrt_disc = disc.sqrt();
    let near = (-b - sqrt_disc) / (2.0 * a);
    let far = (-b + sqrt_disc) / (2.0 * a);
    if near >= 0.0 {
        Some(near)
    } else if far >= 0.0 {
        Some(far)
    } else {
        None
    }
}

/// Ray vs origin-centered cube (slab test)
fn ray_box(origin: Vec3, dir: Vec3, half_extent: f32) -> Option<f32> {
    let mut t_min = f32::NEG_INFINITY;
    let mut t_max = f32::INFINITY;
    for axis in 0..3 {
        let o = origin[axis];
        let d = dir[axis];
        if d.abs() <= f32::EPSILON {
            if o.abs() > half_extent {
                return None;
            }
            continue;
        }
        let t1 = (-half_extent - o) / d;
        let t2 = (half_extent - o) / d;
        t_min = t_min.max(t1.min(t2));
        t_max = t_max.min(t1.max(t2));
        if t_min > t_max {
            return None;
        }
    }
    if t_max < 0.0 {
        None
    } else {
        Some(t_min.max(0.0))
    }
}

/// Nearest hittable monster in a collection: (index, distance)
fn nearest_hit(ray: &Ray, monsters: &[Monster]) -> Option<(usize, f32)> {
    monsters
        .iter()
        .enumerate()
        .filter(|(_, m)| m.is_hittable())
        .filter_map(|(i, m)| ray_hits_monster(ray, m).map(|t| (i, t)))
        .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
}

/// Handle a screen activation at pixel `screen`
pub fn activate(state: &mut GameState, screen: Vec2, viewport: Viewport) -> HitOutcome {
    if state.phase != GamePhase::Playing {
        return HitOutcome::Inactive;
    }
    let camera = Camera::orbit(state.camera_angle, viewport.aspect());
    let ray = camera.ray_through(viewport.to_ndc(screen));
    resolve_ray(state, &ray)
}

/// Apply scoring for whatever `ray` hits first
pub fn resolve_ray(state: &mut GameState, ray: &Ray) -> HitOutcome {
    if state.phase != GamePhase::Playing {
        return HitOutcome::Inactive;
    }
    if let Some((index, t)) = nearest_hit(ray, &state.good) {
        log::trace!("ray meets good monster at {:?}", ray.at(t));
        return hit_good(state, index);
    }
    if let Some((index, t)) = nearest_hit(ray, &state.bad) {
        log::trace!("ray meets bad monster at {:?}", ray.at(t));
        return hit_bad(state, index);
    }
    HitOutcome::Miss
}

fn hit_good(state: &mut GameState, index: usize) -> HitOutcome {
    let monster = &mut state.good[index];
    if monster.is_bouncing {
        return HitOutcome::Ignored { id: monster.id };
    }

    monster.start_bounce();
    monster.color_index = (monster.color_index + 1) % PALETTE.len();
    monster.transition(MonsterState::Disappearing);
    let id = monster.id;
    let color = monster.color();
    let origin = monster.pose().position;

    state.events.push(GameEvent::Cue(Cue::Bounce {
        voice: (index % BOUNCE_VOICES) as u8,
    }));
    state.events.push(GameEvent::MonsterRecolored { id, color });

    state.score += 1;
    state.events.push(GameEvent::ScoreChanged(state.score));

    // Never drops within a session, even after a bad-hit penalty
    let difficulty = difficulty::difficulty_for_score(&state.tuning, state.score).max(state.difficulty);
    if difficulty != state.difficulty {
        log::info!(
            "Difficulty {} -> {} (spawn every {:.2}s, bad chance {:.0}%)",
            state.difficulty,
            difficulty,
            difficulty::spawn_interval(&state.tuning, difficulty),
            difficulty::bad_chance(&state.tuning, difficulty) * 100.0
        );
        state.events.push(GameEvent::DifficultyChanged(difficulty));
    }
    state.difficulty = difficulty;

    if state.score % state.tuning.milestone_every.max(1) == 0 {
        let (count, life) = (state.tuning.confetti_count, state.tuning.confetti_life);
        let burst = super::confetti::burst(origin, count, life, state.rng_mut());
        state.confetti.extend(burst);
        state.events.push(GameEvent::ConfettiBurst { origin });
        state.events.push(GameEvent::Cue(Cue::Cheer));
    }

    log::debug!("Good hit on {} -> score {}", id.0, state.score);
    HitOutcome::Good {
        id,
        score: state.score,
    }
}

fn hit_bad(state: &mut GameState, index: usize) -> HitOutcome {
    let monster = &mut state.bad[index];
    monster.start_bounce();
    monster.bounce_speed *= 2.0;
    monster.transition(MonsterState::Disappearing);
    let id = monster.id;

    state.score = state.score.saturating_sub(state.tuning.bad_penalty);
    state.events.push(GameEvent::Cue(Cue::Wrong));
    state.events.push(GameEvent::ScoreChanged(state.score));

    log::debug!("Bad hit on {} -> score {}", id.0, state.score);
    HitOutcome::Bad {
        id,
        score: state.score,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::monster::ShapeKind;
    use crate::tuning::Tuning;

    const VIEWPORT: Viewport = Viewport {
        width: 1280.0,
        height: 720.0,
    };

    /// Playing session with no monsters
    fn empty_session() -> GameState {
        let mut state = GameState::new(2024, Tuning::default());
        state.start();
        state.good.clear();
        state.drain_events();
        state
    }

    /// Spawn a fully grown monster at a fixed ground point
    fn place(state: &mut GameState, category: Category, shape: ShapeKind, x: f32, z: f32) -> MonsterId {
        let id = state.spawn_monster(category).unwrap();
        let m = state.monster_mut(id).unwrap();
        m.shape = shape;
        m.anchor = Vec3::new(x, m.anchor.y, z);
        m.scale = 1.0;
        m.rotation_y = 0.0;
        m.transition(MonsterState::Active);
        state.drain_events();
        id
    }

    fn screen_of(state: &GameState, id: MonsterId) -> Vec2 {
        let cam = Camera::orbit(state.camera_angle, VIEWPORT.aspect());
        let ndc = cam.project(state.monster(id).unwrap().pose().position).unwrap();
        VIEWPORT.to_screen(ndc)
    }

    #[test]
    fn test_good_hit_scores_once() {
        let mut state = empty_session();
        let id = place(&mut state, Category::Good, ShapeKind::Blob, 0.0, -4.0);
        let color_before = state.monster(id).unwrap().color_index;
        let point = screen_of(&state, id);

        let outcome = activate(&mut state, point, VIEWPORT);
        assert_eq!(outcome, HitOutcome::Good { id, score: 1 });
        let m = state.monster(id).unwrap();
        assert_eq!(m.state, MonsterState::Disappearing);
        assert!(m.is_bouncing);
        assert_eq!(m.color_index, (color_before + 1) % PALETTE.len());

        let events = state.drain_events();
        assert!(events.contains(&GameEvent::ScoreChanged(1)));
        assert!(events.iter().any(|e| matches!(e, GameEvent::Cue(Cue::Bounce { .. }))));
        assert!(events.iter().any(|e| matches!(e, GameEvent::MonsterRecolored { .. })));

        // No longer Active: second tap does nothing
        assert_eq!(activate(&mut state, point, VIEWPORT), HitOutcome::Miss);
        assert_eq!(state.score, 1);
    }

    #[test]
    fn test_bouncing_good_monster_is_ignored() {
        let mut state = empty_session();
        let id = place(&mut state, Category::Good, ShapeKind::Cube, 1.0, -5.0);
        state.monster_mut(id).unwrap().start_bounce();
        let point = screen_of(&state, id);
        // Bad monster on the same line of sight must not be checked
        place(&mut state, Category::Bad, ShapeKind::Blob, 1.0, -5.0);

        let outcome = activate(&mut state, point, VIEWPORT);
        assert_eq!(outcome, HitOutcome::Ignored { id });
        assert_eq!(state.score, 0);
        assert_eq!(state.monster(id).unwrap().state, MonsterState::Active);
        assert!(state.bad.iter().all(|m| m.state == MonsterState::Active));
    }

    /// Horizontal ray down the -Z axis at monster head height
    fn axis_ray() -> Ray {
        Ray {
            origin: Vec3::new(0.0, 0.0, 10.0),
            dir: Vec3::NEG_Z,
        }
    }

    #[test]
    fn test_good_checked_before_bad() {
        let mut state = empty_session();
        // Bad monster nearer along the ray, good one behind it
        let bad = place(&mut state, Category::Bad, ShapeKind::Blob, 0.0, 3.0);
        let good = place(&mut state, Category::Good, ShapeKind::Cube, 0.0, -5.0);

        let outcome = resolve_ray(&mut state, &axis_ray());
        assert_eq!(outcome, HitOutcome::Good { id: good, score: 1 });
        assert_eq!(state.monster(bad).unwrap().state, MonsterState::Active);
    }

    #[test]
    fn test_nearest_good_wins() {
        let mut state = empty_session();
        let far = place(&mut state, Category::Good, ShapeKind::Blob, 0.0, -5.0);
        let near = place(&mut state, Category::Good, ShapeKind::Pyramid, 0.0, 2.0);

        let ray = axis_ray();
        let t_near = ray_hits_monster(&ray, state.monster(near).unwrap()).unwrap();
        let t_far = ray_hits_monster(&ray, state.monster(far).unwrap()).unwrap();
        assert!(t_near < t_far);

        assert_eq!(resolve_ray(&mut state, &ray), HitOutcome::Good { id: near, score: 1 });
        assert_eq!(state.monster(far).unwrap().state, MonsterState::Active);
    }

    #[test]
    fn test_rotated_cube_volume() {
        let mut state = empty_session();
        let id = place(&mut state, Category::Good, ShapeKind::Cube, 0.0, 0.0);
        // Corner of the box at 45° reaches ~1.41 off-axis
        let ray = Ray {
            origin: Vec3::new(1.3, 0.0, 10.0),
            dir: Vec3::NEG_Z,
        };
        assert!(ray_hits_monster(&ray, state.monster(id).unwrap()).is_none());
        state.monster_mut(id).unwrap().rotation_y = std::f32::consts::FRAC_PI_4;
        assert!(ray_hits_monster(&ray, state.monster(id).unwrap()).is_some());
    }

    #[test]
    fn test_bad_hit_penalizes_and_floors_at_zero() {
        let mut state = empty_session();
        state.score = 1;
        let a = place(&mut state, Category::Bad, ShapeKind::Pyramid, -1.0, -4.0);
        let speed = state.monster(a).unwrap().bounce_speed;
        let point = screen_of(&state, a);

        assert_eq!(activate(&mut state, point, VIEWPORT), HitOutcome::Bad { id: a, score: 0 });
        let m = state.monster(a).unwrap();
        assert_eq!(m.state, MonsterState::Disappearing);
        assert!(m.is_bouncing);
        assert!((m.bounce_speed - speed * 2.0).abs() < 1e-6);
        assert_eq!(state.difficulty, 1.0);
        assert!(state.drain_events().contains(&GameEvent::Cue(Cue::Wrong)));

        let b = place(&mut state, Category::Bad, ShapeKind::Blob, 2.0, -5.0);
        let point = screen_of(&state, b);
        assert_eq!(activate(&mut state, point, VIEWPORT), HitOutcome::Bad { id: b, score: 0 });
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_bad_hit_keeps_difficulty() {
        let mut state = empty_session();
        state.score = 10;
        state.difficulty = 1.5;
        let a = place(&mut state, Category::Bad, ShapeKind::Blob, 0.0, -4.0);
        let point = screen_of(&state, a);
        activate(&mut state, point, VIEWPORT);
        assert_eq!(state.score, 8);
        assert_eq!(state.difficulty, 1.5);
    }

    #[test]
    fn test_difficulty_holds_after_penalty() {
        let mut state = empty_session();
        state.score = 10;
        state.difficulty = 1.5;
        let bad = place(&mut state, Category::Bad, ShapeKind::Blob, 0.0, -4.0);
        let point = screen_of(&state, bad);
        assert_eq!(activate(&mut state, point, VIEWPORT), HitOutcome::Bad { id: bad, score: 8 });

        let good = place(&mut state, Category::Good, ShapeKind::Cube, 2.0, -5.0);
        let point = screen_of(&state, good);
        assert_eq!(activate(&mut state, point, VIEWPORT), HitOutcome::Good { id: good, score: 9 });
        assert_eq!(state.difficulty, 1.5);
        assert!(
            !state
                .drain_events()
                .iter()
                .any(|e| matches!(e, GameEvent::DifficultyChanged(_)))
        );
    }

    #[test]
    fn test_color_index_wraps_palette() {
        let mut state = empty_session();
        let id = place(&mut state, Category::Good, ShapeKind::Blob, 0.0, -4.0);
        state.monster_mut(id).unwrap().color_index = PALETTE.len() - 1;
        let point = screen_of(&state, id);
        activate(&mut state, point, VIEWPORT);
        let m = state.monster(id).unwrap();
        assert_eq!(m.color_index, 0);
        assert_eq!(m.color(), PALETTE[0]);
    }

    #[test]
    fn test_milestone_confetti_and_difficulty() {
        let mut state = empty_session();
        state.score = 9;
        let id = place(&mut state, Category::Good, ShapeKind::Blob, 0.0, -4.0);
        let point = screen_of(&state, id);

        assert_eq!(activate(&mut state, point, VIEWPORT), HitOutcome::Good { id, score: 10 });
        assert_eq!(state.difficulty, 1.5);
        assert_eq!(state.confetti.len(), 50);
        let events = state.drain_events();
        assert!(events.contains(&GameEvent::Cue(Cue::Cheer)));
        assert!(events.contains(&GameEvent::DifficultyChanged(1.5)));
        assert!(events.iter().any(|e| matches!(e, GameEvent::ConfettiBurst { .. })));
    }

    #[test]
    fn test_only_active_monsters_hittable() {
        let mut state = empty_session();
        let id = place(&mut state, Category::Good, ShapeKind::Blob, 0.0, -4.0);
        let point = screen_of(&state, id);
        state.monster_mut(id).unwrap().transition(MonsterState::Appearing);
        assert_eq!(activate(&mut state, point, VIEWPORT), HitOutcome::Miss);
        state.monster_mut(id).unwrap().transition(MonsterState::Disappearing);
        assert_eq!(activate(&mut state, point, VIEWPORT), HitOutcome::Miss);
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_empty_sky_is_miss() {
        let mut state = empty_session();
        place(&mut state, Category::Good, ShapeKind::Blob, 0.0, -4.0);
        assert_eq!(activate(&mut state, Vec2::new(5.0, 5.0), VIEWPORT), HitOutcome::Miss);
    }

    #[test]
    fn test_inactive_outside_play() {
        let mut state = GameState::new(1, Tuning::default());
        assert_eq!(activate(&mut state, Vec2::ZERO, VIEWPORT), HitOutcome::Inactive);
        state.start();
        state.phase = GamePhase::GameOver;
        assert_eq!(activate(&mut state, Vec2::ZERO, VIEWPORT), HitOutcome::Inactive);
    }

    #[test]
    fn test_ray_volumes() {
        let ray = Ray {
            origin: Vec3::new(0.0, 0.0, 10.0),
            dir: Vec3::NEG_Z,
        };
        assert!((ray_sphere(ray.origin, ray.dir, 1.2).unwrap() - 8.8).abs() < 1e-4);
        assert!((ray_box(ray.origin, ray.dir, 1.0).unwrap() - 9.0).abs() < 1e-4);

        let off = Vec3::new(1.5, 0.0, 10.0);
        assert!(ray_sphere(off, ray.dir, 1.2).is_none());
        assert!(ray_box(off, ray.dir, 1.0).is_none());

        // Pointing away
        assert!(ray_sphere(ray.origin, Vec3::Z, 1.2).is_none());
        assert!(ray_box(ray.origin, Vec3::Z, 1.0).is_none());
    }
}
