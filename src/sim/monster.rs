//! Monster entity model
//!
//! A monster is a plain data record; the lifecycle rules that mutate it live
//! in `lifecycle`, and only the renderer cares about its shape.

use glam::{Vec2, Vec3};
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::difficulty;
use crate::consts::*;
use crate::tuning::Tuning;
use crate::{palette_color, polar_to_ground};

/// Stable monster identifier; doubles as the renderer's visual handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MonsterId(pub u32);

/// Scoring category, fixed at creation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    /// Colorful, worth a point
    Good,
    /// Black, costs points and ends the run if too many pile up
    Bad,
}

/// Lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MonsterState {
    /// Growing out of the ground
    Appearing,
    /// Fully grown, can be hit
    Active,
    /// Shrinking back into the ground
    Disappearing,
    /// Removed this tick
    Gone,
}

/// Body shape. The simulation only uses it to pick a hit volume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShapeKind {
    /// Sphere body, torus smile
    Blob,
    /// Box body, box mouth
    Cube,
    /// Four-sided cone body, torus smile
    Pyramid,
}

impl ShapeKind {
    pub const ALL: [ShapeKind; 3] = [ShapeKind::Blob, ShapeKind::Cube, ShapeKind::Pyramid];

    pub fn as_str(&self) -> &'static str {
        match self {
            ShapeKind::Blob => "blob",
            ShapeKind::Cube => "cube",
            ShapeKind::Pyramid => "pyramid",
        }
    }

    /// Collision volume in the monster's local frame
    pub fn hit_volume(&self) -> HitVolume {
        match self {
            ShapeKind::Blob => HitVolume::Sphere { radius: 1.2 },
            ShapeKind::Cube => HitVolume::Box { half_extent: 1.0 },
            ShapeKind::Pyramid => HitVolume::Sphere { radius: 1.0 },
        }
    }

    /// How much the mouth stretches at the top of a bounce
    fn mouth_stretch(&self) -> f32 {
        match self {
            ShapeKind::Cube => 2.0,
            ShapeKind::Blob | ShapeKind::Pyramid => 0.5,
        }
    }
}

/// Local-space collision volume (before scale and rotation)
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HitVolume {
    Sphere { radius: f32 },
    Box { half_extent: f32 },
}

/// A monster entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Monster {
    pub id: MonsterId,
    pub category: Category,
    pub shape: ShapeKind,
    pub state: MonsterState,
    /// Seconds spent in the current state
    pub state_time: f32,
    /// Growth factor in [0, 1]
    pub scale: f32,
    /// Seconds the monster stays Active
    pub lifespan: f32,
    /// Spawn point on the ground plane (x/z); y is derived from the state
    pub anchor: Vec3,
    pub is_bouncing: bool,
    /// Bounce phase in [0, π]
    pub bounce_factor: f32,
    pub bounce_height: f32,
    pub bounce_speed: f32,
    /// Pupil offset direction, magnitude ≤ 1
    pub eye_direction: Vec2,
    pub color_index: usize,
    /// Seconds-ish countdown until the next blink
    pub blink_timer: f32,
    pub eyes_closed: bool,
    /// Idle sway around the vertical axis (radians)
    pub rotation_y: f32,
}

impl Monster {
    /// Create a monster for the given category at the current difficulty
    pub fn spawn<R: Rng + ?Sized>(
        id: MonsterId,
        category: Category,
        difficulty: f32,
        tuning: &Tuning,
        rng: &mut R,
    ) -> Self {
        let shape = ShapeKind::ALL[rng.random_range(0..ShapeKind::ALL.len())];

        let theta = rng.random::<f32>() * std::f32::consts::TAU;
        let radius = tuning.spawn_radius_min
            + rng.random::<f32>() * (tuning.spawn_radius_max - tuning.spawn_radius_min);
        let anchor = polar_to_ground(radius, theta, GROUND_Y);

        let bounce_height = tuning.bounce_height_min + rng.random::<f32>() * tuning.bounce_height_jitter;
        let bounce_speed = tuning.bounce_speed_min + rng.random::<f32>() * tuning.bounce_speed_jitter;
        let color_index = rng.random_range(0..PALETTE.len());
        let eye_direction =
            Vec2::new(rng.random::<f32>() - 0.5, rng.random::<f32>() - 0.5).normalize_or_zero();
        let blink_timer = 1.0 + rng.random::<f32>() * 3.0;
        let lifespan = difficulty::base_lifespan(tuning, difficulty)
            + rng.random::<f32>() * tuning.lifespan_jitter;

        Self {
            id,
            category,
            shape,
            state: MonsterState::Appearing,
            state_time: 0.0,
            scale: tuning.spawn_scale,
            lifespan,
            anchor,
            is_bouncing: false,
            bounce_factor: 0.0,
            bounce_height,
            bounce_speed,
            eye_direction,
            color_index,
            blink_timer,
            eyes_closed: false,
            rotation_y: 0.0,
        }
    }

    /// Only Active monsters can be hit
    pub fn is_hittable(&self) -> bool {
        self.state == MonsterState::Active
    }

    /// Current body color
    pub fn color(&self) -> u32 {
        match self.category {
            Category::Good => palette_color(self.color_index),
            Category::Bad => BAD_COLOR,
        }
    }

    /// Move to a new state, resetting the state clock
    pub fn transition(&mut self, next: MonsterState) {
        self.state = next;
        self.state_time = 0.0;
    }

    /// Start a bounce from the bottom of the arc
    pub fn start_bounce(&mut self) {
        self.is_bouncing = true;
        self.bounce_factor = 0.0;
    }

    /// Vertical bounce progress, 0 when not bouncing
    fn bounce_wave(&self) -> f32 {
        if self.is_bouncing {
            self.bounce_factor.sin()
        } else {
            0.0
        }
    }

    /// Full visual pose for the renderer
    pub fn pose(&self) -> MonsterPose {
        match self.state {
            MonsterState::Active => {
                let wave = self.bounce_wave();
                let y = GROUND_Y + RISE_DISTANCE + wave * self.bounce_height;
                // Squash/stretch without dividing by scale: wide when high, thin on the way down
                let wide = self.scale * (1.0 + wave * SQUASH_AMOUNT);
                let tall = self.scale * (1.0 - wave * SQUASH_AMOUNT);
                MonsterPose {
                    position: Vec3::new(self.anchor.x, y, self.anchor.z),
                    scale: Vec3::new(wide, tall, wide),
                    rotation_y: self.rotation_y,
                    eye_offset: self.eye_direction * EYE_TRAVEL,
                    eyes_closed: self.eyes_closed,
                    mouth_stretch: 1.0 + wave * self.shape.mouth_stretch(),
                }
            }
            _ => MonsterPose {
                position: Vec3::new(
                    self.anchor.x,
                    GROUND_Y + self.scale * RISE_DISTANCE,
                    self.anchor.z,
                ),
                scale: Vec3::splat(self.scale),
                rotation_y: self.rotation_y,
                eye_offset: self.eye_direction * EYE_TRAVEL,
                eyes_closed: self.eyes_closed,
                mouth_stretch: 1.0,
            },
        }
    }
}

/// Everything the renderer needs to place one monster this frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonsterPose {
    pub position: Vec3,
    /// Per-axis scale (squash/stretch while bouncing)
    pub scale: Vec3,
    pub rotation_y: f32,
    /// Pupil displacement from its socket (x, z)
    pub eye_offset: Vec2,
    pub eyes_closed: bool,
    /// Mouth scale along its stretch axis
    pub mouth_stretch: f32,
}
