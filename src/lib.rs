//! Monster Whack - tap the colorful monsters, dodge the black ones
//!
//! Core modules:
//! - `sim`: Deterministic simulation (monster lifecycle, spawning, hit-testing, scoring)
//! - `game`: Session controller wiring the simulation to its collaborators
//! - `platform`: Renderer/audio/UI collaborator contracts
//! - `tuning`: Data-driven game balance
//! - `audio`, `web`: Browser implementations of the collaborators (wasm32 only)

#[cfg(target_arch = "wasm32")]
pub mod audio;
pub mod game;
pub mod platform;
pub mod sim;
pub mod tuning;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use game::Game;
pub use tuning::Tuning;

use glam::{Vec2, Vec3};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (one logical tick per 60 Hz frame)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Ground plane height; monsters rise out of it
    pub const GROUND_Y: f32 = -2.0;
    /// Distance a fully grown monster stands above the ground
    pub const RISE_DISTANCE: f32 = 2.0;

    /// Camera orbit
    pub const CAMERA_RADIUS: f32 = 10.0;
    pub const CAMERA_HEIGHT: f32 = 5.0;
    pub const CAMERA_FOV_Y_DEGREES: f32 = 70.0;
    pub const CAMERA_NEAR: f32 = 0.1;
    pub const CAMERA_FAR: f32 = 1000.0;

    /// Monster palette (good monsters cycle through it on every hit)
    pub const PALETTE: [u32; 6] = [
        0xff6b6b, // Red
        0x48dbfb, // Blue
        0x1dd1a1, // Green
        0xfeca57, // Yellow
        0x6c5ce7, // Purple
        0xfd79a8, // Pink
    ];
    /// Bad monsters are always black
    pub const BAD_COLOR: u32 = 0x000000;

    /// Number of distinct bounce pitches
    pub const BOUNCE_VOICES: usize = 5;

    /// Eyes stay shut this long after a blink starts (seconds)
    pub const BLINK_SECONDS: f32 = 0.15;
    /// Pupils per monster; each jitters the look direction and drains the blink timer
    pub const PUPILS: usize = 2;
    /// Blink countdown drained per tick (0.01 per pupil)
    pub const BLINK_DRAIN_PER_TICK: f32 = 0.02;
    /// Max jitter per axis for one pupil's nudge
    pub const EYE_JITTER: f32 = 0.025;
    /// Pupil travel from its socket at full eye direction
    pub const EYE_TRAVEL: f32 = 0.05;
    /// Idle sway amplitude (radians per tick)
    pub const IDLE_SWAY: f32 = 0.005;
    /// Squash/stretch amplitude while bouncing
    pub const SQUASH_AMOUNT: f32 = 0.2;
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}

/// Place a polar coordinate on the ground plane (x/z), at height `y`
#[inline]
pub fn polar_to_ground(r: f32, theta: f32, y: f32) -> Vec3 {
    let p = polar_to_cartesian(r, theta);
    Vec3::new(p.x, y, p.y)
}

/// Palette color for an index (wraps)
#[inline]
pub fn palette_color(index: usize) -> u32 {
    consts::PALETTE[index % consts::PALETTE.len()]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_polar_to_ground() {
        let p = polar_to_ground(5.0, FRAC_PI_2, -2.0);
        assert!(p.x.abs() < 1e-5);
        assert_eq!(p.y, -2.0);
        assert!((p.z - 5.0).abs() < 1e-5);
    }

    #[test]
    fn test_palette_wraps() {
        assert_eq!(palette_color(0), 0xff6b6b);
        assert_eq!(palette_color(6), 0xff6b6b);
        assert_eq!(palette_color(7), 0x48dbfb);
    }
}
