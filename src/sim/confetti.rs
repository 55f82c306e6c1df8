//! Milestone confetti
//!
//! Purely visual, but simulated here so it stays deterministic and keeps
//! falling after the session ends.

use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::PALETTE;

/// Downward acceleration (units per tick²)
pub const CONFETTI_GRAVITY: f32 = 0.01;
/// Burst is centered this far above the monster
pub const BURST_LIFT: f32 = 2.0;

/// A single confetti square
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfettiParticle {
    pub position: Vec3,
    /// Units per tick
    pub velocity: Vec3,
    /// Euler angles (radians)
    pub rotation: Vec3,
    /// Radians per tick per axis
    pub spin: Vec3,
    pub color: u32,
    /// Ticks left
    pub life: u32,
}

/// Spawn a burst of `count` particles around `origin`
pub fn burst<R: Rng + ?Sized>(origin: Vec3, count: usize, life: u32, rng: &mut R) -> Vec<ConfettiParticle> {
    let center = origin + Vec3::Y * BURST_LIFT;
    (0..count)
        .map(|_| {
            let position = center
                + Vec3::new(
                    (rng.random::<f32>() - 0.5) * 2.0,
                    rng.random::<f32>(),
                    (rng.random::<f32>() - 0.5) * 2.0,
                );
            let rotation = Vec3::new(
                rng.random::<f32>() * std::f32::consts::TAU,
                rng.random::<f32>() * std::f32::consts::TAU,
                rng.random::<f32>() * std::f32::consts::TAU,
            );
            let velocity = Vec3::new(
                (rng.random::<f32>() - 0.5) * 0.2,
                rng.random::<f32>() * 0.2 + 0.1,
                (rng.random::<f32>() - 0.5) * 0.2,
            );
            let spin = Vec3::new(
                rng.random::<f32>() * 0.1,
                rng.random::<f32>() * 0.1,
                rng.random::<f32>() * 0.1,
            );
            ConfettiParticle {
                position,
                velocity,
                rotation,
                spin,
                color: PALETTE[rng.random_range(0..PALETTE.len())],
                life,
            }
        })
        .collect()
}

/// Move, spin and age every particle; drop the dead ones
pub fn update(particles: &mut Vec<ConfettiParticle>) {
    for p in particles.iter_mut() {
        p.position += p.velocity;
        p.rotation += p.spin;
        p.velocity.y -= CONFETTI_GRAVITY;
        p.life = p.life.saturating_sub(1);
    }
    particles.retain(|p| p.life > 0);
}

/// Floats per particle in a packed buffer: position, rotation, color
pub const CONFETTI_STRIDE: usize = 7;

/// Flatten particles for a typed-array hand-off. Colors are 24-bit so they
/// survive the trip through f32 exactly.
pub fn pack(particles: &[ConfettiParticle]) -> Vec<f32> {
    let mut buf = Vec::with_capacity(particles.len() * CONFETTI_STRIDE);
    for p in particles {
        buf.extend_from_slice(&p.position.to_array());
        buf.extend_from_slice(&p.rotation.to_array());
        buf.push(p.color as f32);
    }
    buf
}
