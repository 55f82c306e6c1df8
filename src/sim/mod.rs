//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Side effects leave as queued `GameEvent`s
//! - No rendering or platform dependencies

pub mod camera;
pub mod confetti;
pub mod deferred;
pub mod difficulty;
pub mod hit;
pub mod lifecycle;
pub mod monster;
pub mod spawn;
pub mod state;
pub mod tick;

pub use camera::{Camera, Ray, Viewport};
pub use confetti::ConfettiParticle;
pub use deferred::{Deferred, DeferredAction, DeferredQueue};
pub use hit::{HitOutcome, activate, resolve_ray};
pub use monster::{Category, Monster, MonsterId, MonsterPose, MonsterState, ShapeKind};
pub use state::{Cue, GameEvent, GamePhase, GameState};
pub use tick::tick;
