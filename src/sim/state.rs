//! Session state
//!
//! Everything a running session owns lives in `GameState`. Side effects for
//! the renderer, audio and UI are queued as `GameEvent`s and drained by the
//! controller after each step.

use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::confetti::ConfettiParticle;
use super::deferred::DeferredQueue;
use super::monster::{Category, Monster, MonsterId, ShapeKind};
use crate::consts::SIM_DT;
use crate::tuning::Tuning;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Start screen, nothing spawned yet
    Title,
    /// Active gameplay
    Playing,
    /// Too many bad monsters; frozen until restart
    GameOver,
}

/// Named sound cues
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    /// Good monster hit; `voice` picks one of the bounce pitches
    Bounce { voice: u8 },
    /// Score milestone
    Cheer,
    /// Bad monster hit
    Wrong,
}

/// Side effects produced by the simulation, in order
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// Start screen dismissed, session running
    SessionStarted,
    /// Game-over screen dismissed, fresh session running
    SessionRestarted,
    MonsterSpawned {
        id: MonsterId,
        category: Category,
        shape: ShapeKind,
        color: u32,
    },
    MonsterRecolored {
        id: MonsterId,
        color: u32,
    },
    MonsterRemoved {
        id: MonsterId,
    },
    ScoreChanged(u32),
    DifficultyChanged(f32),
    ConfettiBurst {
        origin: Vec3,
    },
    Cue(Cue),
    AmbientStarted,
    AmbientStopped,
    GameOver {
        score: u32,
    },
}

/// Complete session state (deterministic for a given seed and input sequence)
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub(crate) rng: Pcg32,
    /// Balance knobs
    pub tuning: Tuning,
    pub phase: GamePhase,
    pub score: u32,
    /// Derived from score, in [1, max_difficulty]
    pub difficulty: f32,
    /// Seconds until the scheduler spawns again
    pub spawn_timer: f32,
    /// Camera orbit angle (radians)
    pub camera_angle: f32,
    /// Simulation tick counter (never reset, deferred events key off it)
    pub time_ticks: u64,
    /// Good monsters (order irrelevant)
    pub good: Vec<Monster>,
    /// Bad monsters (order irrelevant)
    pub bad: Vec<Monster>,
    /// Visual particles (not gameplay-affecting)
    pub confetti: Vec<ConfettiParticle>,
    /// Pending cosmetic follow-ups
    pub deferred: DeferredQueue,
    /// Side effects not yet handed to the collaborators
    pub events: Vec<GameEvent>,
    /// Next entity ID (monotonic across restarts so stale handles never alias)
    next_id: u32,
}

impl GameState {
    /// Create a new session in the title phase
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            tuning,
            phase: GamePhase::Title,
            score: 0,
            difficulty: 1.0,
            spawn_timer: 0.0,
            camera_angle: 0.0,
            time_ticks: 0,
            good: Vec::new(),
            bad: Vec::new(),
            confetti: Vec::new(),
            deferred: DeferredQueue::new(),
            events: Vec::new(),
            next_id: 1,
        }
    }

    pub fn is_running(&self) -> bool {
        self.phase != GamePhase::Title
    }

    pub fn is_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// Session clock in seconds
    pub fn clock(&self) -> f32 {
        self.time_ticks as f32 * SIM_DT
    }

    /// Session random source
    pub fn rng_mut(&mut self) -> &mut Pcg32 {
        &mut self.rng
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> MonsterId {
        let id = MonsterId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Leave the title screen and begin play
    pub fn start(&mut self) {
        if self.phase != GamePhase::Title {
            log::debug!("start ignored in phase {:?}", self.phase);
            return;
        }
        self.phase = GamePhase::Playing;
        self.events.push(GameEvent::SessionStarted);
        self.events.push(GameEvent::AmbientStarted);
        self.spawn_initial();
        log::info!("Session started (seed {})", self.seed);
    }

    /// Throw away the current run and start a fresh one
    pub fn restart(&mut self) {
        if self.phase == GamePhase::Title {
            self.start();
            return;
        }

        for monster in self.good.drain(..).chain(self.bad.drain(..)) {
            self.events.push(GameEvent::MonsterRemoved { id: monster.id });
        }
        self.deferred.clear();

        self.score = 0;
        self.difficulty = 1.0;
        self.spawn_timer = 0.0;
        self.phase = GamePhase::Playing;

        self.events.push(GameEvent::ScoreChanged(0));
        self.events.push(GameEvent::DifficultyChanged(1.0));
        self.events.push(GameEvent::SessionRestarted);
        self.events.push(GameEvent::AmbientStarted);
        self.spawn_initial();
        log::info!("Session restarted");
    }

    fn spawn_initial(&mut self) {
        for _ in 0..self.tuning.initial_monsters {
            self.spawn_monster(Category::Good);
        }
    }

    /// Spawn one monster into its collection. No-op unless playing.
    pub fn spawn_monster(&mut self, category: Category) -> Option<MonsterId> {
        if self.phase != GamePhase::Playing {
            log::debug!("spawn ignored in phase {:?}", self.phase);
            return None;
        }
        let id = self.next_entity_id();
        let monster = Monster::spawn(id, category, self.difficulty, &self.tuning, &mut self.rng);
        log::debug!(
            "Spawned {:?} {:?} {} at ({:.1}, {:.1}), lifespan {:.2}s",
            category,
            monster.shape,
            id.0,
            monster.anchor.x,
            monster.anchor.z,
            monster.lifespan
        );
        self.events.push(GameEvent::MonsterSpawned {
            id,
            category,
            shape: monster.shape,
            color: monster.color(),
        });
        match category {
            Category::Good => self.good.push(monster),
            Category::Bad => self.bad.push(monster),
        }
        Some(id)
    }

    /// Look a monster up in either collection
    pub fn monster(&self, id: MonsterId) -> Option<&Monster> {
        self.good.iter().chain(self.bad.iter()).find(|m| m.id == id)
    }

    pub fn monster_mut(&mut self, id: MonsterId) -> Option<&mut Monster> {
        self.good
            .iter_mut()
            .chain(self.bad.iter_mut())
            .find(|m| m.id == id)
    }

    /// Total monsters on the field
    pub fn monster_count(&self) -> usize {
        self.good.len() + self.bad.len()
    }

    /// Hand the queued side effects to the caller
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Bernoulli draw from the session RNG
    pub fn roll(&mut self, chance: f32) -> bool {
        self.rng.random::<f32>() < chance
    }
}
