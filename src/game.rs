//! Session controller
//!
//! Owns the simulation state and the three collaborators. Browser callbacks
//! (start, restart, pointer, resize, animation frame) land here; the
//! simulation runs on a fixed timestep and its queued events are dispatched
//! to the renderer, audio and UI after every substep.

use glam::Vec2;

use crate::consts::{MAX_SUBSTEPS, SIM_DT};
use crate::platform::{Audio, Renderer, Ui};
use crate::sim::{Camera, GameEvent, GameState, HitOutcome, Viewport, activate, tick};
use crate::tuning::Tuning;

/// Longest frame the accumulator will absorb (seconds)
const MAX_FRAME_DT: f32 = 0.1;

/// One game session wired to its collaborators
pub struct Game<R: Renderer, A: Audio, U: Ui> {
    pub state: GameState,
    renderer: R,
    audio: A,
    ui: U,
    viewport: Viewport,
    accumulator: f32,
}

impl<R: Renderer, A: Audio, U: Ui> Game<R, A, U> {
    /// Build a session on the title screen
    pub fn new(seed: u64, tuning: Tuning, renderer: R, audio: A, mut ui: U) -> Self {
        ui.show_start_screen();
        ui.update_score(0);
        log::info!("Game initialized with seed: {}", seed);
        Self {
            state: GameState::new(seed, tuning.validated()),
            renderer,
            audio,
            ui,
            viewport: Viewport::default(),
            accumulator: 0.0,
        }
    }

    /// Start button
    pub fn start_session(&mut self) {
        self.state.start();
        self.flush_events();
    }

    /// Restart button on the game-over screen
    pub fn restart_session(&mut self) {
        self.state.restart();
        self.accumulator = 0.0;
        self.flush_events();
    }

    /// Host surface changed size (CSS pixels)
    pub fn resize(&mut self, width: f32, height: f32) {
        self.viewport = Viewport::new(width, height);
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Mouse down or first touch point, in surface pixels
    pub fn pointer_down(&mut self, x: f32, y: f32) -> HitOutcome {
        let outcome = activate(&mut self.state, Vec2::new(x, y), self.viewport);
        self.flush_events();
        outcome
    }

    /// Advance by one rendered frame of `dt` seconds and sync the scene
    pub fn frame(&mut self, dt: f32) {
        let dt = dt.clamp(0.0, MAX_FRAME_DT);
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            tick(&mut self.state, SIM_DT);
            self.flush_events();
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
        if substeps == MAX_SUBSTEPS {
            // Drop the backlog rather than spiral
            self.accumulator = self.accumulator.min(SIM_DT);
        }

        self.sync_scene();
        self.audio.frame();
    }

    /// Push camera, monster poses and confetti to the renderer
    fn sync_scene(&mut self) {
        let camera = Camera::orbit(self.state.camera_angle, self.viewport.aspect());
        self.renderer.set_camera(camera.eye, camera.target);
        for monster in self.state.good.iter().chain(self.state.bad.iter()) {
            self.renderer.set_pose(monster.id, &monster.pose());
        }
        self.renderer.draw_confetti(&self.state.confetti);
    }

    /// Hand queued simulation events to the collaborators, in order
    fn flush_events(&mut self) {
        for event in self.state.drain_events() {
            match event {
                GameEvent::SessionStarted => self.ui.hide_start_screen(),
                GameEvent::SessionRestarted => self.ui.hide_game_over(),
                GameEvent::MonsterSpawned {
                    id,
                    category,
                    shape,
                    color,
                } => self.renderer.create_visual(id, shape, category, color),
                GameEvent::MonsterRecolored { id, color } => self.renderer.set_color(id, color),
                GameEvent::MonsterRemoved { id } => self.renderer.remove(id),
                GameEvent::ScoreChanged(score) => self.ui.update_score(score),
                GameEvent::DifficultyChanged(level) => {
                    log::debug!("difficulty now {}", level);
                }
                GameEvent::ConfettiBurst { origin } => {
                    log::debug!("confetti at ({:.1}, {:.1}, {:.1})", origin.x, origin.y, origin.z);
                }
                GameEvent::Cue(cue) => self.audio.play_cue(cue),
                GameEvent::AmbientStarted => self.audio.start_ambient(),
                GameEvent::AmbientStopped => self.audio.stop_ambient(),
                GameEvent::GameOver { score } => self.ui.show_game_over(score),
            }
        }
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn audio(&self) -> &A {
        &self.audio
    }

    pub fn ui(&self) -> &U {
        &self.ui
    }

    pub fn audio_mut(&mut self) -> &mut A {
        &mut self.audio
    }
}
