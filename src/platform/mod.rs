//! Platform abstraction layer
//!
//! The simulation never touches the scene graph, the audio device or the DOM.
//! The session controller hands its side effects to these three collaborators:
//! - `Renderer`: monster visuals, camera, confetti
//! - `Audio`: named cues and the ambient drone
//! - `Ui`: start/game-over screens and the score label
//!
//! The browser build implements them in `web` and `audio`; native builds and
//! tests use `Headless`.

use glam::Vec3;

use crate::consts::BOUNCE_VOICES;
use crate::sim::{Category, ConfettiParticle, Cue, MonsterId, MonsterPose, ShapeKind};

/// Opaque handle a renderer keys its visuals by
pub type VisualHandle = MonsterId;

/// Scene-side collaborator
pub trait Renderer {
    /// Build a visual for a freshly spawned monster
    fn create_visual(&mut self, handle: VisualHandle, shape: ShapeKind, category: Category, color: u32);
    /// Place a visual for this frame
    fn set_pose(&mut self, handle: VisualHandle, pose: &MonsterPose);
    fn set_color(&mut self, handle: VisualHandle, color: u32);
    /// Drop a visual; unknown handles are ignored
    fn remove(&mut self, handle: VisualHandle);
    fn set_camera(&mut self, eye: Vec3, target: Vec3);
    /// Replace the confetti layer with these particles
    fn draw_confetti(&mut self, particles: &[ConfettiParticle]);
}

/// Sound collaborator
pub trait Audio {
    fn play_cue(&mut self, cue: Cue);
    /// Start the background drone; a second start is a no-op
    fn start_ambient(&mut self);
    fn stop_ambient(&mut self);
    /// Per-frame hook for time-based effects
    fn frame(&mut self) {}
}

/// Oscillator shape for a synthesized cue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Square,
    Sawtooth,
}

/// One synthesized cue: a single oscillator with a linear glide and an
/// attack/release gain envelope
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    pub waveform: Waveform,
    pub start_hz: f32,
    pub end_hz: f32,
    /// Seconds to glide from `start_hz` to `end_hz`
    pub glide: f32,
    /// Gain at the top of the envelope
    pub peak: f32,
    /// Seconds to reach `peak`
    pub attack: f32,
    /// Seconds from cue start until the gain is back at zero
    pub release: f32,
}

impl Tone {
    /// Sound for a cue
    pub fn for_cue(cue: Cue) -> Self {
        match cue {
            Cue::Bounce { voice } => {
                let hz = 300.0 + f32::from(voice % BOUNCE_VOICES as u8) * 100.0;
                Self {
                    waveform: Waveform::Sine,
                    start_hz: hz,
                    end_hz: hz,
                    glide: 0.0,
                    peak: 0.3,
                    attack: 0.01,
                    release: 0.3,
                }
            }
            Cue::Cheer => Self {
                waveform: Waveform::Square,
                start_hz: 440.0,
                end_hz: 1320.0,
                glide: 0.2,
                peak: 0.2,
                attack: 0.05,
                release: 0.5,
            },
            Cue::Wrong => Self {
                waveform: Waveform::Sawtooth,
                start_hz: 200.0,
                end_hz: 100.0,
                glide: 0.3,
                peak: 0.2,
                attack: 0.05,
                release: 0.3,
            },
        }
    }
}

/// Screen overlay collaborator
pub trait Ui {
    fn show_start_screen(&mut self);
    fn hide_start_screen(&mut self);
    fn show_game_over(&mut self, score: u32);
    fn hide_game_over(&mut self);
    fn update_score(&mut self, score: u32);
}

/// Counts failed collaborator calls and logs only the first one
#[derive(Debug, Default)]
pub struct FailureLatch {
    failures: u32,
}

impl FailureLatch {
    /// Returns true if `result` was Ok
    pub fn record<E: std::fmt::Debug>(&mut self, what: &str, result: Result<(), E>) -> bool {
        let Err(e) = result else { return true };
        if self.failures == 0 {
            log::warn!("{} failed: {:?} (further failures are not logged)", what, e);
        }
        self.failures += 1;
        false
    }

    pub fn failures(&self) -> u32 {
        self.failures
    }
}

/// Native stubs: log what a browser build would have drawn or played
#[derive(Debug, Default)]
pub struct Headless {
    /// Visuals currently alive
    pub visuals: usize,
    pub ambient: bool,
    pub score: u32,
}

impl Renderer for Headless {
    fn create_visual(&mut self, handle: VisualHandle, shape: ShapeKind, category: Category, color: u32) {
        self.visuals += 1;
        log::debug!(
            "visual {} created: {:?} {} #{:06x}",
            handle.0,
            category,
            shape.as_str(),
            color
        );
    }

    fn set_pose(&mut self, _handle: VisualHandle, _pose: &MonsterPose) {}

    fn set_color(&mut self, handle: VisualHandle, color: u32) {
        log::debug!("visual {} recolored #{:06x}", handle.0, color);
    }

    fn remove(&mut self, handle: VisualHandle) {
        self.visuals = self.visuals.saturating_sub(1);
        log::debug!("visual {} removed", handle.0);
    }

    fn set_camera(&mut self, _eye: Vec3, _target: Vec3) {}

    fn draw_confetti(&mut self, _particles: &[ConfettiParticle]) {}
}

impl Audio for Headless {
    fn play_cue(&mut self, cue: Cue) {
        log::debug!("cue {:?}", cue);
    }

    fn start_ambient(&mut self) {
        self.ambient = true;
    }

    fn stop_ambient(&mut self) {
        self.ambient = false;
    }
}

impl Ui for Headless {
    fn show_start_screen(&mut self) {
        log::info!("Tap the colorful monsters. Avoid the black ones.");
    }

    fn hide_start_screen(&mut self) {}

    fn show_game_over(&mut self, score: u32) {
        log::info!("GAME OVER - score {}", score);
    }

    fn hide_game_over(&mut self) {}

    fn update_score(&mut self, score: u32) {
        self.score = score;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounce_voices_span_five_pitches() {
        let pitches: Vec<f32> = (0..5)
            .map(|voice| Tone::for_cue(Cue::Bounce { voice }).start_hz)
            .collect();
        assert_eq!(pitches, vec![300.0, 400.0, 500.0, 600.0, 700.0]);
        assert_eq!(Tone::for_cue(Cue::Bounce { voice: 7 }).start_hz, 500.0);
    }

    #[test]
    fn test_cue_envelopes_are_unscaled() {
        let bounce = Tone::for_cue(Cue::Bounce { voice: 0 });
        assert_eq!(bounce.peak, 0.3);
        assert_eq!(bounce.glide, 0.0);

        let cheer = Tone::for_cue(Cue::Cheer);
        assert_eq!(cheer.waveform, Waveform::Square);
        assert_eq!((cheer.start_hz, cheer.end_hz, cheer.peak), (440.0, 1320.0, 0.2));

        let wrong = Tone::for_cue(Cue::Wrong);
        assert_eq!(wrong.waveform, Waveform::Sawtooth);
        assert_eq!((wrong.start_hz, wrong.end_hz, wrong.peak), (200.0, 100.0, 0.2));

        for tone in [bounce, cheer, wrong] {
            assert!(tone.attack < tone.release);
            assert!(tone.glide <= tone.release);
        }
    }

    #[test]
    fn test_failure_latch_counts_every_failure() {
        let mut latch = FailureLatch::default();
        assert!(latch.record::<&str>("setPose", Ok(())));
        assert_eq!(latch.failures(), 0);
        assert!(!latch.record("setPose", Err("monsterScene is undefined")));
        assert!(!latch.record("setColor", Err("monsterScene is undefined")));
        assert_eq!(latch.failures(), 2);
    }
}
