//! Audio system using Web Audio API
//!
//! Procedurally generated sound effects - no external files needed!

use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

use crate::platform::{Audio, Tone, Waveform};
use crate::sim::Cue;

/// Ambient melody, one note per second
const MELODY: [f32; 4] = [220.0, 330.0, 440.0, 330.0];
/// Ambient drone level once faded in
const AMBIENT_GAIN: f32 = 0.05;

/// Background drone: two oscillators through one gain
struct Ambient {
    low: OscillatorNode,
    high: OscillatorNode,
    gain: GainNode,
    note: usize,
}

/// Audio manager for the game
pub struct AudioManager {
    ctx: Option<AudioContext>,
    ambient: Option<Ambient>,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioManager {
    pub fn new() -> Self {
        // Try to create audio context (may fail if not in secure context)
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - audio disabled");
        }
        Self { ctx, ambient: None }
    }

    /// Resume audio context (required after user gesture)
    pub fn resume(&self) {
        if let Some(ctx) = &self.ctx {
            let _ = ctx.resume();
        }
    }

    // === Sound generators ===

    /// Create an oscillator with gain envelope
    fn create_osc(
        &self,
        ctx: &AudioContext,
        freq: f32,
        osc_type: OscillatorType,
    ) -> Option<(OscillatorNode, GainNode)> {
        let osc = ctx.create_oscillator().ok()?;
        let gain = ctx.create_gain().ok()?;

        osc.set_type(osc_type);
        osc.frequency().set_value(freq);
        osc.connect_with_audio_node(&gain).ok()?;
        gain.connect_with_audio_node(&ctx.destination()).ok()?;

        Some((osc, gain))
    }

    /// Play one cue from its tone table entry
    fn play_tone(&self, ctx: &AudioContext, tone: &Tone) {
        let osc_type = match tone.waveform {
            Waveform::Sine => OscillatorType::Sine,
            Waveform::Square => OscillatorType::Square,
            Waveform::Sawtooth => OscillatorType::Sawtooth,
        };
        let Some((osc, gain)) = self.create_osc(ctx, tone.start_hz, osc_type) else {
            return;
        };
        let t = ctx.current_time();

        if tone.glide > 0.0 {
            osc.frequency().set_value_at_time(tone.start_hz, t).ok();
            osc.frequency()
                .linear_ramp_to_value_at_time(tone.end_hz, t + f64::from(tone.glide))
                .ok();
        }
        gain.gain().set_value_at_time(0.0, t).ok();
        gain.gain()
            .linear_ramp_to_value_at_time(tone.peak, t + f64::from(tone.attack))
            .ok();
        gain.gain()
            .linear_ramp_to_value_at_time(0.0, t + f64::from(tone.release))
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + f64::from(tone.release) + 0.05).ok();
    }

    /// Build the drone graph and fade it in over a second
    fn build_ambient(&self, ctx: &AudioContext) -> Option<Ambient> {
        let gain = ctx.create_gain().ok()?;
        let low = ctx.create_oscillator().ok()?;
        let high = ctx.create_oscillator().ok()?;

        low.set_type(OscillatorType::Sine);
        low.frequency().set_value(MELODY[0]);
        high.set_type(OscillatorType::Triangle);
        high.frequency().set_value(MELODY[0] * 1.5);
        low.connect_with_audio_node(&gain).ok()?;
        high.connect_with_audio_node(&gain).ok()?;
        gain.connect_with_audio_node(&ctx.destination()).ok()?;

        let t = ctx.current_time();
        gain.gain().set_value_at_time(0.0, t).ok();
        gain.gain().linear_ramp_to_value_at_time(AMBIENT_GAIN, t + 1.0).ok();
        low.start().ok();
        high.start().ok();

        Some(Ambient {
            low,
            high,
            gain,
            note: 0,
        })
    }
}

impl Audio for AudioManager {
    fn play_cue(&mut self, cue: Cue) {
        let Some(ctx) = &self.ctx else { return };

        // Resume context if suspended (browsers require user gesture)
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        self.play_tone(ctx, &Tone::for_cue(cue));
    }

    fn start_ambient(&mut self) {
        if self.ambient.is_some() {
            return;
        }
        let Some(ctx) = &self.ctx else { return };
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }
        self.ambient = self.build_ambient(ctx);
        if self.ambient.is_none() {
            log::warn!("Failed to build ambient audio graph");
        }
    }

    fn stop_ambient(&mut self) {
        let (Some(ctx), Some(ambient)) = (&self.ctx, self.ambient.take()) else {
            return;
        };
        let t = ctx.current_time();
        let level = ambient.gain.gain().value();
        ambient.gain.gain().set_value_at_time(level, t).ok();
        ambient.gain.gain().linear_ramp_to_value_at_time(0.0, t + 1.0).ok();
        ambient.low.stop_with_when(t + 1.0).ok();
        ambient.high.stop_with_when(t + 1.0).ok();
    }

    /// Step the drone's melody on whole seconds of audio time
    fn frame(&mut self) {
        let (Some(ctx), Some(ambient)) = (&self.ctx, self.ambient.as_mut()) else {
            return;
        };
        let t = ctx.current_time();
        let note = (t as usize) % MELODY.len();
        if note == ambient.note {
            return;
        }
        ambient.note = note;
        let freq = MELODY[note];
        ambient.low.frequency().set_value_at_time(freq, t).ok();
        ambient.high.frequency().set_value_at_time(freq * 1.5, t).ok();
    }
}
