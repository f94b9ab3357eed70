//! Audio sink using the Web Audio API
//!
//! Procedurally generated sound effects - no external files needed.

use web_sys::{AudioContext, AudioContextState, GainNode, OscillatorNode, OscillatorType};

use super::sfx::{Tone, Wave, patch};
use crate::settings::Settings;
use crate::sim::{AudioSink, SoundCue};

/// Gain envelopes decay toward this instead of zero (exponential ramps)
const SILENCE: f32 = 0.01;

pub struct WebAudioSink {
    ctx: Option<AudioContext>,
    volume: f32,
    /// Silenced while the page is in the background
    blurred: bool,
}

impl WebAudioSink {
    pub fn new(settings: &Settings) -> Self {
        // May fail outside a secure context
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - audio disabled");
        }
        Self {
            ctx,
            volume: settings.effective_volume(),
            blurred: false,
        }
    }

    /// Pick up volume or mute changes
    pub fn apply_settings(&mut self, settings: &Settings) {
        self.volume = settings.effective_volume();
    }

    pub fn set_blurred(&mut self, blurred: bool) {
        self.blurred = blurred;
    }

    /// Resume audio context (required after user gesture)
    pub fn resume(&self) {
        if let Some(ctx) = &self.ctx {
            let _ = ctx.resume();
        }
    }

    fn create_osc(ctx: &AudioContext, tone: &Tone) -> Option<(OscillatorNode, GainNode)> {
        let osc = ctx.create_oscillator().ok()?;
        let gain = ctx.create_gain().ok()?;

        osc.set_type(match tone.wave {
            Wave::Sine => OscillatorType::Sine,
            Wave::Square => OscillatorType::Square,
            Wave::Sawtooth => OscillatorType::Sawtooth,
            Wave::Triangle => OscillatorType::Triangle,
        });
        osc.frequency().set_value(tone.freq);
        osc.connect_with_audio_node(&gain).ok()?;
        gain.connect_with_audio_node(&ctx.destination()).ok()?;

        Some((osc, gain))
    }

    fn play_tone(ctx: &AudioContext, tone: &Tone, volume: f32) {
        let Some((osc, gain)) = Self::create_osc(ctx, tone) else {
            return;
        };
        let t = ctx.current_time() + tone.delay;
        let end = t + tone.duration;

        gain.gain().set_value_at_time(volume * tone.gain, t).ok();
        gain.gain().exponential_ramp_to_value_at_time(SILENCE, end).ok();
        if tone.freq_end != tone.freq {
            osc.frequency().set_value_at_time(tone.freq, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(tone.freq_end, end)
                .ok();
        }

        osc.start_with_when(t).ok();
        osc.stop_with_when(end + 0.05).ok();
    }
}

impl AudioSink for WebAudioSink {
    fn play(&mut self, cue: SoundCue) {
        if self.blurred || self.volume <= 0.0 {
            return;
        }
        let Some(ctx) = &self.ctx else { return };

        // Browsers keep the context suspended until a user gesture
        if ctx.state() == AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        for tone in patch(cue) {
            Self::play_tone(ctx, tone, self.volume);
        }
    }
}
