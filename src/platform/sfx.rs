//! Procedural sound patches
//!
//! Each cue is a handful of oscillator tones with an exponential decay, so no
//! audio files ship with the arcade. The Web Audio sink plays these; keeping
//! them as data lets native tests check them.

use crate::sim::SoundCue;

/// Oscillator waveform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wave {
    Sine,
    Square,
    Sawtooth,
    Triangle,
}

/// One oscillator voice
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    pub wave: Wave,
    /// Start frequency in Hz
    pub freq: f32,
    /// Frequency at the end of the sweep (equal to `freq` for a flat tone)
    pub freq_end: f32,
    /// Peak gain before the master volume is applied
    pub gain: f32,
    /// Offset from the cue start, seconds
    pub delay: f64,
    pub duration: f64,
}

const fn tone(wave: Wave, freq: f32, freq_end: f32, gain: f32, delay: f64, duration: f64) -> Tone {
    Tone {
        wave,
        freq,
        freq_end,
        gain,
        delay,
        duration,
    }
}

const JUMP: [Tone; 1] = [tone(Wave::Triangle, 200.0, 600.0, 0.3, 0.0, 0.2)];

const SHOOT: [Tone; 1] = [tone(Wave::Square, 900.0, 200.0, 0.15, 0.0, 0.1)];

const EXPLOSION: [Tone; 2] = [
    tone(Wave::Sawtooth, 100.0, 30.0, 0.5, 0.0, 0.4),
    tone(Wave::Square, 1500.0, 1500.0, 0.2, 0.0, 0.1),
];

const HIT: [Tone; 1] = [tone(Wave::Sine, 150.0, 60.0, 0.6, 0.0, 0.12)];

const SCORE: [Tone; 3] = [
    tone(Wave::Sine, 600.0, 600.0, 0.25, 0.0, 0.15),
    tone(Wave::Sine, 800.0, 800.0, 0.25, 0.08, 0.15),
    tone(Wave::Sine, 1000.0, 1000.0, 0.25, 0.16, 0.15),
];

const POWERUP: [Tone; 4] = [
    tone(Wave::Triangle, 400.0, 400.0, 0.3, 0.0, 0.4),
    tone(Wave::Triangle, 500.0, 500.0, 0.3, 0.1, 0.4),
    tone(Wave::Triangle, 600.0, 600.0, 0.3, 0.2, 0.4),
    tone(Wave::Triangle, 800.0, 800.0, 0.3, 0.3, 0.4),
];

const DEATH: [Tone; 1] = [tone(Wave::Sine, 300.0, 20.0, 0.4, 0.0, 0.8)];

const GAME_START: [Tone; 5] = [
    tone(Wave::Triangle, 500.0, 500.0, 0.25, 0.0, 0.25),
    tone(Wave::Triangle, 600.0, 600.0, 0.25, 0.08, 0.25),
    tone(Wave::Triangle, 700.0, 700.0, 0.25, 0.16, 0.25),
    tone(Wave::Triangle, 800.0, 800.0, 0.25, 0.24, 0.25),
    tone(Wave::Triangle, 1000.0, 1000.0, 0.25, 0.32, 0.25),
];

const GAME_OVER: [Tone; 4] = [
    tone(Wave::Sine, 400.0, 400.0, 0.3, 0.0, 0.3),
    tone(Wave::Sine, 350.0, 350.0, 0.3, 0.2, 0.3),
    tone(Wave::Sine, 300.0, 300.0, 0.3, 0.4, 0.3),
    tone(Wave::Sine, 200.0, 200.0, 0.3, 0.6, 0.3),
];

/// Voices making up `cue`
pub fn patch(cue: SoundCue) -> &'static [Tone] {
    match cue {
        SoundCue::Jump => &JUMP,
        SoundCue::Shoot => &SHOOT,
        SoundCue::Explosion => &EXPLOSION,
        SoundCue::Hit => &HIT,
        SoundCue::Score => &SCORE,
        SoundCue::Powerup => &POWERUP,
        SoundCue::Death => &DEATH,
        SoundCue::GameStart => &GAME_START,
        SoundCue::GameOver => &GAME_OVER,
    }
}
