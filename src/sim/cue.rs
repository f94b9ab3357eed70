//! Fire-and-forget sound cues
//!
//! Games emit cues; whatever sink the host injected decides how (or whether)
//! to play them. A sink that cannot play must swallow the failure.

use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

/// Cue vocabulary shared by every game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoundCue {
    Jump,
    Shoot,
    Explosion,
    Hit,
    Score,
    Powerup,
    Death,
    GameStart,
    GameOver,
}

impl SoundCue {
    pub fn as_str(&self) -> &'static str {
        match self {
            SoundCue::Jump => "jump",
            SoundCue::Shoot => "shoot",
            SoundCue::Explosion => "explosion",
            SoundCue::Hit => "hit",
            SoundCue::Score => "score",
            SoundCue::Powerup => "powerup",
            SoundCue::Death => "death",
            SoundCue::GameStart => "game-start",
            SoundCue::GameOver => "game-over",
        }
    }
}

pub trait AudioSink {
    fn play(&mut self, cue: SoundCue);
}

/// Sink that drops every cue
#[derive(Debug, Clone, Copy, Default)]
pub struct NullAudio;

impl AudioSink for NullAudio {
    fn play(&mut self, _cue: SoundCue) {}
}

/// Sink that records cues in order (tests, headless runs)
#[derive(Debug, Clone, Default)]
pub struct CueLog {
    pub cues: Vec<SoundCue>,
}

impl CueLog {
    pub fn count(&self, cue: SoundCue) -> usize {
        self.cues.iter().filter(|c| **c == cue).count()
    }
}

impl AudioSink for CueLog {
    fn play(&mut self, cue: SoundCue) {
        log::trace!("cue {}", cue.as_str());
        self.cues.push(cue);
    }
}

impl<T: AudioSink> AudioSink for Rc<RefCell<T>> {
    fn play(&mut self, cue: SoundCue) {
        // A sink already borrowed elsewhere just misses the cue
        match self.try_borrow_mut() {
            Ok(mut sink) => sink.play(cue),
            Err(_) => log::warn!("Audio sink busy, dropped cue {}", cue.as_str()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cue_log_records_in_order() {
        let mut log = CueLog::default();
        log.play(SoundCue::Shoot);
        log.play(SoundCue::Explosion);
        log.play(SoundCue::Shoot);
        assert_eq!(log.cues, vec![SoundCue::Shoot, SoundCue::Explosion, SoundCue::Shoot]);
        assert_eq!(log.count(SoundCue::Shoot), 2);
    }

    #[test]
    fn test_busy_shared_sink_drops_cue_without_panicking() {
        let shared = Rc::new(RefCell::new(CueLog::default()));
        let mut sink = shared.clone();
        let _guard = shared.borrow();
        sink.play(SoundCue::Hit);
        drop(_guard);
        assert!(shared.borrow().cues.is_empty());
    }
}
