//! Deterministic session machinery shared by every game
//!
//! Games never touch the platform directly:
//! - Fixed timestep only (`clock`)
//! - Injected input, audio and RNG collaborators only
//! - Lifecycle transitions live in one place (`session`)

pub mod clock;
pub mod cue;
pub mod input;
pub mod rng;
pub mod score;
pub mod session;

pub use clock::{FrameHandle, LoopDriver};
pub use cue::{AudioSink, CueLog, NullAudio, SoundCue};
pub use input::{Control, InputSource, InputState};
pub use rng::{RandomSource, seeded};
pub use score::Scoreboard;
pub use session::{Collaborators, Game, GameContext, Session, SessionPhase, SessionSnapshot};
