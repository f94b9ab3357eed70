//! Retro Arcade - fixed-timestep game sessions for a browser arcade
//!
//! Core modules:
//! - `sim`: Session lifecycle, fixed-timestep clock and injected collaborators
//! - `games`: Game implementations and the registry that creates them by id
//! - `render`: Drawing surface abstraction and a recording display list
//! - `platform`: Browser/native platform adapters (keyboard, canvas, Web Audio)
//! - `tuning`: Data-driven game balance

pub mod error;
pub mod games;
pub mod highscores;
pub mod platform;
pub mod render;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use error::ArcadeError;
pub use games::{GameId, GameSnapshot};
pub use highscores::HighScores;
pub use settings::Settings;
pub use sim::{Collaborators, Game, GameContext, Session, SessionPhase, SessionSnapshot};
pub use tuning::Tuning;

use glam::Vec2;

/// Arcade-wide constants
pub mod consts {
    /// Fixed simulation timestep in milliseconds (60 Hz)
    pub const TICK_MS: f32 = 1000.0 / 60.0;
    /// Maximum substeps per animation frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest wall-clock gap a single frame may feed into the accumulator
    pub const MAX_FRAME_MS: f64 = 250.0;

    /// Default drawing surface size
    pub const CANVAS_WIDTH: f32 = 800.0;
    pub const CANVAS_HEIGHT: f32 = 600.0;
}

/// How far past the opposite edge a wrapped entity lands at minimum
const WRAP_SLACK: f32 = 0.01;

/// Toroidal screen-edge wrap for one axis.
///
/// An entity whose centre has crossed an edge while heading outward reappears
/// beyond the opposite edge: past `size` lands below 0, below 0 lands past
/// `size`. The overshoot carries over while it is within `margin`, so a body
/// slides back in where it left; anything further is pinned just off the edge.
/// Only outward motion wraps, which keeps a freshly wrapped entity from being
/// sent straight back.
#[inline]
pub fn wrap_axis(value: f32, velocity: f32, size: f32, margin: f32) -> f32 {
    if value > size && velocity > 0.0 {
        (value - size - margin).min(-WRAP_SLACK)
    } else if value < 0.0 && velocity < 0.0 {
        (value + size + margin).max(size + WRAP_SLACK)
    } else {
        value
    }
}

/// Toroidal wrap of a moving position within `bounds`
#[inline]
pub fn wrap_position(pos: Vec2, vel: Vec2, bounds: Vec2, margin: f32) -> Vec2 {
    Vec2::new(
        wrap_axis(pos.x, vel.x, bounds.x, margin),
        wrap_axis(pos.y, vel.y, bounds.y, margin),
    )
}

/// Loop a coordinate around `[-margin, size + margin)`.
///
/// For conveyor-style rows where objects must fully leave before coming back
/// around and their spacing has to survive the trip.
#[inline]
pub fn wrap_loop(value: f32, size: f32, margin: f32) -> f32 {
    let span = size + 2.0 * margin;
    (value + margin).rem_euclid(span) - margin
}

/// Circle-circle overlap (touching counts)
#[inline]
pub fn circles_overlap(a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    a.distance(b) <= ra + rb
}
