//! Game implementations and the registry that builds them by id

pub mod asteroids;
pub mod frogger;
pub mod pacman;
pub mod pong;
pub mod snake;

use core::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ArcadeError;
use crate::sim::Game;
use crate::tuning::Tuning;

/// Every game the arcade shell knows about
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GameId {
    Snake,
    Pong,
    Breakout,
    Flappy,
    SpaceInvaders,
    Frogger,
    Tetris,
    Asteroids,
    Pacman,
    Roguelike,
}

impl GameId {
    pub const ALL: [GameId; 10] = [
        GameId::Snake,
        GameId::Pong,
        GameId::Breakout,
        GameId::Flappy,
        GameId::SpaceInvaders,
        GameId::Frogger,
        GameId::Tetris,
        GameId::Asteroids,
        GameId::Pacman,
        GameId::Roguelike,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            GameId::Snake => "snake",
            GameId::Pong => "pong",
            GameId::Breakout => "breakout",
            GameId::Flappy => "flappy",
            GameId::SpaceInvaders => "space-invaders",
            GameId::Frogger => "frogger",
            GameId::Tetris => "tetris",
            GameId::Asteroids => "asteroids",
            GameId::Pacman => "pacman",
            GameId::Roguelike => "roguelike",
        }
    }

    /// Whether `create` can build this game
    pub fn is_bundled(&self) -> bool {
        matches!(
            self,
            GameId::Snake | GameId::Pong | GameId::Frogger | GameId::Asteroids | GameId::Pacman
        )
    }
}

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GameId {
    type Err = ArcadeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace('_', "-");
        GameId::ALL
            .into_iter()
            .find(|id| id.as_str() == wanted || (wanted == "spaceinvaders" && *id == GameId::SpaceInvaders))
            .ok_or_else(|| ArcadeError::UnknownGame(s.to_string()))
    }
}

/// Build a fresh game instance
pub fn create(id: GameId, tuning: &Tuning) -> Result<Box<dyn Game>, ArcadeError> {
    let game: Box<dyn Game> = match id {
        GameId::Asteroids => Box::new(asteroids::Asteroids::new(tuning.asteroids.clone())),
        GameId::Pacman => Box::new(pacman::Pacman::new(tuning.pacman.clone())),
        GameId::Snake => Box::new(snake::Snake::new(tuning.snake.clone())),
        GameId::Pong => Box::new(pong::Pong::new(tuning.pong.clone())),
        GameId::Frogger => Box::new(frogger::Frogger::new(tuning.frogger.clone())),
        other => return Err(ArcadeError::NotBundled(other)),
    };
    log::debug!("Created game {id}");
    Ok(game)
}

/// Per-game read-only state
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "game", rename_all = "kebab-case")]
pub enum GameSnapshot {
    Asteroids(asteroids::AsteroidsSnapshot),
    Pacman(pacman::PacmanSnapshot),
    Snake(snake::SnakeSnapshot),
    Pong(pong::PongSnapshot),
    Frogger(frogger::FroggerSnapshot),
    /// Game exposes nothing beyond the session counters
    Empty,
}
