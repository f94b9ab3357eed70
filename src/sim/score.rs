//! Score, lives and level counters owned by the session

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scoreboard {
    pub score: u64,
    pub lives: u32,
    pub level: u32,
}

impl Scoreboard {
    pub fn new(start_lives: u32) -> Self {
        Self {
            score: 0,
            lives: start_lives,
            level: 1,
        }
    }

    /// Score only ever goes up during play
    pub fn add_points(&mut self, points: u64) {
        self.score = self.score.saturating_add(points);
    }

    /// Take one life; returns true when none are left
    pub fn lose_life(&mut self) -> bool {
        self.lives = self.lives.saturating_sub(1);
        self.lives == 0
    }

    pub fn gain_life(&mut self) {
        self.lives = self.lives.saturating_add(1);
    }

    pub fn is_out_of_lives(&self) -> bool {
        self.lives == 0
    }
}
