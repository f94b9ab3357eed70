//! Tile-to-tile movement shared by pacman and the ghosts

use glam::{IVec2, Vec2};
use serde::Serialize;

use super::maze::{Maze, PACMAN_START, LEFT};

const EPSILON: f32 = 1e-4;

/// Position on the grid: the tile last centred on, plus progress toward the
/// neighbour in `dir`
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Mover {
    pub tile: IVec2,
    pub dir: IVec2,
    /// Fraction of the way to `tile + dir`, in `[0, 1)`
    pub progress: f32,
}

impl Mover {
    pub fn at(tile: IVec2, dir: IVec2) -> Self {
        Self {
            tile,
            dir,
            progress: 0.0,
        }
    }

    /// Continuous position in tile units
    pub fn position(&self) -> Vec2 {
        self.tile.as_vec2() + self.dir.as_vec2() * self.progress
    }

    pub fn at_center(&self) -> bool {
        self.progress <= 0.0
    }

    /// Turn around on the spot, keeping the current position
    pub fn reverse(&mut self) {
        if self.progress > 0.0 {
            self.tile = Maze::wrap(self.tile + self.dir);
            self.progress = 1.0 - self.progress;
        }
        self.dir = -self.dir;
    }

    /// Move up to `distance` tiles but stop at the next tile centre.
    /// Returns the unused distance and whether a centre was reached.
    pub fn step(&mut self, distance: f32) -> (f32, bool) {
        let to_center = 1.0 - self.progress;
        if distance + EPSILON < to_center {
            self.progress += distance;
            return (0.0, false);
        }
        self.tile = Maze::wrap(self.tile + self.dir);
        self.progress = 0.0;
        ((distance - to_center).max(0.0), true)
    }
}

/// The player
#[derive(Debug, Clone, Serialize)]
pub struct PacmanActor {
    pub mover: Mover,
    /// Queued turn, taken at the first tile centre where it is open
    pub next_dir: IVec2,
    pub moving: bool,
    /// Mouth animation phase in `[0, 1)`
    pub anim: f32,
}

impl PacmanActor {
    pub fn new() -> Self {
        Self {
            mover: Mover::at(PACMAN_START, LEFT),
            next_dir: LEFT,
            moving: true,
            anim: 0.0,
        }
    }

    pub fn tile(&self) -> IVec2 {
        self.mover.tile
    }

    pub fn facing(&self) -> IVec2 {
        self.mover.dir
    }

    /// At a tile centre: take the queued turn if open, then stop if blocked.
    /// Returns whether pacman can move on.
    pub fn steer(&mut self, maze: &Maze) -> bool {
        if maze.is_open(self.mover.tile + self.next_dir) {
            self.mover.dir = self.next_dir;
        }
        self.moving = maze.is_open(self.mover.tile + self.mover.dir);
        self.moving
    }
}

impl Default for PacmanActor {
    fn default() -> Self {
        Self::new()
    }
}
