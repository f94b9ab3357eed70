//! Ghost targeting, steering and the scatter/chase schedule
//!
//! Targets are pure functions of the ghost's identity, pacman's tile and
//! facing, and Blinky's tile. Steering picks the open neighbour closest to the
//! target (squared distance, ties broken up, left, down, right) and never
//! reverses unless that is the only way out.

use glam::IVec2;
use serde::Serialize;

use super::actors::Mover;
use super::maze::{HOUSE_EXIT, LEFT, Maze, UP};
use crate::render::Color;
use crate::sim::RandomSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GhostId {
    Blinky,
    Pinky,
    Inky,
    Clyde,
}

impl GhostId {
    pub const ALL: [GhostId; 4] = [GhostId::Blinky, GhostId::Pinky, GhostId::Inky, GhostId::Clyde];

    pub fn index(self) -> usize {
        self as usize
    }

    /// Fixed corner targeted in scatter mode (some lie outside the maze)
    pub fn scatter_corner(self) -> IVec2 {
        match self {
            GhostId::Blinky => IVec2::new(25, -3),
            GhostId::Pinky => IVec2::new(2, -3),
            GhostId::Inky => IVec2::new(27, 31),
            GhostId::Clyde => IVec2::new(0, 31),
        }
    }

    pub fn color(self) -> Color {
        match self {
            GhostId::Blinky => Color::RED,
            GhostId::Pinky => Color::PINK,
            GhostId::Inky => Color::CYAN,
            GhostId::Clyde => Color::ORANGE,
        }
    }

    /// Where the ghost waits before release
    pub fn home_tile(self) -> IVec2 {
        match self {
            GhostId::Blinky => HOUSE_EXIT,
            GhostId::Pinky => IVec2::new(13, 14),
            GhostId::Inky => IVec2::new(11, 14),
            GhostId::Clyde => IVec2::new(15, 14),
        }
    }
}

/// Session-wide ghost phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GhostMode {
    Scatter,
    Chase,
}

/// Scatter/chase timer. Even entries are scatter, odd entries chase; once the
/// schedule runs out the mode stays chase.
#[derive(Debug, Clone, Serialize)]
pub struct ModeSchedule {
    phase: usize,
    elapsed_ms: f32,
}

impl ModeSchedule {
    pub fn new() -> Self {
        Self {
            phase: 0,
            elapsed_ms: 0.0,
        }
    }

    pub fn mode(&self, schedule: &[f32]) -> GhostMode {
        if self.phase >= schedule.len() || self.phase % 2 == 1 {
            GhostMode::Chase
        } else {
            GhostMode::Scatter
        }
    }

    /// Advance the clock; returns true when the mode flipped
    pub fn advance(&mut self, dt_ms: f32, schedule: &[f32]) -> bool {
        let before = self.mode(schedule);
        self.elapsed_ms += dt_ms;
        while let Some(&length) = schedule.get(self.phase) {
            if self.elapsed_ms < length {
                break;
            }
            self.elapsed_ms -= length;
            self.phase += 1;
        }
        self.mode(schedule) != before
    }
}

impl Default for ModeSchedule {
    fn default() -> Self {
        Self::new()
    }
}

/// Chase target for `id`
pub fn chase_target(
    id: GhostId,
    ghost_tile: IVec2,
    pac_tile: IVec2,
    pac_dir: IVec2,
    blinky_tile: IVec2,
    shy_distance: f32,
) -> IVec2 {
    match id {
        GhostId::Blinky => pac_tile,
        GhostId::Pinky => pac_tile + pac_dir * 4,
        GhostId::Inky => {
            let pivot = pac_tile + pac_dir * 2;
            pivot * 2 - blinky_tile
        }
        GhostId::Clyde => {
            if ghost_tile.as_vec2().distance(pac_tile.as_vec2()) > shy_distance {
                pac_tile
            } else {
                id.scatter_corner()
            }
        }
    }
}

/// Open neighbours a ghost may take from `tile`, reversal only as a last resort
fn exits(maze: &Maze, tile: IVec2, dir: IVec2) -> Vec<IVec2> {
    let forward: Vec<IVec2> = maze.open_exits(tile).filter(|d| *d != -dir).collect();
    if forward.is_empty() { vec![-dir] } else { forward }
}

/// Direction toward `target` from a tile centre
pub fn steer_toward(maze: &Maze, tile: IVec2, dir: IVec2, target: IVec2) -> IVec2 {
    let mut best = -dir;
    let mut best_dist = i32::MAX;
    for d in exits(maze, tile, dir) {
        let dist = (tile + d).distance_squared(target);
        // Strict less-than keeps the earlier direction on ties
        if dist < best_dist {
            best = d;
            best_dist = dist;
        }
    }
    best
}

/// Random non-reversing direction (frightened)
pub fn steer_random(maze: &Maze, tile: IVec2, dir: IVec2, rng: &mut dyn RandomSource) -> IVec2 {
    let options = exits(maze, tile, dir);
    options[rng.below(options.len())]
}

#[derive(Debug, Clone, Serialize)]
pub struct Ghost {
    pub id: GhostId,
    pub mover: Mover,
    pub frightened: bool,
    /// Eyes returning to the house; cannot be eaten or hurt pacman
    pub eaten: bool,
    pub in_house: bool,
    /// Time left before leaving the house
    pub release_ms: f32,
    /// Last target chosen, for inspection
    pub target: IVec2,
}

impl Ghost {
    pub fn new(id: GhostId, release_ms: f32) -> Self {
        let in_house = id != GhostId::Blinky;
        Self {
            id,
            mover: Mover::at(id.home_tile(), if in_house { UP } else { LEFT }),
            frightened: false,
            eaten: false,
            in_house,
            release_ms,
            target: id.scatter_corner(),
        }
    }

    pub fn tile(&self) -> IVec2 {
        self.mover.tile
    }

    /// Roaming the maze (not waiting in the house)
    pub fn is_active(&self) -> bool {
        !self.in_house
    }

    /// Leave the house through the door
    pub fn release(&mut self) {
        self.in_house = false;
        self.mover = Mover::at(HOUSE_EXIT, LEFT);
        log::debug!("{:?} released", self.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::pacman::maze::{DOWN, RIGHT};
    use crate::sim::seeded;

    const SCHEDULE: [f32; 7] = [7000.0, 20_000.0, 7000.0, 20_000.0, 5000.0, 20_000.0, 5000.0];

    fn target(id: GhostId, ghost: IVec2, blinky: IVec2) -> IVec2 {
        chase_target(id, ghost, IVec2::new(10, 10), RIGHT, blinky, 8.0)
    }

    #[test]
    fn test_blinky_and_pinky_targets() {
        let blinky = IVec2::new(1, 1);
        assert_eq!(target(GhostId::Blinky, blinky, blinky), IVec2::new(10, 10));
        assert_eq!(target(GhostId::Pinky, IVec2::new(5, 5), blinky), IVec2::new(14, 10));
    }

    #[test]
    fn test_inky_doubles_vector_from_blinky() {
        // Pivot (12, 10); blinky at (5, 5) -> 2 * (12, 10) - (5, 5)
        let t = target(GhostId::Inky, IVec2::new(0, 0), IVec2::new(5, 5));
        assert_eq!(t, IVec2::new(19, 15));
    }

    #[test]
    fn test_clyde_retreats_when_close() {
        let blinky = IVec2::new(1, 1);
        assert_eq!(target(GhostId::Clyde, IVec2::new(1, 29), blinky), IVec2::new(10, 10));
        assert_eq!(target(GhostId::Clyde, IVec2::new(12, 10), blinky), GhostId::Clyde.scatter_corner());
        // Exactly 8 tiles is "not farther than 8"
        assert_eq!(target(GhostId::Clyde, IVec2::new(18, 10), blinky), GhostId::Clyde.scatter_corner());
    }

    #[test]
    fn test_steering_never_reverses_at_a_corridor() {
        let maze = Maze::classic();
        // (6, 5) is a junction on the upper corridor; target straight behind
        let dir = steer_toward(&maze, IVec2::new(6, 5), RIGHT, IVec2::new(0, 5));
        assert_ne!(dir, LEFT);
    }

    #[test]
    fn test_steering_at_a_corner_takes_the_only_forward_exit() {
        let maze = Maze::classic();
        // Moving up into (1, 1): up and left are walls and down would be a
        // reversal, even though the target lies that way
        assert_eq!(steer_toward(&maze, IVec2::new(1, 1), UP, IVec2::new(1, 30)), RIGHT);
    }

    #[test]
    fn test_steering_tie_prefers_up_then_left() {
        let maze = Maze::classic();
        // (6, 5): up, down, left, right all open. Coming from the left
        // (dir RIGHT), a target equidistant from up and down picks up.
        let tile = IVec2::new(6, 5);
        assert_eq!(steer_toward(&maze, tile, RIGHT, IVec2::new(6, 5)), UP);
        // Coming down (dir DOWN), target level with left and right picks left
        assert_eq!(steer_toward(&maze, tile, DOWN, IVec2::new(6, 9)), DOWN);
        assert_eq!(steer_toward(&maze, tile, DOWN, IVec2::new(6, 5)), LEFT);
    }

    #[test]
    fn test_random_steering_respects_no_reverse() {
        let maze = Maze::classic();
        let mut rng = seeded(4);
        for _ in 0..100 {
            let d = steer_random(&maze, IVec2::new(6, 5), RIGHT, &mut rng);
            assert_ne!(d, LEFT);
            assert!(maze.is_open(IVec2::new(6, 5) + d));
        }
    }

    #[test]
    fn test_schedule_alternates_then_chases_forever() {
        let mut schedule = ModeSchedule::new();
        assert_eq!(schedule.mode(&SCHEDULE), GhostMode::Scatter);
        assert!(!schedule.advance(6999.0, &SCHEDULE));
        assert!(schedule.advance(1.0, &SCHEDULE));
        assert_eq!(schedule.mode(&SCHEDULE), GhostMode::Chase);
        assert!(schedule.advance(20_000.0, &SCHEDULE));
        assert_eq!(schedule.mode(&SCHEDULE), GhostMode::Scatter);

        schedule.advance(7000.0 + 20_000.0 + 5000.0 + 20_000.0 + 5000.0, &SCHEDULE);
        assert_eq!(schedule.mode(&SCHEDULE), GhostMode::Chase);
        assert!(!schedule.advance(1.0e7, &SCHEDULE));
        assert_eq!(schedule.mode(&SCHEDULE), GhostMode::Chase);
    }

    #[test]
    fn test_only_blinky_starts_outside() {
        for id in GhostId::ALL {
            let g = Ghost::new(id, 0.0);
            assert_eq!(g.in_house, id != GhostId::Blinky);
        }
    }
}
