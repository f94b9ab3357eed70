//! Static maze grid and the dots laid on it

use glam::IVec2;
use serde::Serialize;

pub const COLS: i32 = 28;
pub const ROWS: i32 = 31;

/// Screen-space unit steps (+y is down)
pub const UP: IVec2 = IVec2::new(0, -1);
pub const LEFT: IVec2 = IVec2::new(-1, 0);
pub const DOWN: IVec2 = IVec2::new(0, 1);
pub const RIGHT: IVec2 = IVec2::new(1, 0);

/// Direction preference when choices tie
pub const DIRECTIONS: [IVec2; 4] = [UP, LEFT, DOWN, RIGHT];

pub const PACMAN_START: IVec2 = IVec2::new(13, 23);
/// Tile just above the house door; released ghosts appear here and eaten
/// ghosts head back to it
pub const HOUSE_EXIT: IVec2 = IVec2::new(13, 11);
pub const FRUIT_TILE: IVec2 = IVec2::new(13, 17);

// `#` wall, `-` house door, `.` dot, `o` power pellet, space open floor
const LAYOUT: [&str; ROWS as usize] = [
    "############################",
    "#............##............#",
    "#.####.#####.##.#####.####.#",
    "#o####.#####.##.#####.####o#",
    "#.####.#####.##.#####.####.#",
    "#..........................#",
    "#.####.##.########.##.####.#",
    "#.####.##.########.##.####.#",
    "#......##....##....##......#",
    "######.##### ## #####.######",
    "     #.##### ## #####.#     ",
    "     #.##          ##.#     ",
    "     #.## ###--### ##.#     ",
    "######.## #      # ##.######",
    "      .   #      #   .      ",
    "######.## #      # ##.######",
    "     #.## ######## ##.#     ",
    "     #.##          ##.#     ",
    "     #.## ######## ##.#     ",
    "######.## ######## ##.######",
    "#............##............#",
    "#.####.#####.##.#####.####.#",
    "#.####.#####.##.#####.####.#",
    "#o..##.......  .......##..o#",
    "###.##.##.########.##.##.###",
    "###.##.##.########.##.##.###",
    "#......##....##....##......#",
    "#.##########.##.##########.#",
    "#.##########.##.##########.#",
    "#..........................#",
    "############################",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tile {
    Wall,
    Door,
    Open,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Pellet {
    Dot,
    Power,
}

/// Fixed tile grid; rows wrap horizontally (the side tunnel)
#[derive(Debug, Clone)]
pub struct Maze {
    tiles: Vec<Tile>,
}

impl Maze {
    pub fn classic() -> Self {
        let tiles = LAYOUT
            .iter()
            .flat_map(|row| row.chars())
            .map(|c| match c {
                '#' => Tile::Wall,
                '-' => Tile::Door,
                _ => Tile::Open,
            })
            .collect();
        Self { tiles }
    }

    /// Dots and pellets as laid out at the start of a level
    pub fn pellets() -> Vec<Option<Pellet>> {
        LAYOUT
            .iter()
            .flat_map(|row| row.chars())
            .map(|c| match c {
                '.' => Some(Pellet::Dot),
                'o' => Some(Pellet::Power),
                _ => None,
            })
            .collect()
    }

    /// Bring the column back onto the grid
    pub fn wrap(tile: IVec2) -> IVec2 {
        IVec2::new(tile.x.rem_euclid(COLS), tile.y)
    }

    /// Grid index of a wrapped tile, `None` above or below the maze
    pub fn index(tile: IVec2) -> Option<usize> {
        let t = Self::wrap(tile);
        (0..ROWS).contains(&t.y).then(|| (t.y * COLS + t.x) as usize)
    }

    pub fn tile(&self, tile: IVec2) -> Tile {
        Self::index(tile)
            .and_then(|i| self.tiles.get(i).copied())
            .unwrap_or(Tile::Wall)
    }

    /// Walkable for pacman and roaming ghosts (the door never is)
    pub fn is_open(&self, tile: IVec2) -> bool {
        self.tile(tile) == Tile::Open
    }

    pub fn open_exits(&self, tile: IVec2) -> impl Iterator<Item = IVec2> + '_ {
        DIRECTIONS.into_iter().filter(move |d| self.is_open(tile + *d))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_counts() {
        let pellets = Maze::pellets();
        assert_eq!(pellets.len(), (COLS * ROWS) as usize);
        let dots = pellets.iter().filter(|p| **p == Some(Pellet::Dot)).count();
        let power = pellets.iter().filter(|p| **p == Some(Pellet::Power)).count();
        assert_eq!((dots, power), (240, 4));
    }

    #[test]
    fn test_key_tiles_are_open() {
        let maze = Maze::classic();
        for tile in [PACMAN_START, HOUSE_EXIT, FRUIT_TILE, IVec2::new(13, 14)] {
            assert!(maze.is_open(tile), "{tile} should be open");
        }
        assert_eq!(maze.tile(IVec2::new(13, 12)), Tile::Door);
        assert!(!maze.is_open(IVec2::new(13, 12)));
    }

    #[test]
    fn test_tunnel_wraps() {
        let maze = Maze::classic();
        assert!(maze.is_open(IVec2::new(-1, 14)));
        assert_eq!(Maze::wrap(IVec2::new(-1, 14)), IVec2::new(27, 14));
        assert_eq!(Maze::wrap(IVec2::new(28, 14)), IVec2::new(0, 14));
    }

    #[test]
    fn test_outside_rows_are_walls() {
        let maze = Maze::classic();
        assert_eq!(maze.tile(IVec2::new(5, -1)), Tile::Wall);
        assert_eq!(maze.tile(IVec2::new(5, ROWS)), Tile::Wall);
    }

    #[test]
    fn test_no_dead_ends_in_corridors() {
        let maze = Maze::classic();
        let pellets = Maze::pellets();
        for y in 0..ROWS {
            for x in 0..COLS {
                let tile = IVec2::new(x, y);
                if pellets[Maze::index(tile).unwrap()].is_some() {
                    assert!(maze.open_exits(tile).count() >= 2, "dead end at {tile}");
                }
            }
        }
    }
}
