//! Pac-Man
//!
//! Tick order: ready freeze, input, timers (mode schedule, frightened window,
//! house release, fruit), pacman movement and eating, level check, ghost
//! movement, pacman/ghost contact.

pub mod actors;
pub mod ghost;
pub mod maze;

use glam::{IVec2, Vec2};
use serde::Serialize;

use self::actors::PacmanActor;
use self::ghost::{Ghost, GhostId, GhostMode, ModeSchedule, chase_target, steer_random, steer_toward};
use self::maze::{COLS, DOWN, FRUIT_TILE, HOUSE_EXIT, LEFT, Maze, Pellet, RIGHT, ROWS, Tile, UP};
use super::{GameId, GameSnapshot};
use crate::render::{Color, Surface};
use crate::sim::{Control, Game, GameContext, InputSource, RandomSource, SoundCue};
use crate::tuning::PacmanTuning;

const EPSILON: f32 = 1e-5;

/// Fruit value by level; the last entry repeats
const FRUIT_POINTS: [u64; 13] = [100, 300, 500, 500, 700, 700, 1000, 1000, 2000, 2000, 3000, 3000, 5000];

/// Top of the maze below the HUD strip
const MAZE_TOP: f32 = 32.0;

pub fn fruit_points(level: u32) -> u64 {
    let i = (level.max(1) - 1) as usize;
    FRUIT_POINTS[i.min(FRUIT_POINTS.len() - 1)]
}

#[derive(Debug, Clone, Serialize)]
pub struct Fruit {
    pub points: u64,
    pub remaining_ms: f32,
}

#[derive(Debug, Clone, Serialize)]
pub struct PacmanSnapshot {
    pub mode: GhostMode,
    pub frightened_ms: f32,
    pub ready_ms: f32,
    pub pacman: PacmanActor,
    pub ghosts: Vec<Ghost>,
    /// Row-major pellet grid, `None` where nothing is left to eat
    pub pellets: Vec<Option<Pellet>>,
    pub dots_remaining: usize,
    pub dots_eaten: u32,
    pub ghost_combo: u32,
    pub fruit: Option<Fruit>,
}

pub struct Pacman {
    tuning: PacmanTuning,
    maze: Maze,
    bounds: Vec2,
    pellets: Vec<Option<Pellet>>,
    remaining: usize,
    /// Eaten this level, drives fruit
    dots_eaten: u32,
    pac: PacmanActor,
    ghosts: Vec<Ghost>,
    schedule: ModeSchedule,
    frightened_ms: f32,
    /// Ghosts eaten in the current frightened window
    ghost_combo: u32,
    fruit: Option<Fruit>,
    ready_ms: f32,
    level: u32,
}

impl Pacman {
    pub fn new(tuning: PacmanTuning) -> Self {
        let pellets = Maze::pellets();
        let remaining = pellets.iter().flatten().count();
        Self {
            maze: Maze::classic(),
            bounds: Vec2::ZERO,
            pellets,
            remaining,
            dots_eaten: 0,
            pac: PacmanActor::new(),
            ghosts: Vec::new(),
            schedule: ModeSchedule::new(),
            frightened_ms: 0.0,
            ghost_combo: 0,
            fruit: None,
            ready_ms: tuning.ready_ms,
            level: 1,
            tuning,
        }
    }

    pub fn mode(&self) -> GhostMode {
        self.schedule.mode(&self.tuning.mode_schedule_ms)
    }

    fn speed_scale(&self) -> f32 {
        let steps = self.level.saturating_sub(1) as f32;
        (1.0 + self.tuning.level_speed_step * steps).min(self.tuning.level_speed_cap)
    }

    /// Frightened window for the current level
    pub fn fright_duration(&self) -> f32 {
        let shrink = self.tuning.frightened_step_ms * self.level.saturating_sub(1) as f32;
        (self.tuning.frightened_ms - shrink).max(self.tuning.frightened_min_ms)
    }

    fn refill_pellets(&mut self) {
        self.pellets = Maze::pellets();
        self.remaining = self.pellets.iter().flatten().count();
        self.dots_eaten = 0;
    }

    /// Actors to their start tiles, schedule restarted, overlays cleared
    fn reset_round(&mut self) {
        self.pac = PacmanActor::new();
        self.ghosts = GhostId::ALL
            .into_iter()
            .map(|id| Ghost::new(id, self.tuning.release_ms[id.index()]))
            .collect();
        self.schedule = ModeSchedule::new();
        self.frightened_ms = 0.0;
        self.ghost_combo = 0;
        self.fruit = None;
        self.ready_ms = self.tuning.ready_ms;
    }

    fn read_input(&mut self, input: &dyn InputSource) {
        for (control, dir) in [
            (Control::Up, UP),
            (Control::Left, LEFT),
            (Control::Down, DOWN),
            (Control::Right, RIGHT),
        ] {
            if input.is_pressed(control) {
                self.pac.next_dir = dir;
                break;
            }
        }
    }

    fn run_timers(&mut self, dt_ms: f32) {
        if self.frightened_ms > 0.0 {
            // Scatter/chase clock is frozen for the whole window
            self.frightened_ms -= dt_ms;
            if self.frightened_ms <= 0.0 {
                self.frightened_ms = 0.0;
                self.ghost_combo = 0;
                for ghost in &mut self.ghosts {
                    ghost.frightened = false;
                }
                log::debug!("Frightened window over");
            }
        } else if self.schedule.advance(dt_ms, &self.tuning.mode_schedule_ms) {
            log::debug!("Ghost mode -> {:?}", self.mode());
            for ghost in self.ghosts.iter_mut().filter(|g| g.is_active() && !g.eaten) {
                ghost.mover.reverse();
            }
        }

        for ghost in self.ghosts.iter_mut().filter(|g| g.in_house) {
            ghost.release_ms -= dt_ms;
            if ghost.release_ms <= 0.0 {
                ghost.release();
            }
        }

        if let Some(fruit) = self.fruit.as_mut() {
            fruit.remaining_ms -= dt_ms;
            if fruit.remaining_ms <= 0.0 {
                self.fruit = None;
            }
        }
    }

    /// Power pellet: frighten and reverse every roaming ghost
    fn frighten(&mut self) {
        self.frightened_ms = self.fright_duration();
        self.ghost_combo = 0;
        for ghost in self.ghosts.iter_mut().filter(|g| g.is_active() && !g.eaten) {
            ghost.frightened = true;
            ghost.mover.reverse();
        }
    }

    fn move_pacman(&mut self, dt_s: f32, ctx: &mut GameContext) {
        // Reversing is allowed anywhere, not just at tile centres
        if !self.pac.mover.at_center() && self.pac.next_dir == -self.pac.mover.dir {
            self.pac.mover.reverse();
        }

        let mut budget = self.tuning.pacman_speed * self.speed_scale() * dt_s;
        while budget > EPSILON {
            if self.pac.mover.at_center() && !self.pac.steer(&self.maze) {
                break;
            }
            let (left, arrived) = self.pac.mover.step(budget);
            budget = left;
            if arrived {
                self.eat(self.pac.tile(), ctx);
            }
        }
        if self.pac.moving {
            self.pac.anim = (self.pac.anim + dt_s * 6.0).fract();
        }

        let on_fruit =
            self.pac.mover.position().distance(FRUIT_TILE.as_vec2()) < self.tuning.catch_distance;
        if let Some(fruit) = self.fruit.take_if(|_| on_fruit) {
            ctx.board.add_points(fruit.points);
            ctx.play(SoundCue::Score);
            log::debug!("Fruit eaten (+{})", fruit.points);
        }
    }

    fn eat(&mut self, tile: IVec2, ctx: &mut GameContext) {
        let Some(slot) = Maze::index(tile).and_then(|i| self.pellets.get_mut(i)) else {
            return;
        };
        match slot.take() {
            Some(Pellet::Dot) => ctx.board.add_points(self.tuning.dot_points),
            Some(Pellet::Power) => {
                ctx.board.add_points(self.tuning.pellet_points);
                ctx.play(SoundCue::Powerup);
                self.frighten();
            }
            None => return,
        }
        self.remaining -= 1;
        self.dots_eaten += 1;

        if self.fruit.is_none() && self.tuning.fruit_thresholds.contains(&self.dots_eaten) {
            let points = fruit_points(self.level);
            self.fruit = Some(Fruit {
                points,
                remaining_ms: self.tuning.fruit_ms,
            });
            log::debug!("Fruit worth {points} appeared");
        }
    }

    fn move_ghosts(&mut self, dt_s: f32, rng: &mut dyn RandomSource) {
        let mode = self.mode();
        let pac_tile = self.pac.tile();
        let pac_dir = self.pac.facing();
        let blinky_tile = self
            .ghosts
            .iter()
            .find(|g| g.id == GhostId::Blinky)
            .map_or(HOUSE_EXIT, |g| g.tile());
        let base = self.tuning.ghost_speed * self.speed_scale();

        for ghost in self.ghosts.iter_mut().filter(|g| g.is_active()) {
            let factor = if ghost.eaten {
                2.0
            } else if ghost.frightened {
                0.5
            } else {
                1.0
            };
            let mut budget = base * factor * dt_s;
            while budget > EPSILON {
                if ghost.mover.at_center() {
                    if ghost.eaten && ghost.tile() == HOUSE_EXIT {
                        ghost.eaten = false;
                        log::debug!("{:?} back in play", ghost.id);
                    }
                    let tile = ghost.tile();
                    let dir = ghost.mover.dir;
                    ghost.mover.dir = if ghost.frightened {
                        steer_random(&self.maze, tile, dir, rng)
                    } else {
                        ghost.target = if ghost.eaten {
                            HOUSE_EXIT
                        } else if mode == GhostMode::Scatter {
                            ghost.id.scatter_corner()
                        } else {
                            chase_target(
                                ghost.id,
                                tile,
                                pac_tile,
                                pac_dir,
                                blinky_tile,
                                self.tuning.clyde_shy_distance,
                            )
                        };
                        steer_toward(&self.maze, tile, dir, ghost.target)
                    };
                }
                let (left, _) = ghost.mover.step(budget);
                budget = left;
            }
        }
    }

    fn resolve_contacts(&mut self, ctx: &mut GameContext) {
        let pac_pos = self.pac.mover.position();
        let catch = self.tuning.catch_distance;
        let mut caught = false;

        for ghost in self.ghosts.iter_mut() {
            if !ghost.is_active() || ghost.eaten {
                continue;
            }
            if ghost.mover.position().distance(pac_pos) >= catch {
                continue;
            }
            if ghost.frightened {
                let points = self.tuning.ghost_points << self.ghost_combo.min(3);
                self.ghost_combo += 1;
                ghost.frightened = false;
                ghost.eaten = true;
                ctx.board.add_points(points);
                ctx.play(SoundCue::Hit);
                log::debug!("{:?} eaten (+{points})", ghost.id);
            } else {
                caught = true;
                break;
            }
        }

        if caught {
            ctx.play(SoundCue::Death);
            let out = ctx.board.lose_life();
            log::info!("Pac-Man caught, {} lives left", ctx.board.lives);
            if !out {
                self.reset_round();
            }
        }
    }

    fn complete_level(&mut self, ctx: &mut GameContext) {
        ctx.board.level += 1;
        self.level = ctx.board.level;
        ctx.play(SoundCue::Score);
        log::info!("Pac-Man level {} cleared", self.level - 1);
        self.refill_pellets();
        self.reset_round();
    }

    // === Drawing ===

    fn tile_size(&self) -> f32 {
        self.tuning.tile_size
    }

    fn origin(&self) -> Vec2 {
        Vec2::new((self.bounds.x - COLS as f32 * self.tile_size()) * 0.5, MAZE_TOP)
    }

    /// Pixel centre of a (possibly fractional) tile position
    fn to_screen(&self, pos: Vec2) -> Vec2 {
        self.origin() + (pos + Vec2::splat(0.5)) * self.tile_size()
    }

    fn draw_maze(&self, surface: &mut dyn Surface) {
        let ts = self.tile_size();
        for y in 0..ROWS {
            for x in 0..COLS {
                let tile = IVec2::new(x, y);
                let min = self.origin() + tile.as_vec2() * ts;
                match self.maze.tile(tile) {
                    Tile::Wall => surface.fill_rect(min, Vec2::splat(ts), Color::BLUE),
                    Tile::Door => surface.fill_rect(
                        min + Vec2::new(0.0, ts * 0.4),
                        Vec2::new(ts, ts * 0.2),
                        Color::PINK,
                    ),
                    Tile::Open => {}
                }
                let center = self.to_screen(tile.as_vec2());
                match Maze::index(tile).and_then(|i| self.pellets.get(i).copied().flatten()) {
                    Some(Pellet::Dot) => surface.fill_circle(center, ts * 0.12, Color::WHITE),
                    Some(Pellet::Power) => surface.fill_circle(center, ts * 0.35, Color::WHITE),
                    None => {}
                }
            }
        }
    }

    fn draw_pacman(&self, surface: &mut dyn Surface) {
        let center = self.to_screen(self.pac.mover.position());
        let radius = self.tile_size() * 0.45;
        let facing = self.pac.facing().as_vec2().to_angle();
        // Mouth opens and closes with the animation phase
        let mouth = 0.8 * (1.0 - (self.pac.anim * 2.0 - 1.0).abs()) + 0.05;
        let mut points = vec![center];
        let segments = 16;
        for i in 0..=segments {
            let t = i as f32 / segments as f32;
            let angle = facing + mouth * 0.5 + t * (std::f32::consts::TAU - mouth);
            points.push(center + Vec2::from_angle(angle) * radius);
        }
        surface.fill_polygon(&points, Color::YELLOW);
    }

    fn draw_ghost(&self, ghost: &Ghost, surface: &mut dyn Surface) {
        let center = self.to_screen(ghost.mover.position());
        let radius = self.tile_size() * 0.45;
        if !ghost.eaten {
            let flashing = self.frightened_ms < 2000.0 && (self.frightened_ms / 200.0) as u32 % 2 == 1;
            let body = match (ghost.frightened, flashing) {
                (true, true) => Color::WHITE,
                (true, false) => Color::BLUE,
                (false, _) => ghost.id.color(),
            };
            surface.fill_circle(center, radius, body);
        }
        let look = ghost.mover.dir.as_vec2() * radius * 0.15;
        for side in [-1.0, 1.0] {
            let eye = center + Vec2::new(side * radius * 0.4, -radius * 0.2);
            surface.fill_circle(eye, radius * 0.25, Color::WHITE);
            surface.fill_circle(eye + look, radius * 0.12, Color::BLUE);
        }
    }
}

impl Game for Pacman {
    fn id(&self) -> GameId {
        GameId::Pacman
    }

    fn start_lives(&self) -> u32 {
        self.tuning.start_lives
    }

    fn init(&mut self, ctx: &mut GameContext) {
        self.bounds = ctx.bounds;
        self.level = ctx.board.level;
        self.refill_pellets();
        self.reset_round();
    }

    fn update(&mut self, dt_ms: f32, ctx: &mut GameContext) {
        if self.ready_ms > 0.0 {
            self.ready_ms = (self.ready_ms - dt_ms).max(0.0);
            return;
        }
        let dt_s = dt_ms / 1000.0;

        self.read_input(ctx.input);
        self.run_timers(dt_ms);
        self.move_pacman(dt_s, ctx);
        if self.remaining == 0 {
            self.complete_level(ctx);
            return;
        }
        self.move_ghosts(dt_s, ctx.rng);
        self.resolve_contacts(ctx);
    }

    fn render(&self, surface: &mut dyn Surface) {
        surface.clear(Color::BLACK);
        self.draw_maze(surface);

        if self.fruit.is_some() {
            let center = self.to_screen(FRUIT_TILE.as_vec2());
            surface.fill_circle(center, self.tile_size() * 0.4, Color::RED);
        }
        for ghost in self.ghosts.iter() {
            self.draw_ghost(ghost, surface);
        }
        self.draw_pacman(surface);

        if self.ready_ms > 0.0 {
            let pos = self.to_screen(Vec2::new(11.0, 17.0));
            surface.text(pos, "READY!", self.tile_size(), Color::YELLOW);
        }
    }

    fn snapshot(&self) -> GameSnapshot {
        GameSnapshot::Pacman(PacmanSnapshot {
            mode: self.mode(),
            frightened_ms: self.frightened_ms,
            ready_ms: self.ready_ms,
            pacman: self.pac.clone(),
            ghosts: self.ghosts.clone(),
            pellets: self.pellets.clone(),
            dots_remaining: self.remaining,
            dots_eaten: self.dots_eaten,
            ghost_combo: self.ghost_combo,
            fruit: self.fruit.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::pacman::actors::Mover;
    use crate::games::pacman::maze::PACMAN_START;
    use crate::games::testing::Rig;

    const DT: f32 = crate::consts::TICK_MS;

    fn tuning() -> PacmanTuning {
        PacmanTuning {
            ready_ms: 0.0,
            ..PacmanTuning::default()
        }
    }

    fn game_with(rig: &mut Rig, tuning: PacmanTuning) -> Pacman {
        let mut game = Pacman::new(tuning);
        game.init(&mut rig.ctx());
        game
    }

    fn game(rig: &mut Rig) -> Pacman {
        game_with(rig, tuning())
    }

    fn blinky(game: &mut Pacman) -> &mut Ghost {
        &mut game.ghosts[GhostId::Blinky.index()]
    }

    #[test]
    fn test_init_state() {
        let mut rig = Rig::new(1);
        let game = game(&mut rig);
        assert_eq!(game.remaining, 244);
        assert_eq!(game.ghosts.len(), 4);
        assert!(game.ghosts[0].is_active());
        assert!(game.ghosts[1..].iter().all(|g| g.in_house));
        assert_eq!(game.mode(), GhostMode::Scatter);
        assert_eq!(game.pac.tile(), PACMAN_START);
    }

    #[test]
    fn test_ready_freeze_holds_everything() {
        let mut rig = Rig::new(1);
        let mut game = game_with(&mut rig, PacmanTuning::default());
        let start = game.pac.mover.position();
        game.update(DT, &mut rig.ctx());
        assert_eq!(game.pac.mover.position(), start);
        assert!(game.ghosts[1].in_house);

        for _ in 0..125 {
            game.update(DT, &mut rig.ctx());
        }
        assert_ne!(game.pac.mover.position(), start);
        assert!(!game.ghosts[1].in_house);
    }

    #[test]
    fn test_eating_ghosts_doubles_points() {
        let mut rig = Rig::new(2);
        let mut game = game(&mut rig);
        for ghost in &mut game.ghosts {
            ghost.release();
        }
        game.frighten();
        assert!(game.ghosts.iter().all(|g| g.frightened));

        let pac_tile = game.pac.tile();
        let mut totals = Vec::new();
        for i in 0..4 {
            game.ghosts[i].mover = Mover::at(pac_tile, LEFT);
            game.resolve_contacts(&mut rig.ctx());
            assert!(game.ghosts[i].eaten);
            totals.push(rig.board.score);
        }
        assert_eq!(totals, vec![200, 600, 1400, 3000]);
        assert_eq!(rig.board.lives, 3);
        assert_eq!(rig.audio.count(SoundCue::Hit), 4);
    }

    #[test]
    fn test_eaten_ghost_is_harmless() {
        let mut rig = Rig::new(2);
        let mut game = game(&mut rig);
        let pac_tile = game.pac.tile();
        let ghost = blinky(&mut game);
        ghost.eaten = true;
        ghost.mover = Mover::at(pac_tile, LEFT);
        game.resolve_contacts(&mut rig.ctx());
        assert_eq!((rig.board.lives, rig.board.score), (3, 0));
    }

    #[test]
    fn test_power_pellet_frightens_and_reverses() {
        let mut rig = Rig::new(3);
        let mut game = game(&mut rig);
        blinky(&mut game).mover = Mover {
            tile: IVec2::new(10, 11),
            dir: LEFT,
            progress: 0.5,
        };

        game.eat(IVec2::new(1, 3), &mut rig.ctx());

        assert_eq!(rig.board.score, 50);
        assert_eq!(game.frightened_ms, 6000.0);
        let b = blinky(&mut game).clone();
        assert!(b.frightened);
        assert_eq!(b.mover.dir, RIGHT);
        assert_eq!(b.mover.tile, IVec2::new(9, 11));
        // Ghosts still in the house are not affected
        assert!(!game.ghosts[GhostId::Clyde.index()].frightened);
    }

    #[test]
    fn test_walking_onto_pellet_starts_frightened_window() {
        let mut rig = Rig::new(3);
        let mut game = game(&mut rig);
        game.pac.mover = Mover::at(IVec2::new(1, 4), UP);
        game.pac.next_dir = UP;
        for _ in 0..10 {
            game.update(DT, &mut rig.ctx());
        }
        assert!(game.pellets[Maze::index(IVec2::new(1, 3)).unwrap()].is_none());
        assert!(rig.board.score >= 50);
        assert!(game.frightened_ms > 0.0);
        assert_eq!(rig.audio.count(SoundCue::Powerup), 1);
    }

    #[test]
    fn test_snapshot_shows_which_pellets_remain() {
        let mut rig = Rig::new(3);
        let mut game = game(&mut rig);
        let power = Maze::index(IVec2::new(1, 3)).unwrap();
        let dot = Maze::index(IVec2::new(1, 1)).unwrap();

        let GameSnapshot::Pacman(before) = game.snapshot() else {
            panic!("wrong snapshot kind");
        };
        assert_eq!(before.pellets.len(), (COLS * ROWS) as usize);
        assert_eq!(before.pellets[power], Some(Pellet::Power));
        assert_eq!(before.pellets[dot], Some(Pellet::Dot));
        assert_eq!(before.pellets.iter().flatten().count(), before.dots_remaining);

        game.eat(IVec2::new(1, 3), &mut rig.ctx());
        let GameSnapshot::Pacman(after) = game.snapshot() else {
            panic!("wrong snapshot kind");
        };
        assert_eq!(after.pellets[power], None);
        assert_eq!(after.pellets[dot], Some(Pellet::Dot));
        assert_eq!(after.dots_remaining, before.dots_remaining - 1);
    }

    #[test]
    fn test_frightened_window_freezes_then_resumes_schedule() {
        let mut rig = Rig::new(4);
        let mut game = game_with(
            &mut rig,
            PacmanTuning {
                mode_schedule_ms: vec![100.0, 100_000.0],
                ..tuning()
            },
        );
        game.frighten();
        game.ghost_combo = 2;

        game.run_timers(6000.0);
        assert_eq!(game.frightened_ms, 0.0);
        assert_eq!(game.ghost_combo, 0);
        assert!(game.ghosts.iter().all(|g| !g.frightened));
        // The schedule did not move during the window
        assert_eq!(game.mode(), GhostMode::Scatter);

        game.run_timers(150.0);
        assert_eq!(game.mode(), GhostMode::Chase);
    }

    #[test]
    fn test_mode_switch_reverses_roaming_ghosts() {
        let mut rig = Rig::new(4);
        let mut game = game_with(
            &mut rig,
            PacmanTuning {
                mode_schedule_ms: vec![100.0, 100_000.0],
                ..tuning()
            },
        );
        blinky(&mut game).mover = Mover {
            tile: IVec2::new(10, 11),
            dir: LEFT,
            progress: 0.5,
        };
        game.run_timers(50.0);
        assert_eq!(blinky(&mut game).mover.dir, LEFT);
        game.run_timers(60.0);
        assert_eq!(blinky(&mut game).mover.dir, RIGHT);
        assert_eq!(game.mode(), GhostMode::Chase);
    }

    #[test]
    fn test_fright_duration_shrinks_with_floor() {
        let mut rig = Rig::new(5);
        let mut game = game(&mut rig);
        assert_eq!(game.fright_duration(), 6000.0);
        game.level = 3;
        assert_eq!(game.fright_duration(), 4000.0);
        game.level = 40;
        assert_eq!(game.fright_duration(), 1000.0);
    }

    #[test]
    fn test_speed_scale_is_capped() {
        let mut rig = Rig::new(5);
        let mut game = game(&mut rig);
        assert_eq!(game.speed_scale(), 1.0);
        game.level = 1000;
        assert_eq!(game.speed_scale(), game.tuning.level_speed_cap);
    }

    #[test]
    fn test_clearing_maze_advances_level() {
        let mut rig = Rig::new(6);
        let mut game = game(&mut rig);
        game.pellets.iter_mut().for_each(|p| *p = None);
        game.pellets[Maze::index(IVec2::new(12, 23)).unwrap()] = Some(Pellet::Dot);
        game.remaining = 1;

        for _ in 0..30 {
            game.update(DT, &mut rig.ctx());
            if rig.board.level == 2 {
                break;
            }
        }
        assert_eq!(rig.board.level, 2);
        assert_eq!(game.level, 2);
        assert_eq!(game.remaining, 244);
        assert_eq!(game.pac.tile(), PACMAN_START);
        assert_eq!(rig.board.score, 10);
    }

    #[test]
    fn test_caught_by_ghost_loses_life_and_resets_round() {
        let mut rig = Rig::new(7);
        let mut game = game(&mut rig);
        game.fruit = Some(Fruit {
            points: 100,
            remaining_ms: 5000.0,
        });
        game.pac.mover = Mover::at(IVec2::new(6, 5), RIGHT);
        blinky(&mut game).mover = Mover::at(IVec2::new(6, 5), LEFT);
        game.schedule.advance(8000.0, &game.tuning.mode_schedule_ms);

        game.resolve_contacts(&mut rig.ctx());

        assert_eq!(rig.board.lives, 2);
        assert_eq!(game.pac.tile(), PACMAN_START);
        assert_eq!(blinky(&mut game).tile(), HOUSE_EXIT);
        assert!(game.fruit.is_none());
        assert_eq!(game.mode(), GhostMode::Scatter);
        assert_eq!(rig.audio.count(SoundCue::Death), 1);
    }

    #[test]
    fn test_fruit_appears_at_threshold_and_scores_by_level() {
        let mut rig = Rig::new(8);
        let mut game = game(&mut rig);
        game.dots_eaten = 69;
        game.eat(IVec2::new(12, 23), &mut rig.ctx());
        assert_eq!(game.fruit.as_ref().map(|f| f.points), Some(100));

        game.pac.mover = Mover::at(FRUIT_TILE, LEFT);
        game.pac.next_dir = LEFT;
        let before = rig.board.score;
        game.move_pacman(DT / 1000.0, &mut rig.ctx());
        assert_eq!(rig.board.score, before + 100);
        assert!(game.fruit.is_none());

        assert_eq!(fruit_points(3), 500);
        assert_eq!(fruit_points(13), 5000);
        assert_eq!(fruit_points(99), 5000);
    }

    #[test]
    fn test_fruit_expires() {
        let mut rig = Rig::new(8);
        let mut game = game(&mut rig);
        game.fruit = Some(Fruit {
            points: 100,
            remaining_ms: 100.0,
        });
        game.run_timers(150.0);
        assert!(game.fruit.is_none());
    }

    #[test]
    fn test_house_release_is_staggered() {
        let mut rig = Rig::new(9);
        let mut game = game(&mut rig);
        game.run_timers(DT);
        assert!(game.ghosts[GhostId::Pinky.index()].is_active());
        assert!(game.ghosts[GhostId::Inky.index()].in_house);

        game.run_timers(4000.0);
        assert!(game.ghosts[GhostId::Inky.index()].is_active());
        assert_eq!(game.ghosts[GhostId::Inky.index()].tile(), HOUSE_EXIT);
        assert!(game.ghosts[GhostId::Clyde.index()].in_house);
    }

    #[test]
    fn test_pacman_uses_side_tunnel() {
        let mut rig = Rig::new(10);
        let mut game = game(&mut rig);
        game.pac.mover = Mover::at(IVec2::new(0, 14), LEFT);
        game.pac.next_dir = LEFT;
        for _ in 0..10 {
            game.move_pacman(DT / 1000.0, &mut rig.ctx());
        }
        assert_eq!(game.pac.tile(), IVec2::new(27, 14));
    }

    #[test]
    fn test_pacman_reverses_mid_tile() {
        let mut rig = Rig::new(10);
        let mut game = game(&mut rig);
        game.pac.mover = Mover {
            tile: IVec2::new(6, 5),
            dir: RIGHT,
            progress: 0.5,
        };
        rig.input.press(Control::Left);
        rig.idle();
        game.update(DT, &mut rig.ctx());
        assert_eq!(game.pac.facing(), LEFT);
        assert!(game.pac.mover.position().x < 6.5);
    }

    #[test]
    fn test_ghosts_follow_scatter_targets() {
        let mut rig = Rig::new(11);
        let mut game = game(&mut rig);
        game.move_ghosts(DT / 1000.0, &mut rig.rng);
        assert_eq!(blinky(&mut game).target, GhostId::Blinky.scatter_corner());
    }

    #[test]
    fn test_render_shows_ready_banner() {
        let mut rig = Rig::new(12);
        let game = game_with(&mut rig, PacmanTuning::default());
        let mut surface = crate::render::DisplayList::new(rig.bounds);
        game.render(&mut surface);
        assert!(surface.texts().any(|t| t == "READY!"));
    }
}
