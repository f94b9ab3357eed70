//! Frogger
//!
//! 13x13 grid. Row 0 holds the five homes, rows 1-5 are river, row 6 the
//! median, rows 7-11 road and row 12 the start bank. Lane objects move in
//! column units and wrap once fully off either side.

use glam::{IVec2, Vec2};
use serde::Serialize;

use super::{GameId, GameSnapshot};
use crate::render::{Color, Surface};
use crate::sim::{Control, Game, GameContext, InputSource, SoundCue};
use crate::tuning::FroggerTuning;
use crate::wrap_loop;

pub const COLS: i32 = 13;
pub const ROWS: i32 = 13;
pub const START_ROW: i32 = 12;
/// Columns of the five home slots on row 0
pub const HOME_COLUMNS: [i32; 5] = [2, 4, 6, 8, 10];

/// Drowning rule for a frog carried on the river: its centre must stay in `[0, cols)`
pub fn off_river(center: f32, cols: i32) -> bool {
    !(0.0..cols as f32).contains(&center)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LaneKind {
    River,
    Road,
}

/// A row of moving logs or cars
#[derive(Debug, Clone, Serialize)]
pub struct Lane {
    pub row: i32,
    pub kind: LaneKind,
    /// Columns per second at level 1; negative moves left
    pub speed: f32,
    /// Length of every object in the lane, in columns
    pub length: f32,
    /// Left edge of each object, in columns
    pub objects: Vec<f32>,
}

impl Lane {
    fn new(row: i32, kind: LaneKind, speed: f32, length: f32, count: usize) -> Self {
        let span = COLS as f32 + 2.0 * length;
        let objects = (0..count)
            .map(|i| i as f32 * span / count as f32 - length)
            .collect();
        Self {
            row,
            kind,
            speed,
            length,
            objects,
        }
    }

    fn advance(&mut self, delta: f32) {
        for x in &mut self.objects {
            *x = wrap_loop(*x + delta, COLS as f32, self.length);
        }
    }

    /// Object under the column position `x`
    fn supports(&self, x: f32) -> bool {
        self.objects.iter().any(|left| (*left..*left + self.length).contains(&x))
    }

    /// Any object overlapping the cell span `[min, max)`
    fn overlaps(&self, min: f32, max: f32) -> bool {
        self.objects.iter().any(|left| *left < max && left + self.length > min)
    }
}

/// River rows 1-5 then road rows 7-11: (row, kind, object length, object count)
const LANE_SHAPES: [(i32, LaneKind, f32, usize); 10] = [
    (1, LaneKind::River, 3.0, 3),
    (2, LaneKind::River, 2.0, 3),
    (3, LaneKind::River, 4.0, 2),
    (4, LaneKind::River, 2.0, 3),
    (5, LaneKind::River, 3.0, 3),
    (7, LaneKind::Road, 2.0, 3),
    (8, LaneKind::Road, 1.0, 4),
    (9, LaneKind::Road, 1.0, 3),
    (10, LaneKind::Road, 2.0, 2),
    (11, LaneKind::Road, 1.0, 4),
];

#[derive(Debug, Clone, Serialize)]
pub struct FroggerSnapshot {
    /// Left edge of the frog's cell, in columns
    pub frog_x: f32,
    pub frog_row: i32,
    pub homes: [bool; 5],
    pub lanes: Vec<Lane>,
    pub speed_scale: f32,
}

pub struct Frogger {
    tuning: FroggerTuning,
    bounds: Vec2,
    lanes: Vec<Lane>,
    frog_x: f32,
    frog_row: i32,
    /// Furthest row reached by the current frog
    best_row: i32,
    homes: [bool; 5],
    level: u32,
}

impl Frogger {
    pub fn new(tuning: FroggerTuning) -> Self {
        Self {
            tuning,
            bounds: Vec2::ZERO,
            lanes: Vec::new(),
            frog_x: (COLS / 2) as f32,
            frog_row: START_ROW,
            best_row: START_ROW,
            homes: [false; 5],
            level: 1,
        }
    }

    pub fn speed_scale(&self) -> f32 {
        let steps = self.level.saturating_sub(1) as f32;
        (1.0 + self.tuning.level_speed_step * steps).min(self.tuning.level_speed_cap)
    }

    fn frog_center(&self) -> f32 {
        self.frog_x + 0.5
    }

    fn build_lanes(&mut self) {
        self.lanes = LANE_SHAPES
            .iter()
            .map(|&(row, kind, length, count)| {
                let speed = self.tuning.lane_speed.get(row as usize).copied().unwrap_or(0.0);
                Lane::new(row, kind, speed, length, count)
            })
            .collect();
    }

    fn lane(&self, row: i32) -> Option<&Lane> {
        self.lanes.iter().find(|l| l.row == row)
    }

    fn new_frog(&mut self) {
        self.frog_x = (COLS / 2) as f32;
        self.frog_row = START_ROW;
        self.best_row = START_ROW;
    }

    /// Returns whether the frog moved
    fn hop(&mut self, input: &dyn InputSource) -> bool {
        let step = [
            (Control::Up, IVec2::NEG_Y),
            (Control::Down, IVec2::Y),
            (Control::Left, IVec2::NEG_X),
            (Control::Right, IVec2::X),
        ]
        .into_iter()
        .find(|(control, _)| input.is_just_pressed(*control))
        .map(|(_, step)| step);
        let Some(step) = step else {
            return false;
        };

        let row = self.frog_row + step.y;
        let x = self.frog_x + step.x as f32;
        if !(0..ROWS).contains(&row) || off_river(x + 0.5, COLS) {
            return false;
        }
        self.frog_row = row;
        // Land rows snap back onto the grid after a log ride
        self.frog_x = if self.lane(row).is_some_and(|l| l.kind == LaneKind::River) {
            x
        } else {
            x.round()
        };
        true
    }

    fn die(&mut self, cause: &str, ctx: &mut GameContext) {
        ctx.play(SoundCue::Death);
        let out = ctx.board.lose_life();
        log::info!("Frog {cause}, {} lives left", ctx.board.lives);
        if !out {
            self.new_frog();
        }
    }

    fn reach_home(&mut self, ctx: &mut GameContext) {
        let column = self.frog_center().floor() as i32;
        let slot = HOME_COLUMNS.iter().position(|c| *c == column);
        let Some(slot) = slot.filter(|s| !self.homes[*s]) else {
            self.die("missed the home", ctx);
            return;
        };

        self.homes[slot] = true;
        ctx.board.add_points(self.tuning.home_points);
        ctx.play(SoundCue::Score);
        self.new_frog();

        if self.homes.iter().all(|h| *h) {
            self.homes = [false; 5];
            ctx.board.add_points(self.tuning.level_points);
            ctx.board.level += 1;
            self.level = ctx.board.level;
            ctx.play(SoundCue::Powerup);
            log::info!("Frogger level {}, lanes x{:.2}", self.level, self.speed_scale());
        }
    }

    fn cell_min(&self, x: f32, row: i32) -> Vec2 {
        let size = self.tuning.cell_size;
        let board = Vec2::new(COLS as f32, ROWS as f32) * size;
        (self.bounds - board) * 0.5 + Vec2::new(x, row as f32) * size
    }
}

impl Game for Frogger {
    fn id(&self) -> GameId {
        GameId::Frogger
    }

    fn start_lives(&self) -> u32 {
        self.tuning.start_lives
    }

    fn init(&mut self, ctx: &mut GameContext) {
        self.bounds = ctx.bounds;
        self.level = ctx.board.level;
        self.homes = [false; 5];
        self.build_lanes();
        self.new_frog();
    }

    fn update(&mut self, dt_ms: f32, ctx: &mut GameContext) {
        let dt_s = dt_ms / 1000.0;

        let row_before = self.frog_row;
        if self.hop(ctx.input) {
            ctx.play(SoundCue::Jump);
        }
        if self.frog_row < self.best_row {
            self.best_row = self.frog_row;
            ctx.board.add_points(self.tuning.hop_points);
        }

        let scale = self.speed_scale();
        for lane in &mut self.lanes {
            lane.advance(lane.speed * scale * dt_s);
        }

        if self.frog_row == 0 {
            self.reach_home(ctx);
            return;
        }

        let Some(lane) = self.lane(self.frog_row) else {
            return;
        };
        let kind = lane.kind;
        let drift = lane.speed * scale * dt_s;
        let safe = match kind {
            LaneKind::River => lane.supports(self.frog_center()),
            LaneKind::Road => !lane.overlaps(self.frog_x + 0.1, self.frog_x + 0.9),
        };
        match (kind, safe) {
            (LaneKind::River, false) => self.die("drowned", ctx),
            (LaneKind::Road, false) => self.die("hit by a car", ctx),
            (LaneKind::River, true) => {
                // A frog that just hopped on rides from the next tick
                if row_before == self.frog_row {
                    self.frog_x += drift;
                }
                if off_river(self.frog_center(), COLS) {
                    self.die("swept off the river", ctx);
                }
            }
            (LaneKind::Road, true) => {}
        }
    }

    fn render(&self, surface: &mut dyn Surface) {
        surface.clear(Color::BLACK);
        let size = self.tuning.cell_size;
        let row_rect = |row: i32| (self.cell_min(0.0, row), Vec2::new(COLS as f32 * size, size));

        for row in 1..=5 {
            let (min, extent) = row_rect(row);
            surface.fill_rect(min, extent, Color::BLUE);
        }
        for row in [0, 6, START_ROW] {
            let (min, extent) = row_rect(row);
            surface.fill_rect(min, extent, Color::GRAY);
        }
        for (slot, column) in HOME_COLUMNS.iter().enumerate() {
            let min = self.cell_min(*column as f32, 0);
            let color = if self.homes[slot] { Color::GREEN } else { Color::BLACK };
            surface.fill_rect(min + Vec2::splat(4.0), Vec2::splat(size - 8.0), color);
        }

        for lane in &self.lanes {
            let color = match lane.kind {
                LaneKind::River => Color::ORANGE,
                LaneKind::Road => Color::RED,
            };
            for x in &lane.objects {
                let min = self.cell_min(*x, lane.row) + Vec2::new(0.0, 4.0);
                surface.fill_rect(min, Vec2::new(lane.length * size, size - 8.0), color);
            }
        }

        let center = self.cell_min(self.frog_x, self.frog_row) + Vec2::splat(size * 0.5);
        surface.fill_circle(center, size * 0.4, Color::GREEN);
    }

    fn snapshot(&self) -> GameSnapshot {
        GameSnapshot::Frogger(FroggerSnapshot {
            frog_x: self.frog_x,
            frog_row: self.frog_row,
            homes: self.homes,
            lanes: self.lanes.clone(),
            speed_scale: self.speed_scale(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::testing::Rig;

    const DT: f32 = crate::consts::TICK_MS;

    fn game(rig: &mut Rig) -> Frogger {
        let mut game = Frogger::new(FroggerTuning::default());
        game.init(&mut rig.ctx());
        game
    }

    fn lane_mut(game: &mut Frogger, row: i32) -> &mut Lane {
        game.lanes.iter_mut().find(|l| l.row == row).unwrap()
    }

    /// Put the frog on `row` at `x` with a single object under or over it
    fn place(game: &mut Frogger, row: i32, x: f32, object: Option<f32>) {
        game.frog_row = row;
        game.frog_x = x;
        lane_mut(game, row).objects = object.into_iter().collect();
    }

    #[test]
    fn test_init_layout() {
        let mut rig = Rig::new(1);
        let game = game(&mut rig);
        assert_eq!((game.frog_x, game.frog_row), (6.0, START_ROW));
        assert_eq!(game.lanes.len(), 10);
        assert!(game.lane(6).is_none());
        assert!(game.lanes.iter().filter(|l| l.kind == LaneKind::River).all(|l| (1..=5).contains(&l.row)));
    }

    #[test]
    fn test_hop_scores_only_new_rows() {
        let mut rig = Rig::new(2);
        let mut game = game(&mut rig);
        game.lanes.clear();

        rig.tap(Control::Up);
        game.update(DT, &mut rig.ctx());
        assert_eq!(game.frog_row, 11);
        assert_eq!(rig.board.score, 10);

        rig.tap(Control::Down);
        game.update(DT, &mut rig.ctx());
        rig.tap(Control::Up);
        game.update(DT, &mut rig.ctx());
        assert_eq!(game.frog_row, 11);
        assert_eq!(rig.board.score, 10);
        assert_eq!(rig.audio.count(SoundCue::Jump), 3);
    }

    #[test]
    fn test_hop_off_the_board_is_ignored() {
        let mut rig = Rig::new(2);
        let mut game = game(&mut rig);
        rig.tap(Control::Down);
        game.update(DT, &mut rig.ctx());
        assert_eq!(game.frog_row, START_ROW);

        game.frog_x = 0.0;
        rig.tap(Control::Left);
        game.update(DT, &mut rig.ctx());
        assert_eq!(game.frog_x, 0.0);
    }

    #[test]
    fn test_car_hit_costs_life() {
        let mut rig = Rig::new(3);
        let mut game = game(&mut rig);
        place(&mut game, 8, 5.0, Some(5.2));
        game.update(DT, &mut rig.ctx());
        assert_eq!(rig.board.lives, 2);
        assert_eq!(game.frog_row, START_ROW);
    }

    #[test]
    fn test_clear_road_is_safe() {
        let mut rig = Rig::new(3);
        let mut game = game(&mut rig);
        place(&mut game, 8, 5.0, Some(9.0));
        game.update(DT, &mut rig.ctx());
        assert_eq!(rig.board.lives, 3);
    }

    #[test]
    fn test_open_water_drowns() {
        let mut rig = Rig::new(4);
        let mut game = game(&mut rig);
        place(&mut game, 3, 5.0, None);
        game.update(DT, &mut rig.ctx());
        assert_eq!(rig.board.lives, 2);
        assert_eq!(rig.audio.count(SoundCue::Death), 1);
    }

    #[test]
    fn test_log_carries_frog() {
        let mut rig = Rig::new(4);
        let mut game = game(&mut rig);
        // Row 1 moves right at 1.2 columns per second
        place(&mut game, 1, 5.0, Some(4.0));
        game.update(DT, &mut rig.ctx());
        assert_eq!(rig.board.lives, 3);
        assert!((game.frog_x - (5.0 + 1.2 * DT / 1000.0)).abs() < 1e-4);
    }

    #[test]
    fn test_drowning_boundary_is_half_open() {
        assert!(off_river(-0.001, COLS));
        assert!(!off_river(0.0, COLS));
        assert!(!off_river(12.999, COLS));
        assert!(off_river(13.0, COLS));
    }

    #[test]
    fn test_centre_on_right_edge_drowns() {
        let mut rig = Rig::new(5);
        let mut game = game(&mut rig);
        // Still lane so the frog centre sits exactly on the boundary
        lane_mut(&mut game, 1).speed = 0.0;
        place(&mut game, 1, 12.5, Some(10.5));
        game.update(DT, &mut rig.ctx());
        assert_eq!(rig.board.lives, 2);
    }

    #[test]
    fn test_centre_just_inside_either_edge_survives() {
        for (x, log) in [(12.49, 10.5), (-0.5, -1.0)] {
            let mut rig = Rig::new(5);
            let mut game = game(&mut rig);
            lane_mut(&mut game, 1).speed = 0.0;
            place(&mut game, 1, x, Some(log));
            game.update(DT, &mut rig.ctx());
            assert_eq!(rig.board.lives, 3, "frog at {x}");
        }
    }

    #[test]
    fn test_log_carry_past_edge_drowns() {
        let mut rig = Rig::new(5);
        let mut game = game(&mut rig);
        place(&mut game, 1, 12.49, Some(10.5));
        game.update(DT, &mut rig.ctx());
        assert_eq!(rig.board.lives, 2);
        assert_eq!(game.frog_row, START_ROW);
    }

    #[test]
    fn test_filling_home_scores_and_restarts_frog() {
        let mut rig = Rig::new(6);
        let mut game = game(&mut rig);
        place(&mut game, 1, 4.0, Some(3.0));
        game.best_row = 1;
        rig.tap(Control::Up);
        game.update(DT, &mut rig.ctx());
        assert!(game.homes[1]);
        assert_eq!(rig.board.score, 10 + 50);
        assert_eq!((game.frog_x, game.frog_row), (6.0, START_ROW));
    }

    #[test]
    fn test_filled_home_or_bank_is_fatal() {
        let mut rig = Rig::new(7);
        let mut game = game(&mut rig);
        game.homes[2] = true;
        game.frog_row = 0;
        game.frog_x = 6.0;
        game.update(DT, &mut rig.ctx());
        assert_eq!(rig.board.lives, 2);

        game.frog_row = 0;
        game.frog_x = 5.0;
        game.update(DT, &mut rig.ctx());
        assert_eq!(rig.board.lives, 1);
    }

    #[test]
    fn test_all_homes_complete_level() {
        let mut rig = Rig::new(8);
        let mut game = game(&mut rig);
        game.homes = [true, true, true, false, true];
        game.best_row = 0;
        game.frog_row = 0;
        game.frog_x = 8.0;
        game.update(DT, &mut rig.ctx());
        assert_eq!(rig.board.score, 50 + 1000);
        assert_eq!(rig.board.level, 2);
        assert_eq!(game.homes, [false; 5]);
        assert!((game.speed_scale() - 1.15).abs() < 1e-5);

        game.level = 100;
        assert_eq!(game.speed_scale(), 2.0);
    }

    #[test]
    fn test_lane_objects_wrap_around() {
        let mut lane = Lane::new(1, LaneKind::River, 1.0, 3.0, 1);
        for _ in 0..1000 {
            lane.advance(0.37);
            let x = lane.objects[0];
            assert!((-3.0..16.0).contains(&x), "x = {x}");
        }
    }
}
