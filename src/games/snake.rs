//! Snake
//!
//! Grid game stepped on its own interval inside the fixed tick. The interval
//! shrinks with level down to a floor.

use std::collections::VecDeque;

use glam::{IVec2, Vec2};
use serde::Serialize;

use super::{GameId, GameSnapshot};
use crate::render::{Color, Surface};
use crate::sim::{Control, Game, GameContext, InputSource, RandomSource, SoundCue};
use crate::tuning::SnakeTuning;

const START_LENGTH: i32 = 3;

#[derive(Debug, Clone, Serialize)]
pub struct SnakeSnapshot {
    pub body: Vec<IVec2>,
    pub dir: IVec2,
    pub food: Option<IVec2>,
    pub foods_eaten: u32,
    pub step_ms: f32,
}

pub struct Snake {
    tuning: SnakeTuning,
    cols: i32,
    rows: i32,
    /// Head first
    body: VecDeque<IVec2>,
    dir: IVec2,
    next_dir: IVec2,
    food: Option<IVec2>,
    step_acc_ms: f32,
    foods_eaten: u32,
    level: u32,
}

impl Snake {
    pub fn new(tuning: SnakeTuning) -> Self {
        Self {
            tuning,
            cols: 0,
            rows: 0,
            body: VecDeque::new(),
            dir: IVec2::X,
            next_dir: IVec2::X,
            food: None,
            step_acc_ms: 0.0,
            foods_eaten: 0,
            level: 1,
        }
    }

    /// Milliseconds between moves at the current level
    pub fn step_interval(&self) -> f32 {
        let shrink = self.tuning.step_ms_per_level * self.level.saturating_sub(1) as f32;
        (self.tuning.step_ms - shrink).max(self.tuning.min_step_ms)
    }

    fn in_grid(&self, cell: IVec2) -> bool {
        (0..self.cols).contains(&cell.x) && (0..self.rows).contains(&cell.y)
    }

    /// Fresh three-cell snake in the middle, heading right
    fn respawn(&mut self, rng: &mut dyn RandomSource) {
        let head = IVec2::new(self.cols / 2, self.rows / 2);
        self.body = (0..START_LENGTH).map(|i| head - IVec2::X * i).collect();
        self.dir = IVec2::X;
        self.next_dir = IVec2::X;
        self.step_acc_ms = 0.0;
        self.place_food(rng);
    }

    /// Uniform over free cells; `None` once the snake fills the grid
    fn place_food(&mut self, rng: &mut dyn RandomSource) {
        let free: Vec<IVec2> = (0..self.rows)
            .flat_map(|y| (0..self.cols).map(move |x| IVec2::new(x, y)))
            .filter(|cell| !self.body.contains(cell))
            .collect();
        self.food = (!free.is_empty()).then(|| free[rng.below(free.len())]);
    }

    fn read_input(&mut self, input: &dyn InputSource) {
        for (control, dir) in [
            (Control::Up, IVec2::NEG_Y),
            (Control::Down, IVec2::Y),
            (Control::Left, IVec2::NEG_X),
            (Control::Right, IVec2::X),
        ] {
            // Checked against the last move so two quick turns cannot fold back
            if input.is_just_pressed(control) && dir != -self.dir {
                self.next_dir = dir;
            }
        }
    }

    /// One grid move. Returns false when the snake died.
    fn step(&mut self, ctx: &mut GameContext) -> bool {
        self.dir = self.next_dir;
        let Some(&head) = self.body.front() else {
            return false;
        };
        let next = head + self.dir;
        let eating = self.food == Some(next);

        // The tail moves out of the way unless the snake is growing
        let blocking = if eating {
            self.body.len()
        } else {
            self.body.len().saturating_sub(1)
        };
        if !self.in_grid(next) || self.body.iter().take(blocking).any(|c| *c == next) {
            self.die(ctx);
            return false;
        }

        self.body.push_front(next);
        if eating {
            self.foods_eaten += 1;
            ctx.board.add_points(self.tuning.food_points);
            ctx.play(SoundCue::Score);
            if self.tuning.foods_per_level > 0 && self.foods_eaten % self.tuning.foods_per_level == 0 {
                ctx.board.level += 1;
                self.level = ctx.board.level;
                log::info!("Snake level {}", self.level);
            }
            self.place_food(ctx.rng);
        } else {
            self.body.pop_back();
        }
        true
    }

    fn die(&mut self, ctx: &mut GameContext) {
        ctx.play(SoundCue::Death);
        let out = ctx.board.lose_life();
        log::info!("Snake crashed at length {}, {} lives left", self.body.len(), ctx.board.lives);
        if !out {
            self.respawn(ctx.rng);
        }
    }

    fn cell_rect(&self, cell: IVec2, inset: f32) -> (Vec2, Vec2) {
        let size = self.tuning.cell_size;
        (
            cell.as_vec2() * size + Vec2::splat(inset),
            Vec2::splat(size - 2.0 * inset),
        )
    }
}

impl Game for Snake {
    fn id(&self) -> GameId {
        GameId::Snake
    }

    fn start_lives(&self) -> u32 {
        self.tuning.start_lives
    }

    fn init(&mut self, ctx: &mut GameContext) {
        let size = self.tuning.cell_size.max(1.0);
        self.cols = (ctx.bounds.x / size) as i32;
        self.rows = (ctx.bounds.y / size) as i32;
        self.level = ctx.board.level;
        self.foods_eaten = 0;
        self.respawn(ctx.rng);
    }

    fn update(&mut self, dt_ms: f32, ctx: &mut GameContext) {
        self.read_input(ctx.input);
        self.step_acc_ms += dt_ms;
        while self.step_acc_ms >= self.step_interval() {
            self.step_acc_ms -= self.step_interval();
            if !self.step(ctx) {
                break;
            }
        }
    }

    fn render(&self, surface: &mut dyn Surface) {
        surface.clear(Color::BLACK);
        if let Some(food) = self.food {
            let (min, size) = self.cell_rect(food, 3.0);
            surface.fill_rect(min, size, Color::RED);
        }
        for (i, cell) in self.body.iter().enumerate() {
            let (min, size) = self.cell_rect(*cell, 1.0);
            let color = if i == 0 { Color::YELLOW } else { Color::GREEN };
            surface.fill_rect(min, size, color);
        }
    }

    fn snapshot(&self) -> GameSnapshot {
        GameSnapshot::Snake(SnakeSnapshot {
            body: self.body.iter().copied().collect(),
            dir: self.dir,
            food: self.food,
            foods_eaten: self.foods_eaten,
            step_ms: self.step_interval(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::testing::Rig;

    const DT: f32 = crate::consts::TICK_MS;

    fn game(rig: &mut Rig) -> Snake {
        let mut game = Snake::new(SnakeTuning::default());
        game.init(&mut rig.ctx());
        game
    }

    fn head(game: &Snake) -> IVec2 {
        game.body[0]
    }

    #[test]
    fn test_init_centres_snake_on_40_by_30_grid() {
        let mut rig = Rig::new(1);
        let game = game(&mut rig);
        assert_eq!((game.cols, game.rows), (40, 30));
        assert_eq!(head(&game), IVec2::new(20, 15));
        assert_eq!(game.body.len(), 3);
        let food = game.food.unwrap();
        assert!(!game.body.contains(&food));
    }

    #[test]
    fn test_moves_one_cell_per_interval() {
        let mut rig = Rig::new(1);
        let mut game = game(&mut rig);
        game.food = None;
        for _ in 0..7 {
            rig.idle();
            game.update(DT, &mut rig.ctx());
        }
        assert_eq!(head(&game), IVec2::new(20, 15));
        rig.idle();
        game.update(DT, &mut rig.ctx());
        assert_eq!(head(&game), IVec2::new(21, 15));
        assert_eq!(game.body.len(), 3);
    }

    #[test]
    fn test_cannot_reverse_into_itself() {
        let mut rig = Rig::new(2);
        let mut game = game(&mut rig);
        rig.tap(Control::Left);
        game.update(DT, &mut rig.ctx());
        assert_eq!(game.next_dir, IVec2::X);

        rig.tap(Control::Up);
        game.update(DT, &mut rig.ctx());
        assert_eq!(game.next_dir, IVec2::NEG_Y);
    }

    #[test]
    fn test_eating_grows_and_scores() {
        let mut rig = Rig::new(3);
        let mut game = game(&mut rig);
        game.food = Some(IVec2::new(21, 15));
        assert!(game.step(&mut rig.ctx()));
        assert_eq!(game.body.len(), 4);
        assert_eq!(rig.board.score, 10);
        assert_eq!(game.foods_eaten, 1);
        assert!(game.food.is_some_and(|f| !game.body.contains(&f)));
    }

    #[test]
    fn test_level_every_five_foods_speeds_up() {
        let mut rig = Rig::new(4);
        let mut game = game(&mut rig);
        for i in 0..5 {
            game.food = Some(head(&game) + game.dir);
            assert!(game.step(&mut rig.ctx()), "step {i}");
        }
        assert_eq!(rig.board.level, 2);
        assert_eq!(game.step_interval(), 112.0);

        game.level = 50;
        assert_eq!(game.step_interval(), 50.0);
    }

    #[test]
    fn test_wall_costs_life_and_respawns() {
        let mut rig = Rig::with_lives(5, 2);
        let mut game = game(&mut rig);
        game.body = VecDeque::from([IVec2::new(39, 5), IVec2::new(38, 5), IVec2::new(37, 5)]);
        assert!(!game.step(&mut rig.ctx()));
        assert_eq!(rig.board.lives, 1);
        assert_eq!(head(&game), IVec2::new(20, 15));
        assert_eq!(rig.audio.count(SoundCue::Death), 1);
    }

    #[test]
    fn test_last_life_leaves_wreck_in_place() {
        let mut rig = Rig::with_lives(5, 1);
        let mut game = game(&mut rig);
        game.body = VecDeque::from([IVec2::new(0, 0), IVec2::new(1, 0), IVec2::new(2, 0)]);
        game.dir = IVec2::NEG_X;
        game.next_dir = IVec2::NEG_X;
        assert!(!game.step(&mut rig.ctx()));
        assert_eq!(rig.board.lives, 0);
        assert_eq!(head(&game), IVec2::ZERO);
    }

    #[test]
    fn test_self_collision() {
        let mut rig = Rig::new(6);
        let mut game = game(&mut rig);
        game.food = None;
        // Head at (5,5) heading down into its own body at (5,6)
        game.body = VecDeque::from([
            IVec2::new(5, 5),
            IVec2::new(6, 5),
            IVec2::new(6, 6),
            IVec2::new(5, 6),
            IVec2::new(4, 6),
        ]);
        game.dir = IVec2::NEG_X;
        game.next_dir = IVec2::Y;
        assert!(!game.step(&mut rig.ctx()));
        assert_eq!(rig.board.lives, 2);
    }

    #[test]
    fn test_moving_into_vacating_tail_is_safe() {
        let mut rig = Rig::new(7);
        let mut game = game(&mut rig);
        game.food = None;
        game.body = VecDeque::from([
            IVec2::new(5, 5),
            IVec2::new(6, 5),
            IVec2::new(6, 6),
            IVec2::new(5, 6),
        ]);
        game.dir = IVec2::NEG_X;
        game.next_dir = IVec2::Y;
        assert!(game.step(&mut rig.ctx()));
        assert_eq!(head(&game), IVec2::new(5, 6));
    }

    #[test]
    fn test_food_never_lands_on_snake() {
        let mut rig = Rig::new(8);
        let mut game = game(&mut rig);
        // Fill everything but one cell
        game.body = (0..game.rows)
            .flat_map(|y| (0..game.cols).map(move |x| IVec2::new(x, y)))
            .filter(|c| *c != IVec2::new(7, 7))
            .collect();
        game.place_food(&mut rig.rng);
        assert_eq!(game.food, Some(IVec2::new(7, 7)));

        game.body.push_back(IVec2::new(7, 7));
        game.place_food(&mut rig.rng);
        assert_eq!(game.food, None);
    }
}
