//! Pong
//!
//! Player paddle on the left, AI paddle on the right. The AI tracks the ball
//! with a capped speed, so fast returns get past it. Paddle bounces take their
//! angle from where the ball struck the paddle.

use glam::Vec2;
use serde::Serialize;

use super::{GameId, GameSnapshot};
use crate::render::{Color, Surface};
use crate::sim::{Control, Game, GameContext, InputSource, RandomSource, SoundCue};
use crate::tuning::PongTuning;

/// Gap between each paddle and its edge of the court
const PADDLE_MARGIN: f32 = 16.0;
/// Steepest return off a paddle edge
const MAX_BOUNCE_ANGLE: f32 = std::f32::consts::FRAC_PI_3;
/// Serves leave within this angle of horizontal
const MAX_SERVE_ANGLE: f32 = 20.0 * std::f32::consts::PI / 180.0;
const SERVE_DELAY_MS: f32 = 1000.0;

#[derive(Debug, Clone, Serialize)]
pub struct PongSnapshot {
    pub player_y: f32,
    pub ai_y: f32,
    pub ball_pos: Vec2,
    pub ball_vel: Vec2,
    pub serve_ms: f32,
    pub player_points: u32,
}

/// Which way the next serve travels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Player,
    Ai,
}

pub struct Pong {
    tuning: PongTuning,
    bounds: Vec2,
    /// Paddle centres
    player_y: f32,
    ai_y: f32,
    ball_pos: Vec2,
    ball_vel: Vec2,
    /// Countdown before the ball is launched
    serve_ms: f32,
    serve_toward: Side,
    player_points: u32,
    level: u32,
}

impl Pong {
    pub fn new(tuning: PongTuning) -> Self {
        Self {
            tuning,
            bounds: Vec2::ZERO,
            player_y: 0.0,
            ai_y: 0.0,
            ball_pos: Vec2::ZERO,
            ball_vel: Vec2::ZERO,
            serve_ms: SERVE_DELAY_MS,
            serve_toward: Side::Ai,
            player_points: 0,
            level: 1,
        }
    }

    /// Serve speed for the current level
    pub fn ball_speed(&self) -> f32 {
        let steps = self.level.saturating_sub(1) as f32;
        (self.tuning.ball_speed * (1.0 + self.tuning.ball_speed_step * steps)).min(self.tuning.max_ball_speed)
    }

    fn player_x(&self) -> f32 {
        PADDLE_MARGIN
    }

    fn ai_x(&self) -> f32 {
        self.bounds.x - PADDLE_MARGIN - self.tuning.paddle_width
    }

    fn clamp_paddle(&self, y: f32) -> f32 {
        let half = self.tuning.paddle_height * 0.5;
        y.clamp(half, (self.bounds.y - half).max(half))
    }

    /// Ball back to the centre, waiting to serve toward `side`
    fn reset_ball(&mut self, side: Side) {
        self.ball_pos = self.bounds * 0.5;
        self.ball_vel = Vec2::ZERO;
        self.serve_ms = SERVE_DELAY_MS;
        self.serve_toward = side;
    }

    fn launch(&mut self, rng: &mut dyn RandomSource) {
        let angle = rng.range(-MAX_SERVE_ANGLE, MAX_SERVE_ANGLE);
        let sign = match self.serve_toward {
            Side::Player => -1.0,
            Side::Ai => 1.0,
        };
        let dir = Vec2::from_angle(angle);
        self.ball_vel = Vec2::new(dir.x * sign, dir.y) * self.ball_speed();
        log::debug!("Serve at {:.0} px/s", self.ball_speed());
    }

    fn move_paddles(&mut self, dt_s: f32, input: &dyn InputSource) {
        let mut axis = 0.0;
        if input.is_pressed(Control::Up) {
            axis -= 1.0;
        }
        if input.is_pressed(Control::Down) {
            axis += 1.0;
        }
        self.player_y = self.clamp_paddle(self.player_y + axis * self.tuning.paddle_speed * dt_s);

        // Follow the ball while it approaches, otherwise drift back to centre
        let target = if self.ball_vel.x > 0.0 {
            self.ball_pos.y
        } else {
            self.bounds.y * 0.5
        };
        let max_step = self.tuning.ai_speed * dt_s;
        let step = (target - self.ai_y).clamp(-max_step, max_step);
        self.ai_y = self.clamp_paddle(self.ai_y + step);
    }

    /// Circle against the paddle rectangle whose left edge is `x`
    fn touches_paddle(&self, x: f32, center_y: f32) -> bool {
        let half = Vec2::new(self.tuning.paddle_width, self.tuning.paddle_height) * 0.5;
        let center = Vec2::new(x, center_y) + Vec2::new(half.x, 0.0);
        let closest = self.ball_pos.clamp(center - half, center + half);
        closest.distance(self.ball_pos) <= self.tuning.ball_radius
    }

    /// Return off a paddle: angle from the contact offset, `dir_x` away from it
    fn bounce(&mut self, paddle_y: f32, dir_x: f32) {
        let half = self.tuning.paddle_height * 0.5;
        let offset = ((self.ball_pos.y - paddle_y) / half).clamp(-1.0, 1.0);
        let angle = offset * MAX_BOUNCE_ANGLE;
        let speed = self.ball_vel.length();
        self.ball_vel = Vec2::new(angle.cos() * dir_x, angle.sin()) * speed;
    }

    fn move_ball(&mut self, dt_s: f32, ctx: &mut GameContext) {
        let r = self.tuning.ball_radius;
        self.ball_pos += self.ball_vel * dt_s;

        if self.ball_pos.y - r < 0.0 {
            self.ball_pos.y = r;
            self.ball_vel.y = self.ball_vel.y.abs();
        } else if self.ball_pos.y + r > self.bounds.y {
            self.ball_pos.y = self.bounds.y - r;
            self.ball_vel.y = -self.ball_vel.y.abs();
        }

        if self.ball_vel.x < 0.0 && self.touches_paddle(self.player_x(), self.player_y) {
            self.ball_pos.x = self.player_x() + self.tuning.paddle_width + r;
            self.bounce(self.player_y, 1.0);
            ctx.play(SoundCue::Hit);
        } else if self.ball_vel.x > 0.0 && self.touches_paddle(self.ai_x(), self.ai_y) {
            self.ball_pos.x = self.ai_x() - r;
            self.bounce(self.ai_y, -1.0);
            ctx.play(SoundCue::Hit);
        }
    }

    fn check_goals(&mut self, ctx: &mut GameContext) {
        let r = self.tuning.ball_radius;
        if self.ball_pos.x - r > self.bounds.x {
            self.player_points += 1;
            ctx.board.add_points(self.tuning.goal_points);
            ctx.play(SoundCue::Score);
            if self.tuning.goals_per_level > 0 && self.player_points % self.tuning.goals_per_level == 0 {
                ctx.board.level += 1;
                self.level = ctx.board.level;
                log::info!("Pong level {}, ball speed {:.0}", self.level, self.ball_speed());
            }
            self.reset_ball(Side::Ai);
        } else if self.ball_pos.x + r < 0.0 {
            ctx.play(SoundCue::Death);
            let out = ctx.board.lose_life();
            log::info!("Point to the AI, {} lives left", ctx.board.lives);
            if !out {
                self.reset_ball(Side::Player);
            }
        }
    }
}

impl Game for Pong {
    fn id(&self) -> GameId {
        GameId::Pong
    }

    fn start_lives(&self) -> u32 {
        self.tuning.start_lives
    }

    fn init(&mut self, ctx: &mut GameContext) {
        self.bounds = ctx.bounds;
        self.level = ctx.board.level;
        self.player_points = 0;
        self.player_y = ctx.bounds.y * 0.5;
        self.ai_y = ctx.bounds.y * 0.5;
        self.reset_ball(Side::Ai);
    }

    fn update(&mut self, dt_ms: f32, ctx: &mut GameContext) {
        let dt_s = dt_ms / 1000.0;
        self.move_paddles(dt_s, ctx.input);

        if self.serve_ms > 0.0 {
            self.serve_ms -= dt_ms;
            if self.serve_ms <= 0.0 {
                self.serve_ms = 0.0;
                self.launch(ctx.rng);
            }
            return;
        }

        self.move_ball(dt_s, ctx);
        self.check_goals(ctx);
    }

    fn render(&self, surface: &mut dyn Surface) {
        surface.clear(Color::BLACK);
        // Centre line
        let mut y = 0.0;
        while y < self.bounds.y {
            surface.fill_rect(Vec2::new(self.bounds.x * 0.5 - 2.0, y), Vec2::new(4.0, 12.0), Color::GRAY);
            y += 24.0;
        }

        let size = Vec2::new(self.tuning.paddle_width, self.tuning.paddle_height);
        for (x, cy) in [(self.player_x(), self.player_y), (self.ai_x(), self.ai_y)] {
            surface.fill_rect(Vec2::new(x, cy - size.y * 0.5), size, Color::WHITE);
        }
        surface.fill_circle(self.ball_pos, self.tuning.ball_radius, Color::WHITE);
    }

    fn snapshot(&self) -> GameSnapshot {
        GameSnapshot::Pong(PongSnapshot {
            player_y: self.player_y,
            ai_y: self.ai_y,
            ball_pos: self.ball_pos,
            ball_vel: self.ball_vel,
            serve_ms: self.serve_ms,
            player_points: self.player_points,
        })
    }
}
