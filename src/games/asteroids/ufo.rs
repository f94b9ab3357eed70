//! Flying saucer behaviour
//!
//! A UFO crosses the screen horizontally, jinking up or down on a timer, and
//! fires periodically. Small saucers aim straight at the ship (no lead); large
//! ones fire in a random direction.

use glam::Vec2;
use serde::Serialize;

use super::entities::Bullet;
use crate::sim::RandomSource;
use crate::tuning::AsteroidsTuning;
use crate::wrap_axis;

#[derive(Debug, Clone, Serialize)]
pub struct Ufo {
    pub pos: Vec2,
    pub vel: Vec2,
    pub is_small: bool,
    pub radius: f32,
    /// Until the next vertical direction change
    pub turn_ms: f32,
    /// Until the next shot
    pub fire_ms: f32,
    #[serde(skip)]
    pub alive: bool,
}

impl Ufo {
    /// Enter from a random side at a random height
    pub fn spawn(
        is_small: bool,
        bounds: Vec2,
        tuning: &AsteroidsTuning,
        rng: &mut dyn RandomSource,
    ) -> Self {
        let radius = if is_small {
            tuning.ufo_small_radius
        } else {
            tuning.ufo_large_radius
        };
        let from_left = rng.chance(0.5);
        let (x, dir) = if from_left {
            (-radius, 1.0)
        } else {
            (bounds.x + radius, -1.0)
        };
        let y = rng.range(bounds.y * 0.1, bounds.y * 0.9);

        Self {
            pos: Vec2::new(x, y),
            vel: Vec2::new(dir * tuning.ufo_speed, 0.0),
            is_small,
            radius,
            turn_ms: tuning.ufo_turn_ms,
            fire_ms: Self::fire_interval(is_small, tuning),
            alive: true,
        }
    }

    fn fire_interval(is_small: bool, tuning: &AsteroidsTuning) -> f32 {
        if is_small {
            tuning.ufo_small_fire_ms
        } else {
            tuning.ufo_large_fire_ms
        }
    }

    pub fn points(&self, tuning: &AsteroidsTuning) -> u64 {
        if self.is_small {
            tuning.ufo_small_points
        } else {
            tuning.ufo_large_points
        }
    }

    /// Move, wrapping vertically only
    pub fn advance(&mut self, dt_s: f32, bounds: Vec2) {
        self.pos += self.vel * dt_s;
        self.pos.y = wrap_axis(self.pos.y, self.vel.y, bounds.y, self.radius);
    }

    /// Tick the turn/fire timers, jinking when the turn timer runs out
    pub fn run_timers(&mut self, dt_ms: f32, tuning: &AsteroidsTuning, rng: &mut dyn RandomSource) {
        self.turn_ms -= dt_ms;
        self.fire_ms -= dt_ms;
        if self.turn_ms <= 0.0 {
            self.turn_ms = tuning.ufo_turn_ms;
            let vertical = [-0.75, 0.0, 0.75][rng.below(3)];
            self.vel.y = vertical * tuning.ufo_speed;
        }
    }

    /// Fully past the edge it is heading for
    pub fn has_left(&self, bounds: Vec2) -> bool {
        (self.vel.x > 0.0 && self.pos.x > bounds.x + self.radius)
            || (self.vel.x < 0.0 && self.pos.x < -self.radius)
    }

    /// Shot due this tick, if the fire timer has run out
    pub fn fire(
        &mut self,
        ship_pos: Vec2,
        tuning: &AsteroidsTuning,
        rng: &mut dyn RandomSource,
    ) -> Option<Bullet> {
        if self.fire_ms > 0.0 {
            return None;
        }
        self.fire_ms = Self::fire_interval(self.is_small, tuning);

        let dir = if self.is_small {
            (ship_pos - self.pos).try_normalize().unwrap_or(Vec2::X)
        } else {
            Vec2::from_angle(rng.angle())
        };
        Some(Bullet::new(
            self.pos + dir * self.radius,
            dir * tuning.ufo_bullet_speed,
            tuning.ufo_bullet_lifetime_ms,
            tuning.bullet_radius,
        ))
    }
}
