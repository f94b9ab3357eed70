//! Ship, asteroid and bullet entities

use std::f32::consts::{FRAC_PI_2, TAU};

use glam::Vec2;
use serde::Serialize;

use crate::sim::RandomSource;
use crate::tuning::AsteroidsTuning;

/// Asteroid size class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AsteroidSize {
    Large,
    Medium,
    Small,
}

impl AsteroidSize {
    /// Index into the per-size tuning tables
    pub fn index(self) -> usize {
        match self {
            AsteroidSize::Large => 0,
            AsteroidSize::Medium => 1,
            AsteroidSize::Small => 2,
        }
    }

    /// Size of the fragments this asteroid breaks into
    pub fn child(self) -> Option<AsteroidSize> {
        match self {
            AsteroidSize::Large => Some(AsteroidSize::Medium),
            AsteroidSize::Medium => Some(AsteroidSize::Small),
            AsteroidSize::Small => None,
        }
    }
}

/// The player's ship
#[derive(Debug, Clone, Serialize)]
pub struct Ship {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Facing angle in radians (0 = +x, screen space)
    pub rotation: f32,
    pub radius: f32,
    /// Collisions are ignored while positive
    pub invincible_ms: f32,
    #[serde(skip)]
    pub thrusting: bool,
}

impl Ship {
    pub fn new(pos: Vec2, radius: f32) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            rotation: -FRAC_PI_2,
            radius,
            invincible_ms: 0.0,
            thrusting: false,
        }
    }

    pub fn facing(&self) -> Vec2 {
        Vec2::from_angle(self.rotation)
    }

    /// Back to `pos`, stationary and pointing up, with an invincibility window
    pub fn respawn(&mut self, pos: Vec2, invincible_ms: f32) {
        self.pos = pos;
        self.vel = Vec2::ZERO;
        self.rotation = -FRAC_PI_2;
        self.invincible_ms = invincible_ms;
        self.thrusting = false;
    }

    pub fn is_invincible(&self) -> bool {
        self.invincible_ms > 0.0
    }

    /// Local-space outline, nose along +x
    pub fn outline(&self) -> [Vec2; 4] {
        let r = self.radius;
        [
            Vec2::new(r * 1.4, 0.0),
            Vec2::new(-r, -r * 0.8),
            Vec2::new(-r * 0.5, 0.0),
            Vec2::new(-r, r * 0.8),
        ]
    }
}

/// A drifting rock
#[derive(Debug, Clone, Serialize)]
pub struct Asteroid {
    pub pos: Vec2,
    pub vel: Vec2,
    pub rotation: f32,
    /// Radians per second
    pub spin: f32,
    pub size: AsteroidSize,
    pub radius: f32,
    /// Local-space polygon, fixed at creation
    #[serde(skip)]
    pub outline: Vec<Vec2>,
    #[serde(skip)]
    pub alive: bool,
}

impl Asteroid {
    /// New asteroid at `pos` with random heading, spin and outline
    pub fn new(
        size: AsteroidSize,
        pos: Vec2,
        wave: u32,
        tuning: &AsteroidsTuning,
        rng: &mut dyn RandomSource,
    ) -> Self {
        let i = size.index();
        let radius = tuning.radius[i];
        let (min_speed, max_speed) = tuning.speed[i];
        let speed = rng.range(min_speed, max_speed) * wave_speed_multiplier(wave, tuning);

        Self {
            pos,
            vel: Vec2::from_angle(rng.angle()) * speed,
            rotation: rng.angle(),
            spin: rng.range(-1.5, 1.5),
            size,
            radius,
            outline: jagged_outline(radius, rng),
            alive: true,
        }
    }

    pub fn points(&self, tuning: &AsteroidsTuning) -> u64 {
        tuning.points[self.size.index()]
    }

    /// Two fragments of the next size down, both at this asteroid's position
    pub fn split(
        &self,
        wave: u32,
        tuning: &AsteroidsTuning,
        rng: &mut dyn RandomSource,
    ) -> Vec<Asteroid> {
        let mut fragments = Vec::with_capacity(2);
        if let Some(child) = self.size.child() {
            for _ in 0..2 {
                fragments.push(Asteroid::new(child, self.pos, wave, tuning, rng));
            }
        }
        fragments
    }
}

/// Speed multiplier for asteroids spawned in `wave`
pub fn wave_speed_multiplier(wave: u32, tuning: &AsteroidsTuning) -> f32 {
    let steps = wave.saturating_sub(1) as f32;
    (1.0 + tuning.wave_speed_step * steps).min(tuning.wave_speed_cap)
}

/// 8 to 12 vertices at 0.7x to 1.3x the nominal radius
fn jagged_outline(radius: f32, rng: &mut dyn RandomSource) -> Vec<Vec2> {
    let count = 8 + rng.below(5);
    let mut outline = Vec::with_capacity(count);
    for i in 0..count {
        let angle = i as f32 / count as f32 * TAU;
        outline.push(Vec2::from_angle(angle) * radius * rng.range(0.7, 1.3));
    }
    outline
}

/// A projectile from the ship or a UFO
#[derive(Debug, Clone, Serialize)]
pub struct Bullet {
    pub pos: Vec2,
    pub vel: Vec2,
    pub life_ms: f32,
    pub radius: f32,
    #[serde(skip)]
    pub alive: bool,
}

impl Bullet {
    pub fn new(pos: Vec2, vel: Vec2, life_ms: f32, radius: f32) -> Self {
        Self {
            pos,
            vel,
            life_ms,
            radius,
            alive: true,
        }
    }

    /// Count down the lifetime; returns false once expired
    pub fn age(&mut self, dt_ms: f32) -> bool {
        self.life_ms -= dt_ms;
        if self.life_ms <= 0.0 {
            self.alive = false;
        }
        self.alive
    }
}
