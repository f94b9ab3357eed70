//! Asteroids
//!
//! Tick order: ship control, movement and wrap, timers, collisions, wave
//! completion, UFO spawning and fire. Collisions mark entities dead and prune
//! after the pass, so nothing is hit twice and no list is indexed after it has
//! been mutated.

pub mod entities;
pub mod ufo;

use glam::Vec2;
use serde::Serialize;

use self::entities::{Asteroid, AsteroidSize, Bullet, Ship};
use self::ufo::Ufo;
use super::{GameId, GameSnapshot};
use crate::render::{Color, Surface, transform_outline};
use crate::sim::{Control, Game, GameContext, SoundCue};
use crate::tuning::AsteroidsTuning;
use crate::{circles_overlap, wrap_position};

/// Minimum distance between the ship and a freshly spawned asteroid
const SAFE_SPAWN_DISTANCE: f32 = 150.0;
const SPAWN_ATTEMPTS: usize = 20;

/// Large asteroids spawned at the start of `wave` (wave 1 = first wave)
pub fn wave_size(wave: u32, tuning: &AsteroidsTuning) -> usize {
    tuning
        .base_wave_size
        .saturating_add(wave)
        .min(tuning.max_wave_size) as usize
}

#[derive(Debug, Clone, Serialize)]
pub struct AsteroidsSnapshot {
    pub wave: u32,
    pub ship: Ship,
    pub asteroids: Vec<Asteroid>,
    pub bullets: Vec<Bullet>,
    pub ufo: Option<Ufo>,
    pub ufo_bullets: Vec<Bullet>,
    pub ufo_spawn_ms: f32,
}

pub struct Asteroids {
    tuning: AsteroidsTuning,
    bounds: Vec2,
    ship: Ship,
    asteroids: Vec<Asteroid>,
    bullets: Vec<Bullet>,
    ufo: Option<Ufo>,
    ufo_bullets: Vec<Bullet>,
    wave: u32,
    ufo_spawn_ms: f32,
    next_ufo_small: bool,
    next_extra_life: u64,
}

impl Asteroids {
    pub fn new(tuning: AsteroidsTuning) -> Self {
        Self {
            ship: Ship::new(Vec2::ZERO, tuning.ship_radius),
            ufo_spawn_ms: tuning.ufo_spawn_ms,
            next_extra_life: tuning.extra_life_every,
            tuning,
            bounds: Vec2::ZERO,
            asteroids: Vec::new(),
            bullets: Vec::new(),
            ufo: None,
            ufo_bullets: Vec::new(),
            wave: 0,
            next_ufo_small: false,
        }
    }

    fn center(&self) -> Vec2 {
        self.bounds * 0.5
    }

    /// Advance the wave counter and fill the field away from the ship
    fn start_wave(&mut self, ctx: &mut GameContext) {
        self.wave += 1;
        ctx.board.level = self.wave;
        self.ufo_spawn_ms = self.tuning.ufo_spawn_ms;

        let count = wave_size(self.wave, &self.tuning);
        for _ in 0..count {
            let pos = self.safe_spawn_point(ctx);
            let asteroid = Asteroid::new(AsteroidSize::Large, pos, self.wave, &self.tuning, ctx.rng);
            self.asteroids.push(asteroid);
        }
        log::info!("Asteroids wave {} ({} asteroids)", self.wave, count);
    }

    fn safe_spawn_point(&self, ctx: &mut GameContext) -> Vec2 {
        let mut pos = Vec2::ZERO;
        for _ in 0..SPAWN_ATTEMPTS {
            pos = Vec2::new(
                ctx.rng.range(0.0, self.bounds.x),
                ctx.rng.range(0.0, self.bounds.y),
            );
            if pos.distance(self.ship.pos) >= SAFE_SPAWN_DISTANCE {
                return pos;
            }
        }
        // Corner farthest from the ship
        if pos.x < self.ship.pos.x {
            pos.x = 0.0;
        } else {
            pos.x = self.bounds.x;
        }
        pos.y = if self.ship.pos.y > self.bounds.y * 0.5 { 0.0 } else { self.bounds.y };
        pos
    }

    fn award(&mut self, points: u64, ctx: &mut GameContext) {
        ctx.board.add_points(points);
        if self.tuning.extra_life_every == 0 {
            return;
        }
        while ctx.board.score >= self.next_extra_life {
            ctx.board.gain_life();
            self.next_extra_life += self.tuning.extra_life_every;
            ctx.play(SoundCue::Powerup);
            log::debug!("Extra life at {}", ctx.board.score);
        }
    }

    // === Tick phases ===

    fn control_ship(&mut self, dt_s: f32, ctx: &mut GameContext) {
        let ship = &mut self.ship;
        if ctx.input.is_pressed(Control::Left) {
            ship.rotation -= self.tuning.rotation_speed * dt_s;
        }
        if ctx.input.is_pressed(Control::Right) {
            ship.rotation += self.tuning.rotation_speed * dt_s;
        }

        ship.thrusting = ctx.input.is_pressed(Control::Up);
        if ship.thrusting {
            ship.vel += ship.facing() * self.tuning.thrust * dt_s;
        }
        ship.vel = ship.vel.clamp_length_max(self.tuning.max_speed);
        ship.vel *= self.tuning.friction;

        if ctx.input.is_just_pressed(Control::Action1) && self.bullets.len() < self.tuning.max_bullets {
            let facing = ship.facing();
            self.bullets.push(Bullet::new(
                ship.pos + facing * ship.radius,
                ship.vel + facing * self.tuning.bullet_speed,
                self.tuning.bullet_lifetime_ms,
                self.tuning.bullet_radius,
            ));
            ctx.play(SoundCue::Shoot);
        }

        if self.tuning.hyperspace && ctx.input.is_just_pressed(Control::Action2) {
            ship.pos = Vec2::new(
                ctx.rng.range(0.0, self.bounds.x),
                ctx.rng.range(0.0, self.bounds.y),
            );
            ship.vel = Vec2::ZERO;
            ctx.play(SoundCue::Jump);
        }
    }

    fn move_entities(&mut self, dt_s: f32) {
        let bounds = self.bounds;

        self.ship.pos = wrap_position(self.ship.pos + self.ship.vel * dt_s, self.ship.vel, bounds, self.ship.radius);
        for asteroid in &mut self.asteroids {
            asteroid.pos = wrap_position(asteroid.pos + asteroid.vel * dt_s, asteroid.vel, bounds, asteroid.radius);
            asteroid.rotation += asteroid.spin * dt_s;
        }
        for bullet in self.bullets.iter_mut().chain(self.ufo_bullets.iter_mut()) {
            bullet.pos = wrap_position(bullet.pos + bullet.vel * dt_s, bullet.vel, bounds, bullet.radius);
        }
        if let Some(ufo) = self.ufo.as_mut() {
            ufo.advance(dt_s, bounds);
        }
    }

    fn run_timers(&mut self, dt_ms: f32, ctx: &mut GameContext) {
        self.ship.invincible_ms = (self.ship.invincible_ms - dt_ms).max(0.0);

        self.bullets.retain_mut(|b| b.age(dt_ms));
        self.ufo_bullets.retain_mut(|b| b.age(dt_ms));

        if let Some(ufo) = self.ufo.as_mut() {
            ufo.run_timers(dt_ms, &self.tuning, ctx.rng);
            if ufo.has_left(self.bounds) {
                log::debug!("UFO left the screen");
                self.ufo = None;
            }
        }
    }

    fn resolve_collisions(&mut self, ctx: &mut GameContext) {
        let mut fragments = Vec::new();

        // Player bullets vs asteroids, in list order
        for bullet in &mut self.bullets {
            for asteroid in &mut self.asteroids {
                if !asteroid.alive {
                    continue;
                }
                if circles_overlap(bullet.pos, bullet.radius, asteroid.pos, asteroid.radius) {
                    bullet.alive = false;
                    asteroid.alive = false;
                    fragments.extend(asteroid.split(self.wave, &self.tuning, ctx.rng));
                    break;
                }
            }
        }
        let destroyed: Vec<u64> = self
            .asteroids
            .iter()
            .filter(|a| !a.alive)
            .map(|a| a.points(&self.tuning))
            .collect();
        for points in &destroyed {
            self.award(*points, ctx);
        }
        if !destroyed.is_empty() {
            ctx.play(SoundCue::Explosion);
        }

        // Player bullets vs UFO
        if let Some(ufo) = self.ufo.as_mut() {
            for bullet in self.bullets.iter_mut().filter(|b| b.alive) {
                if circles_overlap(bullet.pos, bullet.radius, ufo.pos, ufo.radius) {
                    bullet.alive = false;
                    ufo.alive = false;
                    break;
                }
            }
        }
        if let Some(ufo) = self.ufo.take_if(|u| !u.alive) {
            let points = ufo.points(&self.tuning);
            self.award(points, ctx);
            ctx.play(SoundCue::Explosion);
            log::debug!("UFO destroyed (+{points})");
        }

        self.resolve_ship_hits(&mut fragments, ctx);

        self.bullets.retain(|b| b.alive);
        self.ufo_bullets.retain(|b| b.alive);
        self.asteroids.retain(|a| a.alive);
        self.asteroids.append(&mut fragments);
    }

    /// At most one death per tick; whatever the ship hit is destroyed with it
    fn resolve_ship_hits(&mut self, fragments: &mut Vec<Asteroid>, ctx: &mut GameContext) {
        if self.ship.is_invincible() {
            return;
        }
        let ship_pos = self.ship.pos;
        let ship_radius = self.ship.radius;

        let mut hit = false;
        if let Some(asteroid) = self
            .asteroids
            .iter_mut()
            .find(|a| a.alive && circles_overlap(ship_pos, ship_radius, a.pos, a.radius))
        {
            asteroid.alive = false;
            fragments.extend(asteroid.split(self.wave, &self.tuning, ctx.rng));
            hit = true;
        } else if self
            .ufo
            .as_ref()
            .is_some_and(|u| circles_overlap(ship_pos, ship_radius, u.pos, u.radius))
        {
            self.ufo = None;
            hit = true;
        } else if let Some(bullet) = self
            .ufo_bullets
            .iter_mut()
            .find(|b| b.alive && circles_overlap(ship_pos, ship_radius, b.pos, b.radius))
        {
            bullet.alive = false;
            hit = true;
        }

        if hit {
            self.kill_ship(ctx);
        }
    }

    fn kill_ship(&mut self, ctx: &mut GameContext) {
        ctx.play(SoundCue::Death);
        let out = ctx.board.lose_life();
        log::debug!("Ship destroyed, {} lives left", ctx.board.lives);
        if !out {
            let center = self.center();
            self.ship.respawn(center, self.tuning.invincible_ms);
        }
    }

    fn update_ufo(&mut self, dt_ms: f32, ctx: &mut GameContext) {
        if let Some(ufo) = self.ufo.as_mut() {
            if let Some(bullet) = ufo.fire(self.ship.pos, &self.tuning, ctx.rng) {
                self.ufo_bullets.push(bullet);
                ctx.play(SoundCue::Shoot);
            }
            return;
        }

        // Spawn countdown only runs while no UFO is on screen
        self.ufo_spawn_ms -= dt_ms;
        if self.ufo_spawn_ms <= 0.0 {
            self.ufo_spawn_ms = self.tuning.ufo_spawn_ms;
            let small = self.next_ufo_small;
            self.next_ufo_small = !small;
            self.ufo = Some(Ufo::spawn(small, self.bounds, &self.tuning, ctx.rng));
            log::debug!("UFO spawned (small: {small})");
        }
    }
}

impl Game for Asteroids {
    fn id(&self) -> GameId {
        GameId::Asteroids
    }

    fn start_lives(&self) -> u32 {
        self.tuning.start_lives
    }

    fn init(&mut self, ctx: &mut GameContext) {
        self.bounds = ctx.bounds;
        self.ship = Ship::new(self.center(), self.tuning.ship_radius);
        self.asteroids.clear();
        self.bullets.clear();
        self.ufo = None;
        self.ufo_bullets.clear();
        self.wave = 0;
        self.next_ufo_small = false;
        self.next_extra_life = self.tuning.extra_life_every;
        self.start_wave(ctx);
    }

    fn update(&mut self, dt_ms: f32, ctx: &mut GameContext) {
        let dt_s = dt_ms / 1000.0;

        self.control_ship(dt_s, ctx);
        self.move_entities(dt_s);
        self.run_timers(dt_ms, ctx);
        self.resolve_collisions(ctx);

        if ctx.board.is_out_of_lives() {
            return;
        }
        if self.asteroids.is_empty() {
            self.start_wave(ctx);
        }
        self.update_ufo(dt_ms, ctx);
    }

    fn render(&self, surface: &mut dyn Surface) {
        surface.clear(Color::BLACK);

        for asteroid in &self.asteroids {
            let points = transform_outline(&asteroid.outline, asteroid.pos, asteroid.rotation);
            surface.stroke_polygon(&points, Color::WHITE, 1.5);
        }

        // Blink while invincible
        let visible = !self.ship.is_invincible() || (self.ship.invincible_ms / 100.0) as u32 % 2 == 0;
        if visible {
            let hull = transform_outline(&self.ship.outline(), self.ship.pos, self.ship.rotation);
            surface.stroke_polygon(&hull, Color::WHITE, 1.5);
            if self.ship.thrusting {
                let r = self.ship.radius;
                let flame = [
                    Vec2::new(-r * 0.6, -r * 0.4),
                    Vec2::new(-r * 1.6, 0.0),
                    Vec2::new(-r * 0.6, r * 0.4),
                ];
                let flame = transform_outline(&flame, self.ship.pos, self.ship.rotation);
                surface.stroke_polygon(&flame, Color::ORANGE, 1.0);
            }
        }

        for bullet in &self.bullets {
            surface.fill_circle(bullet.pos, bullet.radius, Color::WHITE);
        }
        for bullet in &self.ufo_bullets {
            surface.fill_circle(bullet.pos, bullet.radius, Color::RED);
        }

        if let Some(ufo) = &self.ufo {
            let r = ufo.radius;
            let saucer = [
                Vec2::new(-r, 0.0),
                Vec2::new(-r * 0.4, -r * 0.45),
                Vec2::new(r * 0.4, -r * 0.45),
                Vec2::new(r, 0.0),
                Vec2::new(r * 0.4, r * 0.45),
                Vec2::new(-r * 0.4, r * 0.45),
            ];
            surface.stroke_polygon(&transform_outline(&saucer, ufo.pos, 0.0), Color::GREEN, 1.5);
        }
    }

    fn level_label(&self, level: u32) -> String {
        format!("WAVE {level}")
    }

    fn snapshot(&self) -> GameSnapshot {
        GameSnapshot::Asteroids(AsteroidsSnapshot {
            wave: self.wave,
            ship: self.ship.clone(),
            asteroids: self.asteroids.clone(),
            bullets: self.bullets.clone(),
            ufo: self.ufo.clone(),
            ufo_bullets: self.ufo_bullets.clone(),
            ufo_spawn_ms: self.ufo_spawn_ms,
        })
    }
}
