//! Data-driven game balance
//!
//! Every constant a designer might want to tweak lives here rather than in the
//! game modules. All sections default to arcade-style values and any subset can
//! be overridden from JSON.

use serde::{Deserialize, Serialize};

use crate::error::ArcadeError;

/// Balance for every bundled game
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub asteroids: AsteroidsTuning,
    pub pacman: PacmanTuning,
    pub snake: SnakeTuning,
    pub pong: PongTuning,
    pub frogger: FroggerTuning,
}

impl Tuning {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "retro_arcade_tuning";

    /// Parse a (possibly partial) JSON override
    pub fn from_json(json: &str) -> Result<Self, ArcadeError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load tuning overrides from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(tuning) => {
                        log::info!("Loaded tuning overrides from LocalStorage");
                        return tuning;
                    }
                    Err(e) => log::warn!("Ignoring tuning overrides: {e}"),
                }
            }
        }

        Self::default()
    }

    /// Native stub
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AsteroidsTuning {
    pub start_lives: u32,

    // === Ship ===
    pub ship_radius: f32,
    /// Radians per second
    pub rotation_speed: f32,
    /// Pixels per second squared
    pub thrust: f32,
    pub max_speed: f32,
    /// Velocity multiplier applied every tick
    pub friction: f32,
    pub invincible_ms: f32,
    pub hyperspace: bool,

    // === Player bullets ===
    pub bullet_speed: f32,
    pub bullet_lifetime_ms: f32,
    pub bullet_radius: f32,
    pub max_bullets: usize,

    // === Asteroids ===
    pub radius: [f32; 3],
    pub points: [u64; 3],
    /// (min, max) speed in px/s per size
    pub speed: [(f32, f32); 3],
    /// Extra speed per wave (fraction of base)
    pub wave_speed_step: f32,
    pub wave_speed_cap: f32,
    pub base_wave_size: u32,
    pub max_wave_size: u32,

    // === UFO ===
    pub ufo_spawn_ms: f32,
    pub ufo_speed: f32,
    pub ufo_large_radius: f32,
    pub ufo_small_radius: f32,
    pub ufo_large_points: u64,
    pub ufo_small_points: u64,
    pub ufo_turn_ms: f32,
    pub ufo_large_fire_ms: f32,
    pub ufo_small_fire_ms: f32,
    pub ufo_bullet_speed: f32,
    pub ufo_bullet_lifetime_ms: f32,

    /// Award a life every N points (0 disables)
    pub extra_life_every: u64,
}

impl Default for AsteroidsTuning {
    fn default() -> Self {
        Self {
            start_lives: 3,

            ship_radius: 10.0,
            rotation_speed: 4.5,
            thrust: 300.0,
            max_speed: 350.0,
            friction: 0.99,
            invincible_ms: 3000.0,
            hyperspace: true,

            bullet_speed: 500.0,
            bullet_lifetime_ms: 1000.0,
            bullet_radius: 2.0,
            max_bullets: 4,

            radius: [40.0, 20.0, 10.0],
            points: [20, 50, 100],
            speed: [(30.0, 60.0), (50.0, 90.0), (80.0, 130.0)],
            wave_speed_step: 0.05,
            wave_speed_cap: 1.5,
            base_wave_size: 3,
            max_wave_size: 10,

            ufo_spawn_ms: 15_000.0,
            ufo_speed: 100.0,
            ufo_large_radius: 20.0,
            ufo_small_radius: 10.0,
            ufo_large_points: 200,
            ufo_small_points: 1000,
            ufo_turn_ms: 2000.0,
            ufo_large_fire_ms: 1500.0,
            ufo_small_fire_ms: 1000.0,
            ufo_bullet_speed: 300.0,
            ufo_bullet_lifetime_ms: 1500.0,

            extra_life_every: 10_000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PacmanTuning {
    pub start_lives: u32,
    /// Pixels per maze tile when drawing
    pub tile_size: f32,

    // === Speeds (tiles per second) ===
    pub pacman_speed: f32,
    pub ghost_speed: f32,
    /// Speed multiplier gained per level
    pub level_speed_step: f32,
    /// Highest speed multiplier
    pub level_speed_cap: f32,

    // === Modes ===
    /// Alternating scatter/chase durations (ms), starting with scatter;
    /// chase lasts forever after the last entry
    pub mode_schedule_ms: Vec<f32>,
    pub frightened_ms: f32,
    pub frightened_step_ms: f32,
    pub frightened_min_ms: f32,
    /// Clyde chases only while farther than this many tiles
    pub clyde_shy_distance: f32,
    /// House release delay per ghost (blinky, pinky, inky, clyde)
    pub release_ms: [f32; 4],

    // === Scoring ===
    pub dot_points: u64,
    pub pellet_points: u64,
    pub ghost_points: u64,
    /// Dots eaten at which a fruit appears
    pub fruit_thresholds: Vec<u32>,
    pub fruit_ms: f32,

    /// Freeze before play after start, death and level clear
    pub ready_ms: f32,
    /// Actor overlap distance in tiles
    pub catch_distance: f32,
}

impl Default for PacmanTuning {
    fn default() -> Self {
        Self {
            start_lives: 3,
            tile_size: 18.0,

            pacman_speed: 7.5,
            ghost_speed: 7.0,
            level_speed_step: 0.05,
            level_speed_cap: 1.3,

            mode_schedule_ms: vec![7000.0, 20_000.0, 7000.0, 20_000.0, 5000.0, 20_000.0, 5000.0],
            frightened_ms: 6000.0,
            frightened_step_ms: 1000.0,
            frightened_min_ms: 1000.0,
            clyde_shy_distance: 8.0,
            release_ms: [0.0, 0.0, 4000.0, 8000.0],

            dot_points: 10,
            pellet_points: 50,
            ghost_points: 200,
            fruit_thresholds: vec![70, 170],
            fruit_ms: 9500.0,

            ready_ms: 2000.0,
            catch_distance: 0.5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SnakeTuning {
    pub start_lives: u32,
    pub cell_size: f32,
    pub step_ms: f32,
    pub step_ms_per_level: f32,
    pub min_step_ms: f32,
    pub foods_per_level: u32,
    pub food_points: u64,
}

impl Default for SnakeTuning {
    fn default() -> Self {
        Self {
            start_lives: 1,
            cell_size: 20.0,
            step_ms: 120.0,
            step_ms_per_level: 8.0,
            min_step_ms: 50.0,
            foods_per_level: 5,
            food_points: 10,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PongTuning {
    pub start_lives: u32,
    pub paddle_width: f32,
    pub paddle_height: f32,
    /// Pixels per second
    pub paddle_speed: f32,
    pub ai_speed: f32,
    pub ball_radius: f32,
    pub ball_speed: f32,
    pub ball_speed_step: f32,
    pub max_ball_speed: f32,
    pub goal_points: u64,
    pub goals_per_level: u32,
}

impl Default for PongTuning {
    fn default() -> Self {
        Self {
            start_lives: 3,
            paddle_width: 10.0,
            paddle_height: 80.0,
            paddle_speed: 400.0,
            ai_speed: 280.0,
            ball_radius: 6.0,
            ball_speed: 300.0,
            ball_speed_step: 0.1,
            max_ball_speed: 700.0,
            goal_points: 100,
            goals_per_level: 5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FroggerTuning {
    pub start_lives: u32,
    pub cell_size: f32,
    /// Lane speed in columns per second, indexed by row
    pub lane_speed: [f32; 13],
    pub level_speed_step: f32,
    pub level_speed_cap: f32,
    pub hop_points: u64,
    pub home_points: u64,
    pub level_points: u64,
}

impl Default for FroggerTuning {
    fn default() -> Self {
        Self {
            start_lives: 3,
            cell_size: 40.0,
            //           home  river...                      median road...                        start
            lane_speed: [0.0, 1.2, -0.8, 1.6, -1.0, 0.9, 0.0, -1.4, 1.0, -2.0, 1.2, -0.9, 0.0],
            level_speed_step: 0.15,
            level_speed_cap: 2.0,
            hop_points: 10,
            home_points: 50,
            level_points: 1000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "asteroids": { "start_lives": 5 } }"#).unwrap();
        assert_eq!(tuning.asteroids.start_lives, 5);
        assert_eq!(tuning.asteroids.max_bullets, AsteroidsTuning::default().max_bullets);
        assert_eq!(tuning.pacman.dot_points, 10);
    }

    #[test]
    fn test_bad_json_is_config_error() {
        let err = Tuning::from_json("{ not json").unwrap_err();
        assert!(matches!(err, ArcadeError::Config(_)));
    }

    #[test]
    fn test_round_trip_through_json() {
        let json = serde_json::to_string(&Tuning::default()).unwrap();
        let back = Tuning::from_json(&json).unwrap();
        assert_eq!(back.pacman.mode_schedule_ms, PacmanTuning::default().mode_schedule_ms);
    }
}
