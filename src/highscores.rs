//! Per-game high score leaderboards
//!
//! Fed by the session's game-over callback and persisted to LocalStorage.
//! Each game keeps its own top 10.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::games::GameId;

/// Maximum number of high scores kept per game
pub const MAX_HIGH_SCORES: usize = 10;

/// A single high score entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HighScoreEntry {
    pub score: u64,
    /// Level (or wave) reached
    pub level: u32,
    /// Unix timestamp (ms) when achieved
    pub timestamp: f64,
}

/// Top scores for one game, sorted descending
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Leaderboard {
    pub entries: Vec<HighScoreEntry>,
}

impl Leaderboard {
    /// Check if a score qualifies for the leaderboard
    pub fn qualifies(&self, score: u64) -> bool {
        if score == 0 {
            return false;
        }
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        self.entries.last().is_none_or(|e| score > e.score)
    }

    /// Insert a score; returns the 1-indexed rank, or None if it didn't qualify
    pub fn add(&mut self, entry: HighScoreEntry) -> Option<usize> {
        if !self.qualifies(entry.score) {
            return None;
        }
        // Ties go below existing entries
        let i = self
            .entries
            .iter()
            .position(|e| entry.score > e.score)
            .unwrap_or(self.entries.len());
        self.entries.insert(i, entry);
        self.entries.truncate(MAX_HIGH_SCORES);
        Some(i + 1)
    }

    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }
}

/// Leaderboards keyed by game
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HighScores {
    pub boards: BTreeMap<GameId, Leaderboard>,
}

impl HighScores {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "retro_arcade_highscores";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn board(&self, game: GameId) -> Option<&Leaderboard> {
        self.boards.get(&game)
    }

    pub fn qualifies(&self, game: GameId, score: u64) -> bool {
        self.board(game).map_or(score > 0, |b| b.qualifies(score))
    }

    /// Record a finished run; returns the rank achieved
    pub fn add_score(&mut self, game: GameId, score: u64, level: u32, timestamp: f64) -> Option<usize> {
        let rank = self.boards.entry(game).or_default().add(HighScoreEntry {
            score,
            level,
            timestamp,
        });
        if let Some(rank) = rank {
            log::info!("{game} high score #{rank}: {score}");
        }
        rank
    }

    pub fn top_score(&self, game: GameId) -> Option<u64> {
        self.board(game).and_then(Leaderboard::top_score)
    }

    /// Load high scores from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match serde_json::from_str::<HighScores>(&json) {
                    Ok(scores) => {
                        log::info!("Loaded high scores for {} games", scores.boards.len());
                        return scores;
                    }
                    Err(e) => log::warn!("Discarding unreadable high scores: {e}"),
                }
            }
        }

        log::info!("No high scores found, starting fresh");
        Self::new()
    }

    /// Save high scores to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                if storage.set_item(Self::STORAGE_KEY, &json).is_err() {
                    log::warn!("Could not save high scores");
                }
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::new()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}
