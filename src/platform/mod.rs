//! Platform adapters
//!
//! Handles browser/native differences for:
//! - Keyboard mapping (DOM key codes to controls, lifecycle keys)
//! - Sound patches (procedural tones per cue)
//! - Canvas drawing and Web Audio playback (wasm only)

pub mod keyboard;
pub mod sfx;

#[cfg(target_arch = "wasm32")]
pub mod canvas;
#[cfg(target_arch = "wasm32")]
pub mod web_audio;
