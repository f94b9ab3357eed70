//! Per-tick input collaborator
//!
//! The platform records key transitions as they arrive; the session calls
//! `begin_tick` once per fixed tick so "just pressed" is visible for exactly
//! one tick per physical press.

use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Symbolic controls shared by every game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Control {
    Up,
    Down,
    Left,
    Right,
    Action1,
    Action2,
    Pause,
    Start,
}

impl Control {
    pub const ALL: [Control; 8] = [
        Control::Up,
        Control::Down,
        Control::Left,
        Control::Right,
        Control::Action1,
        Control::Action2,
        Control::Pause,
        Control::Start,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Control::Up => "up",
            Control::Down => "down",
            Control::Left => "left",
            Control::Right => "right",
            Control::Action1 => "action1",
            Control::Action2 => "action2",
            Control::Pause => "pause",
            Control::Start => "start",
        }
    }

    pub fn from_name(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "up" => Some(Control::Up),
            "down" => Some(Control::Down),
            "left" => Some(Control::Left),
            "right" => Some(Control::Right),
            "action1" | "a" | "fire" => Some(Control::Action1),
            "action2" | "b" => Some(Control::Action2),
            "pause" => Some(Control::Pause),
            "start" => Some(Control::Start),
            _ => None,
        }
    }

    fn bit(self) -> u8 {
        1 << self as u8
    }
}

/// What a game may ask about input during a tick
pub trait InputSource {
    /// Latch presses that arrived since the previous tick
    fn begin_tick(&mut self);

    /// Level-triggered: control is held this tick
    fn is_pressed(&self, control: Control) -> bool;

    /// Edge-triggered: control went down since the previous tick
    fn is_just_pressed(&self, control: Control) -> bool;

    /// Normalized movement vector (screen space, +y down)
    fn direction(&self) -> Vec2 {
        let mut dir = Vec2::ZERO;
        if self.is_pressed(Control::Left) {
            dir.x -= 1.0;
        }
        if self.is_pressed(Control::Right) {
            dir.x += 1.0;
        }
        if self.is_pressed(Control::Up) {
            dir.y -= 1.0;
        }
        if self.is_pressed(Control::Down) {
            dir.y += 1.0;
        }
        dir.normalize_or_zero()
    }

    /// Lookup by name; unrecognized names read as "not pressed"
    fn is_pressed_named(&self, name: &str) -> bool {
        Control::from_name(name).is_some_and(|c| self.is_pressed(c))
    }

    fn is_just_pressed_named(&self, name: &str) -> bool {
        Control::from_name(name).is_some_and(|c| self.is_just_pressed(c))
    }
}

/// Bitmask input state fed by platform key events
#[derive(Debug, Clone, Default)]
pub struct InputState {
    /// Keys physically down right now
    held: u8,
    /// Presses not yet seen by a tick
    pending: u8,
    /// Latched for the current tick
    pressed: u8,
    just_pressed: u8,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Key went down (auto-repeat is ignored)
    pub fn press(&mut self, control: Control) {
        let bit = control.bit();
        if self.held & bit == 0 {
            self.pending |= bit;
        }
        self.held |= bit;
    }

    pub fn release(&mut self, control: Control) {
        self.held &= !control.bit();
    }

    /// Drop everything held (e.g. on window blur)
    pub fn release_all(&mut self) {
        self.held = 0;
        self.pending = 0;
    }
}

impl InputSource for InputState {
    fn begin_tick(&mut self) {
        self.just_pressed = self.pending;
        // A tap shorter than a tick still counts as held for that tick
        self.pressed = self.held | self.pending;
        self.pending = 0;
    }

    fn is_pressed(&self, control: Control) -> bool {
        self.pressed & control.bit() != 0
    }

    fn is_just_pressed(&self, control: Control) -> bool {
        self.just_pressed & control.bit() != 0
    }
}

/// Shared handle so platform event callbacks and the session see one state
impl<T: InputSource> InputSource for Rc<RefCell<T>> {
    fn begin_tick(&mut self) {
        self.borrow_mut().begin_tick();
    }

    fn is_pressed(&self, control: Control) -> bool {
        self.borrow().is_pressed(control)
    }

    fn is_just_pressed(&self, control: Control) -> bool {
        self.borrow().is_just_pressed(control)
    }

    fn direction(&self) -> Vec2 {
        self.borrow().direction()
    }
}
