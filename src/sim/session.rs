//! Game session lifecycle
//!
//! One `Session` wraps one game behind the idle → running → paused → gameover
//! state machine. Lifecycle methods are implemented here once for every game;
//! calling them in the wrong state is a silent no-op.

use glam::Vec2;
use serde::Serialize;

use super::clock::{FrameHandle, LoopDriver};
use super::cue::{AudioSink, SoundCue};
use super::input::{Control, InputSource};
use super::rng::RandomSource;
use super::score::Scoreboard;
use crate::games::{GameId, GameSnapshot};
use crate::render::{Surface, draw_hud};

/// Session lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SessionPhase {
    /// Constructed or reset, waiting for start
    Idle,
    /// Simulation advancing
    Running,
    /// Simulation frozen, resumable
    Paused,
    /// Run ended; only start/reset leave this state
    GameOver,
}

/// Everything a game may touch during one call
pub struct GameContext<'a> {
    pub board: &'a mut Scoreboard,
    pub input: &'a dyn InputSource,
    pub audio: &'a mut dyn AudioSink,
    pub rng: &'a mut dyn RandomSource,
    /// Drawing surface size in pixels
    pub bounds: Vec2,
}

impl GameContext<'_> {
    pub fn play(&mut self, cue: SoundCue) {
        self.audio.play(cue);
    }
}

/// Capability every game implementation provides
pub trait Game {
    fn id(&self) -> GameId;

    /// Lives a fresh run starts with
    fn start_lives(&self) -> u32;

    /// Build (or rebuild) all game-specific entities for a fresh run
    fn init(&mut self, ctx: &mut GameContext);

    /// Advance one fixed tick of `dt_ms` milliseconds
    fn update(&mut self, dt_ms: f32, ctx: &mut GameContext);

    /// Draw current entity state; must not mutate the simulation
    fn render(&self, surface: &mut dyn Surface);

    /// Progress label shown in the HUD
    fn level_label(&self, level: u32) -> String {
        format!("LEVEL {level}")
    }

    /// Read-only view for tooling and tests
    fn snapshot(&self) -> GameSnapshot;
}

/// Injected platform services
pub struct Collaborators {
    pub input: Box<dyn InputSource>,
    pub audio: Box<dyn AudioSink>,
    pub rng: Box<dyn RandomSource>,
}

/// Read-only view of a session
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub state: SessionPhase,
    pub score: u64,
    pub lives: u32,
    pub level: u32,
    pub game: GameSnapshot,
}

type GameOverCallback = Box<dyn FnMut(u64)>;

pub struct Session {
    game: Box<dyn Game>,
    phase: SessionPhase,
    board: Scoreboard,
    bounds: Vec2,
    driver: LoopDriver,
    input: Box<dyn InputSource>,
    audio: Box<dyn AudioSink>,
    rng: Box<dyn RandomSource>,
    on_game_over: Option<GameOverCallback>,
    ticks: u64,
}

impl Session {
    /// Wrap `game` and build its initial entities; the session starts idle
    pub fn new(game: Box<dyn Game>, collaborators: Collaborators, bounds: Vec2) -> Self {
        let Collaborators { input, audio, rng } = collaborators;
        let mut session = Self {
            board: Scoreboard::new(game.start_lives()),
            game,
            phase: SessionPhase::Idle,
            bounds,
            driver: LoopDriver::default(),
            input,
            audio,
            rng,
            on_game_over: None,
            ticks: 0,
        };
        session.init_game();
        session
    }

    /// Register the callback that receives the final score
    pub fn on_game_over(&mut self, callback: impl FnMut(u64) + 'static) {
        self.on_game_over = Some(Box::new(callback));
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn game_id(&self) -> GameId {
        self.game.id()
    }

    pub fn score(&self) -> u64 {
        self.board.score
    }

    pub fn lives(&self) -> u32 {
        self.board.lives
    }

    pub fn level(&self) -> u32 {
        self.board.level
    }

    /// Fixed ticks simulated since the last reset
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn bounds(&self) -> Vec2 {
        self.bounds
    }

    /// Handle for the next animation frame, if the loop is scheduled
    pub fn pending_frame(&self) -> Option<FrameHandle> {
        if self.phase != SessionPhase::Running {
            return None;
        }
        self.driver.handle()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            state: self.phase,
            score: self.board.score,
            lives: self.board.lives,
            level: self.board.level,
            game: self.game.snapshot(),
        }
    }

    /// Idle/GameOver → Running. Returns the first frame handle to schedule.
    pub fn start(&mut self) -> Option<FrameHandle> {
        match self.phase {
            SessionPhase::Idle => {}
            SessionPhase::GameOver => {
                // Lives are spent; a new run needs fresh state
                self.reinit();
            }
            SessionPhase::Running | SessionPhase::Paused => return None,
        }
        self.phase = SessionPhase::Running;
        self.audio.play(SoundCue::GameStart);
        log::info!("{} started", self.game.id());
        Some(self.driver.arm())
    }

    /// Running → Paused; cancels the scheduled frame
    pub fn pause(&mut self) {
        if self.phase != SessionPhase::Running {
            return;
        }
        self.phase = SessionPhase::Paused;
        self.driver.halt();
        log::info!("{} paused", self.game.id());
    }

    /// Paused → Running. Returns the frame handle to schedule.
    pub fn resume(&mut self) -> Option<FrameHandle> {
        if self.phase != SessionPhase::Paused {
            return None;
        }
        self.phase = SessionPhase::Running;
        log::info!("{} resumed", self.game.id());
        Some(self.driver.arm())
    }

    /// Any state → Idle with fresh score, lives, level and entities
    pub fn reset(&mut self) {
        self.reinit();
        self.phase = SessionPhase::Idle;
        log::info!("{} reset", self.game.id());
    }

    /// Any state → GameOver; reports the final score exactly once
    pub fn game_over(&mut self, final_score: Option<u64>) {
        if self.phase == SessionPhase::GameOver {
            return;
        }
        self.phase = SessionPhase::GameOver;
        self.driver.halt();
        let score = final_score.unwrap_or(self.board.score);
        self.audio.play(SoundCue::GameOver);
        log::info!(
            "{} game over: score {} at level {}",
            self.game.id(),
            score,
            self.board.level
        );
        if let Some(callback) = self.on_game_over.as_mut() {
            callback(score);
        }
    }

    /// Tear down: no further frames will run
    pub fn destroy(&mut self) {
        self.driver.halt();
        self.on_game_over = None;
    }

    /// Run one fixed tick (no-op unless running)
    pub fn tick(&mut self) {
        if self.phase != SessionPhase::Running {
            return;
        }
        self.input.begin_tick();
        if self.input.is_just_pressed(Control::Pause) {
            self.pause();
            return;
        }

        let dt_ms = self.driver.tick_ms();
        let mut ctx = GameContext {
            board: &mut self.board,
            input: self.input.as_ref(),
            audio: self.audio.as_mut(),
            rng: self.rng.as_mut(),
            bounds: self.bounds,
        };
        self.game.update(dt_ms, &mut ctx);
        self.ticks += 1;

        if self.board.is_out_of_lives() {
            self.game_over(None);
        }
    }

    /// Animation-frame callback: run the ticks owed since the last frame,
    /// then render once. Returns the handle for the next frame, or `None` if
    /// the loop should stop (stale handle, paused, game over).
    pub fn frame(
        &mut self,
        handle: FrameHandle,
        now_ms: f64,
        surface: &mut dyn Surface,
    ) -> Option<FrameHandle> {
        if self.phase != SessionPhase::Running || !self.driver.is_current(handle) {
            return None;
        }
        let ticks = self.driver.accumulate(now_ms);
        for _ in 0..ticks {
            self.tick();
            if self.phase != SessionPhase::Running {
                break;
            }
        }
        self.render(surface);
        self.pending_frame()
    }

    /// Game layer, then the shared score/lives/level strip
    pub fn render(&self, surface: &mut dyn Surface) {
        self.game.render(surface);
        let label = self.game.level_label(self.board.level);
        draw_hud(surface, self.board.score, self.board.lives, &label);
    }

    fn reinit(&mut self) {
        self.driver.halt();
        self.board = Scoreboard::new(self.game.start_lives());
        self.ticks = 0;
        self.init_game();
    }

    fn init_game(&mut self) {
        let mut ctx = GameContext {
            board: &mut self.board,
            input: self.input.as_ref(),
            audio: self.audio.as_mut(),
            rng: self.rng.as_mut(),
            bounds: self.bounds,
        };
        self.game.init(&mut ctx);
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    use super::*;
    use crate::render::DisplayList;
    use crate::sim::cue::CueLog;
    use crate::sim::input::InputState;
    use crate::sim::rng::seeded;

    /// Minimal game: one point per tick, loses a life whenever `Action1` is pressed
    struct CounterGame {
        ticks: u32,
        /// Shared so tests can see how often the game was rebuilt
        inits: Rc<Cell<u32>>,
    }

    impl Game for CounterGame {
        fn id(&self) -> GameId {
            GameId::Snake
        }

        fn start_lives(&self) -> u32 {
            2
        }

        fn init(&mut self, _ctx: &mut GameContext) {
            self.ticks = 0;
            self.inits.set(self.inits.get() + 1);
        }

        fn update(&mut self, _dt_ms: f32, ctx: &mut GameContext) {
            self.ticks += 1;
            ctx.board.add_points(1);
            if ctx.input.is_just_pressed(Control::Action1) {
                ctx.board.lose_life();
            }
        }

        fn render(&self, surface: &mut dyn Surface) {
            surface.text(Vec2::ZERO, &self.ticks.to_string(), 12.0, crate::render::Color::WHITE);
        }

        fn snapshot(&self) -> GameSnapshot {
            GameSnapshot::Empty
        }
    }

    struct Harness {
        session: Session,
        input: Rc<RefCell<InputState>>,
        audio: Rc<RefCell<CueLog>>,
        finals: Rc<RefCell<Vec<u64>>>,
        inits: Rc<Cell<u32>>,
    }

    fn harness() -> Harness {
        let inits = Rc::new(Cell::new(0));
        let input = Rc::new(RefCell::new(InputState::new()));
        let audio = Rc::new(RefCell::new(CueLog::default()));
        let collaborators = Collaborators {
            input: Box::new(input.clone()),
            audio: Box::new(audio.clone()),
            rng: Box::new(seeded(1)),
        };
        let mut session = Session::new(
            Box::new(CounterGame {
                ticks: 0,
                inits: inits.clone(),
            }),
            collaborators,
            Vec2::new(800.0, 600.0),
        );
        let finals = Rc::new(RefCell::new(Vec::new()));
        let sink = finals.clone();
        session.on_game_over(move |score| sink.borrow_mut().push(score));
        Harness {
            session,
            input,
            audio,
            finals,
            inits,
        }
    }

    #[test]
    fn test_new_session_is_idle() {
        let h = harness();
        assert_eq!(h.session.phase(), SessionPhase::Idle);
        assert_eq!((h.session.score(), h.session.lives(), h.session.level()), (0, 2, 1));
    }

    #[test]
    fn test_idle_session_does_not_tick() {
        let mut h = harness();
        h.session.tick();
        assert_eq!(h.session.score(), 0);
    }

    #[test]
    fn test_start_while_running_keeps_progress() {
        let mut h = harness();
        assert!(h.session.start().is_some());
        h.session.tick();
        h.session.tick();
        assert!(h.session.start().is_none());
        assert_eq!(h.session.score(), 2);
        assert_eq!(h.session.phase(), SessionPhase::Running);
    }

    #[test]
    fn test_pause_is_idempotent() {
        let mut h = harness();
        h.session.start();
        h.session.pause();
        h.session.pause();
        assert_eq!(h.session.phase(), SessionPhase::Paused);
        h.session.tick();
        assert_eq!(h.session.score(), 0);
    }

    #[test]
    fn test_resume_only_from_paused() {
        let mut h = harness();
        assert!(h.session.resume().is_none());
        assert_eq!(h.session.phase(), SessionPhase::Idle);
        h.session.start();
        h.session.pause();
        assert!(h.session.resume().is_some());
        assert_eq!(h.session.phase(), SessionPhase::Running);
    }

    #[test]
    fn test_pause_input_pauses_without_simulating() {
        let mut h = harness();
        h.session.start();
        h.input.borrow_mut().press(Control::Pause);
        h.session.tick();
        assert_eq!(h.session.phase(), SessionPhase::Paused);
        assert_eq!(h.session.score(), 0);
    }

    #[test]
    fn test_losing_last_life_ends_game_once() {
        let mut h = harness();
        h.session.start();
        for _ in 0..2 {
            h.input.borrow_mut().press(Control::Action1);
            h.session.tick();
            h.input.borrow_mut().release(Control::Action1);
        }
        assert_eq!(h.session.phase(), SessionPhase::GameOver);
        assert_eq!(h.session.lives(), 0);
        assert_eq!(*h.finals.borrow(), vec![2]);

        // Further game_over calls are not new transitions
        h.session.game_over(Some(99));
        assert_eq!(h.finals.borrow().len(), 1);
        assert_eq!(h.audio.borrow().count(SoundCue::GameOver), 1);
    }

    #[test]
    fn test_game_over_reports_explicit_score() {
        let mut h = harness();
        h.session.start();
        h.session.game_over(Some(1234));
        assert_eq!(*h.finals.borrow(), vec![1234]);
    }

    #[test]
    fn test_reset_restores_initial_values() {
        let mut h = harness();
        h.session.start();
        for _ in 0..10 {
            h.session.tick();
        }
        assert_eq!(h.inits.get(), 1);
        h.session.reset();
        assert_eq!(h.session.phase(), SessionPhase::Idle);
        assert_eq!((h.session.score(), h.session.lives(), h.session.level()), (0, 2, 1));
        assert_eq!(h.session.ticks(), 0);
        // Entities were rebuilt, not just the counters
        assert_eq!(h.inits.get(), 2);
        let mut surface = DisplayList::new(Vec2::new(800.0, 600.0));
        h.session.render(&mut surface);
        assert!(surface.texts().any(|t| t == "0"));
    }

    #[test]
    fn test_start_after_game_over_begins_fresh_run() {
        let mut h = harness();
        h.session.start();
        h.session.tick();
        h.session.game_over(None);
        assert!(h.session.start().is_some());
        assert_eq!(h.session.phase(), SessionPhase::Running);
        assert_eq!((h.session.score(), h.session.lives()), (0, 2));
    }

    #[test]
    fn test_stale_frame_handle_is_noop() {
        let mut h = harness();
        let mut surface = DisplayList::new(Vec2::new(800.0, 600.0));
        let handle = h.session.start().unwrap();
        let next = h.session.frame(handle, 0.0, &mut surface).unwrap();

        h.session.pause();
        assert!(h.session.frame(next, 1000.0, &mut surface).is_none());
        assert_eq!(h.session.score(), 0);

        // Resuming issues a fresh handle; the old one stays dead
        let fresh = h.session.resume().unwrap();
        assert!(h.session.frame(next, 1000.0, &mut surface).is_none());
        assert!(h.session.frame(fresh, 1000.0, &mut surface).is_some());
    }

    #[test]
    fn test_frame_runs_owed_ticks_then_renders_once() {
        let mut h = harness();
        let mut surface = DisplayList::new(Vec2::new(800.0, 600.0));
        let handle = h.session.start().unwrap();
        let handle = h.session.frame(handle, 0.0, &mut surface).unwrap();
        surface.commands.clear();

        let tick = crate::consts::TICK_MS as f64;
        h.session.frame(handle, tick * 3.0 + 1.0, &mut surface);
        assert_eq!(h.session.score(), 3);
        let texts: Vec<&str> = surface.texts().collect();
        assert_eq!(texts, vec!["3", "SCORE 3", "LEVEL 1", "LIVES 2"]);
    }

    #[test]
    fn test_destroy_stops_frames() {
        let mut h = harness();
        let mut surface = DisplayList::new(Vec2::new(800.0, 600.0));
        let handle = h.session.start().unwrap();
        h.session.destroy();
        assert!(h.session.frame(handle, 100.0, &mut surface).is_none());
    }
}
