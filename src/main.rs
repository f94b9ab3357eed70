//! Retro Arcade entry point
//!
//! In the browser this hosts one session on a canvas and drives it from
//! `requestAnimationFrame`. Natively it runs a headless session with scripted
//! input and prints the final snapshot as JSON.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_host {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, KeyboardEvent};

    use retro_arcade::consts::{CANVAS_HEIGHT, CANVAS_WIDTH};
    use retro_arcade::platform::canvas::CanvasSurface;
    use retro_arcade::platform::keyboard::{blocks_default, control_for_code, dispatch_press};
    use retro_arcade::platform::web_audio::WebAudioSink;
    use retro_arcade::render::{Color, Surface};
    use retro_arcade::sim::{FrameHandle, InputState, seeded};
    use retro_arcade::{
        Collaborators, GameId, HighScores, Session, SessionPhase, Settings, Tuning, games,
    };

    /// Everything the page callbacks share
    struct Arcade {
        session: Session,
        surface: CanvasSurface,
        input: Rc<RefCell<InputState>>,
        audio: Rc<RefCell<WebAudioSink>>,
        settings: Settings,
        scores: HighScores,
        /// Set by the session's game-over callback, drained by the host
        final_score: Rc<Cell<Option<u64>>>,
    }

    impl Arcade {
        /// Draw the frozen game with a banner for the current phase
        fn draw_still(&mut self) {
            self.session.render(&mut self.surface);
            let size = self.surface.size();
            let center = size * 0.5;
            let (title, hint) = match self.session.phase() {
                SessionPhase::Idle => (self.session.game_id().as_str().to_uppercase(), "PRESS ENTER"),
                SessionPhase::Paused => ("PAUSED".to_string(), "PRESS P TO RESUME"),
                SessionPhase::GameOver => ("GAME OVER".to_string(), "PRESS ENTER"),
                SessionPhase::Running => return,
            };
            banner_line(&mut self.surface, center + Vec2::new(0.0, -20.0), &title, 40.0, Color::YELLOW);
            banner_line(&mut self.surface, center + Vec2::new(0.0, 30.0), hint, 18.0, Color::WHITE);
            if let Some(best) = self.scores.top_score(self.session.game_id()) {
                let line = format!("HIGH SCORE {best}");
                banner_line(&mut self.surface, center + Vec2::new(0.0, 60.0), &line, 16.0, Color::GRAY);
            }
        }

        /// Move a finished run into the leaderboard
        fn record_game_over(&mut self) {
            let Some(score) = self.final_score.take() else {
                return;
            };
            let game = self.session.game_id();
            let rank = self
                .scores
                .add_score(game, score, self.session.level(), js_sys::Date::now());
            if rank.is_some() {
                self.scores.save();
            }
        }
    }

    /// Roughly centered monospace text
    fn banner_line(surface: &mut dyn Surface, center: Vec2, text: &str, size: f32, color: Color) {
        let half_width = text.len() as f32 * size * 0.3;
        surface.text(center - Vec2::new(half_width, 0.0), text, size, color);
    }

    /// `#frogger` in the URL wins, then the last game played, then Asteroids
    fn requested_game(settings: &Settings) -> GameId {
        let hash = web_sys::window()
            .and_then(|w| w.location().hash().ok())
            .unwrap_or_default();
        [hash.trim_start_matches('#'), settings.last_game.as_str()]
            .into_iter()
            .filter_map(|name| name.parse::<GameId>().ok())
            .find(|id| id.is_bundled())
            .unwrap_or(GameId::Asteroids)
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);

        log::info!("Retro Arcade starting...");

        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;

        // Hide loading indicator
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or_else(|| JsValue::from_str("no canvas"))?
            .dyn_into()
            .map_err(JsValue::from)?;
        let bounds = Vec2::new(CANVAS_WIDTH, CANVAS_HEIGHT);
        let surface = CanvasSurface::new(&canvas, bounds)
            .ok_or_else(|| JsValue::from_str("no 2d canvas context"))?;

        let mut settings = Settings::load();
        let game_id = requested_game(&settings);
        if settings.last_game != game_id.as_str() {
            settings.last_game = game_id.as_str().to_string();
            settings.save();
        }

        let game = games::create(game_id, &Tuning::load())
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        let seed = js_sys::Date::now() as u64;
        let input = Rc::new(RefCell::new(InputState::new()));
        let audio = Rc::new(RefCell::new(WebAudioSink::new(&settings)));
        let mut session = Session::new(
            game,
            Collaborators {
                input: Box::new(input.clone()),
                audio: Box::new(audio.clone()),
                rng: Box::new(seeded(seed)),
            },
            bounds,
        );
        log::info!("{game_id} ready with seed: {seed}");

        let final_score = Rc::new(Cell::new(None));
        {
            let final_score = final_score.clone();
            session.on_game_over(move |score| final_score.set(Some(score)));
        }

        let arcade = Rc::new(RefCell::new(Arcade {
            session,
            surface,
            input,
            audio,
            settings,
            scores: HighScores::load(),
            final_score,
        }));
        arcade.borrow_mut().draw_still();

        setup_keyboard(arcade.clone());
        setup_auto_pause(arcade.clone());
        setup_hash_change();

        log::info!("Retro Arcade running!");
        Ok(())
    }

    fn request_animation_frame(arcade: Rc<RefCell<Arcade>>, handle: FrameHandle) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(arcade, handle, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(arcade: Rc<RefCell<Arcade>>, handle: FrameHandle, time: f64) {
        let next = {
            let mut a = arcade.borrow_mut();
            let a = &mut *a;
            let next = a.session.frame(handle, time, &mut a.surface);
            // A stale handle from before a pause/resume also lands here
            if next.is_none() && a.session.phase() != SessionPhase::Running {
                a.record_game_over();
                a.draw_still();
            }
            next
        };

        if let Some(handle) = next {
            request_animation_frame(arcade, handle);
        }
    }

    fn setup_keyboard(arcade: Rc<RefCell<Arcade>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        // Key down
        {
            let arcade = arcade.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let code = event.code();
                if blocks_default(&code) {
                    event.prevent_default();
                }

                let handle = {
                    let mut a = arcade.borrow_mut();
                    // Browsers only allow audio after a user gesture
                    a.audio.borrow().resume();

                    if code == "KeyM" {
                        a.settings.toggle_mute();
                        a.settings.save();
                        let settings = a.settings.clone();
                        a.audio.borrow_mut().apply_settings(&settings);
                        return;
                    }

                    let Some(control) = control_for_code(&code) else {
                        return;
                    };
                    let a = &mut *a;
                    let handle = dispatch_press(&mut a.session, &a.input, control);
                    if handle.is_some() {
                        // Starting over: whatever was held belongs to the old run
                        a.input.borrow_mut().release_all();
                    }
                    handle
                };

                if let Some(handle) = handle {
                    request_animation_frame(arcade.clone(), handle);
                }
            });
            let _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Key up
        {
            let input = arcade.borrow().input.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if let Some(control) = control_for_code(&event.code()) {
                    input.borrow_mut().release(control);
                }
            });
            let _ = window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// Page went to the background: drop held keys, honor the blur settings
    fn on_focus_lost(arcade: &RefCell<Arcade>, reason: &str) {
        let mut a = arcade.borrow_mut();
        a.input.borrow_mut().release_all();
        if a.settings.mute_on_blur {
            a.audio.borrow_mut().set_blurred(true);
        }
        if a.settings.pause_on_blur && a.session.phase() == SessionPhase::Running {
            a.session.pause();
            a.draw_still();
            log::info!("Auto-paused ({reason})");
        }
    }

    fn setup_auto_pause(arcade: Rc<RefCell<Arcade>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let Some(document) = window.document() else {
            return;
        };

        // Visibility change (tab switch, minimize)
        {
            let arcade = arcade.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    on_focus_lost(&arcade, "tab hidden");
                } else {
                    arcade.borrow().audio.borrow_mut().set_blurred(false);
                }
            });
            let _ = document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        // Window blur (click outside)
        {
            let arcade = arcade.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                on_focus_lost(&arcade, "window blur");
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                arcade.borrow().audio.borrow_mut().set_blurred(false);
            });
            let _ = window.add_event_listener_with_callback("focus", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// Switching `#game` reloads so the new session starts from a clean page
    fn setup_hash_change() {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            if let Some(window) = web_sys::window() {
                let _ = window.location().reload();
            }
        });
        let _ = window.add_event_listener_with_callback("hashchange", closure.as_ref().unchecked_ref());
        closure.forget();
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    wasm_host::run()
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::cell::{Cell, RefCell};
    use std::collections::BTreeMap;
    use std::fs;
    use std::path::PathBuf;
    use std::rc::Rc;

    use anyhow::{Context, Result, bail};
    use clap::Parser;
    use glam::Vec2;
    use serde::Serialize;

    use retro_arcade::consts::{CANVAS_HEIGHT, CANVAS_WIDTH};
    use retro_arcade::platform::keyboard::dispatch_press;
    use retro_arcade::render::DisplayList;
    use retro_arcade::sim::{Control, CueLog, InputState, seeded};
    use retro_arcade::{Collaborators, GameId, Session, SessionSnapshot, Tuning, games};

    #[derive(Parser)]
    #[command(name = "retro-arcade")]
    #[command(about = "Run a headless arcade session and print the final snapshot as JSON")]
    pub struct Args {
        /// Game to run (snake, pong, frogger, asteroids, pacman)
        #[arg(long, default_value = "asteroids")]
        game: String,

        /// Fixed ticks to simulate
        #[arg(long, default_value_t = 600)]
        ticks: u64,

        /// RNG seed; the same seed and script replay identically
        #[arg(long, default_value_t = 1)]
        seed: u64,

        /// JSON file overriding any subset of the game tuning
        #[arg(long)]
        tuning: Option<PathBuf>,

        /// Scripted key as TICK:CONTROL (a tap) or TICK:CONTROL:HOLD_TICKS; repeatable
        #[arg(long = "press", value_parser = parse_press)]
        presses: Vec<Press>,

        /// Include the last frame's draw commands
        #[arg(long)]
        draw: bool,

        /// Pretty-print the JSON
        #[arg(long)]
        pretty: bool,
    }

    /// One scripted key press
    #[derive(Debug, Clone, Copy)]
    pub struct Press {
        tick: u64,
        control: Control,
        /// Ticks the key stays down; 0 is a tap seen for one tick
        hold: u64,
    }

    fn parse_press(s: &str) -> Result<Press, String> {
        let mut parts = s.split(':');
        let tick = parts
            .next()
            .and_then(|t| t.parse().ok())
            .ok_or_else(|| format!("expected TICK:CONTROL, got {s:?}"))?;
        let control = parts
            .next()
            .and_then(Control::from_name)
            .ok_or_else(|| format!("unknown control in {s:?}"))?;
        let hold = match parts.next() {
            Some(h) => h.parse().map_err(|_| format!("bad hold ticks in {s:?}"))?,
            None => 0,
        };
        Ok(Press { tick, control, hold })
    }

    #[derive(Serialize)]
    struct Report {
        game: GameId,
        seed: u64,
        ticks: u64,
        final_score: Option<u64>,
        session: SessionSnapshot,
        cues: BTreeMap<&'static str, usize>,
        #[serde(skip_serializing_if = "Option::is_none")]
        frame: Option<DisplayList>,
    }

    pub fn run(args: Args) -> Result<()> {
        let id: GameId = args.game.parse()?;
        if !id.is_bundled() {
            bail!("{id} has no implementation in this build");
        }

        let tuning = match &args.tuning {
            Some(path) => {
                let json = fs::read_to_string(path)
                    .with_context(|| format!("Failed to read {}", path.display()))?;
                Tuning::from_json(&json)
                    .with_context(|| format!("Failed to parse {}", path.display()))?
            }
            None => Tuning::default(),
        };

        let input = Rc::new(RefCell::new(InputState::new()));
        let audio = Rc::new(RefCell::new(CueLog::default()));
        let bounds = Vec2::new(CANVAS_WIDTH, CANVAS_HEIGHT);
        let mut session = Session::new(
            games::create(id, &tuning)?,
            Collaborators {
                input: Box::new(input.clone()),
                audio: Box::new(audio.clone()),
                rng: Box::new(seeded(args.seed)),
            },
            bounds,
        );

        let final_score = Rc::new(Cell::new(None));
        {
            let final_score = final_score.clone();
            session.on_game_over(move |score| final_score.set(Some(score)));
        }

        session.start();
        for tick in 0..args.ticks {
            for press in args.presses.iter().filter(|p| p.tick == tick) {
                dispatch_press(&mut session, &input, press.control);
            }
            // Released after pressing so a zero-length hold still registers as a tap
            for press in args.presses.iter().filter(|p| p.tick + p.hold == tick) {
                input.borrow_mut().release(press.control);
            }
            session.tick();
        }
        log::info!(
            "{id} finished after {} ticks: score {}, {:?}",
            session.ticks(),
            session.score(),
            session.phase()
        );

        let mut cues = BTreeMap::new();
        for cue in &audio.borrow().cues {
            *cues.entry(cue.as_str()).or_insert(0) += 1;
        }

        let frame = args.draw.then(|| {
            let mut list = DisplayList::new(bounds);
            session.render(&mut list);
            list
        });

        let report = Report {
            game: id,
            seed: args.seed,
            ticks: session.ticks(),
            final_score: final_score.get(),
            session: session.snapshot(),
            cues,
            frame,
        };
        let json = if args.pretty {
            serde_json::to_string_pretty(&report)?
        } else {
            serde_json::to_string(&report)?
        };
        println!("{json}");
        Ok(())
    }

}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    use clap::Parser;

    env_logger::init();
    headless::run(headless::Args::parse())
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
