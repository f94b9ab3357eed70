//! DOM keyboard mapping
//!
//! Uses `KeyboardEvent.code` (physical key) so WASD works on any layout.

use std::cell::RefCell;

use crate::sim::{Control, FrameHandle, InputState, Session, SessionPhase};

/// Control bound to a physical key, if any
pub fn control_for_code(code: &str) -> Option<Control> {
    let control = match code {
        "ArrowUp" | "KeyW" => Control::Up,
        "ArrowDown" | "KeyS" => Control::Down,
        "ArrowLeft" | "KeyA" => Control::Left,
        "ArrowRight" | "KeyD" => Control::Right,
        "Space" | "KeyJ" | "KeyZ" => Control::Action1,
        "ShiftLeft" | "ShiftRight" | "KeyK" | "KeyX" => Control::Action2,
        "KeyP" | "Escape" => Control::Pause,
        "Enter" | "NumpadEnter" => Control::Start,
        _ => return None,
    };
    Some(control)
}

/// Keys whose browser default (page scroll) must be suppressed during play
pub fn blocks_default(code: &str) -> bool {
    matches!(
        code,
        "ArrowUp" | "ArrowDown" | "ArrowLeft" | "ArrowRight" | "Space"
    )
}

/// Deliver one key press.
///
/// Start launches an idle or finished session, Pause/Start resume a paused
/// one, and while running every control goes to the game (which is how Pause
/// reaches the session's tick). Returns the frame handle to schedule when the
/// loop (re)starts.
pub fn dispatch_press(
    session: &mut Session,
    input: &RefCell<InputState>,
    control: Control,
) -> Option<FrameHandle> {
    match (session.phase(), control) {
        (SessionPhase::Idle | SessionPhase::GameOver, Control::Start) => session.start(),
        (SessionPhase::Paused, Control::Start | Control::Pause) => session.resume(),
        (SessionPhase::Running, _) => {
            input.borrow_mut().press(control);
            None
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use glam::Vec2;

    use super::*;
    use crate::games::{self, GameId};
    use crate::sim::{Collaborators, NullAudio, seeded};
    use crate::tuning::Tuning;

    #[test]
    fn test_arrows_and_wasd_agree() {
        for (arrow, letter) in [
            ("ArrowUp", "KeyW"),
            ("ArrowDown", "KeyS"),
            ("ArrowLeft", "KeyA"),
            ("ArrowRight", "KeyD"),
        ] {
            assert_eq!(control_for_code(arrow), control_for_code(letter));
            assert!(control_for_code(arrow).is_some());
        }
    }

    #[test]
    fn test_every_control_has_a_key() {
        let codes = [
            "ArrowUp", "ArrowDown", "ArrowLeft", "ArrowRight", "Space", "KeyX", "KeyP", "Enter",
        ];
        for control in Control::ALL {
            assert!(
                codes.iter().any(|c| control_for_code(c) == Some(control)),
                "{} unbound",
                control.as_str()
            );
        }
    }

    #[test]
    fn test_unbound_keys() {
        assert_eq!(control_for_code("KeyQ"), None);
        assert_eq!(control_for_code(""), None);
        assert!(blocks_default("Space"));
        assert!(!blocks_default("KeyP"));
    }

    fn snake_session() -> (Session, Rc<RefCell<InputState>>) {
        let input = Rc::new(RefCell::new(InputState::new()));
        let game = games::create(GameId::Snake, &Tuning::default()).unwrap();
        let session = Session::new(
            game,
            Collaborators {
                input: Box::new(input.clone()),
                audio: Box::new(NullAudio),
                rng: Box::new(seeded(3)),
            },
            Vec2::new(800.0, 600.0),
        );
        (session, input)
    }

    #[test]
    fn test_start_key_launches_idle_session() {
        let (mut session, input) = snake_session();
        assert!(dispatch_press(&mut session, &input, Control::Up).is_none());
        assert_eq!(session.phase(), SessionPhase::Idle);
        assert!(dispatch_press(&mut session, &input, Control::Start).is_some());
        assert_eq!(session.phase(), SessionPhase::Running);
    }

    #[test]
    fn test_pause_key_round_trip() {
        let (mut session, input) = snake_session();
        session.start();
        assert!(dispatch_press(&mut session, &input, Control::Pause).is_none());
        input.borrow_mut().release(Control::Pause);
        session.tick();
        assert_eq!(session.phase(), SessionPhase::Paused);

        assert!(dispatch_press(&mut session, &input, Control::Pause).is_some());
        assert_eq!(session.phase(), SessionPhase::Running);
    }

    #[test]
    fn test_start_after_game_over_begins_fresh_run() {
        let (mut session, input) = snake_session();
        session.start();
        session.game_over(Some(40));
        assert!(dispatch_press(&mut session, &input, Control::Start).is_some());
        assert_eq!(session.phase(), SessionPhase::Running);
        assert_eq!(session.score(), 0);
    }
}
