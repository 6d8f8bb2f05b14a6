use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::game::{Action, Direction};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    GameAction(Action),
    Quit,
    None,
}

pub struct InputHandler;

impl InputHandler {
    pub fn new() -> Self {
        Self
    }

    pub fn handle_key_event(&self, key: KeyEvent) -> KeyAction {
        // Handle Ctrl+C
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return KeyAction::Quit;
        }

        match key.code {
            // Movement - Arrow keys
            KeyCode::Up => KeyAction::GameAction(Action::Turn(Direction::Up)),
            KeyCode::Down => KeyAction::GameAction(Action::Turn(Direction::Down)),
            KeyCode::Left => KeyAction::GameAction(Action::Turn(Direction::Left)),
            KeyCode::Right => KeyAction::GameAction(Action::Turn(Direction::Right)),

            // Movement - WASD
            KeyCode::Char('w') | KeyCode::Char('W') => {
                KeyAction::GameAction(Action::Turn(Direction::Up))
            }
            KeyCode::Char('s') | KeyCode::Char('S') => {
                KeyAction::GameAction(Action::Turn(Direction::Down))
            }
            KeyCode::Char('a') | KeyCode::Char('A') => {
                KeyAction::GameAction(Action::Turn(Direction::Left))
            }
            KeyCode::Char('d') | KeyCode::Char('D') => {
                KeyAction::GameAction(Action::Turn(Direction::Right))
            }

            // Controls
            KeyCode::Char('p') | KeyCode::Char('P') => KeyAction::GameAction(Action::TogglePause),
            KeyCode::Char('r') | KeyCode::Char('R') => KeyAction::GameAction(Action::Restart),
            KeyCode::Enter | KeyCode::Char(' ') => KeyAction::GameAction(Action::Start),
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => KeyAction::Quit,

            _ => KeyAction::None,
        }
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(handler: &InputHandler, code: KeyCode) -> KeyAction {
        handler.handle_key_event(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn test_arrow_keys() {
        let handler = InputHandler::new();

        assert_eq!(
            press(&handler, KeyCode::Up),
            KeyAction::GameAction(Action::Turn(Direction::Up))
        );
        assert_eq!(
            press(&handler, KeyCode::Down),
            KeyAction::GameAction(Action::Turn(Direction::Down))
        );
        assert_eq!(
            press(&handler, KeyCode::Left),
            KeyAction::GameAction(Action::Turn(Direction::Left))
        );
        assert_eq!(
            press(&handler, KeyCode::Right),
            KeyAction::GameAction(Action::Turn(Direction::Right))
        );
    }

    #[test]
    fn test_wasd_keys() {
        let handler = InputHandler::new();

        assert_eq!(
            press(&handler, KeyCode::Char('w')),
            KeyAction::GameAction(Action::Turn(Direction::Up))
        );
        assert_eq!(
            press(&handler, KeyCode::Char('a')),
            KeyAction::GameAction(Action::Turn(Direction::Left))
        );
        assert_eq!(
            press(&handler, KeyCode::Char('s')),
            KeyAction::GameAction(Action::Turn(Direction::Down))
        );

        let d_upper = KeyEvent::new(KeyCode::Char('D'), KeyModifiers::SHIFT);
        assert_eq!(
            handler.handle_key_event(d_upper),
            KeyAction::GameAction(Action::Turn(Direction::Right))
        );
    }

    #[test]
    fn test_signal_keys() {
        let handler = InputHandler::new();

        assert_eq!(
            press(&handler, KeyCode::Char('p')),
            KeyAction::GameAction(Action::TogglePause)
        );
        assert_eq!(
            press(&handler, KeyCode::Char('R')),
            KeyAction::GameAction(Action::Restart)
        );
        assert_eq!(
            press(&handler, KeyCode::Enter),
            KeyAction::GameAction(Action::Start)
        );
        assert_eq!(
            press(&handler, KeyCode::Char(' ')),
            KeyAction::GameAction(Action::Start)
        );
    }

    #[test]
    fn test_quit_keys() {
        let handler = InputHandler::new();

        assert_eq!(press(&handler, KeyCode::Char('q')), KeyAction::Quit);
        assert_eq!(press(&handler, KeyCode::Esc), KeyAction::Quit);

        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(handler.handle_key_event(ctrl_c), KeyAction::Quit);
    }

    #[test]
    fn test_unknown_key() {
        let handler = InputHandler::new();
        assert_eq!(press(&handler, KeyCode::Char('x')), KeyAction::None);
        assert_eq!(press(&handler, KeyCode::Char('c')), KeyAction::None);
    }
}
