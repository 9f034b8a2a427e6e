// src/ui/keybindings.rs
//! Keyboard input handling and key mappings.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::player::PlayerAction;

/// Map digit/shifted-digit keys to section number (1..2).
pub fn map_key_to_digit(k: &KeyEvent) -> Option<usize> {
    match k.code {
        KeyCode::Char('1' | '!') => Some(1),
        KeyCode::Char('2' | '@') => Some(2),
        _ => None,
    }
}

/// Check if the key event is a shifted symbol (!, @).
pub fn is_shifted_symbol(key: &KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('!' | '@'))
}

/// Actions derived from key events.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NavigationAction {
    Player(PlayerAction),
    ToggleSection(usize),
    Quit,
    None,
}

/// Convert a key event to an action.
pub fn key_to_action(key: &KeyEvent) -> NavigationAction {
    // Section toggles take Shift+digit before anything else
    if let Some(d) = map_key_to_digit(key) {
        if key.modifiers.contains(KeyModifiers::SHIFT) || is_shifted_symbol(key) {
            return NavigationAction::ToggleSection(d);
        }
    }

    let action = match key.code {
        KeyCode::Char(' ') | KeyCode::Char('p') => PlayerAction::TogglePlay,
        KeyCode::Left | KeyCode::Char('h') => PlayerAction::SkipBack,
        KeyCode::Right | KeyCode::Char('l') => PlayerAction::SkipForward,
        KeyCode::Up | KeyCode::Char('+') | KeyCode::Char('=') => PlayerAction::VolumeUp,
        KeyCode::Down | KeyCode::Char('-') => PlayerAction::VolumeDown,
        KeyCode::Char('m') => PlayerAction::ToggleMute,
        KeyCode::Char('q') | KeyCode::Esc => return NavigationAction::Quit,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            return NavigationAction::Quit;
        }
        _ => return NavigationAction::None,
    };
    NavigationAction::Player(action)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn transport_keys() {
        assert_eq!(
            key_to_action(&key(KeyCode::Char(' '))),
            NavigationAction::Player(PlayerAction::TogglePlay)
        );
        assert_eq!(
            key_to_action(&key(KeyCode::Left)),
            NavigationAction::Player(PlayerAction::SkipBack)
        );
        assert_eq!(
            key_to_action(&key(KeyCode::Right)),
            NavigationAction::Player(PlayerAction::SkipForward)
        );
        assert_eq!(
            key_to_action(&key(KeyCode::Char('m'))),
            NavigationAction::Player(PlayerAction::ToggleMute)
        );
        assert_eq!(key_to_action(&key(KeyCode::Char('q'))), NavigationAction::Quit);
        assert_eq!(key_to_action(&key(KeyCode::Char('z'))), NavigationAction::None);
    }

    #[test]
    fn shifted_digits_toggle_sections() {
        // Terminals report Shift+1 either as '!' or as '1' with SHIFT.
        assert_eq!(
            key_to_action(&key(KeyCode::Char('!'))),
            NavigationAction::ToggleSection(1)
        );
        assert_eq!(
            key_to_action(&KeyEvent::new(KeyCode::Char('2'), KeyModifiers::SHIFT)),
            NavigationAction::ToggleSection(2)
        );
        assert_eq!(key_to_action(&key(KeyCode::Char('1'))), NavigationAction::None);
    }

    #[test]
    fn ctrl_c_quits() {
        let ev = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(key_to_action(&ev), NavigationAction::Quit);
    }
}
