/// Logical controls shared by keyboard and gamepad.
///
/// Keyboard:
///   ↑ ↓ / W S        →  Move cursor
///   ← → / A D        →  Change difficulty (Settings)
///   Enter / Space    →  Confirm (Space also counts as Found for a Seeker)
///   Esc / Backspace  →  Back / leave round
///   F                →  Found
///   1 2 3            →  Hiding spots
///   P                →  Play again
///   M                →  Back to menu after a round
///   R                →  Reset progress
///   Q / Ctrl+C       →  Quit

use crossterm::event::KeyCode;

use crate::domain::role::HidingSpot;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Intent {
    Up,
    Down,
    Left,
    Right,
    Confirm,
    Back,
    Found,
    Hide(HidingSpot),
    PlayAgain,
    Menu,
    Reset,
    Quit,
}

pub fn intent_for_key(code: KeyCode) -> Option<Intent> {
    let intent = match code {
        KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') => Intent::Up,
        KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S') => Intent::Down,
        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => Intent::Left,
        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => Intent::Right,
        KeyCode::Enter | KeyCode::Char(' ') => Intent::Confirm,
        KeyCode::Esc | KeyCode::Backspace => Intent::Back,
        KeyCode::Char('f') | KeyCode::Char('F') => Intent::Found,
        KeyCode::Char('1') => Intent::Hide(HidingSpot::Tree),
        KeyCode::Char('2') => Intent::Hide(HidingSpot::Bushes),
        KeyCode::Char('3') => Intent::Hide(HidingSpot::House),
        KeyCode::Char('p') | KeyCode::Char('P') => Intent::PlayAgain,
        KeyCode::Char('m') | KeyCode::Char('M') => Intent::Menu,
        KeyCode::Char('r') | KeyCode::Char('R') => Intent::Reset,
        KeyCode::Char('q') | KeyCode::Char('Q') => Intent::Quit,
        _ => return None,
    };
    Some(intent)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arrows_and_wasd_agree() {
        assert_eq!(intent_for_key(KeyCode::Up), intent_for_key(KeyCode::Char('w')));
        assert_eq!(intent_for_key(KeyCode::Down), intent_for_key(KeyCode::Char('S')));
        assert_eq!(intent_for_key(KeyCode::Left), Some(Intent::Left));
    }

    #[test]
    fn number_keys_pick_spots() {
        assert_eq!(intent_for_key(KeyCode::Char('1')), Some(Intent::Hide(HidingSpot::Tree)));
        assert_eq!(intent_for_key(KeyCode::Char('3')), Some(Intent::Hide(HidingSpot::House)));
        assert_eq!(intent_for_key(KeyCode::Char('4')), None);
    }

    #[test]
    fn space_is_confirm() {
        assert_eq!(intent_for_key(KeyCode::Char(' ')), Some(Intent::Confirm));
        assert_eq!(intent_for_key(KeyCode::Enter), Some(Intent::Confirm));
    }
}
