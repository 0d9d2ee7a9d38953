/// Presentation-only state: list cursor and the timed message bar.
///
/// Nothing here affects the session. The cursor is reset whenever the
/// screen changes; messages fade after `MESSAGE_TTL`.

use std::time::{Duration, Instant};

use crate::domain::catalog::{ARENAS, CHARACTERS};
use crate::domain::role::{HidingSpot, Role};
use crate::sim::session::{Screen, Session};

pub const MESSAGE_TTL: Duration = Duration::from_secs(3);

// ── Menu items ──

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum MenuItem {
    Character,
    Arena,
    Role,
    Play,
    Leaderboard,
    Settings,
    Quit,
}

pub const MENU_ITEMS: [MenuItem; 7] = [
    MenuItem::Character,
    MenuItem::Arena,
    MenuItem::Role,
    MenuItem::Play,
    MenuItem::Leaderboard,
    MenuItem::Settings,
    MenuItem::Quit,
];

impl MenuItem {
    pub fn label(self) -> &'static str {
        match self {
            MenuItem::Character   => "Character",
            MenuItem::Arena       => "Arena",
            MenuItem::Role        => "Role",
            MenuItem::Play        => "Play!",
            MenuItem::Leaderboard => "Leaderboard",
            MenuItem::Settings    => "Settings",
            MenuItem::Quit        => "Quit",
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SettingsItem {
    Difficulty,
    ResetProgress,
    Back,
}

pub const SETTINGS_ITEMS: [SettingsItem; 3] =
    [SettingsItem::Difficulty, SettingsItem::ResetProgress, SettingsItem::Back];

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum RoundEndItem {
    PlayAgain,
    Menu,
}

pub const ROUND_END_ITEMS: [RoundEndItem; 2] = [RoundEndItem::PlayAgain, RoundEndItem::Menu];

/// Number of selectable rows on a screen.
pub fn item_count(screen: Screen, session: &Session) -> usize {
    match screen {
        Screen::Menu => MENU_ITEMS.len(),
        Screen::SelectingCharacter => CHARACTERS.len(),
        Screen::SelectingArena => ARENAS.len(),
        Screen::SelectingRole => Role::ALL.len(),
        Screen::Settings => SETTINGS_ITEMS.len(),
        Screen::RoundEnded => ROUND_END_ITEMS.len(),
        Screen::InRound if session.selection().role() == Some(Role::Hider) => HidingSpot::ALL.len(),
        Screen::InRound | Screen::Leaderboard => 0,
    }
}

/// Where the cursor lands when a screen opens: on the current pick, if any.
fn initial_cursor(screen: Screen, session: &Session) -> usize {
    let sel = session.selection();
    let found = match screen {
        Screen::SelectingCharacter => sel
            .character()
            .and_then(|c| CHARACTERS.iter().position(|x| x.id == c.id)),
        Screen::SelectingArena => sel.arena().and_then(|a| ARENAS.iter().position(|x| x.id == a.id)),
        Screen::SelectingRole => sel.role().and_then(|r| Role::ALL.iter().position(|x| *x == r)),
        Screen::Menu if session.can_start() => MENU_ITEMS.iter().position(|m| *m == MenuItem::Play),
        _ => None,
    };
    found.unwrap_or(0)
}

// ── View state ──

struct Message {
    text: String,
    shown_at: Instant,
}

pub struct ViewState {
    screen: Screen,
    cursor: usize,
    message: Option<Message>,
}

impl ViewState {
    pub fn new() -> Self {
        ViewState { screen: Screen::Menu, cursor: 0, message: None }
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Follow the session's screen; resets the cursor on change.
    pub fn sync(&mut self, session: &Session) {
        let screen = session.screen();
        if screen != self.screen {
            self.screen = screen;
            self.cursor = initial_cursor(screen, session);
        }
    }

    pub fn move_cursor(&mut self, delta: i32, count: usize) {
        if count == 0 {
            self.cursor = 0;
            return;
        }
        let n = count as i32;
        self.cursor = ((self.cursor as i32 + delta).rem_euclid(n)) as usize;
    }

    pub fn show(&mut self, text: impl Into<String>, now: Instant) {
        self.message = Some(Message { text: text.into(), shown_at: now });
    }

    /// The current message, if it has not expired.
    pub fn message(&self, now: Instant) -> Option<&str> {
        self.message
            .as_ref()
            .filter(|m| now.duration_since(m.shown_at) < MESSAGE_TTL)
            .map(|m| m.text.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_wraps_both_ways() {
        let mut v = ViewState::new();
        v.move_cursor(-1, 3);
        assert_eq!(v.cursor(), 2);
        v.move_cursor(1, 3);
        assert_eq!(v.cursor(), 0);
        v.move_cursor(1, 0);
        assert_eq!(v.cursor(), 0);
    }

    #[test]
    fn message_expires() {
        let mut v = ViewState::new();
        let t0 = Instant::now();
        v.show("hello", t0);
        assert_eq!(v.message(t0), Some("hello"));
        assert_eq!(v.message(t0 + MESSAGE_TTL), None);
    }
}
