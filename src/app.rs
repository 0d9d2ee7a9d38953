/// Host controller: turns intents into session actions and session events
/// into host effects (sounds, message bar, tick schedule).
///
/// The session never sees the clock. `App` owns the one `TickSchedule` and
/// feeds its tokens back through `Session::on_tick`.

use std::time::{Duration, Instant};

use chrono::NaiveDate;
use tracing::{debug, info};

use crate::domain::catalog::{ARENAS, CHARACTERS};
use crate::domain::role::{HidingSpot, Role};
use crate::sim::event::{SessionEvent, SoundCue};
use crate::sim::session::{ActionResult, Screen, Session};
use crate::sim::timer::TickSchedule;
use crate::ui::controls::Intent;
use crate::ui::view::{
    item_count, MenuItem, RoundEndItem, SettingsItem, ViewState, MENU_ITEMS, ROUND_END_ITEMS,
    SETTINGS_ITEMS,
};

pub struct App {
    session: Session,
    view: ViewState,
    schedule: Option<TickSchedule>,
    tick_period: Duration,
    /// Cues waiting for the sound engine.
    sounds: Vec<SoundCue>,
    quit: bool,
}

impl App {
    pub fn new(session: Session, tick_period: Duration) -> Self {
        let mut view = ViewState::new();
        view.sync(&session);
        App {
            session,
            view,
            schedule: None,
            tick_period,
            sounds: vec![],
            quit: false,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }

    pub fn take_sounds(&mut self) -> Vec<SoundCue> {
        std::mem::take(&mut self.sounds)
    }

    /// Poll the tick schedule. Call once per frame.
    pub fn update(&mut self, now: Instant) {
        let Some(token) = self.schedule.as_mut().and_then(|s| s.poll(now)) else {
            return;
        };
        let events = self.session.on_tick(token);
        self.apply(events, now);
    }

    pub fn handle(&mut self, intent: Intent, now: Instant, today: NaiveDate) {
        if intent == Intent::Quit {
            info!("quit requested");
            self.quit = true;
            return;
        }

        let screen = self.session.screen();
        let count = item_count(screen, &self.session);
        match intent {
            Intent::Up => return self.view.move_cursor(-1, count),
            Intent::Down => return self.view.move_cursor(1, count),
            _ => {}
        }

        let cursor = self.view.cursor();
        let s = &mut self.session;
        let result: ActionResult = match (screen, intent) {
            (Screen::Menu, Intent::Confirm) => match MENU_ITEMS[cursor.min(MENU_ITEMS.len() - 1)] {
                MenuItem::Character => s.open_character_select(),
                MenuItem::Arena => s.open_arena_select(),
                MenuItem::Role => s.open_role_select(),
                MenuItem::Play => s.start_round(),
                MenuItem::Leaderboard => s.open_leaderboard(),
                MenuItem::Settings => s.open_settings(),
                MenuItem::Quit => {
                    info!("quit requested");
                    self.quit = true;
                    return;
                }
            },

            (Screen::SelectingCharacter, Intent::Confirm) => match CHARACTERS.get(cursor) {
                Some(c) => s.choose_character(c.id),
                None => return,
            },
            (Screen::SelectingArena, Intent::Confirm) => match ARENAS.get(cursor) {
                Some(a) => s.choose_arena(a.id),
                None => return,
            },
            (Screen::SelectingRole, Intent::Confirm) => match Role::ALL.get(cursor) {
                Some(r) => s.choose_role(*r),
                None => return,
            },
            (
                Screen::SelectingCharacter | Screen::SelectingArena | Screen::SelectingRole,
                Intent::Back,
            ) => s.back(),

            (Screen::Leaderboard, Intent::Back | Intent::Confirm) => s.back(),
            (Screen::Menu | Screen::Leaderboard | Screen::Settings, Intent::Reset) => s.reset_progress(),

            (Screen::Settings, Intent::Left) => s.set_difficulty(s.difficulty().prev()),
            (Screen::Settings, Intent::Right) => s.set_difficulty(s.difficulty().next()),
            (Screen::Settings, Intent::Back) => s.back(),
            (Screen::Settings, Intent::Confirm) => match SETTINGS_ITEMS.get(cursor) {
                Some(SettingsItem::Difficulty) => s.set_difficulty(s.difficulty().next()),
                Some(SettingsItem::ResetProgress) => s.reset_progress(),
                Some(SettingsItem::Back) => s.back(),
                None => return,
            },

            (Screen::InRound, Intent::Back) => s.abandon_round(),
            (Screen::InRound, Intent::Found) => s.mark_found(),
            (Screen::InRound, Intent::Hide(spot)) => s.hide(spot),
            (Screen::InRound, Intent::Confirm) => match s.selection().role() {
                Some(Role::Seeker) => s.mark_found(),
                _ => match HidingSpot::ALL.get(cursor) {
                    Some(spot) => s.hide(*spot),
                    None => return,
                },
            },

            (Screen::RoundEnded, Intent::PlayAgain) => s.play_again(),
            (Screen::RoundEnded, Intent::Menu | Intent::Back) => s.return_to_menu(today),
            (Screen::RoundEnded, Intent::Confirm) => match ROUND_END_ITEMS.get(cursor) {
                Some(RoundEndItem::PlayAgain) => s.play_again(),
                Some(RoundEndItem::Menu) => s.return_to_menu(today),
                None => return,
            },

            _ => return,
        };

        match result {
            Ok(events) => self.apply(events, now),
            Err(e) => {
                debug!(?intent, error = %e, "action rejected");
                self.view.show(capitalize(&e.to_string()), now);
            }
        }
        self.view.sync(&self.session);
    }

    fn apply(&mut self, events: Vec<SessionEvent>, now: Instant) {
        for event in events {
            match event {
                SessionEvent::Sound(cue) => self.sounds.push(cue),
                SessionEvent::Notice(notice) => {
                    debug!(key = notice.key.as_str(), "notice");
                    self.view.show(notice.text(), now);
                }
                SessionEvent::TimerStarted(token) => {
                    self.schedule = Some(TickSchedule::new(token, self.tick_period, now));
                }
                SessionEvent::TimerCancelled | SessionEvent::RoundEnded(_) => self.schedule = None,
                SessionEvent::TimerTick { .. } => {}
                SessionEvent::LeaderboardRecorded { rank: Some(rank) } => {
                    self.view.show(format!("New leaderboard entry at #{}!", rank + 1), now);
                }
                SessionEvent::LeaderboardRecorded { rank: None } => {}
            }
        }
        self.view.sync(&self.session);
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
