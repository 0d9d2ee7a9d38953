/// Session: the screen-level state machine that ties selection, timer,
/// evaluation, progression and the leaderboard together.
///
/// ## Screens
///
///   Menu ─┬─▶ SelectingCharacter ─choose/back─▶ Menu
///         ├─▶ SelectingArena     ─choose/back─▶ Menu
///         ├─▶ SelectingRole      ─choose/back─▶ Menu
///         ├─▶ Leaderboard ─back─▶ Menu
///         ├─▶ Settings    ─back─▶ Menu
///         └─start (selection ready)─▶ InRound
///
///   InRound ─timer expired─▶ RoundEnded ─return_to_menu (persist)─▶ Menu
///      │                         └─play_again (no persist)─▶ InRound
///      └─abandon─▶ Menu
///
/// Every action either succeeds and returns the events it produced, or is
/// rejected with a `SessionError` and leaves the state exactly as it was.
///
/// All mutable state lives in `SessionState`, which is plain serializable
/// data. The leaderboard store is the only thing touching the filesystem.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::domain::catalog::{self, ArenaId, CharacterId};
use crate::domain::notice::{Notice, NoticeKey};
use crate::domain::progression::Progression;
use crate::domain::role::{HidingSpot, Role};
use crate::domain::rules::{self, Difficulty, RoundOutcome, RoundResult};
use crate::domain::selection::{RoundState, SessionSelection};
use crate::sim::event::{SessionEvent, SoundCue};
use crate::sim::leaderboard::{LeaderboardEntry, LeaderboardStore};
use crate::sim::timer::{RoundTimer, Tick, TimerError, TimerToken};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
pub enum Screen {
    #[default]
    Menu,
    SelectingCharacter,
    SelectingArena,
    SelectingRole,
    InRound,
    RoundEnded,
    Leaderboard,
    Settings,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("pick a character, an arena and a role first")]
    IncompleteSelection,
    #[error("cannot {action} from {screen:?}")]
    InvalidTransition { action: &'static str, screen: Screen },
    #[error("only a {required:?} can {action}")]
    WrongRole { action: &'static str, required: Role },
    #[error("no character with id {0}")]
    UnknownCharacter(u32),
    #[error("no arena with id {0}")]
    UnknownArena(u32),
    #[error(transparent)]
    Timer(#[from] TimerError),
}

pub type ActionResult = Result<Vec<SessionEvent>, SessionError>;

/// Everything a session knows, minus the leaderboard file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    pub screen: Screen,
    pub selection: SessionSelection,
    pub round: RoundState,
    pub timer: RoundTimer,
    pub progression: Progression,
    pub difficulty: Difficulty,
    pub last_result: Option<RoundResult>,
}

impl SessionState {
    pub fn new(difficulty: Difficulty) -> Self {
        SessionState {
            screen: Screen::Menu,
            selection: SessionSelection::new(),
            round: RoundState::default(),
            timer: RoundTimer::new(),
            progression: Progression::new(),
            difficulty,
            last_result: None,
        }
    }
}

pub struct Session {
    state: SessionState,
    leaderboard: LeaderboardStore,
    /// Leaderboard name used when no character is selected.
    default_name: String,
}

impl Session {
    pub fn new(difficulty: Difficulty, leaderboard: LeaderboardStore, default_name: impl Into<String>) -> Self {
        Session {
            state: SessionState::new(difficulty),
            leaderboard,
            default_name: default_name.into(),
        }
    }

    // ── Queries ──

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn screen(&self) -> Screen {
        self.state.screen
    }

    pub fn selection(&self) -> &SessionSelection {
        &self.state.selection
    }

    pub fn round(&self) -> &RoundState {
        &self.state.round
    }

    pub fn timer(&self) -> &RoundTimer {
        &self.state.timer
    }

    pub fn progression(&self) -> &Progression {
        &self.state.progression
    }

    pub fn difficulty(&self) -> Difficulty {
        self.state.difficulty
    }

    pub fn last_result(&self) -> Option<&RoundResult> {
        self.state.last_result.as_ref()
    }

    pub fn leaderboard(&self) -> &LeaderboardStore {
        &self.leaderboard
    }

    /// Finds the Seeker needs this round, at the current level.
    pub fn required_targets(&self) -> u32 {
        rules::required_targets(self.state.progression.level())
    }

    pub fn can_start(&self) -> bool {
        self.state.screen == Screen::Menu && self.state.selection.is_ready_to_start()
    }

    // ── Menu navigation ──

    pub fn open_character_select(&mut self) -> ActionResult {
        self.open_from_menu("choose a character", Screen::SelectingCharacter)
    }

    pub fn open_arena_select(&mut self) -> ActionResult {
        self.open_from_menu("choose an arena", Screen::SelectingArena)
    }

    pub fn open_role_select(&mut self) -> ActionResult {
        self.open_from_menu("choose a role", Screen::SelectingRole)
    }

    pub fn open_leaderboard(&mut self) -> ActionResult {
        self.open_from_menu("open the leaderboard", Screen::Leaderboard)
    }

    pub fn open_settings(&mut self) -> ActionResult {
        self.open_from_menu("open settings", Screen::Settings)
    }

    fn open_from_menu(&mut self, action: &'static str, target: Screen) -> ActionResult {
        self.require(action, &[Screen::Menu])?;
        self.state.screen = target;
        Ok(vec![SessionEvent::Sound(SoundCue::Click)])
    }

    /// Leave a selection, leaderboard or settings screen without changing anything.
    pub fn back(&mut self) -> ActionResult {
        self.require("go back", &[
            Screen::SelectingCharacter,
            Screen::SelectingArena,
            Screen::SelectingRole,
            Screen::Leaderboard,
            Screen::Settings,
        ])?;
        self.state.screen = Screen::Menu;
        Ok(vec![SessionEvent::Sound(SoundCue::Click)])
    }

    // ── Selection ──

    pub fn choose_character(&mut self, id: CharacterId) -> ActionResult {
        self.require("pick a character", &[Screen::SelectingCharacter])?;
        let c = catalog::character(id).ok_or(SessionError::UnknownCharacter(id.0))?;
        self.state.selection.set_character(c.id);
        self.state.screen = Screen::Menu;
        debug!(character = c.name, "character chosen");
        Ok(vec![SessionEvent::Sound(SoundCue::Click)])
    }

    pub fn choose_arena(&mut self, id: ArenaId) -> ActionResult {
        self.require("pick an arena", &[Screen::SelectingArena])?;
        let a = catalog::arena(id).ok_or(SessionError::UnknownArena(id.0))?;
        self.state.selection.set_arena(a.id);
        self.state.screen = Screen::Menu;
        debug!(arena = a.name, "arena chosen");
        Ok(vec![SessionEvent::Sound(SoundCue::Click)])
    }

    pub fn choose_role(&mut self, role: Role) -> ActionResult {
        self.require("pick a role", &[Screen::SelectingRole])?;
        self.state.selection.set_role(role);
        self.state.screen = Screen::Menu;
        debug!(?role, "role chosen");
        Ok(vec![SessionEvent::Sound(SoundCue::Click)])
    }

    // ── Settings ──

    pub fn set_difficulty(&mut self, difficulty: Difficulty) -> ActionResult {
        self.require("change difficulty", &[Screen::Settings])?;
        if self.state.difficulty == difficulty {
            return Ok(vec![]);
        }
        self.state.difficulty = difficulty;
        info!(?difficulty, "difficulty changed");
        Ok(vec![SessionEvent::Sound(SoundCue::Click)])
    }

    /// Zero the progression and wipe the leaderboard. The only way the
    /// leaderboard is ever cleared.
    pub fn reset_progress(&mut self) -> ActionResult {
        self.require("reset progress", &[Screen::Menu, Screen::Leaderboard, Screen::Settings])?;
        self.state.progression.reset();
        self.state.last_result = None;
        let mut events = vec![SessionEvent::Sound(SoundCue::Click)];
        match self.leaderboard.clear() {
            Ok(()) => events.push(SessionEvent::Notice(Notice::bare(NoticeKey::ProgressReset))),
            Err(e) => {
                warn!(path = %self.leaderboard.path().display(), error = %e, "leaderboard clear failed");
                events.push(SessionEvent::Notice(Notice::bare(NoticeKey::SaveFailed)));
            }
        }
        info!("progress reset");
        Ok(events)
    }

    // ── Round lifecycle ──

    /// Start a round from the menu. Needs a complete selection.
    pub fn start_round(&mut self) -> ActionResult {
        self.require("start a round", &[Screen::Menu])?;
        if !self.state.selection.is_ready_to_start() {
            return Err(SessionError::IncompleteSelection);
        }
        let mut events = vec![SessionEvent::Sound(SoundCue::Click)];
        events.extend(self.begin_round()?);
        Ok(events)
    }

    /// Replay with the same selection. Does not record the round just shown.
    pub fn play_again(&mut self) -> ActionResult {
        self.require("play again", &[Screen::RoundEnded])?;
        let mut events = vec![SessionEvent::Sound(SoundCue::Click)];
        events.extend(self.begin_round()?);
        Ok(events)
    }

    fn begin_round(&mut self) -> ActionResult {
        let Some(ready) = self.state.selection.ready() else {
            return Err(SessionError::IncompleteSelection);
        };
        let duration = self.state.difficulty.duration_secs();
        let mut events = vec![];
        // A previous countdown must be dead before a new one exists.
        if self.clear_round() {
            events.push(SessionEvent::TimerCancelled);
        }
        let token = self.state.timer.start(duration)?;
        self.state.last_result = None;
        self.state.screen = Screen::InRound;
        info!(
            role = ?ready.role,
            arena = ready.arena.0,
            level = self.state.progression.level(),
            duration,
            "round started"
        );
        events.push(SessionEvent::TimerStarted(token));
        Ok(events)
    }

    /// Seeker reports finding one more player.
    pub fn mark_found(&mut self) -> ActionResult {
        self.require_round_role("mark a player found", Role::Seeker)?;
        let found = self.state.round.record_found();
        debug!(found, "player found");
        Ok(vec![SessionEvent::Sound(SoundCue::Found)])
    }

    /// Hider picks (or changes) a hiding spot.
    pub fn hide(&mut self, spot: HidingSpot) -> ActionResult {
        self.require_round_role("hide", Role::Hider)?;
        self.state.round.hide_at(spot);
        debug!(?spot, "hiding spot chosen");
        Ok(vec![SessionEvent::Sound(SoundCue::Click)])
    }

    /// Leave a running round: no score, no level, back to the menu.
    pub fn abandon_round(&mut self) -> ActionResult {
        self.require("abandon the round", &[Screen::InRound])?;
        let mut events = vec![SessionEvent::Sound(SoundCue::Click)];
        if self.clear_round() {
            events.push(SessionEvent::TimerCancelled);
        }
        self.state.screen = Screen::Menu;
        info!("round abandoned");
        Ok(events)
    }

    /// Feed one scheduled tick. Stale tokens are ignored.
    pub fn on_tick(&mut self, token: TimerToken) -> Vec<SessionEvent> {
        if self.state.screen != Screen::InRound {
            return vec![];
        }
        match self.state.timer.tick(token) {
            Tick::Stale => vec![],
            Tick::Running { remaining } => vec![SessionEvent::TimerTick { remaining }],
            Tick::Expired => self.finish_round(),
        }
    }

    fn finish_round(&mut self) -> Vec<SessionEvent> {
        let mut events = vec![SessionEvent::TimerTick { remaining: 0 }];
        // InRound is only reachable with a ready selection.
        let Some(role) = self.state.selection.role() else {
            warn!("round expired without a role; returning to menu");
            self.state.screen = Screen::Menu;
            return events;
        };
        let outcome = RoundOutcome { found_count: self.state.round.found_count() };
        let level = self.state.progression.level();
        let result = rules::evaluate(role, outcome, level, self.state.difficulty);
        self.state.progression.apply_round_result(result.score_delta);
        self.state.screen = Screen::RoundEnded;
        info!(
            ?role,
            passed = result.passed,
            score_delta = result.score_delta,
            score = self.state.progression.score(),
            level = self.state.progression.level(),
            "round ended"
        );

        if result.passed {
            events.push(SessionEvent::Sound(SoundCue::Win));
        }
        events.push(SessionEvent::Notice(result.notice.clone()));
        events.push(SessionEvent::RoundEnded(result.clone()));
        self.state.last_result = Some(result);
        events
    }

    /// Record a leaderboard snapshot and go back to the menu. Selection and
    /// progression carry over; the round is cleared.
    pub fn return_to_menu(&mut self, today: NaiveDate) -> ActionResult {
        self.require("return to the menu", &[Screen::RoundEnded])?;
        let entry = LeaderboardEntry {
            display_name: self
                .state
                .selection
                .character()
                .map(|c| c.name.to_string())
                .unwrap_or_else(|| self.default_name.clone()),
            score: self.state.progression.score(),
            level: self.state.progression.level(),
            date_label: today.format(DATE_FORMAT).to_string(),
        };

        let mut events = vec![SessionEvent::Sound(SoundCue::Click)];
        match self.leaderboard.record_entry(entry) {
            Ok(rank) => events.push(SessionEvent::LeaderboardRecorded { rank }),
            Err(e) => {
                warn!(path = %self.leaderboard.path().display(), error = %e, "leaderboard write failed");
                events.push(SessionEvent::Notice(Notice::bare(NoticeKey::SaveFailed)));
            }
        }
        self.clear_round();
        self.state.screen = Screen::Menu;
        Ok(events)
    }

    /// Drop round-scoped state and the countdown. Selection is kept.
    /// Returns true if a countdown was still live.
    fn clear_round(&mut self) -> bool {
        self.state.round.clear();
        self.state.timer.cancel()
    }

    // ── Guards ──

    fn require(&self, action: &'static str, allowed: &[Screen]) -> Result<(), SessionError> {
        if allowed.contains(&self.state.screen) {
            Ok(())
        } else {
            Err(SessionError::InvalidTransition { action, screen: self.state.screen })
        }
    }

    fn require_round_role(&self, action: &'static str, required: Role) -> Result<(), SessionError> {
        self.require(action, &[Screen::InRound])?;
        if self.state.selection.role() == Some(required) {
            Ok(())
        } else {
            Err(SessionError::WrongRole { action, required })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::leaderboard::{LEADERBOARD_FILE, MAX_ENTRIES};
    use tempfile::TempDir;

    fn session(dir: &TempDir, difficulty: Difficulty) -> Session {
        let store = LeaderboardStore::open(dir.path().join(LEADERBOARD_FILE));
        Session::new(difficulty, store, "Player")
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()
    }

    fn select(s: &mut Session, character: u32, arena: u32, role: Role) {
        s.open_character_select().unwrap();
        s.choose_character(CharacterId(character)).unwrap();
        s.open_arena_select().unwrap();
        s.choose_arena(ArenaId(arena)).unwrap();
        s.open_role_select().unwrap();
        s.choose_role(role).unwrap();
    }

    fn started_token(events: &[SessionEvent]) -> TimerToken {
        events
            .iter()
            .find_map(|e| match e {
                SessionEvent::TimerStarted(t) => Some(*t),
                _ => None,
            })
            .expect("round start emits a token")
    }

    /// Tick until the round ends; returns the events of the final tick.
    fn run_out(s: &mut Session, token: TimerToken) -> Vec<SessionEvent> {
        let secs = s.timer().remaining();
        let mut last = vec![];
        for _ in 0..secs {
            last = s.on_tick(token);
        }
        last
    }

    fn play_round(s: &mut Session, found: u32) -> Vec<SessionEvent> {
        let events = if s.screen() == Screen::RoundEnded {
            s.play_again().unwrap()
        } else {
            s.start_round().unwrap()
        };
        let token = started_token(&events);
        for _ in 0..found {
            s.mark_found().unwrap();
        }
        run_out(s, token)
    }

    // ── Selection gating ──

    #[test]
    fn start_requires_complete_selection() {
        let dir = TempDir::new().unwrap();
        let mut s = session(&dir, Difficulty::Medium);
        assert!(!s.can_start());
        assert_eq!(s.start_round(), Err(SessionError::IncompleteSelection));

        s.open_character_select().unwrap();
        s.choose_character(CharacterId(1)).unwrap();
        s.open_role_select().unwrap();
        s.choose_role(Role::Seeker).unwrap();
        let before = s.state().clone();
        assert_eq!(s.start_round(), Err(SessionError::IncompleteSelection));
        assert_eq!(s.state(), &before);
    }

    #[test]
    fn selection_screens_return_to_menu() {
        let dir = TempDir::new().unwrap();
        let mut s = session(&dir, Difficulty::Medium);
        s.open_arena_select().unwrap();
        assert_eq!(s.screen(), Screen::SelectingArena);
        s.choose_arena(ArenaId(2)).unwrap();
        assert_eq!(s.screen(), Screen::Menu);
        assert_eq!(s.selection().arena().map(|a| a.name), Some("Fun Park"));

        s.open_role_select().unwrap();
        s.back().unwrap();
        assert_eq!(s.screen(), Screen::Menu);
        assert_eq!(s.selection().role(), None);
    }

    #[test]
    fn unknown_ids_are_rejected() {
        let dir = TempDir::new().unwrap();
        let mut s = session(&dir, Difficulty::Medium);
        s.open_character_select().unwrap();
        assert_eq!(s.choose_character(CharacterId(42)), Err(SessionError::UnknownCharacter(42)));
        assert_eq!(s.screen(), Screen::SelectingCharacter);
        s.back().unwrap();
        s.open_arena_select().unwrap();
        assert_eq!(s.choose_arena(ArenaId(0)), Err(SessionError::UnknownArena(0)));
    }

    #[test]
    fn choosing_outside_its_screen_is_invalid() {
        let dir = TempDir::new().unwrap();
        let mut s = session(&dir, Difficulty::Medium);
        assert!(matches!(
            s.choose_role(Role::Hider),
            Err(SessionError::InvalidTransition { screen: Screen::Menu, .. })
        ));
        assert!(matches!(s.back(), Err(SessionError::InvalidTransition { .. })));
    }

    // ── Starting ──

    #[test]
    fn start_sets_timer_from_difficulty() {
        for d in Difficulty::ALL {
            let dir = TempDir::new().unwrap();
            let mut s = session(&dir, d);
            select(&mut s, 1, 1, Role::Hider);
            let events = s.start_round().unwrap();
            assert_eq!(s.screen(), Screen::InRound);
            assert_eq!(s.timer().remaining(), d.duration_secs());
            assert!(s.timer().is_running());
            assert_eq!(s.round().found_count(), 0);
            assert!(events.contains(&SessionEvent::Sound(SoundCue::Click)));
        }
    }

    #[test]
    fn second_start_during_round_is_rejected() {
        let dir = TempDir::new().unwrap();
        let mut s = session(&dir, Difficulty::Hard);
        select(&mut s, 2, 3, Role::Seeker);
        let token = started_token(&s.start_round().unwrap());
        s.on_tick(token);
        let before = s.state().clone();
        assert!(matches!(
            s.start_round(),
            Err(SessionError::InvalidTransition { screen: Screen::InRound, .. })
        ));
        assert_eq!(s.state(), &before);
        assert_eq!(s.on_tick(token), vec![SessionEvent::TimerTick { remaining: 43 }]);
    }

    // ── Round play ──

    #[test]
    fn found_only_counts_for_seeker_in_round() {
        let dir = TempDir::new().unwrap();
        let mut s = session(&dir, Difficulty::Medium);
        select(&mut s, 1, 1, Role::Hider);
        assert!(matches!(s.mark_found(), Err(SessionError::InvalidTransition { .. })));
        s.start_round().unwrap();
        assert_eq!(
            s.mark_found(),
            Err(SessionError::WrongRole { action: "mark a player found", required: Role::Seeker })
        );
        s.hide(HidingSpot::House).unwrap();
        assert_eq!(s.round().hiding_spot(), Some(HidingSpot::House));
        assert_eq!(s.round().found_count(), 0);
    }

    #[test]
    fn seeker_cannot_hide() {
        let dir = TempDir::new().unwrap();
        let mut s = session(&dir, Difficulty::Medium);
        select(&mut s, 1, 1, Role::Seeker);
        s.start_round().unwrap();
        assert!(matches!(s.hide(HidingSpot::Tree), Err(SessionError::WrongRole { .. })));
        assert_eq!(s.mark_found().unwrap(), vec![SessionEvent::Sound(SoundCue::Found)]);
    }

    #[test]
    fn hider_easy_round_scores_duration() {
        let dir = TempDir::new().unwrap();
        let mut s = session(&dir, Difficulty::Easy);
        select(&mut s, 3, 2, Role::Hider);
        let events = play_round(&mut s, 0);

        assert_eq!(s.screen(), Screen::RoundEnded);
        assert_eq!(s.timer().remaining(), 0);
        assert_eq!(s.progression().score(), 90);
        assert_eq!(s.progression().level(), 2);
        let result = s.last_result().unwrap();
        assert!(result.passed);
        assert_eq!(result.score_delta, 90);
        assert!(events.contains(&SessionEvent::Sound(SoundCue::Win)));
        assert!(events.iter().any(|e| matches!(e, SessionEvent::Notice(n) if n.key == NoticeKey::Survived)));
    }

    #[test]
    fn seeker_medium_level_two_example() {
        let dir = TempDir::new().unwrap();
        let mut s = session(&dir, Difficulty::Medium);
        select(&mut s, 4, 1, Role::Seeker);
        // Level 1 needs 4; finding none still advances to level 2.
        play_round(&mut s, 0);
        assert_eq!((s.progression().score(), s.progression().level()), (0, 2));
        assert_eq!(s.required_targets(), 5);

        play_round(&mut s, 5);
        let result = s.last_result().unwrap();
        assert!(result.passed);
        assert_eq!(result.score_delta, 100);
        assert_eq!((s.progression().score(), s.progression().level()), (100, 3));
    }

    #[test]
    fn failed_seeker_round_still_levels_up_without_win_sound() {
        let dir = TempDir::new().unwrap();
        let mut s = session(&dir, Difficulty::Hard);
        select(&mut s, 1, 1, Role::Seeker);
        let events = play_round(&mut s, 3);
        let result = s.last_result().unwrap();
        assert!(!result.passed);
        assert_eq!(result.score_delta, 0);
        assert_eq!(s.progression().level(), 2);
        assert!(!events.contains(&SessionEvent::Sound(SoundCue::Win)));
    }

    #[test]
    fn expiry_is_reported_once() {
        let dir = TempDir::new().unwrap();
        let mut s = session(&dir, Difficulty::Hard);
        select(&mut s, 1, 1, Role::Hider);
        let token = started_token(&s.start_round().unwrap());
        let ended: usize = (0..100)
            .map(|_| s.on_tick(token))
            .filter(|evs| evs.iter().any(|e| matches!(e, SessionEvent::RoundEnded(_))))
            .count();
        assert_eq!(ended, 1);
        assert_eq!(s.progression().level(), 2);
    }

    // ── Cancellation ──

    #[test]
    fn abandoned_round_ignores_late_ticks() {
        let dir = TempDir::new().unwrap();
        let mut s = session(&dir, Difficulty::Medium);
        select(&mut s, 1, 1, Role::Seeker);
        let token = started_token(&s.start_round().unwrap());
        s.mark_found().unwrap();
        let events = s.abandon_round().unwrap();
        assert!(events.contains(&SessionEvent::TimerCancelled));
        assert_eq!(s.screen(), Screen::Menu);
        assert_eq!(s.round().found_count(), 0);

        for _ in 0..100 {
            assert!(s.on_tick(token).is_empty());
        }
        assert_eq!(s.progression().level(), 1);
        assert!(s.selection().is_ready_to_start());
    }

    #[test]
    fn old_round_token_cannot_touch_new_round() {
        let dir = TempDir::new().unwrap();
        let mut s = session(&dir, Difficulty::Medium);
        select(&mut s, 1, 1, Role::Hider);
        let old = started_token(&s.start_round().unwrap());
        s.abandon_round().unwrap();
        let new = started_token(&s.start_round().unwrap());
        assert_ne!(old, new);
        assert!(s.on_tick(old).is_empty());
        assert_eq!(s.timer().remaining(), 60);
        assert_eq!(s.on_tick(new), vec![SessionEvent::TimerTick { remaining: 59 }]);
    }

    // ── Round end paths ──

    #[test]
    fn return_to_menu_records_snapshot() {
        let dir = TempDir::new().unwrap();
        let mut s = session(&dir, Difficulty::Easy);
        select(&mut s, 5, 3, Role::Hider);
        play_round(&mut s, 0);
        let events = s.return_to_menu(today()).unwrap();
        assert!(events.contains(&SessionEvent::LeaderboardRecorded { rank: Some(0) }));
        assert_eq!(s.screen(), Screen::Menu);

        let table = s.leaderboard().table();
        assert_eq!(table.len(), 1);
        let e = &table.entries()[0];
        assert_eq!(e.display_name, "Panda");
        assert_eq!((e.score, e.level), (90, 2));
        assert_eq!(e.date_label, "2026-10-16");

        // Selection and progression carry over.
        assert!(s.selection().is_ready_to_start());
        assert_eq!(s.progression().level(), 2);
        assert_eq!(s.round().found_count(), 0);

        // And the file has it.
        let reopened = LeaderboardStore::open(dir.path().join(LEADERBOARD_FILE));
        assert_eq!(reopened.table(), table);
    }

    /// A session whose leaderboard file path is occupied by a directory.
    fn unwritable_session(dir: &TempDir, difficulty: Difficulty) -> Session {
        std::fs::create_dir(dir.path().join(LEADERBOARD_FILE)).unwrap();
        session(dir, difficulty)
    }

    fn has_notice(events: &[SessionEvent], key: NoticeKey) -> bool {
        events.iter().any(|e| matches!(e, SessionEvent::Notice(n) if n.key == key))
    }

    #[test]
    fn failed_save_still_returns_to_menu() {
        let dir = TempDir::new().unwrap();
        let mut s = unwritable_session(&dir, Difficulty::Hard);
        select(&mut s, 1, 1, Role::Hider);
        play_round(&mut s, 0);
        let events = s.return_to_menu(today()).unwrap();
        assert_eq!(
            events,
            vec![
                SessionEvent::Sound(SoundCue::Click),
                SessionEvent::Notice(Notice::bare(NoticeKey::SaveFailed)),
            ]
        );
        assert_eq!(s.screen(), Screen::Menu);
        assert_eq!(s.leaderboard().table().len(), 1);
        assert_eq!(s.leaderboard().table().entries()[0].score, 45);
        assert!(!dir.path().join("leaderboard.json.tmp").exists());
    }

    #[test]
    fn failed_clear_still_resets_progress() {
        let dir = TempDir::new().unwrap();
        let mut s = unwritable_session(&dir, Difficulty::Hard);
        select(&mut s, 1, 1, Role::Hider);
        play_round(&mut s, 0);
        s.return_to_menu(today()).unwrap();
        assert_eq!(s.progression().score(), 45);

        let events = s.reset_progress().unwrap();
        assert!(has_notice(&events, NoticeKey::SaveFailed));
        assert!(!has_notice(&events, NoticeKey::ProgressReset));
        assert_eq!(s.screen(), Screen::Menu);
        assert_eq!((s.progression().score(), s.progression().level()), (0, 1));
        assert!(s.leaderboard().table().is_empty());
        assert!(!dir.path().join("leaderboard.json.tmp").exists());
    }

    #[test]
    fn play_again_skips_leaderboard() {
        let dir = TempDir::new().unwrap();
        let mut s = session(&dir, Difficulty::Hard);
        select(&mut s, 6, 2, Role::Hider);
        play_round(&mut s, 0);
        let events = s.play_again().unwrap();
        assert!(events.iter().any(|e| matches!(e, SessionEvent::TimerStarted(_))));
        assert_eq!(s.screen(), Screen::InRound);
        assert_eq!(s.timer().remaining(), 45);
        assert!(s.last_result().is_none());
        assert!(s.leaderboard().table().is_empty());
    }

    #[test]
    fn round_end_actions_need_round_ended() {
        let dir = TempDir::new().unwrap();
        let mut s = session(&dir, Difficulty::Hard);
        assert!(matches!(s.play_again(), Err(SessionError::InvalidTransition { .. })));
        assert!(matches!(s.return_to_menu(today()), Err(SessionError::InvalidTransition { .. })));
    }

    #[test]
    fn leaderboard_keeps_top_ten_across_rounds() {
        let dir = TempDir::new().unwrap();
        let mut s = session(&dir, Difficulty::Hard);
        select(&mut s, 1, 1, Role::Hider);
        for _ in 0..12 {
            play_round(&mut s, 0);
            s.return_to_menu(today()).unwrap();
        }
        let scores: Vec<u32> = s.leaderboard().table().entries().iter().map(|e| e.score).collect();
        assert_eq!(scores.len(), MAX_ENTRIES);
        assert!(scores.windows(2).all(|w| w[0] >= w[1]));
        assert_eq!(scores[0], s.progression().score());
    }

    // ── Settings / reset ──

    #[test]
    fn difficulty_only_changes_in_settings_and_persists() {
        let dir = TempDir::new().unwrap();
        let mut s = session(&dir, Difficulty::Medium);
        assert!(s.set_difficulty(Difficulty::Easy).is_err());
        s.open_settings().unwrap();
        s.set_difficulty(Difficulty::Hard).unwrap();
        assert!(s.set_difficulty(Difficulty::Hard).unwrap().is_empty());
        s.back().unwrap();

        select(&mut s, 1, 1, Role::Hider);
        play_round(&mut s, 0);
        s.play_again().unwrap();
        assert_eq!(s.timer().remaining(), 45);
    }

    #[test]
    fn reset_progress_clears_everything() {
        let dir = TempDir::new().unwrap();
        let mut s = session(&dir, Difficulty::Easy);
        select(&mut s, 2, 2, Role::Hider);
        play_round(&mut s, 0);
        s.return_to_menu(today()).unwrap();
        assert_eq!(s.leaderboard().table().len(), 1);

        s.open_settings().unwrap();
        let events = s.reset_progress().unwrap();
        assert!(has_notice(&events, NoticeKey::ProgressReset));
        assert_eq!((s.progression().score(), s.progression().level()), (0, 1));
        assert!(s.leaderboard().table().is_empty());
        assert!(LeaderboardStore::open(dir.path().join(LEADERBOARD_FILE)).table().is_empty());
        // Selection survives a progress reset.
        assert!(s.selection().is_ready_to_start());
    }

    #[test]
    fn reset_is_refused_mid_round() {
        let dir = TempDir::new().unwrap();
        let mut s = session(&dir, Difficulty::Easy);
        select(&mut s, 2, 2, Role::Hider);
        s.start_round().unwrap();
        assert!(matches!(s.reset_progress(), Err(SessionError::InvalidTransition { .. })));
    }

    #[test]
    fn state_is_serializable() {
        let dir = TempDir::new().unwrap();
        let mut s = session(&dir, Difficulty::Medium);
        select(&mut s, 1, 2, Role::Seeker);
        s.start_round().unwrap();
        s.mark_found().unwrap();
        let json = serde_json::to_string(s.state()).unwrap();
        let back: SessionState = serde_json::from_str(&json).unwrap();
        assert_eq!(&back, s.state());
    }
}
