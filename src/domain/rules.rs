/// Round rules: difficulty timing, required targets and round evaluation.
///
/// Pure functions, no side effects. Everything the scoring depends on is
/// passed in explicitly so the session can evaluate with the level the round
/// was played at, before progression moves it.
///
/// ## Evaluation Table
/// ┌────────┬──────────────────────┬──────────────────────────────┬──────────────┐
/// │ Role   │ Pass condition        │ Score delta                   │ Notice       │
/// ├────────┼──────────────────────┼──────────────────────────────┼──────────────┤
/// │ Seeker │ found ≥ required      │ found × 10 × level            │ LevelCleared │
/// │ Seeker │ found < required      │ 0                             │ TryAgain     │
/// │ Hider  │ timer reached zero    │ duration(difficulty) × level  │ Survived     │
/// └────────┴──────────────────────┴──────────────────────────────┴──────────────┘
///
/// required = min(3 + level, 10)

use serde::{Deserialize, Serialize};

use super::notice::{Detail, Notice, NoticeKey};
use super::role::Role;

pub const BASE_TARGETS: u32 = 3;
pub const MAX_TARGETS: u32 = 10;
pub const POINTS_PER_FIND: u32 = 10;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    /// Round length in seconds.
    pub fn duration_secs(self) -> u32 {
        match self {
            Difficulty::Easy   => 90,
            Difficulty::Medium => 60,
            Difficulty::Hard   => 45,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Difficulty::Easy   => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard   => "Hard",
        }
    }

    pub fn from_name(s: &str) -> Option<Difficulty> {
        match s.trim().to_lowercase().as_str() {
            "easy"   => Some(Difficulty::Easy),
            "medium" | "normal" => Some(Difficulty::Medium),
            "hard"   => Some(Difficulty::Hard),
            _ => None,
        }
    }

    /// Cycle for the settings screen (wraps around).
    pub fn next(self) -> Difficulty {
        match self {
            Difficulty::Easy   => Difficulty::Medium,
            Difficulty::Medium => Difficulty::Hard,
            Difficulty::Hard   => Difficulty::Easy,
        }
    }

    pub fn prev(self) -> Difficulty {
        match self {
            Difficulty::Easy   => Difficulty::Hard,
            Difficulty::Medium => Difficulty::Easy,
            Difficulty::Hard   => Difficulty::Medium,
        }
    }
}

/// What happened during the round, as reported by the local player.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct RoundOutcome {
    pub found_count: u32,
}

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct RoundResult {
    pub role: Role,
    pub passed: bool,
    pub score_delta: u32,
    /// Level the round was played at.
    pub level: u32,
    pub notice: Notice,
}

/// Hidden players a Seeker must find at `level`.
pub fn required_targets(level: u32) -> u32 {
    BASE_TARGETS.saturating_add(level).min(MAX_TARGETS)
}

/// Score a finished round. Called once, at natural timer expiry.
pub fn evaluate(role: Role, outcome: RoundOutcome, level: u32, difficulty: Difficulty) -> RoundResult {
    match role {
        Role::Seeker => {
            let required = required_targets(level);
            let found = outcome.found_count;
            if found >= required {
                let score_delta = found
                    .saturating_mul(POINTS_PER_FIND)
                    .saturating_mul(level);
                RoundResult {
                    role,
                    passed: true,
                    score_delta,
                    level,
                    notice: Notice::new(NoticeKey::LevelCleared, vec![
                        Detail::Found(found),
                        Detail::Required(required),
                        Detail::ScoreDelta(score_delta),
                        Detail::Level(level),
                    ]),
                }
            } else {
                RoundResult {
                    role,
                    passed: false,
                    score_delta: 0,
                    level,
                    notice: Notice::new(NoticeKey::TryAgain, vec![
                        Detail::Found(found),
                        Detail::Required(required),
                        Detail::Level(level),
                    ]),
                }
            }
        }
        Role::Hider => {
            // No elimination mechanic: reaching expiry is survival.
            let secs = difficulty.duration_secs();
            let score_delta = secs.saturating_mul(level);
            RoundResult {
                role,
                passed: true,
                score_delta,
                level,
                notice: Notice::new(NoticeKey::Survived, vec![
                    Detail::Seconds(secs),
                    Detail::ScoreDelta(score_delta),
                    Detail::Level(level),
                ]),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeker(found: u32, level: u32, difficulty: Difficulty) -> RoundResult {
        evaluate(Role::Seeker, RoundOutcome { found_count: found }, level, difficulty)
    }

    // ── required_targets ──

    #[test]
    fn required_targets_grows_then_caps() {
        assert_eq!(required_targets(1), 4);
        assert_eq!(required_targets(2), 5);
        assert_eq!(required_targets(7), 10);
        assert_eq!(required_targets(8), 10);
        assert_eq!(required_targets(u32::MAX), 10);
    }

    #[test]
    fn required_targets_is_monotonic() {
        let mut prev = 0;
        for level in 1..=50 {
            let r = required_targets(level);
            assert!(r >= prev, "level {} dropped from {} to {}", level, prev, r);
            assert!(r <= MAX_TARGETS);
            prev = r;
        }
    }

    // ── Seeker ──

    #[test]
    fn seeker_meeting_target_passes() {
        for level in 1..=9 {
            let required = required_targets(level);
            let r = seeker(required, level, Difficulty::Medium);
            assert!(r.passed);
            assert_eq!(r.score_delta, required * 10 * level);
            assert_eq!(r.notice.key, NoticeKey::LevelCleared);
        }
    }

    #[test]
    fn seeker_one_short_fails_with_zero() {
        for level in 1..=9 {
            let required = required_targets(level);
            let r = seeker(required - 1, level, Difficulty::Medium);
            assert!(!r.passed);
            assert_eq!(r.score_delta, 0);
            assert_eq!(r.notice.key, NoticeKey::TryAgain);
        }
    }

    #[test]
    fn seeker_scores_every_find_above_target() {
        let r = seeker(12, 3, Difficulty::Hard);
        assert!(r.passed);
        assert_eq!(r.score_delta, 12 * 10 * 3);
    }

    #[test]
    fn seeker_medium_level_two_example() {
        let r = seeker(5, 2, Difficulty::Medium);
        assert!(r.passed);
        assert_eq!(r.score_delta, 100);
        assert!(r.notice.details.contains(&Detail::Required(5)));
    }

    #[test]
    fn seeker_score_ignores_difficulty() {
        assert_eq!(
            seeker(6, 3, Difficulty::Easy).score_delta,
            seeker(6, 3, Difficulty::Hard).score_delta,
        );
    }

    // ── Hider ──

    #[test]
    fn hider_always_passes_with_duration_times_level() {
        for d in Difficulty::ALL {
            for level in [1, 2, 5] {
                let r = evaluate(Role::Hider, RoundOutcome::default(), level, d);
                assert!(r.passed);
                assert_eq!(r.score_delta, d.duration_secs() * level);
                assert_eq!(r.notice.key, NoticeKey::Survived);
            }
        }
    }

    #[test]
    fn hider_easy_level_one_example() {
        let r = evaluate(Role::Hider, RoundOutcome::default(), 1, Difficulty::Easy);
        assert_eq!(r.score_delta, 90);
    }

    #[test]
    fn hider_ignores_found_count() {
        let r = evaluate(Role::Hider, RoundOutcome { found_count: 7 }, 1, Difficulty::Hard);
        assert_eq!(r.score_delta, 45);
    }

    // ── Difficulty ──

    #[test]
    fn difficulty_durations() {
        assert_eq!(Difficulty::Easy.duration_secs(), 90);
        assert_eq!(Difficulty::Medium.duration_secs(), 60);
        assert_eq!(Difficulty::Hard.duration_secs(), 45);
    }

    #[test]
    fn difficulty_cycles_both_ways() {
        for d in Difficulty::ALL {
            assert_eq!(d.next().prev(), d);
        }
        assert_eq!(Difficulty::from_name(" HARD "), Some(Difficulty::Hard));
        assert_eq!(Difficulty::from_name("brutal"), None);
    }
}
