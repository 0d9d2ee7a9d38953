/// Events emitted by session actions and timer ticks.
/// The host consumes these for sound, the message bar and tick scheduling.

use crate::domain::notice::Notice;
use crate::domain::rules::RoundResult;
use crate::sim::timer::TimerToken;

/// Fire-and-forget sound triggers.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SoundCue {
    Click,
    Win,
    Found,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum SessionEvent {
    Sound(SoundCue),
    Notice(Notice),
    /// A countdown began; the host should schedule ticks for this token.
    TimerStarted(TimerToken),
    TimerTick { remaining: u32 },
    /// The live countdown was abandoned; drop its schedule.
    TimerCancelled,
    RoundEnded(RoundResult),
    /// Leaderboard snapshot written. `rank` is 0-based, `None` if it did not place.
    LeaderboardRecorded { rank: Option<usize> },
}
