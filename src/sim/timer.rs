/// Round countdown and the host-side tick schedule.
///
/// ## Phases
///   Idle ──start──▶ Running ──tick to 0──▶ Expired
///     ▲                │                      │
///     └─────cancel─────┴──────────────────────┘
///
/// Every `start` and `cancel` bumps the generation. A tick carries the token
/// it was scheduled with; ticks from any other generation are stale and do
/// nothing. This is what keeps a superseded round's schedule from ever
/// touching the next round.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, trace};

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
pub enum TimerPhase {
    #[default]
    Idle,
    Running,
    Expired,
}

/// Identifies one countdown. Only the most recent token is live.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct TimerToken(u64);

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Tick {
    /// Token outdated or timer not running. Nothing changed.
    Stale,
    Running { remaining: u32 },
    /// Reached zero on this tick. Emitted once per countdown.
    Expired,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TimerError {
    #[error("timer is already running")]
    AlreadyRunning,
    #[error("round duration must be at least one second")]
    ZeroDuration,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundTimer {
    phase: TimerPhase,
    remaining: u32,
    duration: u32,
    generation: u64,
}

impl RoundTimer {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn phase(&self) -> TimerPhase {
        self.phase
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn duration(&self) -> u32 {
        self.duration
    }

    #[cfg(test)]
    pub fn is_running(&self) -> bool {
        self.phase == TimerPhase::Running
    }

    /// Begin a countdown. Rejected while another countdown is live.
    pub fn start(&mut self, duration_secs: u32) -> Result<TimerToken, TimerError> {
        if self.phase == TimerPhase::Running {
            return Err(TimerError::AlreadyRunning);
        }
        if duration_secs == 0 {
            return Err(TimerError::ZeroDuration);
        }
        self.generation = self.generation.wrapping_add(1);
        self.phase = TimerPhase::Running;
        self.remaining = duration_secs;
        self.duration = duration_secs;
        debug!(generation = self.generation, duration_secs, "timer started");
        Ok(TimerToken(self.generation))
    }

    pub fn tick(&mut self, token: TimerToken) -> Tick {
        if token.0 != self.generation || self.phase != TimerPhase::Running {
            trace!(token = token.0, generation = self.generation, "stale tick ignored");
            return Tick::Stale;
        }
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            self.phase = TimerPhase::Expired;
            debug!(generation = self.generation, "timer expired");
            Tick::Expired
        } else {
            Tick::Running { remaining: self.remaining }
        }
    }

    /// Stop and invalidate the current token. Returns true if a countdown was live.
    pub fn cancel(&mut self) -> bool {
        let was_running = self.phase == TimerPhase::Running;
        self.generation = self.generation.wrapping_add(1);
        self.phase = TimerPhase::Idle;
        self.remaining = 0;
        if was_running {
            debug!(generation = self.generation, "timer cancelled");
        }
        was_running
    }
}

// ── Host-side schedule ──

/// A cancellable periodic task for one countdown.
///
/// The host loop owns at most one of these and polls it every frame.
/// Dropping it is cancellation from the host's side; the token check in
/// `RoundTimer::tick` covers anything that slips through.
#[derive(Clone, Debug)]
pub struct TickSchedule {
    token: TimerToken,
    period: Duration,
    next_due: Instant,
}

impl TickSchedule {
    pub fn new(token: TimerToken, period: Duration, now: Instant) -> Self {
        TickSchedule { token, period, next_due: now + period }
    }

    /// Returns the token once per elapsed period. Falling behind yields at
    /// most one tick per poll so the countdown never jumps.
    pub fn poll(&mut self, now: Instant) -> Option<TimerToken> {
        if now < self.next_due {
            return None;
        }
        self.next_due += self.period;
        Some(self.token)
    }
}
