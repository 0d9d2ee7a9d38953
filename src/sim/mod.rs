/// Session state machine, countdown timer and leaderboard persistence.

pub mod event;
pub mod leaderboard;
pub mod session;
pub mod timer;
