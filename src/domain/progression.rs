/// Cross-round progression: cumulative score and level.
///
/// The level advances on every finished round, pass or fail. Failed Seeker
/// rounds still move the player up ("prestige on attempt").

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progression {
    score: u32,
    level: u32,
}

impl Default for Progression {
    fn default() -> Self {
        Progression { score: 0, level: 1 }
    }
}

impl Progression {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn apply_round_result(&mut self, score_delta: u32) {
        self.score = self.score.saturating_add(score_delta);
        self.level = self.level.saturating_add(1);
    }

    pub fn reset(&mut self) {
        *self = Progression::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_at_level_one() {
        let p = Progression::new();
        assert_eq!((p.score(), p.level()), (0, 1));
    }

    #[test]
    fn level_advances_even_without_points() {
        let mut p = Progression::new();
        p.apply_round_result(0);
        p.apply_round_result(0);
        assert_eq!((p.score(), p.level()), (0, 3));
    }

    #[test]
    fn score_accumulates() {
        let mut p = Progression::new();
        p.apply_round_result(90);
        p.apply_round_result(100);
        assert_eq!((p.score(), p.level()), (190, 3));
    }

    #[test]
    fn reset_returns_to_start() {
        let mut p = Progression::new();
        p.apply_round_result(500);
        p.reset();
        assert_eq!(p, Progression::default());
    }
}
