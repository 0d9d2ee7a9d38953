/// Notices: the one-way "show message" payloads the core hands to whatever
/// displays them. The core only produces key + values, never final text
/// beyond the default English rendering in `text()`.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeKey {
    LevelCleared,
    TryAgain,
    Survived,
    ProgressReset,
    SaveFailed,
}

impl NoticeKey {
    pub fn as_str(self) -> &'static str {
        match self {
            NoticeKey::LevelCleared  => "level_cleared",
            NoticeKey::TryAgain      => "try_again",
            NoticeKey::Survived      => "survived",
            NoticeKey::ProgressReset => "progress_reset",
            NoticeKey::SaveFailed    => "save_failed",
        }
    }
}

/// A value carried alongside a notice key.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Detail {
    Found(u32),
    Required(u32),
    ScoreDelta(u32),
    Level(u32),
    Seconds(u32),
}

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Notice {
    pub key: NoticeKey,
    pub details: Vec<Detail>,
}

impl Notice {
    pub fn new(key: NoticeKey, details: Vec<Detail>) -> Self {
        Notice { key, details }
    }

    pub fn bare(key: NoticeKey) -> Self {
        Notice { key, details: vec![] }
    }

    fn value(&self, pick: fn(&Detail) -> Option<u32>) -> u32 {
        self.details.iter().find_map(pick).unwrap_or(0)
    }

    /// Default English rendering for the terminal message bar.
    pub fn text(&self) -> String {
        let found = self.value(|d| if let Detail::Found(v) = d { Some(*v) } else { None });
        let required = self.value(|d| if let Detail::Required(v) = d { Some(*v) } else { None });
        let delta = self.value(|d| if let Detail::ScoreDelta(v) = d { Some(*v) } else { None });
        let level = self.value(|d| if let Detail::Level(v) = d { Some(*v) } else { None });
        let secs = self.value(|d| if let Detail::Seconds(v) = d { Some(*v) } else { None });

        match self.key {
            NoticeKey::LevelCleared => format!(
                "Level {} cleared! Found {}/{}  +{} points", level, found, required, delta,
            ),
            NoticeKey::TryAgain => format!(
                "Try again! Found {} of {} needed on level {}", found, required, level,
            ),
            NoticeKey::Survived => format!(
                "You survived {}s on level {}!  +{} points", secs, level, delta,
            ),
            NoticeKey::ProgressReset => "Progress and leaderboard reset".to_string(),
            NoticeKey::SaveFailed => "Could not save the leaderboard!".to_string(),
        }
    }
}
