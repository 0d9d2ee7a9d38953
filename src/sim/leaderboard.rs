/// Leaderboard: the top-10 round results, persisted across runs.
///
/// ## File format
///   A single JSON array stored as `leaderboard.json` in the data directory:
///   `[{"displayName":"Kitty","score":190,"level":3,"dateLabel":"2026-10-16"}, ...]`
///   Always sorted by score, highest first, at most `MAX_ENTRIES` long.
///
/// ## Failure policy
///   Reading never fails: a missing or unreadable file is an empty table.
///   Writing replaces the whole file via a temp file + rename, so a reader
///   sees either the old table or the new one.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

pub const MAX_ENTRIES: usize = 10;
pub const LEADERBOARD_FILE: &str = "leaderboard.json";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub display_name: String,
    pub score: u32,
    pub level: u32,
    pub date_label: String,
}

#[derive(Debug, Error)]
pub enum LeaderboardError {
    #[error("could not write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("could not encode leaderboard: {0}")]
    Encode(#[from] serde_json::Error),
}

// ══════════════════════════════════════════════════════════════
// Table
// ══════════════════════════════════════════════════════════════

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LeaderboardTable {
    entries: Vec<LeaderboardEntry>,
}

impl LeaderboardTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[LeaderboardEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Append, re-sort, truncate. Returns the 0-based rank of the new entry,
    /// or `None` if it fell off the end.
    pub fn insert(&mut self, entry: LeaderboardEntry) -> Option<usize> {
        let idx = self.entries.len();
        self.entries.push(entry);
        let mut order: Vec<usize> = (0..self.entries.len()).collect();
        // sort_by is stable: equal scores keep insertion order, so the
        // newcomer lands after every existing entry it ties with.
        order.sort_by(|&a, &b| self.entries[b].score.cmp(&self.entries[a].score));
        let rank = order.iter().position(|&i| i == idx).filter(|&r| r < MAX_ENTRIES);
        self.normalize();
        rank
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    fn normalize(&mut self) {
        self.entries.sort_by(|a, b| b.score.cmp(&a.score));
        self.entries.truncate(MAX_ENTRIES);
    }
}

// ══════════════════════════════════════════════════════════════
// Store
// ══════════════════════════════════════════════════════════════

/// The table plus where it lives on disk.
#[derive(Debug)]
pub struct LeaderboardStore {
    path: PathBuf,
    table: LeaderboardTable,
}

impl LeaderboardStore {
    /// Open the store at `path`, loading whatever is there.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let table = load(&path);
        LeaderboardStore { path, table }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn table(&self) -> &LeaderboardTable {
        &self.table
    }

    /// Insert and persist. The in-memory table is updated even if the write fails.
    pub fn record_entry(&mut self, entry: LeaderboardEntry) -> Result<Option<usize>, LeaderboardError> {
        let score = entry.score;
        let rank = self.table.insert(entry);
        debug!(score, ?rank, "leaderboard entry inserted");
        self.persist()?;
        Ok(rank)
    }

    pub fn clear(&mut self) -> Result<(), LeaderboardError> {
        self.table.clear();
        self.persist()?;
        info!(path = %self.path.display(), "leaderboard cleared");
        Ok(())
    }

    fn persist(&self) -> Result<(), LeaderboardError> {
        let json = serde_json::to_string_pretty(&self.table)?;
        write_atomic(&self.path, json.as_bytes())
    }
}

/// Load a table from disk. Absent or malformed data is an empty table.
pub fn load(path: &Path) -> LeaderboardTable {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "no leaderboard yet");
            return LeaderboardTable::new();
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "leaderboard unreadable, starting empty");
            return LeaderboardTable::new();
        }
    };
    match serde_json::from_str::<LeaderboardTable>(&text) {
        Ok(mut table) => {
            table.normalize();
            info!(entries = table.len(), "leaderboard loaded");
            table
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "leaderboard malformed, starting empty");
            LeaderboardTable::new()
        }
    }
}

fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), LeaderboardError> {
    let io_err = |source| LeaderboardError::Io { path: path.to_path_buf(), source };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);
    fs::write(&tmp, bytes).map_err(io_err)?;
    if let Err(e) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(io_err(e));
    }
    Ok(())
}

// ══════════════════════════════════════════════════════════════
// Paths
// ══════════════════════════════════════════════════════════════

/// Where persistent files go: exe dir if writable, then
/// `~/.local/share/hideseek`, then the current directory.
pub fn data_dir() -> PathBuf {
    if let Ok(exe) = std::env::current_exe() {
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            // System installs (/usr/games/...) are not writable.
            let probe = parent.join(".write_test_hideseek");
            if fs::write(&probe, "").is_ok() {
                let _ = fs::remove_file(&probe);
                return parent.to_path_buf();
            }
        }
    }

    if let Ok(home) = std::env::var("HOME") {
        let xdg = PathBuf::from(&home).join(".local/share/hideseek");
        if fs::create_dir_all(&xdg).is_ok() {
            return xdg;
        }
    }

    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}
