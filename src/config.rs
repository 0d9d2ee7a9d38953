/// External configuration loader.
///
/// Reads `config.toml` from the executable's directory, the CWD or the
/// hideseek data directories. Falls back to defaults if the file is missing,
/// incomplete or unparsable.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

use crate::domain::rules::Difficulty;
use crate::sim::leaderboard::LEADERBOARD_FILE;

pub const CONFIG_FILE: &str = "config.toml";

// ── Public Config Struct ──

#[derive(Clone, Debug)]
pub struct GameConfig {
    pub round: RoundConfig,
    pub player: PlayerConfig,
    pub gamepad: GamepadConfig,
    /// Relative names are joined onto the data directory by the caller.
    pub leaderboard_file: PathBuf,
}

#[derive(Clone, Debug)]
pub struct RoundConfig {
    pub difficulty: Difficulty,
    pub tick: Duration,
}

#[derive(Clone, Debug)]
pub struct PlayerConfig {
    /// Leaderboard name when no character is picked.
    pub default_name: String,
}

#[derive(Clone, Debug)]
pub struct GamepadConfig {
    pub confirm: Vec<String>,
    pub cancel: Vec<String>,
    pub found: Vec<String>,
    pub reset: Vec<String>,
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    round: TomlRound,
    #[serde(default)]
    player: TomlPlayer,
    #[serde(default)]
    gamepad: TomlGamepad,
    #[serde(default)]
    general: TomlGeneral,
}

#[derive(Deserialize, Debug)]
struct TomlRound {
    #[serde(default = "default_difficulty")]
    difficulty: String,
    #[serde(default = "default_tick_ms")]
    tick_ms: u64,
}

#[derive(Deserialize, Debug)]
struct TomlPlayer {
    #[serde(default = "default_name")]
    default_name: String,
}

#[derive(Deserialize, Debug)]
struct TomlGamepad {
    #[serde(default = "default_confirm")]
    confirm: Vec<String>,
    #[serde(default = "default_cancel")]
    cancel: Vec<String>,
    #[serde(default = "default_found")]
    found: Vec<String>,
    #[serde(default = "default_reset")]
    reset: Vec<String>,
}

#[derive(Deserialize, Debug)]
struct TomlGeneral {
    #[serde(default = "default_leaderboard_file")]
    leaderboard_file: String,
}

// ── Defaults ──

fn default_difficulty() -> String { "medium".into() }
fn default_tick_ms() -> u64 { 1000 }
fn default_name() -> String { "Player".into() }

fn default_confirm() -> Vec<String> { vec!["A".into(), "Start".into()] }
fn default_cancel() -> Vec<String> { vec!["B".into(), "Select".into()] }
fn default_found() -> Vec<String> { vec!["X".into(), "R1".into()] }
fn default_reset() -> Vec<String> { vec!["Y".into()] }
fn default_leaderboard_file() -> String { LEADERBOARD_FILE.into() }

impl Default for TomlRound {
    fn default() -> Self {
        TomlRound {
            difficulty: default_difficulty(),
            tick_ms: default_tick_ms(),
        }
    }
}

impl Default for TomlPlayer {
    fn default() -> Self {
        TomlPlayer { default_name: default_name() }
    }
}

impl Default for TomlGamepad {
    fn default() -> Self {
        TomlGamepad {
            confirm: default_confirm(),
            cancel: default_cancel(),
            found: default_found(),
            reset: default_reset(),
        }
    }
}

impl Default for TomlGeneral {
    fn default() -> Self {
        TomlGeneral { leaderboard_file: default_leaderboard_file() }
    }
}

// ── Loading ──

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig::from_toml(TomlConfig::default())
    }
}

impl GameConfig {
    /// Load config from `config.toml`.
    /// Search order: exe directory, CWD, `~/.local/share/hideseek`,
    /// `/usr/share/hideseek`. The first file found wins.
    pub fn load() -> Self {
        match read_config(&candidate_dirs()) {
            Some(text) => GameConfig::from_toml_str(&text),
            None => GameConfig::default(),
        }
    }

    /// Parse a config document. Errors fall back to defaults with a warning.
    pub fn from_toml_str(text: &str) -> Self {
        match toml::from_str::<TomlConfig>(text) {
            Ok(cfg) => GameConfig::from_toml(cfg),
            Err(e) => {
                warn!(error = %e, "config.toml parse error, using defaults");
                GameConfig::default()
            }
        }
    }

    fn from_toml(cfg: TomlConfig) -> Self {
        let difficulty = Difficulty::from_name(&cfg.round.difficulty).unwrap_or_else(|| {
            warn!(value = %cfg.round.difficulty, "unknown difficulty, using medium");
            Difficulty::default()
        });
        // A zero period would fire every frame.
        let tick_ms = cfg.round.tick_ms.max(1);

        let default_name = match cfg.player.default_name.trim() {
            "" => default_name(),
            name => name.to_string(),
        };

        GameConfig {
            round: RoundConfig {
                difficulty,
                tick: Duration::from_millis(tick_ms),
            },
            player: PlayerConfig { default_name },
            gamepad: GamepadConfig {
                confirm: cfg.gamepad.confirm,
                cancel: cfg.gamepad.cancel,
                found: cfg.gamepad.found,
                reset: cfg.gamepad.reset,
            },
            leaderboard_file: PathBuf::from(cfg.general.leaderboard_file),
        }
    }

    /// Resolve the leaderboard file against the data directory.
    pub fn leaderboard_path(&self, data_dir: &Path) -> PathBuf {
        if self.leaderboard_file.is_absolute() {
            self.leaderboard_file.clone()
        } else {
            data_dir.join(&self.leaderboard_file)
        }
    }
}

/// Candidate directories to search: exe dir + CWD + data paths (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    // 1. Directory of the running executable
    if let Ok(exe) = std::env::current_exe() {
        // Resolve symlinks so a linked binary still finds its config.
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    // 2. Current working directory
    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.iter().any(|d| d == &cwd) {
            dirs.push(cwd);
        }
    }

    // 3. XDG data home
    if let Ok(home) = std::env::var("HOME") {
        let xdg = PathBuf::from(&home).join(".local/share/hideseek");
        if xdg.is_dir() && !dirs.iter().any(|d| d == &xdg) {
            dirs.push(xdg);
        }
    }

    // 4. System data directory
    let sys = PathBuf::from("/usr/share/hideseek");
    if sys.is_dir() && !dirs.iter().any(|d| d == &sys) {
        dirs.push(sys);
    }

    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }

    dirs
}

/// Text of the first readable `config.toml` in `search_dirs`.
fn read_config(search_dirs: &[PathBuf]) -> Option<String> {
    for dir in search_dirs {
        let path = dir.join(CONFIG_FILE);
        if !path.exists() {
            continue;
        }
        match std::fs::read_to_string(&path) {
            Ok(text) => {
                info!(path = %path.display(), "config loaded");
                return Some(text);
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "could not read config");
            }
        }
    }
    None
}
