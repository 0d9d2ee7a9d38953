/// Selection store: the player's character / arena / role choice, plus the
/// per-round state that is thrown away between rounds.
///
/// Each choice is an explicit empty/present slot. `ready()` is the only
/// gate for starting a round and is checked exhaustively.

use serde::{Deserialize, Serialize};

use super::catalog::{self, Arena, ArenaId, Character, CharacterId};
use super::role::{HidingSpot, Role};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSelection {
    character: Option<CharacterId>,
    arena: Option<ArenaId>,
    role: Option<Role>,
}

/// A fully populated selection. Only obtainable through `ready()`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReadySelection {
    pub character: CharacterId,
    pub arena: ArenaId,
    pub role: Role,
}

impl SessionSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_character(&mut self, id: CharacterId) {
        self.character = Some(id);
    }

    pub fn set_arena(&mut self, id: ArenaId) {
        self.arena = Some(id);
    }

    pub fn set_role(&mut self, role: Role) {
        self.role = Some(role);
    }

    pub fn character(&self) -> Option<&'static Character> {
        self.character.and_then(catalog::character)
    }

    pub fn arena(&self) -> Option<&'static Arena> {
        self.arena.and_then(catalog::arena)
    }

    pub fn role(&self) -> Option<Role> {
        self.role
    }

    pub fn ready(&self) -> Option<ReadySelection> {
        match (self.character, self.arena, self.role) {
            (Some(character), Some(arena), Some(role)) => Some(ReadySelection { character, arena, role }),
            (None, _, _) | (_, None, _) | (_, _, None) => None,
        }
    }

    pub fn is_ready_to_start(&self) -> bool {
        self.ready().is_some()
    }
}

// ── Round state ──

/// Per-round mutable state. The countdown itself lives in the timer.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundState {
    found_count: u32,
    hiding_spot: Option<HidingSpot>,
}

impl RoundState {
    pub fn found_count(&self) -> u32 {
        self.found_count
    }

    pub fn hiding_spot(&self) -> Option<HidingSpot> {
        self.hiding_spot
    }

    /// Record one more found player. Returns the new count.
    pub fn record_found(&mut self) -> u32 {
        self.found_count = self.found_count.saturating_add(1);
        self.found_count
    }

    pub fn hide_at(&mut self, spot: HidingSpot) {
        self.hiding_spot = Some(spot);
    }

    /// Reset everything round-scoped. Selection is untouched (it lives elsewhere).
    pub fn clear(&mut self) {
        *self = RoundState::default();
    }
}
