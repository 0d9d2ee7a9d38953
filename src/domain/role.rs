/// Player roles and the Hider's hiding spots.
/// Role semantics (win condition, labels) are centralized here.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Wins by finding enough hidden players before time runs out.
    Seeker,
    /// Wins by surviving until the timer expires.
    Hider,
}

impl Role {
    pub const ALL: [Role; 2] = [Role::Seeker, Role::Hider];

    pub fn label(self) -> &'static str {
        match self {
            Role::Seeker => "Labubu Seeker",
            Role::Hider  => "Hider",
        }
    }

    pub fn emoji(self) -> char {
        match self {
            Role::Seeker => '😈',
            Role::Hider  => '😰',
        }
    }

    pub fn goal(self) -> &'static str {
        match self {
            Role::Seeker => "You are Labubu! Find everyone!",
            Role::Hider  => "Hide from Labubu!",
        }
    }
}

/// Where a Hider is currently tucked away. Purely cosmetic.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HidingSpot {
    Tree,
    Bushes,
    House,
}

impl HidingSpot {
    pub const ALL: [HidingSpot; 3] = [HidingSpot::Tree, HidingSpot::Bushes, HidingSpot::House];

    pub fn label(self) -> &'static str {
        match self {
            HidingSpot::Tree   => "Behind the tree",
            HidingSpot::Bushes => "In the bushes",
            HidingSpot::House  => "In the little house",
        }
    }

    pub fn emoji(self) -> char {
        match self {
            HidingSpot::Tree   => '🌳',
            HidingSpot::Bushes => '🌿',
            HidingSpot::House  => '🏠',
        }
    }
}
