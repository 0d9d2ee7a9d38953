/// Static catalogs: the characters a player can be and the arenas a round
/// can be played in.
///
/// Both lists are compiled in and never mutated. Adding an entry is a data
/// change only; nothing else in the crate enumerates them by hand.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CharacterId(pub u32);

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArenaId(pub u32);

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Character {
    pub id: CharacterId,
    pub name: &'static str,
    pub emoji: char,
    /// Card color used by the renderer.
    pub color_tag: ColorTag,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ColorTag {
    Pink,
    Yellow,
    Purple,
    Orange,
    Green,
    Blue,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Arena {
    pub id: ArenaId,
    pub name: &'static str,
    pub emoji: char,
    pub description: &'static str,
}

pub static CHARACTERS: [Character; 6] = [
    Character { id: CharacterId(1), name: "Kitty",  emoji: '🐱', color_tag: ColorTag::Pink },
    Character { id: CharacterId(2), name: "Puppy",  emoji: '🐶', color_tag: ColorTag::Yellow },
    Character { id: CharacterId(3), name: "Bunny",  emoji: '🐰', color_tag: ColorTag::Purple },
    Character { id: CharacterId(4), name: "Foxy",   emoji: '🦊', color_tag: ColorTag::Orange },
    Character { id: CharacterId(5), name: "Panda",  emoji: '🐼', color_tag: ColorTag::Green },
    Character { id: CharacterId(6), name: "Hammy",  emoji: '🐹', color_tag: ColorTag::Blue },
];

pub static ARENAS: [Arena; 3] = [
    Arena {
        id: ArenaId(1),
        name: "Kindergarten",
        emoji: '🏫',
        description: "Lots of rooms and hiding places!",
    },
    Arena {
        id: ArenaId(2),
        name: "Fun Park",
        emoji: '🎡',
        description: "Carousels and rides!",
    },
    Arena {
        id: ArenaId(3),
        name: "Enchanted Forest",
        emoji: '🌳',
        description: "Trees and bushes!",
    },
];

pub fn character(id: CharacterId) -> Option<&'static Character> {
    CHARACTERS.iter().find(|c| c.id == id)
}

pub fn arena(id: ArenaId) -> Option<&'static Arena> {
    ARENAS.iter().find(|a| a.id == id)
}
