/// Pure game data and rules: catalogs, roles, selection, scoring.

pub mod catalog;
pub mod notice;
pub mod progression;
pub mod role;
pub mod rules;
pub mod selection;
