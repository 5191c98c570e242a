//! Dungeon system
//!
//! Contains the terrain grid, field of view, spawn tables and the level
//! generator.

mod cartographer;
mod fov;
mod map;
mod tables;
mod terrain;

pub use cartographer::{build_layout, generate_level};
pub use fov::{FovAlgorithm, FovMap, VisibleSet};
pub use map::{Map, MapId, Room};
pub use tables::{Chance, SpawnTables, Step, StepTable, random_choice, random_choice_index};
pub use terrain::Terrain;
