//! tk-core: dungeon generation and visibility for Tombs of the Ancient Kings
//!
//! This crate contains all game state with no terminal or file-format
//! dependencies beyond reading a JSON config. A [`Session`] owns the maps,
//! the player and the random streams; everything else is plain data that a
//! presentation layer reads.

pub mod config;
pub mod dungeon;
pub mod entity;
pub mod geometry;
pub mod world;

mod consts;
mod rng;

pub use config::{ConfigError, GenConfig};
pub use consts::*;
pub use rng::{GameRng, LAYOUT_STREAM, OCCUPANT_STREAM};
pub use world::{MessageLog, Session, StairsOutcome};
