//! Terrain kinds and their static movement/sight attributes
//!
//! Each kind carries its own pair of flags; there is no per-cell override.
//! The two kinds in use today both follow "blocks movement implies blocks
//! sight", but the lookup keeps the flags independent.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

/// Terrain type of a single map cell
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumIter,
)]
#[repr(u8)]
pub enum Terrain {
    /// Solid rock; every fresh map starts as wall
    #[default]
    Wall = 0,
    /// Open floor carved out by rooms and tunnels
    Ground = 1,
}

impl Terrain {
    /// Check if this terrain stops movement
    pub const fn blocks_movement(self) -> bool {
        match self {
            Terrain::Wall => true,
            Terrain::Ground => false,
        }
    }

    /// Check if this terrain stops line of sight
    pub const fn blocks_sight(self) -> bool {
        match self {
            Terrain::Wall => true,
            Terrain::Ground => false,
        }
    }

    /// ASCII symbol used by text dumps
    pub const fn symbol(self) -> char {
        match self {
            Terrain::Wall => '#',
            Terrain::Ground => '.',
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_default_is_wall() {
        assert_eq!(Terrain::default(), Terrain::Wall);
    }

    #[test]
    fn test_flags() {
        assert!(Terrain::Wall.blocks_movement());
        assert!(Terrain::Wall.blocks_sight());
        assert!(!Terrain::Ground.blocks_movement());
        assert!(!Terrain::Ground.blocks_sight());
    }

    #[test]
    fn test_blocked_implies_opaque() {
        for terrain in Terrain::iter() {
            if terrain.blocks_movement() {
                assert!(terrain.blocks_sight(), "{terrain} blocks movement but not sight");
            }
        }
    }
}
