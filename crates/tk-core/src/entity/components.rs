//! Optional capabilities an entity may carry

use serde::{Deserialize, Serialize};
use strum::Display;

use crate::dungeon::MapId;
use crate::geometry::Point;

/// What happens when a fighter drops to zero hit points.
///
/// Dispatched by the turn-resolution layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeathBehavior {
    /// Game over
    Player,
    /// Leaves a corpse behind (see [`super::monster_death`])
    Monster,
}

/// Combat-related properties (monster, player, NPC)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fighter {
    pub hp: i32,
    pub base_max_hp: i32,
    pub base_defense: i32,
    pub base_power: i32,
    /// Experience carried (player) or awarded on death (monster)
    pub xp: i32,
    pub death: DeathBehavior,
}

impl Fighter {
    pub fn new(hp: i32, defense: i32, power: i32, xp: i32, death: DeathBehavior) -> Self {
        Self {
            hp,
            base_max_hp: hp,
            base_defense: defense,
            base_power: power,
            xp,
            death,
        }
    }

    /// Heal by `amount`, without going over the maximum.
    ///
    /// Equipment bonuses live with the inventory layer, so the cap here is
    /// the base maximum.
    pub fn heal(&mut self, amount: i32) {
        self.hp = (self.hp + amount).min(self.base_max_hp);
    }

    pub fn is_dead(&self) -> bool {
        self.hp <= 0
    }
}

/// Monster behavior selector
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Ai {
    /// Approach and attack the player when in view
    Basic,
    /// Stumble around randomly, then restore `previous`
    Confused { previous: Box<Ai>, turns_left: u32 },
}

/// Effect applied when an item is used
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum ItemEffect {
    Heal,
    Lightning,
    Fireball,
    Confuse,
}

/// Something that can be picked up
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub count: u32,
    pub effect: Option<ItemEffect>,
    pub description: String,
}

impl Item {
    pub fn new(effect: Option<ItemEffect>, description: impl Into<String>) -> Self {
        Self {
            count: 1,
            effect,
            description: description.into(),
        }
    }
}

/// Where a piece of equipment is worn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum Slot {
    #[strum(serialize = "right hand")]
    RightHand,
    #[strum(serialize = "left hand")]
    LeftHand,
}

/// Wearable bonuses; an entity with equipment always has an [`Item`] too
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Equipment {
    pub slot: Slot,
    pub power_bonus: i32,
    pub defense_bonus: i32,
    pub max_hp_bonus: i32,
    pub is_equipped: bool,
}

impl Equipment {
    pub fn new(slot: Slot) -> Self {
        Self {
            slot,
            power_bonus: 0,
            defense_bonus: 0,
            max_hp_bonus: 0,
            is_equipped: false,
        }
    }
}

/// Which way a staircase leads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum PortalKind {
    Down,
    Up,
}

/// Map-to-map transition, bound lazily on first use
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Portal {
    pub kind: PortalKind,
    pub destination: Option<MapId>,
    pub destination_position: Option<Point>,
}

impl Portal {
    /// A portal whose destination has not been generated yet
    pub const fn unbound(kind: PortalKind) -> Self {
        Self {
            kind,
            destination: None,
            destination_position: None,
        }
    }

    /// A portal leading to a known map position
    pub const fn bound(kind: PortalKind, destination: MapId, position: Point) -> Self {
        Self {
            kind,
            destination: Some(destination),
            destination_position: Some(position),
        }
    }

    pub const fn is_bound(&self) -> bool {
        self.destination.is_some()
    }
}
