//! Monster, item and fixture definitions

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use super::{
    Ai, DeathBehavior, Entity, EntityId, Equipment, Fighter, Item, ItemEffect, Portal, PortalKind,
    Slot,
};
use crate::dungeon::MapId;
use crate::geometry::Point;

/// Hit points restored by a healing potion
pub const HEAL_AMOUNT: i32 = 40;
/// Damage dealt by a lightning bolt
pub const LIGHTNING_DAMAGE: i32 = 40;
/// Damage dealt by a fireball
pub const FIREBALL_DAMAGE: i32 = 25;

/// Monsters the cartographer can roll
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum MonsterKind {
    Orc,
    Troll,
}

impl MonsterKind {
    pub fn spawn(self, id: EntityId, pos: Point) -> Entity {
        let (glyph, fighter) = match self {
            MonsterKind::Orc => ('o', Fighter::new(20, 0, 4, 35, DeathBehavior::Monster)),
            MonsterKind::Troll => ('T', Fighter::new(30, 2, 8, 100, DeathBehavior::Monster)),
        };
        Entity::new(id, pos, glyph, self.to_string())
            .blocking()
            .with_fighter(fighter)
            .with_ai(Ai::Basic)
    }
}

/// Items the cartographer can roll
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ItemKind {
    Heal,
    Lightning,
    Fireball,
    Confuse,
    Sword,
    Shield,
    Dagger,
}

impl ItemKind {
    /// Create the item lying on the floor at `pos`.
    ///
    /// Floor items are always visible once their cell has been explored.
    pub fn spawn(self, id: EntityId, pos: Point) -> Entity {
        let entity = match self {
            ItemKind::Heal => Entity::new(id, pos, '!', "healing potion").with_item(Item::new(
                Some(ItemEffect::Heal),
                format!(
                    "A flask of revivifying alchemical mixtures; heals {HEAL_AMOUNT} hp."
                ),
            )),
            ItemKind::Lightning => Entity::new(id, pos, '#', "scroll of lightning bolt").with_item(
                Item::new(
                    Some(ItemEffect::Lightning),
                    format!(
                        "Reading these runes will strike your nearest foe with lightning for {LIGHTNING_DAMAGE} hp."
                    ),
                ),
            ),
            ItemKind::Fireball => Entity::new(id, pos, '#', "scroll of fireball").with_item(
                Item::new(
                    Some(ItemEffect::Fireball),
                    format!(
                        "Reading these runes will cause a burst of flame inflicting {FIREBALL_DAMAGE} hp on nearby creatures."
                    ),
                ),
            ),
            ItemKind::Confuse => Entity::new(id, pos, '#', "scroll of confusion").with_item(
                Item::new(
                    Some(ItemEffect::Confuse),
                    "Reading these runes will confuse the creature you focus on for a short time.",
                ),
            ),
            ItemKind::Sword => Entity::new(id, pos, '/', "sword")
                .with_item(Item::new(
                    None,
                    "A heavy-tipped bronze chopping sword; provides +3 Attack",
                ))
                .with_equipment(Equipment {
                    power_bonus: 3,
                    ..Equipment::new(Slot::RightHand)
                }),
            ItemKind::Shield => Entity::new(id, pos, '[', "shield")
                .with_item(Item::new(None, "A bronze-edged oval shield; provides +1 Defense"))
                .with_equipment(Equipment {
                    defense_bonus: 1,
                    ..Equipment::new(Slot::LeftHand)
                }),
            ItemKind::Dagger => Entity::new(id, pos, '-', "dagger")
                .with_item(Item::new(
                    None,
                    "A leaf-shaped bronze knife; provides +2 Attack",
                ))
                .with_equipment(Equipment {
                    power_bonus: 2,
                    ..Equipment::new(Slot::RightHand)
                }),
        };
        entity.always_visible()
    }
}

/// The player character
pub fn player(id: EntityId, pos: Point) -> Entity {
    Entity::new(id, pos, '@', "player")
        .blocking()
        .with_fighter(Fighter::new(100, 1, 2, 0, DeathBehavior::Player))
}

/// Unbound stairs leading one level deeper
pub fn down_stairs(id: EntityId, pos: Point) -> Entity {
    Entity::new(id, pos, '<', "stairs down")
        .always_visible()
        .with_portal(Portal::unbound(PortalKind::Down))
}

/// Stairs back to `destination`, arriving at `position`
pub fn up_stairs(id: EntityId, pos: Point, destination: MapId, position: Point) -> Entity {
    Entity::new(id, pos, '>', "stairs up")
        .always_visible()
        .with_portal(Portal::bound(PortalKind::Up, destination, position))
}
