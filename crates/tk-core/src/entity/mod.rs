//! Map occupants: the player, monsters, items, stairs
//!
//! An [`Entity`] is a plain record; capabilities are explicit optional
//! components rather than attributes checked at runtime.

mod components;
mod content;

pub use components::{
    Ai, DeathBehavior, Equipment, Fighter, Item, ItemEffect, Portal, PortalKind, Slot,
};
pub use content::{
    FIREBALL_DAMAGE, HEAL_AMOUNT, ItemKind, LIGHTNING_DAMAGE, MonsterKind, down_stairs, player,
    up_stairs,
};

use serde::{Deserialize, Serialize};

use crate::geometry::Point;

/// Stable identity of an entity across maps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u32);

/// Session-wide allocator of [`EntityId`]s
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EntityIds {
    next: u32,
}

impl EntityIds {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hand out the next unused id
    pub fn allocate(&mut self) -> EntityId {
        let id = EntityId(self.next);
        self.next += 1;
        id
    }
}

/// A generic object: the player, a monster, an item, the stairs...
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub pos: Point,
    pub glyph: char,
    pub name: String,
    /// Occupies its cell for movement purposes
    pub blocks: bool,
    /// Drawn on explored cells even when out of view
    pub always_visible: bool,
    pub fighter: Option<Fighter>,
    pub ai: Option<Ai>,
    pub item: Option<Item>,
    pub equipment: Option<Equipment>,
    pub portal: Option<Portal>,
}

impl Entity {
    /// Bare entity with no capabilities
    pub fn new(id: EntityId, pos: Point, glyph: char, name: impl Into<String>) -> Self {
        Self {
            id,
            pos,
            glyph,
            name: name.into(),
            blocks: false,
            always_visible: false,
            fighter: None,
            ai: None,
            item: None,
            equipment: None,
            portal: None,
        }
    }

    pub fn blocking(mut self) -> Self {
        self.blocks = true;
        self
    }

    pub fn always_visible(mut self) -> Self {
        self.always_visible = true;
        self
    }

    pub fn with_fighter(mut self, fighter: Fighter) -> Self {
        self.fighter = Some(fighter);
        self
    }

    pub fn with_ai(mut self, ai: Ai) -> Self {
        self.ai = Some(ai);
        self
    }

    pub fn with_item(mut self, item: Item) -> Self {
        self.item = Some(item);
        self
    }

    /// Attach equipment, adding a bare item component if none is present
    pub fn with_equipment(mut self, equipment: Equipment) -> Self {
        if self.item.is_none() {
            self.item = Some(Item::new(None, ""));
        }
        self.equipment = Some(equipment);
        self
    }

    pub fn with_portal(mut self, portal: Portal) -> Self {
        self.portal = Some(portal);
        self
    }

    pub fn distance_to(&self, other: &Entity) -> f64 {
        self.pos.distance_to(other.pos)
    }
}

/// Turn a dead monster into a harmless corpse.
///
/// The corpse no longer blocks, fights or acts. Callers should also move it
/// to the front of the map's draw order with `Map::send_to_back`.
pub fn monster_death(monster: &mut Entity) {
    tracing::debug!("{} died at ({}, {})", monster.name, monster.pos.x, monster.pos.y);
    monster.glyph = '%';
    monster.blocks = false;
    monster.fighter = None;
    monster.ai = None;
    monster.name = format!("remains of {}", monster.name);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_unique() {
        let mut ids = EntityIds::new();
        let a = ids.allocate();
        let b = ids.allocate();
        assert_ne!(a, b);
    }

    #[test]
    fn test_equipment_implies_item() {
        let e = Entity::new(EntityId(0), Point::default(), '/', "stick")
            .with_equipment(Equipment::new(Slot::RightHand));
        assert!(e.item.is_some());
    }

    #[test]
    fn test_monster_death() {
        let mut ids = EntityIds::new();
        let mut orc = MonsterKind::Orc.spawn(ids.allocate(), Point::new(2, 2));
        monster_death(&mut orc);
        assert_eq!(orc.name, "remains of orc");
        assert_eq!(orc.glyph, '%');
        assert!(!orc.blocks);
        assert!(orc.fighter.is_none());
        assert!(orc.ai.is_none());
    }
}
