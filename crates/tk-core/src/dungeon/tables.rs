//! Level-scaled spawn tables and weighted random choice
//!
//! A [`StepTable`] is a monotonic step function of dungeon level: each entry
//! says "from this level on, the value is V". Lookups never interpolate.

use serde::{Deserialize, Serialize};

use crate::entity::{ItemKind, MonsterKind};
use crate::rng::GameRng;

/// One `(value, level)` step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    pub value: u32,
    pub level: u32,
}

/// Value that changes at fixed dungeon-level thresholds.
///
/// Steps are kept sorted by level; tables read from JSON are sorted on load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<Step>", into = "Vec<Step>")]
pub struct StepTable(pub Vec<Step>);

impl From<Vec<Step>> for StepTable {
    fn from(mut steps: Vec<Step>) -> Self {
        steps.sort_by_key(|step| step.level);
        Self(steps)
    }
}

impl From<StepTable> for Vec<Step> {
    fn from(table: StepTable) -> Self {
        table.0
    }
}

impl StepTable {
    /// Build from `(value, level)` pairs in any order
    pub fn new(steps: &[(u32, u32)]) -> Self {
        steps
            .iter()
            .map(|&(value, level)| Step { value, level })
            .collect::<Vec<_>>()
            .into()
    }

    /// Value of the highest threshold not above `dungeon_level`; 0 below
    /// the first threshold.
    ///
    /// Does not depend on entry order. Among steps sharing a level the last
    /// one listed wins.
    pub fn value_at(&self, dungeon_level: u32) -> u32 {
        self.0
            .iter()
            .filter(|step| dungeon_level >= step.level)
            .max_by_key(|step| step.level)
            .map_or(0, |step| step.value)
    }
}

/// Spawn weight of one kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Chance {
    /// Same weight on every level
    Fixed(u32),
    /// Weight that grows with depth
    ByLevel(StepTable),
}

impl Chance {
    pub fn weight_at(&self, dungeon_level: u32) -> u32 {
        match self {
            Chance::Fixed(weight) => *weight,
            Chance::ByLevel(table) => table.value_at(dungeon_level),
        }
    }
}

/// Per-room monster and item rolls
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpawnTables {
    pub max_monsters: StepTable,
    pub max_items: StepTable,
    /// Monster weights, in draw order
    pub monsters: Vec<(MonsterKind, Chance)>,
    /// Item weights, in draw order
    pub items: Vec<(ItemKind, Chance)>,
}

impl Default for SpawnTables {
    fn default() -> Self {
        Self {
            max_monsters: StepTable::new(&[(2, 1), (3, 4), (5, 6)]),
            max_items: StepTable::new(&[(1, 1), (2, 4)]),
            monsters: vec![
                // Orcs show up even if every other monster has no chance.
                (MonsterKind::Orc, Chance::Fixed(80)),
                (
                    MonsterKind::Troll,
                    Chance::ByLevel(StepTable::new(&[(15, 3), (30, 5), (60, 7)])),
                ),
            ],
            items: vec![
                // Likewise healing potions.
                (ItemKind::Heal, Chance::Fixed(35)),
                (ItemKind::Lightning, Chance::ByLevel(StepTable::new(&[(25, 4)]))),
                (ItemKind::Fireball, Chance::ByLevel(StepTable::new(&[(25, 6)]))),
                (ItemKind::Confuse, Chance::ByLevel(StepTable::new(&[(10, 2)]))),
                (ItemKind::Sword, Chance::ByLevel(StepTable::new(&[(5, 4)]))),
                (ItemKind::Shield, Chance::ByLevel(StepTable::new(&[(15, 8)]))),
            ],
        }
    }
}

impl SpawnTables {
    /// Monster weights resolved for one level
    pub fn monster_weights(&self, dungeon_level: u32) -> Vec<(MonsterKind, u32)> {
        resolve(&self.monsters, dungeon_level)
    }

    /// Item weights resolved for one level
    pub fn item_weights(&self, dungeon_level: u32) -> Vec<(ItemKind, u32)> {
        resolve(&self.items, dungeon_level)
    }
}

fn resolve<K: Copy>(table: &[(K, Chance)], dungeon_level: u32) -> Vec<(K, u32)> {
    table
        .iter()
        .map(|(kind, chance)| (*kind, chance.weight_at(dungeon_level)))
        .collect()
}

/// Pick an index proportionally to `weights`.
///
/// Draws `1..=sum` and returns the first index whose running sum reaches the
/// draw. Returns `None` when every weight is zero; no draw is made then.
pub fn random_choice_index(weights: &[u32], rng: &mut GameRng) -> Option<usize> {
    let total: u64 = weights.iter().copied().map(u64::from).sum();
    if total == 0 {
        return None;
    }
    let dice = rng.range_u64(1, total);

    let mut running_sum = 0_u64;
    weights.iter().position(|&w| {
        running_sum += u64::from(w);
        dice <= running_sum
    })
}

/// Pick a key proportionally to its weight, keeping table order
pub fn random_choice<K: Copy>(table: &[(K, u32)], rng: &mut GameRng) -> Option<K> {
    let weights: Vec<u32> = table.iter().map(|&(_, w)| w).collect();
    random_choice_index(&weights, rng).map(|i| table[i].0)
}
