//! Level generation
//!
//! Builds a level out of rectangular rooms joined by L-shaped tunnels, then
//! fills the rooms with monsters and items rolled from level-scaled tables.
//!
//! Each map records the seed it was built from. Room and tunnel layout draws
//! from ChaCha stream [`LAYOUT_STREAM`] of that seed and population draws
//! from stream [`OCCUPANT_STREAM`], so the layout of a seed never depends on
//! what was spawned in it.

use super::map::{Map, Room};
use super::tables::random_choice;
use super::terrain::Terrain;
use crate::config::GenConfig;
use crate::entity::{Entity, EntityIds, down_stairs};
use crate::geometry::{Point, Rect};
use crate::rng::{GameRng, LAYOUT_STREAM, OCCUPANT_STREAM};

/// Generate a complete level.
///
/// `player` is placed at the center of the first room and becomes the first
/// occupant. When `seed` is `None` a fresh one is drawn from entropy; either
/// way it ends up in [`Map::random_seed`].
///
/// # Panics
///
/// `config` must pass [`GenConfig::validate`]. Rooms larger than the map
/// are carved out of bounds, which panics.
pub fn generate_level(
    config: &GenConfig,
    dungeon_level: u32,
    mut player: Entity,
    seed: Option<u64>,
    ids: &mut EntityIds,
) -> Map {
    debug_assert!(
        config.validate().is_ok(),
        "generate_level called with an invalid config"
    );
    let seed = seed.unwrap_or_else(|| GameRng::from_entropy().next_seed());
    let mut map = Map::new(config.map_width, config.map_height, dungeon_level);
    map.random_seed = seed;

    let mut layout_rng = GameRng::with_stream(seed, LAYOUT_STREAM);
    build_layout(&mut map, config, &mut layout_rng);

    let rooms = map.rooms().to_vec();
    match rooms.first() {
        Some(first) => player.pos = first.center(),
        None => {
            tracing::warn!(
                dungeon_level,
                seed,
                "no room fits a {}x{} map",
                config.map_width,
                config.map_height
            );
            player.pos = Point::new(config.map_width / 2, config.map_height / 2);
        }
    }
    map.add_object(player);

    let mut occupant_rng = GameRng::with_stream(seed, OCCUPANT_STREAM);
    for room in &rooms {
        place_objects(&mut map, room, config, &mut occupant_rng, ids);
    }

    if let Some(last) = rooms.last() {
        map.add_portal(down_stairs(ids.allocate(), last.center()));
    }

    map.initialize_fov();

    tracing::info!(
        dungeon_level,
        seed,
        rooms = rooms.len(),
        occupants = map.objects().len(),
        "level generated"
    );
    map
}

/// Carve rooms and tunnels into a solid map.
///
/// Makes `config.max_rooms` placement attempts. A candidate touching or
/// overlapping an accepted room is dropped without retry. Every accepted room
/// after the first is joined to the previous one by an L-shaped tunnel
/// between their centers.
pub fn build_layout(map: &mut Map, config: &GenConfig, rng: &mut GameRng) {
    for attempt in 0..config.max_rooms {
        let w = rng.range(config.room_min_size, config.room_max_size);
        let h = rng.range(config.room_min_size, config.room_max_size);
        let x = rng.range(0, map.width() - w - 1);
        let y = rng.range(0, map.height() - h - 1);
        let candidate = Room::new(Rect::new(x, y, w, h));

        if map.rooms().iter().any(|room| room.intersects(&candidate)) {
            tracing::debug!(attempt, x, y, w, h, "room rejected");
            continue;
        }

        create_room(map, &candidate.bounds);

        if let Some(prev) = map.rooms().last().map(Room::center) {
            let new = candidate.center();
            if rng.coin_flip() {
                create_h_tunnel(map, prev.x, new.x, prev.y);
                create_v_tunnel(map, prev.y, new.y, new.x);
            } else {
                create_v_tunnel(map, prev.y, new.y, prev.x);
                create_h_tunnel(map, prev.x, new.x, new.y);
            }
        }

        tracing::debug!(attempt, x, y, w, h, "room accepted");
        map.push_room(candidate);
    }
}

/// Open every cell strictly inside the rectangle
fn create_room(map: &mut Map, bounds: &Rect) {
    for p in bounds.interior() {
        map.set_terrain(p, Terrain::Ground);
    }
}

fn create_h_tunnel(map: &mut Map, x1: i32, x2: i32, y: i32) {
    for x in x1.min(x2)..=x1.max(x2) {
        map.set_terrain(Point::new(x, y), Terrain::Ground);
    }
}

fn create_v_tunnel(map: &mut Map, y1: i32, y2: i32, x: i32) {
    for y in y1.min(y2)..=y1.max(y2) {
        map.set_terrain(Point::new(x, y), Terrain::Ground);
    }
}

/// Roll monsters and items for one room.
///
/// A spawn whose cell is already blocked is dropped; no other cell is tried.
/// Monsters are drawn above what is already there, items beneath.
fn place_objects(
    map: &mut Map,
    room: &Room,
    config: &GenConfig,
    rng: &mut GameRng,
    ids: &mut EntityIds,
) {
    let level = map.dungeon_level();
    let spawns = &config.spawns;
    let max_monsters = spawns.max_monsters.value_at(level);
    let max_items = spawns.max_items.value_at(level);
    let monster_weights = spawns.monster_weights(level);
    let item_weights = spawns.item_weights(level);

    let num_monsters = rng.range(0, to_i32(max_monsters));
    for _ in 0..num_monsters {
        let pos = random_interior_point(room, rng);
        if map.is_blocked_at(pos) {
            tracing::debug!(x = pos.x, y = pos.y, "monster spawn skipped, cell blocked");
            continue;
        }
        if let Some(kind) = random_choice(&monster_weights, rng) {
            map.add_object(kind.spawn(ids.allocate(), pos));
        }
    }

    let num_items = rng.range(0, to_i32(max_items));
    for _ in 0..num_items {
        let pos = random_interior_point(room, rng);
        if map.is_blocked_at(pos) {
            tracing::debug!(x = pos.x, y = pos.y, "item spawn skipped, cell blocked");
            continue;
        }
        if let Some(kind) = random_choice(&item_weights, rng) {
            map.insert_object_front(kind.spawn(ids.allocate(), pos));
        }
    }
}

fn random_interior_point(room: &Room, rng: &mut GameRng) -> Point {
    let Rect { x1, y1, x2, y2 } = room.bounds;
    let x = rng.range(x1 + 1, x2 - 1);
    let y = rng.range(y1 + 1, y2 - 1);
    Point::new(x, y)
}

fn to_i32(n: u32) -> i32 {
    i32::try_from(n).unwrap_or(i32::MAX)
}
