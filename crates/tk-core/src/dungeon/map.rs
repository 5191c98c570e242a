//! Map structure: terrain grid, exploration memory, occupants, rooms
//!
//! Grids are flat row-major buffers indexed `y * width + x`. Accessors take
//! in-bounds coordinates only; callers check with [`Map::out_of_bounds`]
//! first, and a violation panics.

use serde::{Deserialize, Serialize};

use super::fov::{FovAlgorithm, FovMap, VisibleSet};
use super::terrain::Terrain;
use crate::entity::{Entity, EntityId};
use crate::geometry::{Point, Rect};

/// Index of a map within a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MapId(pub usize);

/// A generated room
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    pub bounds: Rect,
}

impl Room {
    pub const fn new(bounds: Rect) -> Self {
        Self { bounds }
    }

    pub const fn center(&self) -> Point {
        self.bounds.center()
    }

    pub const fn intersects(&self, other: &Room) -> bool {
        self.bounds.intersects(&other.bounds)
    }

    /// True if `p` is a floor cell of this room
    pub const fn contains(&self, p: Point) -> bool {
        self.bounds.interior_contains(p)
    }
}

/// Complete level structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Map {
    width: i32,
    height: i32,
    dungeon_level: u32,

    /// Seed the layout and population streams were derived from
    pub random_seed: u64,

    terrain: Vec<Terrain>,

    /// Cells the player has seen at some point
    explored: Vec<bool>,

    /// Occupants in draw order, first to last
    objects: Vec<Entity>,

    rooms: Vec<Room>,

    /// Stair entities, most recently added first
    portals: Vec<EntityId>,

    #[serde(skip)]
    fov: Option<FovMap>,

    /// Result of the last FOV computation
    #[serde(skip)]
    visible: VisibleSet,

    #[serde(skip)]
    fov_needs_recompute: bool,
}

impl Map {
    /// Create a map filled with wall
    pub fn new(width: i32, height: i32, dungeon_level: u32) -> Self {
        assert!(width > 0 && height > 0, "map must be at least 1x1, got {width}x{height}");
        let cells = (width * height) as usize;
        Self {
            width,
            height,
            dungeon_level,
            random_seed: 0,
            terrain: vec![Terrain::Wall; cells],
            explored: vec![false; cells],
            objects: Vec::new(),
            rooms: Vec::new(),
            portals: Vec::new(),
            fov: None,
            visible: VisibleSet::empty(width, height),
            fov_needs_recompute: true,
        }
    }

    pub const fn width(&self) -> i32 {
        self.width
    }

    pub const fn height(&self) -> i32 {
        self.height
    }

    pub const fn dungeon_level(&self) -> u32 {
        self.dungeon_level
    }

    /// Check if position lies outside the grid
    pub const fn out_of_bounds(&self, pos: Point) -> bool {
        pos.x < 0 || pos.y < 0 || pos.x >= self.width || pos.y >= self.height
    }

    fn index(&self, pos: Point) -> usize {
        assert!(
            !self.out_of_bounds(pos),
            "({}, {}) is outside the {}x{} map",
            pos.x,
            pos.y,
            self.width,
            self.height
        );
        (pos.y * self.width + pos.x) as usize
    }

    // ------------------------------------------------------------------
    // Terrain
    // ------------------------------------------------------------------

    pub fn terrain_at(&self, pos: Point) -> Terrain {
        self.terrain[self.index(pos)]
    }

    /// Change terrain. Call [`Map::initialize_fov`] afterwards if the
    /// change affects sight.
    pub fn set_terrain(&mut self, pos: Point, terrain: Terrain) {
        let i = self.index(pos);
        self.terrain[i] = terrain;
    }

    pub fn blocks_sight_at(&self, pos: Point) -> bool {
        self.terrain_at(pos).blocks_sight()
    }

    /// Check if terrain or a blocking occupant stops movement into `pos`
    pub fn is_blocked_at(&self, pos: Point) -> bool {
        if self.terrain_at(pos).blocks_movement() {
            return true;
        }
        self.objects.iter().any(|o| o.blocks && o.pos == pos)
    }

    /// Row-major terrain snapshot
    pub fn terrain(&self) -> &[Terrain] {
        &self.terrain
    }

    // ------------------------------------------------------------------
    // Exploration
    // ------------------------------------------------------------------

    /// Check if a cell is explored (player has seen it before)
    pub fn is_explored(&self, pos: Point) -> bool {
        self.explored[self.index(pos)]
    }

    /// Mark a cell as explored; the flag never resets
    pub fn mark_explored(&mut self, pos: Point) {
        let i = self.index(pos);
        self.explored[i] = true;
    }

    // ------------------------------------------------------------------
    // Field of view
    // ------------------------------------------------------------------

    /// Rebuild the FOV state from terrain and mark visibility stale.
    ///
    /// Required after loading and after sight-affecting terrain edits;
    /// calling it again is harmless.
    pub fn initialize_fov(&mut self) {
        let transparent = self.terrain.iter().map(|t| !t.blocks_sight()).collect();
        self.fov = Some(FovMap::new(self.width, self.height, transparent));
        self.visible = VisibleSet::empty(self.width, self.height);
        self.fov_needs_recompute = true;
    }

    pub const fn is_fov_initialized(&self) -> bool {
        self.fov.is_some()
    }

    /// Recompute visibility from `origin` and mark every visible cell
    /// explored. Cells out of view keep their explored flag.
    pub fn compute_fov(
        &mut self,
        origin: Point,
        radius: i32,
        light_walls: bool,
        algorithm: FovAlgorithm,
    ) -> &VisibleSet {
        let Some(fov) = &self.fov else {
            panic!("compute_fov called before initialize_fov");
        };
        self.visible = fov.compute(origin, radius, light_walls, algorithm);
        let width = self.width;
        for p in self.visible.iter() {
            self.explored[(p.y * width + p.x) as usize] = true;
        }
        &self.visible
    }

    /// Cells visible as of the last [`Map::compute_fov`]
    pub fn visible(&self) -> &VisibleSet {
        assert!(self.fov.is_some(), "visibility queried before initialize_fov");
        &self.visible
    }

    pub fn is_visible(&self, pos: Point) -> bool {
        self.visible().contains(pos)
    }

    pub const fn fov_needs_recompute(&self) -> bool {
        self.fov_needs_recompute
    }

    /// Flag visibility as stale (the viewer moved, or the map was entered)
    pub fn request_fov_recompute(&mut self) {
        self.fov_needs_recompute = true;
    }

    /// Called by the consumer once a frame reflecting the current
    /// visibility has been drawn
    pub fn fov_drawn(&mut self) {
        self.fov_needs_recompute = false;
    }

    /// Whether an occupant should be drawn: in view now, or remembered on an
    /// explored cell if it is always visible
    pub fn is_render_visible(&self, entity: &Entity) -> bool {
        if self.out_of_bounds(entity.pos) {
            return false;
        }
        self.is_visible(entity.pos) || (entity.always_visible && self.is_explored(entity.pos))
    }

    // ------------------------------------------------------------------
    // Occupants
    // ------------------------------------------------------------------

    pub fn objects(&self) -> &[Entity] {
        &self.objects
    }

    /// Append an occupant (drawn on top of earlier ones)
    pub fn add_object(&mut self, entity: Entity) {
        self.objects.push(entity);
    }

    /// Prepend an occupant (drawn beneath everything else)
    pub fn insert_object_front(&mut self, entity: Entity) {
        self.objects.insert(0, entity);
    }

    /// Remove an occupant; it must currently be on this map
    pub fn remove_object(&mut self, id: EntityId) -> Entity {
        let Some(idx) = self.objects.iter().position(|o| o.id == id) else {
            panic!("{id:?} is not on this map");
        };
        self.portals.retain(|&p| p != id);
        self.objects.remove(idx)
    }

    /// Move an occupant to the front of the draw order (e.g. a fresh corpse)
    pub fn send_to_back(&mut self, id: EntityId) {
        let portal = self.portals.contains(&id);
        let entity = self.remove_object(id);
        self.insert_object_front(entity);
        if portal {
            self.portals.insert(0, id);
        }
    }

    pub fn object(&self, id: EntityId) -> Option<&Entity> {
        self.objects.iter().find(|o| o.id == id)
    }

    pub fn object_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.objects.iter_mut().find(|o| o.id == id)
    }

    pub fn objects_at(&self, pos: Point) -> impl Iterator<Item = &Entity> {
        self.objects.iter().filter(move |o| o.pos == pos)
    }

    pub fn blocking_object_at(&self, pos: Point) -> Option<&Entity> {
        self.objects.iter().find(|o| o.blocks && o.pos == pos)
    }

    /// Occupants first to last, with `viewer` moved to the end so it is
    /// drawn on top
    pub fn draw_order(&self, viewer: EntityId) -> impl Iterator<Item = &Entity> {
        self.objects
            .iter()
            .filter(move |o| o.id != viewer)
            .chain(self.object(viewer))
    }

    // ------------------------------------------------------------------
    // Portals and rooms
    // ------------------------------------------------------------------

    /// Add a portal entity to both the occupant list and the portal list
    pub fn add_portal(&mut self, entity: Entity) {
        assert!(entity.portal.is_some(), "{} has no portal component", entity.name);
        self.portals.insert(0, entity.id);
        self.insert_object_front(entity);
    }

    pub fn portals(&self) -> impl Iterator<Item = &Entity> {
        self.portals.iter().filter_map(|&id| self.object(id))
    }

    pub fn portal_at(&self, pos: Point) -> Option<&Entity> {
        self.portals().find(|p| p.pos == pos)
    }

    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    pub(crate) fn push_room(&mut self, room: Room) {
        self.rooms.push(room);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{ItemKind, MonsterKind, down_stairs};

    fn open_map() -> Map {
        let mut map = Map::new(20, 12, 1);
        for p in Rect::new(2, 2, 12, 6).interior() {
            map.set_terrain(p, Terrain::Ground);
        }
        map.initialize_fov();
        map
    }

    #[test]
    fn test_new_map_is_solid() {
        let map = Map::new(8, 5, 1);
        assert!(map.terrain().iter().all(|&t| t == Terrain::Wall));
        assert!(map.is_blocked_at(Point::new(3, 3)));
        assert!(!map.is_explored(Point::new(3, 3)));
        assert!(map.objects().is_empty());
    }

    #[test]
    fn test_out_of_bounds() {
        let map = Map::new(8, 5, 1);
        assert!(map.out_of_bounds(Point::new(-1, 0)));
        assert!(map.out_of_bounds(Point::new(8, 0)));
        assert!(map.out_of_bounds(Point::new(0, 5)));
        assert!(!map.out_of_bounds(Point::new(7, 4)));
    }

    #[test]
    #[should_panic(expected = "outside")]
    fn test_out_of_bounds_access_panics() {
        let map = Map::new(8, 5, 1);
        map.terrain_at(Point::new(8, 0));
    }

    #[test]
    #[should_panic(expected = "before initialize_fov")]
    fn test_fov_before_init_panics() {
        let mut map = Map::new(8, 5, 1);
        map.compute_fov(Point::new(1, 1), 5, true, FovAlgorithm::Shadowcast);
    }

    #[test]
    fn test_blocking_occupant() {
        let mut map = open_map();
        let p = Point::new(5, 5);
        assert!(!map.is_blocked_at(p));

        map.add_object(ItemKind::Heal.spawn(EntityId(1), p));
        assert!(!map.is_blocked_at(p), "items do not block");

        map.add_object(MonsterKind::Orc.spawn(EntityId(2), p));
        assert!(map.is_blocked_at(p));
        assert_eq!(map.blocking_object_at(p).map(|o| o.id), Some(EntityId(2)));
        assert_eq!(map.objects_at(p).count(), 2);
    }

    #[test]
    fn test_compute_fov_marks_explored() {
        let mut map = open_map();
        let visible = map.compute_fov(Point::new(6, 5), 4, true, FovAlgorithm::Shadowcast).clone();
        assert!(visible.contains(Point::new(6, 5)));
        for p in visible.iter() {
            assert!(map.is_explored(p));
        }
        assert!(!map.is_explored(Point::new(19, 11)));
    }

    #[test]
    fn test_exploration_is_monotonic() {
        let mut map = open_map();
        map.compute_fov(Point::new(3, 3), 3, true, FovAlgorithm::Shadowcast);
        assert!(map.is_explored(Point::new(3, 4)));

        map.compute_fov(Point::new(12, 6), 2, true, FovAlgorithm::Shadowcast);
        assert!(!map.is_visible(Point::new(3, 4)));
        assert!(map.is_explored(Point::new(3, 4)));
    }

    #[test]
    fn test_render_visibility() {
        let mut map = open_map();
        let potion = ItemKind::Heal.spawn(EntityId(1), Point::new(3, 3));
        let orc = MonsterKind::Orc.spawn(EntityId(2), Point::new(3, 4));

        // Never seen: hidden even though the potion is always visible.
        map.compute_fov(Point::new(12, 6), 1, true, FovAlgorithm::Shadowcast);
        assert!(!map.is_render_visible(&potion));
        assert!(!map.is_render_visible(&orc));

        map.compute_fov(Point::new(3, 3), 3, true, FovAlgorithm::Shadowcast);
        assert!(map.is_render_visible(&potion));
        assert!(map.is_render_visible(&orc));

        // Out of view again: only the remembered item stays.
        map.compute_fov(Point::new(12, 6), 1, true, FovAlgorithm::Shadowcast);
        assert!(map.is_render_visible(&potion));
        assert!(!map.is_render_visible(&orc));
    }

    #[test]
    fn test_fov_dirty_flag() {
        let mut map = open_map();
        assert!(map.fov_needs_recompute());
        map.fov_drawn();
        assert!(!map.fov_needs_recompute());
        map.request_fov_recompute();
        assert!(map.fov_needs_recompute());
    }

    #[test]
    fn test_draw_order_puts_viewer_last() {
        let mut map = open_map();
        map.add_object(MonsterKind::Orc.spawn(EntityId(7), Point::new(4, 4)));
        map.add_object(MonsterKind::Troll.spawn(EntityId(8), Point::new(5, 4)));
        map.insert_object_front(ItemKind::Sword.spawn(EntityId(9), Point::new(6, 4)));

        let order: Vec<EntityId> = map.draw_order(EntityId(7)).map(|o| o.id).collect();
        assert_eq!(order, vec![EntityId(9), EntityId(8), EntityId(7)]);
    }

    #[test]
    fn test_portals() {
        let mut map = open_map();
        map.add_object(MonsterKind::Orc.spawn(EntityId(1), Point::new(4, 4)));
        map.add_portal(down_stairs(EntityId(2), Point::new(6, 4)));

        assert_eq!(map.objects()[0].id, EntityId(2));
        assert_eq!(map.portals().count(), 1);
        assert!(map.portal_at(Point::new(6, 4)).is_some());
        assert!(map.portal_at(Point::new(4, 4)).is_none());

        map.remove_object(EntityId(2));
        assert_eq!(map.portals().count(), 0);
    }

    #[test]
    fn test_send_to_back() {
        let mut map = open_map();
        map.add_object(ItemKind::Heal.spawn(EntityId(1), Point::new(4, 4)));
        map.add_object(MonsterKind::Orc.spawn(EntityId(2), Point::new(5, 4)));
        map.send_to_back(EntityId(2));
        assert_eq!(map.objects()[0].id, EntityId(2));
    }

    #[test]
    #[should_panic(expected = "is not on this map")]
    fn test_remove_missing_object_panics() {
        let mut map = open_map();
        map.remove_object(EntityId(42));
    }

    #[test]
    fn test_serde_skips_fov() {
        let mut map = open_map();
        map.compute_fov(Point::new(5, 5), 3, true, FovAlgorithm::Shadowcast);
        let json = serde_json::to_string(&map).unwrap();
        let mut restored: Map = serde_json::from_str(&json).unwrap();

        assert!(!restored.is_fov_initialized());
        assert_eq!(restored.terrain(), map.terrain());
        assert!(restored.is_explored(Point::new(5, 5)));

        restored.initialize_fov();
        assert!(restored.fov_needs_recompute());
    }
}
