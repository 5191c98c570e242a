//! Game session: the visited maps, the player, and level transitions

use serde::{Deserialize, Serialize};

use super::MessageLog;
use crate::config::{ConfigError, GenConfig};
use crate::dungeon::{Map, MapId, generate_level};
use crate::entity::{Entity, EntityId, EntityIds, Portal, PortalKind, player, up_stairs};
use crate::geometry::{Direction, Point};
use crate::rng::GameRng;

/// What happened when the player took the stairs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StairsOutcome {
    /// First use: a new level was generated and the stairs bound to it
    Descended { generated: MapId },
    /// The stairs were already bound; the player moved to an existing map
    Revisited { map: MapId },
}

/// Complete state of one game.
///
/// Maps are never dropped while the session lives, so a [`MapId`] stays
/// valid for the whole game. The player entity always sits in the current
/// map's occupant list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub config: GenConfig,

    /// Draws the seed of every new map
    pub rng: GameRng,

    pub ids: EntityIds,

    /// Every visited map, in order of generation
    pub maps: Vec<Map>,

    /// Map the player is on
    pub current: MapId,

    pub player: EntityId,

    pub log: MessageLog,
}

impl Session {
    /// Start a new game on dungeon level 1.
    ///
    /// With a `seed` the whole chain of generated levels is reproducible.
    pub fn new_game(config: GenConfig, seed: Option<u64>) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut rng = seed.map_or_else(GameRng::from_entropy, GameRng::new);
        let mut ids = EntityIds::new();
        let hero = player(ids.allocate(), Point::default());
        let player_id = hero.id;

        let map_seed = rng.next_seed();
        let map = generate_level(&config, 1, hero, Some(map_seed), &mut ids);

        let mut log = MessageLog::new();
        log.message("Welcome stranger! Prepare to perish in the Tombs of the Ancient Kings.");

        tracing::info!(seed = rng.seed(), "new game");
        Ok(Self {
            config,
            rng,
            ids,
            maps: vec![map],
            current: MapId(0),
            player: player_id,
            log,
        })
    }

    pub fn map(&self, id: MapId) -> &Map {
        &self.maps[id.0]
    }

    pub fn current_map(&self) -> &Map {
        self.map(self.current)
    }

    pub fn current_map_mut(&mut self) -> &mut Map {
        &mut self.maps[self.current.0]
    }

    pub fn player_entity(&self) -> &Entity {
        let Some(hero) = self.current_map().object(self.player) else {
            panic!("player is missing from the current map");
        };
        hero
    }

    pub fn player_entity_mut(&mut self) -> &mut Entity {
        let id = self.player;
        let Some(hero) = self.current_map_mut().object_mut(id) else {
            panic!("player is missing from the current map");
        };
        hero
    }

    /// Depth of the current map
    pub fn dungeon_level(&self) -> u32 {
        self.current_map().dungeon_level()
    }

    /// Step the player one cell. Returns false if the cell is blocked or
    /// off the map.
    pub fn move_player(&mut self, direction: Direction) -> bool {
        let target = self.player_entity().pos + direction;
        let map = self.current_map();
        if map.out_of_bounds(target) || map.is_blocked_at(target) {
            return false;
        }
        self.player_entity_mut().pos = target;
        self.current_map_mut().request_fov_recompute();
        true
    }

    /// Use the stairs under the player, if any.
    ///
    /// Unbound stairs heal the player by half their maximum hit points,
    /// generate the next level, and bind both ends. Bound stairs only move
    /// the player.
    pub fn try_stairs(&mut self) -> Option<StairsOutcome> {
        let pos = self.player_entity().pos;
        let stairs = self.current_map().portal_at(pos)?;
        let stairs_id = stairs.id;
        let binding = stairs
            .portal
            .as_ref()
            .and_then(|p| p.destination.zip(p.destination_position));

        Some(match binding {
            None => StairsOutcome::Descended {
                generated: self.descend(stairs_id, pos),
            },
            Some((map, position)) => {
                self.revisit(map, position);
                StairsOutcome::Revisited { map }
            }
        })
    }

    fn descend(&mut self, stairs_id: EntityId, stairs_pos: Point) -> MapId {
        self.log.message("You take a moment to rest, and recover your strength.");
        if let Some(fighter) = self.player_entity_mut().fighter.as_mut() {
            fighter.heal(fighter.base_max_hp / 2);
        }
        self.log.message(
            "After a rare moment of peace, you descend deeper into the heart of the dungeon...",
        );

        let from = self.current;
        let player_id = self.player;
        let level = self.dungeon_level() + 1;
        let hero = self.current_map_mut().remove_object(player_id);
        let seed = self.rng.next_seed();
        let mut map = generate_level(&self.config, level, hero, Some(seed), &mut self.ids);

        let generated = MapId(self.maps.len());
        let arrival = map.object(player_id).map_or_else(Point::default, |p| p.pos);
        map.add_portal(up_stairs(self.ids.allocate(), arrival, from, stairs_pos));

        if let Some(stairs) = self.maps[from.0].object_mut(stairs_id) {
            stairs.portal = Some(Portal::bound(PortalKind::Down, generated, arrival));
        }

        self.maps.push(map);
        self.current = generated;
        tracing::info!(level, seed, map = generated.0, "descended to a new level");
        generated
    }

    fn revisit(&mut self, to: MapId, position: Point) {
        let player_id = self.player;
        let mut hero = self.current_map_mut().remove_object(player_id);
        hero.pos = position;
        self.current = to;

        let map = self.current_map_mut();
        map.add_object(hero);
        map.initialize_fov();
        map.request_fov_recompute();
        tracing::info!(map = to.0, level = self.dungeon_level(), "revisited level");
    }

    /// Recompute visibility from the player if it is stale.
    ///
    /// Returns whether a recompute happened. The stale flag stays set until
    /// [`Session::fov_drawn`].
    pub fn refresh_fov(&mut self) -> bool {
        if !self.current_map().fov_needs_recompute() {
            return false;
        }
        let origin = self.player_entity().pos;
        let (radius, light_walls, algorithm) = (
            self.config.torch_radius,
            self.config.fov_light_walls,
            self.config.fov_algorithm,
        );
        self.current_map_mut()
            .compute_fov(origin, radius, light_walls, algorithm);
        true
    }

    /// Tell the session a frame with the current visibility was drawn
    pub fn fov_drawn(&mut self) {
        self.current_map_mut().fov_drawn();
    }

    /// Rebuild FOV state on every map after deserializing
    pub fn reinitialize_fov(&mut self) {
        for map in &mut self.maps {
            map.initialize_fov();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_game() {
        let session = Session::new_game(GenConfig::default(), Some(42)).unwrap();
        assert_eq!(session.maps.len(), 1);
        assert_eq!(session.dungeon_level(), 1);
        assert_eq!(session.player_entity().glyph, '@');
        assert_eq!(session.player_entity().pos, session.current_map().rooms()[0].center());
        assert_eq!(session.log.len(), 1);
    }

    #[test]
    fn test_new_game_rejects_bad_config() {
        let config = GenConfig::with_size(8, 8);
        assert!(Session::new_game(config, Some(1)).is_err());
    }

    #[test]
    fn test_same_seed_same_game() {
        let a = Session::new_game(GenConfig::default(), Some(9)).unwrap();
        let b = Session::new_game(GenConfig::default(), Some(9)).unwrap();
        assert_eq!(a.current_map().terrain(), b.current_map().terrain());
        assert_eq!(a.current_map().objects(), b.current_map().objects());
    }

    #[test]
    fn test_blocked_moves_fail() {
        let mut session = Session::new_game(GenConfig::default(), Some(3)).unwrap();
        let room = session.current_map().rooms()[0];
        let start = Point::new(room.bounds.x1 + 1, room.bounds.y1 + 1);
        session.player_entity_mut().pos = start;
        session.fov_drawn();

        for direction in Direction::ALL {
            let target = start + direction;
            if !session.current_map().is_blocked_at(target) {
                continue;
            }
            assert!(!session.move_player(direction), "moved into {target:?}");
            assert_eq!(session.player_entity().pos, start);
        }
        assert!(!session.current_map().fov_needs_recompute());
    }

    #[test]
    fn test_move_marks_fov_stale() {
        let mut session = Session::new_game(GenConfig::default(), Some(3)).unwrap();
        session.refresh_fov();
        session.fov_drawn();

        let moved = Direction::ALL
            .into_iter()
            .any(|d| session.move_player(d));
        assert!(moved, "every room has open neighbours around its center");
        assert!(session.current_map().fov_needs_recompute());
    }

    #[test]
    fn test_refresh_fov_only_when_stale() {
        let mut session = Session::new_game(GenConfig::default(), Some(4)).unwrap();
        assert!(session.refresh_fov());
        let pos = session.player_entity().pos;
        assert!(session.current_map().is_visible(pos));
        assert!(session.current_map().is_explored(pos));

        session.fov_drawn();
        assert!(!session.refresh_fov());
    }

    #[test]
    fn test_no_stairs_under_player() {
        let mut session = Session::new_game(GenConfig::default(), Some(5)).unwrap();
        let stairs = session.current_map().portals().next().unwrap().pos;
        if session.player_entity().pos != stairs {
            assert_eq!(session.try_stairs(), None);
        }
    }
}
