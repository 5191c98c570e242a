//! Generation settings
//!
//! Everything the cartographer and the FOV pass read lives in [`GenConfig`]:
//! map size, room sizes, attempt count, sight radius and spawn tables. The
//! defaults reproduce the classic 60x33 dungeon. Settings load from JSON,
//! and any field missing from the file keeps its default.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::{MAP_HEIGHT, MAP_WIDTH, MAX_ROOMS, ROOM_MAX_SIZE, ROOM_MIN_SIZE, TORCH_RADIUS};
use crate::dungeon::{FovAlgorithm, SpawnTables};

/// Configuration loading and validation errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("could not read config '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Dungeon generation and visibility settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenConfig {
    pub map_width: i32,
    pub map_height: i32,
    /// Smallest room side, border included
    pub room_min_size: i32,
    /// Largest room side, border included
    pub room_max_size: i32,
    /// Room placement attempts per level
    pub max_rooms: u32,
    /// Sight radius; 0 means unlimited
    pub torch_radius: i32,
    pub fov_light_walls: bool,
    pub fov_algorithm: FovAlgorithm,
    pub spawns: SpawnTables,
}

impl Default for GenConfig {
    fn default() -> Self {
        Self {
            map_width: MAP_WIDTH,
            map_height: MAP_HEIGHT,
            room_min_size: ROOM_MIN_SIZE,
            room_max_size: ROOM_MAX_SIZE,
            max_rooms: MAX_ROOMS,
            torch_radius: TORCH_RADIUS,
            fov_light_walls: true,
            fov_algorithm: FovAlgorithm::default(),
            spawns: SpawnTables::default(),
        }
    }
}

impl GenConfig {
    /// Default settings with a different map size
    pub fn with_size(width: i32, height: i32) -> Self {
        Self {
            map_width: width,
            map_height: height,
            ..Self::default()
        }
    }

    /// Load and validate settings from a JSON file
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&contents)
    }

    /// Parse and validate settings from a JSON string
    pub fn from_json(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the settings can always produce at least one room.
    ///
    /// The first placement attempt never collides, so a room of the
    /// largest size plus its one-cell margin must fit the map.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.map_width < 3 || self.map_height < 3 {
            return Err(ConfigError::Invalid(format!(
                "map must be at least 3x3, got {}x{}",
                self.map_width, self.map_height
            )));
        }
        if self.room_min_size < 3 {
            return Err(ConfigError::Invalid(format!(
                "room_min_size must be at least 3, got {}",
                self.room_min_size
            )));
        }
        if self.room_min_size > self.room_max_size {
            return Err(ConfigError::Invalid(format!(
                "room_min_size ({}) exceeds room_max_size ({})",
                self.room_min_size, self.room_max_size
            )));
        }
        if self.room_max_size + 2 > self.map_width || self.room_max_size + 2 > self.map_height {
            return Err(ConfigError::Invalid(format!(
                "rooms up to {} cells do not fit a {}x{} map",
                self.room_max_size, self.map_width, self.map_height
            )));
        }
        if self.max_rooms == 0 {
            return Err(ConfigError::Invalid("max_rooms must be positive".into()));
        }
        if self.torch_radius < 0 {
            return Err(ConfigError::Invalid(format!(
                "torch_radius must not be negative, got {}",
                self.torch_radius
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = GenConfig::default();
        assert_eq!((config.map_width, config.map_height), (60, 33));
        assert_eq!(config.max_rooms, 30);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let config = GenConfig::from_json(r#"{ "map_width": 80, "map_height": 43 }"#).unwrap();
        assert_eq!(config.map_width, 80);
        assert_eq!(config.map_height, 43);
        assert_eq!(config.room_max_size, ROOM_MAX_SIZE);
        assert_eq!(config.spawns, SpawnTables::default());
    }

    #[test]
    fn test_rooms_too_large() {
        let err = GenConfig::from_json(r#"{ "map_width": 11, "map_height": 40 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_min_exceeds_max() {
        let config = GenConfig {
            room_min_size: 9,
            room_max_size: 7,
            ..GenConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_rooms() {
        let config = GenConfig {
            max_rooms: 0,
            ..GenConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_malformed_json() {
        let err = GenConfig::from_json("{ map_width: ").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = GenConfig::load_from_file(Path::new("/nonexistent/tombs.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
        assert!(err.to_string().contains("tombs.json"));
    }

    #[test]
    fn test_algorithm_name() {
        let config = GenConfig::from_json(r#"{ "fov_algorithm": "raycast" }"#).unwrap();
        assert_eq!(config.fov_algorithm, FovAlgorithm::Raycast);
    }
}
