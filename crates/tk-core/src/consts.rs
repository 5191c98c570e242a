//! Game constants

/// Map width in cells
pub const MAP_WIDTH: i32 = 60;

/// Map height in cells
pub const MAP_HEIGHT: i32 = 33;

/// Smallest room side, border included
pub const ROOM_MIN_SIZE: i32 = 6;

/// Largest room side, border included
pub const ROOM_MAX_SIZE: i32 = 10;

/// Room placement attempts per level
pub const MAX_ROOMS: u32 = 30;

/// Default sight radius of the player
pub const TORCH_RADIUS: i32 = 10;

/// Lines kept in the message log
pub const MSG_LIMIT: usize = 150;

/// Repeat counter at which identical log lines stop merging
pub const MSG_MERGE_LIMIT: u32 = 10;
