//! tk-save: Save/restore system for the Tombs roguelike
//!
//! A save file is a JSON object holding a versioned header and the whole
//! [`Session`]. FOV state is never written; loading rebuilds it on every map.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use tk_core::Session;

/// Current save file format version
pub const SAVE_VERSION: u32 = 1;

/// Save/restore errors
#[derive(Debug, Error)]
pub enum SaveError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Save file not found: {0}")]
    NotFound(PathBuf),

    #[error("Incompatible save version: expected {expected}, found {found}")]
    IncompatibleVersion { expected: u32, found: u32 },

    #[error("Invalid save file header")]
    InvalidHeader,
}

/// Save file header for versioning
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveHeader {
    /// Magic identifier
    pub magic: String,
    /// Save format version
    pub version: u32,
    /// Dungeon level the player was on
    pub dungeon_level: u32,
    /// Number of generated levels
    pub levels: usize,
    /// Seconds since the Unix epoch
    pub timestamp: u64,
}

impl SaveHeader {
    const MAGIC: &'static str = "TKRS";

    pub fn new(session: &Session) -> Self {
        Self {
            magic: Self::MAGIC.to_string(),
            version: SAVE_VERSION,
            dungeon_level: session.dungeon_level(),
            levels: session.maps.len(),
            timestamp: std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or(0),
        }
    }

    pub fn validate(&self) -> Result<(), SaveError> {
        if self.magic != Self::MAGIC {
            return Err(SaveError::InvalidHeader);
        }
        if self.version != SAVE_VERSION {
            return Err(SaveError::IncompatibleVersion {
                expected: SAVE_VERSION,
                found: self.version,
            });
        }
        Ok(())
    }
}

#[derive(Serialize)]
struct SaveFileRef<'a> {
    header: SaveHeader,
    session: &'a Session,
}

/// Complete save file structure
#[derive(Deserialize)]
pub struct SaveFile {
    pub header: SaveHeader,
    pub session: Session,
}

#[derive(Deserialize)]
struct HeaderOnly {
    header: SaveHeader,
}

/// Save a session to a file
pub fn save_session(session: &Session, path: impl AsRef<Path>) -> Result<(), SaveError> {
    let path = path.as_ref();
    let save_file = SaveFileRef {
        header: SaveHeader::new(session),
        session,
    };

    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    serde_json::to_writer(writer, &save_file)?;
    tracing::info!(path = %path.display(), levels = session.maps.len(), "session saved");
    Ok(())
}

/// Load a session from a file.
///
/// Every map gets its FOV state rebuilt and marked stale before return.
pub fn load_session(path: impl AsRef<Path>) -> Result<Session, SaveError> {
    let path = path.as_ref();
    let file = open_save(path)?;
    let reader = BufReader::new(file);
    let save_file: SaveFile = serde_json::from_reader(reader)?;

    save_file.header.validate()?;
    let mut session = save_file.session;
    session.reinitialize_fov();
    tracing::info!(path = %path.display(), level = session.dungeon_level(), "session loaded");
    Ok(session)
}

/// Load only the header from a save file
pub fn load_header(path: impl AsRef<Path>) -> Result<SaveHeader, SaveError> {
    let path = path.as_ref();
    let file = open_save(path)?;
    let reader = BufReader::new(file);
    let save_file: HeaderOnly = serde_json::from_reader(reader)?;
    save_file.header.validate()?;
    Ok(save_file.header)
}

fn open_save(path: &Path) -> Result<File, SaveError> {
    File::open(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => SaveError::NotFound(path.to_path_buf()),
        _ => SaveError::Io(e),
    })
}

/// Check if a save file exists
pub fn save_exists(path: impl AsRef<Path>) -> bool {
    path.as_ref().exists()
}

/// Delete a save file
pub fn delete_save(path: impl AsRef<Path>) -> Result<(), SaveError> {
    std::fs::remove_file(path)?;
    Ok(())
}

/// Default save location under the user's local data directory
pub fn default_save_path() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("tombs");
    path.push("savegame.json");
    path
}
