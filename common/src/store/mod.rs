mod memory;
mod sqlite;

use std::fmt;

use crate::PlayerName;

pub use memory::MemoryProgressStore;
pub use sqlite::SqliteProgressStore;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SavedProgress {
    pub level: u32,
    pub score: u32,
}

impl SavedProgress {
    pub fn new(level: u32, score: u32) -> Self {
        Self { level, score }
    }
}

#[derive(Debug)]
pub enum StoreError {
    /// The backing store could not be opened or reached.
    Unavailable(String),
    Sqlite(rusqlite::Error),
    InvalidRecord(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Unavailable(e) => write!(f, "Store unavailable: {}", e),
            StoreError::Sqlite(e) => write!(f, "SQLite error: {}", e),
            StoreError::InvalidRecord(e) => write!(f, "Invalid record: {}", e),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Sqlite(e) => Some(e),
            _ => None,
        }
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        StoreError::Sqlite(e)
    }
}

/// Saved level/score per player. Calls are synchronous and never retried.
pub trait ProgressStore {
    fn load(&mut self, player: &PlayerName) -> Result<Option<SavedProgress>, StoreError>;
    fn save(&mut self, player: &PlayerName, progress: SavedProgress) -> Result<(), StoreError>;
}
