use std::path::Path;

use rusqlite::{params, Connection, OptionalExtension};

use crate::{log, PlayerName};
use super::{ProgressStore, SavedProgress, StoreError};

const CREATE_TABLES: &str = "
    PRAGMA foreign_keys = ON;
    CREATE TABLE IF NOT EXISTS users (
        user_id INTEGER PRIMARY KEY AUTOINCREMENT,
        username VARCHAR(50) UNIQUE NOT NULL
    );
    CREATE TABLE IF NOT EXISTS user_score (
        score_id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id INTEGER UNIQUE REFERENCES users(user_id) ON DELETE CASCADE,
        level INTEGER DEFAULT 1,
        score INTEGER DEFAULT 0
    );
";

/// Progress kept in the `users` / `user_score` tables of a SQLite database.
///
/// Loading an unknown player registers them with a fresh `(1, 0)` row and
/// reports no saved game; saving upserts the player's single row.
pub struct SqliteProgressStore {
    conn: Connection,
}

impl SqliteProgressStore {
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path)
            .map_err(|e| StoreError::Unavailable(format!("{}: {}", path.display(), e)))?;
        Self::from_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch(CREATE_TABLES)?;
        Ok(Self { conn })
    }

    fn find_user(&self, player: &PlayerName) -> Result<Option<i64>, StoreError> {
        let user_id = self
            .conn
            .query_row(
                "SELECT user_id FROM users WHERE username = ?1",
                params![player.as_str()],
                |row| row.get(0),
            )
            .optional()?;
        Ok(user_id)
    }

    fn create_user(&self, player: &PlayerName) -> Result<i64, StoreError> {
        self.conn.execute(
            "INSERT INTO users (username) VALUES (?1)",
            params![player.as_str()],
        )?;
        let user_id = self.conn.last_insert_rowid();
        self.conn.execute(
            "INSERT INTO user_score (user_id, level, score) VALUES (?1, 1, 0)",
            params![user_id],
        )?;
        Ok(user_id)
    }

    pub fn user_count(&self) -> Result<u32, StoreError> {
        let count = self
            .conn
            .query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?;
        Ok(count)
    }
}

impl ProgressStore for SqliteProgressStore {
    fn load(&mut self, player: &PlayerName) -> Result<Option<SavedProgress>, StoreError> {
        let Some(user_id) = self.find_user(player)? else {
            log!("Player {} not found, creating a new record", player);
            self.create_user(player)?;
            return Ok(None);
        };

        let row: Option<(i64, i64)> = self
            .conn
            .query_row(
                "SELECT level, score FROM user_score WHERE user_id = ?1",
                params![user_id],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;

        let Some((level, score)) = row else {
            return Ok(None);
        };
        let level = u32::try_from(level)
            .map_err(|_| StoreError::InvalidRecord(format!("level {} for {}", level, player)))?;
        let score = u32::try_from(score)
            .map_err(|_| StoreError::InvalidRecord(format!("score {} for {}", score, player)))?;
        Ok(Some(SavedProgress::new(level.max(1), score)))
    }

    fn save(&mut self, player: &PlayerName, progress: SavedProgress) -> Result<(), StoreError> {
        let user_id = match self.find_user(player)? {
            Some(user_id) => user_id,
            None => self.create_user(player)?,
        };

        self.conn.execute(
            "INSERT INTO user_score (user_id, level, score) VALUES (?1, ?2, ?3)
             ON CONFLICT (user_id) DO UPDATE SET level = excluded.level, score = excluded.score",
            params![user_id, progress.level, progress.score],
        )?;
        log!(
            "Saved progress for {}: level {}, score {}",
            player,
            progress.level,
            progress.score
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player(name: &str) -> PlayerName {
        PlayerName::parse(name).unwrap()
    }

    #[test]
    fn test_unknown_player_is_registered() {
        let mut store = SqliteProgressStore::open_in_memory().unwrap();
        assert_eq!(store.load(&player("alice")).unwrap(), None);
        assert_eq!(store.user_count().unwrap(), 1);

        assert_eq!(
            store.load(&player("alice")).unwrap(),
            Some(SavedProgress::new(1, 0))
        );
        assert_eq!(store.user_count().unwrap(), 1);
    }

    #[test]
    fn test_save_overwrites_single_row() {
        let mut store = SqliteProgressStore::open_in_memory().unwrap();
        let alice = player("alice");
        store.load(&alice).unwrap();

        store.save(&alice, SavedProgress::new(2, 5)).unwrap();
        store.save(&alice, SavedProgress::new(4, 13)).unwrap();

        assert_eq!(store.load(&alice).unwrap(), Some(SavedProgress::new(4, 13)));
    }

    #[test]
    fn test_save_creates_missing_player() {
        let mut store = SqliteProgressStore::open_in_memory().unwrap();
        let bob = player("bob");
        store.save(&bob, SavedProgress::new(3, 7)).unwrap();
        assert_eq!(store.load(&bob).unwrap(), Some(SavedProgress::new(3, 7)));
    }

    #[test]
    fn test_players_are_isolated() {
        let mut store = SqliteProgressStore::open_in_memory().unwrap();
        store.save(&player("a"), SavedProgress::new(5, 20)).unwrap();
        store.save(&player("b"), SavedProgress::new(2, 4)).unwrap();
        assert_eq!(store.load(&player("a")).unwrap(), Some(SavedProgress::new(5, 20)));
        assert_eq!(store.user_count().unwrap(), 2);
    }

    #[test]
    fn test_unopenable_path_is_unavailable() {
        let path = std::env::temp_dir()
            .join("snake_store_missing_dir_for_test")
            .join("nested")
            .join("scores.db");
        let result = SqliteProgressStore::open(&path);
        assert!(matches!(result, Err(StoreError::Unavailable(_))));
    }
}
