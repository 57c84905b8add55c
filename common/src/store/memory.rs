use std::collections::HashMap;

use crate::PlayerName;
use super::{ProgressStore, SavedProgress, StoreError};

#[derive(Default)]
pub struct MemoryProgressStore {
    records: HashMap<PlayerName, SavedProgress>,
}

impl MemoryProgressStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_record(mut self, player: PlayerName, progress: SavedProgress) -> Self {
        self.records.insert(player, progress);
        self
    }
}

impl ProgressStore for MemoryProgressStore {
    fn load(&mut self, player: &PlayerName) -> Result<Option<SavedProgress>, StoreError> {
        Ok(self.records.get(player).copied())
    }

    fn save(&mut self, player: &PlayerName, progress: SavedProgress) -> Result<(), StoreError> {
        self.records.insert(player.clone(), progress);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_then_load() {
        let player = PlayerName::parse("bob").unwrap();
        let mut store = MemoryProgressStore::new();
        assert_eq!(store.load(&player).unwrap(), None);

        store.save(&player, SavedProgress::new(3, 8)).unwrap();
        assert_eq!(store.load(&player).unwrap(), Some(SavedProgress::new(3, 8)));
    }
}
