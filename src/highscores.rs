//! High score record
//!
//! Loaded once at startup and compared against the final score at game over.

use crate::persistence::ScoreStore;

/// Best score seen across sessions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HighScore {
    pub best: u64,
}

impl HighScore {
    /// Load from a store; any read failure starts fresh at 0
    pub fn load(store: &dyn ScoreStore) -> Self {
        match store.load() {
            Ok(best) => {
                log::info!("Loaded high score {best}");
                Self { best }
            }
            Err(e) => {
                log::info!("No high score found, starting fresh ({e})");
                Self::default()
            }
        }
    }

    /// Check if a score beats the record
    pub fn qualifies(&self, score: u64) -> bool {
        score > self.best
    }

    /// Record a final score. Returns true (and persists) on a new record.
    ///
    /// A failed write keeps the in-memory record and is only logged.
    pub fn submit(&mut self, score: u64, store: &mut dyn ScoreStore) -> bool {
        if !self.qualifies(score) {
            return false;
        }
        self.best = score;
        match store.save(score) {
            Ok(()) => log::info!("New high score {score} saved"),
            Err(e) => log::warn!("New high score {score} could not be saved: {e}"),
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::{FileStore, MemoryStore};

    #[test]
    fn test_missing_store_defaults_to_zero() {
        let store = MemoryStore::new();
        assert_eq!(HighScore::load(&store).best, 0);
    }

    #[test]
    fn test_submit_only_on_improvement() {
        let mut store = MemoryStore::with_value(500);
        let mut hs = HighScore::load(&store);
        assert!(!hs.submit(500, &mut store));
        assert!(!hs.submit(100, &mut store));
        assert!(hs.submit(501, &mut store));
        assert_eq!(hs.best, 501);
        assert_eq!(store.value(), Some(501));
    }

    #[test]
    fn test_record_survives_restart() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("highscore.txt");

        let mut store = FileStore::new(&path);
        let mut hs = HighScore::load(&store);
        assert_eq!(hs.best, 0);
        assert!(hs.submit(1300, &mut store));

        // Next "startup"
        let store = FileStore::new(&path);
        assert_eq!(HighScore::load(&store).best, 1300);
    }

    #[test]
    fn test_corrupt_file_defaults_to_zero() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("highscore.txt");
        std::fs::write(&path, "garbage").unwrap();
        assert_eq!(HighScore::load(&FileStore::new(path)).best, 0);
    }
}
