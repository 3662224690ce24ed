//! High score storage
//!
//! The only persisted value is a single integer. Backends:
//! - `FileStore`: plain-text integer file
//! - `MemoryStore`: in-process store for hosts without a filesystem

use std::path::{Path, PathBuf};

/// Errors from a score backend
#[derive(thiserror::Error, Debug)]
pub enum PersistenceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("stored high score is not an integer: {0:?}")]
    Corrupt(String),
}

/// Backend for the persisted high score
pub trait ScoreStore {
    /// Read the stored high score
    fn load(&self) -> Result<u64, PersistenceError>;

    /// Overwrite the stored high score
    fn save(&mut self, score: u64) -> Result<(), PersistenceError>;
}

/// High score kept as decimal text in a single file
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ScoreStore for FileStore {
    fn load(&self) -> Result<u64, PersistenceError> {
        let text = std::fs::read_to_string(&self.path)?;
        let trimmed = text.trim();
        trimmed
            .parse()
            .map_err(|_| PersistenceError::Corrupt(trimmed.to_string()))
    }

    fn save(&mut self, score: u64) -> Result<(), PersistenceError> {
        std::fs::write(&self.path, score.to_string())?;
        Ok(())
    }
}

/// In-memory store (nothing survives the process)
#[derive(Debug, Default)]
pub struct MemoryStore {
    value: Option<u64>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(score: u64) -> Self {
        Self { value: Some(score) }
    }

    pub fn value(&self) -> Option<u64> {
        self.value
    }
}

impl ScoreStore for MemoryStore {
    fn load(&self) -> Result<u64, PersistenceError> {
        self.value.ok_or_else(|| {
            PersistenceError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "no high score stored",
            ))
        })
    }

    fn save(&mut self, score: u64) -> Result<(), PersistenceError> {
        self.value = Some(score);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(dir.path().join("highscore.txt"));
        store.save(4200).unwrap();
        assert_eq!(store.load().unwrap(), 4200);
    }

    #[test]
    fn test_file_store_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("nope.txt"));
        assert!(matches!(store.load(), Err(PersistenceError::Io(_))));
    }

    #[test]
    fn test_file_store_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("highscore.txt");
        std::fs::write(&path, "lots").unwrap();
        let store = FileStore::new(path);
        assert!(matches!(store.load(), Err(PersistenceError::Corrupt(_))));
    }

    #[test]
    fn test_file_store_tolerates_trailing_newline() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("highscore.txt");
        std::fs::write(&path, "300\n").unwrap();
        assert_eq!(FileStore::new(path).load().unwrap(), 300);
    }

    #[test]
    fn test_memory_store() {
        let mut store = MemoryStore::new();
        assert!(store.load().is_err());
        store.save(7).unwrap();
        assert_eq!(store.load().unwrap(), 7);
    }
}
