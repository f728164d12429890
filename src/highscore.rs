//! Persisted high score
//!
//! A single scalar: read once at startup, written once when a run ends with a
//! new best. LocalStorage on the web, a JSON file natively.

use std::cell::Cell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Best score seen so far
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct HighScore {
    pub best: u64,
}

impl HighScore {
    pub fn new(best: u64) -> Self {
        Self { best }
    }

    /// Check if a score beats the stored best
    pub fn qualifies(&self, score: u64) -> bool {
        score > self.best
    }

    /// Keep `score` if it is a new best. Returns true when it was.
    pub fn record(&mut self, score: u64) -> bool {
        if !self.qualifies(score) {
            return false;
        }
        self.best = score;
        true
    }

    /// Read from a store, starting fresh if it cannot be read
    pub fn load(store: &dyn ScoreStore) -> Self {
        match store.load() {
            Ok(best) => {
                log::info!("Loaded high score {}", best);
                Self { best }
            }
            Err(e) => {
                log::warn!("High score unavailable ({}), starting fresh", e);
                Self::default()
            }
        }
    }

    /// Write to a store. Failures are logged, never fatal.
    pub fn save(&self, store: &mut dyn ScoreStore) {
        match store.save(self.best) {
            Ok(()) => log::info!("High score saved ({})", self.best),
            Err(e) => log::warn!("Failed to save high score: {}", e),
        }
    }
}

/// Where the high score lives
pub trait ScoreStore {
    /// Stored best, 0 when nothing has been saved yet
    fn load(&self) -> Result<u64>;
    fn save(&mut self, best: u64) -> Result<()>;
}

/// In-memory store for tests and headless runs. Clones share one slot, so a
/// caller can keep a handle to a store it boxed into a session.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    slot: Rc<Cell<MemorySlot>>,
}

#[derive(Debug, Clone, Copy, Default)]
struct MemorySlot {
    best: u64,
    writes: u32,
}

impl MemoryStore {
    pub fn with_best(best: u64) -> Self {
        Self {
            slot: Rc::new(Cell::new(MemorySlot { best, writes: 0 })),
        }
    }

    pub fn best(&self) -> u64 {
        self.slot.get().best
    }

    /// Number of successful saves
    pub fn writes(&self) -> u32 {
        self.slot.get().writes
    }
}

impl ScoreStore for MemoryStore {
    fn load(&self) -> Result<u64> {
        Ok(self.best())
    }

    fn save(&mut self, best: u64) -> Result<()> {
        let writes = self.writes() + 1;
        self.slot.set(MemorySlot { best, writes });
        Ok(())
    }
}

/// JSON file store (native only)
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone)]
pub struct FileStore {
    path: std::path::PathBuf,
}

#[cfg(not(target_arch = "wasm32"))]
impl FileStore {
    /// Environment variable overriding the file location
    pub const PATH_ENV: &'static str = "VOID_PULSE_HIGH_SCORE";
    const DEFAULT_PATH: &'static str = "void_pulse_high.json";

    pub fn new(path: impl Into<std::path::PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn from_env() -> Self {
        let path = std::env::var_os(Self::PATH_ENV)
            .map(std::path::PathBuf::from)
            .unwrap_or_else(|| Self::DEFAULT_PATH.into());
        Self { path }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl ScoreStore for FileStore {
    fn load(&self) -> Result<u64> {
        match std::fs::read_to_string(&self.path) {
            Ok(json) => Ok(serde_json::from_str::<HighScore>(&json)?.best),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(0),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&mut self, best: u64) -> Result<()> {
        let json = serde_json::to_string(&HighScore { best })?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }
}

/// Browser LocalStorage store (WASM only)
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone, Default)]
pub struct LocalStorageStore;

#[cfg(target_arch = "wasm32")]
impl LocalStorageStore {
    /// LocalStorage key, stored as a plain decimal string
    const STORAGE_KEY: &'static str = "void_pulse_high";

    fn storage() -> Result<web_sys::Storage> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or(crate::error::Error::StorageUnavailable)
    }
}

#[cfg(target_arch = "wasm32")]
impl ScoreStore for LocalStorageStore {
    fn load(&self) -> Result<u64> {
        let storage = Self::storage()?;
        let value = storage
            .get_item(Self::STORAGE_KEY)
            .map_err(|_| crate::error::Error::StorageUnavailable)?;
        // Anything unparsable counts as no score, like a fresh browser
        Ok(value.and_then(|v| v.trim().parse().ok()).unwrap_or(0))
    }

    fn save(&mut self, best: u64) -> Result<()> {
        Self::storage()?
            .set_item(Self::STORAGE_KEY, &best.to_string())
            .map_err(|_| crate::error::Error::StorageUnavailable)
    }
}

/// The platform's persistent store
pub fn default_store() -> Box<dyn ScoreStore> {
    #[cfg(target_arch = "wasm32")]
    {
        Box::new(LocalStorageStore)
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        Box::new(FileStore::from_env())
    }
}
