use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use parking_lot::RwLock;

use crate::tprintln;

/// Logical name of the single durable entry holding the bearer token.
pub const TOKEN_KEY: &str = "adminToken";

/// Durable key-value slot for the auth token. The session store is the sole
/// writer; the gateway clears it on 401 and everything else only reads.
pub trait TokenStore: Send + Sync {
    fn load(&self) -> Option<String>;
    fn save(&self, token: &str) -> Result<()>;
    fn clear(&self);
}

/// File-backed store: one JSON object keyed by `adminToken`. No other
/// client-side state is persisted.
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self { Self { path: path.into() } }

    fn read_map(&self) -> BTreeMap<String, String> {
        let Ok(raw) = fs::read_to_string(&self.path) else { return BTreeMap::new(); };
        serde_json::from_str(&raw).unwrap_or_default()
    }

    fn write_map(&self, map: &BTreeMap<String, String>) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
        }
        let raw = serde_json::to_string_pretty(map)?;
        fs::write(&self.path, raw).with_context(|| format!("writing {}", self.path.display()))?;
        Ok(())
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Option<String> {
        self.read_map().get(TOKEN_KEY).cloned().filter(|t| !t.is_empty())
    }

    fn save(&self, token: &str) -> Result<()> {
        let mut map = self.read_map();
        map.insert(TOKEN_KEY.to_string(), token.to_string());
        self.write_map(&map)
    }

    fn clear(&self) {
        // Clearing must never fail the caller; a missing file is already clear.
        let mut map = self.read_map();
        if map.remove(TOKEN_KEY).is_some() {
            if let Err(e) = self.write_map(&map) {
                tprintln!("token.clear write failed: {}", e);
            }
        }
    }
}

/// In-memory store for tests and ephemeral sessions.
#[derive(Default)]
pub struct MemoryTokenStore {
    slot: RwLock<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self { Self::default() }

    pub fn with_token(token: &str) -> Self {
        Self { slot: RwLock::new(Some(token.to_string())) }
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Option<String> { self.slot.read().clone() }
    fn save(&self, token: &str) -> Result<()> { *self.slot.write() = Some(token.to_string()); Ok(()) }
    fn clear(&self) { *self.slot.write() = None; }
}
