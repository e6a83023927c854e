//! Application state shared across handlers.
//!
//! This module owns:
//!   - the SQLite room store (behind an async mutex; rusqlite is sync)
//!   - the author settings store backing the WS save/load messages
//!
//! Preview sessions are deliberately NOT here: each WebSocket connection
//! owns its own `PreviewSession`, so there is no cross-connection mutable
//! state to coordinate.

use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::Result;
use tokio::sync::Mutex;
use tracing::{info, instrument};

use crate::config::AppConfig;
use crate::session::MemorySettings;
use crate::store::RoomStore;

pub struct AppState {
    pub store: Mutex<RoomStore>,
    pub settings: Mutex<MemorySettings>,
}

impl AppState {
    /// Open (or create) the database and report the startup inventory.
    #[instrument(level = "info", skip_all)]
    pub fn new(cfg: &AppConfig) -> Result<Self> {
        let mut store = RoomStore::open(&cfg.database_path)?;
        store.init()?;
        let existing = store.list()?.len();
        info!(target: "rooms", path = %cfg.database_path, rooms = existing, "Room store ready");
        Ok(Self {
            store: Mutex::new(store),
            settings: Mutex::new(MemorySettings::default()),
        })
    }

    #[cfg(test)]
    pub fn in_memory() -> Self {
        let mut store = RoomStore::open_in_memory().expect("in-memory sqlite");
        store.init().expect("schema");
        Self {
            store: Mutex::new(store),
            settings: Mutex::new(MemorySettings::default()),
        }
    }
}

/// Wall clock in unix milliseconds, used for record timestamps and as the
/// preview session clock source.
pub fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
