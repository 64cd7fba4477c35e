//! Connection descriptor for the task store.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Path that selects a private in-memory database.
pub const MEMORY_DATABASE: &str = ":memory:";

/// Where the store's database lives and how its connections behave.
///
/// The store is embedded SQLite, so a descriptor is a file path plus
/// connection options. Host, credentials and transport encryption do not
/// apply and have no fields here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Database file, or `:memory:`.
    pub database: PathBuf,
    /// Create the file when it does not exist yet.
    pub create_if_missing: bool,
    /// Open every connection read-only.
    pub read_only: bool,
    /// Maximum pooled connections (default: 8).
    pub pool_size: u32,
    /// SQLite busy timeout in milliseconds (default: 5000).
    pub busy_timeout_ms: u32,
    /// How long a caller waits for a pooled connection (default: 5000).
    pub connect_timeout_ms: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            database: PathBuf::from("taskstore.db"),
            create_if_missing: true,
            read_only: false,
            pool_size: 8,
            busy_timeout_ms: 5_000,
            connect_timeout_ms: 5_000,
        }
    }
}

impl StoreConfig {
    /// Config for a database file, everything else defaulted.
    pub fn at<P: AsRef<Path>>(path: P) -> Self {
        Self {
            database: path.as_ref().to_path_buf(),
            ..Self::default()
        }
    }

    /// Config for a private in-memory database.
    pub fn in_memory() -> Self {
        Self::at(MEMORY_DATABASE)
    }

    pub fn is_memory(&self) -> bool {
        self.database.as_os_str() == MEMORY_DATABASE
    }

    /// Pool size actually used. An in-memory database exists per connection,
    /// so it is pinned to a single one.
    pub fn effective_pool_size(&self) -> u32 {
        if self.is_memory() {
            1
        } else {
            self.pool_size.max(1)
        }
    }

    /// Pool checkout deadline, never shorter than 1ms.
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms.max(1))
    }

    pub(crate) fn open_flags(&self) -> rusqlite::OpenFlags {
        use rusqlite::OpenFlags;

        let mut flags = OpenFlags::SQLITE_OPEN_URI | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        if self.read_only {
            flags |= OpenFlags::SQLITE_OPEN_READ_ONLY;
        } else {
            flags |= OpenFlags::SQLITE_OPEN_READ_WRITE;
            if self.create_if_missing {
                flags |= OpenFlags::SQLITE_OPEN_CREATE;
            }
        }
        flags
    }
}
