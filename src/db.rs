//! SQLite connection pool with foreign keys enforced on every connection.
//!
//! Uses `r2d2` pooling over `r2d2_sqlite`. The [`PragmaCustomizer`] runs on
//! each new connection so foreign keys, the busy timeout and (for writable
//! files) WAL journaling are always in effect.

use crate::config::StoreConfig;
use crate::error::Result;
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::Connection;
use std::time::Duration;
use tracing::debug;

/// Alias for the connection pool type.
pub type ConnectionPool = Pool<SqliteConnectionManager>;

/// Alias for a pooled connection.
pub type PooledConnection = r2d2::PooledConnection<SqliteConnectionManager>;

#[derive(Debug)]
struct PragmaCustomizer {
    busy_timeout_ms: u32,
    wal: bool,
}

impl r2d2::CustomizeConnection<Connection, rusqlite::Error> for PragmaCustomizer {
    fn on_acquire(&self, conn: &mut Connection) -> std::result::Result<(), rusqlite::Error> {
        apply_pragmas(conn, self.busy_timeout_ms, self.wal)
    }
}

fn apply_pragmas(conn: &Connection, busy_timeout_ms: u32, wal: bool) -> rusqlite::Result<()> {
    conn.busy_timeout(Duration::from_millis(u64::from(busy_timeout_ms)))?;
    conn.pragma_update(None, "foreign_keys", "ON")?;
    if wal {
        conn.pragma_update(None, "journal_mode", "WAL")?;
    }
    Ok(())
}

/// Whether connections for this config should switch to WAL journaling.
pub(crate) fn uses_wal(config: &StoreConfig) -> bool {
    !config.is_memory() && !config.read_only
}

/// Build the pool for `config`.
///
/// A single probe connection is opened first so that a bad path or a
/// missing file fails immediately with SQLite's own error instead of
/// after the pool's checkout timeout.
pub fn open_pool(config: &StoreConfig) -> Result<ConnectionPool> {
    let flags = config.open_flags();
    let wal = uses_wal(config);

    if !config.is_memory() {
        let probe = Connection::open_with_flags(&config.database, flags)?;
        apply_pragmas(&probe, config.busy_timeout_ms, wal)?;
        probe.close().map_err(|(_, e)| e)?;
    }

    let manager = if config.is_memory() {
        SqliteConnectionManager::memory().with_flags(flags)
    } else {
        SqliteConnectionManager::file(&config.database).with_flags(flags)
    };

    let mut builder = Pool::builder()
        .max_size(config.effective_pool_size())
        .connection_timeout(config.connect_timeout())
        .connection_customizer(Box::new(PragmaCustomizer {
            busy_timeout_ms: config.busy_timeout_ms,
            wal,
        }));

    // The only copy of an in-memory database is its connection.
    if config.is_memory() {
        builder = builder.idle_timeout(None).max_lifetime(None);
    }

    let pool = builder.build(manager)?;
    debug!(
        database = %config.database.display(),
        pool_size = config.effective_pool_size(),
        "Connection pool ready"
    );
    Ok(pool)
}
