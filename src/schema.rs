//! Table definitions for users, labels, tasks and their label association.

use rusqlite::Connection;
use tracing::info;

const CREATE_TABLES: &str = "
    CREATE TABLE IF NOT EXISTS users (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS labels (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS tasks (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        opened INTEGER NOT NULL DEFAULT (CAST(strftime('%s', 'now') AS INTEGER)),
        closed INTEGER NOT NULL DEFAULT 0,
        author_id INTEGER NOT NULL REFERENCES users(id),
        assigned_id INTEGER NOT NULL REFERENCES users(id),
        title TEXT NOT NULL DEFAULT '',
        content TEXT NOT NULL DEFAULT ''
    );

    CREATE TABLE IF NOT EXISTS tasks_labels (
        task_id INTEGER NOT NULL REFERENCES tasks(id) ON DELETE CASCADE,
        label_id INTEGER NOT NULL REFERENCES labels(id) ON DELETE CASCADE,
        PRIMARY KEY (task_id, label_id)
    );
";

const CREATE_INDEXES: &str = "
    CREATE INDEX IF NOT EXISTS idx_tasks_author_id ON tasks(author_id);
    CREATE INDEX IF NOT EXISTS idx_tasks_assigned_id ON tasks(assigned_id);
    CREATE INDEX IF NOT EXISTS idx_tasks_labels_label_id ON tasks_labels(label_id);
";

/// Create every table and index. Safe to run against an existing schema.
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(CREATE_TABLES)?;
    conn.execute_batch(CREATE_INDEXES)?;
    info!("Schema initialized");
    Ok(())
}

/// Check whether the `tasks` table exists
pub fn is_initialized(conn: &Connection) -> rusqlite::Result<bool> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'tasks'",
        [],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}
