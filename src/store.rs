use crate::config::StoreConfig;
use crate::db::{self, ConnectionPool, PooledConnection};
use crate::error::Result;
use crate::models::{Label, NewTask, Task, User};
use crate::schema;
use rusqlite::{OptionalExtension, Params, Row};
use std::path::PathBuf;
use tracing::{debug, info, warn};

const TASK_COLUMNS: &str = "id, opened, closed, author_id, assigned_id, title, content";

/// Data-access handle for tasks, users and labels.
///
/// Each method runs exactly one SQL statement on a pooled connection and
/// maps the result. The store is `Send + Sync`; share it by reference or
/// behind an `Arc`.
pub struct TaskStore {
    pool: ConnectionPool,
    database: PathBuf,
    wal: bool,
}

impl TaskStore {
    /// Open a store for the database described by `config`.
    pub fn open(config: &StoreConfig) -> Result<Self> {
        let pool = db::open_pool(config)?;
        info!(database = %config.database.display(), "Task store opened");
        Ok(TaskStore {
            pool,
            database: config.database.clone(),
            wal: db::uses_wal(config),
        })
    }

    fn conn(&self) -> Result<PooledConnection> {
        Ok(self.pool.get()?)
    }

    /// Create the tables if they do not exist yet
    pub fn init_schema(&self) -> Result<()> {
        let conn = self.conn()?;
        schema::init_schema(&conn)?;
        Ok(())
    }

    /// Whether the `tasks` table exists
    pub fn is_initialized(&self) -> Result<bool> {
        let conn = self.conn()?;
        Ok(schema::is_initialized(&conn)?)
    }

    // ==================== Task Operations ====================

    /// Insert a task and return its id.
    ///
    /// `opened` comes from the database clock and `closed` starts at 0.
    pub fn create_task(&self, task: &NewTask) -> Result<i64> {
        let conn = self.conn()?;
        let id: i64 = conn.query_row(
            "INSERT INTO tasks (opened, closed, author_id, assigned_id, title, content)
             VALUES (CAST(strftime('%s', 'now') AS INTEGER), 0, ?1, ?2, ?3, ?4)
             RETURNING id",
            (task.author_id, task.assigned_id, &task.title, &task.content),
            |row| row.get(0),
        )?;
        debug!(id, author_id = task.author_id, "Created task");
        Ok(id)
    }

    /// Fetch one task by id
    pub fn get_task(&self, id: i64) -> Result<Option<Task>> {
        let conn = self.conn()?;
        let task = conn
            .query_row(
                &format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?1"),
                [id],
                task_from_row,
            )
            .optional()?;
        Ok(task)
    }

    /// All tasks, in whatever order SQLite yields them.
    pub fn list_tasks(&self) -> Result<Vec<Task>> {
        self.query_tasks(&format!("SELECT {TASK_COLUMNS} FROM tasks"), [])
    }

    /// Tasks written by `author_id`; empty for unknown authors.
    pub fn list_tasks_by_author(&self, author_id: i64) -> Result<Vec<Task>> {
        self.query_tasks(
            &format!("SELECT {TASK_COLUMNS} FROM tasks WHERE author_id = ?1"),
            [author_id],
        )
    }

    /// Tasks linked to `label_id` through `tasks_labels`.
    pub fn list_tasks_by_label(&self, label_id: i64) -> Result<Vec<Task>> {
        self.query_tasks(
            "SELECT t.id, t.opened, t.closed, t.author_id, t.assigned_id, t.title, t.content
             FROM tasks t
             JOIN tasks_labels tl ON t.id = tl.task_id
             WHERE tl.label_id = ?1",
            [label_id],
        )
    }

    /// Overwrite `closed`, `author_id`, `assigned_id`, `title` and `content`
    /// of the row with `task.id`. `id` and `opened` are never written.
    ///
    /// An id that matches no row is not an error: nothing changes and this
    /// returns `Ok(())`.
    pub fn update_task(&self, task: &Task) -> Result<()> {
        let conn = self.conn()?;
        let rows = conn.execute(
            "UPDATE tasks
             SET closed = ?1, author_id = ?2, assigned_id = ?3, title = ?4, content = ?5
             WHERE id = ?6",
            (
                task.closed,
                task.author_id,
                task.assigned_id,
                &task.title,
                &task.content,
                task.id,
            ),
        )?;
        if rows == 0 {
            warn!(id = task.id, "Update matched no task");
        } else {
            debug!(id = task.id, "Updated task");
        }
        Ok(())
    }

    /// Delete the task with `id`. Deleting a missing id is a no-op.
    ///
    /// Label associations go with it through `ON DELETE CASCADE`.
    pub fn delete_task(&self, id: i64) -> Result<()> {
        let conn = self.conn()?;
        let rows = conn.execute("DELETE FROM tasks WHERE id = ?1", [id])?;
        if rows == 0 {
            warn!(id, "Delete matched no task");
        } else {
            debug!(id, "Deleted task");
        }
        Ok(())
    }

    fn query_tasks<P: Params>(&self, sql: &str, params: P) -> Result<Vec<Task>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(sql)?;
        let tasks = stmt
            .query_map(params, task_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        debug!(count = tasks.len(), "Listed tasks");
        Ok(tasks)
    }

    // ==================== User Operations ====================

    /// Insert a user and return its id
    pub fn create_user(&self, name: &str) -> Result<i64> {
        let conn = self.conn()?;
        let id: i64 = conn.query_row(
            "INSERT INTO users (name) VALUES (?1) RETURNING id",
            [name],
            |row| row.get(0),
        )?;
        debug!(id, user = name, "Created user");
        Ok(id)
    }

    /// All users, by id
    pub fn list_users(&self) -> Result<Vec<User>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare("SELECT id, name FROM users ORDER BY id")?;
        let users = stmt
            .query_map([], |row| {
                Ok(User {
                    id: row.get(0)?,
                    name: row.get(1)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(users)
    }

    // ==================== Label Operations ====================

    /// Insert a label and return its id
    pub fn create_label(&self, name: &str) -> Result<i64> {
        let conn = self.conn()?;
        let id: i64 = conn.query_row(
            "INSERT INTO labels (name) VALUES (?1) RETURNING id",
            [name],
            |row| row.get(0),
        )?;
        debug!(id, label = name, "Created label");
        Ok(id)
    }

    /// All labels, by id
    pub fn list_labels(&self) -> Result<Vec<Label>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare("SELECT id, name FROM labels ORDER BY id")?;
        let labels = stmt
            .query_map([], |row| {
                Ok(Label {
                    id: row.get(0)?,
                    name: row.get(1)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(labels)
    }

    /// Associate a label with a task. Attaching twice is harmless; an unknown
    /// task or label is a constraint error. Works without a key on
    /// `tasks_labels`.
    pub fn attach_label(&self, task_id: i64, label_id: i64) -> Result<()> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO tasks_labels (task_id, label_id)
             SELECT ?1, ?2
             WHERE NOT EXISTS (
                 SELECT 1 FROM tasks_labels WHERE task_id = ?1 AND label_id = ?2
             )",
            (task_id, label_id),
        )?;
        debug!(task_id, label_id, "Attached label");
        Ok(())
    }

    /// Remove a label from a task. No-op when they were not associated.
    pub fn detach_label(&self, task_id: i64, label_id: i64) -> Result<()> {
        let conn = self.conn()?;
        let rows = conn.execute(
            "DELETE FROM tasks_labels WHERE task_id = ?1 AND label_id = ?2",
            (task_id, label_id),
        )?;
        debug!(task_id, label_id, rows, "Detached label");
        Ok(())
    }

    // ==================== Lifecycle ====================

    /// Release the connection handle.
    ///
    /// Writable file databases get a final WAL checkpoint first, which is the
    /// only step here that can fail. Dropping the store without calling this
    /// still releases every connection.
    pub fn close(self) -> Result<()> {
        if self.wal {
            let conn = self.conn()?;
            conn.query_row("PRAGMA wal_checkpoint(TRUNCATE)", [], |_| Ok(()))?;
        }
        info!(database = %self.database.display(), "Task store closed");
        Ok(())
    }
}

// ==================== Row Parsers ====================

fn task_from_row(row: &Row) -> std::result::Result<Task, rusqlite::Error> {
    Ok(Task {
        id: row.get(0)?,
        opened: row.get(1)?,
        closed: row.get::<_, Option<i64>>(2)?.unwrap_or(0),
        author_id: row.get(3)?,
        assigned_id: row.get(4)?,
        title: row.get::<_, Option<String>>(5)?.unwrap_or_default(),
        content: row.get::<_, Option<String>>(6)?.unwrap_or_default(),
    })
}
