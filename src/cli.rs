use crate::config::StoreConfig;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "taskstore")]
#[command(about = "Task tracking store backed by SQLite")]
#[command(version = "0.1.0")]
pub struct Cli {
    #[command(flatten)]
    pub connection: ConnectionArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Connection flags shared by every command
#[derive(Args, Debug, Clone)]
pub struct ConnectionArgs {
    /// Database file (or :memory:)
    #[arg(long, global = true, env = "TASKSTORE_DB", default_value = "taskstore.db")]
    pub db: PathBuf,

    /// Maximum pooled connections
    #[arg(long, global = true, env = "TASKSTORE_POOL_SIZE", default_value_t = 8)]
    pub pool_size: u32,

    /// SQLite busy timeout in milliseconds
    #[arg(long, global = true, env = "TASKSTORE_BUSY_TIMEOUT_MS", default_value_t = 5000)]
    pub busy_timeout_ms: u32,

    /// Open the database read-only
    #[arg(long, global = true, env = "TASKSTORE_READ_ONLY")]
    pub read_only: bool,
}

impl ConnectionArgs {
    pub fn to_config(&self) -> StoreConfig {
        StoreConfig {
            database: self.db.clone(),
            read_only: self.read_only,
            pool_size: self.pool_size,
            busy_timeout_ms: self.busy_timeout_ms,
            ..StoreConfig::default()
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create the database schema
    Init,

    /// Manage users
    #[command(subcommand)]
    User(UserCommands),

    /// Manage labels
    #[command(subcommand)]
    Label(LabelCommands),

    /// Add a new task
    Add {
        /// Task title
        title: String,
        /// Author user ID
        #[arg(long)]
        author: i64,
        /// Assignee user ID
        #[arg(long)]
        assigned: i64,
        /// Task body
        #[arg(long, default_value = "")]
        content: String,
    },

    /// List tasks
    List {
        /// Only tasks authored by this user ID
        #[arg(long, conflicts_with = "label")]
        author: Option<i64>,
        /// Only tasks carrying this label ID
        #[arg(long)]
        label: Option<i64>,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Show one task
    Show {
        /// Task ID
        id: i64,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Update fields of a task
    Update {
        /// Task ID
        id: i64,
        /// New title
        #[arg(long)]
        title: Option<String>,
        /// New content
        #[arg(long)]
        content: Option<String>,
        /// New author user ID
        #[arg(long)]
        author: Option<i64>,
        /// New assignee user ID
        #[arg(long)]
        assigned: Option<i64>,
        /// Closing time in unix seconds (0 reopens)
        #[arg(long, conflicts_with_all = ["close", "reopen"])]
        closed: Option<i64>,
        /// Close the task now
        #[arg(long, conflicts_with = "reopen")]
        close: bool,
        /// Reopen a closed task
        #[arg(long)]
        reopen: bool,
    },

    /// Delete a task
    Delete {
        /// Task ID
        id: i64,
    },

    /// Attach a label to a task
    Tag {
        /// Task ID
        task: i64,
        /// Label ID
        label: i64,
    },

    /// Remove a label from a task
    Untag {
        /// Task ID
        task: i64,
        /// Label ID
        label: i64,
    },
}

#[derive(Subcommand)]
pub enum UserCommands {
    /// Add a user
    Add {
        /// Display name
        name: String,
    },
    /// List users
    List,
}

#[derive(Subcommand)]
pub enum LabelCommands {
    /// Add a label
    Add {
        /// Label name
        name: String,
    },
    /// List labels
    List,
}
