use crate::cli::{Commands, LabelCommands, UserCommands};
use crate::models::{NewTask, Task};
use crate::store::TaskStore;
use anyhow::{Context, Result, bail};
use chrono::{DateTime, Utc};

/// Run one parsed command against an open store
pub fn dispatch(store: &TaskStore, command: Commands) -> Result<()> {
    match command {
        Commands::Init => handle_init(store),
        Commands::User(UserCommands::Add { name }) => handle_user_add(store, &name),
        Commands::User(UserCommands::List) => handle_user_list(store),
        Commands::Label(LabelCommands::Add { name }) => handle_label_add(store, &name),
        Commands::Label(LabelCommands::List) => handle_label_list(store),
        Commands::Add {
            title,
            author,
            assigned,
            content,
        } => handle_add(store, &title, author, assigned, &content),
        Commands::List {
            author,
            label,
            json,
        } => handle_list(store, author, label, json),
        Commands::Show { id, json } => handle_show(store, id, json),
        Commands::Update {
            id,
            title,
            content,
            author,
            assigned,
            closed,
            close,
            reopen,
        } => {
            let closed = if close {
                Some(Utc::now().timestamp())
            } else if reopen {
                Some(0)
            } else {
                closed
            };
            let edit = TaskEdit {
                title,
                content,
                author,
                assigned,
                closed,
            };
            handle_update(store, id, edit)
        }
        Commands::Delete { id } => handle_delete(store, id),
        Commands::Tag { task, label } => handle_tag(store, task, label),
        Commands::Untag { task, label } => handle_untag(store, task, label),
    }
}

/// Flags given to `update`; unset fields keep their stored value
#[derive(Debug, Default)]
pub struct TaskEdit {
    pub title: Option<String>,
    pub content: Option<String>,
    pub author: Option<i64>,
    pub assigned: Option<i64>,
    pub closed: Option<i64>,
}

impl TaskEdit {
    fn apply(self, task: &mut Task) {
        if let Some(title) = self.title {
            task.title = title;
        }
        if let Some(content) = self.content {
            task.content = content;
        }
        if let Some(author) = self.author {
            task.author_id = author;
        }
        if let Some(assigned) = self.assigned {
            task.assigned_id = assigned;
        }
        if let Some(closed) = self.closed {
            task.closed = closed;
        }
    }
}

/// Handle the init command
pub fn handle_init(store: &TaskStore) -> Result<()> {
    store.init_schema().context("Failed to create schema")?;
    println!("Initialized task store");
    Ok(())
}

/// Handle the user add command
pub fn handle_user_add(store: &TaskStore, name: &str) -> Result<()> {
    check_initialized(store)?;
    let id = store.create_user(name).context("Failed to create user")?;
    println!("Created user #{id}: {name}");
    Ok(())
}

/// Handle the user list command
pub fn handle_user_list(store: &TaskStore) -> Result<()> {
    check_initialized(store)?;
    let users = store.list_users()?;
    if users.is_empty() {
        println!("No users found.");
    }
    for user in users {
        println!("  [#{:>3}] {}", user.id, user.name);
    }
    Ok(())
}

/// Handle the label add command
pub fn handle_label_add(store: &TaskStore, name: &str) -> Result<()> {
    check_initialized(store)?;
    let id = store.create_label(name).context("Failed to create label")?;
    println!("Created label #{id}: {name}");
    Ok(())
}

/// Handle the label list command
pub fn handle_label_list(store: &TaskStore) -> Result<()> {
    check_initialized(store)?;
    let labels = store.list_labels()?;
    if labels.is_empty() {
        println!("No labels found.");
    }
    for label in labels {
        println!("  [#{:>3}] {}", label.id, label.name);
    }
    Ok(())
}

/// Handle the add command
pub fn handle_add(
    store: &TaskStore,
    title: &str,
    author: i64,
    assigned: i64,
    content: &str,
) -> Result<()> {
    check_initialized(store)?;

    let task = NewTask {
        author_id: author,
        assigned_id: assigned,
        title: title.to_string(),
        content: content.to_string(),
    };
    let id = store.create_task(&task).context("Failed to create task")?;

    println!("Created task #{id}: {title}");
    Ok(())
}

/// Handle the list command
pub fn handle_list(
    store: &TaskStore,
    author: Option<i64>,
    label: Option<i64>,
    json: bool,
) -> Result<()> {
    check_initialized(store)?;

    let tasks = match (author, label) {
        (Some(author), _) => store.list_tasks_by_author(author)?,
        (None, Some(label)) => store.list_tasks_by_label(label)?,
        (None, None) => store.list_tasks()?,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&tasks)?);
        return Ok(());
    }

    if tasks.is_empty() {
        println!("No tasks found.");
        return Ok(());
    }

    for task in &tasks {
        let state = if task.is_open() { "open" } else { "closed" };
        println!(
            "  [#{:>3}] {:<6} {} (author #{}, assigned #{})",
            task.id, state, task.title, task.author_id, task.assigned_id
        );
    }

    Ok(())
}

/// Handle the show command
pub fn handle_show(store: &TaskStore, id: i64, json: bool) -> Result<()> {
    check_initialized(store)?;

    let Some(task) = store.get_task(id)? else {
        bail!("Task #{id} not found");
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&task)?);
        return Ok(());
    }

    println!("[#{}] {}", task.id, task.title);
    println!("Author:    #{}", task.author_id);
    println!("Assigned:  #{}", task.assigned_id);
    println!("Opened:    {}", format_timestamp(task.opened));
    if task.is_open() {
        println!("Closed:    (open)");
    } else {
        println!("Closed:    {}", format_timestamp(task.closed));
    }
    if !task.content.is_empty() {
        println!("Content:   {}", task.content);
    }

    Ok(())
}

/// Handle the update command.
///
/// The store overwrites every mutable column, so the current row is read
/// first and the given flags are laid over it.
pub fn handle_update(store: &TaskStore, id: i64, edit: TaskEdit) -> Result<()> {
    check_initialized(store)?;

    let Some(mut task) = store.get_task(id)? else {
        println!("No task #{id}; nothing updated");
        return Ok(());
    };

    edit.apply(&mut task);
    store.update_task(&task).context("Failed to update task")?;

    println!("Updated task #{}: {}", task.id, task.title);
    Ok(())
}

/// Handle the delete command
pub fn handle_delete(store: &TaskStore, id: i64) -> Result<()> {
    check_initialized(store)?;
    store.delete_task(id).context("Failed to delete task")?;
    println!("Deleted task #{id}");
    Ok(())
}

/// Handle the tag command
pub fn handle_tag(store: &TaskStore, task: i64, label: i64) -> Result<()> {
    check_initialized(store)?;
    store
        .attach_label(task, label)
        .with_context(|| format!("Failed to tag task #{task} with label #{label}"))?;
    println!("Tagged task #{task} with label #{label}");
    Ok(())
}

/// Handle the untag command
pub fn handle_untag(store: &TaskStore, task: i64, label: i64) -> Result<()> {
    check_initialized(store)?;
    store.detach_label(task, label)?;
    println!("Removed label #{label} from task #{task}");
    Ok(())
}

fn format_timestamp(secs: i64) -> String {
    DateTime::<Utc>::from_timestamp(secs, 0)
        .map(|dt| dt.format("%Y-%m-%d %H:%M UTC").to_string())
        .unwrap_or_else(|| secs.to_string())
}

// Helper function
fn check_initialized(store: &TaskStore) -> Result<()> {
    if !store.is_initialized()? {
        bail!("Store not initialized. Run `taskstore init` first.");
    }
    Ok(())
}
