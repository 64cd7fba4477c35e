use serde::{Deserialize, Serialize};

/// A task row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    /// Unix seconds, assigned by the database when the row is inserted.
    pub opened: i64,
    /// Unix seconds, 0 while the task is open.
    pub closed: i64,
    pub author_id: i64,
    pub assigned_id: i64,
    pub title: String,
    pub content: String,
}

impl Task {
    pub fn is_open(&self) -> bool {
        self.closed == 0
    }
}

/// New task input
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTask {
    pub author_id: i64,
    pub assigned_id: i64,
    pub title: String,
    pub content: String,
}

impl From<&Task> for NewTask {
    fn from(task: &Task) -> Self {
        NewTask {
            author_id: task.author_id,
            assigned_id: task.assigned_id,
            title: task.title.clone(),
            content: task.content.clone(),
        }
    }
}

/// A user that tasks can be authored by or assigned to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
}

/// A label attached to tasks through `tasks_labels`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    pub id: i64,
    pub name: String,
}
