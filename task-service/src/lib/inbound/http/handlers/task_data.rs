use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use crate::domain::task::errors::TaskError;
use crate::domain::task::models::CreateTaskCommand;
use crate::domain::task::models::Task;
use crate::domain::task::models::TaskTitle;
use crate::domain::task::models::UpdateTaskCommand;
use crate::domain::user::models::Username;

/// HTTP request body shared by task creation and full update (raw JSON)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TaskRequestBody {
    // Missing and blank titles fail the same validation
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    completed: bool,
}

impl TaskRequestBody {
    pub fn try_into_create_command(self) -> Result<CreateTaskCommand, TaskError> {
        Ok(CreateTaskCommand {
            title: TaskTitle::new(self.title)?,
            description: self.description,
            completed: self.completed,
        })
    }

    pub fn try_into_update_command(self) -> Result<UpdateTaskCommand, TaskError> {
        Ok(UpdateTaskCommand {
            title: TaskTitle::new(self.title)?,
            description: self.description,
            completed: self.completed,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskResponseData {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
    pub owner: String,
    pub created_at: DateTime<Utc>,
}

impl TaskResponseData {
    /// `owner` is the caller's username; tasks are only ever shown to their owner.
    pub fn new(task: &Task, owner: &Username) -> Self {
        Self {
            id: task.id.to_string(),
            title: task.title.as_str().to_string(),
            description: task.description.clone(),
            completed: task.completed,
            owner: owner.as_str().to_string(),
            created_at: task.created_at,
        }
    }
}
