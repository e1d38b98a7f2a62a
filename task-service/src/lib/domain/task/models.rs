use std::fmt;

use chrono::DateTime;
use chrono::SubsecRound;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::task::errors::TaskIdError;
use crate::domain::task::errors::TaskTitleError;
use crate::domain::user::models::UserId;

/// Task aggregate.
///
/// `owner_id` is fixed at creation; no operation transfers a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub id: TaskId,
    pub title: TaskTitle,
    pub description: Option<String>,
    pub completed: bool,
    pub owner_id: UserId,
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// Build a new task owned by `owner_id` from a create command.
    pub fn new(owner_id: UserId, command: CreateTaskCommand) -> Self {
        Self {
            id: TaskId::new(),
            title: command.title,
            description: command.description,
            completed: command.completed,
            owner_id,
            // Postgres stores microseconds
            created_at: Utc::now().trunc_subsecs(6),
        }
    }

    /// Overwrite the mutable fields. Identity and ownership are untouched.
    pub fn apply(&mut self, command: UpdateTaskCommand) {
        self.title = command.title;
        self.description = command.description;
        self.completed = command.completed;
    }
}

/// Task unique identifier value object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(pub Uuid);

impl TaskId {
    /// Generate a new random task ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a task ID from string.
    ///
    /// # Errors
    /// * `InvalidFormat` - String is not a valid UUID
    pub fn from_string(s: &str) -> Result<Self, TaskIdError> {
        Uuid::parse_str(s)
            .map(TaskId)
            .map_err(|e| TaskIdError::InvalidFormat(e.to_string()))
    }
}

impl Default for TaskId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Task title value object.
///
/// Non-blank, at most 255 characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskTitle(String);

impl TaskTitle {
    const MAX_LENGTH: usize = 255;

    /// Create a new validated title.
    ///
    /// # Errors
    /// * `Empty` - Title is empty or whitespace only
    /// * `TooLong` - Title exceeds 255 characters
    pub fn new(title: String) -> Result<Self, TaskTitleError> {
        if title.trim().is_empty() {
            return Err(TaskTitleError::Empty);
        }

        let length = title.chars().count();
        if length > Self::MAX_LENGTH {
            Err(TaskTitleError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            })
        } else {
            Ok(Self(title))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Command to create a task for the authenticated owner
#[derive(Debug, Clone)]
pub struct CreateTaskCommand {
    pub title: TaskTitle,
    pub description: Option<String>,
    pub completed: bool,
}

/// Command to overwrite a task's title, description and completed flag.
///
/// Every field is replaced; an absent description clears the stored one.
#[derive(Debug, Clone)]
pub struct UpdateTaskCommand {
    pub title: TaskTitle,
    pub description: Option<String>,
    pub completed: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_validation() {
        assert_eq!(TaskTitle::new(String::new()), Err(TaskTitleError::Empty));
        assert_eq!(TaskTitle::new("  \t".to_string()), Err(TaskTitleError::Empty));
        assert!(matches!(
            TaskTitle::new("x".repeat(256)),
            Err(TaskTitleError::TooLong { max: 255, .. })
        ));
        assert_eq!(
            TaskTitle::new("buy milk".to_string()).unwrap().as_str(),
            "buy milk"
        );
    }

    #[test]
    fn test_task_id_parsing() {
        let id = TaskId::new();
        assert_eq!(TaskId::from_string(&id.to_string()), Ok(id));
        assert!(TaskId::from_string("42").is_err());
    }

    #[test]
    fn test_created_at_has_microsecond_precision() {
        let task = Task::new(
            UserId::new(),
            CreateTaskCommand {
                title: TaskTitle::new("buy milk".to_string()).unwrap(),
                description: None,
                completed: false,
            },
        );

        assert_eq!(task.created_at.timestamp_subsec_nanos() % 1_000, 0);
    }

    #[test]
    fn test_apply_keeps_identity_and_owner() {
        let owner = UserId::new();
        let mut task = Task::new(
            owner,
            CreateTaskCommand {
                title: TaskTitle::new("buy milk".to_string()).unwrap(),
                description: Some("2 liters".to_string()),
                completed: false,
            },
        );
        let id = task.id;

        task.apply(UpdateTaskCommand {
            title: TaskTitle::new("buy oat milk".to_string()).unwrap(),
            description: None,
            completed: true,
        });

        assert_eq!(task.id, id);
        assert_eq!(task.owner_id, owner);
        assert_eq!(task.title.as_str(), "buy oat milk");
        assert!(task.description.is_none());
        assert!(task.completed);
    }
}
