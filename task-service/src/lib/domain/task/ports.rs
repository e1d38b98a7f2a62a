use async_trait::async_trait;

use crate::domain::task::errors::TaskError;
use crate::domain::task::models::CreateTaskCommand;
use crate::domain::task::models::Task;
use crate::domain::task::models::TaskId;
use crate::domain::task::models::UpdateTaskCommand;
use crate::domain::user::models::UserId;

/// Port for owner-scoped task operations.
///
/// Every operation takes the authenticated owner; there is no anonymous path.
#[async_trait]
pub trait TaskServicePort: Send + Sync + 'static {
    /// Create a task owned by `owner`.
    ///
    /// # Returns
    /// Stored task with a generated identifier
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn create_task(&self, owner: UserId, command: CreateTaskCommand)
        -> Result<Task, TaskError>;

    /// List exactly the tasks owned by `owner`, oldest first.
    async fn list_tasks(&self, owner: UserId) -> Result<Vec<Task>, TaskError>;

    /// Retrieve one of `owner`'s tasks.
    ///
    /// # Errors
    /// * `NotFound` - Task does not exist or belongs to another owner
    /// * `DatabaseError` - Database operation failed
    async fn get_task(&self, id: TaskId, owner: UserId) -> Result<Task, TaskError>;

    /// Overwrite title, description and completed flag of one of `owner`'s tasks.
    ///
    /// # Errors
    /// * `NotFound` - Task does not exist or belongs to another owner
    /// * `DatabaseError` - Database operation failed
    async fn update_task(
        &self,
        id: TaskId,
        owner: UserId,
        command: UpdateTaskCommand,
    ) -> Result<Task, TaskError>;

    /// Delete one of `owner`'s tasks.
    ///
    /// # Errors
    /// * `NotFound` - Task does not exist or belongs to another owner
    /// * `DatabaseError` - Database operation failed
    async fn delete_task(&self, id: TaskId, owner: UserId) -> Result<(), TaskError>;
}

/// Resource store for tasks.
///
/// Lookups, updates and deletes all carry the owner in their predicate; the
/// port has no unscoped access path.
#[async_trait]
pub trait TaskRepository: Send + Sync + 'static {
    /// Persist a new task.
    async fn create(&self, task: Task) -> Result<Task, TaskError>;

    /// Retrieve all tasks of `owner` ordered by creation time, then ID.
    async fn find_all_by_owner(&self, owner: UserId) -> Result<Vec<Task>, TaskError>;

    /// Retrieve the task matching both `id` and `owner`.
    ///
    /// # Returns
    /// Optional task (None if missing or owned by someone else)
    async fn find_by_id_and_owner(
        &self,
        id: TaskId,
        owner: UserId,
    ) -> Result<Option<Task>, TaskError>;

    /// Persist mutations of a task, matching on its ID and owner.
    ///
    /// # Errors
    /// * `NotFound` - No row matched
    async fn update(&self, task: Task) -> Result<Task, TaskError>;

    /// Remove the task matching both `id` and `owner`.
    ///
    /// # Errors
    /// * `NotFound` - No row matched
    async fn delete_by_id_and_owner(&self, id: TaskId, owner: UserId) -> Result<(), TaskError>;
}
