use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::task::errors::TaskError;
use crate::domain::task::models::CreateTaskCommand;
use crate::domain::task::models::Task;
use crate::domain::task::models::TaskId;
use crate::domain::task::models::UpdateTaskCommand;
use crate::domain::task::ports::TaskRepository;
use crate::domain::task::ports::TaskServicePort;
use crate::domain::user::models::UserId;

/// Domain service for owner-scoped task management.
pub struct TaskService<TR>
where
    TR: TaskRepository,
{
    repository: Arc<TR>,
}

impl<TR> TaskService<TR>
where
    TR: TaskRepository,
{
    pub fn new(repository: Arc<TR>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl<TR> TaskServicePort for TaskService<TR>
where
    TR: TaskRepository,
{
    async fn create_task(
        &self,
        owner: UserId,
        command: CreateTaskCommand,
    ) -> Result<Task, TaskError> {
        let task = self.repository.create(Task::new(owner, command)).await?;

        tracing::info!(task_id = %task.id, owner_id = %owner, "Task created");

        Ok(task)
    }

    async fn list_tasks(&self, owner: UserId) -> Result<Vec<Task>, TaskError> {
        self.repository.find_all_by_owner(owner).await
    }

    async fn get_task(&self, id: TaskId, owner: UserId) -> Result<Task, TaskError> {
        self.repository
            .find_by_id_and_owner(id, owner)
            .await?
            .ok_or_else(|| TaskError::NotFound(id.to_string()))
    }

    async fn update_task(
        &self,
        id: TaskId,
        owner: UserId,
        command: UpdateTaskCommand,
    ) -> Result<Task, TaskError> {
        let mut task = self.get_task(id, owner).await?;
        task.apply(command);

        let task = self.repository.update(task).await?;

        tracing::info!(task_id = %task.id, owner_id = %owner, "Task updated");

        Ok(task)
    }

    async fn delete_task(&self, id: TaskId, owner: UserId) -> Result<(), TaskError> {
        self.get_task(id, owner).await?;
        self.repository.delete_by_id_and_owner(id, owner).await?;

        tracing::info!(task_id = %id, owner_id = %owner, "Task deleted");

        Ok(())
    }
}
