use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::PgPool;
use sqlx::Row;

use crate::domain::task::errors::TaskError;
use crate::domain::task::models::Task;
use crate::domain::task::models::TaskId;
use crate::domain::task::models::TaskTitle;
use crate::domain::task::ports::TaskRepository;
use crate::domain::user::models::UserId;

pub struct PostgresTaskRepository {
    pool: PgPool,
}

impl PostgresTaskRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn task_from_row(row: &PgRow) -> Result<Task, TaskError> {
    let db = |e: sqlx::Error| TaskError::DatabaseError(e.to_string());

    Ok(Task {
        id: TaskId(row.try_get("id").map_err(db)?),
        title: TaskTitle::new(row.try_get("title").map_err(db)?)?,
        description: row.try_get("description").map_err(db)?,
        completed: row.try_get("completed").map_err(db)?,
        owner_id: UserId(row.try_get("owner_id").map_err(db)?),
        created_at: row.try_get("created_at").map_err(db)?,
    })
}

#[async_trait]
impl TaskRepository for PostgresTaskRepository {
    async fn create(&self, task: Task) -> Result<Task, TaskError> {
        sqlx::query(
            r#"
            INSERT INTO tasks (id, title, description, completed, owner_id, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(task.id.0)
        .bind(task.title.as_str())
        .bind(task.description.as_deref())
        .bind(task.completed)
        .bind(task.owner_id.0)
        .bind(task.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| TaskError::DatabaseError(e.to_string()))?;

        Ok(task)
    }

    async fn find_all_by_owner(&self, owner: UserId) -> Result<Vec<Task>, TaskError> {
        let rows = sqlx::query(
            r#"
            SELECT id, title, description, completed, owner_id, created_at
            FROM tasks
            WHERE owner_id = $1
            ORDER BY created_at, id
            "#,
        )
        .bind(owner.0)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| TaskError::DatabaseError(e.to_string()))?;

        rows.iter().map(task_from_row).collect()
    }

    async fn find_by_id_and_owner(
        &self,
        id: TaskId,
        owner: UserId,
    ) -> Result<Option<Task>, TaskError> {
        let row = sqlx::query(
            r#"
            SELECT id, title, description, completed, owner_id, created_at
            FROM tasks
            WHERE id = $1 AND owner_id = $2
            "#,
        )
        .bind(id.0)
        .bind(owner.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| TaskError::DatabaseError(e.to_string()))?;

        row.as_ref().map(task_from_row).transpose()
    }

    async fn update(&self, task: Task) -> Result<Task, TaskError> {
        let result = sqlx::query(
            r#"
            UPDATE tasks
            SET title = $3, description = $4, completed = $5
            WHERE id = $1 AND owner_id = $2
            "#,
        )
        .bind(task.id.0)
        .bind(task.owner_id.0)
        .bind(task.title.as_str())
        .bind(task.description.as_deref())
        .bind(task.completed)
        .execute(&self.pool)
        .await
        .map_err(|e| TaskError::DatabaseError(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(TaskError::NotFound(task.id.to_string()));
        }

        Ok(task)
    }

    async fn delete_by_id_and_owner(&self, id: TaskId, owner: UserId) -> Result<(), TaskError> {
        let result = sqlx::query(
            r#"
            DELETE FROM tasks
            WHERE id = $1 AND owner_id = $2
            "#,
        )
        .bind(id.0)
        .bind(owner.0)
        .execute(&self.pool)
        .await
        .map_err(|e| TaskError::DatabaseError(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(TaskError::NotFound(id.to_string()));
        }

        Ok(())
    }
}
