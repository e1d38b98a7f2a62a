use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::task::errors::TaskError;
use crate::domain::task::models::Task;
use crate::domain::task::models::TaskId;
use crate::domain::task::ports::TaskRepository;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::models::Username;
use crate::domain::user::ports::UserRepository;
use crate::user::errors::UserError;

/// In-process credential store keyed by username.
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<HashMap<Username, User>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: User) -> Result<User, UserError> {
        // Check and insert under one write lock
        let mut users = self.users.write().await;

        if users.contains_key(&user.username) {
            return Err(UserError::UsernameAlreadyExists(user.username.to_string()));
        }

        users.insert(user.username.clone(), user.clone());

        Ok(user)
    }

    async fn find_by_username(&self, username: &Username) -> Result<Option<User>, UserError> {
        Ok(self.users.read().await.get(username).cloned())
    }

    async fn exists(&self, username: &Username) -> Result<bool, UserError> {
        Ok(self.users.read().await.contains_key(username))
    }

    async fn update(&self, user: User) -> Result<User, UserError> {
        let mut users = self.users.write().await;

        match users.get_mut(&user.username) {
            Some(stored) if stored.id == user.id => {
                stored.logged_in = user.logged_in;
                Ok(user)
            }
            _ => Err(UserError::NotFoundByUsername(user.username.to_string())),
        }
    }
}

/// In-process task store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskRepository {
    tasks: Arc<RwLock<HashMap<TaskId, Task>>>,
}

impl InMemoryTaskRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn create(&self, task: Task) -> Result<Task, TaskError> {
        self.tasks.write().await.insert(task.id, task.clone());
        Ok(task)
    }

    async fn find_all_by_owner(&self, owner: UserId) -> Result<Vec<Task>, TaskError> {
        let mut tasks: Vec<Task> = self
            .tasks
            .read()
            .await
            .values()
            .filter(|task| task.owner_id == owner)
            .cloned()
            .collect();

        tasks.sort_by_key(|task| (task.created_at, task.id));

        Ok(tasks)
    }

    async fn find_by_id_and_owner(
        &self,
        id: TaskId,
        owner: UserId,
    ) -> Result<Option<Task>, TaskError> {
        Ok(self
            .tasks
            .read()
            .await
            .get(&id)
            .filter(|task| task.owner_id == owner)
            .cloned())
    }

    async fn update(&self, task: Task) -> Result<Task, TaskError> {
        let mut tasks = self.tasks.write().await;

        match tasks.get_mut(&task.id) {
            Some(stored) if stored.owner_id == task.owner_id => {
                stored.title = task.title.clone();
                stored.description = task.description.clone();
                stored.completed = task.completed;
                Ok(task)
            }
            _ => Err(TaskError::NotFound(task.id.to_string())),
        }
    }

    async fn delete_by_id_and_owner(&self, id: TaskId, owner: UserId) -> Result<(), TaskError> {
        let mut tasks = self.tasks.write().await;

        if !tasks.get(&id).is_some_and(|task| task.owner_id == owner) {
            return Err(TaskError::NotFound(id.to_string()));
        }

        tasks.remove(&id);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::task::models::CreateTaskCommand;
    use crate::domain::task::models::TaskTitle;

    fn user(name: &str) -> User {
        User::new(Username::new(name.to_string()).unwrap(), "hash".to_string())
    }

    fn task(owner: UserId, title: &str) -> Task {
        Task::new(
            owner,
            CreateTaskCommand {
                title: TaskTitle::new(title.to_string()).unwrap(),
                description: None,
                completed: false,
            },
        )
    }

    #[tokio::test]
    async fn test_create_rejects_duplicate_username() {
        let repository = InMemoryUserRepository::new();

        repository.create(user("alice")).await.unwrap();
        let result = repository.create(user("alice")).await;

        assert!(matches!(
            result.unwrap_err(),
            UserError::UsernameAlreadyExists(_)
        ));
        // Usernames are case-sensitive
        assert!(repository.create(user("Alice")).await.is_ok());
    }

    #[tokio::test]
    async fn test_concurrent_registrations_store_one_record() {
        let repository = InMemoryUserRepository::new();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let repository = repository.clone();
                tokio::spawn(async move { repository.create(user("alice")).await })
            })
            .collect();

        let mut created = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                created += 1;
            }
        }

        assert_eq!(created, 1);
    }

    #[tokio::test]
    async fn test_update_persists_login_flag() {
        let repository = InMemoryUserRepository::new();
        let mut alice = repository.create(user("alice")).await.unwrap();

        alice.logged_in = true;
        repository.update(alice.clone()).await.unwrap();

        let stored = repository
            .find_by_username(&alice.username)
            .await
            .unwrap()
            .unwrap();
        assert!(stored.logged_in);

        let ghost = user("ghost");
        assert!(matches!(
            repository.update(ghost).await.unwrap_err(),
            UserError::NotFoundByUsername(_)
        ));
    }

    #[tokio::test]
    async fn test_task_lookups_are_owner_scoped() {
        let repository = InMemoryTaskRepository::new();
        let alice = UserId::new();
        let bob = UserId::new();

        let a = repository.create(task(alice, "alice's")).await.unwrap();
        repository.create(task(bob, "bob's")).await.unwrap();

        let listed = repository.find_all_by_owner(alice).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, a.id);

        assert!(repository
            .find_by_id_and_owner(a.id, bob)
            .await
            .unwrap()
            .is_none());
        assert!(matches!(
            repository.delete_by_id_and_owner(a.id, bob).await.unwrap_err(),
            TaskError::NotFound(_)
        ));

        let mut hijacked = a.clone();
        hijacked.owner_id = bob;
        assert!(matches!(
            repository.update(hijacked).await.unwrap_err(),
            TaskError::NotFound(_)
        ));

        // Still intact for the real owner
        assert!(repository
            .find_by_id_and_owner(a.id, alice)
            .await
            .unwrap()
            .is_some());
        repository.delete_by_id_and_owner(a.id, alice).await.unwrap();
        assert!(repository.find_all_by_owner(alice).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_is_ordered_by_creation() {
        let repository = InMemoryTaskRepository::new();
        let owner = UserId::new();

        let first = repository.create(task(owner, "first")).await.unwrap();
        let second = repository.create(task(owner, "second")).await.unwrap();

        let ids: Vec<TaskId> = repository
            .find_all_by_owner(owner)
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.id)
            .collect();

        let mut expected = vec![first, second];
        expected.sort_by_key(|t| (t.created_at, t.id));
        assert_eq!(ids, expected.into_iter().map(|t| t.id).collect::<Vec<_>>());
    }
}
