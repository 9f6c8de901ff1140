use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::{TodoStore, UserStore, EMAIL_TAKEN, USERNAME_TAKEN};
use crate::error::AppError;
use crate::models::{NewUser, Todo, TodoChanges, TodoStats, User};

struct Table<T> {
    last_id: i32,
    rows: BTreeMap<i32, T>,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            last_id: 0,
            rows: BTreeMap::new(),
        }
    }
}

impl<T> Table<T> {
    fn next_id(&mut self) -> i32 {
        self.last_id += 1;
        self.last_id
    }
}

/// In-process store with sequential ids, mirroring the PostgreSQL constraints.
#[derive(Default)]
pub struct MemoryStore {
    users: RwLock<Table<User>>,
    todos: RwLock<Table<Todo>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn insert(&self, user: NewUser) -> Result<User, AppError> {
        let mut users = self.users.write().await;

        if users.rows.values().any(|u| u.email == user.email) {
            return Err(AppError::Conflict(EMAIL_TAKEN.into()));
        }
        if users.rows.values().any(|u| u.username == user.username) {
            return Err(AppError::Conflict(USERNAME_TAKEN.into()));
        }

        let id = users.next_id();
        let user = User {
            id,
            username: user.username,
            email: user.email,
            password_hash: user.password_hash,
            created_at: Utc::now(),
        };
        users.rows.insert(id, user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<User>, AppError> {
        Ok(self.users.read().await.rows.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let users = self.users.read().await;
        Ok(users.rows.values().find(|u| u.email == email).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let users = self.users.read().await;
        Ok(users.rows.values().find(|u| u.username == username).cloned())
    }
}

#[async_trait]
impl TodoStore for MemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn list_for_owner(&self, owner: i32) -> Result<Vec<Todo>, AppError> {
        let todos = self.todos.read().await;
        let mut owned: Vec<Todo> = todos
            .rows
            .values()
            .filter(|t| t.user_id == owner)
            .cloned()
            .collect();
        owned.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(owned)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Todo>, AppError> {
        Ok(self.todos.read().await.rows.get(&id).cloned())
    }

    async fn create(&self, owner: i32, title: &str) -> Result<Todo, AppError> {
        // Same guarantee as the foreign key on todos.user_id.
        if !self.users.read().await.rows.contains_key(&owner) {
            return Err(AppError::StoreUnavailable(format!(
                "todo owner {} does not exist",
                owner
            )));
        }

        let mut todos = self.todos.write().await;
        let id = todos.next_id();
        let now = Utc::now();
        let todo = Todo {
            id,
            user_id: owner,
            title: title.to_string(),
            completed: false,
            created_at: now,
            updated_at: now,
        };
        todos.rows.insert(id, todo.clone());
        Ok(todo)
    }

    async fn update(
        &self,
        id: i32,
        owner: i32,
        changes: TodoChanges,
    ) -> Result<Option<Todo>, AppError> {
        let mut todos = self.todos.write().await;
        let Some(todo) = todos.rows.get_mut(&id).filter(|t| t.user_id == owner) else {
            return Ok(None);
        };

        if let Some(title) = changes.title {
            todo.title = title;
        }
        if let Some(completed) = changes.completed {
            todo.completed = completed;
        }
        todo.updated_at = Utc::now();
        Ok(Some(todo.clone()))
    }

    async fn delete(&self, id: i32, owner: i32) -> Result<bool, AppError> {
        let mut todos = self.todos.write().await;
        match todos.rows.get(&id) {
            Some(todo) if todo.user_id == owner => {
                todos.rows.remove(&id);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn stats(&self, owner: i32) -> Result<TodoStats, AppError> {
        let todos = self.todos.read().await;
        let mut stats = TodoStats::default();
        for todo in todos.rows.values().filter(|t| t.user_id == owner) {
            stats.total += 1;
            if todo.completed {
                stats.completed += 1;
            } else {
                stats.pending += 1;
            }
        }
        Ok(stats)
    }
}
