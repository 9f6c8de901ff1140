//! Storage abstraction for users and todos.
//!
//! Handlers only see the [`UserStore`] and [`TodoStore`] traits. [`PgStore`] is the
//! production backend; [`MemoryStore`] keeps everything in process and backs the
//! test suite and database-less local runs.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;

use crate::error::AppError;
use crate::models::{NewUser, Todo, TodoChanges, TodoStats, User};

pub use memory::MemoryStore;
pub use postgres::PgStore;

pub const EMAIL_TAKEN: &str = "User with this email already exists";
pub const USERNAME_TAKEN: &str = "Username already taken";

/// Persistence for user identities. Username and email are unique.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Inserts a user. A username or email collision yields `AppError::Conflict`.
    async fn insert(&self, user: NewUser) -> Result<User, AppError>;

    async fn find_by_id(&self, id: i32) -> Result<Option<User>, AppError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError>;
}

/// Persistence for todos.
///
/// Mutations take the owner id and only touch rows that belong to it.
#[async_trait]
pub trait TodoStore: Send + Sync {
    /// Short backend name, reported by `/health`.
    fn backend(&self) -> &'static str;

    /// All todos of `owner`, newest first.
    async fn list_for_owner(&self, owner: i32) -> Result<Vec<Todo>, AppError>;

    /// Looks a todo up by id regardless of owner, so callers can tell
    /// "absent" from "not yours".
    async fn find_by_id(&self, id: i32) -> Result<Option<Todo>, AppError>;

    async fn create(&self, owner: i32, title: &str) -> Result<Todo, AppError>;

    /// Applies `changes` and bumps `updated_at`. `None` when no row matched.
    async fn update(
        &self,
        id: i32,
        owner: i32,
        changes: TodoChanges,
    ) -> Result<Option<Todo>, AppError>;

    /// `true` when a row was deleted.
    async fn delete(&self, id: i32, owner: i32) -> Result<bool, AppError>;

    async fn stats(&self, owner: i32) -> Result<TodoStats, AppError>;
}
