use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions};

use super::{TodoStore, UserStore, EMAIL_TAKEN, USERNAME_TAKEN};
use crate::error::AppError;
use crate::models::{NewUser, Todo, TodoChanges, TodoStats, User};

const USER_COLUMNS: &str = "id, username, email, password_hash, created_at";
const TODO_COLUMNS: &str = "id, user_id, title, completed, created_at, updated_at";

/// PostgreSQL-backed store. Every query is parameterized.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(database_url: &str) -> Result<Self, AppError> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await?;
        Ok(Self::new(pool))
    }

    /// Applies the embedded migrations under `migrations/`.
    pub async fn migrate(&self) -> Result<(), AppError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

/// Maps a unique-constraint violation on `users` to the matching conflict.
fn user_insert_error(error: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_error) = &error {
        if db_error.is_unique_violation() {
            let message = match db_error.constraint() {
                Some(constraint) if constraint.contains("email") => EMAIL_TAKEN,
                _ => USERNAME_TAKEN,
            };
            return AppError::Conflict(message.into());
        }
    }
    AppError::from(error)
}

#[async_trait]
impl UserStore for PgStore {
    async fn insert(&self, user: NewUser) -> Result<User, AppError> {
        let sql = format!(
            "INSERT INTO users (username, email, password_hash) VALUES ($1, $2, $3) RETURNING {}",
            USER_COLUMNS
        );
        sqlx::query_as::<_, User>(&sql)
            .bind(&user.username)
            .bind(&user.email)
            .bind(&user.password_hash)
            .fetch_one(&self.pool)
            .await
            .map_err(user_insert_error)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<User>, AppError> {
        let sql = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
        Ok(sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let sql = format!("SELECT {} FROM users WHERE email = $1", USER_COLUMNS);
        Ok(sqlx::query_as::<_, User>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let sql = format!("SELECT {} FROM users WHERE username = $1", USER_COLUMNS);
        Ok(sqlx::query_as::<_, User>(&sql)
            .bind(username)
            .fetch_optional(&self.pool)
            .await?)
    }
}

#[async_trait]
impl TodoStore for PgStore {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    async fn list_for_owner(&self, owner: i32) -> Result<Vec<Todo>, AppError> {
        let sql = format!(
            "SELECT {} FROM todos WHERE user_id = $1 ORDER BY created_at DESC, id DESC",
            TODO_COLUMNS
        );
        Ok(sqlx::query_as::<_, Todo>(&sql)
            .bind(owner)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Todo>, AppError> {
        let sql = format!("SELECT {} FROM todos WHERE id = $1", TODO_COLUMNS);
        Ok(sqlx::query_as::<_, Todo>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn create(&self, owner: i32, title: &str) -> Result<Todo, AppError> {
        let sql = format!(
            "INSERT INTO todos (user_id, title) VALUES ($1, $2) RETURNING {}",
            TODO_COLUMNS
        );
        Ok(sqlx::query_as::<_, Todo>(&sql)
            .bind(owner)
            .bind(title)
            .fetch_one(&self.pool)
            .await?)
    }

    async fn update(
        &self,
        id: i32,
        owner: i32,
        changes: TodoChanges,
    ) -> Result<Option<Todo>, AppError> {
        let sql = format!(
            "UPDATE todos \
             SET title = COALESCE($1, title), completed = COALESCE($2, completed), updated_at = NOW() \
             WHERE id = $3 AND user_id = $4 \
             RETURNING {}",
            TODO_COLUMNS
        );
        Ok(sqlx::query_as::<_, Todo>(&sql)
            .bind(changes.title)
            .bind(changes.completed)
            .bind(id)
            .bind(owner)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn delete(&self, id: i32, owner: i32) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM todos WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(owner)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn stats(&self, owner: i32) -> Result<TodoStats, AppError> {
        Ok(sqlx::query_as::<_, TodoStats>(
            "SELECT COUNT(*) AS total, \
                    COUNT(*) FILTER (WHERE completed) AS completed, \
                    COUNT(*) FILTER (WHERE NOT completed) AS pending \
             FROM todos WHERE user_id = $1",
        )
        .bind(owner)
        .fetch_one(&self.pool)
        .await?)
    }
}
