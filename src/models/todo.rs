use std::borrow::Cow;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::{Validate, ValidationError};

/// Maximum title length, counted after trimming.
pub const MAX_TITLE_LEN: usize = 255;

/// Represents a todo entity as stored in the database and returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq, Eq)]
pub struct Todo {
    /// Unique identifier for the todo.
    pub id: i32,
    /// Identifier of the user who owns the todo.
    pub user_id: i32,
    /// The title of the todo, stored trimmed.
    pub title: String,
    /// Whether the todo has been completed. New todos start out pending.
    pub completed: bool,
    /// Timestamp of when the todo was created.
    pub created_at: DateTime<Utc>,
    /// Timestamp of the last update to the todo.
    pub updated_at: DateTime<Utc>,
}

/// Request body for creating a todo.
#[derive(Debug, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct CreateTodoRequest {
    /// 1 to 255 characters once surrounding whitespace is removed.
    #[validate(custom = "validate_title")]
    pub title: String,
}

impl CreateTodoRequest {
    pub fn trimmed_title(&self) -> String {
        self.title.trim().to_string()
    }
}

/// Request body for updating a todo. At least one field must be present.
#[derive(Debug, Default, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
#[validate(schema(function = "validate_has_changes", skip_on_field_errors = false))]
pub struct UpdateTodoRequest {
    #[validate(custom = "validate_title")]
    pub title: Option<String>,
    pub completed: Option<bool>,
}

impl UpdateTodoRequest {
    pub fn into_changes(self) -> TodoChanges {
        TodoChanges {
            title: self.title.map(|title| title.trim().to_string()),
            completed: self.completed,
        }
    }
}

/// Fields to overwrite on an existing todo; `None` leaves the column as is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoChanges {
    pub title: Option<String>,
    pub completed: Option<bool>,
}

impl TodoChanges {
    pub fn toggle(current: &Todo) -> Self {
        Self {
            title: None,
            completed: Some(!current.completed),
        }
    }
}

/// Per-user completion counts.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, FromRow)]
pub struct TodoStats {
    pub total: i64,
    pub completed: i64,
    pub pending: i64,
}

fn error_with_message(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::Borrowed(message));
    error
}

fn validate_title(title: &str) -> Result<(), ValidationError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(error_with_message("title_empty", "Todo title cannot be empty"));
    }
    if trimmed.chars().count() > MAX_TITLE_LEN {
        return Err(error_with_message(
            "title_too_long",
            "Todo title must not exceed 255 characters",
        ));
    }
    Ok(())
}

fn validate_has_changes(request: &UpdateTodoRequest) -> Result<(), ValidationError> {
    if request.title.is_none() && request.completed.is_none() {
        return Err(error_with_message(
            "no_fields",
            "At least one field (title or completed) must be provided",
        ));
    }
    Ok(())
}
