//! Resource ownership checks for todo operations.
//!
//! Read-by-id, update, toggle and delete all look the record up first and pass
//! the result through [`authorize`]. Listing, creating and stats are scoped by
//! the caller's id in the query itself.

use super::extractors::AuthenticatedUser;
use crate::error::AppError;
use crate::models::Todo;

pub const TODO_NOT_FOUND: &str = "Todo not found";
pub const TODO_FORBIDDEN: &str = "Access denied - this todo does not belong to you";

/// Hands the todo back only if `caller` owns it.
///
/// Absence is reported before ownership: a missing record is `NotFound`, a
/// record owned by someone else is `Forbidden`.
pub fn authorize(caller: &AuthenticatedUser, todo: Option<Todo>) -> Result<Todo, AppError> {
    let todo = todo.ok_or_else(|| AppError::NotFound(TODO_NOT_FOUND.into()))?;
    if todo.user_id != caller.id() {
        log::warn!(
            "user {} denied access to todo {} owned by {}",
            caller.id(),
            todo.id,
            todo.user_id
        );
        return Err(AppError::Forbidden(TODO_FORBIDDEN.into()));
    }
    Ok(todo)
}
