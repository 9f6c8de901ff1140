use crate::{
    auth::{guard, AuthenticatedUser},
    error::AppError,
    models::{CreateTodoRequest, TodoChanges, UpdateTodoRequest},
    state::AppState,
};
use actix_web::{delete, get, patch, post, put, web, HttpResponse, Responder};
use serde_json::json;
use validator::Validate;

pub const INVALID_ID: &str = "ID must be a positive integer";

fn todo_id(path: web::Path<i32>) -> Result<i32, AppError> {
    match path.into_inner() {
        id if id > 0 => Ok(id),
        _ => Err(AppError::ValidationError(INVALID_ID.into())),
    }
}

/// Lists the caller's todos, newest first.
///
/// ## Responses:
/// - `200 OK`: `{ todos, count }`.
#[get("")]
pub async fn list_todos(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let todos = state.todos.list_for_owner(user.id()).await?;
    Ok(HttpResponse::Ok().json(json!({
        "count": todos.len(),
        "todos": todos
    })))
}

/// Completion counts for the caller.
///
/// ## Responses:
/// - `200 OK`: `{ statistics: { total, completed, pending } }`.
#[get("/stats")]
pub async fn todo_stats(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let statistics = state.todos.stats(user.id()).await?;
    Ok(HttpResponse::Ok().json(json!({ "statistics": statistics })))
}

/// Retrieves a specific todo by its ID.
///
/// ## Responses:
/// - `200 OK`: `{ todo }`.
/// - `400 Bad Request`: the ID is not a positive integer.
/// - `403 Forbidden`: the todo belongs to another user.
/// - `404 Not Found`: no todo with this ID.
#[get("/{id}")]
pub async fn get_todo(
    state: web::Data<AppState>,
    path: web::Path<i32>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let id = todo_id(path)?;
    let todo = guard::authorize(&user, state.todos.find_by_id(id).await?)?;
    Ok(HttpResponse::Ok().json(json!({ "todo": todo })))
}

/// Creates a new todo owned by the caller. The title is stored trimmed.
///
/// ## Responses:
/// - `201 Created`: `{ message, todo }` with `completed: false`.
/// - `400 Bad Request`: missing, blank or overlong title.
#[post("")]
pub async fn create_todo(
    state: web::Data<AppState>,
    todo_data: web::Json<CreateTodoRequest>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    todo_data.validate()?;

    let todo = state
        .todos
        .create(user.id(), &todo_data.trimmed_title())
        .await?;
    Ok(HttpResponse::Created().json(json!({
        "message": "Todo created successfully",
        "todo": todo
    })))
}

/// Updates the title and/or completion of a todo the caller owns.
///
/// The body must carry at least one of `title` or `completed`; an empty body
/// is rejected before the store is touched.
///
/// ## Responses:
/// - `200 OK`: `{ message, todo }`.
/// - `400 Bad Request`: invalid ID or body.
/// - `403 Forbidden`: the todo belongs to another user.
/// - `404 Not Found`: no todo with this ID.
#[put("/{id}")]
pub async fn update_todo(
    state: web::Data<AppState>,
    path: web::Path<i32>,
    todo_data: web::Json<UpdateTodoRequest>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let id = todo_id(path)?;
    todo_data.validate()?;

    guard::authorize(&user, state.todos.find_by_id(id).await?)?;

    let todo = state
        .todos
        .update(id, user.id(), todo_data.into_inner().into_changes())
        .await?
        .ok_or_else(|| AppError::NotFound(guard::TODO_NOT_FOUND.into()))?;
    Ok(HttpResponse::Ok().json(json!({
        "message": "Todo updated successfully",
        "todo": todo
    })))
}

/// Flips the completion status of a todo the caller owns.
///
/// ## Responses:
/// - `200 OK`: `{ message, todo }`.
/// - `403 Forbidden` / `404 Not Found`: as for `get_todo`.
#[patch("/{id}/toggle")]
pub async fn toggle_todo(
    state: web::Data<AppState>,
    path: web::Path<i32>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let id = todo_id(path)?;
    let current = guard::authorize(&user, state.todos.find_by_id(id).await?)?;

    let todo = state
        .todos
        .update(id, user.id(), TodoChanges::toggle(&current))
        .await?
        .ok_or_else(|| AppError::NotFound(guard::TODO_NOT_FOUND.into()))?;
    Ok(HttpResponse::Ok().json(json!({
        "message": "Todo status toggled successfully",
        "todo": todo
    })))
}

/// Deletes a todo the caller owns.
///
/// ## Responses:
/// - `200 OK`: `{ message }`.
/// - `403 Forbidden` / `404 Not Found`: as for `get_todo`.
#[delete("/{id}")]
pub async fn delete_todo(
    state: web::Data<AppState>,
    path: web::Path<i32>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let id = todo_id(path)?;
    guard::authorize(&user, state.todos.find_by_id(id).await?)?;

    if !state.todos.delete(id, user.id()).await? {
        return Err(AppError::NotFound(guard::TODO_NOT_FOUND.into()));
    }
    Ok(HttpResponse::Ok().json(json!({ "message": "Todo deleted successfully" })))
}
