pub mod auth;
pub mod health;
pub mod todos;

use actix_web::{error::JsonPayloadError, web};

use crate::{auth::AuthMiddleware, error::AppError};

/// Mounts `/health` and everything under `/api`.
///
/// Register and login are public; `/api/auth/verify`, `/api/auth/profile` and
/// the whole `/api/todos` scope sit behind `AuthMiddleware`. Expects a
/// `web::Data<AppState>` to be registered on the `App`.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .app_data(path_config())
        .service(health::health)
        .service(
            web::scope("/api")
                .service(
                    web::scope("/auth")
                        .service(auth::register)
                        .service(auth::login)
                        .service(
                            web::resource("/verify")
                                .wrap(AuthMiddleware)
                                .route(web::get().to(auth::verify)),
                        )
                        .service(
                            web::resource("/profile")
                                .wrap(AuthMiddleware)
                                .route(web::get().to(auth::profile)),
                        ),
                )
                .service(
                    // `/stats` is registered before `/{id}` so it is not parsed as an id.
                    web::scope("/todos")
                        .wrap(AuthMiddleware)
                        .service(todos::todo_stats)
                        .service(todos::list_todos)
                        .service(todos::create_todo)
                        .service(todos::get_todo)
                        .service(todos::update_todo)
                        .service(todos::toggle_todo)
                        .service(todos::delete_todo),
                ),
        );
}

/// Malformed or incomplete JSON bodies become a 400 with the usual error body.
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        let message = match &err {
            JsonPayloadError::ContentType => "Content-Type must be application/json".to_string(),
            JsonPayloadError::Deserialize(e) => format!("Invalid request body: {}", e),
            other => format!("Invalid request body: {}", other),
        };
        AppError::ValidationError(message).into()
    })
}

/// Non-numeric path ids are a validation failure, not a missing route.
fn path_config() -> web::PathConfig {
    web::PathConfig::default()
        .error_handler(|_err, _req| AppError::ValidationError(todos::INVALID_ID.into()).into())
}
