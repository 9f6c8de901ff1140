use crate::{
    auth::{AuthResponse, AuthenticatedUser, LoginRequest, RegisterRequest},
    error::AppError,
    state::AppState,
};
use actix_web::{post, web, HttpResponse, Responder};
use serde_json::json;
use validator::Validate;

/// Register a new user
///
/// Creates a new user account and returns it together with a session token.
///
/// ## Responses:
/// - `201 Created`: `{ message, user, token }`.
/// - `400 Bad Request`: invalid input, or the email/username is already taken.
#[post("/register")]
pub async fn register(
    state: web::Data<AppState>,
    register_data: web::Json<RegisterRequest>,
) -> Result<impl Responder, AppError> {
    register_data.validate()?;

    let user = state
        .credentials
        .create(
            &register_data.username,
            &register_data.email,
            &register_data.password,
        )
        .await?;
    let token = state.tokens.issue(user.id)?;
    log::info!("Registered user {} ({})", user.id, user.username);

    Ok(HttpResponse::Created().json(AuthResponse {
        message: "User created successfully".into(),
        user: user.public(),
        token,
    }))
}

/// Login user
///
/// Authenticates a user by email and password and returns a fresh session token.
/// Unknown emails and wrong passwords are indistinguishable to the client.
#[post("/login")]
pub async fn login(
    state: web::Data<AppState>,
    login_data: web::Json<LoginRequest>,
) -> Result<impl Responder, AppError> {
    login_data.validate()?;

    let user = state
        .credentials
        .find_by_email(&login_data.email)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

    if !state
        .credentials
        .verify_password(&user, &login_data.password)
        .await?
    {
        log::warn!("Failed login for user {}", user.id);
        return Err(AppError::InvalidCredentials);
    }

    let token = state.tokens.issue(user.id)?;
    Ok(HttpResponse::Ok().json(AuthResponse {
        message: "Login successful".into(),
        user: user.public(),
        token,
    }))
}

/// Confirms the presented token is still good. Mounted behind `AuthMiddleware`.
pub async fn verify(user: AuthenticatedUser) -> impl Responder {
    HttpResponse::Ok().json(json!({
        "valid": true,
        "user": user.public()
    }))
}

/// Returns the caller's profile. Mounted behind `AuthMiddleware`.
pub async fn profile(user: AuthenticatedUser) -> impl Responder {
    HttpResponse::Ok().json(json!({
        "user": user.public()
    }))
}
